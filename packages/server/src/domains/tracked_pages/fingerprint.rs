//! Content fingerprints for change detection.
//!
//! A fingerprint is the SHA-256 of the page's *visible text*, not its raw
//! bytes: markup, scripts, styles and whitespace layout are dropped first so
//! that re-indented HTML or a rotated inline script does not read as a change.
//! Case and punctuation are kept; they are part of what a reader sees.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Subtrees whose text is never shown to a reader.
const INVISIBLE_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "head",
];

/// Phrasing elements: their text continues the surrounding word.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u",
    "var",
];

/// Hex-encoded SHA-256 of normalized page text (64 lowercase hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint already-extracted text. Whitespace runs are collapsed
    /// before hashing, so `"Hello  world"` and `"Hello world"` agree.
    pub fn of_text(text: &str) -> Self {
        let normalized = normalize_whitespace(text);
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("cannot extract text from content type '{0}'")]
    UnsupportedContentType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentKind {
    Html,
    PlainText,
}

fn classify(content_type: Option<&str>) -> Result<ContentKind, ExtractionError> {
    let Some(raw) = content_type else {
        return Ok(ContentKind::Html);
    };

    let essence = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "" | "text/html" | "application/xhtml+xml" => Ok(ContentKind::Html),
        "application/json" | "application/xml" => Ok(ContentKind::PlainText),
        e if e.starts_with("text/") || e.ends_with("+json") || e.ends_with("+xml") => {
            Ok(ContentKind::PlainText)
        }
        _ => Err(ExtractionError::UnsupportedContentType(raw.to_string())),
    }
}

/// Collapse every run of whitespace into one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an HTML document: the `<body>` (or the whole document when
/// there is none) minus invisible subtrees, whitespace-normalized.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    collect_text(root, &mut text);
    normalize_whitespace(&text)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if INVISIBLE_ELEMENTS.contains(&el.name()) {
                    continue;
                }
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                if INLINE_ELEMENTS.contains(&el.name()) {
                    collect_text(child_element, out);
                } else {
                    // Block and line-break boundaries separate words: `<p>a</p><p>b</p>` is "a b".
                    out.push(' ');
                    collect_text(child_element, out);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Extract the normalized text of a fetched representation.
pub fn extract_text(content: &[u8], content_type: Option<&str>) -> Result<String, ExtractionError> {
    let decoded = String::from_utf8_lossy(content);
    match classify(content_type)? {
        ContentKind::Html => Ok(extract_visible_text(&decoded)),
        ContentKind::PlainText => Ok(normalize_whitespace(&decoded)),
    }
}

/// Fingerprint raw fetched bytes. Pure: same bytes and content type always
/// give the same fingerprint, in any process.
pub fn fingerprint(content: &[u8], content_type: Option<&str>) -> Result<Fingerprint, ExtractionError> {
    extract_text(content, content_type).map(|text| Fingerprint::of_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: Option<&str> = Some("text/html; charset=utf-8");

    #[test]
    fn identical_content_same_fingerprint() {
        let a = fingerprint(b"<html><body><p>Hello</p></body></html>", HTML).unwrap();
        let b = fingerprint(b"<html><body><p>Hello</p></body></html>", HTML).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn known_digest_is_stable() {
        // sha256("Hello")
        assert_eq!(
            Fingerprint::of_text("Hello").as_str(),
            "185f8db32271fe25f561a6fc938b2e264306ec304eda518007d1764826381969"
        );
    }

    #[test]
    fn fingerprint_format_is_hex_sha256() {
        let fp = Fingerprint::of_text("Test content");
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn body_text_matches_plain_fingerprint() {
        let fp = fingerprint(b"<html><body>Hello</body></html>", HTML).unwrap();
        assert_eq!(fp, Fingerprint::of_text("Hello"));
    }

    #[test]
    fn markup_whitespace_is_ignored() {
        let compact = b"<html><body><div><p>Opening hours</p><p>9 to 5</p></div></body></html>";
        let pretty = b"<html>\n  <body>\n    <div>\n      <p>Opening   hours</p>\n\n      <p>9 to 5</p>\n    </div>\n  </body>\n</html>";
        assert_eq!(fingerprint(compact, HTML).unwrap(), fingerprint(pretty, HTML).unwrap());
    }

    #[test]
    fn scripts_and_styles_are_ignored() {
        let a = b"<html><head><title>x</title></head><body><script>var t = 1;</script><style>p{}</style><p>Menu</p></body></html>";
        let b = b"<html><head><title>y</title></head><body><script>var t = 2;</script><p>Menu</p></body></html>";
        assert_eq!(fingerprint(a, HTML).unwrap(), fingerprint(b, HTML).unwrap());
    }

    #[test]
    fn visible_text_change_is_detected() {
        let a = fingerprint(b"<body><p>Hello</p></body>", HTML).unwrap();
        let b = fingerprint(b"<body><p>Hello World</p></body>", HTML).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn adjacent_blocks_do_not_merge_words() {
        assert_eq!(
            extract_visible_text("<body><p>Hello</p><p>World</p></body>"),
            "Hello World"
        );
    }

    #[test]
    fn inline_markup_inside_a_word_is_not_a_change() {
        let plain = fingerprint(b"<body><p>Hello</p></body>", HTML).unwrap();
        let wrapped = fingerprint(b"<body><p>Hel<span class=\"ad\">lo</span></p></body>", HTML).unwrap();
        assert_eq!(plain, wrapped);
        assert_eq!(
            extract_visible_text("<p>Read <a href=\"/x\">the <em>full</em></a> notice</p>"),
            "Read the full notice"
        );
    }

    #[test]
    fn line_breaks_separate_words() {
        assert_eq!(extract_visible_text("<p>one<br>two</p>"), "one two");
    }

    #[test]
    fn document_without_body_still_extracts() {
        assert_eq!(extract_visible_text("just some text"), "just some text");
    }

    #[test]
    fn missing_content_type_is_treated_as_html() {
        let fp = fingerprint(b"<p>Hi</p>", None).unwrap();
        assert_eq!(fp, Fingerprint::of_text("Hi"));
    }

    #[test]
    fn plain_text_is_only_whitespace_normalized() {
        let fp = fingerprint(b"  <b>not markup</b>\n", Some("text/plain")).unwrap();
        assert_eq!(fp, Fingerprint::of_text("<b>not markup</b>"));
    }

    #[test]
    fn json_is_accepted() {
        assert!(fingerprint(br#"{"a": 1}"#, Some("application/json")).is_ok());
        assert!(fingerprint(b"{}", Some("application/ld+json")).is_ok());
    }

    #[test]
    fn binary_content_is_rejected() {
        let err = fingerprint(&[0x89, 0x50, 0x4e, 0x47], Some("image/png")).unwrap_err();
        assert_eq!(err, ExtractionError::UnsupportedContentType("image/png".to_string()));
    }

    #[test]
    fn invalid_utf8_is_decoded_deterministically() {
        let bytes = b"<body>caf\xe9</body>";
        assert_eq!(fingerprint(bytes, HTML).unwrap(), fingerprint(bytes, HTML).unwrap());
    }
}
