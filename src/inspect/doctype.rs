// src/inspect/doctype.rs
// =============================================================================
// Works out which HTML version a page declares in its <!DOCTYPE>.
//
// This is a flat lookup table, NOT a DTD parser. One regex finds the doctype
// and captures its PUBLIC and SYSTEM identifiers; a handful of substring
// checks on those identifiers pick the label.
//
// The regex runs on the raw bytes, so it works even when the rest of the
// document is too broken to parse.
// =============================================================================

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Case-insensitive `<!DOCTYPE html ...>` with an optional PUBLIC id and the
/// system id that may follow it.
///
/// A system id on its own (`SYSTEM "about:legacy-compat"`) is not captured:
/// that form is still an HTML5 doctype.
const DOCTYPE_PATTERN: &str =
    r#"(?i)<!DOCTYPE\s+html(?:\s+PUBLIC\s+"([^"]*)"(?:\s+"([^"]*)")?)?[^>]*>"#;

/// The labels a page can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtmlVersion {
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "XHTML 1.1")]
    Xhtml11,
    #[serde(rename = "XHTML 1.0 Strict")]
    Xhtml10Strict,
    #[serde(rename = "XHTML 1.0 Transitional")]
    Xhtml10Transitional,
    #[serde(rename = "XHTML 1.0 Frameset")]
    Xhtml10Frameset,
    #[serde(rename = "XHTML 1.0")]
    Xhtml10,
    #[serde(rename = "XHTML (unknown minor)")]
    XhtmlUnknownMinor,
    #[serde(rename = "HTML 4.01 Strict")]
    Html401Strict,
    #[serde(rename = "HTML 4.01 Transitional")]
    Html401Transitional,
    #[serde(rename = "HTML 4.01 Frameset")]
    Html401Frameset,
    #[serde(rename = "HTML 4.01")]
    Html401,
    #[serde(rename = "Unknown (doctype present)")]
    UnknownDoctype,
    #[serde(rename = "Unknown (no <!DOCTYPE>)")]
    NoDoctype,
}

impl HtmlVersion {
    pub fn label(self) -> &'static str {
        match self {
            HtmlVersion::Html5 => "HTML5",
            HtmlVersion::Xhtml11 => "XHTML 1.1",
            HtmlVersion::Xhtml10Strict => "XHTML 1.0 Strict",
            HtmlVersion::Xhtml10Transitional => "XHTML 1.0 Transitional",
            HtmlVersion::Xhtml10Frameset => "XHTML 1.0 Frameset",
            HtmlVersion::Xhtml10 => "XHTML 1.0",
            HtmlVersion::XhtmlUnknownMinor => "XHTML (unknown minor)",
            HtmlVersion::Html401Strict => "HTML 4.01 Strict",
            HtmlVersion::Html401Transitional => "HTML 4.01 Transitional",
            HtmlVersion::Html401Frameset => "HTML 4.01 Frameset",
            HtmlVersion::Html401 => "HTML 4.01",
            HtmlVersion::UnknownDoctype => "Unknown (doctype present)",
            HtmlVersion::NoDoctype => "Unknown (no <!DOCTYPE>)",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Holds the compiled doctype pattern.
///
/// Build it once and reuse it for every page.
#[derive(Debug, Clone)]
pub struct DoctypeClassifier {
    pattern: Regex,
}

impl DoctypeClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(DOCTYPE_PATTERN)?,
        })
    }

    pub fn classify(&self, html: &[u8]) -> HtmlVersion {
        let Some(caps) = self.pattern.captures(html) else {
            return HtmlVersion::NoDoctype;
        };

        let capture = |i: usize| {
            caps.get(i)
                .map(|m| String::from_utf8_lossy(m.as_bytes()).to_lowercase())
                .unwrap_or_default()
        };
        let public_id = capture(1);
        let system_id = capture(2);
        if public_id.is_empty() && system_id.is_empty() {
            return HtmlVersion::Html5;
        }

        let ids = format!("{} {}", public_id, system_id);
        let has = |needle: &str| ids.contains(needle);

        if has("xhtml") {
            if has("1.1") {
                HtmlVersion::Xhtml11
            } else if has("1.0") {
                if has("strict") {
                    HtmlVersion::Xhtml10Strict
                } else if has("transitional") {
                    HtmlVersion::Xhtml10Transitional
                } else if has("frameset") {
                    HtmlVersion::Xhtml10Frameset
                } else {
                    HtmlVersion::Xhtml10
                }
            } else {
                HtmlVersion::XhtmlUnknownMinor
            }
        } else if has("4.01") {
            if has("strict") {
                HtmlVersion::Html401Strict
            } else if has("transitional") {
                HtmlVersion::Html401Transitional
            } else if has("frameset") {
                HtmlVersion::Html401Frameset
            } else {
                HtmlVersion::Html401
            }
        } else {
            HtmlVersion::UnknownDoctype
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<!DOCTYPE html><html><head></head><body></body></html>", HtmlVersion::Html5)]
    #[case("<!doctype HTML>\n<title>x</title>", HtmlVersion::Html5)]
    #[case(r#"<!DOCTYPE html SYSTEM "about:legacy-compat"><html></html>"#, HtmlVersion::Html5)]
    #[case(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
        HtmlVersion::Html401Strict
    )]
    #[case(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#,
        HtmlVersion::Html401Transitional
    )]
    #[case(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN" "http://www.w3.org/TR/html4/frameset.dtd">"#,
        HtmlVersion::Html401Frameset
    )]
    #[case(r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN">"#, HtmlVersion::Html401)]
    #[case(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
        HtmlVersion::Xhtml10Transitional
    )]
    #[case(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
        HtmlVersion::Xhtml10Strict
    )]
    #[case(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd">"#,
        HtmlVersion::Xhtml10Frameset
    )]
    #[case(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#,
        HtmlVersion::Xhtml11
    )]
    #[case(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML Basic//EN">"#, HtmlVersion::XhtmlUnknownMinor)]
    #[case(r#"<!DOCTYPE html PUBLIC "-//IETF//DTD HTML 2.0//EN">"#, HtmlVersion::UnknownDoctype)]
    #[case("<html><head></head><body></body></html>", HtmlVersion::NoDoctype)]
    #[case("", HtmlVersion::NoDoctype)]
    fn test_classify(#[case] html: &str, #[case] expected: HtmlVersion) {
        let classifier = DoctypeClassifier::new().unwrap();
        assert_eq!(classifier.classify(html.as_bytes()), expected);
    }

    #[test]
    fn test_labels_serialize_as_display_text() {
        let json = serde_json::to_string(&HtmlVersion::NoDoctype).unwrap();
        assert_eq!(json, r#""Unknown (no <!DOCTYPE>)""#);
        assert_eq!(HtmlVersion::Xhtml10Strict.to_string(), "XHTML 1.0 Strict");
    }

    #[test]
    fn test_works_on_non_utf8_bytes() {
        let classifier = DoctypeClassifier::new().unwrap();
        let mut bytes = b"<!DOCTYPE html>".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00]);
        assert_eq!(classifier.classify(&bytes), HtmlVersion::Html5);
    }
}
