//! Literal encoding for emitted client code.
//!
//! String literals are escaped one character at a time so the result can be
//! embedded in either a single- or double-quoted client string, and inside an
//! inline `<script>` element. Numbers are formatted independently of any
//! locale.

use std::fmt::Write;

/// Quote and escape `value` as a double-quoted client string literal.
///
/// ```ignore
/// assert_eq!(quote("it's"), r#""it\'s""#);
/// ```
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    escape_into(&mut out, value);
    out.push('"');
    out
}

/// Append the escaped form of `value` (without surrounding quotes) to `out`.
pub fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\x00"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '<' => out.push_str("\\x3C"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c < ' ' || c == '\u{7f}' => {
                // Infallible for String.
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// Format a number as a client numeric literal.
///
/// The output is always a primary expression: negative values and negative
/// infinity are parenthesised, non-finite values use the global names.
pub fn number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_owned()
        } else {
            "(-Infinity)".to_owned()
        };
    }
    if value.is_sign_negative() {
        return format!("(-{})", -value);
    }
    format!("{value}")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(quote("hello world"), "\"hello world\"");
    }

    #[test]
    fn quotes_and_backslash() {
        assert_eq!(quote(r#"a"b'c\d"#), r#""a\"b\'c\\d""#);
    }

    #[test]
    fn nul_is_hex_escaped() {
        // `\0` followed by a digit would be a legacy octal escape.
        assert_eq!(quote("\u{0}1"), "\"\\x001\"");
    }

    #[test]
    fn named_control_characters() {
        assert_eq!(quote("\n\r\t\u{8}\u{c}\u{b}"), "\"\\n\\r\\t\\b\\f\\v\"");
    }

    #[test]
    fn other_controls_use_hex() {
        assert_eq!(quote("\u{1}\u{1f}\u{7f}"), "\"\\x01\\x1F\\x7F\"");
    }

    #[test]
    fn script_close_tag_cannot_appear() {
        let quoted = quote("</script>");
        assert!(!quoted.contains("</"));
        assert_eq!(quoted, "\"\\x3C/script>\"");
    }

    #[test]
    fn line_separators_escaped() {
        assert_eq!(quote("\u{2028}\u{2029}"), "\"\\u2028\\u2029\"");
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(quote("héllo ✓ 日本"), "\"héllo ✓ 日本\"");
    }

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(number(3.0), "3");
        assert_eq!(number(0.0), "0");
        assert_eq!(number(1_000_000.0), "1000000");
    }

    #[test]
    fn fractions_use_a_dot() {
        assert_eq!(number(2.5), "2.5");
        assert_eq!(number(0.1), "0.1");
    }

    #[test]
    fn negatives_are_parenthesised() {
        assert_eq!(number(-4.0), "(-4)");
        assert_eq!(number(-0.0), "(-0)");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(number(f64::NAN), "NaN");
        assert_eq!(number(f64::INFINITY), "Infinity");
        assert_eq!(number(f64::NEG_INFINITY), "(-Infinity)");
    }
}
