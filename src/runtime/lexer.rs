//! logos-based tokenizer for client expressions.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `===` beats `==` beats `=`)
//! 2. For equal length matches, earlier-defined variants win
//!
//! String literals are decoded while lexing, so a literal with a malformed
//! escape is a lexing error rather than a parse error later on.

use logos::{Lexer, Logos};

/// Client expression token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // ── Operators (longer matches first) ─────────────────────────────

    /// `===`
    #[token("===")]
    StrictEq,

    /// `!==`
    #[token("!==")]
    StrictNotEq,

    /// `==`
    #[token("==")]
    LooseEq,

    /// `!=`
    #[token("!=")]
    LooseNotEq,

    /// `&&`
    #[token("&&")]
    And,

    /// `||`
    #[token("||")]
    Or,

    /// `!`
    #[token("!")]
    Bang,

    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    // ── Literals ─────────────────────────────────────────────────────

    /// Decimal number literal, decoded.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// String literal (either quote style), decoded.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, decode)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*'"#, decode)]
    Str(String),

    /// Identifier, including keywords like `await` and `true`.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_owned())]
    Ident(String),

    // ── Punctuation ──────────────────────────────────────────────────

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,
}

/// Decode the quoted literal matched by `lex`.
fn decode(lex: &mut Lexer<'_, Token>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

/// Decode the body of a string literal. `None` on a malformed escape.
pub fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            // `\0` must not be followed by a digit (that would be octal).
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            '0'..='9' => return None,
            'x' => {
                let code = hex_digits(&mut chars, 2)?;
                out.push(char::from_u32(code)?);
            }
            'u' => {
                let high = unicode_escape(&mut chars)?;
                if (0xD800..0xDC00).contains(&high) {
                    // A lone surrogate cannot be held in a Rust string.
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = unicode_escape(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(code)?);
                } else {
                    out.push(char::from_u32(high)?);
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// `XXXX` or `{X..}` after `\u`.
fn unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    if chars.peek() == Some(&'{') {
        chars.next();
        let mut code = 0u32;
        let mut digits = 0;
        loop {
            let ch = chars.next()?;
            if ch == '}' {
                break;
            }
            code = code.checked_mul(16)?.checked_add(ch.to_digit(16)?)?;
            digits += 1;
        }
        if digits == 0 || code > 0x10FFFF {
            return None;
        }
        Some(code)
    } else {
        hex_digits(chars, 4)
    }
}

fn hex_digits(chars: &mut impl Iterator<Item = char>, count: usize) -> Option<u32> {
    let mut code = 0;
    for _ in 0..count {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

/// A token with its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character.
    pub start: usize,
    /// Source text of the token.
    pub text: String,
}

/// Tokenize `input`. Fails with the byte offset of the first character that
/// does not start a valid token.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, usize> {
    let mut out = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => out.push(Spanned {
                token,
                start: span.start,
                text: input[span].to_owned(),
            }),
            Err(()) => return Err(span.start),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn operators_prefer_the_longest_match() {
        assert_eq!(
            tokens("=== !== == != && || ! + -"),
            vec![
                Token::StrictEq,
                Token::StrictNotEq,
                Token::LooseEq,
                Token::LooseNotEq,
                Token::And,
                Token::Or,
                Token::Bang,
                Token::Plus,
                Token::Minus,
            ]
        );
    }

    #[test]
    fn call_chain() {
        assert_eq!(
            tokens(r#"seed.get("v1")"#),
            vec![
                Token::Ident("seed".into()),
                Token::Dot,
                Token::Ident("get".into()),
                Token::ParenOpen,
                Token::Str("v1".into()),
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(tokens("42 2.5 1e3"), vec![
            Token::Number(42.0),
            Token::Number(2.5),
            Token::Number(1000.0),
        ]);
    }

    #[test]
    fn string_escapes_decode() {
        assert_eq!(
            tokens(r#""a\"b\'c\\d\n\x00\x3C\u2028""#),
            vec![Token::Str("a\"b'c\\d\n\0<\u{2028}".into())]
        );
        assert_eq!(tokens(r"'it\'s'"), vec![Token::Str("it's".into())]);
    }

    #[test]
    fn surrogate_pairs_combine() {
        assert_eq!(tokens(r#""\uD83D\uDE00""#), vec![Token::Str("\u{1F600}".into())]);
        assert_eq!(tokens(r#""\u{1F600}""#), vec![Token::Str("\u{1F600}".into())]);
    }

    #[test]
    fn malformed_escapes_fail() {
        assert!(tokenize(r#""\x4""#).is_err());
        assert!(tokenize(r#""\uD83D""#).is_err());
        assert!(tokenize(r#""\01""#).is_err());
    }

    #[test]
    fn unterminated_string_fails() {
        assert!(tokenize(r#"a + "oops"#).is_err());
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(tokens("\"héllo wörld\""), vec![Token::Str("héllo wörld".into())]);
    }
}
