//! Decoding of terminal specifiers into the concrete strings they denote.
//!
//! Quoted strings are unescaped directly; small character classes are
//! enumerated member by member. Everything else is reported as opaque.

use crate::errors::LiteralError;
use crate::grammar::SymbolKind;

/// Largest character class that is still offered as individual literals.
pub const MAX_CLASS_MEMBERS: usize = 32;

/// Resolves a terminal specifier of the given kind to its concrete strings.
pub fn decode_terminal(symbol: &str, kind: SymbolKind) -> Result<Vec<String>, LiteralError> {
    match kind {
        SymbolKind::Literal => unescape_quoted(symbol).map(|text| vec![text]),
        SymbolKind::CharClass => enumerate_class(symbol),
        SymbolKind::Pattern => Err(LiteralError::non_enumerable(
            symbol,
            "regular expressions denote open-ended languages",
        )),
        SymbolKind::Token => Err(LiteralError::non_enumerable(
            symbol,
            "token spelling is defined by the lexer",
        )),
        SymbolKind::Nonterminal => Err(LiteralError::malformed(symbol, "not a terminal")),
    }
}

/// Strips the surrounding quotes of `text` and decodes its escape sequences.
pub fn unescape_quoted(text: &str) -> Result<String, LiteralError> {
    let quote = match text.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(LiteralError::malformed(text, "missing opening quote")),
    };
    if text.len() < 2 || !text.ends_with(quote) {
        return Err(LiteralError::malformed(text, "missing closing quote"));
    }

    let inner = &text[1..text.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => result.push(unescape_char(text, &mut chars)?),
            c if c == quote => {
                return Err(LiteralError::malformed(text, "unescaped quote inside literal"));
            }
            c => result.push(c),
        }
    }

    Ok(result)
}

fn unescape_char(literal: &str, chars: &mut std::str::Chars<'_>) -> Result<char, LiteralError> {
    let escaped = chars
        .next()
        .ok_or_else(|| LiteralError::malformed(literal, "dangling backslash"))?;
    match escaped {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '0' => Ok('\0'),
        '\\' | '"' | '\'' | '/' | ']' | '[' | '-' | '^' => Ok(escaped),
        'x' => {
            let digits: String = chars.by_ref().take(2).collect();
            code_point(literal, &digits, 2)
        }
        'u' => {
            let rest = chars.as_str();
            if let Some(braced) = rest.strip_prefix('{') {
                let close = braced
                    .find('}')
                    .ok_or_else(|| LiteralError::malformed(literal, "unterminated \\u{...} escape"))?;
                let digits = &braced[..close];
                if digits.is_empty() || digits.len() > 6 {
                    return Err(LiteralError::malformed(literal, "invalid \\u{...} escape"));
                }
                *chars = braced[close + 1..].chars();
                code_point(literal, digits, digits.len())
            } else {
                let digits: String = chars.by_ref().take(4).collect();
                code_point(literal, &digits, 4)
            }
        }
        other => Err(LiteralError::malformed(
            literal,
            format!("unknown escape sequence \\{other}"),
        )),
    }
}

fn code_point(literal: &str, digits: &str, expected: usize) -> Result<char, LiteralError> {
    if digits.len() != expected {
        return Err(LiteralError::malformed(literal, "truncated escape sequence"));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LiteralError::malformed(literal, format!("non-hex digits in escape {digits}")));
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| LiteralError::malformed(literal, format!("invalid code point {digits}")))
}

/// Lists the members of a non-negated character class such as `[+\-*/]`.
pub fn enumerate_class(text: &str) -> Result<Vec<String>, LiteralError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| LiteralError::malformed(text, "unterminated character class"))?;
    if inner.starts_with('^') {
        return Err(LiteralError::non_enumerable(text, "negated character class"));
    }

    let mut atoms = Vec::new();
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        let atom = if ch == '\\' { unescape_char(text, &mut chars)? } else { ch };
        atoms.push((atom, ch == '\\'));
    }

    let mut members: Vec<char> = Vec::new();
    let mut i = 0;
    while i < atoms.len() {
        let (lo, _) = atoms[i];
        let is_range = matches!(atoms.get(i + 1), Some(('-', false))) && i + 2 < atoms.len();
        if !is_range {
            push_member(&mut members, lo);
            i += 1;
            continue;
        }

        let (hi, _) = atoms[i + 2];
        if lo > hi {
            return Err(LiteralError::malformed(text, format!("reversed range {lo}-{hi}")));
        }
        let width = (hi as u32 - lo as u32) as usize + 1;
        if members.len() + width > MAX_CLASS_MEMBERS {
            return Err(too_large(text));
        }
        for c in (lo as u32..=hi as u32).filter_map(char::from_u32) {
            push_member(&mut members, c);
        }
        i += 3;
    }

    if members.is_empty() {
        return Err(LiteralError::malformed(text, "empty character class"));
    }
    if members.len() > MAX_CLASS_MEMBERS {
        return Err(too_large(text));
    }
    Ok(members.into_iter().map(String::from).collect())
}

fn push_member(members: &mut Vec<char>, c: char) {
    if !members.contains(&c) {
        members.push(c);
    }
}

fn too_large(text: &str) -> LiteralError {
    LiteralError::non_enumerable(
        text,
        format!("character class has more than {MAX_CLASS_MEMBERS} members"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_literal() {
        assert_eq!(unescape_quoted("\"let\"").unwrap(), "let");
        assert_eq!(unescape_quoted("'+'").unwrap(), "+");
        assert_eq!(unescape_quoted("\"\"").unwrap(), "");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(unescape_quoted(r#""a\"b""#).unwrap(), "a\"b");
        assert_eq!(unescape_quoted(r#""\n\t\\""#).unwrap(), "\n\t\\");
        assert_eq!(unescape_quoted(r#""\x41B\u{1F600}""#).unwrap(), "AB\u{1F600}");
        assert_eq!(unescape_quoted(r#"'it\'s'"#).unwrap(), "it's");
    }

    #[test]
    fn test_malformed_literals() {
        assert!(matches!(unescape_quoted("\"open"), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted("\""), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""\q""#), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""\uD800""#), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""\x4""#), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""a"b""#), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""\x+4""#), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""\u{+41}""#), Err(LiteralError::Malformed { .. })));
        assert!(matches!(unescape_quoted(r#""\u+041""#), Err(LiteralError::Malformed { .. })));
    }

    #[test]
    fn test_small_class_is_enumerated() {
        assert_eq!(enumerate_class("[+-]").unwrap(), vec!["+", "-"]);
        assert_eq!(enumerate_class(r"[*/\-]").unwrap(), vec!["*", "/", "-"]);
        assert_eq!(enumerate_class("[0-3x]").unwrap(), vec!["0", "1", "2", "3", "x"]);
        assert_eq!(enumerate_class("[aa]").unwrap(), vec!["a"]);
    }

    #[test]
    fn test_large_or_negated_class_is_opaque() {
        assert!(matches!(enumerate_class("[a-z0-9]"), Err(LiteralError::NonEnumerable { .. })));
        assert!(matches!(enumerate_class("[^\"]"), Err(LiteralError::NonEnumerable { .. })));
    }

    #[test]
    fn test_malformed_class() {
        assert!(matches!(enumerate_class("[a-"), Err(LiteralError::Malformed { .. })));
        assert!(matches!(enumerate_class("[z-a]"), Err(LiteralError::Malformed { .. })));
        assert!(matches!(enumerate_class("[]"), Err(LiteralError::Malformed { .. })));
    }

    #[test]
    fn test_decode_by_kind() {
        assert_eq!(decode_terminal("\"(\"", SymbolKind::Literal).unwrap(), vec!["("]);
        assert!(matches!(
            decode_terminal("NUMBER", SymbolKind::Token),
            Err(LiteralError::NonEnumerable { .. })
        ));
        assert!(matches!(
            decode_terminal("/[0-9]+/", SymbolKind::Pattern),
            Err(LiteralError::NonEnumerable { .. })
        ));
    }
}
