//! Lexes one assembly line into a flat token stream.
//!
//! Mirrors the reference assembler's tokenizer (a fixed `tokens[MAX_TOKENS]`
//! array filled left to right): mnemonics are split off by the first run of
//! whitespace, then the remainder is split into punctuation tokens (`,` `@`
//! `+` `-` `(` `)` `#`) and alphanumeric "words" (register names, system
//! register names, and decimal/hex numbers).

use crate::common::error::CoreError;

/// One lexical token from an operand list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    /// `,`
    Comma,
    /// `@`
    At,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `#`
    Hash,
    /// A register name, system register name, `XMTRX`, or a bare number.
    Word(String),
}

/// Splits `line` into an uppercased mnemonic and its raw operand text.
///
/// Leading/trailing whitespace is trimmed; a line with no operands (e.g.
/// `NOP`) returns an empty second element.
pub fn split_mnemonic(line: &str) -> (String, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(idx) => (line[..idx].to_ascii_uppercase(), line[idx..].trim_start()),
        None => (line.to_ascii_uppercase(), ""),
    }
}

/// Tokenizes the operand portion of a line (everything after the mnemonic).
pub fn tokenize(rest: &str) -> Result<Vec<Tok>, CoreError> {
    let mut toks = Vec::new();
    let mut chars = rest.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ',' => {
                toks.push(Tok::Comma);
                chars.next();
            }
            '@' => {
                toks.push(Tok::At);
                chars.next();
            }
            '+' => {
                toks.push(Tok::Plus);
                chars.next();
            }
            '-' => {
                toks.push(Tok::Minus);
                chars.next();
            }
            '(' => {
                toks.push(Tok::LParen);
                chars.next();
            }
            ')' => {
                toks.push(Tok::RParen);
                chars.next();
            }
            '#' => {
                toks.push(Tok::Hash);
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if word.is_empty() {
                    return Err(CoreError::UnrecognizedPattern(format!(
                        "unexpected character {c:?} in operand text {rest:?}"
                    )));
                }
                toks.push(Tok::Word(word));
            }
        }
    }
    Ok(toks)
}

/// Splits `toks` into comma-separated operand groups, respecting paren
/// nesting so the inner comma of `@(R0,Rn)` does not end the operand early.
pub fn split_operands(toks: &[Tok]) -> Vec<Vec<Tok>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0i32;
    for tok in toks {
        match tok {
            Tok::LParen => {
                depth += 1;
                current.push(tok.clone());
            }
            Tok::RParen => {
                depth -= 1;
                current.push(tok.clone());
            }
            Tok::Comma if depth == 0 => {
                groups.push(std::mem::take(&mut current));
            }
            _ => current.push(tok.clone()),
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Parses a `Word` token holding a (possibly hex, possibly negative) number.
pub fn parse_number(word: &str, negative: bool) -> Result<i32, CoreError> {
    let parsed = if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        word.parse::<i64>()
    }
    .map_err(|e| CoreError::UnrecognizedPattern(format!("not a number: {word:?} ({e})")))?;
    let parsed = if negative { -parsed } else { parsed };
    i32::try_from(parsed)
        .map_err(|_| CoreError::UnrecognizedPattern(format!("number out of range: {word:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_mnemonic_from_operands() {
        assert_eq!(split_mnemonic("  add r1,r2  "), ("ADD".to_string(), "r1,r2".trim()));
        assert_eq!(split_mnemonic("NOP"), ("NOP".to_string(), ""));
    }

    #[test]
    fn tokenizes_indexed_addressing() {
        let toks = tokenize("@(R0,R4)").unwrap();
        assert_eq!(
            toks,
            vec![
                Tok::At,
                Tok::LParen,
                Tok::Word("R0".into()),
                Tok::Comma,
                Tok::Word("R4".into()),
                Tok::RParen,
            ]
        );
    }

    #[test]
    fn splits_top_level_commas_but_not_nested_ones() {
        let toks = tokenize("@(R0,R4),R2").unwrap();
        let groups = split_operands(&toks);
        assert_eq!(groups.len(), 2);
    }
}
