//! Tokenizer for expression text.

use crate::error::{EpicycleError, Result};

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `**` or `^`.
    Pow,
    LParen,
    RParen,
    Eof,
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) position: usize,
}

/// Split source text into tokens, ending with `Eof`.
pub(super) fn tokenize(source: &str) -> Result<Vec<Token>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;
        let kind = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            },
            b'+' => {
                pos += 1;
                TokenKind::Plus
            },
            b'-' => {
                pos += 1;
                TokenKind::Minus
            },
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                TokenKind::Pow
            },
            b'*' => {
                pos += 1;
                TokenKind::Star
            },
            b'/' => {
                pos += 1;
                TokenKind::Slash
            },
            b'^' => {
                pos += 1;
                TokenKind::Pow
            },
            b'(' => {
                pos += 1;
                TokenKind::LParen
            },
            b')' => {
                pos += 1;
                TokenKind::RParen
            },
            b'0'..=b'9' | b'.' => {
                let (value, end) = lex_number(source, pos)?;
                pos = end;
                TokenKind::Number(value)
            },
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                TokenKind::Ident(source[start..pos].to_string())
            },
            _ => {
                let ch = source[pos..].chars().next().unwrap_or('?');
                return Err(EpicycleError::parse(pos, format!("unexpected character '{}'", ch)));
            },
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: bytes.len(),
    });
    Ok(tokens)
}

/// Lex `digits [. digits] [e [+-] digits]` starting at `start`.
fn lex_number(source: &str, start: usize) -> Result<(f64, usize)> {
    let bytes = source.as_bytes();
    let mut pos = start;
    let digits = |pos: &mut usize| {
        let from = *pos;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
        *pos - from
    };

    let mut count = digits(&mut pos);
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        count += digits(&mut pos);
    }
    if count == 0 {
        return Err(EpicycleError::parse(start, "expected digits"));
    }

    // Only treat 'e' as an exponent when digits follow, so "2*e" still works
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut probe = pos + 1;
        if probe < bytes.len() && (bytes[probe] == b'+' || bytes[probe] == b'-') {
            probe += 1;
        }
        if probe < bytes.len() && bytes[probe].is_ascii_digit() {
            pos = probe;
            digits(&mut pos);
        }
    }

    source[start..pos]
        .parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|e| EpicycleError::parse(start, format!("invalid number: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_operators() {
        assert_eq!(
            kinds("t**2^3"),
            vec![
                TokenKind::Ident("t".into()),
                TokenKind::Pow,
                TokenKind::Number(2.0),
                TokenKind::Pow,
                TokenKind::Number(3.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_scientific_numbers() {
        assert_eq!(kinds("1.5e-3")[0], TokenKind::Number(1.5e-3));
        assert_eq!(kinds(".25")[0], TokenKind::Number(0.25));
        assert_eq!(kinds("2E3")[0], TokenKind::Number(2000.0));
    }

    #[test]
    fn exponent_needs_digits() {
        assert_eq!(
            kinds("2e"),
            vec![
                TokenKind::Number(2.0),
                TokenKind::Ident("e".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn records_positions() {
        let tokens = tokenize("a +  bc").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 5, 7]);
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("t $ 2").unwrap_err();
        assert!(matches!(err, EpicycleError::Parse { position: 2, .. }));
    }

    #[test]
    fn lone_dot_is_an_error() {
        assert!(tokenize("1 + .").is_err());
    }
}
