//! Parser for the daemon's literal value syntax.
//!
//! Structured payloads arrive as source-style literals, e.g. `(100, 200)`
//! for a coordinate or `('0x90c42', [('0x10344', 'Button1')])` for a window
//! control listing. The grammar is small: integers, quoted strings, tuples,
//! and lists, with optional trailing commas.

use crate::error::{Result, WireError};

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Tuple(Vec<Literal>),
    List(Vec<Literal>),
}

impl Literal {
    /// Parse a complete literal from text, requiring all input be consumed.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Framing`] on any syntax error or trailing junk.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser {
            bytes: input.as_bytes(),
            pos: 0,
        };
        parser.skip_whitespace();
        let value = parser.parse_value()?;
        parser.skip_whitespace();
        if parser.pos != parser.bytes.len() {
            return Err(WireError::framing(format!(
                "trailing input after literal at byte {}: {input:?}",
                parser.pos
            )));
        }
        Ok(value)
    }

    /// The integer value, if this literal is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this literal is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this literal is a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Literal]> {
        match self {
            Literal::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<Literal> {
        match self.peek() {
            Some(b'(') => self.parse_sequence(b'(', b')').map(Literal::Tuple),
            Some(b'[') => self.parse_sequence(b'[', b']').map(Literal::List),
            Some(b'\'') => self.parse_string(b'\''),
            Some(b'"') => self.parse_string(b'"'),
            Some(b'-' | b'0'..=b'9') => self.parse_int(),
            other => Err(WireError::framing(format!(
                "unexpected byte {other:?} at position {} in literal",
                self.pos
            ))),
        }
    }

    fn parse_sequence(&mut self, open: u8, close: u8) -> Result<Vec<Literal>> {
        debug_assert_eq!(self.peek(), Some(open));
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(c) if c == close => {}
                other => {
                    return Err(WireError::framing(format!(
                        "expected ',' or '{}' in sequence, found {other:?}",
                        close as char
                    )));
                }
            }
        }
    }

    fn parse_string(&mut self, quote: u8) -> Result<Literal> {
        debug_assert_eq!(self.peek(), Some(quote));
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None => return Err(WireError::framing("unterminated string literal")),
                Some(c) if c == quote => {
                    self.pos += 1;
                    let s = std::str::from_utf8(&out)?.to_string();
                    return Ok(Literal::Str(s));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let escaped = self
                        .peek()
                        .ok_or_else(|| WireError::framing("dangling escape in string literal"))?;
                    out.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'r' => b'\r',
                        other => other,
                    });
                    self.pos += 1;
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_int(&mut self) -> Result<Literal> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])?;
        let n: i64 = text
            .parse()
            .map_err(|_| WireError::framing(format!("invalid integer literal {text:?}")))?;
        Ok(Literal::Int(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(Literal::parse("42").unwrap(), Literal::Int(42));
        assert_eq!(Literal::parse("-17").unwrap(), Literal::Int(-17));
        assert_eq!(Literal::parse("0").unwrap(), Literal::Int(0));
        assert_eq!(
            Literal::parse("9223372036854775807").unwrap(),
            Literal::Int(i64::MAX)
        );
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            Literal::parse("(100, 200)").unwrap(),
            Literal::Tuple(vec![Literal::Int(100), Literal::Int(200)])
        );
    }

    #[test]
    fn test_parse_empty_tuple() {
        assert_eq!(Literal::parse("()").unwrap(), Literal::Tuple(vec![]));
    }

    #[test]
    fn test_parse_trailing_comma() {
        assert_eq!(
            Literal::parse("(1, 2,)").unwrap(),
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)])
        );
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(
            Literal::parse("'hello'").unwrap(),
            Literal::Str("hello".to_string())
        );
        assert_eq!(
            Literal::parse("\"0x90c42\"").unwrap(),
            Literal::Str("0x90c42".to_string())
        );
        assert_eq!(
            Literal::parse(r"'it\'s'").unwrap(),
            Literal::Str("it's".to_string())
        );
        assert_eq!(
            Literal::parse(r"'a\nb'").unwrap(),
            Literal::Str("a\nb".to_string())
        );
    }

    #[test]
    fn test_parse_control_listing() {
        let parsed = Literal::parse("('0x90c42', [('0x10344', 'Button1'), ('0x103a8', 'Edit1')])")
            .unwrap();
        let Literal::Tuple(items) = &parsed else {
            panic!("expected tuple, got {parsed:?}");
        };
        assert_eq!(items[0], Literal::Str("0x90c42".to_string()));
        let Literal::List(controls) = &items[1] else {
            panic!("expected list");
        };
        assert_eq!(controls.len(), 2);
    }

    #[test]
    fn test_parse_rejects_trailing_junk() {
        assert!(Literal::parse("(1, 2) extra").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(Literal::parse("").is_err());
        assert!(Literal::parse("(1, 2").is_err());
        assert!(Literal::parse("'open").is_err());
        assert!(Literal::parse("nope").is_err());
        assert!(Literal::parse("(1 2)").is_err());
    }
}
