//! Content stream tokenizer.
//!
//! Produces operand values and operator tokens from raw content stream
//! bytes. Composite values (arrays, dictionaries) are collapsed into a
//! single operand, so the preprocessor above only ever sees flat
//! value/operator sequences. An inline image (`BI` ... `ID` ... `EI`) is
//! packaged into a single dictionary operand — its attributes plus the
//! raw data bytes under the `Data` key — so that `EI` receives the whole
//! image as its one operand and the attribute tokens never leak into the
//! operand buffer.

use std::collections::{HashMap, VecDeque};

use log::debug;
use smol_str::SmolStr;

use crate::error::{PdfError, Result};
use crate::model::PdfObject;
use crate::parser::{ContentToken, TokenSource};

/// Lexer over a single content stream (or several concatenated ones).
pub struct ContentLexer<'a> {
    data: &'a [u8],
    pos: usize,
    /// Tokens synthesized ahead of the cursor (inline image handling).
    pending: VecDeque<ContentToken>,
}

impl<'a> ContentLexer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    /// Current position in the stream.
    pub fn tell(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn is_whitespace(b: u8) -> bool {
        matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x00' | b'\x0c')
    }

    fn is_delimiter(b: u8) -> bool {
        matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
    }

    /// Skip whitespace and comments.
    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'%' {
                while let Some(c) = self.advance() {
                    if c == b'\r' || c == b'\n' {
                        break;
                    }
                }
                continue;
            }
            if !Self::is_whitespace(b) {
                return;
            }
            self.pos += 1;
        }
    }

    /// Parse a literal name (/Name), with #xx hex escapes.
    fn parse_name(&mut self) -> Result<PdfObject> {
        self.advance(); // skip '/'
        let mut name = Vec::new();

        while let Some(b) = self.peek() {
            if Self::is_whitespace(b) || Self::is_delimiter(b) {
                break;
            }
            if b == b'#' {
                if let (Some(c1), Some(c2)) = (self.peek_at(1), self.peek_at(2))
                    && c1.is_ascii_hexdigit()
                    && c2.is_ascii_hexdigit()
                {
                    self.pos += 3;
                    name.push((hex_value(c1) << 4) | hex_value(c2));
                    continue;
                }
                // Invalid escape: the '#' is dropped, following bytes kept.
                self.advance();
            } else {
                name.push(self.advance().unwrap());
            }
        }

        Ok(PdfObject::Name(String::from_utf8_lossy(&name).into_owned()))
    }

    /// Parse a number (integer or real).
    fn parse_number(&mut self) -> Result<PdfObject> {
        let start = self.pos;
        let mut has_dot = false;

        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.advance();
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                self.advance();
            } else if b == b'.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let s = std::str::from_utf8(&self.data[start..self.pos]).map_err(|_| {
            PdfError::TokenError {
                pos: start,
                msg: "invalid number".into(),
            }
        })?;

        if has_dot {
            let val: f64 = s.parse().map_err(|_| PdfError::TokenError {
                pos: start,
                msg: format!("invalid real: {}", s),
            })?;
            Ok(PdfObject::Real(val))
        } else {
            let val: i64 = s.parse().map_err(|_| PdfError::TokenError {
                pos: start,
                msg: format!("invalid int: {}", s),
            })?;
            Ok(PdfObject::Int(val))
        }
    }

    /// Parse a literal string (...), honoring escapes and nesting.
    fn parse_string(&mut self) -> Result<PdfObject> {
        self.advance(); // skip '('
        let mut result = Vec::new();
        let mut depth = 1;

        while depth > 0 {
            match self.advance() {
                Some(b'(') => {
                    depth += 1;
                    result.push(b'(');
                }
                Some(b')') => {
                    depth -= 1;
                    if depth > 0 {
                        result.push(b')');
                    }
                }
                Some(b'\\') => match self.advance() {
                    Some(b'n') => result.push(b'\n'),
                    Some(b'r') => result.push(b'\r'),
                    Some(b't') => result.push(b'\t'),
                    Some(b'b') => result.push(0x08),
                    Some(b'f') => result.push(0x0c),
                    Some(b'(') => result.push(b'('),
                    Some(b')') => result.push(b')'),
                    Some(b'\\') => result.push(b'\\'),
                    Some(b'\r') => {
                        // Line continuation: skip \r and an optional \n.
                        if self.peek() == Some(b'\n') {
                            self.advance();
                        }
                    }
                    Some(b'\n') => {}
                    Some(c) if c.is_ascii_digit() && c < b'8' => {
                        // Octal escape, 1-3 digits.
                        let mut octal = u32::from(c - b'0');
                        for _ in 0..2 {
                            match self.peek() {
                                Some(d) if d.is_ascii_digit() && d < b'8' => {
                                    self.advance();
                                    octal = octal * 8 + u32::from(d - b'0');
                                }
                                _ => break,
                            }
                        }
                        result.push((octal & 0xff) as u8);
                    }
                    Some(c) => result.push(c),
                    None => return Err(PdfError::UnexpectedEof),
                },
                Some(c) => result.push(c),
                None => return Err(PdfError::UnexpectedEof),
            }
        }

        Ok(PdfObject::String(result))
    }

    /// Parse a hex string <...>.
    fn parse_hex_string(&mut self) -> Result<PdfObject> {
        self.advance(); // skip '<'
        let mut result = Vec::new();
        let mut pending: Option<u8> = None;

        loop {
            match self.advance() {
                Some(b'>') => break,
                Some(b) if b.is_ascii_hexdigit() => match pending.take() {
                    Some(high) => result.push((high << 4) | hex_value(b)),
                    None => pending = Some(hex_value(b)),
                },
                Some(b) if Self::is_whitespace(b) => {}
                Some(b) => {
                    return Err(PdfError::TokenError {
                        pos: self.pos - 1,
                        msg: format!("invalid hex digit: {:?}", b as char),
                    });
                }
                None => return Err(PdfError::UnexpectedEof),
            }
        }
        // Odd digit count: the last digit is the high nibble.
        if let Some(high) = pending {
            result.push(high << 4);
        }

        Ok(PdfObject::String(result))
    }

    /// Parse an array [...], collapsing nested values into one object.
    fn parse_array(&mut self) -> Result<PdfObject> {
        self.advance(); // skip '['
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b']') => {
                    self.advance();
                    return Ok(PdfObject::Array(items));
                }
                Some(_) => {
                    if let Some(obj) = self.parse_value()? {
                        items.push(obj);
                    }
                }
                None => return Err(PdfError::UnexpectedEof),
            }
        }
    }

    /// Parse a dictionary <<...>>.
    fn parse_dict(&mut self) -> Result<PdfObject> {
        self.pos += 2; // skip '<<'
        let mut dict = HashMap::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    return Ok(PdfObject::Dict(dict));
                }
                Some(b'/') => {
                    let key = match self.parse_name()? {
                        PdfObject::Name(k) => k,
                        _ => unreachable!(),
                    };
                    self.skip_whitespace();
                    if let Some(value) = self.parse_value()? {
                        dict.insert(key, value);
                    }
                }
                Some(b) => {
                    // Broken key: drop the byte and keep scanning.
                    debug!("skipping non-name dict key byte {:?}", b as char);
                    self.advance();
                }
                None => return Err(PdfError::UnexpectedEof),
            }
        }
    }

    /// Parse a single value (never an operator). Returns `None` for
    /// keyword tokens in value position that carry no value.
    fn parse_value(&mut self) -> Result<Option<PdfObject>> {
        match self.peek() {
            Some(b'/') => self.parse_name().map(Some),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.') => self.parse_number().map(Some),
            Some(b'(') => self.parse_string().map(Some),
            Some(b'<') if self.peek_at(1) == Some(b'<') => self.parse_dict().map(Some),
            Some(b'<') => self.parse_hex_string().map(Some),
            Some(b'[') => self.parse_array().map(Some),
            Some(b'a'..=b'z' | b'A'..=b'Z') => {
                let tok = self.lex_operator_token();
                match tok.as_str() {
                    "true" => Ok(Some(PdfObject::Bool(true))),
                    "false" => Ok(Some(PdfObject::Bool(false))),
                    "null" => Ok(Some(PdfObject::Null)),
                    other => {
                        debug!("skipping keyword {:?} in value position", other);
                        Ok(None)
                    }
                }
            }
            Some(b) => {
                debug!("skipping stray byte {:?} in value position", b as char);
                self.advance();
                Ok(None)
            }
            None => Err(PdfError::UnexpectedEof),
        }
    }

    /// Lex an operator token: alphanumerics, with `*`, `'` and `"` as
    /// terminal characters (so `b*RG` lexes as `b*` then `RG`).
    fn lex_operator_token(&mut self) -> SmolStr {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'*' || b == b'\'' || b == b'"' {
                self.advance();
                break;
            }
            if !b.is_ascii_alphanumeric() {
                break;
            }
            self.advance();
        }
        SmolStr::new(String::from_utf8_lossy(&self.data[start..self.pos]))
    }

    /// Consume an inline image following `BI`: attribute pairs, the `ID`
    /// keyword and the raw data span. The image is returned as a single
    /// dictionary with the data bytes under the `Data` key.
    fn lex_inline_image(&mut self) -> Result<PdfObject> {
        let mut attrs = HashMap::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'/') => {
                    let key = match self.parse_name()? {
                        PdfObject::Name(k) => k,
                        _ => unreachable!(),
                    };
                    self.skip_whitespace();
                    if let Some(value) = self.parse_value()? {
                        attrs.insert(key, value);
                    }
                }
                Some(b'a'..=b'z' | b'A'..=b'Z') => {
                    let tok = self.lex_operator_token();
                    if tok == "ID" {
                        break;
                    }
                    debug!("skipping keyword {:?} in inline image attrs", tok.as_str());
                }
                Some(b) => {
                    debug!("skipping stray byte {:?} in inline image attrs", b as char);
                    self.advance();
                }
                None => return Err(PdfError::UnexpectedEof),
            }
        }
        attrs.insert("Data".into(), self.take_inline_data());
        self.consume_ei_marker();
        Ok(PdfObject::Dict(attrs))
    }

    /// Skip past the literal `EI` bytes closing an inline image.
    fn consume_ei_marker(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(b'E') && self.peek_at(1) == Some(b'I') {
            self.pos += 2;
        }
    }

    /// Extract the raw data span of an inline image, leaving the cursor on
    /// the trailing `EI` marker.
    fn take_inline_data(&mut self) -> PdfObject {
        // A single whitespace byte separates ID from the data.
        if self.peek().is_some_and(Self::is_whitespace) {
            self.advance();
        }
        let start = self.pos;
        let mut end = self.data.len();
        let mut i = self.pos;
        while i + 1 < self.data.len() {
            if self.data[i] == b'E'
                && self.data[i + 1] == b'I'
                && (i == start || Self::is_whitespace(self.data[i - 1]))
                && self
                    .data
                    .get(i + 2)
                    .is_none_or(|&b| Self::is_whitespace(b) || Self::is_delimiter(b))
            {
                end = i;
                break;
            }
            i += 1;
        }
        let mut span = &self.data[start..end];
        // Drop the whitespace byte padding the data from EI.
        if let [head @ .., last] = span
            && Self::is_whitespace(*last)
        {
            span = head;
        }
        self.pos = end;
        PdfObject::String(span.to_vec())
    }
}

impl TokenSource for ContentLexer<'_> {
    fn next_token(&mut self) -> Result<Option<ContentToken>> {
        if let Some(tok) = self.pending.pop_front() {
            return Ok(Some(tok));
        }

        loop {
            self.skip_whitespace();
            return match self.peek() {
                None => Ok(None),
                Some(b'a'..=b'z' | b'A'..=b'Z' | b'\'' | b'"') => {
                    let tok = self.lex_operator_token();
                    match tok.as_str() {
                        "true" => Ok(Some(ContentToken::Operand(PdfObject::Bool(true)))),
                        "false" => Ok(Some(ContentToken::Operand(PdfObject::Bool(false)))),
                        "null" => Ok(Some(ContentToken::Operand(PdfObject::Null))),
                        "BI" => {
                            let image = self.lex_inline_image()?;
                            self.pending
                                .push_back(ContentToken::Operator(SmolStr::new_static("ID")));
                            self.pending.push_back(ContentToken::Operand(image));
                            self.pending
                                .push_back(ContentToken::Operator(SmolStr::new_static("EI")));
                            Ok(Some(ContentToken::Operator(tok)))
                        }
                        "ID" => {
                            // Bare ID without BI: salvage the data span so its
                            // bytes are not tokenized as content.
                            let data = self.take_inline_data();
                            self.consume_ei_marker();
                            self.pending.push_back(ContentToken::Operand(data));
                            self.pending
                                .push_back(ContentToken::Operator(SmolStr::new_static("EI")));
                            Ok(Some(ContentToken::Operator(tok)))
                        }
                        _ => Ok(Some(ContentToken::Operator(tok))),
                    }
                }
                Some(b')' | b'>' | b']' | b'{' | b'}') => {
                    // Stray delimiter: drop it and keep lexing.
                    debug!("skipping stray delimiter at {}", self.pos);
                    self.advance();
                    continue;
                }
                Some(_) => match self.parse_value()? {
                    Some(obj) => Ok(Some(ContentToken::Operand(obj))),
                    None => continue,
                },
            };
        }
    }
}

const fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
