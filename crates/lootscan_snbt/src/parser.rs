use crate::Error;
use serde_json::{Map, Number, Value};

/// Nesting limit for compounds and lists, same as serde_json's.
const MAX_DEPTH: usize = 128;

/// Recursive-descent reader over a relaxed tag string.
pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    /// Fails if anything but whitespace is left.
    pub(crate) fn finish(&mut self) -> Result<(), Error> {
        self.skip_whitespace();
        if self.pos < self.src.len() {
            return Err(Error::TrailingCharacters { at: self.pos });
        }
        Ok(())
    }

    pub(crate) fn parse_value(&mut self) -> Result<Value, Error> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(Error::UnexpectedEnd { expected: "a value" }),
            Some('{') => self.nested(Self::parse_compound),
            Some('[') => self.nested(Self::parse_list),
            Some(quote @ ('"' | '\'')) => self.parse_quoted(quote).map(Value::String),
            Some(_) => {
                let start = self.pos;
                let token = self.take_unquoted(|c| matches!(c, ',' | '}' | ']'));
                if token.is_empty() {
                    return Err(self.unexpected(start, "a value"));
                }
                Ok(scalar(token))
            }
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value, Error>) -> Result<Value, Error> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::RecursionLimit { at: self.pos });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_compound(&mut self) -> Result<Value, Error> {
        self.expect('{', "'{'")?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':', "':'")?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                Some(_) => return Err(self.unexpected(self.pos, "',' or '}'")),
                None => return Err(Error::UnexpectedEnd { expected: "',' or '}'" }),
            }
        }
    }

    fn parse_list(&mut self) -> Result<Value, Error> {
        self.expect('[', "'['")?;
        self.skip_typed_array_prefix();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                Some(_) => return Err(self.unexpected(self.pos, "',' or ']'")),
                None => return Err(Error::UnexpectedEnd { expected: "',' or ']'" }),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, Error> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_quoted(quote),
            Some(_) => {
                let start = self.pos;
                let key = self.take_unquoted(|c| c == ':' || c.is_whitespace() || c == '}');
                if key.is_empty() {
                    return Err(self.unexpected(start, "a key"));
                }
                Ok(key.to_owned())
            }
            None => Err(Error::UnexpectedEnd { expected: "a key" }),
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, Error> {
        self.pos += quote.len_utf8();
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(Error::UnexpectedEnd {
                    expected: "closing quote",
                });
            };
            let at = self.pos;
            self.pos += c.len_utf8();
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let Some(escaped) = self.peek() else {
                return Err(Error::UnexpectedEnd {
                    expected: "escape sequence",
                });
            };
            self.pos += escaped.len_utf8();
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'u' => {
                    let hex = self
                        .src
                        .get(self.pos..self.pos + 4)
                        .ok_or(Error::InvalidEscape { at })?;
                    let code = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidEscape { at })?;
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                    self.pos += 4;
                }
                '\\' | '/' | '"' | '\'' => out.push(escaped),
                _ => return Err(Error::InvalidEscape { at }),
            }
        }
    }

    /// `[B;`, `[I;` and `[L;` open typed arrays whose elements are plain numbers.
    fn skip_typed_array_prefix(&mut self) {
        self.skip_whitespace();
        let rest = &self.src[self.pos..];
        let mut chars = rest.chars();
        if let (Some('B' | 'I' | 'L'), Some(';')) = (chars.next(), chars.next()) {
            self.pos += 2;
        }
    }

    fn take_unquoted(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let rest = &src[self.pos..];
        let end = rest.find(|c: char| stop(c)).unwrap_or(rest.len());
        self.pos += end;
        rest[..end].trim()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), Error> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(_) => Err(self.unexpected(self.pos, expected)),
            None => Err(Error::UnexpectedEnd { expected }),
        }
    }

    fn unexpected(&self, at: usize, expected: &'static str) -> Error {
        Error::Unexpected {
            found: self.src[at..].chars().next().unwrap_or(' '),
            at,
            expected,
        }
    }
}

/// Maps an unquoted token to a bool, null, number or string.
fn scalar(token: &str) -> Value {
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Some(n) = number(token) {
        return Value::Number(n);
    }
    let suffixed = token
        .strip_suffix(|c: char| matches!(c, 'b' | 'B' | 's' | 'S' | 'l' | 'L' | 'f' | 'F' | 'd' | 'D'));
    if let Some(n) = suffixed.and_then(number) {
        return Value::Number(n);
    }
    Value::String(token.to_owned())
}

fn number(token: &str) -> Option<Number> {
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.') {
        return None;
    }
    if let Ok(int) = token.parse::<i64>() {
        return Some(Number::from(int));
    }
    token
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}
