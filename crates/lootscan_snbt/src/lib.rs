//! Relaxed tag parser for stringified NBT and loosely quoted JSON.
//!
//! Datapacks embed item data as SNBT strings (`{display:{Name:'{"text":"x"}'},Unbreakable:1b}`)
//! and text components as JSON strings. Both are accepted here and decoded into a
//! [`serde_json::Value`] so callers can walk them with the same accessors:
//!
//! - keys and scalar values may be unquoted
//! - strings may use single or double quotes
//! - numeric suffixes (`1b`, `2s`, `3L`, `1.5f`, `2.0d`) are dropped
//! - typed arrays (`[I; 1, 2]`) decode as plain arrays
//! - trailing commas are tolerated
//! - nesting deeper than 128 compounds or lists is rejected

mod parser;

use serde_json::Value;

use parser::Parser;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected character {found:?} at offset {at}, expected {expected}")]
    Unexpected {
        found: char,
        at: usize,
        expected: &'static str,
    },

    #[error("invalid escape sequence at offset {at}")]
    InvalidEscape { at: usize },

    #[error("trailing characters at offset {at}")]
    TrailingCharacters { at: usize },

    #[error("nesting too deep at offset {at}")]
    RecursionLimit { at: usize },
}

/// Parses a whole relaxed tag string.
pub fn from_str(input: &str) -> Result<Value, Error> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.finish()?;
    Ok(value)
}

/// Parses a tag string that must decode to a compound.
pub fn compound_from_str(input: &str) -> Result<serde_json::Map<String, Value>, Error> {
    match from_str(input)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::Unexpected {
            found: input.trim_start().chars().next().unwrap_or(' '),
            at: 0,
            expected: "a compound",
        }),
    }
}
