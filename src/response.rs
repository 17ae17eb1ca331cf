//! Raw modem responses and the small tokenizer used to pick fields out of them.

use alloc::string::String;
use core::fmt;

use atat::nom::FindSubstring as _;

/// Text shown in place of a response when nothing arrived before the deadline.
pub const NO_RESPONSE: &str = "?";

/// What one transaction captured from the serial link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Response {
    /// Non-empty text read within the deadline.
    Text(String),
    /// No byte arrived before the deadline.
    #[default]
    NoResponse,
}

impl Response {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            Self::NoResponse
        } else {
            Self::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    /// The captured text, or [`NO_RESPONSE`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::NoResponse => NO_RESPONSE,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NoResponse => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::NoResponse)
    }

    /// True when `token` appears anywhere in the captured text.
    pub fn contains(&self, token: &str) -> bool {
        self.text()
            .map(|text| text.find_substring(token).is_some())
            .unwrap_or(false)
    }

    /// True when the universal success token is present.
    pub fn is_ok(&self) -> bool {
        self.contains(crate::at::OK)
    }

    /// Start tokenizing the response text.
    pub fn tokens(&self) -> Result<Tokens<'_>, ParseError> {
        self.text().map(Tokens::new).ok_or(ParseError::NoResponse)
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::NoResponse => String::from(NO_RESPONSE),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    NoResponse,
    MarkerNotFound(&'static str),
    DelimiterNotFound(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response"),
            Self::MarkerNotFound(marker) => write!(f, "marker {marker:?} not found"),
            Self::DelimiterNotFound(delim) => write!(f, "delimiter {delim:?} not found"),
        }
    }
}

/// Forward-only cursor over response text.
#[derive(Debug, Clone, Copy)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Skip past the first occurrence of `marker`.
    pub fn after(mut self, marker: &'static str) -> Result<Self, ParseError> {
        let at = self
            .rest
            .find_substring(marker)
            .ok_or(ParseError::MarkerNotFound(marker))?;
        self.rest = &self.rest[at + marker.len()..];
        Ok(self)
    }

    /// Take the text up to `delim` and move past it.
    pub fn until(&mut self, delim: char) -> Result<&'a str, ParseError> {
        let at = self
            .rest
            .find(delim)
            .ok_or(ParseError::DelimiterNotFound(delim))?;
        let field = &self.rest[..at];
        self.rest = &self.rest[at + delim.len_utf8()..];
        Ok(field)
    }

    /// Take the text up to `delim`, or everything left on the line.
    pub fn field(&mut self, delim: char) -> &'a str {
        match self.until(delim) {
            Ok(field) => field,
            Err(_) => {
                let end = self.rest.find(['\r', '\n']).unwrap_or(self.rest.len());
                let field = &self.rest[..end];
                self.rest = &self.rest[end..];
                field
            }
        }
    }

    pub fn rest(&self) -> &'a str {
        self.rest
    }
}

/// Parse the leading integer of `field`, ignoring leading whitespace and any
/// trailing garbage. Anything without leading digits yields 0.
pub fn int_or_zero(field: &str) -> i32 {
    let field = field.trim_start();
    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field.strip_prefix('+').unwrap_or(field)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i32>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}
