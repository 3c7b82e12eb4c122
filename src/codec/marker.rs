//! Marker grammar of the text artifact.
//!
//! Every marker is the text between `<<` and `>>`. A header marker holds
//! whitespace separated `key=value` pairs (`name`, `type` and optionally
//! `folder`), a payload marker holds the raw file content.

use std::fmt;

use snafu::OptionExt;
use tracing::debug;

use super::text::{MissingKeySnafu, ParseError, UnterminatedMarkerSnafu};

pub const OPEN: &str = "<<";
pub const CLOSE: &str = ">>";

/// Kind tag of folder headers. Files may not use it.
pub const FOLDER_KIND: &str = "folder";

const NAME_KEY: &str = "name";
const TYPE_KEY: &str = "type";
const FOLDER_KEY: &str = "folder";

/// Content of one marker together with the byte offset of its opening bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub offset: usize,
    pub content: &'a str,
}

impl Token<'_> {
    /// Headers are recognized by carrying a `name=` key.
    pub fn is_header(&self) -> bool {
        self.content.contains("name=")
    }
}

/// Splits `text` into its markers, ignoring anything between them.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    while let Some(start) = text[cursor..].find(OPEN) {
        let offset = cursor + start;
        let content_start = offset + OPEN.len();
        let length = text[content_start..]
            .find(CLOSE)
            .context(UnterminatedMarkerSnafu { offset })?;

        tokens.push(Token {
            offset,
            content: &text[content_start..content_start + length],
        });
        cursor = content_start + length + CLOSE.len();
    }

    debug!("Tokenized {} markers", tokens.len());
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub folder: Option<&'a str>,
}

impl<'a> Header<'a> {
    pub fn new(name: &'a str, kind: &'a str, folder: Option<&'a str>) -> Self {
        Self { name, kind, folder }
    }

    pub fn parse(token: Token<'a>) -> Result<Self, ParseError> {
        let mut name = None;
        let mut kind = None;
        let mut folder = None;

        for pair in token.content.split_whitespace() {
            match pair.split_once('=') {
                Some((NAME_KEY, value)) => name = Some(value),
                Some((TYPE_KEY, value)) => kind = Some(value),
                Some((FOLDER_KEY, value)) => folder = Some(value),
                _ => debug!("Ignoring unknown header field '{}' at {}", pair, token.offset),
            }
        }

        Ok(Self {
            name: name.context(MissingKeySnafu {
                key: NAME_KEY,
                offset: token.offset,
            })?,
            kind: kind.context(MissingKeySnafu {
                key: TYPE_KEY,
                offset: token.offset,
            })?,
            folder,
        })
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FOLDER_KIND
    }
}

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{OPEN}{NAME_KEY}={} {TYPE_KEY}={}", self.name, self.kind)?;
        if let Some(folder) = self.folder {
            write!(f, " {FOLDER_KEY}={folder}")?;
        }
        f.write_str(CLOSE)
    }
}

/// Whether `value` can be written into a header without breaking the grammar.
pub fn is_valid_header_value(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '=' | '<' | '>'))
}

/// Whether `payload` can be wrapped in a marker and read back unchanged.
///
/// A trailing `>` would merge with the closing bracket.
pub fn is_valid_payload(payload: &str) -> bool {
    !payload.contains(OPEN) && !payload.contains(CLOSE) && !payload.ends_with('>')
}
