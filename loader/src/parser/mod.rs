//! CSV input for Antolin exports.
//!
//! Exports are `;`-delimited, `"`-quoted and start with a header row that is
//! always discarded. Records are read as raw bytes and every field is
//! decoded strictly: a byte sequence that is invalid in the chosen encoding
//! is an error, never replaced.

use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use crate::error::{ConfigError, InputError};

/// Field delimiter of Antolin exports.
pub const DELIMITER: u8 = b';';

/// Quote character of Antolin exports.
pub const QUOTE: u8 = b'"';

// =============================================================================
// Encodings
// =============================================================================

/// A concrete text encoding fields are decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1252,
    Latin1,
}

impl TextEncoding {
    /// Canonical label, as accepted by `--encoding`.
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Latin1 => "iso-8859-1",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoding requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingChoice {
    /// Guess from the file contents.
    Auto,
    Fixed(TextEncoding),
}

impl Default for EncodingChoice {
    fn default() -> Self {
        EncodingChoice::Fixed(TextEncoding::Utf8)
    }
}

impl FromStr for EncodingChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(EncodingChoice::Auto),
            "utf-8" | "utf8" => Ok(EncodingChoice::Fixed(TextEncoding::Utf8)),
            "windows-1252" | "cp1252" => Ok(EncodingChoice::Fixed(TextEncoding::Windows1252)),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(EncodingChoice::Fixed(TextEncoding::Latin1)),
            other => Err(ConfigError::UnknownEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for EncodingChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingChoice::Auto => f.write_str("auto"),
            EncodingChoice::Fixed(enc) => enc.fmt(f),
        }
    }
}

/// Detect the encoding of raw bytes using chardet.
///
/// Anything chardet reports that we cannot decode falls back to UTF-8, so
/// strict decoding will still reject bytes that are not valid.
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    let (charset, confidence, _) = chardet::detect(bytes);
    debug!(%charset, confidence, "chardet result");

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => TextEncoding::Utf8,
        "iso-8859-1" | "latin-1" | "latin1" => TextEncoding::Latin1,
        "windows-1252" | "cp1252" => TextEncoding::Windows1252,
        other => {
            warn!(charset = other, "unsupported detected charset, assuming utf-8");
            TextEncoding::Utf8
        }
    }
}

/// Decode one field. Returns `None` on a malformed byte sequence.
///
/// ISO-8859-1 maps every byte to the code point of the same value and never
/// fails.
pub fn decode_field(bytes: &[u8], encoding: TextEncoding) -> Option<String> {
    let codec = match encoding {
        TextEncoding::Latin1 => return Some(bytes.iter().map(|&b| char::from(b)).collect()),
        TextEncoding::Utf8 => UTF_8,
        TextEncoding::Windows1252 => WINDOWS_1252,
    };

    codec
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

// =============================================================================
// Readers
// =============================================================================

/// An opened export, ready to iterate.
pub struct CsvInput<R> {
    pub reader: csv::Reader<R>,
    pub encoding: TextEncoding,
}

/// Build a reader for Antolin exports over any byte source.
///
/// The first row is consumed as a header. Rows with an unexpected number of
/// fields are passed through so the transformer can report them by line.
pub fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .has_headers(true)
        .flexible(true)
        .from_reader(source)
}

/// Open an export file.
///
/// With [`EncodingChoice::Auto`] the whole file is read up front so the
/// encoding can be detected; otherwise it is streamed.
pub fn open_input<P: AsRef<Path>>(
    path: P,
    choice: EncodingChoice,
) -> Result<CsvInput<Box<dyn Read>>, InputError> {
    let path = path.as_ref();

    match choice {
        EncodingChoice::Fixed(encoding) => {
            let file = File::open(path)?;
            Ok(CsvInput {
                reader: csv_reader(Box::new(file) as Box<dyn Read>),
                encoding,
            })
        }
        EncodingChoice::Auto => {
            let bytes = std::fs::read(path)?;
            let encoding = detect_encoding(&bytes);
            Ok(CsvInput {
                reader: csv_reader(Box::new(Cursor::new(bytes)) as Box<dyn Read>),
                encoding,
            })
        }
    }
}
