//! Script records and CSV parsing.
//!
//! A script is a plain CSV file with one record per line:
//!
//! ```text
//! intro.wav,<speak>Welcome back.</speak>
//! round_won.wav,<speak>You won the round!</speak>
//! ```
//!
//! The first field is the output filename (relative to the destination
//! directory), the second is the SSML payload sent verbatim to the
//! synthesis provider. Fields follow RFC 4180 quoting, so commas inside
//! a quoted field are fine; quoted fields cannot span lines because each
//! line is parsed as its own record.

use thiserror::Error;

/// One voice line to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Output filename, relative to the destination directory.
    pub output_name: String,
    /// SSML text passed verbatim to the provider.
    pub text: String,
}

/// Script parsing failure, reported with a 1-based line number.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The CSV reader rejected the line (unbalanced quotes, invalid UTF-8).
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: csv::Error,
    },

    /// The line did not contain exactly two fields.
    #[error("line {line}: expected 2 fields (filename, text), found {found}")]
    FieldCount { line: usize, found: usize },
}

impl ParseError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            Self::Malformed { line, .. } => *line,
            Self::FieldCount { line, .. } => *line,
        }
    }
}

/// Parse a whole script into records.
///
/// The input is trimmed of surrounding whitespace and split into lines;
/// every remaining line must parse as exactly `(filename, text)`. The
/// first bad line aborts the parse, so no synthesis is attempted for a
/// script with errors. Record order matches line order.
///
/// An input that is empty after trimming yields no records.
pub fn parse_records(raw: &str) -> Result<Vec<Record>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for (index, line) in trimmed.split('\n').enumerate() {
        records.push(parse_line(line, index + 1)?);
    }
    Ok(records)
}

/// Parse a single script line as one CSV record.
fn parse_line(line: &str, line_number: usize) -> Result<Record, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(line.as_bytes());

    let parsed = match reader.records().next() {
        Some(result) => result.map_err(|source| ParseError::Malformed {
            line: line_number,
            source,
        })?,
        // Blank lines produce no record at all.
        None => {
            return Err(ParseError::FieldCount {
                line: line_number,
                found: 0,
            });
        }
    };

    if parsed.len() != 2 {
        return Err(ParseError::FieldCount {
            line: line_number,
            found: parsed.len(),
        });
    }

    Ok(Record {
        output_name: parsed[0].to_string(),
        text: parsed[1].to_string(),
    })
}
