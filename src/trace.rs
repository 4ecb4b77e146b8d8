//! Reading branch traces.
//!
//! A trace is plain text with one conditional branch per line: the program
//! counter in hexadecimal followed by the outcome, e.g. `0x40a0b4 1`.
//! Outcomes may be written as `0`/`1` or `N`/`T`. Blank lines and lines
//! starting with `#` are ignored.

use std::fs::File;
use std::io::{ BufRead, BufReader };
use std::path::Path;

use crate::branch::*;
use crate::error::TraceError;

/// A list of [BranchRecord] read from a text trace.
#[derive(Clone, Debug, Default)]
pub struct TextTrace {
    pub data: Vec<BranchRecord>,
    pub name: String,
}
impl TextTrace {
    /// Read a trace from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let name = path.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut res = Self::from_reader(BufReader::new(f))?;
        res.name = name;
        Ok(res)
    }

    /// Read a trace from some buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, TraceError> {
        let mut data = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(record) = parse_line(&line, idx + 1)? {
                data.push(record);
            }
        }
        log::debug!("read {} branch records", data.len());
        Ok(Self { data, name: String::new() })
    }

    /// Return the number of records
    pub fn num_entries(&self) -> usize { self.data.len() }

    pub fn name(&self) -> &str { &self.name }

    /// Return a slice of records.
    pub fn as_slice(&self) -> &[BranchRecord] { &self.data }
}

/// Parse a single line of a trace. Returns [None] for lines without a record.
fn parse_line(line: &str, lineno: usize) -> Result<Option<BranchRecord>, TraceError> {
    let err = |reason: String| TraceError::Parse { line: lineno, reason };

    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let (Some(pc_str), Some(outcome_str), None) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(err(format!("expected '<pc> <outcome>', found '{}'", line)));
    };

    let digits = pc_str.strip_prefix("0x")
        .or_else(|| pc_str.strip_prefix("0X"))
        .unwrap_or(pc_str);
    let pc = u32::from_str_radix(digits, 16)
        .map_err(|e| err(format!("invalid pc '{}': {}", pc_str, e)))?;

    let outcome = match outcome_str {
        "1" | "T" | "t" => Outcome::T,
        "0" | "N" | "n" => Outcome::N,
        _ => return Err(err(format!("invalid outcome '{}'", outcome_str))),
    };
    Ok(Some(BranchRecord::new(pc, outcome)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_records() {
        let input = "# comment\n0x40a0b4 1\n\n40a0c0 0\n0XFFFFFFFC T\n";
        let trace = TextTrace::from_reader(input.as_bytes()).unwrap();
        assert_eq!(trace.as_slice(), &[
            BranchRecord::new(0x40a0b4, Outcome::T),
            BranchRecord::new(0x40a0c0, Outcome::N),
            BranchRecord::new(0xffff_fffc, Outcome::T),
        ]);
    }

    #[test]
    fn reports_line_numbers() {
        let input = "0x10 1\n0x14 2\n";
        let err = TextTrace::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_bad_pc() {
        let err = TextTrace::from_reader("0xzz 1".as_bytes()).unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 1, .. }));
        let err = TextTrace::from_reader("0x1 1 extra".as_bytes()).unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 1, .. }));
    }
}
