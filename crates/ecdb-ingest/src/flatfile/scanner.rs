//! Line scanner for the flat-file dump
//!
//! The dump is a sequence of records:
//!
//! ```text
//! ID	1.1.1.1
//! ********************************
//! PROTEIN
//! PR	#1# Homo sapiens <1,2>
//! KM	#1# 0.12 {NAD+} <3>
//! 	continued on an indented line
//! ///
//! ```
//!
//! `ID<TAB>` opens a record, `///` closes it. Within a record a
//! `CODE<TAB>value` line opens a field, indented lines continue it, and any
//! other non-tab line is a section heading that closes the open field.
//! Completed fields become [`TextFact`]s.

use super::labels::field_label;
use crate::error::{IngestError, Result};
use crate::input::open_buffered;
use crate::markup::Markup;
use ecdb_common::TextFact;
use std::io::{BufRead, Lines};
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Classification of one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// `///`
    Terminator,
    /// `ID<TAB>ec`, identifier trimmed
    RecordStart(&'a str),
    /// Starts with `*`
    Comment,
    /// Starts with tab or space; content trimmed
    Continuation(&'a str),
    /// `CODE<TAB>value`, both trimmed
    Field { code: &'a str, value: &'a str },
    /// Anything else, e.g. `PROTEIN`
    Heading,
}

/// Classify a line without its trailing newline
pub fn classify_line(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if line.starts_with("///") {
        return Line::Terminator;
    }
    if let Some(ec_number) = line.strip_prefix("ID\t") {
        return Line::RecordStart(ec_number.trim());
    }
    if line.starts_with('*') {
        return Line::Comment;
    }
    if line.starts_with(['\t', ' ']) {
        return Line::Continuation(line.trim());
    }
    match line.split_once('\t') {
        Some((code, _)) if code.trim().is_empty() => Line::Blank,
        Some((code, value)) => Line::Field {
            code: code.trim(),
            value: value.trim(),
        },
        None => Line::Heading,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Outside,
    InRecord {
        ec_number: String,
    },
    InField {
        ec_number: String,
        code: String,
        parts: Vec<String>,
    },
}

/// Record/field state machine over classified lines
#[derive(Debug)]
pub struct FieldScanner {
    state: ScanState,
}

impl Default for FieldScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Outside,
        }
    }

    /// Feed one line; returns the field it completed, if any
    pub fn step(&mut self, line: Line<'_>) -> Option<TextFact> {
        match line {
            Line::Blank => None,
            Line::Terminator => {
                let fact = self.close_field();
                self.state = ScanState::Outside;
                fact
            }
            Line::RecordStart(ec_number) => {
                let fact = self.close_field();
                self.state = if ec_number.is_empty() {
                    ScanState::Outside
                } else {
                    ScanState::InRecord {
                        ec_number: ec_number.to_string(),
                    }
                };
                fact
            }
            _ if self.state == ScanState::Outside => None,
            Line::Comment => None,
            Line::Continuation(text) => {
                if let ScanState::InField { parts, .. } = &mut self.state {
                    if !text.is_empty() {
                        parts.push(text.to_string());
                    }
                }
                None
            }
            Line::Field { code, value } => {
                let fact = self.close_field();
                if let ScanState::InRecord { ec_number } =
                    std::mem::replace(&mut self.state, ScanState::Outside)
                {
                    let parts = if value.is_empty() {
                        Vec::new()
                    } else {
                        vec![value.to_string()]
                    };
                    self.state = ScanState::InField {
                        ec_number,
                        code: code.to_string(),
                        parts,
                    };
                }
                fact
            }
            Line::Heading => self.close_field(),
        }
    }

    /// End of input: flush the open field
    pub fn finish(&mut self) -> Option<TextFact> {
        let fact = self.close_field();
        self.state = ScanState::Outside;
        fact
    }

    fn close_field(&mut self) -> Option<TextFact> {
        match std::mem::replace(&mut self.state, ScanState::Outside) {
            ScanState::InField {
                ec_number,
                code,
                parts,
            } => {
                let fact = build_text_fact(&ec_number, code, &parts);
                self.state = ScanState::InRecord { ec_number };
                fact
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}

fn build_text_fact(ec_number: &str, code: String, parts: &[String]) -> Option<TextFact> {
    let value_raw = parts.join(" ").trim().to_string();
    if value_raw.is_empty() {
        return None;
    }

    let markup = Markup::parse(&value_raw);
    Some(TextFact {
        ec_number: ec_number.to_string(),
        field_name: field_label(&code).map(str::to_string),
        field_code: code,
        value_text: markup.cleaned,
        protein_tokens: join(&markup.proteins),
        reference_tokens: join(&markup.references),
        qualifiers: join(&markup.qualifiers),
        value_raw,
    })
}

fn join(tokens: &[String]) -> Option<String> {
    (!tokens.is_empty()).then(|| tokens.join(";"))
}

/// Iterator of text facts read from a dump
pub struct TextRecords<R> {
    lines: Lines<R>,
    scanner: FieldScanner,
    first_line: bool,
    done: bool,
}

impl TextRecords<Box<dyn BufRead>> {
    /// Open a dump file; `.gz` files are decompressed on the fly
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IngestError::TextDumpNotFound(path.to_path_buf()));
        }
        Ok(Self::new(open_buffered(path)?))
    }
}

impl<R: BufRead> TextRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            scanner: FieldScanner::new(),
            first_line: true,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for TextRecords<R> {
    type Item = Result<TextFact>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            };

            let text = if self.first_line {
                self.first_line = false;
                line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line.as_str())
            } else {
                line.as_str()
            };
            let text = text.strip_suffix('\r').unwrap_or(text);

            if let Some(fact) = self.scanner.step(classify_line(text)) {
                return Some(Ok(fact));
            }
        }

        self.done = true;
        self.scanner.finish().map(Ok)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<TextFact> {
        TextRecords::new(text.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    fn summary(facts: &[TextFact]) -> Vec<(&str, &str, &str)> {
        facts
            .iter()
            .map(|f| (f.ec_number.as_str(), f.field_code.as_str(), f.value_raw.as_str()))
            .collect()
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line(""), Line::Blank);
        assert_eq!(classify_line("   "), Line::Blank);
        assert_eq!(classify_line("///"), Line::Terminator);
        assert_eq!(classify_line("ID\t1.1.1.1 "), Line::RecordStart("1.1.1.1"));
        assert_eq!(classify_line("*** comment"), Line::Comment);
        assert_eq!(classify_line("\tmore text "), Line::Continuation("more text"));
        assert_eq!(classify_line("  more"), Line::Continuation("more"));
        assert_eq!(
            classify_line("KM\t#1# 0.5 <2>"),
            Line::Field {
                code: "KM",
                value: "#1# 0.5 <2>"
            }
        );
        assert_eq!(classify_line("PROTEIN"), Line::Heading);
        assert_eq!(classify_line("ID 1.1.1.1"), Line::Heading);
    }

    #[test]
    fn test_continuation_joins_with_space() {
        let facts = scan("ID\tE1\nAB\tfoo\n\tbar\nCD\tbaz\n///\n");
        assert_eq!(summary(&facts), vec![("E1", "AB", "foo bar"), ("E1", "CD", "baz")]);
    }

    #[test]
    fn test_heading_closes_field() {
        let facts = scan("ID\t1.1.1.1\nPR\t#1# Homo sapiens <1>\nKINETICS\n\tdangling\nKM\t0.5\n///\n");
        assert_eq!(
            summary(&facts),
            vec![
                ("1.1.1.1", "PR", "#1# Homo sapiens <1>"),
                ("1.1.1.1", "KM", "0.5")
            ]
        );
        assert_eq!(facts[0].field_name.as_deref(), Some("protein"));
        assert_eq!(facts[0].protein_tokens.as_deref(), Some("1"));
        assert_eq!(facts[0].reference_tokens.as_deref(), Some("1"));
        assert_eq!(facts[0].value_text, "1 Homo sapiens");
    }

    #[test]
    fn test_lines_outside_records_are_ignored() {
        let facts = scan("KM\t1.0\nHEADER\n\tstray\nID\t2.2.2.2\nKM\t2.0\n///\nKM\t3.0\n");
        assert_eq!(summary(&facts), vec![("2.2.2.2", "KM", "2.0")]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let facts = scan("ID\t1.1.1.1\n\nKM\tfirst\n***********\n\n\tsecond\n///\n");
        assert_eq!(summary(&facts), vec![("1.1.1.1", "KM", "first second")]);
    }

    #[test]
    fn test_new_record_flushes_previous() {
        let facts = scan("ID\t1.1.1.1\nKM\t0.1\nID\t1.1.1.2\nKM\t0.2\n");
        assert_eq!(
            summary(&facts),
            vec![("1.1.1.1", "KM", "0.1"), ("1.1.1.2", "KM", "0.2")]
        );
    }

    #[test]
    fn test_empty_fields_are_dropped() {
        let facts = scan("ID\t1.1.1.1\nKM\t\nTN\t \n\t\nSA\t\n\tlate value\n///\n");
        assert_eq!(summary(&facts), vec![("1.1.1.1", "SA", "late value")]);
    }

    #[test]
    fn test_empty_identifier_opens_nothing() {
        let facts = scan("ID\t  \nKM\t0.1\n///\n");
        assert!(facts.is_empty());
    }

    #[test]
    fn test_byte_order_mark_and_crlf() {
        let facts = scan("\u{feff}ID\t1.1.1.1\r\nKM\t0.1\r\n///\r\n");
        assert_eq!(summary(&facts), vec![("1.1.1.1", "KM", "0.1")]);
    }

    #[test]
    fn test_unknown_code_has_no_label() {
        let facts = scan("ID\t1.1.1.1\nZZ\tsomething\n");
        assert_eq!(facts[0].field_name, None);
        assert_eq!(facts[0].display_name(), "ZZ");
    }

    #[test]
    fn test_qualifiers_joined() {
        let facts = scan("ID\t1.1.1.1\nKM\t#1,2# 0.5 {NAD+} (pH 7) <3>\n");
        assert_eq!(facts[0].protein_tokens.as_deref(), Some("1,2"));
        assert_eq!(facts[0].qualifiers.as_deref(), Some("NAD+;pH 7"));
        assert_eq!(facts[0].value_text, "1,2 0.5 NAD+ pH 7");
    }

    #[test]
    fn test_open_missing_dump() {
        let err = TextRecords::open(Path::new("/nonexistent/dump.txt"))
            .err()
            .unwrap();
        assert!(matches!(err, IngestError::TextDumpNotFound(_)));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"ID\t1.1.1.1\nKM\t\xff\xfe\n";
        let results: Vec<Result<TextFact>> = TextRecords::new(bytes).collect();
        assert!(matches!(results.last(), Some(Err(IngestError::Io(_)))));
    }
}
