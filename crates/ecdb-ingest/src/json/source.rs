//! Streaming reader for the JSON release
//!
//! The release is one object whose `data` member maps EC numbers to entry
//! objects:
//!
//! ```json
//! {"release": "2025.1", "data": {"1.1.1.1": {"id": "1.1.1.1", ...}, ...}}
//! ```
//!
//! Only one entry is materialized at a time. Members other than `data` are
//! skipped without being built. Entries are handed to a callback in document
//! order; a callback error or the entry limit stops decoding early.

use crate::error::{IngestError, Result};
use crate::input::open_buffered;
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Member of the top-level object holding the entries
pub const DATA_KEY: &str = "data";

/// One enzyme entry of the release
pub type Entry = Map<String, Value>;

/// Streaming source of `(ec_number, entry)` pairs
pub struct EntrySource<R> {
    reader: R,
    limit: Option<usize>,
}

impl EntrySource<Box<dyn std::io::BufRead>> {
    /// Open a release file; `.gz` files are decompressed on the fly
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IngestError::SourceNotFound(path.to_path_buf()));
        }
        Ok(Self::new(open_buffered(path)?))
    }
}

impl<R: Read> EntrySource<R> {
    /// Wrap a reader. Pass a buffered reader; decoding reads byte by byte.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            limit: None,
        }
    }

    /// Stop after `limit` entries
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Hand every entry to `visit`, returning the number of entries visited
    ///
    /// The first error from `visit` aborts decoding and is returned as is.
    pub fn for_each<F>(self, visit: F) -> Result<usize>
    where
        F: FnMut(String, Entry) -> Result<()>,
    {
        let mut sink = EntrySink {
            visit,
            limit: self.limit,
            seen: 0,
            found_data: false,
            halt: None,
        };

        let mut de = serde_json::Deserializer::from_reader(self.reader);
        let outcome = DocumentSeed { sink: &mut sink }.deserialize(&mut de);

        match (outcome, sink.halt.take()) {
            (_, Some(Halt::Failed(err))) => Err(err),
            (_, Some(Halt::LimitReached)) => {
                debug!(entries = sink.seen, "Entry limit reached");
                Ok(sink.seen)
            }
            (Err(err), None) => Err(err.into()),
            (Ok(()), None) => {
                de.end()?;
                if !sink.found_data {
                    warn!("Release has no '{}' member; no entries ingested", DATA_KEY);
                }
                Ok(sink.seen)
            }
        }
    }
}

enum Halt {
    LimitReached,
    Failed(IngestError),
}

struct EntrySink<F> {
    visit: F,
    limit: Option<usize>,
    seen: usize,
    found_data: bool,
    halt: Option<Halt>,
}

impl<F> EntrySink<F>
where
    F: FnMut(String, Entry) -> Result<()>,
{
    fn accept<E: de::Error>(&mut self, ec_number: String, entry: Value) -> std::result::Result<(), E> {
        let entry = match entry {
            Value::Object(map) => map,
            other => {
                warn!(ec_number = %ec_number, kind = json_kind(&other), "Skipping non-object entry");
                return Ok(());
            }
        };

        if let Err(err) = (self.visit)(ec_number, entry) {
            self.halt = Some(Halt::Failed(err));
            return Err(E::custom("entry callback failed"));
        }

        self.seen += 1;
        if self.limit == Some(self.seen) {
            self.halt = Some(Halt::LimitReached);
            return Err(E::custom("entry limit reached"));
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Top-level document: finds `data`, skips everything else
struct DocumentSeed<'s, F> {
    sink: &'s mut EntrySink<F>,
}

impl<'de, F> DeserializeSeed<'de> for DocumentSeed<'_, F>
where
    F: FnMut(String, Entry) -> Result<()>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, F> Visitor<'de> for DocumentSeed<'_, F>
where
    F: FnMut(String, Entry) -> Result<()>,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a release object with a 'data' member")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let sink = self.sink;
        while let Some(key) = map.next_key::<String>()? {
            if key == DATA_KEY {
                sink.found_data = true;
                map.next_value_seed(EntriesSeed { sink: &mut *sink })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(())
    }
}

/// The `data` object: EC number to entry
struct EntriesSeed<'s, F> {
    sink: &'s mut EntrySink<F>,
}

impl<'de, F> DeserializeSeed<'de> for EntriesSeed<'_, F>
where
    F: FnMut(String, Entry) -> Result<()>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, F> Visitor<'de> for EntriesSeed<'_, F>
where
    F: FnMut(String, Entry) -> Result<()>,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object mapping EC numbers to entries")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(ec_number) = map.next_key::<String>()? {
            let entry: Value = map.next_value()?;
            self.sink.accept::<A::Error>(ec_number, entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const RELEASE: &str = r#"{
        "release": "2025.1",
        "version": {"major": 2025, "notes": ["a", "b"]},
        "data": {
            "1.1.1.1": {"id": "1.1.1.1", "recommended_name": "alcohol dehydrogenase"},
            "1.1.1.2": {"id": "1.1.1.2"},
            "1.1.1.3": {"id": "1.1.1.3"}
        },
        "trailer": [1, 2, 3]
    }"#;

    fn collect(source: EntrySource<&[u8]>) -> Result<Vec<(String, Entry)>> {
        let mut entries = Vec::new();
        source.for_each(|ec, entry| {
            entries.push((ec, entry));
            Ok(())
        })?;
        Ok(entries)
    }

    #[test]
    fn test_entries_in_document_order() {
        let entries = collect(EntrySource::new(RELEASE.as_bytes())).unwrap();
        let keys: Vec<&str> = entries.iter().map(|(ec, _)| ec.as_str()).collect();
        assert_eq!(keys, vec!["1.1.1.1", "1.1.1.2", "1.1.1.3"]);
        assert_eq!(
            entries[0].1.get("recommended_name").and_then(Value::as_str),
            Some("alcohol dehydrogenase")
        );
    }

    #[test]
    fn test_limit_stops_early() {
        let mut seen = Vec::new();
        let count = EntrySource::new(RELEASE.as_bytes())
            .with_limit(2)
            .for_each(|ec, _| {
                seen.push(ec);
                Ok(())
            })
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen, vec!["1.1.1.1", "1.1.1.2"]);
    }

    #[test]
    fn test_callback_error_propagates() {
        let err = EntrySource::new(RELEASE.as_bytes())
            .for_each(|ec, _| {
                if ec == "1.1.1.2" {
                    Err(IngestError::config("stop here"))
                } else {
                    Ok(())
                }
            })
            .unwrap_err();

        assert!(matches!(err, IngestError::Config(ref msg) if msg == "stop here"));
    }

    #[test]
    fn test_truncated_document_is_json_error() {
        let truncated = &RELEASE[..RELEASE.len() / 2];
        let err = collect(EntrySource::new(truncated.as_bytes())).unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
    }

    #[test]
    fn test_trailing_garbage_is_json_error() {
        let doc = r#"{"data": {}} extra"#;
        let err = collect(EntrySource::new(doc.as_bytes())).unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
    }

    #[test]
    fn test_missing_data_yields_nothing() {
        let entries = collect(EntrySource::new(r#"{"release": "x"}"#.as_bytes())).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let doc = r#"{"data": {"1.1.1.1": [1, 2], "1.1.1.2": {"id": "x"}}}"#;
        let entries = collect(EntrySource::new(doc.as_bytes())).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "1.1.1.2");
    }

    #[test]
    fn test_open_missing_file() {
        let err = EntrySource::open(Path::new("/nonexistent/release.json"))
            .err()
            .unwrap();
        assert!(matches!(err, IngestError::SourceNotFound(_)));
    }
}
