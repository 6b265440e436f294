//! JSON lines: one serialized object per line.
//!
//! JSON objects carry their own field names, so there is no column
//! alignment here; sessions keep the skip and tolerance behavior of their
//! delimited-text counterparts and parse each non-blank line with
//! `serde_json`. A malformed line is a read failure, not a default record.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Tolerance;
use crate::io::lines::{LineSource, Lines};
use crate::write::WriteSession;

/// Entry point for reading JSON-lines into `T`.
pub struct JsonReader<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonReader<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Start a read session over `source`. Strings are taken as in-memory
    /// content; use a `Path` for files.
    pub fn read(&self, source: impl Into<LineSource>) -> JsonSession<T> {
        JsonSession {
            source: source.into(),
            skip: 0,
            tolerance: None,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Default for JsonReader<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Start a write session rendering each record as one compact JSON line.
///
/// The session has no column dialect, so the header-related configuration
/// does not apply to it.
pub fn json_writer<T, I>(records: I) -> WriteSession<T, I>
where
    T: Serialize,
    I: IntoIterator,
{
    WriteSession::new(
        records,
        Box::new(|record: &T| -> anyhow::Result<String> {
            Ok(serde_json::to_string(record)?)
        }),
    )
}

/// A configurable, single-use read session over JSON lines.
pub struct JsonSession<T> {
    source: LineSource,
    skip: usize,
    tolerance: Option<Tolerance>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonSession<T> {
    /// Skip `n` leading lines.
    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Treat open failures whose cause chain contains an `E` as an empty
    /// sequence.
    pub fn tolerate<E: std::error::Error + 'static>(self) -> Self {
        self.tolerate_if(Tolerance::of::<E>())
    }

    /// Treat open failures matching `tolerance` as an empty sequence.
    pub fn tolerate_if(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Open the source and hand back the record iterator.
    ///
    /// # Errors
    ///
    /// Open failures, unless the configured tolerance absorbs them; an
    /// absorbed failure yields an empty iterator.
    pub fn records(self) -> anyhow::Result<JsonRecords<T>> {
        let Self {
            source,
            skip,
            tolerance,
            ..
        } = self;
        match open_json(source, skip) {
            Ok(mut records) => {
                records.tolerance = tolerance;
                Ok(records)
            }
            Err(err) => match tolerance {
                Some(t) if t.matches(&err) => Ok(JsonRecords::empty()),
                _ => Err(err),
            },
        }
    }

    /// Open and collect every record. Tolerated mid-stream failures end the
    /// collection quietly.
    pub fn collect(self) -> anyhow::Result<Vec<T>> {
        let mut out = Vec::new();
        self.records()?.drive(|record| out.push(record))?;
        Ok(out)
    }

    /// Open and feed every record to `f`. Error behavior matches
    /// [`JsonSession::collect`].
    pub fn each(self, f: impl FnMut(T)) -> anyhow::Result<()> {
        self.records()?.drive(f)
    }
}

fn open_json<T: DeserializeOwned>(
    source: LineSource,
    skip: usize,
) -> anyhow::Result<JsonRecords<T>> {
    let label = source.label();
    let mut lines = source.open()?;
    let mut consumed = 0usize;
    for _ in 0..skip {
        match lines.next() {
            Some(Ok(_)) => consumed += 1,
            Some(Err(e)) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read line {} in {}", consumed + 1, label)));
            }
            None => break,
        }
    }
    Ok(JsonRecords {
        drive: Some(JsonDrive {
            lines,
            label,
            consumed,
        }),
        stashed: None,
        tolerance: None,
        _marker: PhantomData,
    })
}

struct JsonDrive {
    lines: Lines,
    label: String,
    consumed: usize,
}

/// The open, single-pass record iterator behind a JSON read session.
///
/// Blank lines are skipped. A read or parse failure ends the iteration and
/// is stashed for [`JsonRecords::try_next`]. Dropping the iterator releases
/// the underlying source.
pub struct JsonRecords<T> {
    drive: Option<JsonDrive>,
    stashed: Option<anyhow::Error>,
    tolerance: Option<Tolerance>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonRecords<T> {
    fn empty() -> Self {
        Self {
            drive: None,
            stashed: None,
            tolerance: None,
            _marker: PhantomData,
        }
    }

    /// Like `next()`, but surfaces the failure that ended the iteration,
    /// if any.
    pub fn try_next(&mut self) -> anyhow::Result<Option<T>> {
        match self.next() {
            Some(record) => Ok(Some(record)),
            None => match self.stashed.take() {
                Some(err) => Err(err),
                None => Ok(None),
            },
        }
    }

    fn drive(mut self, mut f: impl FnMut(T)) -> anyhow::Result<()> {
        loop {
            match self.try_next() {
                Ok(Some(record)) => f(record),
                Ok(None) => return Ok(()),
                Err(err) => {
                    return match &self.tolerance {
                        Some(t) if t.matches(&err) => Ok(()),
                        _ => Err(err),
                    };
                }
            }
        }
    }
}

impl<T: DeserializeOwned> Iterator for JsonRecords<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let drive = self.drive.as_mut()?;
            match drive.lines.next() {
                Some(Ok(line)) => {
                    drive.consumed += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str(&line) {
                        Ok(record) => return Some(record),
                        Err(e) => {
                            let err = anyhow::Error::new(e).context(format!(
                                "parse JSON line {} in {}",
                                drive.consumed, drive.label
                            ));
                            self.drive = None;
                            self.stashed = Some(err);
                            return None;
                        }
                    }
                }
                Some(Err(e)) => {
                    let err = anyhow::Error::new(e).context(format!(
                        "read line {} in {}",
                        drive.consumed + 1,
                        drive.label
                    ));
                    self.drive = None;
                    self.stashed = Some(err);
                    return None;
                }
                None => {
                    self.drive = None;
                    return None;
                }
            }
        }
    }
}
