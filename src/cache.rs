//! File-backed memoization of computed record sequences.
//!
//! [`cache_by`] implements one contract: if the cache file exists, read it
//! and never run the computation; otherwise run it once, persist the result
//! only when it is non-empty, and hand the computed records back directly.
//! An empty result leaves no file behind, so the computation is retried
//! next time.
//!
//! There is no staleness tracking and no cross-process coordination; two
//! processes that both find the file missing will both compute. Delete the
//! file to invalidate it.

use std::path::{Path, PathBuf};

use crate::codec::RowCodec;
use crate::field::Record;

#[cfg(feature = "json")]
use std::marker::PhantomData;

#[cfg(feature = "json")]
use crate::io::json::{json_writer, JsonReader};
#[cfg(feature = "json")]
use serde::{de::DeserializeOwned, Serialize};

/// A persistent store for one computed record sequence.
pub trait CacheHandle<T> {
    /// Whether a cached result is present.
    fn exists(&self) -> bool;

    /// Read the cached records.
    ///
    /// # Errors
    ///
    /// Open or read failures, and only then; a missing file is `exists`'s
    /// business, not an error here.
    fn read(&self) -> anyhow::Result<Vec<T>>;

    /// Persist `records`, replacing any previous content.
    fn write(&self, records: &[T]) -> anyhow::Result<()>;
}

/// Memoize `compute` through `cache`.
///
/// # Errors
///
/// Read failures on a hit; compute or write failures on a miss.
pub fn cache_by<T>(
    cache: &impl CacheHandle<T>,
    compute: impl FnOnce() -> anyhow::Result<Vec<T>>,
) -> anyhow::Result<Vec<T>> {
    if cache.exists() {
        return cache.read();
    }
    let records = compute()?;
    if !records.is_empty() {
        cache.write(&records)?;
    }
    Ok(records)
}

/// A cache persisted as a delimited file with a header line, through a
/// codec. The path is `base` with a `.csv` suffix appended unless already
/// present.
pub struct CsvCache<T: Record> {
    codec: RowCodec<T>,
    path: PathBuf,
}

impl<T: Record> CsvCache<T> {
    pub fn new(codec: &RowCodec<T>, base: impl AsRef<Path>) -> Self {
        Self {
            codec: codec.clone(),
            path: with_suffix(base.as_ref(), ".csv"),
        }
    }

    /// The file this cache reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Record> CacheHandle<T> for CsvCache<T> {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> anyhow::Result<Vec<T>> {
        self.codec.read_path(&self.path)
    }

    fn write(&self, records: &[T]) -> anyhow::Result<()> {
        self.codec.write_path(&self.path, records)?;
        Ok(())
    }
}

/// A cache persisted as JSON lines. The path is `base` with a `.jsonl`
/// suffix appended unless already present.
#[cfg(feature = "json")]
pub struct JsonCache<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

#[cfg(feature = "json")]
impl<T> JsonCache<T> {
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            path: with_suffix(base.as_ref(), ".jsonl"),
            _marker: PhantomData,
        }
    }

    /// The file this cache reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(feature = "json")]
impl<T: Serialize + DeserializeOwned> CacheHandle<T> for JsonCache<T> {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> anyhow::Result<Vec<T>> {
        JsonReader::new().read(self.path.clone()).collect()
    }

    fn write(&self, records: &[T]) -> anyhow::Result<()> {
        json_writer::<T, _>(records).to_path(&self.path)?;
        Ok(())
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let s = base.as_os_str().to_string_lossy();
    if s.ends_with(suffix) {
        base.to_path_buf()
    } else {
        PathBuf::from(format!("{s}{suffix}"))
    }
}
