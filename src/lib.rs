//! # Rowbind
//!
//! **Schema-driven binding between flat records and row-oriented text.**
//! Rowbind maps plain structs to delimited lines and spreadsheet-shaped
//! rows in both directions, with column alignment, recoverable per-cell
//! errors, and file-backed caching of computed record sequences.
//!
//! ## Key Features
//!
//! - **Compile-time field registration** - declare a struct once with
//!   [`record!`] and get name, kind, and accessors for every field
//! - **Total parsing** - a malformed or missing cell leaves its one field at
//!   the default value instead of failing the row
//! - **Column alignment** - bind fields to explicit slots, spreadsheet
//!   letters (`"A,C,F"`), or names resolved against a header row
//! - **Two-phase sessions** - configuration is free and infallible; the
//!   source is opened by the first consuming call
//! - **Tolerated failures** - treat a missing input file as an empty
//!   sequence instead of an error, per session
//! - **Custom conversions** - register per-field parse, preprocess, and
//!   format functions, checked eagerly when the codec is built
//! - **File-backed caching** - memoize a computed record sequence as a
//!   delimited or JSON-lines file
//!
//! ## Quick Start
//!
//! ```
//! use rowbind::{record, RowCodec};
//!
//! record! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Reading {
//!         pub sensor: String,
//!         pub value: Option<f64>,
//!         pub ok: bool,
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let codec = RowCodec::<Reading>::builder().sep(",").build()?;
//!
//! // Parse delimited lines; the malformed cell keeps its field default.
//! let readings = codec
//!     .reader("sensor,value,ok\nprobe-1,3.5,true\nprobe-2,,false")
//!     .skip_rows(1)
//!     .collect()?;
//! assert_eq!(readings[0].value, Some(3.5));
//! assert_eq!(readings[1].value, None);
//!
//! // Format back.
//! assert_eq!(codec.format_line(&readings[0]), "probe-1,3.5,true");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Codec
//!
//! A [`RowCodec`] binds one record type to one line dialect: the
//! participating fields (filtered by a [`FieldFilter`]), their custom
//! conversions, and the column separator. Build it once with
//! [`RowCodec::builder`]; every configuration mistake surfaces there as a
//! [`ConfigError`], before any data is touched. Codecs are immutable and
//! cheap to clone.
//!
//! ### Read sessions
//!
//! [`RowCodec::reader`] starts a [`ReadSession`] over a file path, an
//! in-memory string, or any reader. Configure skipping and column alignment
//! on the session, then consume it once: [`records`](ReadSession::records)
//! for a pull iterator, [`collect`](ReadSession::collect) or
//! [`each`](ReadSession::each) to drive it eagerly. Header-based alignment
//! consumes one row and resolves field names against it, failing with an
//! [`AlignError`] that names the first missing column.
//!
//! ### Write sessions
//!
//! [`RowCodec::write`] starts a [`WriteSession`] over any record iterator.
//! Configure headers, a UTF-8 encoding marker, or append mode, then sink it
//! to a path, a writer, or a string.
//!
//! ### Caching
//!
//! [`cache_by`] memoizes a computed record sequence through a
//! [`CacheHandle`]: an existing cache file is read and the computation never
//! runs; otherwise the computation runs once and a non-empty result is
//! persisted for next time.
//!
//! ## Feature Flags
//!
//! - `json` - JSON-lines reading, writing, and caching (default)
//! - `sheet` - typed sheet-row sessions for spreadsheet data (default)
//!
//! ## Module Overview
//!
//! - [`field`] - field kinds, values, and the [`record!`] macro
//! - [`schema`] - field inclusion policy and the resolved field list
//! - [`codec`] - the [`RowCodec`] facade and its builder
//! - [`session`] - delimited read sessions and the record iterator
//! - [`write`] - write sessions and sinks
//! - [`align`] - column letters, header resolution, and split limits
//! - [`cache`] - file-backed memoization
//! - [`io`] - line sources plus the JSON and sheet backends
//! - [`testing`] - tempfile fixtures for integration tests

pub mod align;
pub mod cache;
pub mod codec;
pub mod coerce;
pub mod error;
pub mod field;
pub mod format;
pub mod io;
pub mod parse;
pub mod row;
pub mod schema;
pub mod session;
pub mod testing;
pub mod write;

// General re-exports
pub use cache::{cache_by, CacheHandle, CsvCache};
pub use codec::{RowCodec, RowCodecBuilder, DEFAULT_SEP};
pub use coerce::ConvertError;
pub use error::{AlignError, ConfigError, Tolerance};
pub use field::{FieldDef, FieldKind, FieldScalar, FieldValue, Record};
pub use io::lines::LineSource;
pub use row::{Cell, Row};
pub use schema::{FieldFilter, Schema};
pub use session::{ReadSession, Records};
pub use write::WriteSession;

// Gated re-exports
#[cfg(feature = "json")]
pub use cache::JsonCache;

#[cfg(feature = "json")]
pub use io::json::{json_writer, JsonReader, JsonRecords, JsonSession};

#[cfg(feature = "sheet")]
pub use io::sheet::{SheetCell, SheetRecords, SheetRow, SheetSession, SheetSource};
