//! The codec: one record type bound to one delimited-line dialect.
//!
//! A [`RowCodec`] owns the resolved schema, the parser, and the formatter
//! for a record type, plus the separator of its line dialect. It is built
//! once through [`RowCodecBuilder`], which validates the whole configuration
//! eagerly, and is immutable and cheap to clone afterwards; sessions share
//! it instead of copying it.
//!
//! # Example
//!
//! ```
//! use rowbind::{record, RowCodec};
//!
//! record! {
//!     #[derive(Debug, Default, Clone)]
//!     pub struct Reading {
//!         pub sensor: String,
//!         pub value: f64,
//!         pub ok: bool,
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let codec = RowCodec::<Reading>::builder().sep(",").build()?;
//! let reading = codec.parse_line("probe-1,3.5,true");
//! assert_eq!(reading.value, 3.5);
//! assert_eq!(codec.format_line(&reading), "probe-1,3.5,true");
//! assert_eq!(codec.header_line(), "sensor,value,ok");
//! # Ok(())
//! # }
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::align::{split_limit, split_with_limit};
use crate::coerce::ConvertError;
use crate::error::ConfigError;
use crate::field::{FieldKind, FieldValue, Record};
use crate::format::{CellFormat, FormatFn, RowFormatter};
use crate::io::lines::LineSource;
use crate::parse::{CellParse, ParseFn, PreFn, RowParser};
use crate::schema::{FieldFilter, Schema};
use crate::session::ReadSession;
use crate::write::WriteSession;

#[cfg(feature = "sheet")]
use crate::io::sheet::{SheetSession, SheetSource};

/// The default column separator, a rarely-occurring modifier letter chosen
/// so ordinary prose survives unquoted.
pub const DEFAULT_SEP: &str = "\u{02CC}";

struct CodecInner<T: 'static> {
    schema: Schema<T>,
    parser: RowParser<T>,
    formatter: RowFormatter<T>,
}

/// Immutable binding between a record type and a delimited-line dialect.
pub struct RowCodec<T: Record> {
    inner: Arc<CodecInner<T>>,
    sep: String,
}

impl<T: Record> Clone for RowCodec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sep: self.sep.clone(),
        }
    }
}

impl<T: Record> std::fmt::Debug for RowCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowCodec")
            .field("fields", &self.inner.schema.names())
            .field("sep", &self.sep)
            .finish()
    }
}

impl<T: Record> RowCodec<T> {
    /// A codec over every declared field with the default separator and no
    /// custom conversions.
    ///
    /// # Errors
    ///
    /// `ConfigError` when a declared field's kind has no canonical
    /// conversion; such fields need [`RowCodecBuilder::parse_with`].
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    /// Start configuring a codec.
    pub fn builder() -> RowCodecBuilder<T> {
        RowCodecBuilder::new()
    }

    /// The participating fields.
    pub fn schema(&self) -> &Schema<T> {
        &self.inner.schema
    }

    /// The column separator.
    pub fn sep(&self) -> &str {
        &self.sep
    }

    /// Derive a codec with another separator. The schema, parser, and
    /// formatter are shared, not rebuilt.
    pub fn with_sep(&self, sep: impl Into<String>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sep: sep.into(),
        }
    }

    /// Parse one delimited line into a record.
    ///
    /// The line splits into at most one piece per participating field plus a
    /// single tail piece, so surplus columns are ignored rather than read.
    /// Malformed cells leave their fields at the default value.
    pub fn parse_line(&self, line: &str) -> T {
        let limit = split_limit(self.inner.schema.len(), None);
        let cells = split_with_limit(line, &self.sep, limit);
        self.inner.parser.parse_row(cells.as_slice(), None)
    }

    /// Format one record as a delimited line, without a line ending.
    pub fn format_line(&self, record: &T) -> String {
        self.inner.formatter.format_line(record, &self.sep)
    }

    /// Format one record as a row of cell texts, one per participating
    /// field.
    pub fn format_row(&self, record: &T) -> Vec<String> {
        self.inner.formatter.format_row(record)
    }

    /// The participating field names as a delimited header line.
    pub fn header_line(&self) -> String {
        self.inner.formatter.header_line(&self.sep)
    }

    /// Start a read session over delimited lines from `source`.
    ///
    /// Strings are taken as in-memory content; use a `Path` for files.
    /// Nothing is opened until the session's `records()` call.
    pub fn reader(&self, source: impl Into<LineSource>) -> ReadSession<T> {
        ReadSession::new(self.clone(), source.into())
    }

    /// Start a write session over `records`.
    pub fn write<I>(&self, records: I) -> WriteSession<T, I>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let codec = self.clone();
        WriteSession::new(
            records,
            Box::new(move |record: &T| Ok(codec.format_line(record))),
        )
        .with_dialect(self.sep.clone(), self.header_line())
    }

    /// Start a read session over sheet rows from `source`.
    #[cfg(feature = "sheet")]
    pub fn sheet_reader(&self, source: impl Into<SheetSource>) -> SheetSession<T> {
        SheetSession::new(self.clone(), source.into())
    }

    /// Read a whole file written by [`RowCodec::write_path`]: skips the
    /// header line and collects every record.
    ///
    /// # Errors
    ///
    /// Any open or read failure, with the path in the context chain.
    pub fn read_path(&self, path: impl AsRef<Path>) -> anyhow::Result<Vec<T>> {
        self.reader(path.as_ref()).skip_rows(1).collect()
    }

    /// Write `records` to `path` with a header line. Returns the record
    /// count, headers excluded.
    ///
    /// # Errors
    ///
    /// Any create or write failure, with the path in the context chain.
    pub fn write_path(&self, path: impl AsRef<Path>, records: &[T]) -> anyhow::Result<usize> {
        self.write(records).auto_header().to_path(path)
    }

    pub(crate) fn parser(&self) -> &RowParser<T> {
        &self.inner.parser
    }

    pub(crate) fn formatter(&self) -> &RowFormatter<T> {
        &self.inner.formatter
    }
}

/// Configures and validates a [`RowCodec`].
///
/// Registrations are checked when `build()` runs: names must belong to the
/// participating field list, a field takes at most one parse registration,
/// and every participating field without a canonical conversion must have
/// one.
pub struct RowCodecBuilder<T: Record> {
    sep: String,
    filter: FieldFilter,
    parsers: Vec<(String, ParseFn)>,
    pres: Vec<(String, PreFn)>,
    pre_text: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,
    formats: Vec<(String, FormatFn)>,
    _record: std::marker::PhantomData<fn() -> T>,
}

impl<T: Record> Default for RowCodecBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RowCodecBuilder<T> {
    pub fn new() -> Self {
        Self {
            sep: DEFAULT_SEP.to_owned(),
            filter: FieldFilter::All,
            parsers: Vec::new(),
            pres: Vec::new(),
            pre_text: None,
            formats: Vec::new(),
            _record: std::marker::PhantomData,
        }
    }

    /// Set the column separator. Multi-character separators are fine.
    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    /// Set the field inclusion policy.
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Bind only the named fields, in declaration order.
    pub fn use_fields<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        let names = names.into_iter().map(Into::into).collect();
        self.filter(FieldFilter::Use(names))
    }

    /// Bind every field except the named ones.
    pub fn omit_fields<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        let names = names.into_iter().map(Into::into).collect();
        self.filter(FieldFilter::Omit(names))
    }

    /// Bind fields whose whole name matches the pattern.
    pub fn use_pattern(self, pattern: impl Into<String>) -> Self {
        self.filter(FieldFilter::UsePattern(pattern.into()))
    }

    /// Bind fields whose whole name does not match the pattern.
    pub fn omit_pattern(self, pattern: impl Into<String>) -> Self {
        self.filter(FieldFilter::OmitPattern(pattern.into()))
    }

    /// Register a custom parse function for one field. It receives the
    /// cell's text and replaces the canonical conversion entirely; an `Err`
    /// leaves the field at its default like any other malformed cell.
    pub fn parse_with(
        mut self,
        field: impl Into<String>,
        f: impl Fn(&str) -> Result<FieldValue, ConvertError> + Send + Sync + 'static,
    ) -> Self {
        self.parsers.push((field.into(), Box::new(f)));
        self
    }

    /// Register a text preprocessor for one field, applied to the cell text
    /// before the field's canonical conversion.
    pub fn preprocess(
        mut self,
        field: impl Into<String>,
        f: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.pres.push((field.into(), Box::new(f)));
        self
    }

    /// Register a text preprocessor for every text field that has no
    /// per-field registration.
    pub fn preprocess_text(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.pre_text = Some(Arc::new(f));
        self
    }

    /// Register a custom format function for one field. It receives the
    /// present value; absent fields still render as empty text.
    pub fn format_with(
        mut self,
        field: impl Into<String>,
        f: impl Fn(&FieldValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formats.push((field.into(), Box::new(f)));
        self
    }

    /// Validate the configuration and build the codec.
    ///
    /// # Errors
    ///
    /// `ConfigError` on an invalid filter, a registration naming a field
    /// outside the participating list, duplicate or conflicting
    /// registrations, or a participating field that ends up without any
    /// conversion.
    pub fn build(self) -> Result<RowCodec<T>, ConfigError> {
        let schema = Schema::<T>::resolve(&self.filter)?;

        let mut parse_map = HashMap::new();
        for (name, f) in self.parsers {
            check_participating(&schema, &name)?;
            if parse_map.insert(name.clone(), f).is_some() {
                return Err(ConfigError::field(name, "parse function already registered"));
            }
        }
        let mut pre_map = HashMap::new();
        for (name, f) in self.pres {
            check_participating(&schema, &name)?;
            if parse_map.contains_key(&name) {
                return Err(ConfigError::field(
                    name,
                    "both a parse function and a preprocessor registered",
                ));
            }
            if pre_map.insert(name.clone(), f).is_some() {
                return Err(ConfigError::field(name, "preprocessor already registered"));
            }
        }
        let mut format_map = HashMap::new();
        for (name, f) in self.formats {
            check_participating(&schema, &name)?;
            if format_map.insert(name.clone(), f).is_some() {
                return Err(ConfigError::field(name, "format function already registered"));
            }
        }

        let mut parse_attrs = Vec::with_capacity(schema.len());
        let mut format_attrs = Vec::with_capacity(schema.len());
        for def in schema.fields() {
            let parse = match (parse_map.remove(def.name), pre_map.remove(def.name)) {
                (Some(f), _) => CellParse::Custom(f),
                (None, Some(pre)) => match def.kind {
                    FieldKind::Other(name) => {
                        return Err(ConfigError::field(
                            def.name,
                            format!("preprocessor requires a canonical kind, found {name}"),
                        ));
                    }
                    kind => CellParse::Pre { pre, kind },
                },
                (None, None) => match (def.kind, &self.pre_text) {
                    (FieldKind::Other(name), _) => {
                        return Err(ConfigError::field(
                            def.name,
                            format!("no parse function registered for {name}"),
                        ));
                    }
                    (FieldKind::Text, Some(all)) => {
                        let all = Arc::clone(all);
                        CellParse::Pre {
                            pre: Box::new(move |s| all(s)),
                            kind: FieldKind::Text,
                        }
                    }
                    (kind, _) => CellParse::Scalar(kind),
                },
            };
            parse_attrs.push((*def, parse));

            let format = match format_map.remove(def.name) {
                Some(f) => CellFormat::Custom(f),
                None => CellFormat::Natural,
            };
            format_attrs.push((*def, format));
        }

        Ok(RowCodec {
            inner: Arc::new(CodecInner {
                schema,
                parser: RowParser::new(parse_attrs),
                formatter: RowFormatter::new(format_attrs),
            }),
            sep: self.sep,
        })
    }
}

fn check_participating<T>(schema: &Schema<T>, name: &str) -> Result<(), ConfigError> {
    if schema.position(name).is_none() {
        return Err(ConfigError::field(name, "not a participating field"));
    }
    Ok(())
}
