//! Field inclusion policy and the resolved, ordered field list.
//!
//! A [`FieldFilter`] picks which declared fields participate in binding;
//! [`Schema::resolve`] applies it once, eagerly, and the result is fixed for
//! the owning codec's lifetime. Filtering never reorders: participating
//! fields keep their declaration order.

use regex::Regex;

use crate::error::ConfigError;
use crate::field::{FieldDef, Record};

/// Which declared fields participate in binding.
#[derive(Clone, Debug, Default)]
pub enum FieldFilter {
    /// Every declared field.
    #[default]
    All,
    /// Only the named fields, in declaration order.
    Use(Vec<String>),
    /// Every field except the named ones.
    Omit(Vec<String>),
    /// Fields whose whole name matches the pattern.
    UsePattern(String),
    /// Fields whose whole name does not match the pattern.
    OmitPattern(String),
}

/// The participating fields of a record type, in declaration order.
#[derive(Clone, Debug)]
pub struct Schema<T: 'static> {
    fields: Vec<FieldDef<T>>,
}

impl<T: Record> Schema<T> {
    /// Apply `filter` to the declared fields of `T`.
    ///
    /// # Errors
    ///
    /// `ConfigError` when a `Use`/`Omit` name is not declared on `T`, a
    /// pattern does not compile, or the filter leaves no fields at all.
    pub fn resolve(filter: &FieldFilter) -> Result<Self, ConfigError> {
        let declared = T::fields();
        let fields = match filter {
            FieldFilter::All => declared.to_vec(),
            FieldFilter::Use(names) => {
                check_names(declared, names)?;
                declared
                    .iter()
                    .filter(|f| names.iter().any(|n| n == f.name))
                    .copied()
                    .collect()
            }
            FieldFilter::Omit(names) => {
                check_names(declared, names)?;
                declared
                    .iter()
                    .filter(|f| !names.iter().any(|n| n == f.name))
                    .copied()
                    .collect()
            }
            FieldFilter::UsePattern(pattern) => {
                let re = compile_full(pattern)?;
                declared
                    .iter()
                    .filter(|f| re.is_match(f.name))
                    .copied()
                    .collect()
            }
            FieldFilter::OmitPattern(pattern) => {
                let re = compile_full(pattern)?;
                declared
                    .iter()
                    .filter(|f| !re.is_match(f.name))
                    .copied()
                    .collect()
            }
        };
        if fields.is_empty() {
            return Err(ConfigError::new("no participating fields after filtering"));
        }
        Ok(Self { fields })
    }
}

impl<T> Schema<T> {
    /// Participating fields, in declaration order.
    pub fn fields(&self) -> &[FieldDef<T>] {
        &self.fields
    }

    /// Participating field names, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of `name` among the participating fields.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

fn check_names<T>(declared: &[FieldDef<T>], names: &[String]) -> Result<(), ConfigError> {
    for name in names {
        if !declared.iter().any(|f| f.name == name) {
            return Err(ConfigError::field(name, "not a declared field"));
        }
    }
    Ok(())
}

fn compile_full(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| ConfigError::new(format!("invalid field pattern '{pattern}': {e}")))
}
