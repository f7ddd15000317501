//! Engine context: the dialect registry plus the field size limit.
//!
//! There is no process-wide state. Two contexts never observe each other's
//! registrations or limits.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{CsvError, Result};
use crate::field::Field;
use crate::reader::Reader;
use crate::registry::{DialectRef, DialectRegistry};
use crate::sniffer::Sniffer;
use crate::stream::{IntoLine, TextSink};
use crate::writer::Writer;

/// Longest field, in characters, a reader accepts by default.
pub const DEFAULT_FIELD_SIZE_LIMIT: usize = 131_072;

/// Owns a [`DialectRegistry`] and the field size limit handed to readers.
///
/// # Example
///
/// ```
/// use csv_dialect::CsvContext;
///
/// let mut ctx = CsvContext::new();
/// ctx.registry_mut()
///     .register_params("semi", None, [("delimiter", ";")])
///     .unwrap();
///
/// let rows: Vec<Vec<String>> = ctx
///     .reader(["a;b\n", "1;2\n"], "semi")
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(rows[1], vec!["1", "2"]);
/// ```
#[derive(Debug, Clone)]
pub struct CsvContext {
    registry: DialectRegistry,
    field_size_limit: usize,
}

impl Default for CsvContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvContext {
    pub fn new() -> Self {
        Self::with_registry(DialectRegistry::new())
    }

    pub fn with_registry(registry: DialectRegistry) -> Self {
        Self {
            registry,
            field_size_limit: DEFAULT_FIELD_SIZE_LIMIT,
        }
    }

    #[inline]
    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut DialectRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn field_size_limit(&self) -> usize {
        self.field_size_limit
    }

    /// Replace the field size limit and return the previous one.
    ///
    /// Only non-negative integers are accepted; anything else is a
    /// [`CsvError::Type`] and leaves the limit unchanged.
    pub fn set_field_size_limit(&mut self, limit: impl Into<Field>) -> Result<usize> {
        let new_limit = match limit.into() {
            Field::Int(n) => usize::try_from(n)
                .map_err(|_| CsvError::Type(format!("field size limit must be non-negative, got {n}")))?,
            other => {
                return Err(CsvError::Type(format!(
                    "field size limit must be an integer, got {other:?}"
                )));
            }
        };
        debug!(limit = new_limit, "field size limit changed");
        Ok(std::mem::replace(&mut self.field_size_limit, new_limit))
    }

    /// Resolve a dialect by name or pass an instance through.
    pub fn dialect<'a>(&'a self, dialect: impl Into<DialectRef<'a>>) -> Result<&'a Dialect> {
        self.registry.get(dialect)
    }

    /// A reader over `lines` using the resolved dialect and the current
    /// field size limit.
    pub fn reader<'a, T>(
        &'a self,
        lines: T,
        dialect: impl Into<DialectRef<'a>>,
    ) -> Result<Reader<T::IntoIter>>
    where
        T: IntoIterator,
        T::Item: IntoLine,
    {
        let dialect = self.dialect(dialect)?.clone();
        Ok(Reader::new(lines, dialect).with_field_limit(self.field_size_limit))
    }

    /// A writer appending to `sink` using the resolved dialect.
    pub fn writer<'a, S: TextSink>(
        &'a self,
        sink: S,
        dialect: impl Into<DialectRef<'a>>,
    ) -> Result<Writer<S>> {
        let dialect = self.dialect(dialect)?.clone();
        Ok(Writer::new(sink, dialect))
    }

    /// A sniffer whose trial parses honor the current field size limit.
    pub fn sniffer(&self) -> Sniffer {
        let mut sniffer = Sniffer::new();
        sniffer.field_size_limit(self.field_size_limit);
        sniffer
    }
}
