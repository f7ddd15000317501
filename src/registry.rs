//! Named dialect registry.

use foldhash::{HashMap, HashMapExt};
use tracing::debug;

use crate::dialect::{Dialect, DialectBuilder};
use crate::error::{CsvError, Result};

/// Names of the dialects every registry starts with.
pub const BUILTIN_DIALECTS: &[&str] = &["excel", "excel-tab", "unix"];

/// A dialect given either by registered name or directly.
#[derive(Debug, Clone, Copy)]
pub enum DialectRef<'a> {
    Name(&'a str),
    Instance(&'a Dialect),
}

impl<'a> From<&'a str> for DialectRef<'a> {
    fn from(name: &'a str) -> Self {
        DialectRef::Name(name)
    }
}

impl<'a> From<&'a String> for DialectRef<'a> {
    fn from(name: &'a String) -> Self {
        DialectRef::Name(name)
    }
}

impl<'a> From<&'a Dialect> for DialectRef<'a> {
    fn from(dialect: &'a Dialect) -> Self {
        DialectRef::Instance(dialect)
    }
}

/// Mapping from name to [`Dialect`], seeded with `excel`, `excel-tab` and
/// `unix`.
///
/// Registering an existing name replaces it.
#[derive(Debug, Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Dialect>,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRegistry {
    /// Create a registry holding the built-in dialects.
    pub fn new() -> Self {
        let mut dialects = HashMap::with_capacity(BUILTIN_DIALECTS.len());
        dialects.insert("excel".to_string(), Dialect::excel());
        dialects.insert("excel-tab".to_string(), Dialect::excel_tab());
        dialects.insert("unix".to_string(), Dialect::unix());
        Self { dialects }
    }

    /// Create a registry with no dialects at all.
    pub fn empty() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    /// Register `dialect` under `name`, returning the dialect it replaced.
    pub fn register(&mut self, name: impl Into<String>, dialect: Dialect) -> Option<Dialect> {
        let name = name.into();
        debug!(name = %name, dialect = %dialect, "registering dialect");
        self.dialects.insert(name, dialect)
    }

    /// Derive a dialect from `base` (or the `excel` defaults), apply the text
    /// parameters and register the result.
    pub fn register_params<'p, I>(
        &mut self,
        name: impl Into<String>,
        base: Option<DialectRef<'_>>,
        params: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        let mut builder = match base {
            Some(base) => self.derive(base)?,
            None => DialectBuilder::new(),
        };
        let dialect = builder.params(params)?.build()?;
        self.register(name, dialect);
        Ok(())
    }

    /// Resolve a dialect reference. Instances pass through untouched.
    pub fn get<'a>(&'a self, dialect: impl Into<DialectRef<'a>>) -> Result<&'a Dialect> {
        match dialect.into() {
            DialectRef::Instance(d) => Ok(d),
            DialectRef::Name(name) => self
                .dialects
                .get(name)
                .ok_or_else(|| CsvError::UnknownDialect(name.to_string())),
        }
    }

    /// Builder seeded from a registered or given dialect.
    pub fn derive<'a>(&'a self, base: impl Into<DialectRef<'a>>) -> Result<DialectBuilder> {
        self.get(base).map(DialectBuilder::from)
    }

    /// Registered names in sorted order.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dialects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Remove a dialect, returning it.
    pub fn unregister(&mut self, name: &str) -> Result<Dialect> {
        let removed = self
            .dialects
            .remove(name)
            .ok_or_else(|| CsvError::UnknownDialect(name.to_string()))?;
        debug!(name, "unregistered dialect");
        Ok(removed)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.dialects.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Quoting;

    #[test]
    fn test_seeded_with_builtins() {
        let registry = DialectRegistry::new();
        assert_eq!(registry.list(), vec!["excel", "excel-tab", "unix"]);
        assert_eq!(registry.get("excel-tab").unwrap().delimiter(), '\t');
        assert_eq!(registry.get("unix").unwrap().quoting(), Quoting::All);
    }

    #[test]
    fn test_register_get_unregister() {
        let mut registry = DialectRegistry::new();
        let custom = Dialect::builder().delimiter(';').build().unwrap();
        assert!(registry.register("custom", custom).is_none());

        assert!(registry.list().contains(&"custom"));
        assert_eq!(registry.get("custom").unwrap().delimiter(), ';');

        registry.unregister("custom").unwrap();
        assert!(!registry.contains("custom"));

        let err = registry.get("custom").unwrap_err();
        assert!(err.to_string().contains("unknown dialect"));
        let err = registry.unregister("custom").unwrap_err();
        assert!(err.to_string().contains("unknown dialect"));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = DialectRegistry::new();
        registry.register("d", Dialect::excel());
        let previous = registry.register("d", Dialect::excel_tab());
        assert_eq!(previous, Some(Dialect::excel()));
        assert_eq!(registry.get("d").unwrap().delimiter(), '\t');
    }

    #[test]
    fn test_instance_passes_through() {
        let registry = DialectRegistry::new();
        let d = Dialect::builder().delimiter(';').build().unwrap();
        let got = registry.get(&d).unwrap();
        assert!(std::ptr::eq(got, &d));
    }

    #[test]
    fn test_register_params_from_base() {
        let mut registry = DialectRegistry::new();
        registry
            .register_params("base", None, [("delimiter", ";"), ("quotechar", "'")])
            .unwrap();
        registry
            .register_params(
                "derived",
                Some(DialectRef::Name("base")),
                [("quotechar", "\""), ("skipinitialspace", "true")],
            )
            .unwrap();

        let derived = registry.get("derived").unwrap();
        assert_eq!(derived.delimiter(), ';');
        assert_eq!(derived.quotechar(), Some('"'));
        assert!(derived.skipinitialspace());

        let err = registry
            .register_params("x", Some(DialectRef::Name("missing")), Vec::new())
            .unwrap_err();
        assert!(matches!(err, CsvError::UnknownDialect(_)));
    }
}
