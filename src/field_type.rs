use std::fmt;

/// Classification of a single sample cell or of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Type {
    /// Non-negative whole number.
    Unsigned,
    /// Negative whole number.
    Signed,
    Float,
    /// `true`/`false`, `yes`/`no`, `on`/`off` and single-letter forms.
    Boolean,
    Date,
    DateTime,
    /// Empty cell or a conventional missing-value marker such as `NA`.
    NULL,
    /// Anything else.
    #[default]
    Text,
}

/// Coarse grouping of [`Type`]s used when comparing a header cell against
/// the data below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Null,
    Numeric,
    Boolean,
    Temporal,
    Text,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Unsigned => "Unsigned",
            Type::Signed => "Signed",
            Type::Float => "Float",
            Type::Boolean => "Boolean",
            Type::Date => "Date",
            Type::DateTime => "DateTime",
            Type::NULL => "NULL",
            Type::Text => "Text",
        };
        f.write_str(name)
    }
}

impl Type {
    /// Number of variants.
    pub const COUNT: usize = 8;

    /// Array index for per-type counters, ordered by [`Type::priority`].
    #[inline]
    pub const fn as_index(&self) -> usize {
        self.priority() as usize
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Unsigned | Type::Signed | Type::Float)
    }

    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Type::Date | Type::DateTime)
    }

    pub fn class(&self) -> TypeClass {
        match self {
            Type::NULL => TypeClass::Null,
            Type::Boolean => TypeClass::Boolean,
            t if t.is_numeric() => TypeClass::Numeric,
            t if t.is_temporal() => TypeClass::Temporal,
            _ => TypeClass::Text,
        }
    }

    /// Generality rank: merging two types never yields a lower rank.
    pub const fn priority(&self) -> u8 {
        match self {
            Type::NULL => 0,
            Type::Boolean => 1,
            Type::Unsigned => 2,
            Type::Signed => 3,
            Type::Float => 4,
            Type::Date => 5,
            Type::DateTime => 6,
            Type::Text => 7,
        }
    }

    /// The most specific type able to represent values of both `self` and
    /// `other`.
    pub fn merge(self, other: Type) -> Type {
        if self == other {
            return self;
        }
        match (self, other) {
            (Type::NULL, t) | (t, Type::NULL) => t,
            (Type::Unsigned, Type::Signed) | (Type::Signed, Type::Unsigned) => Type::Signed,
            (a, b) if a.is_numeric() && b.is_numeric() => Type::Float,
            (a, b) if a.is_temporal() && b.is_temporal() => Type::DateTime,
            _ => Type::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_merge() {
        assert_eq!(Type::Unsigned.merge(Type::Unsigned), Type::Unsigned);
        assert_eq!(Type::Unsigned.merge(Type::Signed), Type::Signed);
        assert_eq!(Type::Signed.merge(Type::Float), Type::Float);
        assert_eq!(Type::NULL.merge(Type::Unsigned), Type::Unsigned);
        assert_eq!(Type::Date.merge(Type::DateTime), Type::DateTime);
        assert_eq!(Type::Boolean.merge(Type::Unsigned), Type::Text);
        assert_eq!(Type::Boolean.merge(Type::Text), Type::Text);
    }

    #[test]
    fn test_type_class() {
        assert_eq!(Type::Unsigned.class(), TypeClass::Numeric);
        assert_eq!(Type::Float.class(), TypeClass::Numeric);
        assert_eq!(Type::DateTime.class(), TypeClass::Temporal);
        assert_eq!(Type::Boolean.class(), TypeClass::Boolean);
        assert_eq!(Type::NULL.class(), TypeClass::Null);
        assert_eq!(Type::Text.class(), TypeClass::Text);
    }

    #[test]
    fn test_index_matches_count() {
        assert_eq!(Type::Text.as_index(), Type::COUNT - 1);
        assert_eq!(Type::NULL.as_index(), 0);
    }
}
