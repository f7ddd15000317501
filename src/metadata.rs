use crate::dialect::Dialect;
use crate::field_type::Type;

/// Everything [`Sniffer::analyze`](crate::Sniffer::analyze) learns about a
/// sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// The detected dialect.
    pub dialect: Dialect,
    /// Whether the first record looks like a header.
    pub has_header: bool,
    /// Modal number of fields per record.
    pub num_fields: usize,
    /// Header names, or `field_1..field_n` when there is no header.
    pub fields: Vec<String>,
    /// Inferred type of each column, header row excluded.
    pub types: Vec<Type>,
    /// Average record length in characters.
    pub avg_record_len: usize,
}

impl Metadata {
    /// Names `field_1..field_n`.
    pub fn generated_names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("field_{i}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names() {
        assert_eq!(
            Metadata::generated_names(3),
            vec!["field_1", "field_2", "field_3"]
        );
        assert!(Metadata::generated_names(0).is_empty());
    }
}
