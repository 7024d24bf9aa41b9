//! Field type catalogue: which types each database accepts and which
//! validations each type supports.

use crate::{application::DatabaseType, entity::ValidationKind};

const COMMON_TYPES: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "BigDecimal",
    "Float",
    "Double",
    "Enum",
    "Boolean",
    "LocalDate",
    "ZonedDateTime",
    "Instant",
    "Duration",
    "UUID",
    "Blob",
    "AnyBlob",
    "ImageBlob",
    "TextBlob",
];

const CASSANDRA_TYPES: &[&str] = &[
    "String",
    "Integer",
    "Long",
    "BigDecimal",
    "Float",
    "Double",
    "Boolean",
    "LocalDate",
    "Instant",
    "UUID",
    "Blob",
    "AnyBlob",
    "ImageBlob",
    "TextBlob",
];

/// Whether `field_type` is a primitive type of `database_type`.
pub fn is_valid_type(database_type: DatabaseType, field_type: &str) -> bool {
    match database_type {
        DatabaseType::Cassandra => CASSANDRA_TYPES.contains(&field_type),
        DatabaseType::Sql
        | DatabaseType::Mongodb
        | DatabaseType::Couchbase
        | DatabaseType::Neo4j
        | DatabaseType::No => COMMON_TYPES.contains(&field_type),
    }
}

/// Binary payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Any,
    Image,
    Text,
}

impl BlobKind {
    pub fn of(field_type: &str) -> Option<Self> {
        match field_type {
            "Blob" | "AnyBlob" => Some(Self::Any),
            "ImageBlob" => Some(Self::Image),
            "TextBlob" => Some(Self::Text),
            _ => None,
        }
    }

    /// The `fieldTypeBlobContent` spelling.
    pub fn content(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

/// Validations supported by a field of type `field_type`.
///
/// `is_enum` marks fields whose type is a declared enum; those only accept
/// presence rules. Returns `None` for types outside the catalogue.
pub fn supported_validations(field_type: &str, is_enum: bool) -> Option<&'static [ValidationKind]> {
    use ValidationKind::*;

    if is_enum {
        return Some(&[Required, Unique]);
    }
    match field_type {
        "String" => Some(&[Required, Unique, MinLength, MaxLength, Pattern]),
        "Integer" | "Long" | "BigDecimal" | "Float" | "Double" => {
            Some(&[Required, Unique, Min, Max])
        }
        "Blob" | "AnyBlob" | "ImageBlob" => Some(&[Required, Unique, MinBytes, MaxBytes]),
        "Enum" | "Boolean" | "LocalDate" | "ZonedDateTime" | "Instant" | "Duration" | "UUID"
        | "TextBlob" => Some(&[Required, Unique]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cassandra_rejects_zoned_date_time() {
        assert!(is_valid_type(DatabaseType::Sql, "ZonedDateTime"));
        assert!(!is_valid_type(DatabaseType::Cassandra, "ZonedDateTime"));
        assert!(!is_valid_type(DatabaseType::Sql, "Money"));
    }

    #[test]
    fn test_supported_validations() {
        let string = supported_validations("String", false).unwrap();
        assert!(string.contains(&ValidationKind::Pattern));
        assert!(!string.contains(&ValidationKind::Min));

        let language = supported_validations("Language", true).unwrap();
        assert_eq!(language, [ValidationKind::Required, ValidationKind::Unique]);

        assert!(supported_validations("Money", false).is_none());
    }

    #[test]
    fn test_blob_kind() {
        assert_eq!(BlobKind::of("ImageBlob"), Some(BlobKind::Image));
        assert_eq!(BlobKind::of("Blob").map(|kind| kind.content()), Some("any"));
        assert_eq!(BlobKind::of("String"), None);
    }
}
