use super::*;
use strum::IntoEnumIterator;

mod logical_type_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_names_parse() {
        for ty in LogicalType::iter() {
            assert_eq!(LogicalType::parse(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(LogicalType::parse("int").unwrap(), LogicalType::Integer);
        assert_eq!(LogicalType::parse("Long").unwrap(), LogicalType::BigInt);
        assert_eq!(LogicalType::parse("bytes").unwrap(), LogicalType::Blob);
        assert_eq!(LogicalType::parse("numeric").unwrap(), LogicalType::Decimal);
        assert_eq!(LogicalType::parse(" jsonb ").unwrap(), LogicalType::Json);
    }

    #[test]
    fn test_unknown_type_keeps_original_name() {
        let err = LogicalType::parse("Currency").unwrap_err();
        assert!(
            matches!(err, DialectError::UnsupportedType { ref logical_type } if logical_type == "Currency")
        );
    }

    #[test]
    fn test_modifiers() {
        assert!(LogicalType::String.takes_length());
        assert!(!LogicalType::Text.takes_length());
        assert!(LogicalType::Decimal.takes_precision());
        assert!(!LogicalType::Double.takes_precision());
    }
}

mod column_spec_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let column = ColumnSpec::new("email", "string");
        assert!(column.nullable);
        assert_eq!(column.string_length(), 255);
        assert_eq!(column.precision(), (10, 2));
    }

    #[test]
    fn test_builder() {
        let column = ColumnSpec::new("price", "decimal")
            .with_length(12)
            .with_scale(4)
            .not_null()
            .with_default("0")
            .with_comment("unit price");
        assert!(!column.nullable);
        assert_eq!(column.precision(), (12, 4));
        assert_eq!(column.default.as_deref(), Some("0"));
        assert_eq!(column.resolved_type().unwrap(), LogicalType::Decimal);
    }

    #[test]
    fn test_deserialize_defaults_nullable() {
        let column: ColumnSpec =
            serde_json::from_str(r#"{"name":"id","logical_type":"bigint"}"#).unwrap();
        assert!(column.nullable);
        assert_eq!(column.length, None);
    }
}
