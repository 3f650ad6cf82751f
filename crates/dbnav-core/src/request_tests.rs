use super::*;

fn page_request() -> OperationRequest {
    OperationRequest::new(Operation::BuildPage)
        .with_database("shop")
        .with_table("orders")
}

mod require_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_present_field() {
        let request = page_request();
        assert_eq!(request.require(RequestField::Table).unwrap(), "orders");
    }

    #[test]
    fn test_missing_field() {
        let request = OperationRequest::new(Operation::ShowTables);
        let err = request.require(RequestField::Database).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Database));
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let request = OperationRequest::new(Operation::ShowTables).with_database("   ");
        assert!(request.require(RequestField::Database).is_err());
    }

    #[test]
    fn test_column_fields() {
        let request = OperationRequest::new(Operation::AddColumn)
            .with_table("orders")
            .with_column(ColumnSpec::new("total", "decimal"));
        assert_eq!(request.require(RequestField::Column).unwrap(), "total");
        assert_eq!(request.require(RequestField::ColumnType).unwrap(), "decimal");
    }
}

mod validate_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_request() {
        let request = page_request().with_page_size(20).with_page_index(2);
        assert!(request.validate(&[RequestField::Table]).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let request = OperationRequest::new(Operation::ShowColumns).with_database("shop");
        let err = request
            .validate(Operation::ShowColumns.required_fields())
            .unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Table));
    }

    #[test]
    fn test_zero_page_size() {
        let err = page_request().with_page_size(0).validate(&[]).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::PageSize));
    }

    #[test]
    fn test_negative_page_size() {
        let err = page_request().with_page_size(-5).validate(&[]).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::PageSize));
    }

    #[test]
    fn test_negative_page_index() {
        let err = page_request().with_page_index(-1).validate(&[]).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::PageIndex));
    }

    #[test]
    fn test_blank_optional_schema() {
        let err = page_request().with_schema("").validate(&[]).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Schema));
    }

    #[test]
    fn test_blank_optional_database() {
        let request = OperationRequest::new(Operation::Count)
            .with_database("  ")
            .with_table("orders");
        let err = request.validate(&[RequestField::Table]).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Database));
    }

    #[test]
    fn test_blank_password_is_allowed() {
        let request = OperationRequest::new(Operation::CreateUser)
            .with_name("reporter")
            .with_password("");
        assert!(request.validate(&[RequestField::Name]).is_ok());
    }

    #[test]
    fn test_nul_in_identifier() {
        let request = OperationRequest::new(Operation::Count).with_table("ord\0ers");
        let err = request.validate(&[RequestField::Table]).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Table));
    }

    #[test]
    fn test_optional_fields_not_required() {
        let request = OperationRequest::new(Operation::Ping);
        assert!(request.validate(Operation::Ping.required_fields()).is_ok());
    }
}

#[test]
fn test_serde_skips_unset_fields() {
    let json = serde_json::to_value(page_request()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "operation": "build-page",
            "database": "shop",
            "table": "orders",
        })
    );
}
