use super::*;
use dbnav_core::{
    ColumnSpec, Command, Dialect, DialectError, DialectExt, GeneratorConfig, Operation,
    OperationRequest, RequestField, StatementResult,
};

fn dialect() -> RedisDialect {
    RedisDialect::new(&GeneratorConfig::default())
}

fn lines(result: StatementResult) -> Vec<String> {
    result
        .into_statement()
        .unwrap()
        .as_commands()
        .unwrap()
        .iter()
        .map(Command::to_string)
        .collect()
}

mod database_index_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_index() {
        assert_eq!(parse_database_index("0").unwrap(), 0);
        assert_eq!(parse_database_index(" 15 ").unwrap(), 15);
    }

    #[test]
    fn test_named_database_rejected() {
        let err = parse_database_index("cache").unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Database));
    }

    #[test]
    fn test_negative_index_rejected() {
        assert!(parse_database_index("-1").is_err());
    }
}

mod keyspace_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_show_databases() {
        assert_eq!(
            lines(dialect().show_databases().unwrap()),
            vec!["CONFIG GET databases"]
        );
    }

    #[test]
    fn test_show_tables_scans_with_configured_count() {
        assert_eq!(
            lines(dialect().show_tables("2").unwrap()),
            vec!["SELECT 2", "SCAN 0 MATCH * COUNT 100"]
        );
    }

    #[test]
    fn test_first_page_matches_table_pattern() {
        assert_eq!(
            lines(dialect().build_page("0", "session:*", 50, 0).unwrap()),
            vec!["SELECT 0", "SCAN 0 MATCH session:* COUNT 50"]
        );
    }

    #[test]
    fn test_page_without_table_matches_everything() {
        let request = OperationRequest::new(Operation::BuildPage).with_database("1");
        assert_eq!(
            lines(dialect().generate(&request).unwrap()),
            vec!["SELECT 1", "SCAN 0 MATCH * COUNT 100"]
        );
    }

    #[test]
    fn test_cursor_continues_scan() {
        let request = OperationRequest::new(Operation::BuildPage)
            .with_database("0")
            .with_page_size(10)
            .with_page_index(4)
            .with_cursor("17");
        assert_eq!(
            lines(dialect().generate(&request).unwrap()),
            vec!["SELECT 0", "SCAN 17 MATCH * COUNT 10"]
        );
    }

    #[test]
    fn test_later_page_without_cursor() {
        let err = dialect().build_page("0", "*", 10, 1).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Cursor));
    }

    #[test]
    fn test_non_numeric_cursor() {
        let request = OperationRequest::new(Operation::BuildPage)
            .with_database("0")
            .with_cursor("abc");
        let err = dialect().generate(&request).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Cursor));
    }

    #[test]
    fn test_count_and_flush() {
        assert_eq!(
            lines(dialect().count_sql("3", "ignored").unwrap()),
            vec!["SELECT 3", "DBSIZE"]
        );
        assert_eq!(
            lines(dialect().truncate_database("3").unwrap()),
            vec!["SELECT 3", "FLUSHDB"]
        );
    }

    #[test]
    fn test_rename_key_quotes_arguments() {
        assert_eq!(
            lines(dialect().rename_table("0", "user 1", "user:1").unwrap()),
            vec!["SELECT 0", "RENAME \"user 1\" user:1"]
        );
    }

    #[test]
    fn test_named_database_is_invalid() {
        let err = dialect().show_tables("cache").unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Database));
    }
}

mod server_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_user_with_password() {
        assert_eq!(
            lines(dialect().create_user("alice", "s3cret").unwrap()),
            vec!["ACL SETUSER alice on >s3cret ~* +@all"]
        );
    }

    #[test]
    fn test_create_user_without_password() {
        let request = OperationRequest::new(Operation::CreateUser).with_name("alice");
        assert_eq!(
            lines(dialect().generate(&request).unwrap()),
            vec!["ACL SETUSER alice on nopass ~* +@all"]
        );
    }

    #[test]
    fn test_server_commands() {
        assert_eq!(lines(dialect().show_users().unwrap()), vec!["ACL USERS"]);
        assert_eq!(lines(dialect().process_list().unwrap()), vec!["CLIENT LIST"]);
        assert_eq!(lines(dialect().variable_list().unwrap()), vec!["CONFIG GET *"]);
        assert_eq!(lines(dialect().status_list().unwrap()), vec!["INFO"]);
        assert_eq!(lines(dialect().ping().unwrap()), vec!["PING"]);
    }

    #[test]
    fn test_no_type_mapping() {
        let err = dialect()
            .native_type(&ColumnSpec::new("v", "string"))
            .unwrap_err();
        assert!(matches!(err, DialectError::UnsupportedType { .. }));
    }

    #[test]
    fn test_relational_operations_unsupported() {
        let result = dialect().show_views("0").unwrap();
        assert_eq!(result.unsupported_reason(), Some("no view concept"));
        assert!(!dialect().supports(Operation::TableTemplate));
    }
}
