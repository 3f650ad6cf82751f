use super::*;
use dbnav_core::{
    ColumnSpec, Dialect, DialectExt, GeneratorConfig, Operation, OperationRequest, RequestField,
};

fn dialect() -> PostgresDialect {
    PostgresDialect::new(&GeneratorConfig::default())
}

fn sql(request: OperationRequest) -> String {
    dialect()
        .generate(&request)
        .unwrap()
        .sql()
        .map(str::to_string)
        .unwrap()
}

mod quoting_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(dialect().quote_identifier("Order"), "\"Order\"");
        assert_eq!(dialect().quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_literal_keeps_backslash() {
        assert_eq!(dialect().quote_literal(r"C:\x"), r"'C:\x'");
    }
}

mod native_type_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mappings() {
        let cases = [
            ("string", "VARCHAR(255)"),
            ("double", "DOUBLE PRECISION"),
            ("timestamp", "TIMESTAMPTZ"),
            ("blob", "BYTEA"),
            ("json", "JSONB"),
            ("uuid", "UUID"),
        ];
        for (logical, native) in cases {
            let column = ColumnSpec::new("c", logical);
            assert_eq!(dialect().native_type(&column).unwrap(), native, "{logical}");
        }
    }
}

mod listing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_show_tables_uses_default_schema() {
        assert_eq!(
            dialect().show_tables("shop").unwrap().sql(),
            Some(
                "SELECT table_name AS name FROM information_schema.tables \
                 WHERE table_catalog = 'shop' AND table_schema = 'public' \
                 AND table_type = 'BASE TABLE' ORDER BY table_name"
            )
        );
    }

    #[test]
    fn test_show_tables_explicit_schema() {
        let request = OperationRequest::new(Operation::ShowTables)
            .with_database("shop")
            .with_schema("sales");
        assert!(sql(request).contains("table_schema = 'sales'"));
    }

    #[test]
    fn test_configured_default_schema() {
        let mut config = GeneratorConfig::default();
        config.postgres.default_schema = "app".to_string();
        let result = PostgresDialect::new(&config).show_views("shop").unwrap();
        assert!(result.sql().unwrap().contains("table_schema = 'app'"));
    }

    #[test]
    fn test_show_schemas() {
        assert_eq!(
            dialect().show_schemas("shop").unwrap().sql(),
            Some(
                "SELECT schema_name AS name FROM information_schema.schemata \
                 WHERE catalog_name = 'shop' ORDER BY schema_name"
            )
        );
    }

    #[test]
    fn test_show_indexes() {
        assert_eq!(
            dialect().show_indexes("shop", "orders").unwrap().sql(),
            Some(
                "SELECT indexname AS name, indexdef AS definition FROM pg_indexes \
                 WHERE schemaname = 'public' AND tablename = 'orders' ORDER BY indexname"
            )
        );
    }
}

mod page_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page() {
        assert_eq!(
            dialect().build_page("shop", "orders", 20, 2).unwrap().sql(),
            Some("SELECT * FROM \"public\".\"orders\" LIMIT 20 OFFSET 40")
        );
    }

    #[test]
    fn test_count_with_schema() {
        let request = OperationRequest::new(Operation::Count)
            .with_schema("sales")
            .with_table("orders");
        assert_eq!(sql(request), "SELECT COUNT(*) FROM \"sales\".\"orders\"");
    }
}

mod column_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_column_with_comment_is_script() {
        let column = ColumnSpec::new("note", "text").with_comment("free text");
        assert_eq!(
            dialect().add_column("orders", column).unwrap().sql(),
            Some(
                "ALTER TABLE \"public\".\"orders\" ADD COLUMN \"note\" TEXT;\n\
                 COMMENT ON COLUMN \"public\".\"orders\".\"note\" IS 'free text';"
            )
        );
    }

    #[test]
    fn test_update_column() {
        let column = ColumnSpec::new("qty", "bigint").not_null().with_default("1");
        let result = dialect()
            .update_column("orders", column, Some("quantity"))
            .unwrap();
        assert_eq!(
            result.sql(),
            Some(
                "ALTER TABLE \"public\".\"orders\" ALTER COLUMN \"qty\" TYPE BIGINT;\n\
                 ALTER TABLE \"public\".\"orders\" ALTER COLUMN \"qty\" SET NOT NULL;\n\
                 ALTER TABLE \"public\".\"orders\" ALTER COLUMN \"qty\" SET DEFAULT '1';\n\
                 ALTER TABLE \"public\".\"orders\" RENAME COLUMN \"qty\" TO \"quantity\";"
            )
        );
    }

    #[test]
    fn test_update_column_nullable_drops_constraint() {
        let result = dialect()
            .update_column("orders", ColumnSpec::new("qty", "int"), None)
            .unwrap();
        assert!(result.sql().unwrap().ends_with("ALTER COLUMN \"qty\" DROP NOT NULL;"));
    }
}

mod rename_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rename_function() {
        assert_eq!(
            dialect().rename_function("shop", "calc", "calc_v2").unwrap().sql(),
            Some("ALTER FUNCTION \"public\".\"calc\" RENAME TO \"calc_v2\"")
        );
    }

    #[test]
    fn test_rename_trigger_needs_table() {
        let err = dialect().rename_trigger("shop", "trg", "trg2").unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Table));
    }

    #[test]
    fn test_rename_trigger() {
        let request = OperationRequest::new(Operation::RenameTrigger)
            .with_table("orders")
            .with_name("trg")
            .with_new_name("trg2");
        assert_eq!(
            sql(request),
            "ALTER TRIGGER \"trg\" ON \"public\".\"orders\" RENAME TO \"trg2\""
        );
    }
}

mod source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_source_unsupported() {
        let result = dialect().show_table_source("shop", "orders").unwrap();
        assert!(result.is_unsupported());
    }

    #[test]
    fn test_view_source() {
        assert_eq!(
            dialect().show_view_source("shop", "v").unwrap().sql(),
            Some("SELECT pg_get_viewdef('\"public\".\"v\"'::regclass, true) AS source")
        );
    }

    #[test]
    fn test_function_source() {
        assert_eq!(
            dialect().show_function_source("shop", "calc").unwrap().sql(),
            Some("SELECT pg_get_functiondef('\"public\".\"calc\"'::regproc) AS source")
        );
    }

    #[test]
    fn test_trigger_source() {
        let sql = dialect()
            .show_trigger_source("shop", "trg")
            .unwrap()
            .sql()
            .unwrap()
            .to_string();
        assert!(sql.starts_with("SELECT pg_get_triggerdef(t.oid, true) AS source FROM pg_trigger t"));
        assert!(sql.ends_with("WHERE t.tgname = 'trg' AND n.nspname = 'public'"));
    }
}

mod template_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trigger_template_defines_function_first() {
        let request = OperationRequest::new(Operation::TriggerTemplate)
            .with_name("audit")
            .with_table("orders");
        let sql = sql(request);
        assert!(sql.starts_with("CREATE FUNCTION \"public\".\"audit_fn\"()"));
        assert!(sql.ends_with("EXECUTE FUNCTION \"public\".\"audit_fn\"()"));
        assert!(sql.contains("CREATE TRIGGER \"audit\"\nBEFORE INSERT ON \"public\".\"orders\""));
    }

    #[test]
    fn test_function_template() {
        let sql = dialect().function_template().unwrap().sql().unwrap().to_string();
        assert!(sql.starts_with("CREATE FUNCTION \"public\".\"new_function\"()"));
    }
}

#[test]
fn test_drop_trigger() {
    let request = OperationRequest::new(Operation::DropTrigger)
        .with_table("orders")
        .with_name("trg");
    assert_eq!(
        sql(request),
        "DROP TRIGGER IF EXISTS \"trg\" ON \"public\".\"orders\""
    );
}

#[test]
fn test_create_user() {
    assert_eq!(
        dialect().create_user("app", "pw").unwrap().sql(),
        Some("CREATE USER \"app\" WITH PASSWORD 'pw'")
    );
}
