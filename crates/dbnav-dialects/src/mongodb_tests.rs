use super::*;
use dbnav_core::{
    ColumnSpec, Dialect, DialectError, DialectExt, DocumentCommand, GeneratorConfig, Operation,
    OperationRequest, RequestField, StatementResult,
};
use serde_json::json;

fn dialect() -> MongoDbDialect {
    MongoDbDialect::new(&GeneratorConfig::default())
}

fn document(result: StatementResult) -> DocumentCommand {
    result
        .into_statement()
        .unwrap()
        .as_document()
        .cloned()
        .unwrap()
}

mod name_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_database_names() {
        assert_eq!(validate_database_name("shop").unwrap(), "shop");
        for name in ["", "a.b", "a/b", "a b", "$db"] {
            let err = validate_database_name(name).unwrap_err();
            assert_eq!(err.invalid_field(), Some(RequestField::Database), "{name:?}");
        }
        assert!(validate_database_name(&"d".repeat(64)).is_err());
    }

    #[test]
    fn test_collection_names() {
        assert!(validate_collection_name(RequestField::Table, "orders.archive", true).is_ok());
        assert!(validate_collection_name(RequestField::Table, "system.views", false).is_ok());
        assert!(validate_collection_name(RequestField::Name, "system.views", true).is_err());
        assert!(validate_collection_name(RequestField::Table, "price$", false).is_err());
    }
}

mod listing_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_show_databases() {
        let command = document(dialect().show_databases().unwrap());
        assert_eq!(command.database, "admin");
        assert_eq!(command.command, json!({ "listDatabases": 1, "nameOnly": true }));
    }

    #[test]
    fn test_show_tables_filters_collections() {
        let command = document(dialect().show_tables("shop").unwrap());
        assert_eq!(command.database, "shop");
        assert_eq!(command.command["filter"], json!({ "type": "collection" }));
    }

    #[test]
    fn test_show_views_and_system_views() {
        let views = document(dialect().show_views("shop").unwrap());
        assert_eq!(views.command["filter"], json!({ "type": "view" }));

        let system = document(dialect().show_system_views("shop").unwrap());
        assert_eq!(
            system.command["filter"],
            json!({ "name": { "$regex": "^system\\." } })
        );
    }

    #[test]
    fn test_show_users_defaults_to_admin() {
        let command = document(dialect().show_users().unwrap());
        assert_eq!(command.database, "admin");
        assert_eq!(command.command, json!({ "usersInfo": 1 }));
    }

    #[test]
    fn test_show_indexes() {
        let command = document(dialect().show_indexes("shop", "orders").unwrap());
        assert_eq!(command.command, json!({ "listIndexes": "orders" }));
    }

    #[test]
    fn test_show_columns_unsupported() {
        let result = dialect().show_columns("shop", "orders").unwrap();
        assert_eq!(
            result.unsupported_reason(),
            Some("collections are schemaless; there are no column definitions")
        );
    }
}

mod data_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_uses_skip_and_limit() {
        let command = document(dialect().build_page("shop", "orders", 20, 2).unwrap());
        assert_eq!(
            command.command,
            json!({ "find": "orders", "filter": {}, "skip": 40, "limit": 20 })
        );
    }

    #[test]
    fn test_page_default_size() {
        let request = OperationRequest::new(Operation::BuildPage)
            .with_database("shop")
            .with_table("orders");
        let command = document(dialect().generate(&request).unwrap());
        assert_eq!(command.command["limit"], 100);
        assert_eq!(command.command["skip"], 0);
    }

    #[test]
    fn test_page_requires_database() {
        let request = OperationRequest::new(Operation::BuildPage).with_table("orders");
        let err = dialect().generate(&request).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Database));
    }

    #[test]
    fn test_count() {
        let command = document(dialect().count_sql("shop", "orders").unwrap());
        assert_eq!(command.command, json!({ "count": "orders" }));
    }

    #[test]
    fn test_rename_collection_runs_on_admin() {
        let command = document(dialect().rename_table("shop", "orders", "orders_old").unwrap());
        assert_eq!(command.database, "admin");
        assert_eq!(command.command["renameCollection"], "shop.orders");
        assert_eq!(command.command["to"], "shop.orders_old");
    }

    #[test]
    fn test_rename_into_system_namespace() {
        let err = dialect()
            .rename_table("shop", "orders", "system.orders")
            .unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::NewName));
    }
}

mod admin_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_user() {
        let command = document(dialect().create_user("alice", "s3cret").unwrap());
        assert_eq!(command.database, "admin");
        assert_eq!(
            command.command,
            json!({
                "createUser": "alice",
                "pwd": "s3cret",
                "roles": [{ "role": "readWrite", "db": "admin" }],
            })
        );
    }

    #[test]
    fn test_create_user_requires_password() {
        let request = OperationRequest::new(Operation::CreateUser).with_name("alice");
        let err = dialect().generate(&request).unwrap_err();
        assert_eq!(err.invalid_field(), Some(RequestField::Password));
    }

    #[test]
    fn test_templates() {
        let table = document(dialect().table_template().unwrap());
        assert_eq!(table.database, "new_database");
        assert_eq!(table.command, json!({ "create": "new_collection" }));

        let view = document(dialect().view_template().unwrap());
        assert_eq!(
            view.command,
            json!({ "create": "new_view", "viewOn": "new_collection", "pipeline": [] })
        );
    }

    #[test]
    fn test_drop_index() {
        let request = OperationRequest::new(Operation::DropIndex)
            .with_database("shop")
            .with_table("orders")
            .with_name("status_1");
        let command = document(dialect().generate(&request).unwrap());
        assert_eq!(
            command.command,
            json!({ "dropIndexes": "orders", "index": "status_1" })
        );
    }

    #[test]
    fn test_server_commands_target_admin() {
        for (result, key) in [
            (dialect().process_list(), "currentOp"),
            (dialect().variable_list(), "getParameter"),
            (dialect().status_list(), "serverStatus"),
            (dialect().ping(), "ping"),
        ] {
            let command = document(result.unwrap());
            assert_eq!(command.database, "admin");
            assert!(command.command.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_display_form() {
        let command = document(dialect().ping().unwrap());
        assert_eq!(
            command.to_string(),
            r#"db.getSiblingDB("admin").runCommand({"ping":1})"#
        );
    }
}

mod native_type_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bson_names() {
        let native = |t: &str| dialect().native_type(&ColumnSpec::new("c", t));
        assert_eq!(native("bigint").unwrap(), "long");
        assert_eq!(native("decimal").unwrap(), "decimal");
        assert_eq!(native("blob").unwrap(), "binData");
        assert!(matches!(
            native("time").unwrap_err(),
            DialectError::UnsupportedType { .. }
        ));
    }
}
