use super::*;

const STYLES: [QuoteStyle; 4] = [
    QuoteStyle::Backtick,
    QuoteStyle::DoubleQuote,
    QuoteStyle::Bracket,
    QuoteStyle::None,
];

const AWKWARD_NAMES: [&str; 8] = [
    "orders",
    "order items",
    "we`ird",
    "dou\"ble",
    "brack]et",
    "[open",
    "``",
    "ünïcødé",
];

mod quote_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_backtick() {
        assert_eq!(QuoteStyle::Backtick.quote("orders"), "`orders`");
        assert_eq!(QuoteStyle::Backtick.quote("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_double_quote() {
        assert_eq!(QuoteStyle::DoubleQuote.quote("orders"), "\"orders\"");
        assert_eq!(QuoteStyle::DoubleQuote.quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_bracket_doubles_only_closing() {
        assert_eq!(QuoteStyle::Bracket.quote("[a]"), "[[a]]]");
    }

    #[test]
    fn test_none_is_verbatim() {
        assert_eq!(QuoteStyle::None.quote("logs-2024"), "logs-2024");
    }
}

mod unquote_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_all_styles() {
        for style in STYLES {
            for name in AWKWARD_NAMES {
                let quoted = style.quote(name);
                assert_eq!(style.unquote(&quoted).as_deref(), Some(name), "{style:?} {name}");
            }
        }
    }

    #[test]
    fn test_rejects_missing_delimiters() {
        assert_eq!(QuoteStyle::Backtick.unquote("orders"), None);
        assert_eq!(QuoteStyle::Bracket.unquote("[orders"), None);
    }

    #[test]
    fn test_rejects_lone_closing_delimiter() {
        assert_eq!(QuoteStyle::DoubleQuote.unquote("\"a\"b\""), None);
    }
}

mod qualify_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_qualify_quotes_each_part() {
        assert_eq!(
            QuoteStyle::Backtick.qualify(["shop", "orders"]),
            "`shop`.`orders`"
        );
        assert_eq!(
            QuoteStyle::Bracket.qualify(["shop", "dbo", "orders"]),
            "[shop].[dbo].[orders]"
        );
    }

    #[test]
    fn test_qualify_single_part() {
        assert_eq!(QuoteStyle::DoubleQuote.qualify(["orders"]), "\"orders\"");
    }
}
