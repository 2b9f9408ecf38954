use chrono::NaiveDate;
use crop_forecast::data::{DataLoader, MarketNotes, Month, PriceTable, RowOrder};
use crop_forecast::ForecastError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_read_prices_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Crop,Month,Price,Date").unwrap();
    writeln!(file, "Wheat,Jan,2015.5,2024-01-15").unwrap();
    writeln!(file, "Rice,Jan,3100,2024-01-15").unwrap();
    writeln!(file, "Wheat,Feb,2040,2024-02-15").unwrap();

    let table = DataLoader::read_prices(file.path()).unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
    assert_eq!(table.crops(), vec!["Wheat", "Rice"]);
    assert_eq!(table.prices("wheat"), vec![2015.5, 2040.0]);

    let first = &table.observations()[0];
    assert_eq!(first.month, Some(Month::Jan));
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15));
}

#[test]
fn test_optional_columns_may_be_absent_or_blank() {
    let file = write_file(b"Crop,Price,Month\nMaize,1890,\nMaize,1900,Mar\n");
    let table = DataLoader::read_prices(file.path()).unwrap();

    assert_eq!(table.observations()[0].month, None);
    assert_eq!(table.observations()[1].month, Some(Month::Mar));
    assert!(table.observations().iter().all(|o| o.date.is_none()));
}

#[test]
fn test_short_rows_leave_trailing_columns_blank() {
    let file = write_file(
        b"Crop,Month,Price,Date\nWheat,Jan,2000,2024-01-01\nWheat,Feb,2050\nWheat,Mar,2100,2024-03-01\n",
    );

    let table = DataLoader::read_prices(file.path()).unwrap();
    assert_eq!(table.prices("Wheat"), vec![2000.0, 2050.0, 2100.0]);
    assert_eq!(table.observations()[1].month, Some(Month::Feb));
    assert_eq!(table.observations()[1].date, None);

    assert_eq!(DataLoader::load_prices(file.path(), RowOrder::File).len(), 3);
}

#[test]
fn test_short_row_without_price_names_the_line() {
    let file = write_file(b"Crop,Month,Price\nWheat,Jan,2000\nRice,Feb\n");
    let err = DataLoader::read_prices(file.path()).unwrap_err();

    assert!(matches!(err, ForecastError::DataError(_)));
    assert!(err.to_string().contains("Line 3"));
}

#[test]
fn test_file_order_is_preserved() {
    let file = write_file(b"Crop,Price,Date\nCotton,3,2024-03-01\nCotton,1,2024-01-01\nCotton,2,2024-02-01\n");
    let table = DataLoader::read_prices(file.path()).unwrap();
    assert_eq!(table.prices("Cotton"), vec![3.0, 1.0, 2.0]);

    let sorted = table.sorted_by_date().unwrap();
    assert_eq!(sorted.prices("Cotton"), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_load_prices_by_date() {
    let file = write_file(b"Crop,Price,Date\nRice,20,2024-02-01\nRice,10,2024-01-01\n");
    let table = DataLoader::load_prices(file.path(), RowOrder::ByDate);
    assert_eq!(table.prices("Rice"), vec![10.0, 20.0]);
}

#[test]
fn test_ordering_by_date_needs_every_date() {
    let file = write_file(b"Crop,Price,Date\nRice,20,2024-02-01\nRice,10,\n");
    let table = DataLoader::read_prices(file.path()).unwrap();

    let err = table.sorted_by_date().unwrap_err();
    assert!(err.to_string().contains("row 2"));

    // The lenient loader degrades to an empty table instead
    let table = DataLoader::load_prices(file.path(), RowOrder::ByDate);
    assert!(table.is_empty());
}

#[test]
fn test_missing_file_gives_empty_table() {
    let table = DataLoader::load_prices("no/such/crop_prices.csv", RowOrder::File);

    assert!(table.is_empty());
    assert_eq!(table, PriceTable::empty());
    assert!(table.has_required_columns());

    let err = DataLoader::read_prices("no/such/crop_prices.csv").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_schema_mismatch_names_missing_column() {
    let file = write_file(b"Commodity,Cost\nWheat,2000\n");

    let err = DataLoader::read_prices(file.path()).unwrap_err();
    match err {
        ForecastError::SchemaError(msg) => {
            assert!(msg.contains("Crop"));
            assert!(msg.contains("Price"));
            assert!(msg.contains("Commodity"));
        }
        other => panic!("Expected SchemaError, got {:?}", other),
    }

    assert!(DataLoader::load_prices(file.path(), RowOrder::File).is_empty());
}

#[test]
fn test_bad_values_name_the_line() {
    let file = write_file(b"Crop,Price\nWheat,2000\nRice,n/a\n");
    let err = DataLoader::read_prices(file.path()).unwrap_err();

    assert!(matches!(err, ForecastError::DataError(_)));
    assert!(err.to_string().contains("Line 3"));
    assert!(err.to_string().contains("n/a"));
}

#[test]
fn test_negative_price_is_rejected() {
    let file = write_file(b"Crop,Price\nWheat,-5\n");
    assert!(DataLoader::read_prices(file.path()).is_err());
}

#[test]
fn test_unknown_month_is_rejected() {
    let file = write_file(b"Crop,Month,Price\nWheat,Smarch,2000\n");
    let err = DataLoader::read_prices(file.path()).unwrap_err();
    assert!(err.to_string().contains("Smarch"));
}

#[test]
fn test_utf8_bom_table() {
    let file = write_file(b"\xEF\xBB\xBFCrop,Price\nGram,3920.4\n");
    let table = DataLoader::read_prices(file.path()).unwrap();
    assert_eq!(table.latest_price("gram"), Some(3920.4));
}

#[test]
fn test_non_utf8_table_is_decoded() {
    let file = write_file(
        b"Crop,Price\nBl\xE9 dur,2100\nCaf\xE9 arabica,4000\nRiz \xE9tuv\xE9,3500\n",
    );
    let table = DataLoader::read_prices(file.path()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.crops()[1], "Café arabica");
}

#[test]
fn test_read_market_notes() {
    let file = write_file(
        br#"{"trends": ["Wheat steady"], "news": [{"title": "MSP raised"}], "last_updated": "2024-05-01"}"#,
    );
    let notes = DataLoader::read_market_notes(file.path()).unwrap();

    assert_eq!(notes.trends.len(), 1);
    assert_eq!(notes.news[0]["title"], "MSP raised");
    assert_eq!(notes.last_updated, "2024-05-01");
}

#[test]
fn test_market_notes_with_bom_and_missing_keys() {
    let file = write_file(b"\xEF\xBB\xBF{\"news\": []}");
    let notes = DataLoader::load_market_notes(file.path());

    assert!(notes.trends.is_empty());
    assert!(notes.news.is_empty());
    assert_eq!(notes.last_updated, "");
    assert!(notes.is_empty());
}

#[test]
fn test_market_notes_utf16() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in r#"{"trends": ["Rice up"], "last_updated": "today"}"#.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let file = write_file(&bytes);

    let notes = DataLoader::load_market_notes(file.path());
    assert_eq!(notes.trends, vec![serde_json::json!("Rice up")]);
    assert_eq!(notes.last_updated, "today");
}

#[test]
fn test_market_notes_failures_are_empty() {
    assert_eq!(
        DataLoader::load_market_notes("no/such/market_data.json"),
        MarketNotes::default()
    );

    let file = write_file(b"{ not json");
    assert_eq!(DataLoader::load_market_notes(file.path()), MarketNotes::default());
    assert!(matches!(
        DataLoader::read_market_notes(file.path()),
        Err(ForecastError::JsonError(_))
    ));
}
