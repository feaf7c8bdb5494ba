use file_reader::{ReaderError, read_orders};
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn reads_orders_from_csv() {
    let file = csv_file(
        "order_id,customer_id,profit,costs,processing_time_hr,Risk (in percent),notes\n\
         1001,ACME,12000,7000,120,12,rush\n\
         \n\
         1002, ACME ,8000,6500,300,35,\n",
    );

    let orders = read_orders(file.path(), None).unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_id, "1001");
    assert_eq!(orders[1].client_id, "ACME");
    assert_eq!(orders[1].processing_time_hr, dec!(300));
    assert_eq!(orders[1].risk_pct, dec!(35));
}

#[test]
fn bad_row_is_reported_with_its_line() {
    let file = csv_file(
        "order_id,customer_id,profit,costs,processing_time_hr,risk_pct\n\
         1,A,10,5,1,5\n\
         2,A,10,5,0,5\n",
    );

    match read_orders(file.path(), None) {
        Err(ReaderError::NonPositiveProcessingTime { row, .. }) => assert_eq!(row, 3),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn header_only_file_has_no_orders() {
    let file = csv_file("order_id,customer_id,profit,costs,processing_time_hr,risk_pct\n");
    assert!(read_orders(file.path(), None).unwrap().is_empty());
}

#[test]
fn missing_file_is_reported() {
    assert!(matches!(
        read_orders(Path::new("/nonexistent/orders.ods"), None),
        Err(ReaderError::FileNotFound(_))
    ));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    assert!(matches!(
        read_orders(file.path(), None),
        Err(ReaderError::UnsupportedFormat(_))
    ));
}
