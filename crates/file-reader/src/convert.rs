use crate::error::ReaderError;
use crate::parser::RawRecord;
use core_types::Order;
use rust_decimal::Decimal;
use std::str::FromStr;

const ORDER_ID: &[&str] = &["order_id", "order id", "order"];
const CLIENT_ID: &[&str] = &["customer_id", "client_id", "customer", "client"];
const PROFIT: &[&str] = &["profit"];
const COSTS: &[&str] = &["costs", "cost"];
const PROCESSING_TIME: &[&str] = &["processing_time_hr", "processing time (hr)", "processing_time"];
const RISK: &[&str] = &["risk (in percent)", "risk_pct", "risk"];

/// First non-empty value under any of the column's accepted names.
fn field<'a>(record: &'a RawRecord, aliases: &[&str]) -> Result<&'a str, ReaderError> {
    aliases
        .iter()
        .filter_map(|alias| record.fields.get(*alias))
        .map(String::as_str)
        .find(|value| !value.is_empty())
        .ok_or_else(|| ReaderError::MissingColumn {
            row: record.row,
            column: aliases[0].to_string(),
        })
}

fn decimal(record: &RawRecord, aliases: &[&str]) -> Result<Decimal, ReaderError> {
    let raw = field(record, aliases)?;
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ReaderError::InvalidValue {
            row: record.row,
            column: aliases[0].to_string(),
            value: raw.to_string(),
        })
}

pub fn to_order(record: &RawRecord) -> Result<Order, ReaderError> {
    let order_id = field(record, ORDER_ID)?;
    let client_id = field(record, CLIENT_ID)?;
    let profit = decimal(record, PROFIT)?;
    let costs = decimal(record, COSTS)?;

    let processing_time_hr = decimal(record, PROCESSING_TIME)?;
    if processing_time_hr <= Decimal::ZERO {
        return Err(ReaderError::NonPositiveProcessingTime {
            row: record.row,
            value: processing_time_hr.to_string(),
        });
    }

    let risk_pct = decimal(record, RISK)?;
    if risk_pct < Decimal::ZERO || risk_pct > Decimal::ONE_HUNDRED {
        return Err(ReaderError::RiskOutOfRange {
            row: record.row,
            value: risk_pct.to_string(),
        });
    }

    Ok(Order::new(
        order_id,
        client_id,
        profit,
        costs,
        processing_time_hr,
        risk_pct,
    ))
}

/// Converts every record, stopping at the first invalid row.
pub fn to_orders(records: &[RawRecord]) -> Result<Vec<Order>, ReaderError> {
    records.iter().map(to_order).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(row: usize, pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            row,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn valid() -> Vec<(&'static str, &'static str)> {
        vec![
            ("order_id", "1001"),
            ("customer_id", "ACME"),
            ("profit", "12000"),
            ("costs", "7000.50"),
            ("processing_time_hr", "120"),
            ("risk (in percent)", "12.5"),
        ]
    }

    #[test]
    fn converts_a_full_row() {
        let order = to_order(&record(2, &valid())).unwrap();
        assert_eq!(order.order_id, "1001");
        assert_eq!(order.client_id, "ACME");
        assert_eq!(order.costs, dec!(7000.50));
        assert_eq!(order.risk_pct, dec!(12.5));
    }

    #[test]
    fn accepts_alternate_column_names() {
        let order = to_order(&record(
            2,
            &[
                ("order_id", "7"),
                ("client_id", "Globex"),
                ("profit", "1e3"),
                ("costs", "0"),
                ("processing_time_hr", "2"),
                ("risk_pct", "0"),
            ],
        ))
        .unwrap();
        assert_eq!(order.client_id, "Globex");
        assert_eq!(order.profit, dec!(1000));
    }

    #[test]
    fn missing_column_names_the_row() {
        let mut pairs = valid();
        pairs.retain(|(k, _)| *k != "profit");
        match to_order(&record(5, &pairs)) {
            Err(ReaderError::MissingColumn { row, column }) => {
                assert_eq!(row, 5);
                assert_eq!(column, "profit");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_values() {
        let mut pairs = valid();
        pairs[2] = ("profit", "lots");
        assert!(matches!(
            to_order(&record(3, &pairs)),
            Err(ReaderError::InvalidValue { row: 3, .. })
        ));
    }

    #[test]
    fn rejects_zero_processing_time() {
        let mut pairs = valid();
        pairs[4] = ("processing_time_hr", "0");
        assert!(matches!(
            to_order(&record(4, &pairs)),
            Err(ReaderError::NonPositiveProcessingTime { row: 4, .. })
        ));
    }

    #[test]
    fn rejects_risk_outside_percent_scale() {
        for bad in ["-1", "100.5"] {
            let mut pairs = valid();
            pairs[5] = ("risk (in percent)", bad);
            assert!(matches!(
                to_order(&record(6, &pairs)),
                Err(ReaderError::RiskOutOfRange { row: 6, .. })
            ));
        }
    }

    #[test]
    fn first_bad_row_fails_the_table() {
        let mut bad = valid();
        bad[4] = ("processing_time_hr", "-3");
        let records = vec![record(2, &valid()), record(3, &bad)];
        assert!(to_orders(&records).is_err());
        assert_eq!(to_orders(&records[..1]).unwrap().len(), 1);
    }
}
