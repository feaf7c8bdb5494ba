use analytics::CorrelationOutcome;
use analyzer::error::AnalyzerError;
use analyzer::Analyzer;
use configuration::AnalysisConfig;
use core_types::Order;
use risk::FlagPolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn orders() -> Vec<Order> {
    vec![
        Order::new("1001", "ACME", dec!(12000), dec!(7000), dec!(120), dec!(12)),
        Order::new("1002", "ACME", dec!(8000), dec!(6500), dec!(300), dec!(35)),
        Order::new("1003", "ACME", dec!(15000), dec!(5000), dec!(80), dec!(8)),
        Order::new("2001", "Globex", dec!(4000), dec!(3900), dec!(250), dec!(60)),
        Order::new("2002", "Globex", dec!(9000), dec!(2000), dec!(150), dec!(5)),
        Order::new("3001", "Initech", dec!(20000), dec!(8000), dec!(400), dec!(20)),
    ]
}

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::default()).unwrap()
}

#[test]
fn full_run_is_idempotent() {
    let a = analyzer();
    let input = orders();

    let first = a.run(&input).unwrap();
    let second = a.run(&input).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn scores_stay_on_the_scale() {
    let report = analyzer().run(&orders()).unwrap();
    assert_eq!(report.order_count(), 6);
    for s in &report.orders {
        assert!((1..=10).contains(&s.risk.value()));
        assert!((1..=10).contains(&s.gain.value()));
    }
}

#[test]
fn margins_are_exact() {
    let report = analyzer().run(&orders()).unwrap();
    let first = &report.orders[0].derived.metrics;
    assert_eq!(first.contribution_margin, dec!(5000));
    assert_eq!(first.margin_per_hour, dec!(5000) / dec!(120));
}

#[test]
fn clients_are_summarized_and_correlated() {
    let report = analyzer().run(&orders()).unwrap();

    assert_eq!(
        report.clients.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["ACME", "Globex", "Initech"]
    );
    assert_eq!(report.clients["ACME"].order_count, 3);

    // the single-order client has no correlation and tops its own ranking
    assert!(matches!(
        report.correlations["Initech"],
        CorrelationOutcome::NotAvailable { .. }
    ));
    let initech = report
        .orders
        .iter()
        .find(|s| s.derived.order.client_id == "Initech")
        .unwrap();
    assert_eq!(initech.gain.value(), 10);

    // Globex: riskier order earns less per hour
    let globex = report.correlations["Globex"].coefficient().unwrap();
    assert!((globex + 1.0).abs() < 1e-9);
}

#[test]
fn order_policy_flags_every_order_above_fifteen_percent() {
    let report = analyzer().run(&orders()).unwrap();
    let mut flagged: Vec<&str> = report
        .bad_orders
        .iter()
        .filter(|f| f.policy == FlagPolicy::OrderRisk)
        .map(|f| f.order_id.as_str())
        .collect();
    flagged.sort();
    assert_eq!(flagged, vec!["1002", "2001", "3001"]);
    assert_eq!(report.thresholds.max_risk_fraction, dec!(0.15));
}

#[test]
fn shift_respects_capacity() {
    let report = analyzer().run(&orders()).unwrap();
    let shift = &report.shift;

    assert!(shift.total_processing_time_hr <= dec!(800));
    let margin: Decimal = shift
        .orders
        .iter()
        .map(|d| d.metrics.contribution_margin)
        .sum();
    assert_eq!(margin, shift.total_contribution_margin);
    assert_eq!(
        shift.orders.len() + shift.skipped_order_ids.len(),
        report.order_count()
    );
    // best density first
    assert_eq!(shift.orders[0].order.order_id, "1003");
}

#[test]
fn empty_table_produces_empty_report() {
    let report = analyzer().run(&[]).unwrap();
    assert!(report.orders.is_empty());
    assert!(report.clients.is_empty());
    assert!(report.bad_orders.is_empty());
    assert!(report.bottleneck_candidates.is_empty());
    assert!(report.shift.orders.is_empty());
    assert!(report.margin_drivers.iter().all(|d| d.coefficient.is_none()));
}

#[test]
fn invalid_capacity_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.shift.capacity_hr = dec!(-1);
    assert!(matches!(
        Analyzer::new(config),
        Err(AnalyzerError::Scheduler(_))
    ));
}

#[test]
fn overflowing_order_is_reported_not_panicked() {
    let mut input = orders();
    input.push(Order::new(
        "9001",
        "Hooli",
        Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0),
        dec!(0),
        dec!(0.000000001),
        dec!(10),
    ));
    assert!(matches!(
        analyzer().run(&input),
        Err(AnalyzerError::Analytics(_))
    ));
}

#[test]
fn orders_tied_for_lowest_margin_score_the_minimum() {
    let input = vec![
        Order::new("t1", "Tied", dec!(50), dec!(0), dec!(10), dec!(5)),
        Order::new("t2", "Tied", dec!(50), dec!(0), dec!(10), dec!(5)),
        Order::new("t3", "Tied", dec!(50), dec!(0), dec!(10), dec!(5)),
        Order::new("t4", "Tied", dec!(50), dec!(0), dec!(10), dec!(5)),
        Order::new("t5", "Tied", dec!(1000), dec!(0), dec!(10), dec!(5)),
    ];
    let report = analyzer().run(&input).unwrap();
    let gains: Vec<u8> = report.orders.iter().map(|s| s.gain.value()).collect();
    assert_eq!(gains, vec![1, 1, 1, 1, 10]);
}
