use analytics::CorrelationOutcome;
use analyzer::AnalysisReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use rust_decimal::Decimal;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn optional(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

pub fn margin_drivers_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec!["Characteristic", "r", "Strength", "Margin/hr"]);
    for driver in &report.margin_drivers {
        table.add_row(vec![
            driver.feature.to_string(),
            optional(driver.coefficient.map(|r| format!("{r:+.3}"))),
            optional(driver.strength),
            optional(driver.direction),
        ]);
    }
    table
}

pub fn print_margin_drivers(report: &AnalysisReport) {
    println!("\n--- Characteristics behind margin per hour ---");
    println!("{}", margin_drivers_table(report));
    println!("Correlation shows association across orders, not causation.");
}

pub fn clients_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec![
        "Client",
        "Orders",
        "Mean risk %",
        "RISK",
        "Risk variance",
        "GAIN",
        "Avg margin/hr",
        "Total margin",
        "Profile",
    ]);
    for summary in report.clients.values() {
        table.add_row(vec![
            summary.client_id.clone(),
            summary.order_count.to_string(),
            format!("{:.2}", summary.mean_risk_pct),
            summary.risk.to_string(),
            format!("{:.2}", summary.risk_variance),
            summary.gain.to_string(),
            format!("{:.2}", summary.avg_margin_per_hour),
            money(summary.total_contribution_margin),
            summary.class.to_string(),
        ]);
    }
    table
}

pub fn print_clients(report: &AnalysisReport) {
    println!("\n--- Client risk and gain ---");
    println!("{}", clients_table(report));
    println!("RISK and GAIN are on a 1-10 scale relative to each client's own orders.");
}

pub fn bad_orders_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec![
        "Order", "Client", "Policy", "Risk %", "RISK", "GAIN", "Client var",
    ]);
    for flag in &report.bad_orders {
        table.add_row(vec![
            flag.order_id.clone(),
            flag.client_id.clone(),
            flag.policy.to_string(),
            flag.risk_pct.to_string(),
            flag.risk.to_string(),
            flag.gain.to_string(),
            format!("{:.2}", flag.client_risk_variance),
        ]);
    }
    table
}

pub fn bottleneck_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec!["Order", "Client", "Hours", "Margin/hr", "Risk %"]);
    for candidate in &report.bottleneck_candidates {
        table.add_row(vec![
            candidate.order_id.clone(),
            candidate.client_id.clone(),
            candidate.processing_time_hr.to_string(),
            money(candidate.margin_per_hour),
            candidate.risk_pct.to_string(),
        ]);
    }
    table
}

pub fn order_policy_note(report: &AnalysisReport) -> String {
    let pct = (report.thresholds.max_risk_fraction * Decimal::ONE_HUNDRED).normalize();
    format!(
        "Order risk policy: order risk above {pct}%. \
         The written business rule also mentions 50%; {pct}% is the threshold applied."
    )
}

pub fn print_bad_orders(report: &AnalysisReport) {
    let t = &report.thresholds;

    println!("\n--- Bad orders ---");
    println!(
        "{} of {} orders flagged.",
        report.flagged_order_count(),
        report.order_count()
    );
    println!("{}", bad_orders_table(report));
    println!("{}", order_policy_note(report));
    println!(
        "Client summary policy: RISK >= {} and (client variance >= {} or GAIN >= {}).",
        t.high_risk, t.high_variance, t.high_gain
    );

    if !report.bottleneck_candidates.is_empty() {
        println!("\n--- Bottleneck candidates ---");
        println!("{}", bottleneck_table(report));
        println!(
            "Slow (above the {:.0}th percentile of hours), low-margin (below the {:.0}th \
             percentile of margin/hr) and riskier than {}%.",
            t.processing_time_quantile * 100.0,
            t.margin_quantile * 100.0,
            t.bottleneck_min_risk_pct.normalize()
        );
    }
}

pub fn correlations_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec!["Client", "r (RISK vs margin/hr)", "Orders", "Note"]);
    for (client_id, outcome) in &report.correlations {
        match outcome {
            CorrelationOutcome::Available(result) => table.add_row(vec![
                client_id.clone(),
                format!("{:+.3}", result.coefficient),
                result.sample_size.to_string(),
                String::new(),
            ]),
            CorrelationOutcome::NotAvailable { reason, .. } => table.add_row(vec![
                client_id.clone(),
                "n/a".to_string(),
                String::new(),
                reason.clone(),
            ]),
        };
    }
    table
}

pub fn print_correlations(report: &AnalysisReport) {
    println!("\n--- Risk vs. margin per hour by client ---");
    println!("{}", correlations_table(report));
    println!("A coefficient describes association only; it does not imply causation.");
}

pub fn shift_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec!["#", "Order", "Client", "Hours", "Margin/hr", "Margin"]);
    for (position, derived) in report.shift.orders.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            derived.order.order_id.clone(),
            derived.order.client_id.clone(),
            derived.order.processing_time_hr.to_string(),
            money(derived.metrics.margin_per_hour),
            money(derived.metrics.contribution_margin),
        ]);
    }
    table
}

pub fn print_shift(report: &AnalysisReport) {
    let shift = &report.shift;
    println!("\n--- Shift plan ---");
    println!("{}", shift_table(report));
    println!(
        "{} orders, {} of {} hours used, total margin {}.",
        shift.orders.len(),
        shift.total_processing_time_hr,
        shift.capacity_hr,
        money(shift.total_contribution_margin)
    );
    if !shift.skipped_order_ids.is_empty() {
        println!("Did not fit: {}", shift.skipped_order_ids.join(", "));
    }
    println!(
        "Orders are taken greedily by margin per hour. The plan is a heuristic and \
         not guaranteed to maximize total margin."
    );
}
