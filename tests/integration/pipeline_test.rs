use chrono::NaiveDate;
use loyalty_insights::aggregate::SegmentOutcome;
use loyalty_insights::report::render_report;
use loyalty_insights::{
    AnalysisConfig, AnalysisError, DayOfWeek, Expr, Lifestage, MonthName, PremiumTier,
    SegmentDefinition, run, write_artifacts,
};

use crate::utils::{Fixture, approx_eq};

fn config_for(fixture: &Fixture) -> AnalysisConfig {
    AnalysisConfig {
        output_dir: fixture.output_dir(),
        ..AnalysisConfig::default()
    }
}

/// Two customers, three purchases: the aggregates every reader of the report checks
#[test]
fn test_worked_example() {
    let fixture = Fixture::worked_example();
    let report = run(&fixture.customers, &fixture.transactions, &config_for(&fixture)).unwrap();

    assert_eq!(report.join.rows, 3);
    assert_eq!(report.join.unmatched_customers, 0);
    assert!(approx_eq(report.total_sales, 35.0));

    assert_eq!(report.by_lifestage.groups.len(), 2);
    assert_eq!(report.by_lifestage.get(Lifestage::YoungSinglesCouples), Some(10.0));
    assert_eq!(report.by_lifestage.get(Lifestage::OlderSinglesCouples), Some(25.0));
    assert_eq!(report.by_premium.get(PremiumTier::Mainstream), Some(25.0));

    assert_eq!(report.by_day_of_week.groups.len(), 7);
    assert_eq!(report.by_day_of_week.get(DayOfWeek::Thursday), Some(30.0));
    assert_eq!(report.by_day_of_week.get(DayOfWeek::Friday), Some(5.0));
    assert_eq!(report.by_day_of_week.get(DayOfWeek::Monday), Some(0.0));
    assert_eq!(report.by_month.get(MonthName::April), Some(35.0));

    let high_value = report.segments[0].metrics().unwrap();
    assert!(approx_eq(high_value.total_sales, 25.0));
    assert!(approx_eq(high_value.mean_sales, 12.5));
    assert!(approx_eq(high_value.purchase_frequency, 2.0));

    // nobody in the example is a premium customer
    assert!(matches!(report.segments[1], SegmentOutcome::Undefined { .. }));

    let range = report.date_range.unwrap();
    assert_eq!(range.min, NaiveDate::from_ymd_opt(2018, 4, 12).unwrap());
    assert_eq!(range.max, NaiveDate::from_ymd_opt(2018, 4, 13).unwrap());
    assert_eq!(range.unique_dates, 2);

    assert_eq!(
        report.premium_distribution,
        vec![(PremiumTier::Mainstream, 2), (PremiumTier::Budget, 1)]
    );
}

#[test]
fn test_report_text_and_artifacts() {
    let fixture = Fixture::worked_example();
    let config = config_for(&fixture);
    let report = run(&fixture.customers, &fixture.transactions, &config).unwrap();

    let text = render_report(&report);
    assert!(text.contains("Merged data shape: 3 rows"));
    assert!(text.contains("Total Sales by Lifestage"));
    assert!(text.contains("Average Sales per Transaction: 12.50"));
    assert!(text.contains("Number of unique dates: 2"));
    // lifestage sums are listed largest first
    let section = &text[text.find("Total Sales by Lifestage").unwrap()..];
    let older = section.find("OLDER SINGLES/COUPLES").unwrap();
    let young = section.find("YOUNG SINGLES/COUPLES").unwrap();
    assert!(older < young);

    let written = write_artifacts(&report, &config).unwrap();
    assert_eq!(written.len(), 5);
    for name in [
        "sales_by_lifestage.svg",
        "sales_by_premium.svg",
        "sales_by_day_of_week.svg",
        "sales_by_month.svg",
        "summary.json",
    ] {
        assert!(config.output_dir.join(name).is_file(), "{name} missing");
    }

    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(config.output_dir.join("summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["join"]["rows"], 3);
    assert_eq!(summary["total_sales"], 35.0);
    assert_eq!(summary["segments"][1]["status"], "undefined");
    assert!(summary.get("customer_preview").is_none());
}

#[test]
fn test_artifacts_can_be_switched_off() {
    let fixture = Fixture::worked_example();
    let config = AnalysisConfig {
        write_charts: false,
        write_json: false,
        ..config_for(&fixture)
    };
    let report = run(&fixture.customers, &fixture.transactions, &config).unwrap();
    assert!(write_artifacts(&report, &config).unwrap().is_empty());
    assert!(!config.output_dir.exists());
}

#[test]
fn test_customer_without_transactions_is_kept() {
    let fixture = Fixture::new(
        &[
            "1001,YOUNG SINGLES/COUPLES,Budget",
            "1003,RETIREES,Premium",
        ],
        &["43200,1,1001,1,5,Chips,2,10.0", "43200,1,9999,2,5,Chips,1,4.0"],
    );
    let report = run(&fixture.customers, &fixture.transactions, &config_for(&fixture)).unwrap();

    assert_eq!(report.join.rows, 2);
    assert_eq!(report.join.unmatched_customers, 1);
    assert_eq!(report.join.orphan_transactions, 1);
    // the orphan purchase is not part of any total
    assert!(approx_eq(report.total_sales, 10.0));
    assert_eq!(report.by_lifestage.get(Lifestage::Retirees), Some(0.0));
    assert!(matches!(report.segments[1], SegmentOutcome::Undefined { .. }));
}

#[test]
fn test_custom_segments() {
    let fixture = Fixture::worked_example();
    let config = AnalysisConfig {
        segments: vec![
            SegmentDefinition::new("everyone", Expr::AlwaysTrue),
            SegmentDefinition::new("fridays", Expr::DayOfWeek(DayOfWeek::Friday)),
        ],
        ..config_for(&fixture)
    };
    let report = run(&fixture.customers, &fixture.transactions, &config).unwrap();

    let everyone = report.segments[0].metrics().unwrap();
    assert_eq!(everyone.purchases, 3);
    assert_eq!(everyone.customers, 2);
    assert!(approx_eq(everyone.purchase_frequency, 1.5));

    let fridays = report.segments[1].metrics().unwrap();
    assert!(approx_eq(fridays.total_sales, 5.0));
}

#[test]
fn test_missing_source_aborts() {
    let fixture = Fixture::worked_example();
    let missing = fixture.dir.path().join("nope.csv");
    let err = run(&missing, &fixture.transactions, &config_for(&fixture)).unwrap_err();
    assert!(matches!(err, AnalysisError::SourceNotFound { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_invalid_config_aborts() {
    let fixture = Fixture::worked_example();
    let mut config = config_for(&fixture);
    config.chart.width = 0;
    let err = run(&fixture.customers, &fixture.transactions, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::Config(_)));
}

#[test]
fn test_bad_value_past_scanned_rows_becomes_null() {
    let scanned = AnalysisConfig::default().infer_records.unwrap();
    let mut rows: Vec<String> = (0..scanned)
        .map(|i| format!("43200,1,1001,{i},5,Chips,1,1.0"))
        .collect();
    rows.push(format!("soon,1,1001,{scanned},5,Chips,1,2.0"));
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

    let fixture = Fixture::new(&["1001,RETIREES,Premium"], &rows);
    let report = run(&fixture.customers, &fixture.transactions, &config_for(&fixture)).unwrap();

    assert_eq!(report.transaction_cleaning.rows_out, scanned + 1);
    let date_failures = report
        .transaction_cleaning
        .value_parse_failures
        .iter()
        .find(|(column, _)| column == "DATE")
        .map(|(_, count)| *count);
    assert_eq!(date_failures, Some(1));
    assert_eq!(report.join.rows, scanned + 1);
    // the undated purchase still counts toward totals, but toward no weekday
    #[allow(clippy::cast_precision_loss)]
    let dated_total = scanned as f64;
    assert!(approx_eq(report.total_sales, dated_total + 2.0));
    assert!(approx_eq(report.by_day_of_week.total(), dated_total));
}

#[test]
fn test_segment_member_without_purchases_lowers_frequency() {
    let fixture = Fixture::new(
        &["1001,RETIREES,Premium", "1002,RETIREES,Premium"],
        &["43200,1,1001,1,5,Chips,2,4.0", "43201,1,1001,2,5,Chips,1,6.0"],
    );
    let report = run(&fixture.customers, &fixture.transactions, &config_for(&fixture)).unwrap();

    let premium = report.segments[1].metrics().unwrap();
    assert_eq!(premium.purchases, 2);
    assert_eq!(premium.customers, 2);
    assert!(approx_eq(premium.mean_sales, 5.0));
    assert!(approx_eq(premium.purchase_frequency, 1.0));
}

#[test]
fn test_missing_value_tokens_are_dropped() {
    let fixture = Fixture::new(
        &[
            "1001,RETIREES,Premium",
            "1002,NA,Budget",
            "1003,YOUNG FAMILIES,N/A",
        ],
        &["43200,1,1001,1,5,Chips,2,4.0", "43201,1,1001,2,5,Chips,1,NaN"],
    );
    let report = run(&fixture.customers, &fixture.transactions, &config_for(&fixture)).unwrap();

    assert_eq!(report.customer_cleaning.rows_with_nulls, 2);
    assert_eq!(report.customer_cleaning.rows_out, 1);
    assert_eq!(report.transaction_cleaning.rows_with_nulls, 1);
    assert!(report.total_sales.is_finite());
    assert!(approx_eq(report.total_sales, 4.0));
}
