use loyalty_insights::cleaner::{clean_customers, clean_transactions};
use loyalty_insights::loader::{LoadOptions, load_sources};
use loyalty_insights::{Lifestage, PremiumTier};

use crate::utils::Fixture;

fn messy() -> Fixture {
    Fixture::new(
        &[
            "1001,YOUNG SINGLES/COUPLES,Budget",
            "1001,YOUNG SINGLES/COUPLES,Budget",
            "1002,OLDER SINGLES/COUPLES,Mainstream",
            "1002,RETIREES,Premium",
            "1003,RETIREES,Premium",
        ],
        &[
            "43200,1,1001,1,5,Chips,2,10.0",
            "43200,1,1001,1,5,Chips,2,10.0",
            ",1,1002,2,5,Chips,1,3.0",
            "43205,1,1002,3,5,Chips,1,abc",
            "43206,1,1003,4,5,Chips,1,7.5",
        ],
    )
}

#[test]
fn test_clean_customers() {
    let fixture = messy();
    let (customers, _) =
        load_sources(&fixture.customers, &fixture.transactions, LoadOptions::default()).unwrap();

    let cleaned = clean_customers(&customers).unwrap();
    assert_eq!(cleaned.report.rows_in, 5);
    assert_eq!(cleaned.report.duplicates_removed, 1);
    assert_eq!(cleaned.report.conflicting_keys, 1);
    assert_eq!(cleaned.records.len(), 3);

    // the first row for a card wins
    let second = cleaned
        .records
        .iter()
        .find(|c| c.loyalty_card_number == 1002)
        .unwrap();
    assert_eq!(second.lifestage, Lifestage::OlderSinglesCouples);
    assert_eq!(second.premium_tier, PremiumTier::Mainstream);
}

#[test]
fn test_clean_transactions() {
    let fixture = messy();
    let (_, transactions) =
        load_sources(&fixture.customers, &fixture.transactions, LoadOptions::default()).unwrap();

    let cleaned = clean_transactions(&transactions).unwrap();
    let report = &cleaned.report;
    assert_eq!(report.rows_in, 5);
    assert_eq!(report.total_nulls(), 1);
    assert_eq!(report.rows_with_nulls, 1);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(cleaned.records.len(), 3);

    // an unparseable sale stays as a missing value and is counted
    let failures = report
        .value_parse_failures
        .iter()
        .find(|(column, _)| column == "TOT_SALES")
        .map(|(_, count)| *count);
    assert_eq!(failures, Some(1));
    let unparsed = cleaned
        .records
        .iter()
        .find(|t| t.date == Some(43205))
        .unwrap();
    assert_eq!(unparsed.total_sales, None);
}

#[test]
fn test_cleaned_relations_have_no_nulls_or_duplicates() {
    use loyalty_insights::cleaner::clean_relation;

    let fixture = messy();
    let (customers, transactions) =
        load_sources(&fixture.customers, &fixture.transactions, LoadOptions::default()).unwrap();

    for relation in [&customers, &transactions] {
        let (cleaned, _) = clean_relation(relation).unwrap();
        assert!(!cleaned.has_nulls());
        let (deduplicated, removed) =
            loyalty_insights::cleaner::drop_duplicates(&cleaned).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(deduplicated.num_rows(), cleaned.num_rows());
    }
}

#[test]
fn test_unparseable_key_past_scanned_rows_is_dropped() {
    let fixture = Fixture::new(
        &["1001,RETIREES,Premium"],
        &[
            "43200,1,1001,1,5,Chips,2,10.0",
            "43200,1,1001,2,5,Chips,2,4.0",
            "43201,1,card-9,3,5,Chips,1,3.0",
        ],
    );
    let options = LoadOptions {
        infer_records: Some(1),
    };
    let (_, transactions) =
        load_sources(&fixture.customers, &fixture.transactions, options).unwrap();

    let cleaned = clean_transactions(&transactions).unwrap();
    assert_eq!(cleaned.report.key_parse_failures, 1);
    assert_eq!(cleaned.records.len(), 2);
}
