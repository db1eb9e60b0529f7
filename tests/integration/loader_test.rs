use loyalty_insights::loader::{LoadOptions, load_relation, load_sources};
use loyalty_insights::schema::RelationKind;
use loyalty_insights::AnalysisError;

use crate::utils::{CUSTOMER_HEADER, Fixture, write_csv};

#[test]
fn test_load_sources() {
    let fixture = Fixture::worked_example();
    let (customers, transactions) =
        load_sources(&fixture.customers, &fixture.transactions, LoadOptions::default()).unwrap();

    assert_eq!(customers.kind(), RelationKind::Customer);
    assert_eq!(customers.num_rows(), 2);
    assert_eq!(transactions.num_rows(), 3);
    // extra columns are carried but not required
    assert_eq!(transactions.num_columns(), 8);

    let preview = customers.head(5).unwrap();
    assert!(preview.contains("LYLTY_CARD_NBR"));
    assert!(preview.contains("OLDER SINGLES/COUPLES"));
}

#[test]
fn test_unknown_lifestage_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "customers.csv",
        CUSTOMER_HEADER,
        &["1001,YOUNG SINGLES/COUPLES,Budget", "1002,TEENAGERS,Budget"],
    );

    let err = load_relation(&path, RelationKind::Customer, LoadOptions::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Schema(_)));
    assert!(err.to_string().contains("TEENAGERS"));
}

#[test]
fn test_missing_columns_are_all_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path(), "customers.csv", "LYLTY_CARD_NBR", &["1001"]);

    let err = load_relation(&path, RelationKind::Customer, LoadOptions::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("LIFESTAGE"));
    assert!(message.contains("PREMIUM_CUSTOMER"));
}

#[test]
fn test_category_case_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "customers.csv",
        CUSTOMER_HEADER,
        &["1001,young singles/couples,BUDGET"],
    );

    let relation = load_relation(&path, RelationKind::Customer, LoadOptions::default()).unwrap();
    assert_eq!(relation.num_rows(), 1);
}
