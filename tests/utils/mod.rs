use std::fs;
use std::path::{Path, PathBuf};

use loyalty_insights::{
    CustomerRecord, JoinedRecord, Lifestage, PremiumTier, TransactionRecord,
    models::TransactionFields,
};
use tempfile::TempDir;

pub const CUSTOMER_HEADER: &str = "LYLTY_CARD_NBR,LIFESTAGE,PREMIUM_CUSTOMER";
pub const TRANSACTION_HEADER: &str =
    "DATE,STORE_NBR,LYLTY_CARD_NBR,TXN_ID,PROD_NBR,PROD_NAME,PROD_QTY,TOT_SALES";

/// Two customers and three purchases with known aggregates
pub const WORKED_CUSTOMERS: &[&str] = &[
    "1001,YOUNG SINGLES/COUPLES,Budget",
    "1002,OLDER SINGLES/COUPLES,Mainstream",
];
pub const WORKED_TRANSACTIONS: &[&str] = &[
    "43200,1,1001,1,5,Natural Chip Compny SeaSalt175g,2,10.0",
    "43200,1,1002,2,66,CCs Nacho Cheese 175g,3,20.0",
    "43201,1,1002,3,61,Smiths Crinkle Cut Chips Chicken 170g,1,5.0",
];

/// Input files written into a temporary directory that lives as long as the fixture
pub struct Fixture {
    pub dir: TempDir,
    pub customers: PathBuf,
    pub transactions: PathBuf,
}

impl Fixture {
    /// Write customer and transaction CSV files from data rows
    #[must_use]
    pub fn new(customer_rows: &[&str], transaction_rows: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let customers = write_csv(dir.path(), "customers.csv", CUSTOMER_HEADER, customer_rows);
        let transactions = write_csv(
            dir.path(),
            "transactions.csv",
            TRANSACTION_HEADER,
            transaction_rows,
        );
        Self {
            dir,
            customers,
            transactions,
        }
    }

    /// Fixture holding the worked example
    #[must_use]
    pub fn worked_example() -> Self {
        Self::new(WORKED_CUSTOMERS, WORKED_TRANSACTIONS)
    }

    /// Directory for report output inside the fixture directory
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("report")
    }
}

/// Write a CSV file with a header line and data rows
pub fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut contents = String::from(header);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(&path, contents).unwrap();
    path
}

#[must_use]
pub fn customer(card: i64, lifestage: Lifestage, premium_tier: PremiumTier) -> CustomerRecord {
    CustomerRecord {
        loyalty_card_number: card,
        lifestage,
        premium_tier,
    }
}

#[must_use]
pub fn transaction(card: i64, date: Option<i64>, sales: Option<f64>) -> TransactionRecord {
    TransactionRecord {
        loyalty_card_number: card,
        date,
        total_sales: sales,
    }
}

#[must_use]
pub fn joined(customer: CustomerRecord, date: Option<i64>, sales: Option<f64>) -> JoinedRecord {
    JoinedRecord {
        customer,
        transaction: Some(TransactionFields {
            date,
            total_sales: sales,
        }),
    }
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
