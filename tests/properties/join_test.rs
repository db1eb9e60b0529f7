use loyalty_insights::join::left_join;
use loyalty_insights::{Lifestage, PremiumTier};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

use crate::utils::{customer, transaction};

proptest! {
    /// Each customer contributes max(1, its matching transactions) rows
    #[test]
    fn joined_cardinality(
        cards in proptest::collection::btree_set(0i64..50, 0..20),
        tx_cards in proptest::collection::vec(0i64..60, 0..80),
    ) {
        let customers: Vec<_> = cards
            .iter()
            .map(|c| customer(*c, Lifestage::Retirees, PremiumTier::Budget))
            .collect();
        let transactions: Vec<_> = tx_cards
            .iter()
            .map(|c| transaction(*c, Some(43200), Some(1.0)))
            .collect();

        let mut per_card: FxHashMap<i64, usize> = FxHashMap::default();
        for card in &tx_cards {
            *per_card.entry(*card).or_default() += 1;
        }
        let expected: usize = cards
            .iter()
            .map(|c| per_card.get(c).copied().unwrap_or(0).max(1))
            .sum();
        let orphans = tx_cards.iter().filter(|c| !cards.contains(*c)).count();

        let (joined, summary) = left_join(&customers, &transactions);
        prop_assert_eq!(joined.len(), expected);
        prop_assert_eq!(summary.rows, expected);
        prop_assert_eq!(summary.orphan_transactions, orphans);
        prop_assert_eq!(
            summary.matched_customers + summary.unmatched_customers,
            cards.len()
        );
    }
}

#[test]
fn test_customer_order_is_kept() {
    let customers = vec![
        customer(3, Lifestage::Retirees, PremiumTier::Budget),
        customer(1, Lifestage::NewFamilies, PremiumTier::Premium),
    ];
    let transactions = vec![
        transaction(1, Some(43200), Some(2.0)),
        transaction(3, Some(43200), Some(1.0)),
        transaction(1, None, None),
    ];

    let (joined, _) = left_join(&customers, &transactions);
    let cards: Vec<i64> = joined.iter().map(|r| r.loyalty_card_number()).collect();
    assert_eq!(cards, vec![3, 1, 1]);
    assert_eq!(joined[1].total_sales(), Some(2.0));
    assert_eq!(joined[2].total_sales(), None);
}
