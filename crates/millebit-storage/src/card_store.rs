//! Card list persistence
//!
//! The card collection is stored as one JSON array under the app's cards
//! key. Save and delete rewrite the whole array through
//! [`KvStore::update`], so concurrent writers cannot drop each other's
//! cards.

use crate::kv::keys;
use crate::{Error, KvStore, Result};
use millebit_core::{Card, CardInput};
use std::cmp::Reverse;

/// Durable list of payment cards.
#[derive(Clone)]
pub struct CardStore {
    kv: KvStore,
}

impl CardStore {
    /// Create a card store over the shared key-value store.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Persist a new card built from form input.
    ///
    /// The id and `created_at` come from the millisecond clock; the id is
    /// bumped until unique so two saves in the same millisecond still get
    /// distinct, time-ordered ids. Derived display fields are recomputed
    /// here and nowhere else.
    pub fn save_card(&self, input: CardInput) -> Result<Card> {
        let card = self.kv.update(keys::CARDS, |current| {
            let mut cards = decode_cards(current)?;

            let now = chrono::Utc::now().timestamp_millis();
            let id = next_card_id(&cards, now);
            let card = Card::build(input, id, now);

            cards.push(card.clone());
            let raw = serde_json::to_string(&cards)?;
            Ok((Some(raw), card))
        })?;

        tracing::debug!(id = %card.id, last_four = %card.last_four_digits, "Card saved");
        Ok(card)
    }

    /// All stored cards, most recent first. Ties keep storage order.
    ///
    /// An empty or absent collection is an empty vec; a collection that
    /// fails to decode is [`Error::Corrupted`].
    pub fn cards(&self) -> Result<Vec<Card>> {
        let mut cards = decode_cards(self.kv.get_raw(keys::CARDS)?)?;
        cards.sort_by_key(|card| Reverse(card.created_at));
        Ok(cards)
    }

    /// Remove the card with the given id.
    ///
    /// Returns whether a card was removed, so a repeated call with the same
    /// id reports `false`.
    pub fn delete_card(&self, id: &str) -> Result<bool> {
        let removed = self.kv.update(keys::CARDS, |current| {
            let mut cards = decode_cards(current)?;
            let before = cards.len();
            cards.retain(|card| card.id != id);
            let removed = cards.len() != before;

            let raw = serde_json::to_string(&cards)?;
            Ok((Some(raw), removed))
        })?;

        if removed {
            tracing::debug!(id, "Card deleted");
        }
        Ok(removed)
    }

    /// Remove the entire stored collection.
    pub fn clear_all(&self) -> Result<()> {
        self.kv.delete(keys::CARDS)?;
        tracing::debug!("All cards cleared");
        Ok(())
    }
}

fn decode_cards(raw: Option<String>) -> Result<Vec<Card>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(error = %e, "Corrupted card collection");
            Error::Corrupted {
                key: keys::CARDS.to_string(),
                reason: e.to_string(),
            }
        }),
    }
}

fn next_card_id(cards: &[Card], now: i64) -> String {
    let mut candidate = now;
    while cards.iter().any(|card| card.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CardStore {
        CardStore::new(KvStore::open_in_memory().unwrap())
    }

    fn input(number: &str, holder: &str) -> CardInput {
        CardInput {
            card_number: number.to_string(),
            cardholder_name: holder.to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_save_then_list() {
        let cards = store();
        let saved = cards
            .save_card(input("4111111111111111", "JOAO SILVA"))
            .unwrap();
        assert_eq!(saved.last_four_digits, "1111");
        assert_eq!(saved.masked_number, "4111 ******** 1111");

        let listed = cards.cards().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], saved);
    }

    #[test]
    fn test_empty_store_lists_empty() {
        let cards = store();
        assert!(cards.cards().unwrap().is_empty());
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let cards = store();
        let first = cards.save_card(input("4111111111111111", "A")).unwrap();
        let second = cards.save_card(input("5555555555554444", "B")).unwrap();
        assert!(second.created_at >= first.created_at);

        let listed = cards.cards().unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_ids_are_unique_within_one_millisecond() {
        let cards = store();
        let a = cards.save_card(input("4111111111111111", "A")).unwrap();
        let b = cards.save_card(input("5555555555554444", "B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let cards = store();
        let saved = cards.save_card(input("4111111111111111", "A")).unwrap();

        assert!(cards.delete_card(&saved.id).unwrap());
        assert!(!cards.delete_card(&saved.id).unwrap());
        assert!(cards.cards().unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_empties_the_list() {
        let cards = store();
        cards.save_card(input("4111111111111111", "A")).unwrap();
        cards.save_card(input("5555555555554444", "B")).unwrap();

        cards.clear_all().unwrap();
        assert!(cards.cards().unwrap().is_empty());
    }

    #[test]
    fn test_corrupted_collection_surfaces_error() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.put_raw(keys::CARDS, "not json at all").unwrap();
        let cards = CardStore::new(kv);
        assert!(matches!(cards.cards(), Err(Error::Corrupted { .. })));
    }
}
