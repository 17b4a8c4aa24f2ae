//! Payment simulator

use crate::{Error, Result};
use millebit_storage::{CardStore, PaymentMethod, PaymentRecord, TransactionStore};
use std::time::Duration;
use uuid::Uuid;

/// How long a simulated authorization takes, to mimic network latency.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// Fake payment processor over the stored cards and history.
#[derive(Clone)]
pub struct PaymentSimulator {
    cards: CardStore,
    transactions: TransactionStore,
    delay: Duration,
}

impl PaymentSimulator {
    /// Create a simulator over the card and transaction stores.
    pub fn new(cards: CardStore, transactions: TransactionStore) -> Self {
        Self {
            cards,
            transactions,
            delay: DEFAULT_PROCESSING_DELAY,
        }
    }

    /// Override the simulated processing delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Authorize a payment from the given card and append it to history.
    ///
    /// The card is resolved before the processing delay, so a bad card id
    /// fails fast. Amounts are cents and must be positive.
    pub async fn authorize(
        &self,
        card_id: &str,
        amount_cents: i64,
        description: Option<String>,
        method: PaymentMethod,
    ) -> Result<PaymentRecord> {
        if amount_cents <= 0 {
            return Err(Error::InvalidAmount(format!(
                "amount must be positive, got {amount_cents}"
            )));
        }

        let card = self
            .cards
            .cards()?
            .into_iter()
            .find(|card| card.id == card_id)
            .ok_or_else(|| Error::CardNotFound(card_id.to_string()))?;

        tokio::time::sleep(self.delay).await;

        let now = chrono::Utc::now().timestamp_millis();
        let record = PaymentRecord {
            id: Uuid::new_v4().to_string(),
            reference: transaction_reference(now),
            card_id: card.id.clone(),
            card_last_four: card.last_four_digits.clone(),
            amount_cents,
            description,
            method,
            created_at: now,
        };

        self.transactions.append(record.clone())?;
        tracing::info!(
            reference = %record.reference,
            last_four = %record.card_last_four,
            amount_cents,
            method = method.display_name(),
            "Payment authorized"
        );
        Ok(record)
    }

    /// Completed payments, most recent first.
    pub fn history(&self) -> Result<Vec<PaymentRecord>> {
        Ok(self.transactions.history()?)
    }
}

/// `TXN` plus the last eight digits of the millisecond clock.
fn transaction_reference(now_millis: i64) -> String {
    format!("TXN{:08}", now_millis.rem_euclid(100_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use millebit_core::CardInput;
    use millebit_storage::KvStore;

    fn simulator() -> (PaymentSimulator, CardStore) {
        let kv = KvStore::open_in_memory().unwrap();
        let cards = CardStore::new(kv.clone());
        let sim = PaymentSimulator::new(cards.clone(), TransactionStore::new(kv))
            .with_delay(Duration::from_millis(1));
        (sim, cards)
    }

    fn visa() -> CardInput {
        CardInput {
            card_number: "4111111111111111".to_string(),
            cardholder_name: "JOAO SILVA".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_authorize_records_the_payment() {
        let (sim, cards) = simulator();
        let card = cards.save_card(visa()).unwrap();

        let record = sim
            .authorize(&card.id, 2500, Some("Coffee".to_string()), PaymentMethod::Contactless)
            .await
            .unwrap();

        assert!(record.reference.starts_with("TXN"));
        assert_eq!(record.reference.len(), 11);
        assert_eq!(record.card_last_four, "1111");
        assert_eq!(record.amount_cents, 2500);

        let history = sim.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], record);
    }

    #[tokio::test]
    async fn test_unknown_card_is_rejected() {
        let (sim, _) = simulator();
        let err = sim
            .authorize("no-such-card", 100, None, PaymentMethod::QrCode)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CardNotFound(_)));
        assert!(sim.history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_amounts_are_rejected() {
        let (sim, cards) = simulator();
        let card = cards.save_card(visa()).unwrap();

        for amount in [0, -1] {
            let err = sim
                .authorize(&card.id, amount, None, PaymentMethod::Contactless)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidAmount(_)));
        }
        assert!(sim.history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let (sim, cards) = simulator();
        let card = cards.save_card(visa()).unwrap();

        let first = sim
            .authorize(&card.id, 100, None, PaymentMethod::Contactless)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = sim
            .authorize(&card.id, 200, None, PaymentMethod::QrCode)
            .await
            .unwrap();

        let history = sim.history().unwrap();
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }
}
