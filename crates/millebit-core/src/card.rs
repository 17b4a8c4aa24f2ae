//! Payment card model and display-field derivation
//!
//! Cards are persisted as JSON with camelCase field names, matching the
//! schema the mobile app already has on disk.

use serde::{Deserialize, Serialize};

/// Minimum number of digits before a card number gets masked.
///
/// Shorter numbers are displayed cleaned but unmasked, since there is no
/// middle section to hide.
pub const MASK_MIN_DIGITS: usize = 8;

/// A locally stored payment card.
///
/// `last_four_digits` and `masked_number` are derived from `card_number`
/// when the card is built and are never mutated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier, assigned at creation. Time-based and immutable.
    pub id: String,
    /// Raw card number as captured from the form.
    pub card_number: String,
    /// Cardholder name as captured from the form.
    pub cardholder_name: String,
    /// Expiry month, free-form string.
    pub expiry_month: String,
    /// Expiry year, free-form string.
    pub expiry_year: String,
    /// CVV as captured from the form.
    pub cvv: String,
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last four digits of the cleaned card number.
    pub last_four_digits: String,
    /// Masked display form, e.g. `4111 ******** 1111`.
    pub masked_number: String,
}

/// Card fields captured from the add-card form, before id and derived
/// fields are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInput {
    /// Raw card number.
    pub card_number: String,
    /// Cardholder name.
    pub cardholder_name: String,
    /// Expiry month.
    pub expiry_month: String,
    /// Expiry year.
    pub expiry_year: String,
    /// CVV.
    pub cvv: String,
}

impl Card {
    /// Build a card from form input, assigning the given id and creation
    /// timestamp and deriving the display fields.
    pub fn build(input: CardInput, id: String, created_at: i64) -> Self {
        let cleaned = clean_card_number(&input.card_number);
        let char_count = cleaned.chars().count();
        let last_four_digits = if char_count >= 4 {
            cleaned.chars().skip(char_count - 4).collect()
        } else {
            cleaned.clone()
        };
        let masked_number = mask_card_number(&input.card_number);

        Self {
            id,
            card_number: input.card_number,
            cardholder_name: input.cardholder_name,
            expiry_month: input.expiry_month,
            expiry_year: input.expiry_year,
            cvv: input.cvv,
            created_at,
            last_four_digits,
            masked_number,
        }
    }
}

/// Strip whitespace from a card number as typed in the form.
pub fn clean_card_number(card_number: &str) -> String {
    card_number.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Mask a card number for display.
///
/// The first four and last four characters of the cleaned number are kept,
/// the middle is replaced with one `*` per hidden character. Numbers with
/// fewer than [`MASK_MIN_DIGITS`] characters are returned cleaned and
/// unmasked.
pub fn mask_card_number(card_number: &str) -> String {
    // Indexed by character, not byte: the form does not validate its
    // input, so multi-byte digits must mask rather than panic.
    let chars: Vec<char> = clean_card_number(card_number).chars().collect();
    if chars.len() < MASK_MIN_DIGITS {
        return chars.into_iter().collect();
    }

    let first_four: String = chars[..4].iter().collect();
    let last_four: String = chars[chars.len() - 4..].iter().collect();
    let middle = "*".repeat(chars.len() - 8);

    if middle.is_empty() {
        format!("{} {}", first_four, last_four)
    } else {
        format!("{} {} {}", first_four, middle, last_four)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(number: &str) -> CardInput {
        CardInput {
            card_number: number.to_string(),
            cardholder_name: "JOAO SILVA".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_mask_sixteen_digits() {
        assert_eq!(
            mask_card_number("4111111111111111"),
            "4111 ******** 1111"
        );
    }

    #[test]
    fn test_mask_cleans_whitespace() {
        assert_eq!(
            mask_card_number("4111 1111 1111 1111"),
            "4111 ******** 1111"
        );
    }

    #[test]
    fn test_mask_short_number_unmasked() {
        assert_eq!(mask_card_number("1234567"), "1234567");
        assert_eq!(mask_card_number("12 345"), "12345");
    }

    #[test]
    fn test_mask_eight_digits_has_empty_middle() {
        assert_eq!(mask_card_number("12345678"), "1234 5678");
    }

    #[test]
    fn test_mask_multibyte_digits() {
        // Full-width digits as an IME might produce them; one mask star
        // per hidden character, not per byte.
        assert_eq!(
            mask_card_number("４１１１１１１１１１１１１１１１"),
            "４１１１ ******** １１１１"
        );
        assert_eq!(mask_card_number("４１１１１１１"), "４１１１１１１");
    }

    #[test]
    fn test_build_with_multibyte_number_derives_fields() {
        let card = Card::build(
            input("４１１１１１１１１１１１２３４５"),
            "1".to_string(),
            0,
        );
        assert_eq!(card.last_four_digits, "２３４５");
        assert_eq!(card.masked_number, "４１１１ ******** ２３４５");
    }

    #[test]
    fn test_build_derives_fields() {
        let card = Card::build(input("4111111111111111"), "1700000000000".to_string(), 1_700_000_000_000);
        assert_eq!(card.last_four_digits, "1111");
        assert_eq!(card.masked_number, "4111 ******** 1111");
        assert_eq!(card.created_at, 1_700_000_000_000);
        assert_eq!(card.cardholder_name, "JOAO SILVA");
    }

    #[test]
    fn test_last_four_from_cleaned_number() {
        let card = Card::build(input("4111 1111 1111 1111"), "1".to_string(), 0);
        assert_eq!(card.last_four_digits, "1111");
    }

    #[test]
    fn test_serde_uses_camel_case_keys() {
        let card = Card::build(input("4111111111111111"), "42".to_string(), 7);
        let json = serde_json::to_value(&card).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("cardNumber"));
        assert!(obj.contains_key("cardholderName"));
        assert!(obj.contains_key("lastFourDigits"));
        assert!(obj.contains_key("maskedNumber"));
        assert!(obj.contains_key("createdAt"));

        let back: Card = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }
}
