//! Property tests for card number masking

use millebit_core::{clean_card_number, mask_card_number, Card, CardInput};
use proptest::prelude::*;

proptest! {
    #[test]
    fn mask_keeps_first_and_last_four(digits in "[0-9]{8,19}") {
        let masked = mask_card_number(&digits);
        prop_assert!(masked.starts_with(&digits[..4]));
        prop_assert!(masked.ends_with(&digits[digits.len() - 4..]));
    }

    #[test]
    fn mask_hides_exactly_the_middle(digits in "[0-9]{9,19}") {
        let masked = mask_card_number(&digits);
        let stars = masked.chars().filter(|&c| c == '*').count();
        prop_assert_eq!(stars, digits.len() - 8);
    }

    #[test]
    fn short_numbers_come_back_cleaned(digits in "[0-9]{1,7}") {
        prop_assert_eq!(mask_card_number(&digits), digits);
    }

    #[test]
    fn mask_counts_characters_not_bytes(digits in "[０-９]{8,19}") {
        let masked = mask_card_number(&digits);
        let chars: Vec<char> = digits.chars().collect();
        let stars = masked.chars().filter(|&c| c == '*').count();
        prop_assert_eq!(stars, chars.len() - 8);
        prop_assert!(masked.starts_with(&chars[..4].iter().collect::<String>()));
        prop_assert!(masked.ends_with(&chars[chars.len() - 4..].iter().collect::<String>()));
    }

    #[test]
    fn cleaning_is_idempotent(raw in "[0-9 ]{1,24}") {
        let once = clean_card_number(&raw);
        prop_assert_eq!(clean_card_number(&once), once);
    }

    #[test]
    fn derived_fields_follow_the_number(digits in "[0-9]{8,19}") {
        let card = Card::build(
            CardInput {
                card_number: digits.clone(),
                cardholder_name: "HOLDER".to_string(),
                expiry_month: "01".to_string(),
                expiry_year: "30".to_string(),
                cvv: "000".to_string(),
            },
            "1".to_string(),
            0,
        );
        prop_assert_eq!(&card.last_four_digits, &digits[digits.len() - 4..]);
        prop_assert_eq!(card.masked_number, mask_card_number(&digits));
    }
}
