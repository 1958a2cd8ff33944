//! Human-readable record identifiers.
//!
//! Ids are a prefix plus a random number of fixed width. They are short
//! enough to read over the phone and are not guaranteed unique; the sheet has
//! no way to enforce that anyway.

use rand::Rng;
use std::ops::Range;

/// Kinds of generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Deal,
    Account,
    Quote,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Deal => "D",
            IdKind::Account => "A",
            IdKind::Quote => "Q",
        }
    }

    fn range(&self) -> Range<u32> {
        match self {
            IdKind::Deal => 1000..10000,
            IdKind::Account => 100..1000,
            IdKind::Quote => 10000..100000,
        }
    }
}

/// Generate a new id such as `D-4821`.
pub fn generate_id(kind: IdKind) -> String {
    let n = rand::rng().random_range(kind.range());
    format!("{}-{}", kind.prefix(), n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn suffix(id: &str, prefix: &str) -> u32 {
        id.strip_prefix(prefix)
            .and_then(|s| s.strip_prefix('-'))
            .and_then(|s| s.parse().ok())
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_generated_ids_stay_in_range(_seed in any::<u8>()) {
            let deal = generate_id(IdKind::Deal);
            let n = suffix(&deal, "D");
            prop_assert!((1000..10000).contains(&n));

            let account = generate_id(IdKind::Account);
            let n = suffix(&account, "A");
            prop_assert!((100..1000).contains(&n));

            let quote = generate_id(IdKind::Quote);
            let n = suffix(&quote, "Q");
            prop_assert!((10000..100000).contains(&n));
        }
    }
}
