//! Simulated credit bureau check.
//!
//! There is no real scoring: the decision is a weighted coin flip keyed on
//! the parity of the last digit of the national id.

use common::CreditStatus;
use rand::Rng;

/// Approval probability when the last digit is odd.
pub const ODD_APPROVAL_RATE: f64 = 0.7;

/// Approval probability when the last digit is even or not a digit.
pub const EVEN_APPROVAL_RATE: f64 = 0.3;

/// Decides a credit status for a newly registered customer.
///
/// Never returns [`CreditStatus::Pending`]. Two calls with the same id may
/// disagree.
pub fn check_credit<R: Rng>(national_id: &str, rng: &mut R) -> CreditStatus {
    let last_digit = national_id
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0);

    let rate = if last_digit % 2 == 1 {
        ODD_APPROVAL_RATE
    } else {
        EVEN_APPROVAL_RATE
    };

    let status = if rng.r#gen::<f64>() < rate {
        CreditStatus::Approved
    } else {
        CreditStatus::Denied
    };

    metrics::counter!("credit_checks_total", "status" => status.as_str()).increment(1);
    status
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const DRAWS: usize = 10_000;
    const TOLERANCE: f64 = 0.05;

    fn approval_rate(national_id: &str) -> f64 {
        let mut rng = rand::thread_rng();
        let approved = (0..DRAWS)
            .filter(|_| check_credit(national_id, &mut rng) == CreditStatus::Approved)
            .count();
        approved as f64 / DRAWS as f64
    }

    #[test]
    fn odd_last_digit_approves_about_seventy_percent() {
        let rate = approval_rate("12345678901");
        assert!(
            (rate - ODD_APPROVAL_RATE).abs() <= TOLERANCE,
            "approval rate {rate}"
        );
    }

    #[test]
    fn even_last_digit_approves_about_thirty_percent() {
        let rate = approval_rate("12345678900");
        assert!(
            (rate - EVEN_APPROVAL_RATE).abs() <= TOLERANCE,
            "approval rate {rate}"
        );
    }

    #[test]
    fn non_digit_ending_counts_as_even() {
        let rate = approval_rate("ABC-X");
        assert!((rate - EVEN_APPROVAL_RATE).abs() <= TOLERANCE);
        let rate = approval_rate("");
        assert!((rate - EVEN_APPROVAL_RATE).abs() <= TOLERANCE);
    }

    #[test]
    fn never_leaves_status_pending() {
        let mut rng = StdRng::seed_from_u64(7);
        for id in ["1", "2", "x", ""] {
            for _ in 0..100 {
                assert_ne!(check_credit(id, &mut rng), CreditStatus::Pending);
            }
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|_| check_credit("98765432101", &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
