use rust_decimal::Decimal;

/// Probability-weighted combination of a down-move and an up-move outcome.
pub fn expectation(
    negative_outcome: Decimal,
    positive_outcome: Decimal,
    negative_probability: Decimal,
    positive_probability: Decimal,
) -> Decimal {
    negative_outcome * negative_probability + positive_outcome * positive_probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_expectation_is_exact() {
        // 0.1 * 0.3 + 0.2 * 0.7 = 0.03 + 0.14
        let value = expectation(d("0.1"), d("0.2"), d("0.3"), d("0.7"));
        assert_eq!(value, d("0.17"));
    }

    #[test]
    fn test_expectation_with_complementary_probability() {
        let p = d("0.3636363636");
        let (a, b) = (d("-0.75"), d("0.5"));
        let value = expectation(a, b, p, Decimal::ONE - p);
        assert_eq!(value, a * p + b * (Decimal::ONE - p));
    }

    #[test]
    fn test_symmetric_outcomes_with_even_odds_cancel() {
        let value = expectation(d("-2.5"), d("2.5"), d("0.5"), d("0.5"));
        assert!(value.is_zero());
    }
}
