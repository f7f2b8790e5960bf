use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Consecutive deltas of a series, partitioned by sign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifferenceSet {
    pub all: Vec<Decimal>,
    pub positive: Vec<Decimal>,
    pub negative: Vec<Decimal>,
    pub absolute: Vec<Decimal>,
}

impl DifferenceSet {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }
}

pub struct SequenceDifferencer<'a> {
    values: &'a [Decimal],
    include_zero_differences: bool,
}

impl<'a> SequenceDifferencer<'a> {
    pub fn new(values: &'a [Decimal]) -> Self {
        Self {
            values,
            include_zero_differences: true,
        }
    }

    pub fn include_zero_differences(mut self, include: bool) -> Self {
        self.include_zero_differences = include;
        self
    }

    /// `v[i] - v[i-1]` for every consecutive pair, in series order.
    pub fn difference(&self) -> Vec<Decimal> {
        self.values
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|delta| self.include_zero_differences || !delta.is_zero())
            .collect()
    }

    pub fn positive_difference(&self) -> Vec<Decimal> {
        self.difference()
            .into_iter()
            .filter(|delta| *delta > Decimal::ZERO)
            .collect()
    }

    pub fn negative_difference(&self) -> Vec<Decimal> {
        self.difference()
            .into_iter()
            .filter(|delta| *delta < Decimal::ZERO)
            .collect()
    }

    pub fn absolute_difference(&self) -> Vec<Decimal> {
        self.difference().into_iter().map(|delta| delta.abs()).collect()
    }

    /// All four sets from a single pass over the series.
    pub fn decompose(&self) -> DifferenceSet {
        let all = self.difference();
        let mut set = DifferenceSet {
            absolute: Vec::with_capacity(all.len()),
            ..DifferenceSet::default()
        };

        for delta in &all {
            match delta.cmp(&Decimal::ZERO) {
                Ordering::Greater => set.positive.push(*delta),
                Ordering::Less => set.negative.push(*delta),
                Ordering::Equal => {}
            }
            set.absolute.push(delta.abs());
        }

        set.all = all;
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|v| d(v)).collect()
    }

    #[test]
    fn test_difference_keeps_zero_by_default() {
        let values = series(&["1.0", "1.0", "2.5", "2.0"]);
        let differencer = SequenceDifferencer::new(&values);

        assert_eq!(differencer.difference(), series(&["0", "1.5", "-0.5"]));
    }

    #[test]
    fn test_difference_drops_zero_when_excluded() {
        let values = series(&["1.0", "1.0", "2.5", "2.0"]);
        let differencer = SequenceDifferencer::new(&values).include_zero_differences(false);

        assert_eq!(differencer.difference(), series(&["1.5", "-0.5"]));
    }

    #[test]
    fn test_sign_partitions() {
        let values = series(&["1.0", "2.0", "1.5", "1.0", "1.5"]);
        let differencer = SequenceDifferencer::new(&values).include_zero_differences(false);

        assert_eq!(differencer.positive_difference(), series(&["1.0", "0.5"]));
        assert_eq!(differencer.negative_difference(), series(&["-0.5", "-0.5"]));
        assert_eq!(
            differencer.absolute_difference(),
            series(&["1.0", "0.5", "0.5", "0.5"])
        );
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let values = series(&["3", "3", "3"]);
        let differencer = SequenceDifferencer::new(&values);

        assert_eq!(differencer.difference().len(), 2);
        assert!(differencer.positive_difference().is_empty());
        assert!(differencer.negative_difference().is_empty());
    }

    #[test]
    fn test_decompose_matches_individual_operations() {
        let values = series(&["10", "12.25", "12.25", "11", "15.5"]);
        let differencer = SequenceDifferencer::new(&values).include_zero_differences(false);
        let set = differencer.decompose();

        assert_eq!(set.all, differencer.difference());
        assert_eq!(set.positive, differencer.positive_difference());
        assert_eq!(set.negative, differencer.negative_difference());
        assert_eq!(set.absolute, differencer.absolute_difference());
    }

    #[test]
    fn test_partition_counts_add_up_on_random_series() {
        let mut rng = rand::thread_rng();

        for _ in 0..50 {
            let len = rng.gen_range(2..40);
            // Small integer steps so that zero deltas actually occur
            let values: Vec<Decimal> = (0..len)
                .map(|_| Decimal::new(rng.gen_range(0..6), 1))
                .collect();
            let set = SequenceDifferencer::new(&values)
                .include_zero_differences(false)
                .decompose();

            assert_eq!(set.len(), set.positive.len() + set.negative.len());
            assert!(set.all.iter().all(|delta| !delta.is_zero()));
        }
    }
}
