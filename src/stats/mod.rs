pub mod difference;
pub mod distribution;
pub mod expectation;
pub mod tendency;

pub use difference::{DifferenceSet, SequenceDifferencer};
pub use distribution::{BoundedDistribution, TendencyBounds};
pub use expectation::expectation;
pub use tendency::{Dispersion, Tendency, TendencyEstimator, UnknownVariant};
