pub mod feed;
pub mod types;

pub use feed::{FeedClient, FeedError};
pub use types::{DataPoint, DateRange, Field, FieldError, Observation};
