//! Request model: one immutable outlier detection request and its builder.

pub mod builder;
pub mod model;
pub mod types;

pub use builder::OutlierRequestBuilder;
pub use model::OutlierDetectionRequest;
pub use types::{DataItem, OrgUnit};
