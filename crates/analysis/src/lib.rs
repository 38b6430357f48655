//! Views derived from a decoded instruction stream: the instruction tree, function segments,
//! reconstructed events, selector dispatcher, search queries and the joined report.
//!
//! Every view is a pure function of the immutable stream and can be computed independently.

pub mod dispatcher;
pub mod events;
pub mod functions;
pub mod metrics;
pub mod report;
pub mod search;
pub mod tree;

pub use report::{Report, analyze, analyze_bytes, analyze_concurrently};
pub use search::{Query, selector_of};
