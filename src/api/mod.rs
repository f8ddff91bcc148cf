//! Host-facing API
//!
//! The tracking context, API error types and pose report formatting.

pub mod context;
pub mod formatting;
pub mod types;

pub use context::TrackingContext;
pub use formatting::{CsvFormatter, JsonFormatter, PoseData, PoseReport, TextFormatter, WandReport};
pub use types::{ApiError, ApiResult, ContextStats};
