pub mod compose;
pub mod config;
pub mod error;
pub mod excerpt;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use config::{RunOptions, SessionConfig};
pub use error::BriefError;
pub use pipeline::{run, RunPhase};
pub use types::{Brief, Device, Excerpt, ExtractionStatus, OrganicResult, QueryParams, RunOutcome};
