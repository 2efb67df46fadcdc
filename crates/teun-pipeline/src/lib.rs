pub mod discovery;
pub mod error;
pub mod request;
pub mod response;
pub mod session;

pub use discovery::DiscoveryPipeline;
pub use error::PipelineError;
pub use request::{DiscoveryRequest, Tier, TierLimits};
pub use response::{DiscoveryMeta, DiscoveryResponse, ExtractedSummary, SourceInfo};
pub use session::resolve_session_token;
