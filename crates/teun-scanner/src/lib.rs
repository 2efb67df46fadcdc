pub mod batch;
pub mod engine;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod selection;

pub use batch::run_in_batches;
pub use engine::{
    engines_from_config, AnswerEngine, Citation, EngineAnswer, EngineKind, GoogleAiModeEngine,
    PerplexityEngine,
};
pub use error::ScanError;
pub use parser::{ResponseParser, PARSE_FAILURE_MESSAGE};
pub use scanner::{
    EngineScan, MentionScanner, PromptScan, ScanSettings, ScanSummary, ScanTarget,
    ENGINE_FAILURE_MESSAGE,
};
pub use selection::{diversity_then_volume, SelectionPolicy};
