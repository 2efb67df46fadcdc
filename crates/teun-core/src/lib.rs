pub mod app_config;
pub mod blocklist;
pub mod clusters;
pub mod competitors;
pub mod config;
pub mod mention;
pub mod scoring;
pub mod text;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use blocklist::{
    load_blocklist, resolve_blocklist, Blocklist, BlocklistCategory, BlocklistFile,
};
pub use clusters::build_clusters;
pub use competitors::{tally_competitors, CompetitorFilter};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use mention::{count_mentions, detect_mention, domain_stem, MentionCheck};
pub use scoring::{estimate_ai_volume, DifficultyScorer};
pub use types::{
    Cluster, CompetitorCount, Difficulty, Intent, KeywordProfile, PageContext, Prompt,
    PromptStatus, ScanResult, TrendSignal,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read blocklist file {path}: {source}")]
    BlocklistFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse blocklist file: {0}")]
    BlocklistFileParse(#[from] serde_yaml::Error),

    #[error("blocklist validation failed: {0}")]
    Validation(String),
}
