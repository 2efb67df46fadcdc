//! Names that never count as a competitor.
//!
//! One list feeds both enforcement points: it is rendered into the answer
//! engine and parser instructions, and it filters extracted names afterwards.
//! Deployments can replace the built-in list with a YAML file:
//!
//! ```yaml
//! version: 2
//! categories:
//!   - label: Zoekmachines
//!     names: [Google, Bing]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::text::compact_key;
use crate::ConfigError;

/// Version of the built-in list. Bump when the default names change.
pub const BUILTIN_BLOCKLIST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistCategory {
    pub label: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistFile {
    pub version: u32,
    pub categories: Vec<BlocklistCategory>,
}

#[derive(Debug, Clone)]
pub struct Blocklist {
    version: u32,
    categories: Vec<BlocklistCategory>,
    index: HashSet<String>,
}

fn category(label: &str, names: &[&str]) -> BlocklistCategory {
    BlocklistCategory {
        label: label.to_string(),
        names: names.iter().map(|n| (*n).to_string()).collect(),
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Blocklist {
    #[must_use]
    pub fn builtin() -> Self {
        let categories = vec![
            category(
                "Wereldwijde consumentenmerken",
                &[
                    "Coca-Cola",
                    "Nike",
                    "Adidas",
                    "Apple",
                    "Samsung",
                    "Lego",
                    "McDonald's",
                    "Microsoft",
                ],
            ),
            category(
                "Tech-platforms",
                &[
                    "Google",
                    "Facebook",
                    "Instagram",
                    "YouTube",
                    "Amazon",
                    "Netflix",
                    "WordPress",
                    "Shopify",
                    "WhatsApp",
                    "Telegram",
                    "Pinterest",
                    "Reddit",
                ],
            ),
            category(
                "SEO- en marketingtools",
                &["Semrush", "Ahrefs", "Moz", "Mailchimp", "HubSpot"],
            ),
            category(
                "Social media",
                &["LinkedIn", "Twitter", "X", "TikTok"],
            ),
            category(
                "Zoekmachines",
                &["Google Search", "Bing", "DuckDuckGo", "Yahoo"],
            ),
            category(
                "AI-assistenten",
                &["ChatGPT", "OpenAI", "Anthropic", "Perplexity"],
            ),
        ];
        Self::from_parts(BUILTIN_BLOCKLIST_VERSION, categories)
    }

    fn from_parts(version: u32, categories: Vec<BlocklistCategory>) -> Self {
        let index = categories
            .iter()
            .flat_map(|c| c.names.iter())
            .map(|n| compact_key(n))
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            version,
            categories,
            index,
        }
    }

    /// Build a blocklist from a parsed file after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero version, empty labels,
    /// empty names, or a name listed twice.
    pub fn from_file(file: BlocklistFile) -> Result<Self, ConfigError> {
        validate_blocklist(&file)?;
        Ok(Self::from_parts(file.version, file.categories))
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn categories(&self) -> &[BlocklistCategory] {
        &self.categories
    }

    /// Whether `name` is a blocked entity.
    ///
    /// Matches on the compact form of the whole name, or of its first word
    /// when that word is itself a blocked name of four or more characters
    /// (`"Google Maps"`, `"Amazon.nl"`).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let key = compact_key(name);
        if key.is_empty() {
            return false;
        }
        if self.index.contains(&key) {
            return true;
        }
        name.split(|c: char| c.is_whitespace() || c == '.')
            .find(|t| !t.is_empty())
            .map(compact_key)
            .is_some_and(|first| first.chars().count() >= 4 && self.index.contains(&first))
    }

    /// Renders the list as Dutch bullet lines for LLM instructions.
    #[must_use]
    pub fn prompt_section(&self) -> String {
        self.categories
            .iter()
            .map(|c| format!("- {}: {}", c.label, c.names.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Load and validate a blocklist from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_blocklist(path: &Path) -> Result<Blocklist, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BlocklistFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: BlocklistFile = serde_yaml::from_str(&content)?;
    Blocklist::from_file(file)
}

/// Loads the configured override file, or the built-in list when none is set.
///
/// # Errors
///
/// Same as [`load_blocklist`].
pub fn resolve_blocklist(path: Option<&Path>) -> Result<Blocklist, ConfigError> {
    match path {
        Some(path) => load_blocklist(path),
        None => Ok(Blocklist::builtin()),
    }
}

fn validate_blocklist(file: &BlocklistFile) -> Result<(), ConfigError> {
    if file.version == 0 {
        return Err(ConfigError::Validation(
            "blocklist version must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in &file.categories {
        if category.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category label must be non-empty".to_string(),
            ));
        }
        for name in &category.names {
            let key = compact_key(name);
            if key.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{}' contains an empty name",
                    category.label
                )));
            }
            if !seen.insert(key) {
                return Err(ConfigError::Validation(format!(
                    "duplicate blocklist name: '{name}'"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "blocklist_test.rs"]
mod tests;
