use std::collections::{HashMap, HashSet};

use crate::blocklist::Blocklist;
use crate::text::compact_key;
use crate::types::{CompetitorCount, Prompt};

/// Filters candidate competitor names against the target company and the
/// shared blocklist.
#[derive(Debug, Clone)]
pub struct CompetitorFilter<'a> {
    blocklist: &'a Blocklist,
    company_lower: String,
    company_key: String,
}

impl<'a> CompetitorFilter<'a> {
    #[must_use]
    pub fn new(blocklist: &'a Blocklist, company: &str) -> Self {
        Self {
            blocklist,
            company_lower: company.trim().to_lowercase(),
            company_key: compact_key(company),
        }
    }

    /// Whether `name` refers to the target company (either contains the other).
    #[must_use]
    pub fn is_company(&self, name: &str) -> bool {
        if self.company_key.is_empty() {
            return false;
        }
        let lower = name.trim().to_lowercase();
        let key = compact_key(name);
        if key.is_empty() {
            return false;
        }
        lower.contains(&self.company_lower)
            || self.company_lower.contains(&lower)
            || key.contains(&self.company_key)
            || self.company_key.contains(&key)
    }

    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        let name = name.trim();
        !name.is_empty() && !self.is_company(name) && !self.blocklist.contains(name)
    }

    /// Keeps accepted names, deduplicated case-insensitively, first `cap` only.
    #[must_use]
    pub fn collect<I, S>(&self, names: I, cap: usize) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for name in names {
            if out.len() >= cap {
                break;
            }
            let name = name.as_ref().trim();
            if self.accepts(name) && seen.insert(name.to_lowercase()) {
                out.push(name.to_string());
            }
        }
        out
    }
}

/// Counts how many prompts list each competitor and returns the top `limit`,
/// most frequent first, first-seen order on ties.
#[must_use]
pub fn tally_competitors(prompts: &[Prompt], limit: usize) -> Vec<CompetitorCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in prompts.iter().flat_map(|p| p.top_competitors.iter()) {
        let entry = counts.entry(name.clone()).or_insert_with(|| {
            order.push(name.clone());
            0
        });
        *entry += 1;
    }

    let mut tally: Vec<CompetitorCount> = order
        .into_iter()
        .map(|name| {
            let count = counts.get(&name).copied().unwrap_or_default();
            CompetitorCount { name, count }
        })
        .collect();
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(limit);
    tally
}
