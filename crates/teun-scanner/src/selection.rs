//! Which prompts get scanned when the budget is smaller than the prompt set.

use std::collections::HashSet;

use teun_core::Prompt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// One prompt per cluster, highest AI volume first, then the remaining
    /// budget by AI volume overall.
    #[default]
    DiversityThenVolume,
}

impl SelectionPolicy {
    /// Indices into `prompts` to scan, at most `max`.
    #[must_use]
    pub fn select(self, prompts: &[Prompt], max: usize) -> Vec<usize> {
        match self {
            SelectionPolicy::DiversityThenVolume => diversity_then_volume(prompts, max),
        }
    }
}

#[must_use]
pub fn diversity_then_volume(prompts: &[Prompt], max: usize) -> Vec<usize> {
    let mut by_volume: Vec<usize> = (0..prompts.len()).collect();
    by_volume.sort_by(|&a, &b| {
        prompts[b]
            .estimated_ai_volume
            .cmp(&prompts[a].estimated_ai_volume)
    });

    let mut picked = Vec::with_capacity(max.min(prompts.len()));
    let mut clusters = HashSet::new();
    for &i in &by_volume {
        if picked.len() >= max {
            return picked;
        }
        if clusters.insert(prompts[i].intent_cluster.as_str()) {
            picked.push(i);
        }
    }
    for &i in &by_volume {
        if picked.len() >= max {
            break;
        }
        if !picked.contains(&i) {
            picked.push(i);
        }
    }
    picked
}
