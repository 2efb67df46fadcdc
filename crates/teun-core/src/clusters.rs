//! Cluster aggregation over a prompt set. Pure and deterministic.

use std::collections::HashMap;

use crate::types::{Cluster, Difficulty, Intent, Prompt, TrendSignal};

/// Label used for prompts the generator left without a cluster.
pub const FALLBACK_CLUSTER: &str = "Overig";

/// Groups prompts by `intentCluster` and computes per-cluster totals.
///
/// Clusters come back sorted by descending `totalVolume`; ties keep the order
/// in which each cluster first appears in `prompts`.
#[must_use]
pub fn build_clusters(prompts: &[Prompt]) -> Vec<Cluster> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Prompt>> = HashMap::new();

    for prompt in prompts {
        let name = cluster_name(&prompt.intent_cluster);
        groups
            .entry(name.clone())
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(prompt.clone());
    }

    let mut clusters: Vec<Cluster> = order
        .into_iter()
        .filter_map(|name| {
            let members = groups.remove(&name)?;
            Some(summarize(name, members))
        })
        .collect();

    clusters.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
    clusters
}

fn cluster_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FALLBACK_CLUSTER.to_string()
    } else {
        trimmed.to_string()
    }
}

fn summarize(name: String, prompts: Vec<Prompt>) -> Cluster {
    let n = prompts.len();
    let total_volume = prompts
        .iter()
        .map(|p| u64::from(p.estimated_ai_volume))
        .sum();

    let score_sum: u64 = prompts.iter().map(|p| u64::from(p.difficulty_score)).sum();
    let n64 = n as u64;
    // round-half-up mean
    let avg_difficulty = if n == 0 {
        0
    } else {
        u32::try_from((score_sum * 2 + n64) / (n64 * 2)).unwrap_or(u32::MAX)
    };

    let commercial = prompts
        .iter()
        .filter(|p| p.intent == Intent::Commercial)
        .count();
    let dominant_intent = if commercial * 2 >= n {
        Intent::Commercial
    } else {
        Intent::Informational
    };

    let high_opp = prompts
        .iter()
        .filter(|p| p.difficulty == Difficulty::Easy)
        .count();

    Cluster {
        dominant_trend: dominant_trend(&prompts),
        name,
        prompts,
        total_volume,
        avg_difficulty,
        dominant_intent,
        high_opp,
    }
}

/// Mode of the trend signals; ties resolve rising, then stable, then declining.
fn dominant_trend(prompts: &[Prompt]) -> TrendSignal {
    let count = |t: TrendSignal| prompts.iter().filter(|p| p.trend_signal == t).count();
    let mut best = TrendSignal::Rising;
    let mut best_count = count(best);
    for trend in [TrendSignal::Stable, TrendSignal::Declining] {
        let c = count(trend);
        if c > best_count {
            best = trend;
            best_count = c;
        }
    }
    best
}

#[cfg(test)]
#[path = "clusters_test.rs"]
mod tests;
