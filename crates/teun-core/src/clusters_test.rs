use super::*;
use crate::types::PromptStatus;

fn prompt(
    id: usize,
    cluster: &str,
    intent: Intent,
    trend: TrendSignal,
    difficulty: Difficulty,
    ai_volume: u32,
    score: u8,
) -> Prompt {
    Prompt {
        id,
        text: format!("prompt {id}"),
        intent,
        intent_cluster: cluster.to_string(),
        core_keyword: None,
        trend_signal: trend,
        estimated_google_volume: ai_volume * 5,
        estimated_ai_volume: ai_volume,
        difficulty,
        difficulty_score: score,
        your_status: PromptStatus::NotScanned,
        top_competitors: vec![],
        ai_mode_snippet: None,
    }
}

fn sample() -> Vec<Prompt> {
    use Difficulty::{Easy, Hard, Medium};
    use Intent::{Commercial, Informational};
    use TrendSignal::{Declining, Rising, Stable};
    vec![
        prompt(0, "Prijzen", Commercial, Rising, Easy, 100, 10),
        prompt(1, "Advies", Informational, Stable, Medium, 40, 35),
        prompt(2, "Prijzen", Informational, Declining, Medium, 60, 40),
        prompt(3, "Advies", Informational, Stable, Hard, 30, 70),
        prompt(4, "Prijzen", Commercial, Stable, Easy, 90, 21),
        prompt(5, "", Commercial, Declining, Hard, 500, 80),
    ]
}

#[test]
fn totals_and_sorting() {
    let clusters = build_clusters(&sample());
    let names: Vec<&str> = clusters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Overig", "Prijzen", "Advies"]);

    let prijzen = &clusters[1];
    assert_eq!(prijzen.prompts.len(), 3);
    assert_eq!(prijzen.total_volume, 250);
    // (10 + 40 + 21) / 3 = 23.67
    assert_eq!(prijzen.avg_difficulty, 24);
    assert_eq!(prijzen.dominant_intent, Intent::Commercial);
    assert_eq!(prijzen.high_opp, 2);
}

#[test]
fn avg_difficulty_rounds_half_up() {
    let prompts = vec![
        prompt(0, "A", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 1, 10),
        prompt(1, "A", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 1, 11),
    ];
    assert_eq!(build_clusters(&prompts)[0].avg_difficulty, 11);
}

#[test]
fn dominant_intent_majority_with_tie_to_commercial() {
    let even = vec![
        prompt(0, "A", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 1, 10),
        prompt(1, "A", Intent::Informational, TrendSignal::Stable, Difficulty::Easy, 1, 10),
    ];
    assert_eq!(build_clusters(&even)[0].dominant_intent, Intent::Commercial);

    let minority = vec![
        prompt(0, "A", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 1, 10),
        prompt(1, "A", Intent::Informational, TrendSignal::Stable, Difficulty::Easy, 1, 10),
        prompt(2, "A", Intent::Informational, TrendSignal::Stable, Difficulty::Easy, 1, 10),
    ];
    assert_eq!(
        build_clusters(&minority)[0].dominant_intent,
        Intent::Informational
    );
}

#[test]
fn dominant_trend_is_mode_with_rising_first_on_ties() {
    let clusters = build_clusters(&sample());
    let advies = clusters.iter().find(|c| c.name == "Advies").unwrap();
    assert_eq!(advies.dominant_trend, TrendSignal::Stable);

    // one of each: tie resolves to rising
    let prijzen = clusters.iter().find(|c| c.name == "Prijzen").unwrap();
    assert_eq!(prijzen.dominant_trend, TrendSignal::Rising);

    let stable_vs_declining = vec![
        prompt(0, "A", Intent::Commercial, TrendSignal::Declining, Difficulty::Easy, 1, 10),
        prompt(1, "A", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 1, 10),
    ];
    assert_eq!(
        build_clusters(&stable_vs_declining)[0].dominant_trend,
        TrendSignal::Stable
    );
}

#[test]
fn equal_volume_clusters_keep_first_seen_order() {
    let prompts = vec![
        prompt(0, "B", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 50, 10),
        prompt(1, "A", Intent::Commercial, TrendSignal::Stable, Difficulty::Easy, 50, 10),
    ];
    let names: Vec<String> = build_clusters(&prompts).into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn aggregation_is_idempotent() {
    let prompts = sample();
    assert_eq!(build_clusters(&prompts), build_clusters(&prompts));
}

#[test]
fn empty_input_yields_no_clusters() {
    assert!(build_clusters(&[]).is_empty());
}
