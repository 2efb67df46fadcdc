//! Mention Scanner: probes answer engines with a budgeted subset of prompts.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use teun_core::{AppConfig, CompetitorFilter, Prompt, PromptStatus, ScanResult};

use crate::batch::run_in_batches;
use crate::engine::{citation_result, AnswerEngine, EngineKind};
use crate::parser::heuristic::MAX_COMPETITORS;
use crate::parser::ResponseParser;
use crate::selection::SelectionPolicy;

/// Snippet recorded for an engine call that failed.
pub const ENGINE_FAILURE_MESSAGE: &str = "Analyse mislukt door API error";

/// The business whose visibility is being measured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTarget {
    pub company: String,
    /// Website URL or host; enables domain-variant and citation matching.
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub max_prompts: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub policy: SelectionPolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_prompts: 10,
            batch_size: 3,
            batch_delay: Duration::from_millis(1_000),
            policy: SelectionPolicy::DiversityThenVolume,
        }
    }
}

impl ScanSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_prompts: config.scan_max_prompts,
            batch_size: config.scan_batch_size,
            batch_delay: Duration::from_millis(config.scan_batch_delay_ms),
            policy: SelectionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineScan {
    pub engine: EngineKind,
    pub result: ScanResult,
    pub succeeded: bool,
}

/// Merged outcome for one prompt across every engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptScan {
    pub found: bool,
    pub competitors: Vec<String>,
    pub ai_mode_snippet: Option<String>,
    pub engines: Vec<EngineScan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub selected: usize,
    pub found: usize,
    pub failed: usize,
    pub engines: Vec<EngineKind>,
}

pub struct MentionScanner {
    engines: Vec<Arc<dyn AnswerEngine>>,
    parser: ResponseParser,
    settings: ScanSettings,
}

impl MentionScanner {
    #[must_use]
    pub fn new(
        engines: Vec<Arc<dyn AnswerEngine>>,
        parser: ResponseParser,
        settings: ScanSettings,
    ) -> Self {
        Self {
            engines,
            parser,
            settings,
        }
    }

    /// Whether at least one engine is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.engines.is_empty()
    }

    #[must_use]
    pub fn engine_kinds(&self) -> Vec<EngineKind> {
        self.engines.iter().map(|e| e.kind()).collect()
    }

    #[must_use]
    pub fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    async fn scan_engine(
        &self,
        engine: &dyn AnswerEngine,
        text: &str,
        target: &ScanTarget,
    ) -> EngineScan {
        let kind = engine.kind();
        match engine.answer(text).await {
            Ok(answer) => {
                let result = match kind {
                    EngineKind::Perplexity => self.parser.parse(Some(&answer.text), target).await,
                    EngineKind::GoogleAiMode => {
                        let filter =
                            CompetitorFilter::new(self.parser.blocklist(), &target.company);
                        citation_result(&answer, target, &filter)
                    }
                };
                EngineScan {
                    engine: kind,
                    result,
                    succeeded: true,
                }
            }
            Err(e) => {
                tracing::warn!(
                    engine = %kind,
                    prompt = %text,
                    error = %e,
                    "answer engine call failed"
                );
                EngineScan {
                    engine: kind,
                    result: ScanResult::failed(ENGINE_FAILURE_MESSAGE),
                    succeeded: false,
                }
            }
        }
    }

    /// Probes every engine with one prompt and merges the results.
    ///
    /// Found when any engine mentions the company; competitors are merged in
    /// engine order. Failed engines contribute nothing.
    pub async fn scan_prompt(&self, text: &str, target: &ScanTarget) -> PromptScan {
        let engines = join_all(
            self.engines
                .iter()
                .map(|engine| self.scan_engine(engine.as_ref(), text, target)),
        )
        .await;

        let succeeded = || engines.iter().filter(|e| e.succeeded);
        let filter = CompetitorFilter::new(self.parser.blocklist(), &target.company);
        let competitors = filter.collect(
            succeeded().flat_map(|e| e.result.competitors_mentioned.iter()),
            MAX_COMPETITORS,
        );
        let ai_mode_snippet = succeeded()
            .find(|e| e.engine == EngineKind::GoogleAiMode)
            .map(|e| e.result.simulated_ai_response_snippet.clone())
            .filter(|s| !s.is_empty());

        PromptScan {
            found: succeeded().any(|e| e.result.company_mentioned),
            competitors,
            ai_mode_snippet,
            engines,
        }
    }

    /// Scans the selected subset of `prompts` in paced batches and writes
    /// status, competitors and snippet back onto each scanned prompt.
    ///
    /// A prompt whose engines all failed becomes `NotFound` with no
    /// competitors; unselected prompts stay `NotScanned`.
    pub async fn scan(&self, prompts: &mut [Prompt], target: &ScanTarget) -> ScanSummary {
        if !self.is_enabled() {
            return ScanSummary::default();
        }

        let selected = self.settings.policy.select(prompts, self.settings.max_prompts);
        let jobs: Vec<(usize, String)> = selected
            .iter()
            .map(|&i| (i, prompts[i].text.clone()))
            .collect();
        tracing::info!(
            selected = jobs.len(),
            engines = self.engines.len(),
            company = %target.company,
            "scanning prompts"
        );

        let outcomes = run_in_batches(
            jobs,
            self.settings.batch_size,
            self.settings.batch_delay,
            |(i, text)| async move { (i, self.scan_prompt(&text, target).await) },
        )
        .await;

        let mut summary = ScanSummary {
            selected: selected.len(),
            engines: self.engine_kinds(),
            ..ScanSummary::default()
        };
        for (i, scan) in outcomes {
            if scan.engines.iter().all(|e| !e.succeeded) {
                summary.failed += 1;
            }
            if scan.found {
                summary.found += 1;
            }
            let prompt = &mut prompts[i];
            prompt.your_status = if scan.found {
                PromptStatus::Found
            } else {
                PromptStatus::NotFound
            };
            prompt.top_competitors = scan.competitors;
            prompt.ai_mode_snippet = scan.ai_mode_snippet;
        }

        tracing::info!(
            selected = summary.selected,
            found = summary.found,
            failed = summary.failed,
            "scan complete"
        );
        summary
    }
}
