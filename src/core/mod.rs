// Core algorithm exports
pub mod compatibility;
pub mod context;
pub mod distance;
pub mod filters;
pub mod ranking;
pub mod tagset;

pub use compatibility::{classify, evaluate};
pub use context::MatchContext;
pub use distance::{distance_km, haversine_distance};
pub use filters::{compile_filters, CandidateFilter, FilterClause};
pub use ranking::{rank_candidates, Ranking};
pub use tagset::{contains_any, TagCodec, TagSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::error::Result;
use crate::models::{
    CandidateProfile, CompatibilityResult, JobPosting, QueryParams, RankedCandidate, TierSummary,
    TierThresholds, Vocabularies,
};

/// Result of a casting search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub ranked: Vec<RankedCandidate>,
    /// Tier counts over every candidate that passed the filters, before truncation.
    pub summary: TierSummary,
    pub total_candidates: usize,
    pub filtered_candidates: usize,
}

/// Casting search orchestrator
///
/// # Pipeline Stages
/// 1. Compile query parameters into a candidate filter
/// 2. Filter the candidate pool
/// 3. Evaluate each remaining candidate against the job
/// 4. Rank and truncate
#[derive(Debug, Clone)]
pub struct CastingEngine {
    context: MatchContext,
    default_limit: usize,
}

impl CastingEngine {
    pub fn new(vocabularies: Vocabularies, thresholds: TierThresholds, default_limit: usize) -> Result<Self> {
        Ok(Self {
            context: MatchContext::new(vocabularies, thresholds)?,
            default_limit,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.vocabularies()?,
            settings.tier_thresholds(),
            settings.matching.default_limit,
        )
    }

    pub fn context(&self) -> &MatchContext {
        &self.context
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn evaluate(&self, candidate: &CandidateProfile, job: &JobPosting) -> CompatibilityResult {
        evaluate(candidate, job, &self.context)
    }

    pub fn compile_filters(&self, params: &QueryParams, today: NaiveDate) -> CandidateFilter {
        compile_filters(params, today, self.context.vocabularies())
    }

    /// Find candidates for a job
    ///
    /// # Arguments
    /// * `job` - The job posting to rank against
    /// * `candidates` - The candidate pool
    /// * `params` - Filter query parameters
    /// * `today` - Reference date for age bounds
    /// * `limit` - Maximum number of rows, the configured default when `None`
    ///
    /// # Returns
    /// MatchReport with ranked rows and tier counts
    pub fn find_candidates(
        &self,
        job: &JobPosting,
        candidates: &[CandidateProfile],
        params: &QueryParams,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> MatchReport {
        let total_candidates = candidates.len();
        let filter = self.compile_filters(params, today);
        let filtered = filter.apply(candidates);
        let filtered_candidates = filtered.len();

        let Ranking { mut ranked, summary } = rank_candidates(job, filtered, &self.context, today);
        ranked.truncate(limit.unwrap_or(self.default_limit));

        tracing::info!(
            job = %job.id,
            total_candidates,
            filtered_candidates,
            returned = ranked.len(),
            "casting search complete"
        );

        MatchReport {
            ranked,
            summary,
            total_candidates,
            filtered_candidates,
        }
    }
}
