use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::core::{compatibility::evaluate, context::MatchContext, distance::distance_km};
use crate::models::{CandidateProfile, CompatibilityResult, JobPosting, RankedCandidate, TierSummary};

/// Ranked candidates for one job, with per-tier counts.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub ranked: Vec<RankedCandidate>,
    pub summary: TierSummary,
}

/// Annotate each candidate with fit and distance to `job`, best first
///
/// Sort order:
/// 1. tier (GOOD, ALMOST, BAD)
/// 2. share of criteria met, higher first
/// 3. distance, nearest first, unknown last
/// 4. name
pub fn rank_candidates<'a, I>(job: &JobPosting, candidates: I, ctx: &MatchContext, today: NaiveDate) -> Ranking
where
    I: IntoIterator<Item = &'a CandidateProfile>,
{
    let mut summary = TierSummary::default();
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let compatibility = evaluate(candidate, job, ctx);
            summary.record(compatibility.tier);
            RankedCandidate {
                candidate_id: candidate.id.clone(),
                name: candidate.name.clone(),
                age: candidate.age_on(today),
                compatibility,
                distance_km: distance_km(candidate.location, job.location),
            }
        })
        .collect();

    ranked.sort_by(compare_ranked);

    tracing::debug!(
        job = %job.id,
        candidates = ranked.len(),
        good = summary.good,
        almost = summary.almost,
        bad = summary.bad,
        "ranked candidates"
    );

    Ranking { ranked, summary }
}

/// Ordering used by [`rank_candidates`].
pub fn compare_ranked(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    a.compatibility
        .tier
        .cmp(&b.compatibility.tier)
        .then_with(|| compare_pass_ratio(&b.compatibility, &a.compatibility))
        .then_with(|| compare_distance(a.distance_km, b.distance_km))
        .then_with(|| a.name.cmp(&b.name))
}

/// Compares `passed / total` exactly; no criteria counts as fully met.
fn compare_pass_ratio(a: &CompatibilityResult, b: &CompatibilityResult) -> Ordering {
    let (ap, at) = if a.total == 0 { (1, 1) } else { (u64::from(a.passed), u64::from(a.total)) };
    let (bp, bt) = if b.total == 0 { (1, 1) } else { (u64::from(b.passed), u64::from(b.total)) };
    (ap * bt).cmp(&(bp * at))
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FitTier, GeoPoint};

    fn ctx() -> MatchContext {
        MatchContext::bundled().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn create_candidate(id: &str, gender: &str, hair: &str, location: Option<GeoPoint>) -> CandidateProfile {
        CandidateProfile {
            id: id.to_string(),
            name: format!("Candidate {}", id),
            gender: Some(gender.to_string()),
            hair_type: Some(hair.to_string()),
            location,
            birth_date: NaiveDate::from_ymd_opt(1999, 1, 1),
            ..Default::default()
        }
    }

    fn create_job() -> JobPosting {
        JobPosting {
            id: "job".to_string(),
            accepted_genders: vec!["feminino".to_string()],
            accepted_hair_types: vec!["liso".to_string()],
            location: Some(GeoPoint::new(-23.55, -46.63)),
            ..Default::default()
        }
    }

    #[test]
    fn test_ranks_by_tier_then_distance() {
        let near = Some(GeoPoint::new(-23.56, -46.64));
        let far = Some(GeoPoint::new(-22.90, -43.17));
        let candidates = vec![
            create_candidate("bad", "masculino", "crespo", near),
            create_candidate("good-far", "feminino", "liso", far),
            create_candidate("almost", "feminino", "crespo", near),
            create_candidate("good-near", "feminino", "liso", near),
            create_candidate("good-unknown", "feminino", "liso", None),
        ];

        let ranking = rank_candidates(&create_job(), &candidates, &ctx(), today());
        let ids: Vec<&str> = ranking.ranked.iter().map(|r| r.candidate_id.as_str()).collect();

        assert_eq!(ids, vec!["good-near", "good-far", "good-unknown", "almost", "bad"]);
        assert_eq!(ranking.summary, TierSummary { good: 3, almost: 1, bad: 1 });
    }

    #[test]
    fn test_annotations() {
        let candidates = vec![create_candidate("1", "feminino", "liso", None)];
        let ranking = rank_candidates(&create_job(), &candidates, &ctx(), today());
        let row = &ranking.ranked[0];

        assert_eq!(row.compatibility.tier, FitTier::Good);
        assert_eq!(row.distance_km, None);
        assert_eq!(row.age, Some(25));
        assert_eq!(row.name, "Candidate 1");
    }

    #[test]
    fn test_pass_ratio_breaks_ties_within_tier() {
        let a = CompatibilityResult { tier: FitTier::Almost, passed: 3, total: 4 };
        let b = CompatibilityResult { tier: FitTier::Almost, passed: 7, total: 10 };
        let none = CompatibilityResult { tier: FitTier::Good, passed: 0, total: 0 };
        let all = CompatibilityResult { tier: FitTier::Good, passed: 2, total: 2 };

        assert_eq!(compare_pass_ratio(&a, &b), Ordering::Greater);
        assert_eq!(compare_pass_ratio(&none, &all), Ordering::Equal);
    }

    #[test]
    fn test_unknown_distance_sorts_last() {
        assert_eq!(compare_distance(Some(500.0), None), Ordering::Less);
        assert_eq!(compare_distance(None, Some(0.0)), Ordering::Greater);
        assert_eq!(compare_distance(Some(1.0), Some(2.0)), Ordering::Less);
    }

    #[test]
    fn test_empty_input() {
        let ranking = rank_candidates(&create_job(), std::iter::empty(), &ctx(), today());
        assert!(ranking.ranked.is_empty());
        assert_eq!(ranking.summary.total(), 0);
    }
}
