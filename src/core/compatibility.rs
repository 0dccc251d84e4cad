use crate::core::context::MatchContext;
use crate::models::{
    CandidateProfile, CompatibilityResult, FitTier, JobPosting, TierThresholds, Vocabulary,
};

/// Running count of declared and satisfied criteria.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    passed: u32,
    total: u32,
}

impl Tally {
    #[inline]
    fn check(&mut self, satisfied: bool) {
        self.total += 1;
        if satisfied {
            self.passed += 1;
        }
    }
}

/// Compare a candidate against a job's optional requirement set
///
/// Criteria, each counted only when the job declares it:
///   1. service-type overlap     (required areas share a token with the candidate's)
///   2. experience               (candidate above the lowest experience tier)
///   3. gender                   (in the accepted set)
///   4. ethnicity                (in the accepted set)
///   5. eye color                (in the accepted set)
///   6. hair type                (in the accepted set)
///   7. hair length              (in the accepted set)
///   8. language proficiency     (candidate rank >= required rank)
///
/// The tally is then classified by [`classify`].
pub fn evaluate(candidate: &CandidateProfile, job: &JobPosting, ctx: &MatchContext) -> CompatibilityResult {
    let vocab = ctx.vocabularies();
    let codec = ctx.codec();
    let mut tally = Tally::default();

    // 1. Service types
    let required = codec.decode(&job.required_areas);
    if !required.is_empty() {
        let offered = codec.decode(&candidate.areas);
        tally.check(offered.intersects(&required));
    }

    // 2. Experience
    if job.requires_experience {
        let lowest = vocab.experience.first_token();
        // values outside the vocabulary count as unset
        let experienced = candidate
            .experience
            .as_deref()
            .and_then(|raw| vocab.experience.canonicalize(raw))
            .is_some_and(|tier| Some(tier) != lowest);
        tally.check(experienced);
    }

    // 3-7. Accepted sets
    let accepted_sets = [
        (&vocab.gender, &job.accepted_genders, candidate.gender.as_deref()),
        (&vocab.ethnicity, &job.accepted_ethnicities, candidate.ethnicity.as_deref()),
        (&vocab.eye_color, &job.accepted_eye_colors, candidate.eye_color.as_deref()),
        (&vocab.hair_type, &job.accepted_hair_types, candidate.hair_type.as_deref()),
        (&vocab.hair_length, &job.accepted_hair_lengths, candidate.hair_length.as_deref()),
    ];
    for (vocabulary, accepted, value) in accepted_sets {
        if let Some(satisfied) = accepts(vocabulary, accepted, value) {
            tally.check(satisfied);
        }
    }

    // 8. Language
    if let Some(requirement) = &job.language_requirement {
        let required_rank = vocab.language_level.rank_of(&requirement.min_level);
        if required_rank > 0 {
            let rank = candidate
                .languages
                .level(requirement.language)
                .map(|level| vocab.language_level.rank_of(level))
                .unwrap_or(0);
            tally.check(rank >= required_rank);
        }
    }

    let result = CompatibilityResult {
        tier: classify(tally.passed, tally.total, ctx.thresholds()),
        passed: tally.passed,
        total: tally.total,
    };
    tracing::trace!(
        candidate = %candidate.id,
        job = %job.id,
        passed = result.passed,
        missing = result.missing(),
        tier = ?result.tier,
        "evaluated compatibility"
    );
    result
}

/// Tier for `passed` of `total` criteria
///
/// - no criteria, or all met          -> GOOD
/// - few enough missing, or a high
///   enough pass percentage           -> ALMOST
/// - otherwise                        -> BAD
#[inline]
pub fn classify(passed: u32, total: u32, thresholds: TierThresholds) -> FitTier {
    if total == 0 || passed >= total {
        return FitTier::Good;
    }

    let missing = total - passed;
    let percent_met =
        u64::from(passed) * 100 >= u64::from(total) * u64::from(thresholds.almost_min_percent);

    if missing <= thresholds.almost_max_missing || percent_met {
        FitTier::Almost
    } else {
        FitTier::Bad
    }
}

/// `None` when the job accepts everything, otherwise whether `value` is accepted.
fn accepts(vocabulary: &Vocabulary, accepted: &[String], value: Option<&str>) -> Option<bool> {
    let mut accepted = accepted
        .iter()
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .peekable();
    accepted.peek()?;

    let value = match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => canonical(vocabulary, value),
        None => return Some(false),
    };
    Some(accepted.any(|raw| canonical(vocabulary, raw) == value))
}

/// Canonical token for `raw`, or the trimmed input when it is not in the vocabulary.
fn canonical(vocabulary: &Vocabulary, raw: &str) -> String {
    vocabulary
        .canonicalize(raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, LanguageLevels, LanguageRequirement};

    fn ctx() -> MatchContext {
        MatchContext::bundled().unwrap()
    }

    fn create_test_candidate() -> CandidateProfile {
        CandidateProfile {
            id: "c1".to_string(),
            name: "Ana".to_string(),
            gender: Some("feminino".to_string()),
            ethnicity: Some("parda".to_string()),
            eye_color: Some("verde".to_string()),
            hair_type: Some("cacheado".to_string()),
            hair_length: Some("longo".to_string()),
            experience: Some("media".to_string()),
            languages: LanguageLevels {
                english: Some("intermediario".to_string()),
                ..Default::default()
            },
            areas: "recepcao, eventos".to_string(),
            ..Default::default()
        }
    }

    fn job() -> JobPosting {
        JobPosting {
            id: "j1".to_string(),
            title: "Promotor(a) Blitz".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_requirements_is_good() {
        let result = evaluate(&create_test_candidate(), &job(), &ctx());
        assert_eq!(result, CompatibilityResult { tier: FitTier::Good, passed: 0, total: 0 });
    }

    #[test]
    fn test_single_gender_requirement_met() {
        let job = JobPosting {
            accepted_genders: vec!["feminino".to_string()],
            ..job()
        };
        let result = evaluate(&create_test_candidate(), &job, &ctx());
        assert_eq!(result, CompatibilityResult { tier: FitTier::Good, passed: 1, total: 1 });
    }

    #[test]
    fn test_accepted_set_matches_labels() {
        let job = JobPosting {
            accepted_genders: vec!["Feminino".to_string(), "  ".to_string()],
            ..job()
        };
        let candidate = CandidateProfile {
            gender: Some("FEMININO".to_string()),
            ..create_test_candidate()
        };
        assert_eq!(evaluate(&candidate, &job, &ctx()).passed, 1);
    }

    #[test]
    fn test_blank_accepted_set_is_no_requirement() {
        let job = JobPosting {
            accepted_ethnicities: vec!["".to_string()],
            ..job()
        };
        assert_eq!(evaluate(&create_test_candidate(), &job, &ctx()).total, 0);
    }

    #[test]
    fn test_missing_candidate_value_fails_criterion() {
        let job = JobPosting {
            accepted_eye_colors: vec!["azul".to_string()],
            ..job()
        };
        let candidate = CandidateProfile {
            eye_color: None,
            ..create_test_candidate()
        };
        let result = evaluate(&candidate, &job, &ctx());
        assert_eq!((result.passed, result.total), (0, 1));
        assert_eq!(result.tier, FitTier::Almost);
    }

    #[test]
    fn test_service_type_overlap() {
        let overlapping = JobPosting {
            required_areas: "eventos, blitz".to_string(),
            ..job()
        };
        let disjoint = JobPosting {
            required_areas: "bartender".to_string(),
            ..job()
        };
        let ctx = ctx();

        assert_eq!(evaluate(&create_test_candidate(), &overlapping, &ctx).passed, 1);
        let result = evaluate(&create_test_candidate(), &disjoint, &ctx);
        assert_eq!((result.passed, result.total), (0, 1));
    }

    #[test]
    fn test_experience_requirement() {
        let job = JobPosting {
            requires_experience: true,
            ..job()
        };
        let ctx = ctx();
        let novice = CandidateProfile {
            experience: Some("sem_experiencia".to_string()),
            ..create_test_candidate()
        };
        let unknown = CandidateProfile {
            experience: None,
            ..create_test_candidate()
        };

        assert_eq!(evaluate(&create_test_candidate(), &job, &ctx).passed, 1);
        assert_eq!(evaluate(&novice, &job, &ctx).passed, 0);
        assert_eq!(evaluate(&unknown, &job, &ctx).passed, 0);
    }

    #[test]
    fn test_experience_outside_vocabulary_is_unset() {
        let job = JobPosting {
            requires_experience: true,
            ..job()
        };
        let ctx = ctx();
        let legacy = CandidateProfile {
            experience: Some("nenhuma".to_string()),
            ..create_test_candidate()
        };
        let by_label = CandidateProfile {
            experience: Some("Muita".to_string()),
            ..create_test_candidate()
        };

        let result = evaluate(&legacy, &job, &ctx);
        assert_eq!((result.passed, result.missing()), (0, 1));
        assert_eq!(evaluate(&by_label, &job, &ctx).passed, 1);
    }

    #[test]
    fn test_language_rank() {
        let ctx = ctx();
        let requiring = |level: &str| JobPosting {
            language_requirement: Some(LanguageRequirement {
                language: Language::English,
                min_level: level.to_string(),
            }),
            ..job()
        };

        assert_eq!(evaluate(&create_test_candidate(), &requiring("basico"), &ctx).passed, 1);
        assert_eq!(evaluate(&create_test_candidate(), &requiring("intermediario"), &ctx).passed, 1);
        assert_eq!(evaluate(&create_test_candidate(), &requiring("fluente"), &ctx).passed, 0);
        // unrecognised minimum is no requirement
        assert_eq!(evaluate(&create_test_candidate(), &requiring(""), &ctx).total, 0);
    }

    #[test]
    fn test_language_unset_ranks_zero() {
        let job = JobPosting {
            language_requirement: Some(LanguageRequirement {
                language: Language::Spanish,
                min_level: "basico".to_string(),
            }),
            ..job()
        };
        let result = evaluate(&create_test_candidate(), &job, &ctx());
        assert_eq!((result.passed, result.total), (0, 1));
    }

    #[test]
    fn test_classify_boundaries() {
        let t = TierThresholds::default();

        assert_eq!(classify(0, 0, t), FitTier::Good);
        assert_eq!(classify(4, 4, t), FitTier::Good);
        assert_eq!(classify(3, 4, t), FitTier::Almost);
        assert_eq!(classify(6, 10, t), FitTier::Bad);
        assert_eq!(classify(7, 10, t), FitTier::Almost);
        assert_eq!(classify(0, 1, t), FitTier::Almost);
        assert_eq!(classify(0, 2, t), FitTier::Bad);
    }

    #[test]
    fn test_classify_with_custom_thresholds() {
        let strict = TierThresholds {
            almost_max_missing: 0,
            almost_min_percent: 90,
        };
        assert_eq!(classify(3, 4, strict), FitTier::Bad);
        assert_eq!(classify(9, 10, strict), FitTier::Almost);
    }

    #[test]
    fn test_full_profile_tiering() {
        let job = JobPosting {
            required_areas: "bartender".to_string(),
            requires_experience: true,
            accepted_genders: vec!["feminino".to_string()],
            accepted_ethnicities: vec!["parda".to_string()],
            accepted_eye_colors: vec!["azul".to_string()],
            accepted_hair_types: vec!["cacheado".to_string()],
            ..job()
        };
        // passes experience, gender, ethnicity, hair type; fails areas and eyes
        let result = evaluate(&create_test_candidate(), &job, &ctx());
        assert_eq!((result.passed, result.total), (4, 6));
        assert_eq!(result.missing(), 2);
        assert_eq!(result.tier, FitTier::Bad);
    }
}
