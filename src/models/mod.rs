// Model exports
pub mod domain;
pub mod query;
pub mod vocabulary;

pub use domain::{
    BooleanField, CandidateProfile, CategoricalField, CompatibilityResult, FitTier, GeoPoint,
    JobPosting, Language, LanguageLevels, LanguageRequirement, NumericField, RankedCandidate,
    TierSummary, TierThresholds,
};
pub use query::QueryParams;
pub use vocabulary::{BooleanVocabulary, Choice, OtherSentinel, Vocabularies, Vocabulary};
