//! Casting Match - candidate matching core for a talent-casting CRM
//!
//! This library compares talent profiles against job postings, computes
//! distances between them, and compiles admin-style query parameters into
//! candidate filters. It is storage- and transport-agnostic.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::core::{compile_filters, distance_km, evaluate, CastingEngine, MatchContext, MatchReport, TagCodec, TagSet};
pub use error::{CastingError, Result};
pub use models::{CandidateProfile, CompatibilityResult, FitTier, GeoPoint, JobPosting, QueryParams, Vocabularies};
