use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Coordinates only exist as a pair; a record with one half missing has no
/// location at all (see [`GeoPoint::from_parts`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point from two nullable columns.
    ///
    /// Returns `None` unless both parts are present and finite.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Self::new(lat, lon)),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Languages a candidate can declare a proficiency level for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
}

/// Declared proficiency per language, as raw vocabulary tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageLevels {
    #[serde(default, alias = "nivel_ingles")]
    pub english: Option<String>,
    #[serde(default, alias = "nivel_espanhol")]
    pub spanish: Option<String>,
    #[serde(default, alias = "nivel_frances")]
    pub french: Option<String>,
}

impl LanguageLevels {
    pub fn level(&self, language: Language) -> Option<&str> {
        match language {
            Language::English => self.english.as_deref(),
            Language::Spanish => self.spanish.as_deref(),
            Language::French => self.french.as_deref(),
        }
    }
}

/// Minimum proficiency a job asks for in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRequirement {
    pub language: Language,
    #[serde(rename = "minLevel", alias = "min_level")]
    pub min_level: String,
}

/// Candidate record as projected from the record store.
///
/// Categorical attributes hold vocabulary tokens (or legacy labels);
/// `areas` keeps the delimited serialization and is decoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(rename = "eyeColor", alias = "eye_color", default)]
    pub eye_color: Option<String>,
    #[serde(rename = "hairType", alias = "hair_type", default)]
    pub hair_type: Option<String>,
    #[serde(rename = "hairLength", alias = "hair_length", default)]
    pub hair_length: Option<String>,
    #[serde(rename = "shirtSize", alias = "shirt_size", default)]
    pub shirt_size: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub languages: LanguageLevels,
    #[serde(rename = "isPcd", alias = "is_pcd", default)]
    pub is_pcd: Option<bool>,
    /// Serialized service-type tags, e.g. `"recepcao, garcom, outros"`.
    #[serde(default)]
    pub areas: String,
    #[serde(rename = "heightM", alias = "height_m", default)]
    pub height_m: Option<f64>,
    #[serde(rename = "weightKg", alias = "weight_kg", default)]
    pub weight_kg: Option<f64>,
    #[serde(rename = "shoeSize", alias = "shoe_size", default)]
    pub shoe_size: Option<f64>,
    #[serde(rename = "birthDate", alias = "birth_date", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl CandidateProfile {
    /// Calendar age in whole years on `today`.
    ///
    /// `None` when the birth date is unknown or lies after `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let born = self.birth_date?;
        if born > today {
            return None;
        }
        let mut years = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// Job posting with its optional requirement set.
///
/// Empty accepted-sets mean "no requirement" for that attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Serialized required service-type tags.
    #[serde(rename = "requiredAreas", alias = "required_areas", default)]
    pub required_areas: String,
    #[serde(rename = "requiresExperience", alias = "requires_experience", default)]
    pub requires_experience: bool,
    #[serde(rename = "acceptedGenders", alias = "generos_aceitos", default)]
    pub accepted_genders: Vec<String>,
    #[serde(rename = "acceptedEthnicities", alias = "etnias_aceitas", default)]
    pub accepted_ethnicities: Vec<String>,
    #[serde(rename = "acceptedEyeColors", alias = "olhos_aceitos", default)]
    pub accepted_eye_colors: Vec<String>,
    #[serde(rename = "acceptedHairTypes", alias = "cabelos_aceitos", default)]
    pub accepted_hair_types: Vec<String>,
    #[serde(rename = "acceptedHairLengths", alias = "comprimentos_aceitos", default)]
    pub accepted_hair_lengths: Vec<String>,
    #[serde(rename = "languageRequirement", alias = "language_requirement", default)]
    pub language_requirement: Option<LanguageRequirement>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Single-valued categorical attributes of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Status,
    Gender,
    Ethnicity,
    Nationality,
    EyeColor,
    HairType,
    HairLength,
    ShirtSize,
    Availability,
    Experience,
    EnglishLevel,
    SpanishLevel,
    FrenchLevel,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 13] = [
        CategoricalField::Status,
        CategoricalField::Gender,
        CategoricalField::Ethnicity,
        CategoricalField::Nationality,
        CategoricalField::EyeColor,
        CategoricalField::HairType,
        CategoricalField::HairLength,
        CategoricalField::ShirtSize,
        CategoricalField::Availability,
        CategoricalField::Experience,
        CategoricalField::EnglishLevel,
        CategoricalField::SpanishLevel,
        CategoricalField::FrenchLevel,
    ];

    /// Query parameter names, English first.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            CategoricalField::Status => &["status"],
            CategoricalField::Gender => &["gender", "genero"],
            CategoricalField::Ethnicity => &["ethnicity", "etnia"],
            CategoricalField::Nationality => &["nationality", "nacionalidade"],
            CategoricalField::EyeColor => &["eye_color", "olhos"],
            CategoricalField::HairType => &["hair_type", "cabelo_tipo"],
            CategoricalField::HairLength => &["hair_length", "cabelo_comprimento"],
            CategoricalField::ShirtSize => &["shirt_size", "tamanho_camiseta"],
            CategoricalField::Availability => &["availability", "disponibilidade"],
            CategoricalField::Experience => &["experience", "experiencia"],
            CategoricalField::EnglishLevel => &["english_level", "nivel_ingles"],
            CategoricalField::SpanishLevel => &["spanish_level", "nivel_espanhol"],
            CategoricalField::FrenchLevel => &["french_level", "nivel_frances"],
        }
    }

    pub fn value_of(self, candidate: &CandidateProfile) -> Option<&str> {
        let value = match self {
            CategoricalField::Status => &candidate.status,
            CategoricalField::Gender => &candidate.gender,
            CategoricalField::Ethnicity => &candidate.ethnicity,
            CategoricalField::Nationality => &candidate.nationality,
            CategoricalField::EyeColor => &candidate.eye_color,
            CategoricalField::HairType => &candidate.hair_type,
            CategoricalField::HairLength => &candidate.hair_length,
            CategoricalField::ShirtSize => &candidate.shirt_size,
            CategoricalField::Availability => &candidate.availability,
            CategoricalField::Experience => &candidate.experience,
            CategoricalField::EnglishLevel => &candidate.languages.english,
            CategoricalField::SpanishLevel => &candidate.languages.spanish,
            CategoricalField::FrenchLevel => &candidate.languages.french,
        };
        value.as_deref()
    }
}

/// Numeric measurements that accept `<key>_min` / `<key>_max` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Height,
    Weight,
    ShoeSize,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [NumericField::Height, NumericField::Weight, NumericField::ShoeSize];

    pub fn keys(self) -> &'static [&'static str] {
        match self {
            NumericField::Height => &["height", "altura"],
            NumericField::Weight => &["weight", "peso"],
            NumericField::ShoeSize => &["shoe_size", "sapato", "calcado"],
        }
    }

    pub fn value_of(self, candidate: &CandidateProfile) -> Option<f64> {
        match self {
            NumericField::Height => candidate.height_m,
            NumericField::Weight => candidate.weight_kg,
            NumericField::ShoeSize => candidate.shoe_size,
        }
    }
}

/// Yes/no attributes filterable through `<key>__in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanField {
    IsPcd,
}

impl BooleanField {
    pub const ALL: [BooleanField; 1] = [BooleanField::IsPcd];

    pub fn keys(self) -> &'static [&'static str] {
        match self {
            BooleanField::IsPcd => &["is_pcd"],
        }
    }

    pub fn value_of(self, candidate: &CandidateProfile) -> Option<bool> {
        match self {
            BooleanField::IsPcd => candidate.is_pcd,
        }
    }
}

/// Fit classification, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FitTier {
    Good,
    Almost,
    Bad,
}

/// Outcome of comparing one candidate against one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub tier: FitTier,
    pub passed: u32,
    pub total: u32,
}

impl CompatibilityResult {
    pub fn missing(&self) -> u32 {
        self.total.saturating_sub(self.passed)
    }
}

/// Thresholds separating ALMOST from BAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    /// Largest number of unmet criteria still classified ALMOST.
    pub almost_max_missing: u32,
    /// Smallest pass percentage still classified ALMOST.
    pub almost_min_percent: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            almost_max_missing: 1,
            almost_min_percent: 70,
        }
    }
}

/// One row of a ranked candidate list for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub name: String,
    pub age: Option<u32>,
    pub compatibility: CompatibilityResult,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
}

/// Count of ranked candidates per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    pub good: usize,
    pub almost: usize,
    pub bad: usize,
}

impl TierSummary {
    pub fn record(&mut self, tier: FitTier) {
        match tier {
            FitTier::Good => self.good += 1,
            FitTier::Almost => self.almost += 1,
            FitTier::Bad => self.bad += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.almost + self.bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_requires_both_parts() {
        assert!(GeoPoint::from_parts(Some(-23.55), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(-46.63)).is_none());
        assert!(GeoPoint::from_parts(Some(f64::NAN), Some(-46.63)).is_none());
        assert_eq!(
            GeoPoint::from_parts(Some(-23.55), Some(-46.63)),
            Some(GeoPoint::new(-23.55, -46.63))
        );
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let candidate = CandidateProfile {
            birth_date: NaiveDate::from_ymd_opt(2000, 6, 15),
            ..Default::default()
        };

        let day_before = NaiveDate::from_ymd_opt(2018, 6, 14).unwrap();
        let birthday = NaiveDate::from_ymd_opt(2018, 6, 15).unwrap();

        assert_eq!(candidate.age_on(day_before), Some(17));
        assert_eq!(candidate.age_on(birthday), Some(18));
    }

    #[test]
    fn test_age_unknown_for_future_birth_date() {
        let candidate = CandidateProfile {
            birth_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(candidate.age_on(today), None);
    }

    #[test]
    fn test_tier_ordering_best_first() {
        assert!(FitTier::Good < FitTier::Almost);
        assert!(FitTier::Almost < FitTier::Bad);
    }

    #[test]
    fn test_tier_summary_counts() {
        let mut summary = TierSummary::default();
        summary.record(FitTier::Good);
        summary.record(FitTier::Bad);
        summary.record(FitTier::Bad);

        assert_eq!(summary.good, 1);
        assert_eq!(summary.almost, 0);
        assert_eq!(summary.bad, 2);
        assert_eq!(summary.total(), 3);
    }
}
