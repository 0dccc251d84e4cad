use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CastingError, Result};
use crate::models::domain::CategoricalField;

const BUNDLED_VOCABULARIES: &str = include_str!("../../config/vocabularies.toml");

/// One option of a fixed vocabulary: the stored token and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub token: String,
    pub label: String,
}

/// An ordered list of choices.
///
/// Order matters for ranked domains: experience tiers run lowest first and
/// language levels run from basic to fluent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    entries: Vec<Choice>,
}

impl Vocabulary {
    pub fn new(entries: Vec<Choice>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Choice] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.iter().any(|c| c.token == token)
    }

    /// Map raw input onto its canonical token.
    ///
    /// An exact token match wins; otherwise the input is compared
    /// case-insensitively against every token and label.
    pub fn canonicalize(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(choice) = self.entries.iter().find(|c| c.token == input) {
            return Some(&choice.token);
        }
        let lowered = input.to_lowercase();
        self.entries
            .iter()
            .find(|c| c.token.to_lowercase() == lowered || c.label.to_lowercase() == lowered)
            .map(|c| c.token.as_str())
    }

    pub fn label_of(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|c| c.token == token)
            .map(|c| c.label.as_str())
    }

    /// 1-based position of the choice matching `input`, 0 when unknown.
    pub fn rank_of(&self, input: &str) -> u32 {
        self.canonicalize(input)
            .and_then(|token| self.entries.iter().position(|c| c.token == token))
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0)
    }

    pub fn first_token(&self) -> Option<&str> {
        self.entries.first().map(|c| c.token.as_str())
    }
}

/// The "other" option of the areas vocabulary, which unlocks free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSentinel {
    pub token: String,
    pub label: String,
}

/// Strings accepted as yes/no in boolean multi-select filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanVocabulary {
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
}

impl Default for BooleanVocabulary {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            truthy: owned(&["1", "true", "t", "sim", "s", "yes", "y"]),
            falsy: owned(&["0", "false", "f", "nao", "não", "n", "no"]),
        }
    }
}

impl BooleanVocabulary {
    pub fn parse(&self, input: &str) -> Option<bool> {
        let lowered = input.trim().to_lowercase();
        if self.truthy.iter().any(|w| w.to_lowercase() == lowered) {
            Some(true)
        } else if self.falsy.iter().any(|w| w.to_lowercase() == lowered) {
            Some(false)
        } else {
            None
        }
    }
}

/// Every fixed vocabulary the codec, evaluator and filter compiler consult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    pub other: OtherSentinel,
    #[serde(default)]
    pub boolean: BooleanVocabulary,
    pub status: Vocabulary,
    pub gender: Vocabulary,
    pub ethnicity: Vocabulary,
    pub nationality: Vocabulary,
    pub eye_color: Vocabulary,
    pub hair_type: Vocabulary,
    pub hair_length: Vocabulary,
    pub shirt_size: Vocabulary,
    pub availability: Vocabulary,
    pub experience: Vocabulary,
    pub language_level: Vocabulary,
    pub areas: Vocabulary,
}

impl Vocabularies {
    /// The vocabularies shipped in `config/vocabularies.toml`.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_VOCABULARIES)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let vocabularies: Vocabularies = toml::from_str(source)?;
        vocabularies.validate()?;
        Ok(vocabularies)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CastingError::VocabularyIo {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading vocabularies");
        Self::from_toml_str(&source)
    }

    pub fn for_field(&self, field: CategoricalField) -> &Vocabulary {
        match field {
            CategoricalField::Status => &self.status,
            CategoricalField::Gender => &self.gender,
            CategoricalField::Ethnicity => &self.ethnicity,
            CategoricalField::Nationality => &self.nationality,
            CategoricalField::EyeColor => &self.eye_color,
            CategoricalField::HairType => &self.hair_type,
            CategoricalField::HairLength => &self.hair_length,
            CategoricalField::ShirtSize => &self.shirt_size,
            CategoricalField::Availability => &self.availability,
            CategoricalField::Experience => &self.experience,
            CategoricalField::EnglishLevel
            | CategoricalField::SpanishLevel
            | CategoricalField::FrenchLevel => &self.language_level,
        }
    }

    fn validate(&self) -> Result<()> {
        let named = [
            ("status", &self.status),
            ("gender", &self.gender),
            ("ethnicity", &self.ethnicity),
            ("nationality", &self.nationality),
            ("eye_color", &self.eye_color),
            ("hair_type", &self.hair_type),
            ("hair_length", &self.hair_length),
            ("shirt_size", &self.shirt_size),
            ("availability", &self.availability),
            ("experience", &self.experience),
            ("language_level", &self.language_level),
            ("areas", &self.areas),
        ];
        if let Some((name, _)) = named.iter().find(|(_, vocab)| vocab.is_empty()) {
            return Err(CastingError::Vocabulary(format!("vocabulary '{}' is empty", name)));
        }
        if !self.areas.contains(&self.other.token) {
            return Err(CastingError::Vocabulary(format!(
                "other token '{}' is missing from the areas vocabulary",
                self.other.token
            )));
        }
        Ok(())
    }
}
