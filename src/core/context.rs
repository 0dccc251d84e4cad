use crate::core::tagset::TagCodec;
use crate::error::Result;
use crate::models::{TierThresholds, Vocabularies};

/// Read-only inputs shared by evaluation, filtering and ranking.
#[derive(Debug, Clone)]
pub struct MatchContext {
    vocabularies: Vocabularies,
    codec: TagCodec,
    thresholds: TierThresholds,
}

impl MatchContext {
    pub fn new(vocabularies: Vocabularies, thresholds: TierThresholds) -> Result<Self> {
        let codec = TagCodec::new(&vocabularies)?;
        Ok(Self {
            vocabularies,
            codec,
            thresholds,
        })
    }

    /// Bundled vocabularies with the default thresholds.
    pub fn bundled() -> Result<Self> {
        Self::new(Vocabularies::bundled()?, TierThresholds::default())
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.vocabularies
    }

    pub fn codec(&self) -> &TagCodec {
        &self.codec
    }

    pub fn thresholds(&self) -> TierThresholds {
        self.thresholds
    }
}
