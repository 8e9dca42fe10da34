//! Trust scoring
//!
//! Combines the disposable and MX signals into a 0-100 score and one of four
//! trust tiers. Pure and deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;

const BASE_SCORE: i32 = 100;
const DISPOSABLE_PENALTY: i32 = 50;
const MISSING_MX_PENALTY: i32 = 30;

/// Trust tier, evaluated from the highest threshold down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    High,     // 90-100
    Medium,   // 70-89
    Low,      // 40-69
    VeryLow,  // 0-39
}

impl TrustTier {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => TrustTier::High,
            s if s >= 70 => TrustTier::Medium,
            s if s >= 40 => TrustTier::Low,
            _ => TrustTier::VeryLow,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TrustTier::High => "High trust: valid format, likely safe",
            TrustTier::Medium => "Medium trust: may be valid but needs caution",
            TrustTier::Low => "Low trust: suspicious or disposable",
            TrustTier::VeryLow => "Very low trust: likely fake or invalid",
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A score together with its tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustScore {
    pub score: u8,
    pub tier: TrustTier,
}

/// Score an address from its signals
pub fn score(disposable: bool, mx_found: bool) -> TrustScore {
    let mut score = BASE_SCORE;

    if disposable {
        score -= DISPOSABLE_PENALTY;
    }

    if !mx_found {
        score -= MISSING_MX_PENALTY;
    }

    let score = score.clamp(0, 100);

    TrustScore {
        score: score as u8,
        tier: TrustTier::from_score(score),
    }
}
