use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::classify::{classify, level_to_numeric, TrustLevel};
use crate::config::BreakdownConfig;
use crate::upstream::{EthosProfile, RawScore};

/// Raw scores Ethos hands out for subjects it has not actually scored.
/// 1200 is the neutral default new profiles start at, so it counts as "no data".
pub const NO_PROFILE_SENTINELS: [i64; 2] = [0, 1200];

/// Upper end of the Ethos score scale
pub const MAX_SCORE: i64 = 2800;

/// Does this upstream answer describe a real, scored profile?
pub fn has_real_profile(raw: Option<&RawScore>) -> bool {
    match raw {
        Some(raw) => !NO_PROFILE_SENTINELS.contains(&raw.score.max(0)),
        None => false,
    }
}

/// Credibility record served to the Mini App.
///
/// Built fresh per request, never mutated afterwards. A record without a
/// profile always carries score 0 and level `unknown`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredibilityRecord {
    fid: u64,
    score: i64,
    level: TrustLevel,
    color: &'static str,
    range_label: &'static str,
    has_profile: bool,
    /// Coarse 0-100 reading of the upstream level string
    #[serde(skip_serializing_if = "Option::is_none")]
    level_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<Breakdown>,
    #[serde(flatten)]
    legacy: Option<LegacyDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ethos_data: Option<RawScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<EthosProfile>,
}

/// Per-category sub-scores.
///
/// Ethos does not score these categories separately: the values are the
/// primary score plus random jitter, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub trustworthiness: i64,
    pub expertise: i64,
    pub reliability: i64,
    pub engagement: i64,
}

/// Decoration fields of the legacy enriched shape (all synthesized)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDetails {
    pub attestations: i64,
    pub network_score: i64,
    pub rank: u32,
    pub last_updated: DateTime<Utc>,
}

impl CredibilityRecord {
    /// Apply the profile policy to an upstream answer.
    ///
    /// The level is always recomputed from the score; the upstream level
    /// string is kept only inside `ethosData`.
    pub fn build(fid: u64, raw: Option<RawScore>) -> Self {
        let has_profile = has_real_profile(raw.as_ref());
        let score = match &raw {
            Some(r) if has_profile => r.score,
            _ => 0,
        };
        let class = classify(score);
        let level_score = raw.as_ref().map(|r| level_to_numeric(&r.level));

        Self {
            fid,
            score,
            level: class.level,
            color: class.color_bucket,
            range_label: class.range_label,
            has_profile,
            level_score,
            breakdown: None,
            legacy: None,
            ethos_data: raw,
            user: None,
        }
    }

    /// Legacy enriched shape: jittered breakdown plus decoration fields
    pub fn with_breakdown<R: Rng>(mut self, variance: u32, rng: &mut R) -> Self {
        if !self.has_profile {
            self.breakdown = Some(Breakdown {
                trustworthiness: 0,
                expertise: 0,
                reliability: 0,
                engagement: 0,
            });
            self.legacy = Some(LegacyDetails {
                attestations: 0,
                network_score: 0,
                rank: 0,
                last_updated: Utc::now(),
            });
            return self;
        }

        let half = i64::from(variance / 2);
        // upstream scores are unbounded; stay on the Ethos scale
        let base = self.score.clamp(0, MAX_SCORE);
        let mut jitter = || (base + rng.gen_range(-half..=half)).clamp(0, MAX_SCORE);
        self.breakdown = Some(Breakdown {
            trustworthiness: jitter(),
            expertise: jitter(),
            reliability: jitter(),
            engagement: jitter(),
        });
        self.legacy = Some(LegacyDetails {
            attestations: base / 50 + rng.gen_range(0..10),
            network_score: base * 4 / 5 + rng.gen_range(0..100),
            rank: rng.gen_range(1..=1000),
            last_updated: Utc::now(),
        });
        self
    }

    pub fn with_profile(mut self, profile: EthosProfile) -> Self {
        self.user = Some(profile);
        self
    }

    pub fn fid(&self) -> u64 {
        self.fid
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn level(&self) -> TrustLevel {
        self.level
    }

    pub fn has_profile(&self) -> bool {
        self.has_profile
    }

    pub fn level_score(&self) -> Option<u8> {
        self.level_score
    }

    pub fn breakdown(&self) -> Option<&Breakdown> {
        self.breakdown.as_ref()
    }

    pub fn legacy(&self) -> Option<&LegacyDetails> {
        self.legacy.as_ref()
    }

    pub fn ethos_data(&self) -> Option<&RawScore> {
        self.ethos_data.as_ref()
    }

    pub fn user(&self) -> Option<&EthosProfile> {
        self.user.as_ref()
    }
}

impl BreakdownConfig {
    /// Fresh generator for one request; seeded when a seed is configured
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
