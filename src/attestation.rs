//! Attestations - peer ratings of another Farcaster user.
//!
//! Submissions are validated and echoed back as `pending`; nothing is
//! stored here; Ethos owns the attestation data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationCategory {
    Trustworthiness,
    Expertise,
    Reliability,
    Engagement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationStatus {
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRequest {
    #[serde(default)]
    pub target_fid: Option<u64>,
    #[serde(default)]
    pub category: Option<AttestationCategory>,
    #[serde(default)]
    pub score: Option<u32>,
    pub comment: Option<String>,
    /// URL or text reference backing the rating
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_fid: Option<u64>,
    pub target_fid: u64,
    pub category: AttestationCategory,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: AttestationStatus,
}

impl AttestationRequest {
    /// Validate and turn into a fresh `pending` attestation.
    ///
    /// `from_fid` stays empty until the submitter is authenticated.
    pub fn submit(self) -> Result<Attestation> {
        let (target_fid, category, score) = match (self.target_fid, self.category, self.score) {
            (Some(fid), Some(category), Some(score)) if fid > 0 && score > 0 => (fid, category, score),
            _ => return Err(Error::validation("attestation", "Missing required fields")),
        };
        if !(1..=100).contains(&score) {
            return Err(Error::validation("score", "Score must be between 1 and 100"));
        }

        Ok(Attestation {
            id: Uuid::new_v4().to_string(),
            from_fid: None,
            target_fid,
            category,
            score,
            comment: self.comment,
            evidence: self.evidence,
            timestamp: Utc::now(),
            status: AttestationStatus::Pending,
        })
    }
}

/// Sample attestations shown for a fid until Ethos exposes them
pub fn sample_attestations(target_fid: u64) -> Vec<Attestation> {
    let now = Utc::now();
    vec![
        Attestation {
            id: "att-1".to_string(),
            from_fid: Some(789),
            target_fid,
            category: AttestationCategory::Trustworthiness,
            score: 95,
            comment: Some("Consistently provides valuable insights".to_string()),
            evidence: None,
            timestamp: now - Duration::days(1),
            status: AttestationStatus::Confirmed,
        },
        Attestation {
            id: "att-2".to_string(),
            from_fid: Some(321),
            target_fid,
            category: AttestationCategory::Expertise,
            score: 88,
            comment: Some("Deep knowledge in DeFi protocols".to_string()),
            evidence: None,
            timestamp: now - Duration::days(2),
            status: AttestationStatus::Confirmed,
        },
    ]
}
