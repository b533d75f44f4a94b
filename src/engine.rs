use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::credibility::CredibilityRecord;
use crate::error::Result;
use crate::upstream::{EthosClient, RawScore};
use crate::userkey::Userkey;

/// Which optional parts of the record a caller wants
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordOptions {
    /// Legacy enriched shape (breakdown + decorations)
    pub breakdown: bool,
    /// Attach the full Ethos user object
    pub profile: bool,
}

/// Core credibility engine - upstream lookup + record policy
///
/// Holds no per-subject state: every call goes to Ethos once and builds a
/// fresh record.
pub struct CredibilityEngine {
    pub config: Arc<Config>,
    pub client: EthosClient,
}

impl CredibilityEngine {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = EthosClient::new(&config.upstream)?;
        Ok(Self { config, client })
    }

    /// Credibility record for a Farcaster fid
    pub async fn credibility(&self, fid: u64, opts: RecordOptions) -> Result<CredibilityRecord> {
        let raw = self.client.fetch_score_by_fid(fid).await?;
        let mut record = CredibilityRecord::build(fid, raw);
        debug!(
            "Credibility fid={} score={} level={} has_profile={}",
            fid,
            record.score(),
            record.level(),
            record.has_profile()
        );

        if opts.breakdown {
            let mut rng = self.config.breakdown.rng();
            record = record.with_breakdown(self.config.breakdown.variance, &mut rng);
        }

        if opts.profile && record.has_profile() {
            match self.client.fetch_profile_by_fid(fid).await {
                Ok(Some(profile)) => {
                    debug!(
                        "fid {} profile attached ({} reviews received)",
                        fid,
                        profile.stats.review.received.total()
                    );
                    record = record.with_profile(profile)
                }
                Ok(None) => debug!("fid {} has a score but no user object", fid),
                Err(e) => warn!("Profile lookup for fid {} failed, serving score only: {}", fid, e),
            }
        }

        Ok(record)
    }

    pub async fn score(&self, key: &Userkey) -> Result<Option<RawScore>> {
        self.client.fetch_score(key).await
    }

    pub async fn scores(&self, fids: &[u64]) -> HashMap<u64, RawScore> {
        self.client.fetch_many(fids).await
    }
}
