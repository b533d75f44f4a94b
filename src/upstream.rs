use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use reqwest::{header, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::userkey::Userkey;

/// Score-only answer of `/api/v2/score/userkey`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScore {
    pub score: i64,
    pub level: String,
}

/// Full user object of `/api/v2/user/by/farcaster/{fid}`
///
/// Ethos adds fields over time, so everything is optional or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EthosProfile {
    pub id: Option<u64>,
    pub profile_id: Option<u64>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
    pub score: Option<i64>,
    pub status: Option<String>,
    pub xp_total: Option<u64>,
    pub xp_streak_days: Option<u32>,
    pub stats: ProfileStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileStats {
    pub review: ReviewStats,
    pub vouch: VouchStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewStats {
    pub received: ReviewCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VouchStats {
    pub given: VouchCount,
    pub received: VouchCount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VouchCount {
    pub count: u64,
}

impl ReviewCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

/// Ethos API client
///
/// 1リクエスト = 1 upstream 呼び出し。リトライもキャッシュもしない。
pub struct EthosClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EthosClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        // validate early so handlers never see a bad base URL
        Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid upstream base_url '{}': {}", config.base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        info!(
            "Ethos client targeting {} (auth: {})",
            config.base_url,
            if config.api_key.is_some() { "bearer" } else { "none" }
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::Config(format!("invalid upstream url for {}: {}", path, e)))
    }

    /// `/api/v2/score/userkey?userkey=<percent-encoded key>`
    pub fn score_url(&self, key: &Userkey) -> Result<Url> {
        let mut url = self.endpoint("/api/v2/score/userkey")?;
        url.query_pairs_mut().append_pair("userkey", &key.to_string());
        Ok(url)
    }

    pub fn profile_url(&self, fid: u64) -> Result<Url> {
        self.endpoint(&format!("/api/v2/user/by/farcaster/{}", fid))
    }

    /// Fetch the score for any userkey. `Ok(None)` means Ethos has no profile.
    pub async fn fetch_score(&self, key: &Userkey) -> Result<Option<RawScore>> {
        let url = self.score_url(key)?;
        self.get_json(url, &key.to_string()).await
    }

    pub async fn fetch_score_by_fid(&self, fid: u64) -> Result<Option<RawScore>> {
        self.fetch_score(&Userkey::Farcaster(fid)).await
    }

    pub async fn fetch_profile_by_fid(&self, fid: u64) -> Result<Option<EthosProfile>> {
        let url = self.profile_url(fid)?;
        self.get_json(url, &format!("farcaster profile {}", fid)).await
    }

    /// Look up many fids concurrently.
    ///
    /// Missing profiles and failed lookups are left out of the map; one bad
    /// fid never fails the batch.
    pub async fn fetch_many(&self, fids: &[u64]) -> HashMap<u64, RawScore> {
        let lookups = fids.iter().map(|&fid| async move {
            (fid, self.fetch_score_by_fid(fid).await)
        });

        let mut scores = HashMap::with_capacity(fids.len());
        for (fid, result) in join_all(lookups).await {
            match result {
                Ok(Some(score)) => {
                    scores.insert(fid, score);
                }
                Ok(None) => debug!("Batch: fid {} has no Ethos profile", fid),
                Err(e) => warn!("Batch: lookup for fid {} failed: {}", fid, e),
            }
        }
        scores
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, subject: &str) -> Result<Option<T>> {
        let mut req = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        debug!("Ethos lookup {} -> {}", subject, status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            warn!("Ethos API returned {} for {}", status.as_u16(), subject);
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let parsed = serde_json::from_slice(&body)?;
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> EthosClient {
        EthosClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_score_url_is_percent_encoded() {
        let c = client("https://api.ethos.network/");
        let url = c.score_url(&Userkey::Farcaster(1112413)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.ethos.network/api/v2/score/userkey?userkey=service%3Afarcaster%3A1112413"
        );

        let url = c
            .score_url(&Userkey::TwitterUsername("a b&c".into()))
            .unwrap();
        assert_eq!(url.query(), Some("userkey=service%3Ax.com%3Ausername%3Aa+b%26c"));
    }

    #[test]
    fn test_profile_url() {
        let c = client("http://localhost:4000");
        assert_eq!(
            c.profile_url(3).unwrap().as_str(),
            "http://localhost:4000/api/v2/user/by/farcaster/3"
        );
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let result = EthosClient::new(&UpstreamConfig {
            base_url: "not a url".to_string(),
            ..UpstreamConfig::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_profile_decodes_partial_object() {
        let profile: EthosProfile = serde_json::from_str(
            r#"{
                "id": 11,
                "displayName": "Alice",
                "score": 1875,
                "stats": { "review": { "received": { "positive": 4, "negative": 1 } },
                           "vouch": { "received": { "count": 2 } } }
            }"#,
        )
        .unwrap();
        assert_eq!(profile.id, Some(11));
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(profile.stats.review.received.total(), 5);
        assert_eq!(profile.stats.vouch.received.count, 2);
        assert_eq!(profile.stats.vouch.given.count, 0);
        assert!(profile.username.is_none());
    }

    #[test]
    fn test_raw_score_requires_both_fields() {
        assert!(serde_json::from_str::<RawScore>(r#"{"score": 10}"#).is_err());
        assert!(serde_json::from_str::<RawScore>(r#"{"score": "x", "level": "y"}"#).is_err());
    }
}
