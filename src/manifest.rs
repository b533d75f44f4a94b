//! Farcaster Mini App manifest and embed metadata.

use serde_json::json;

use crate::config::{ManifestConfig, WebConfig};

pub const APP_NAME: &str = "Ethos Credibility Scores";

/// Always advertise HTTPS; hosts refuse plain-http Mini Apps.
pub fn https_origin(public_url: &str) -> String {
    let trimmed = public_url.trim_end_matches('/');
    match trimmed.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => trimmed.to_string(),
    }
}

/// `/.well-known/farcaster.json`
pub fn farcaster_manifest(web: &WebConfig, association: &ManifestConfig) -> serde_json::Value {
    let base = https_origin(&web.public_url);
    let mut manifest = json!({
        "frame": {
            "version": "1",
            "name": APP_NAME,
            "iconUrl": format!("{}/og-image.png", base),
            "splashImageUrl": format!("{}/splash.png", base),
            "homeUrl": format!("{}/miniapp", base),
            "webhookUrl": format!("{}/api/webhook", base),
        }
    });

    if let (Some(header), Some(payload), Some(signature)) =
        (&association.header, &association.payload, &association.signature)
    {
        manifest["accountAssociation"] = json!({
            "header": header,
            "payload": payload,
            "signature": signature,
        });
    }
    manifest
}

/// JSON for the `fc:miniapp` meta tag of a launchable page
pub fn embed_meta(public_url: &str, title: &str, launch_path: &str) -> serde_json::Value {
    let base = https_origin(public_url);
    json!({
        "version": "next",
        "imageUrl": format!("{}/og-image.png", base),
        "button": {
            "title": title,
            "action": {
                "type": "launch_frame",
                "name": "My Ethos Score",
                "url": format!("{}{}", base, launch_path),
                "splashImageUrl": format!("{}/splash.png", base),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_origin() {
        assert_eq!(https_origin("http://example.com/"), "https://example.com");
        assert_eq!(https_origin("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_manifest_without_association() {
        let web = WebConfig {
            public_url: "http://miniapp.test".to_string(),
            ..WebConfig::default()
        };
        let manifest = farcaster_manifest(&web, &ManifestConfig::default());
        assert_eq!(manifest["frame"]["homeUrl"], "https://miniapp.test/miniapp");
        assert_eq!(manifest["frame"]["webhookUrl"], "https://miniapp.test/api/webhook");
        assert!(manifest.get("accountAssociation").is_none());
    }

    #[test]
    fn test_manifest_with_association() {
        let association = ManifestConfig {
            header: Some("h".into()),
            payload: Some("p".into()),
            signature: Some("s".into()),
        };
        let manifest = farcaster_manifest(&WebConfig::default(), &association);
        assert_eq!(manifest["accountAssociation"]["signature"], "s");
    }

    #[test]
    fn test_embed_meta() {
        let meta = embed_meta("https://miniapp.test", "Get My Ethos Score", "/credibility");
        assert_eq!(meta["button"]["action"]["url"], "https://miniapp.test/credibility");
        assert_eq!(meta["button"]["title"], "Get My Ethos Score");
    }
}
