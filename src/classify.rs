use serde::Serialize;

/// Score Classifier
///
/// Ethos の生スコア (0 - 2800) をレベル・色・レンジに変換する。
/// Thresholds are inclusive lower bounds, checked highest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Unknown,
    Untrusted,
    Questionable,
    Neutral,
    Reputable,
    Exemplary,
    Revered,
}

/// (lower bound, level, color, range label), highest first
const TIERS: [(i64, TrustLevel, &str, &str); 6] = [
    (2400, TrustLevel::Revered, "purple", "2400-2800"),
    (2000, TrustLevel::Exemplary, "green", "2000-2399"),
    (1600, TrustLevel::Reputable, "blue", "1600-1999"),
    (1200, TrustLevel::Neutral, "yellow", "1200-1599"),
    (800, TrustLevel::Questionable, "orange", "800-1199"),
    (1, TrustLevel::Untrusted, "red", "1-799"),
];

impl TrustLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Untrusted => "untrusted",
            Self::Questionable => "questionable",
            Self::Neutral => "neutral",
            Self::Reputable => "reputable",
            Self::Exemplary => "exemplary",
            Self::Revered => "revered",
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub level: TrustLevel,
    pub color_bucket: &'static str,
    pub range_label: &'static str,
}

/// Classify a raw score. Total: negative scores are treated as 0.
pub fn classify(score: i64) -> Classification {
    let score = score.max(0);
    TIERS
        .iter()
        .find(|(min, ..)| score >= *min)
        .map(|&(_, level, color_bucket, range_label)| Classification {
            level,
            color_bucket,
            range_label,
        })
        .unwrap_or(Classification {
            level: TrustLevel::Unknown,
            color_bucket: "gray",
            range_label: "N/A",
        })
}

/// Coarse 0-100 number for an upstream qualitative level string.
///
/// This is a different vocabulary from [`TrustLevel`]: it covers the labels
/// the full user object carries ("trusted", "verified", "legend", ...).
pub fn level_to_numeric(level: &str) -> u8 {
    match level.trim().to_lowercase().as_str() {
        "untrusted" => 20,
        "newcomer" => 40,
        "trusted" => 60,
        "revered i" => 70,
        "revered ii" => 75,
        "revered iii" => 80,
        "verified" => 85,
        "expert" => 90,
        "legend" => 95,
        _ => 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(2400).level, TrustLevel::Revered);
        assert_eq!(classify(2399).level, TrustLevel::Exemplary);
        assert_eq!(classify(2000).level, TrustLevel::Exemplary);
        assert_eq!(classify(1999).level, TrustLevel::Reputable);
        assert_eq!(classify(1600).level, TrustLevel::Reputable);
        assert_eq!(classify(1200).level, TrustLevel::Neutral);
        assert_eq!(classify(800).level, TrustLevel::Questionable);
        assert_eq!(classify(799).level, TrustLevel::Untrusted);
        assert_eq!(classify(1).level, TrustLevel::Untrusted);
        assert_eq!(classify(0).level, TrustLevel::Unknown);
    }

    #[test]
    fn test_colors_and_ranges() {
        let c = classify(2500);
        assert_eq!(c.color_bucket, "purple");
        assert_eq!(c.range_label, "2400-2800");

        let c = classify(1700);
        assert_eq!(c.color_bucket, "blue");
        assert_eq!(c.range_label, "1600-1999");

        let c = classify(0);
        assert_eq!(c.color_bucket, "gray");
        assert_eq!(c.range_label, "N/A");
    }

    #[test]
    fn test_negative_is_unknown() {
        assert_eq!(classify(-5), classify(0));
        assert_eq!(classify(i64::MIN).level, TrustLevel::Unknown);
    }

    #[test]
    fn test_monotonic() {
        let mut prev = classify(0).level;
        for score in 0..=3000 {
            let level = classify(score).level;
            assert!(level >= prev, "tier dropped at score {}", score);
            prev = level;
        }
        assert_eq!(classify(i64::MAX).level, TrustLevel::Revered);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&classify(900)).unwrap();
        assert_eq!(
            json,
            r#"{"level":"questionable","colorBucket":"orange","rangeLabel":"800-1199"}"#
        );
    }

    #[test]
    fn test_level_to_numeric() {
        assert_eq!(level_to_numeric("legend"), 95);
        assert_eq!(level_to_numeric("Revered II"), 75);
        assert_eq!(level_to_numeric("untrusted"), 20);
        assert_eq!(level_to_numeric("something-new"), 50);
        assert_eq!(level_to_numeric(""), 50);
    }
}
