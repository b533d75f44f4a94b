use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Ethos userkey - `<namespace>:<value>` composite identifier
///
/// One subject can be looked up through any identity system Ethos knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Userkey {
    Farcaster(u64),
    Address(String),
    Discord(String),
    TwitterId(String),
    TwitterUsername(String),
    ProfileId(u64),
}

const FARCASTER: &str = "service:farcaster:";
const ADDRESS: &str = "address:";
const DISCORD: &str = "service:discord:";
const TWITTER_USERNAME: &str = "service:x.com:username:";
const TWITTER_ID: &str = "service:x.com:";
const PROFILE_ID: &str = "profileId:";

impl Userkey {
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Farcaster(_) => FARCASTER,
            Self::Address(_) => ADDRESS,
            Self::Discord(_) => DISCORD,
            Self::TwitterId(_) => TWITTER_ID,
            Self::TwitterUsername(_) => TWITTER_USERNAME,
            Self::ProfileId(_) => PROFILE_ID,
        }
    }

    pub fn supported_formats() -> [&'static str; 6] {
        [
            "service:farcaster:<fid>",
            "address:<ethereum_address>",
            "service:discord:<discord_user_id>",
            "service:x.com:<twitter_user_id>",
            "service:x.com:username:<twitter_username>",
            "profileId:<ethos_profile_id>",
        ]
    }
}

impl fmt::Display for Userkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())?;
        match self {
            Self::Farcaster(id) | Self::ProfileId(id) => write!(f, "{}", id),
            Self::Address(v) | Self::Discord(v) | Self::TwitterId(v) | Self::TwitterUsername(v) => {
                f.write_str(v)
            }
        }
    }
}

impl FromStr for Userkey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let numeric = |v: &str| {
            v.parse::<u64>()
                .map_err(|_| Error::validation("userkey", format!("'{}' is not a numeric id", v)))
        };
        let text = |v: &str| {
            if v.is_empty() {
                Err(Error::validation("userkey", "empty value"))
            } else {
                Ok(v.to_string())
            }
        };

        // username prefix must be checked before the plain x.com one
        if let Some(v) = s.strip_prefix(FARCASTER) {
            Ok(Self::Farcaster(numeric(v)?))
        } else if let Some(v) = s.strip_prefix(TWITTER_USERNAME) {
            Ok(Self::TwitterUsername(text(v)?))
        } else if let Some(v) = s.strip_prefix(TWITTER_ID) {
            Ok(Self::TwitterId(text(v)?))
        } else if let Some(v) = s.strip_prefix(DISCORD) {
            Ok(Self::Discord(text(v)?))
        } else if let Some(v) = s.strip_prefix(ADDRESS) {
            Ok(Self::Address(text(v)?))
        } else if let Some(v) = s.strip_prefix(PROFILE_ID) {
            Ok(Self::ProfileId(numeric(v)?))
        } else {
            Err(Error::validation(
                "userkey",
                format!("unsupported namespace in '{}'", s),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Userkey::Farcaster(1112413).to_string(), "service:farcaster:1112413");
        assert_eq!(Userkey::Address("0xabc".into()).to_string(), "address:0xabc");
        assert_eq!(Userkey::Discord("42".into()).to_string(), "service:discord:42");
        assert_eq!(Userkey::TwitterId("99".into()).to_string(), "service:x.com:99");
        assert_eq!(
            Userkey::TwitterUsername("vitalik".into()).to_string(),
            "service:x.com:username:vitalik"
        );
        assert_eq!(Userkey::ProfileId(7).to_string(), "profileId:7");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "service:farcaster:3".parse::<Userkey>().unwrap(),
            Userkey::Farcaster(3)
        );
        assert_eq!(
            "service:x.com:username:alice".parse::<Userkey>().unwrap(),
            Userkey::TwitterUsername("alice".into())
        );
        assert_eq!(
            "service:x.com:12345".parse::<Userkey>().unwrap(),
            Userkey::TwitterId("12345".into())
        );
        assert_eq!(
            "address:0xdead".parse::<Userkey>().unwrap(),
            Userkey::Address("0xdead".into())
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("service:farcaster:abc".parse::<Userkey>().is_err());
        assert!("profileId:".parse::<Userkey>().is_err());
        assert!("address:".parse::<Userkey>().is_err());
        assert!("telegram:1".parse::<Userkey>().is_err());
    }

    #[test]
    fn test_supported_formats_match_namespaces() {
        let formats = Userkey::supported_formats();
        assert_eq!(formats.len(), 6);
        assert!(formats.iter().all(|f| f.ends_with('>')));
        assert!(formats[0].starts_with(Userkey::Farcaster(0).namespace()));
    }
}
