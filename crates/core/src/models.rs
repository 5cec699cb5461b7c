use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
    sync::OnceLock,
};

use regex::Regex;
use serde::{Deserialize, Deserializer};

/// The yBOLD wrapper vault. Its APY is taken from the staking vault below.
pub const YBOLD_VAULT_ADDRESS: &str = "0x9F4330700a36B29952869fac9b33f45EEdd8A3d8";
pub const YBOLD_STAKING_ADDRESS: &str = "0x23346B04a7f55b8760E5860AA5A77383D63491cD";

/// Superseded Katana reward component, excluded from APY sums.
pub const KATANA_LEGACY_REWARDS_KEY: &str = "katanaRewardsAPR";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Chain {
    Ethereum,
    Optimism,
    Polygon,
    Fantom,
    Base,
    Arbitrum,
    Katana,
}

impl Chain {
    pub const fn variants() -> &'static [Self] {
        &[
            Self::Ethereum,
            Self::Optimism,
            Self::Polygon,
            Self::Fantom,
            Self::Base,
            Self::Arbitrum,
            Self::Katana,
        ]
    }

    pub const fn id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Optimism => 10,
            Self::Polygon => 137,
            Self::Fantom => 250,
            Self::Base => 8453,
            Self::Arbitrum => 42161,
            Self::Katana => 747474,
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        Self::variants().iter().copied().find(|c| c.id() == id)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Optimism => "Optimism",
            Self::Polygon => "Polygon",
            Self::Fantom => "Fantom",
            Self::Base => "Base",
            Self::Arbitrum => "Arbitrum",
            Self::Katana => "Katana",
        }
    }
}

impl FromStr for Chain {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        s.parse::<u64>().ok().and_then(Self::from_id).ok_or(())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Display name for any chain ID, including ones outside the allow list.
pub fn chain_name(id: u64) -> Cow<'static, str> {
    match Chain::from_id(id) {
        Some(chain) => Cow::Borrowed(chain.name()),
        None => Cow::Owned(format!("Chain {id}")),
    }
}

/// A 40-hex-digit contract address, with or without the `0x` prefix.
/// The caller's spelling is preserved.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VaultAddress(String);

impl VaultAddress {
    pub fn parse(s: &str) -> Option<Self> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = REGEX.get_or_init(|| Regex::new(r"^(?:0x)?[a-fA-F0-9]{40}$").unwrap());
        regex.is_match(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn eq_ignore_case(&self, other: &str) -> bool { self.0.eq_ignore_ascii_case(other) }

    pub fn is_ybold(&self) -> bool { self.eq_ignore_case(YBOLD_VAULT_ADDRESS) }

    /// `0x1234...abcd`
    pub fn short(&self) -> String {
        let s = self.0.as_str();
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    }
}

impl fmt::Display for VaultAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Accepts any JSON value, keeping it only if it is a number.
fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where D: Deserializer<'de> {
    Ok(serde_json::Value::deserialize(deserializer)?.as_f64())
}

fn integer<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where D: Deserializer<'de> {
    Ok(serde_json::Value::deserialize(deserializer)?.as_u64())
}

fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// Treats zero and NaN as missing, so `a.or(b)` falls through the same way a
/// falsy check would.
pub(crate) fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// A vault as reported by the upstream vault-data service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VaultSnapshot {
    #[serde(deserialize_with = "string")]
    pub address: String,
    #[serde(rename = "chainID", deserialize_with = "integer")]
    pub chain_id: Option<u64>,
    pub token: VaultToken,
    #[serde(deserialize_with = "string")]
    pub name: String,
    pub tvl: VaultTvl,
    pub apr: Option<VaultApr>,
}

impl VaultSnapshot {
    pub fn is_ybold(&self) -> bool { self.address.eq_ignore_ascii_case(YBOLD_VAULT_ADDRESS) }

    pub fn chain(&self) -> Option<Chain> { self.chain_id.and_then(Chain::from_id) }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VaultToken {
    #[serde(deserialize_with = "string")]
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VaultTvl {
    #[serde(deserialize_with = "number")]
    pub tvl: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VaultApr {
    #[serde(rename = "netAPR", deserialize_with = "number")]
    pub net_apr: Option<f64>,
    #[serde(rename = "forwardAPR")]
    pub forward_apr: Option<ForwardApr>,
    pub extra: Option<AprExtra>,
    pub points: Option<AprPoints>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForwardApr {
    #[serde(rename = "type", deserialize_with = "string")]
    pub kind: String,
    #[serde(rename = "netAPR", deserialize_with = "number")]
    pub net_apr: Option<f64>,
    pub composite: Option<ForwardAprComposite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForwardAprComposite {
    #[serde(deserialize_with = "number")]
    pub boost: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AprExtra {
    #[serde(rename = "stakingRewardsAPR", deserialize_with = "number")]
    pub staking_rewards_apr: Option<f64>,
    #[serde(rename = "gammaRewardAPR", deserialize_with = "number")]
    pub gamma_reward_apr: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AprPoints {
    #[serde(deserialize_with = "number")]
    pub week_ago: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub month_ago: Option<f64>,
}

/// Katana APR service response, keyed by vault address.
pub type KatanaAprTable = HashMap<String, KatanaAprEntry>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KatanaAprEntry {
    pub apr: Option<KatanaApr>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KatanaApr {
    /// Reward components. Values are kept raw so non-numeric members can be
    /// skipped when summing.
    pub extra: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YBoldApr {
    pub estimated_apy: f64,
    pub historical_apy: f64,
}

impl YBoldApr {
    /// Derive the yBOLD figures from the staking vault's snapshot.
    pub fn from_staking_vault(staking: &VaultSnapshot) -> Option<Self> {
        let apr = staking.apr.as_ref()?;
        let forward = apr.forward_apr.as_ref().and_then(|f| nonzero(f.net_apr));
        Some(Self {
            estimated_apy: forward.or(nonzero(apr.net_apr)).unwrap_or(0.0),
            historical_apy: nonzero(apr.net_apr).unwrap_or(0.0),
        })
    }
}
