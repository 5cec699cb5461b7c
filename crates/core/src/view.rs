use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::{
    apy::{calculate_estimated_apy, calculate_historical_apy},
    models::{Chain, KatanaAprTable, VaultAddress, VaultSnapshot, YBoldApr},
    util::{format_historical, format_percent, format_usd},
};

pub const DEFAULT_VAULT_NAME: &str = "Yearn Vault";

/// Upstream data gathered for one vault. Any part may be missing.
#[derive(Debug, Clone, Default)]
pub struct VaultData {
    pub vault: Option<VaultSnapshot>,
    pub katana_aprs: Option<KatanaAprTable>,
    pub ybold_apr: Option<YBoldApr>,
}

/// Display-ready values for the vault card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderData {
    pub icon: String,
    pub name: String,
    pub estimated_apy: String,
    pub rewards_apr: Option<String>,
    pub min_boost: Option<String>,
    pub historical_apy: String,
    pub tvl_usd: String,
    pub chain_name: String,
    pub address: String,
}

fn icon_url(assets_base_uri: &str, chain: Chain, token: &str) -> String {
    format!("{}/{}/{}/logo-128.png", assets_base_uri.trim_end_matches('/'), chain.id(), token)
}

fn display_name(name: &str) -> String {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| Regex::new(r"\s+Vault$").unwrap());
    let name = regex.replace(name, "");
    if name.is_empty() { DEFAULT_VAULT_NAME.to_string() } else { name.into_owned() }
}

impl RenderData {
    pub fn new(
        assets_base_uri: &str,
        chain: Chain,
        address: &VaultAddress,
        data: &VaultData,
    ) -> Self {
        let Some(vault) = &data.vault else {
            return Self::fallback(assets_base_uri, chain, address);
        };
        let estimated =
            calculate_estimated_apy(vault, data.katana_aprs.as_ref(), data.ybold_apr.as_ref());
        let historical = calculate_historical_apy(vault, data.ybold_apr.as_ref());
        let rewards = estimated.rewards.filter(|r| *r != 0.0);
        Self {
            icon: icon_url(assets_base_uri, chain, &vault.token.address.to_ascii_lowercase()),
            name: display_name(&vault.name),
            estimated_apy: format_percent(estimated.underlying),
            rewards_apr: rewards.map(format_percent),
            min_boost: rewards.map(|r| format!("{:.2}%", r * 10.0)),
            historical_apy: format_historical(historical),
            tvl_usd: format_usd(vault.tvl.tvl.unwrap_or(0.0)),
            chain_name: chain.name().to_string(),
            address: address.to_string(),
        }
    }

    /// Used when the vault data could not be fetched.
    pub fn fallback(assets_base_uri: &str, chain: Chain, address: &VaultAddress) -> Self {
        Self {
            icon: icon_url(assets_base_uri, chain, address.as_str()),
            name: DEFAULT_VAULT_NAME.to_string(),
            estimated_apy: "0.00%".to_string(),
            rewards_apr: None,
            min_boost: None,
            historical_apy: "0.00%".to_string(),
            tvl_usd: "$0".to_string(),
            chain_name: chain.name().to_string(),
            address: address.to_string(),
        }
    }

    /// `Ethereum | 0x1234...abcd`
    pub fn footer_text(&self) -> String {
        match VaultAddress::parse(&self.address) {
            Some(address) => format!("{} | {}", self.chain_name, address.short()),
            None => self.chain_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const ASSETS: &str = "https://assets.example.com/api/token";
    const ADDRESS: &str = "0xAbCdEf0000000000000000000000000000000001";

    #[test]
    fn test_display_name() {
        let cases: &[(&str, &str)] = &[
            ("yvUSDC-1 Vault", "yvUSDC-1"),
            ("Curve 3pool  Vault", "Curve 3pool"),
            ("Vault of Gold", "Vault of Gold"),
            ("Vault", "Vault"),
            (" Vault", "Yearn Vault"),
            ("", "Yearn Vault"),
        ];
        for &(name, expected) in cases {
            assert_eq!(display_name(name), expected, "{name}");
        }
    }

    #[test]
    fn test_fallback_view() {
        let address = VaultAddress::parse(ADDRESS).unwrap();
        let data = RenderData::new(ASSETS, Chain::Base, &address, &VaultData::default());
        assert_eq!(data, RenderData {
            icon: format!("{ASSETS}/8453/{ADDRESS}/logo-128.png"),
            name: "Yearn Vault".to_string(),
            estimated_apy: "0.00%".to_string(),
            rewards_apr: None,
            min_boost: None,
            historical_apy: "0.00%".to_string(),
            tvl_usd: "$0".to_string(),
            chain_name: "Base".to_string(),
            address: ADDRESS.to_string(),
        });
        assert_eq!(data.footer_text(), "Base | 0xAbCd...0001");
    }

    #[test]
    fn test_generic_vault_view() {
        let address = VaultAddress::parse(ADDRESS).unwrap();
        let vault: VaultSnapshot = serde_json::from_value(json!({
            "address": ADDRESS,
            "chainID": 1,
            "name": "yvUSDC-1 Vault",
            "token": { "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48" },
            "tvl": { "tvl": 2_300_000.0 },
            "apr": {
                "netAPR": 0.01,
                "forwardAPR": { "netAPR": 0.05 },
                "extra": { "stakingRewardsAPR": 0.02, "gammaRewardAPR": 0.01 },
                "points": { "monthAgo": 0.042 }
            }
        }))
        .unwrap();
        let data = RenderData::new(ASSETS, Chain::Ethereum, &address, &VaultData {
            vault: Some(vault),
            ..Default::default()
        });
        assert_eq!(
            data.icon,
            format!("{ASSETS}/1/0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48/logo-128.png")
        );
        assert_eq!(data.name, "yvUSDC-1");
        assert_eq!(data.estimated_apy, "5.00%");
        assert_eq!(data.rewards_apr.as_deref(), Some("3.00%"));
        assert_eq!(data.min_boost.as_deref(), Some("0.30%"));
        assert_eq!(data.historical_apy, "4.20%");
        assert_eq!(data.tvl_usd, "$2.30M");
        assert_eq!(data.chain_name, "Ethereum");
    }

    #[test]
    fn test_katana_vault_view() {
        let address = VaultAddress::parse(ADDRESS).unwrap();
        let vault: VaultSnapshot = serde_json::from_value(json!({
            "address": ADDRESS,
            "chainID": 747474,
            "name": "vbETH",
            "tvl": { "tvl": 950.0 },
            "apr": { "netAPR": 0.5 }
        }))
        .unwrap();
        let katana_aprs: KatanaAprTable = serde_json::from_value(json!({
            "abcdef0000000000000000000000000000000001": {
                "apr": { "extra": { "katanaRewardsAPR": 1.0, "katanaAppRewardsAPR": 0.0731 } }
            }
        }))
        .unwrap();
        let data = RenderData::new(ASSETS, Chain::Katana, &address, &VaultData {
            vault: Some(vault),
            katana_aprs: Some(katana_aprs),
            ybold_apr: None,
        });
        assert_eq!(data.estimated_apy, "7.31%");
        assert_eq!(data.rewards_apr, None);
        assert_eq!(data.historical_apy, "--%");
        assert_eq!(data.tvl_usd, "$950.00");
    }

    #[test]
    fn test_min_boost_rounding() {
        let address = VaultAddress::parse(ADDRESS).unwrap();
        let vault: VaultSnapshot = serde_json::from_value(json!({
            "address": ADDRESS,
            "chainID": 1,
            "apr": { "netAPR": 0.01, "extra": { "stakingRewardsAPR": 0.0015 } }
        }))
        .unwrap();
        let data = RenderData::new(ASSETS, Chain::Ethereum, &address, &VaultData {
            vault: Some(vault),
            ..Default::default()
        });
        assert_eq!(data.rewards_apr.as_deref(), Some("0.15%"));
        // 0.0015 * 10 is just below 0.015
        assert_eq!(data.min_boost.as_deref(), Some("0.01%"));
    }
}
