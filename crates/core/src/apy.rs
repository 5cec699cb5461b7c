//! Selection of the displayed APY figures.
//!
//! Vaults come in a few shapes, checked in order:
//! 1. the yBOLD wrapper, which reports its staking vault's figures;
//! 2. Katana vaults, whose APY is the sum of reward components from the
//!    Katana APR service and whose historical APY is not shown;
//! 3. everything else, which uses the forward/net APR and historical points.

use std::collections::BTreeMap;

use crate::models::{
    Chain, KATANA_LEGACY_REWARDS_KEY, KatanaAprTable, VaultSnapshot, YBoldApr, nonzero,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimatedApy {
    pub underlying: f64,
    /// Reported on its own line when present.
    pub rewards: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistoricalApy {
    Known(f64),
    /// No meaningful history for this vault; rendered as `--%`.
    Suppressed,
}

/// Sum of all numeric reward components, minus the legacy field.
pub fn calculate_katana_apy(extra: &BTreeMap<String, serde_json::Value>) -> f64 {
    extra
        .iter()
        .filter(|(k, _)| k.as_str() != KATANA_LEGACY_REWARDS_KEY)
        .filter_map(|(_, v)| v.as_f64())
        .sum()
}

fn katana_extra<'a>(
    table: &'a KatanaAprTable,
    address: &str,
) -> Option<&'a BTreeMap<String, serde_json::Value>> {
    let lower = address.to_ascii_lowercase();
    let normalized = lower.strip_prefix("0x").unwrap_or(&lower);
    let with_prefix = format!("0x{normalized}");
    let extra_for = |key: &str| table.get(key).and_then(|e| e.apr.as_ref()?.extra.as_ref());
    extra_for(normalized)
        .or_else(|| extra_for(&with_prefix))
        .or_else(|| extra_for(address))
        .or_else(|| {
            table
                .iter()
                .find(|(k, _)| {
                    let k = k.to_ascii_lowercase();
                    k.strip_prefix("0x").unwrap_or(&k) == normalized
                })
                .and_then(|(_, e)| e.apr.as_ref()?.extra.as_ref())
        })
}

pub fn calculate_estimated_apy(
    vault: &VaultSnapshot,
    katana_aprs: Option<&KatanaAprTable>,
    ybold_apr: Option<&YBoldApr>,
) -> EstimatedApy {
    let Some(apr) = &vault.apr else {
        return EstimatedApy::default();
    };

    if vault.is_ybold()
        && let Some(ybold) = ybold_apr
    {
        return EstimatedApy { underlying: ybold.estimated_apy, rewards: None };
    }

    if vault.chain() == Some(Chain::Katana)
        && let Some(table) = katana_aprs
    {
        let apy = katana_extra(table, &vault.address).map(calculate_katana_apy).unwrap_or(0.0);
        return EstimatedApy { underlying: apy.max(0.0), rewards: None };
    }

    let extra = apr.extra.clone().unwrap_or_default();
    let sum_rewards =
        extra.staking_rewards_apr.unwrap_or(0.0) + extra.gamma_reward_apr.unwrap_or(0.0);
    let forward = apr.forward_apr.as_ref().and_then(|f| nonzero(f.net_apr));
    let underlying = forward.or(nonzero(apr.net_apr)).unwrap_or(0.0);
    EstimatedApy { underlying, rewards: (sum_rewards > 0.0).then_some(sum_rewards) }
}

pub fn calculate_historical_apy(
    vault: &VaultSnapshot,
    ybold_apr: Option<&YBoldApr>,
) -> HistoricalApy {
    if vault.is_ybold()
        && let Some(ybold) = ybold_apr
    {
        return HistoricalApy::Known(ybold.historical_apy);
    }
    if vault.chain() == Some(Chain::Katana) {
        return HistoricalApy::Suppressed;
    }
    let Some(points) = vault.apr.as_ref().and_then(|apr| apr.points.as_ref()) else {
        return HistoricalApy::Known(0.0);
    };
    let monthly = points.month_ago.unwrap_or(0.0);
    let weekly = nonzero(points.week_ago).unwrap_or(0.0);
    HistoricalApy::Known(if monthly > 0.0 { monthly } else { weekly })
}
