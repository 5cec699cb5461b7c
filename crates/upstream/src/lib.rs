pub mod fonts;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use reqwest::header;
use serde::de::DeserializeOwned;
use yearn_og_core::{
    config::UpstreamConfig,
    models::{
        Chain, KatanaAprTable, VaultAddress, VaultSnapshot, YBOLD_STAKING_ADDRESS, YBoldApr,
    },
    view::VaultData,
};

/// Client for the vault-data and APR services.
///
/// Every request is a single attempt bounded by the configured timeout.
/// Data lookups never fail; anything that goes wrong is logged and reported
/// as missing data.
#[derive(Clone)]
pub struct Upstream {
    pub client: reqwest::Client,
    ydaemon_base_uri: Option<String>,
    katana_apr_service_api: Option<String>,
}

/// Image bytes to be embedded into a card.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            ydaemon_base_uri: config.ydaemon_base_uri.clone(),
            katana_apr_service_api: config.katana_apr_service_api.clone(),
        })
    }

    /// yDaemon vault endpoint, if a secure base URI is configured.
    fn vault_url(&self, chain: Chain, address: &str) -> Option<String> {
        let base = self.ydaemon_base_uri.as_deref()?;
        if !base.starts_with("https://") {
            return None;
        }
        Some(format!(
            "{}/{}/vault/{}?strategiesDetails=withDetails&strategiesCondition=inQueue",
            base.trim_end_matches('/'),
            chain.id(),
            address
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            bail!("Unexpected status {}", response.status());
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn fetch_vault(&self, chain: Chain, address: &str) -> Option<VaultSnapshot> {
        let url = self.vault_url(chain, address)?;
        match self.get_json(&url).await {
            Ok(vault) => Some(vault),
            Err(e) => {
                tracing::warn!("Failed to fetch vault {}/{}: {:#}", chain.id(), address, e);
                None
            }
        }
    }

    pub async fn fetch_katana_aprs(&self) -> Option<KatanaAprTable> {
        let url = self.katana_apr_service_api.as_deref()?;
        match self.get_json(url).await {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::warn!("Failed to fetch Katana APRs: {:#}", e);
                None
            }
        }
    }

    /// Figures for the yBOLD wrapper, read from its staking vault.
    /// Only available on Ethereum.
    pub async fn fetch_ybold_apr(&self, chain: Chain) -> Option<YBoldApr> {
        if chain != Chain::Ethereum {
            return None;
        }
        let staking = self.fetch_vault(chain, YBOLD_STAKING_ADDRESS).await?;
        YBoldApr::from_staking_vault(&staking)
    }

    /// Fetch everything needed to describe a vault. The APR overrides are
    /// only requested for the vaults they apply to.
    pub async fn fetch_vault_data(&self, chain: Chain, address: &VaultAddress) -> VaultData {
        let katana = async {
            if chain == Chain::Katana { self.fetch_katana_aprs().await } else { None }
        };
        let ybold =
            async { if address.is_ybold() { self.fetch_ybold_apr(chain).await } else { None } };
        let (vault, katana_aprs, ybold_apr) =
            tokio::join!(self.fetch_vault(chain, address.as_str()), katana, ybold);
        VaultData { vault, katana_aprs, ybold_apr }
    }

    pub async fn fetch_bytes(&self, url: &str) -> reqwest::Result<Bytes> {
        self.client.get(url).send().await?.error_for_status()?.bytes().await
    }

    /// Best-effort image download. Only absolute http(s) URLs are fetched.
    pub async fn fetch_image(&self, url: &str) -> Option<ImageAsset> {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return None;
        }
        let result = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let data = response.bytes().await?;
            reqwest::Result::Ok(ImageAsset { content_type, data })
        }
        .await;
        match result {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!("Failed to fetch image {}: {}", url, e);
                None
            }
        }
    }
}
