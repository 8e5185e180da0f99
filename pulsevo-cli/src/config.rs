use anyhow::{Context, Result};
use pulsevo_core::{HttpDashboardClient, PulsevoConfig, PulsevoError};

/// Loaded configuration plus the flags that override it.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: PulsevoConfig,
}

impl CliContext {
    pub fn load(api_url: Option<String>) -> Result<Self> {
        let config = PulsevoConfig::load().map_err(PulsevoError::from)?;
        Self::from_config(config, api_url)
    }

    pub fn from_config(mut config: PulsevoConfig, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            config.api.base_url = url.trim().to_string();
            config.validate().map_err(PulsevoError::from)?;
        }

        Ok(Self { config })
    }

    pub fn client(&self) -> Result<HttpDashboardClient> {
        HttpDashboardClient::new(&self.config.api).context("Failed to build HTTP client")
    }

    pub fn compact(&self) -> bool {
        self.config.display.compact
    }
}
