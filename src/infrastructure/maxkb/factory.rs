//! MaxKB client construction from configuration

use tracing::info;

use super::client::MaxKbClient;
use super::shape::shape_for;
use super::transport::ReqwestTransport;
use crate::config::MaxKbConfig;
use crate::domain::DomainError;

impl MaxKbClient<ReqwestTransport> {
    /// Build a client for the configured deployment; settings are read once
    pub fn from_config(config: &MaxKbConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let shape = shape_for(config.api_version, &config.workspace_id)?;
        let api_root = config.api_root();
        let transport = ReqwestTransport::new(api_root.as_str(), &config.api_key)?;

        info!(
            api_root = %api_root,
            api_version = %config.api_version,
            "MaxKB client initialized"
        );

        Ok(Self::new(transport, shape))
    }
}
