//! Site configuration handling.

use std::fs;
use std::path::Path;

use eyre::Result;
use log::debug;
use serde::Deserialize;
use url::Url;

use crate::Error;

/// Site-wide configuration, read from `snowdrift.yaml` in the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Absolute URL of the SPARQL endpoint every view's query is sent to.
    pub sparql_endpoint: String,
}

impl SiteConfig {
    /// Loads and validates the configuration file at the given path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConfigMissing(path.to_path_buf()).into());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Io(path.display().to_string(), e))?;
        let config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| Error::ConfigParse(path.to_path_buf(), e))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks that the configured endpoint is a syntactically valid absolute
    /// URL. Reachability is only established when the first query runs.
    pub fn validate(&self) -> Result<()> {
        let _ = self.endpoint_url()?;
        Ok(())
    }

    /// The endpoint as a parsed URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.sparql_endpoint)
            .map_err(|e| Error::InvalidEndpoint(self.sparql_endpoint.clone(), e).into())
    }
}
