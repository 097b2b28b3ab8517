//! Cluster connection configuration.

use crate::error::ExportError;
use crate::Result;
use url::Url;

/// Domain appended to bare cluster names.
pub const DEFAULT_CLUSTER_DOMAIN: &str = "kusto.windows.net";

/// Target cluster and database for an export run.
///
/// Holds no credentials; access tokens are resolved separately and never
/// stored on this struct.
///
/// # Example
/// ```rust
/// use kqlexport_core::adapters::ConnectionConfig;
///
/// let config = ConnectionConfig::new("help", "Samples").unwrap();
/// assert_eq!(config.cluster_url(), "https://help.kusto.windows.net");
/// assert_eq!(config.database, "Samples");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Cluster endpoint, e.g. `https://help.kusto.windows.net`
    pub cluster: Url,
    /// Database within the cluster
    pub database: String,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.display_cluster(), self.database)
    }
}

impl ConnectionConfig {
    /// Parses and validates a cluster identifier and database name.
    ///
    /// # Errors
    /// Returns a configuration error if the cluster cannot be parsed or
    /// the resulting configuration fails [`validate`](Self::validate).
    pub fn new(cluster: &str, database: impl Into<String>) -> Result<Self> {
        let config = Self {
            cluster: parse_cluster(cluster)?,
            database: database.into().trim().to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if the database name is empty or the cluster does not
    /// use http(s).
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(ExportError::configuration("database cannot be empty"));
        }

        if !matches!(self.cluster.scheme(), "https" | "http") {
            return Err(ExportError::configuration(format!(
                "unsupported cluster scheme '{}', expected https",
                self.cluster.scheme()
            )));
        }

        if self.cluster.host_str().is_none_or(str::is_empty) {
            return Err(ExportError::configuration("cluster URL has no host"));
        }

        Ok(())
    }

    /// Cluster URL without a trailing slash.
    pub fn cluster_url(&self) -> &str {
        self.cluster.as_str().trim_end_matches('/')
    }

    /// Cluster URL safe for logs and generated files.
    pub fn display_cluster(&self) -> String {
        crate::error::redact_cluster_url(self.cluster_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Endpoint that accepts management commands.
    pub fn management_endpoint(&self) -> String {
        format!("{}/v1/rest/mgmt", self.cluster_url())
    }
}

fn parse_cluster(cluster: &str) -> Result<Url> {
    let cluster = cluster.trim().trim_end_matches('/');
    if cluster.is_empty() {
        return Err(ExportError::configuration("cluster cannot be empty"));
    }

    let candidate = if cluster.contains("://") {
        cluster.to_string()
    } else if cluster.contains('.') {
        format!("https://{}", cluster)
    } else {
        format!("https://{}.{}", cluster, DEFAULT_CLUSTER_DOMAIN)
    };

    Url::parse(&candidate).map_err(|e| {
        ExportError::configuration(format!(
            "invalid cluster '{}': {}",
            crate::error::redact_cluster_url(&candidate),
            e
        ))
    })
}
