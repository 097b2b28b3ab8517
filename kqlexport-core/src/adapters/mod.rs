//! Remote access to a Kusto database.
//!
//! The export drivers only see the [`KustoSource`] trait. The REST client
//! is one implementation; tests provide in-memory ones.
//!
//! # Module Structure
//! - `config`: cluster and database configuration
//! - `credentials`: access token resolution
//! - `field_access`: named and positional views over metadata rows
//! - `kusto`: REST management endpoint client

use crate::models::ResultRow;
use crate::Result;
use async_trait::async_trait;

pub mod config;
pub mod credentials;
pub mod field_access;
pub mod kusto;

pub use config::ConnectionConfig;
pub use credentials::{AccessToken, CredentialSource};
pub use field_access::{FieldAccess, FieldAccessError, NamedFieldAccess, PositionalFieldAccess};
pub use kusto::KustoRestClient;

/// Read-only schema queries against one database.
///
/// # Object Safety
/// This trait is object-safe, allowing for dynamic dispatch through
/// `Box<dyn KustoSource>`.
#[async_trait]
pub trait KustoSource: Send + Sync {
    /// Names of all tables, in listing order.
    ///
    /// # Errors
    /// Returns [`ExportError::Remote`](crate::error::ExportError::Remote)
    /// if the listing command fails.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Names of all functions, in listing order.
    ///
    /// # Errors
    /// Returns a remote error if the listing command fails.
    async fn list_functions(&self) -> Result<Vec<String>>;

    /// The `cslschema` string for a table, `None` if nothing came back.
    ///
    /// # Errors
    /// Returns a remote error if the command fails.
    async fn table_schema(&self, name: &str) -> Result<Option<String>>;

    /// The `.show function` row for a function, `None` if nothing came back.
    ///
    /// # Errors
    /// Returns a remote error if the command fails.
    async fn function_row(&self, name: &str) -> Result<Option<ResultRow>>;
}

/// Creates the REST-backed source for `config`, authenticating through
/// `credentials`.
///
/// Resolves the access token first, so an authentication failure surfaces
/// before any management command is sent.
///
/// # Errors
/// Returns an authentication error if no token can be obtained.
pub async fn create_source(
    config: &ConnectionConfig,
    credentials: &CredentialSource,
) -> Result<Box<dyn KustoSource>> {
    tracing::debug!("Resolving access token via {}", credentials.describe());

    let token = credentials.resolve().await?;
    Ok(Box::new(KustoRestClient::new(config.clone(), token)))
}
