//! Kusto management endpoint client.
//!
//! Commands go to `POST {cluster}/v1/rest/mgmt` and come back as the v1
//! response envelope: a list of tables, the first of which is the primary
//! result. Only `.show` commands are ever issued.

use super::config::ConnectionConfig;
use super::credentials::AccessToken;
use super::KustoSource;
use crate::error::ExportError;
use crate::models::ResultRow;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value sent in the `x-ms-app` header.
pub const APPLICATION_NAME: &str = "kqlexport";

/// Request body for a management command.
#[derive(Debug, Serialize)]
struct ManagementRequest<'a> {
    db: &'a str,
    csl: &'a str,
}

/// v1 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagementResponse {
    #[serde(rename = "Tables")]
    pub tables: Vec<ResultTable>,
}

/// One table of a v1 response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultTable {
    #[serde(rename = "TableName", default)]
    pub table_name: String,
    #[serde(rename = "Columns", default)]
    pub columns: Vec<ResultColumn>,
    #[serde(rename = "Rows", default)]
    pub rows: Vec<Value>,
}

/// Column descriptor of a v1 result table.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultColumn {
    #[serde(rename = "ColumnName")]
    pub column_name: String,
}

impl ManagementResponse {
    /// The first table of the response.
    pub fn primary(&self) -> Option<&ResultTable> {
        self.tables.first()
    }
}

impl ResultTable {
    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.column_name.clone())
            .collect()
    }

    /// Index of `name` in the column list.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.column_name == name)
    }

    /// String values of one column across all rows, skipping nulls.
    ///
    /// # Errors
    /// Returns a remote error if the column is missing.
    pub fn column_strings(&self, command: &str, name: &str) -> Result<Vec<String>> {
        let index = self.column_index(name).ok_or_else(|| {
            ExportError::malformed_response(command, format!("result has no '{}' column", name))
        })?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| match row.get(index)? {
                Value::Null => None,
                Value::String(text) => Some(text.clone()),
                other => Some(other.to_string()),
            })
            .collect())
    }

    /// First row paired with the column names.
    pub fn first_row(&self) -> Option<ResultRow> {
        self.rows
            .first()
            .map(|values| ResultRow::new(self.column_names(), values.clone()))
    }
}

/// Quotes an entity name for use in a `.show` command.
///
/// ```rust
/// use kqlexport_core::adapters::kusto::quote_entity;
///
/// assert_eq!(quote_entity("My Table"), "[\"My Table\"]");
/// ```
pub fn quote_entity(name: &str) -> String {
    format!("[\"{}\"]", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Kusto source backed by the REST management endpoint.
pub struct KustoRestClient {
    config: ConnectionConfig,
    token: AccessToken,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for KustoRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KustoRestClient")
            .field("config", &self.config.to_string())
            .finish_non_exhaustive()
    }
}

impl KustoRestClient {
    /// Creates a client for one cluster and database.
    pub fn new(config: ConnectionConfig, token: AccessToken) -> Self {
        Self {
            config,
            token,
            http_client: reqwest::Client::new(),
        }
    }

    /// Runs a management command and returns the decoded envelope.
    ///
    /// # Errors
    /// Returns [`ExportError::Remote`] on transport failure, a non-success
    /// status or a body that is not a v1 response.
    pub async fn execute_mgmt(&self, command: &str) -> Result<ManagementResponse> {
        let request_id = format!("{};{}", APPLICATION_NAME, uuid::Uuid::new_v4());
        tracing::trace!("Executing '{}' (request id {})", command, request_id);

        let response = self
            .http_client
            .post(self.config.management_endpoint())
            .bearer_auth(self.token.secret())
            .header("x-ms-client-request-id", &request_id)
            .header("x-ms-app", APPLICATION_NAME)
            .json(&ManagementRequest {
                db: &self.config.database,
                csl: command,
            })
            .send()
            .await
            .map_err(|e| ExportError::remote(command, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::malformed_response(
                command,
                format!("HTTP {}: {}", status, summarize_error_body(&body)),
            ));
        }

        response
            .json::<ManagementResponse>()
            .await
            .map_err(|e| ExportError::remote(command, e))
    }

    async fn primary_table(&self, command: &str) -> Result<ResultTable> {
        let response = self.execute_mgmt(command).await?;
        response.tables.into_iter().next().ok_or_else(|| {
            ExportError::malformed_response(command, "response contains no result tables")
        })
    }
}

/// Pulls the service's error message out of a failure body when present.
fn summarize_error_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/@message")
                .or_else(|| value.pointer("/error/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().chars().take(500).collect())
}

#[async_trait]
impl KustoSource for KustoRestClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let command = ".show tables";
        self.primary_table(command)
            .await?
            .column_strings(command, "TableName")
    }

    async fn list_functions(&self) -> Result<Vec<String>> {
        let command = ".show functions";
        self.primary_table(command).await?.column_strings(command, "Name")
    }

    async fn table_schema(&self, name: &str) -> Result<Option<String>> {
        let command = format!(".show table {} cslschema", quote_entity(name));
        let table = self.primary_table(&command).await?;
        Ok(table.column_strings(&command, "Schema")?.into_iter().next())
    }

    async fn function_row(&self, name: &str) -> Result<Option<ResultRow>> {
        let command = format!(".show function {}", quote_entity(name));
        Ok(self.primary_table(&command).await?.first_row())
    }
}
