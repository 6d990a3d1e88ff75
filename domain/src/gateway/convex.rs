//! Convex HTTP API client for the booking data store.
//!
//! The website's users, bookings, testimonials and contacts live in a Convex
//! deployment; this client calls its public function-execution API
//! (`POST /api/mutation`) to run the `users:createOrUpdate` mutation that
//! keeps the user table in sync with the identity provider.

use std::time::Duration;

use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::user_sync::{UserStore, UserUpsert};

/// Path of the idempotent user upsert function in the Convex deployment.
const CREATE_OR_UPDATE_USER: &str = "users:createOrUpdate";

/// Upper bound on any single store call, so a hanging deployment cannot pin a
/// request handler; the provider retries on the resulting 5xx.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Convex deployment client
pub struct ConvexClient {
    client: reqwest::Client,
    base_url: String,
}

/// Request body for the Convex function-execution API
#[derive(Debug, Serialize)]
struct UdfRequest<'a> {
    path: &'a str,
    args: serde_json::Value,
    format: &'a str,
}

/// Response from the Convex function-execution API
#[derive(Debug, Deserialize)]
struct UdfResponse {
    status: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
}

impl ConvexClient {
    /// Create a new client against the configured deployment URL
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base_url = config.convex_deployment_url().ok_or_else(|| {
            warn!("Failed to get Convex deployment URL from config");
            Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a mutation function on the deployment and return its result value.
    async fn run_mutation(
        &self,
        path: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        let url = format!("{}/api/mutation", self.base_url);

        debug!("Running Convex mutation: {path}");

        let response = self
            .client
            .post(&url)
            .json(&UdfRequest {
                path,
                args,
                format: "json",
            })
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Convex deployment: {e:?}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Convex API error: {status} - {error_text}");
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Store(error_text)),
            });
        }

        let udf: UdfResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Convex response: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Invalid response from Convex".to_string(),
                )),
            }
        })?;

        if udf.status != "success" {
            let message = udf
                .error_message
                .unwrap_or_else(|| "unknown UDF error".to_string());
            warn!("Convex mutation {path} failed: {message}");
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Store(message)),
            });
        }

        Ok(udf.value.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl UserStore for ConvexClient {
    async fn create_or_update_user(&self, upsert: UserUpsert) -> Result<String, Error> {
        let mut args = serde_json::json!({
            "clerkId": upsert.external_id,
            "email": upsert.email,
        });
        if let Some(name) = &upsert.name {
            args["name"] = serde_json::Value::String(name.clone());
        }

        let value = self.run_mutation(CREATE_OR_UPDATE_USER, args).await?;

        // The mutation returns the stored document id. Ids are strings; the id
        // is only logged, so any other shape is stringified rather than rejected.
        let store_id = match value {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        };

        info!("Upserted user into Convex with id: {store_id}");
        Ok(store_id)
    }
}
