//! Task tracker client trait and its Asana implementation

use crate::types::{DataEnvelope, ErrorEnvelope, Task};
use anyhow::{bail, Context};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Base URL of the public Asana REST API
pub const DEFAULT_API_URL: &str = "https://app.asana.com/api/1.0";

/// Fields requested when fetching a task, so custom field options come back inline
const TASK_OPT_FIELDS: &str = "name,custom_fields.gid,custom_fields.name,\
custom_fields.display_value,custom_fields.enum_value.gid,custom_fields.enum_value.name,\
custom_fields.enum_options.gid,custom_fields.enum_options.name,custom_fields.enum_options.enabled";

/// Task tracker operations needed by the status sync
///
/// Implementations must be `Send + Sync`; the sync holds one instance for the
/// whole run and calls it sequentially.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    /// Fetch a task together with its custom fields
    async fn fetch_task(&self, task_gid: &str) -> anyhow::Result<Task>;

    /// Select `option_gid` in the enum custom field `field_gid` of a task
    async fn set_enum_field(
        &self,
        task_gid: &str,
        field_gid: &str,
        option_gid: &str,
    ) -> anyhow::Result<()>;
}

/// Asana REST API client
#[derive(Debug, Clone)]
pub struct AsanaClient {
    client: reqwest::Client,
    api_url: String,
}

impl AsanaClient {
    /// Create a client for the public Asana API
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the access token
    /// is not a valid header value.
    pub fn new(access_token: &str) -> anyhow::Result<Self> {
        Self::with_api_url(access_token, DEFAULT_API_URL)
    }

    /// Create a client against a custom API base URL
    pub fn with_api_url(access_token: &str, api_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token.trim()))
                .context("Invalid Asana access token")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn task_url(&self, task_gid: &str) -> String {
        format!("{}/tasks/{}", self.api_url, task_gid)
    }
}

#[async_trait]
impl TaskTracker for AsanaClient {
    async fn fetch_task(&self, task_gid: &str) -> anyhow::Result<Task> {
        debug!("Fetching Asana task {}", task_gid);

        let response = self
            .client
            .get(self.task_url(task_gid))
            .query(&[("opt_fields", TASK_OPT_FIELDS)])
            .send()
            .await
            .with_context(|| format!("Failed to send request for task {}", task_gid))?;

        let response = check_status(response, "fetch task", task_gid).await?;
        let envelope: DataEnvelope<Task> = response
            .json()
            .await
            .with_context(|| format!("Invalid task payload for task {}", task_gid))?;

        Ok(envelope.data)
    }

    async fn set_enum_field(
        &self,
        task_gid: &str,
        field_gid: &str,
        option_gid: &str,
    ) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            data: UpdateTask<'a>,
        }

        #[derive(Serialize)]
        struct UpdateTask<'a> {
            custom_fields: HashMap<&'a str, &'a str>,
        }

        debug!(
            "Setting custom field {} of task {} to option {}",
            field_gid, task_gid, option_gid
        );

        let body = Body {
            data: UpdateTask {
                custom_fields: HashMap::from([(field_gid, option_gid)]),
            },
        };

        let response = self
            .client
            .put(self.task_url(task_gid))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send update for task {}", task_gid))?;

        check_status(response, "update task", task_gid).await?;
        Ok(())
    }
}

/// Turn non-2xx responses into errors carrying Asana's own messages
async fn check_status(
    response: reqwest::Response,
    operation: &str,
    task_gid: &str,
) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.joined_messages())
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);

    bail!(
        "Asana {} failed for task {} ({}): {}",
        operation,
        task_gid,
        status,
        message
    )
}
