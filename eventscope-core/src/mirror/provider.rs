//! Provider subprocess client.
//!
//! Mirror operations are delegated to provider binaries
//! (e.g. `eventscope-provider-google`) speaking JSON over stdin/stdout.
//! Any executable that speaks the protocol can serve as a provider.
//! Providers manage their own credentials and tokens; eventscope just
//! passes provider-specific parameters from the mirror config.

use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{EventScopeError, EventScopeResult};
use crate::mirror::protocol::{Command, ProviderCommand, Request, Response};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A provider binary, referenced by its short name
/// ("google" for `eventscope-provider-google`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn binary_path(&self) -> EventScopeResult<std::path::PathBuf> {
        let binary_name = format!("eventscope-provider-{}", self.0);
        which::which(&binary_name)
            .map_err(|_| EventScopeError::ProviderNotInstalled(self.0.clone()))
    }

    /// Run a typed provider command, bounded by the request timeout.
    /// A timed-out request is treated like any other sync failure.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> EventScopeResult<C::Response> {
        timeout(REQUEST_TIMEOUT, self.exchange(C::command(), cmd))
            .await
            .map_err(|_| EventScopeError::ProviderTimeout(REQUEST_TIMEOUT.as_secs()))?
    }

    /// One request/response round-trip with a provider process.
    async fn exchange<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> EventScopeResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| EventScopeError::Serialization(e.to_string()))?;
        let request = serde_json::to_string(&Request { command, params })
            .map_err(|e| EventScopeError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                EventScopeError::Provider(format!(
                    "Failed to spawn {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EventScopeError::Provider("Provider stdin unavailable".into()))?;
        stdin.write_all(format!("{request}\n").as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(EventScopeError::Provider(format!(
                "Provider exited with status {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let body = String::from_utf8_lossy(&output.stdout);
        if body.trim().is_empty() {
            return Err(EventScopeError::Provider(
                "Provider returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&body)
            .map_err(|e| EventScopeError::Provider(format!("Malformed provider response: {e}")))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(EventScopeError::Provider(error)),
        }
    }
}
