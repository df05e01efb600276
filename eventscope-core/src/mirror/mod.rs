//! External calendar mirroring.
//!
//! Events can be mirrored into an external calendar through provider
//! binaries that speak the JSON protocol in [`protocol`]. The mirror is
//! best-effort by contract: every failure here surfaces as a warning at
//! the dispatch layer, never as a failed lifecycle operation.

pub mod protocol;
pub mod provider;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EventScopeResult;
use crate::event::Event;
use crate::mirror::protocol::{CreateEvent, DeleteEvent, MirrorEvent, UpdateEvent};
use crate::mirror::provider::Provider;

/// External calendar operations, as consumed by the dispatcher.
///
/// For control flow, "not configured" and "failed" are the same thing (no
/// mirror id gets recorded either way); implementations may distinguish
/// them in logs.
#[async_trait]
pub trait CalendarMirror: Send + Sync {
    /// Mirror a new event. Returns the id of the external copy.
    async fn create_event(&self, event: &Event) -> EventScopeResult<String>;

    /// Push the event's current fields to the external copy.
    async fn update_event(&self, event: &Event, external_id: &str) -> EventScopeResult<()>;

    /// Remove the external copy.
    async fn delete_event(&self, external_id: &str) -> EventScopeResult<()>;
}

/// Provider-specific settings passed through on every call.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MirrorConfig(pub HashMap<String, toml::Value>);

impl From<&MirrorConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &MirrorConfig) -> Self {
        config
            .0
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

/// Mirror configuration: which provider binary to use plus its settings
/// (e.g. Google account and calendar id).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Mirror {
    pub provider: Provider,
    #[serde(flatten)]
    pub config: MirrorConfig,
}

impl Mirror {
    pub fn new(provider: Provider, config: MirrorConfig) -> Self {
        Mirror { provider, config }
    }

    fn mirror_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config)
    }
}

#[async_trait]
impl CalendarMirror for Mirror {
    async fn create_event(&self, event: &Event) -> EventScopeResult<String> {
        let payload = MirrorEvent::try_from(event)?;
        self.provider
            .call(CreateEvent {
                mirror_config: self.mirror_config(),
                event: payload,
            })
            .await
    }

    async fn update_event(&self, event: &Event, external_id: &str) -> EventScopeResult<()> {
        let payload = MirrorEvent::try_from(event)?;
        self.provider
            .call(UpdateEvent {
                mirror_config: self.mirror_config(),
                event_id: external_id.to_string(),
                event: payload,
            })
            .await
    }

    async fn delete_event(&self, external_id: &str) -> EventScopeResult<()> {
        self.provider
            .call(DeleteEvent {
                mirror_config: self.mirror_config(),
                event_id: external_id.to_string(),
            })
            .await
    }
}
