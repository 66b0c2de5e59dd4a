//! Webhook notification events as published by the case-management
//! notification service.
//!
//! Field names follow the upstream wire format (`actie`, `kanaal`,
//! `hoofdObject`, ...). Keys the deserializer does not recognize are kept
//! in `orphans` rather than dropped, so operators can see what an upstream
//! version bump started sending.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Create,
    Update,
    Destroy,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Create => write!(f, "create"),
            EventAction::Update => write!(f, "update"),
            EventAction::Destroy => write!(f, "destroy"),
            EventAction::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventChannel {
    Zaken,
    Objecten,
    Besluiten,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventChannel::Zaken => write!(f, "zaken"),
            EventChannel::Objecten => write!(f, "objecten"),
            EventChannel::Besluiten => write!(f, "besluiten"),
            EventChannel::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventResource {
    Zaak,
    Status,
    Object,
    Besluit,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EventResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventResource::Zaak => write!(f, "zaak"),
            EventResource::Status => write!(f, "status"),
            EventResource::Object => write!(f, "object"),
            EventResource::Besluit => write!(f, "besluit"),
            EventResource::Unknown => write!(f, "unknown"),
        }
    }
}

/// Channel-specific optional attributes (`kenmerken`). At most one of the
/// resource families is populated per event; the rest stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventAttributes {
    #[serde(rename = "zaaktype", default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<Url>,

    #[serde(rename = "objectType", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<Url>,

    #[serde(rename = "besluittype", default, skip_serializing_if = "Option::is_none")]
    pub decision_type: Option<Url>,

    #[serde(rename = "bronorganisatie", default, skip_serializing_if = "Option::is_none")]
    pub source_organization: Option<String>,

    #[serde(
        rename = "verantwoordelijkeOrganisatie",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub responsible_organization: Option<String>,

    #[serde(
        rename = "vertrouwelijkheidaanduiding",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub confidentiality: Option<String>,

    /// Attribute keys we do not model.
    #[serde(flatten)]
    pub orphans: BTreeMap<String, serde_json::Value>,
}

/// One inbound webhook call. Created once per request, immutable afterward,
/// never persisted beyond the request lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "actie")]
    pub action: EventAction,

    #[serde(rename = "kanaal")]
    pub channel: EventChannel,

    pub resource: EventResource,

    #[serde(rename = "kenmerken", default)]
    pub attributes: EventAttributes,

    /// The main object the event is about (case, object or decision URL).
    #[serde(rename = "hoofdObject")]
    pub main_object: Url,

    #[serde(rename = "resourceUrl")]
    pub resource_url: Url,

    #[serde(rename = "aanmaakdatum")]
    pub created: DateTime<Utc>,

    /// Top-level keys we do not model.
    #[serde(flatten)]
    pub orphans: BTreeMap<String, serde_json::Value>,
}

impl NotificationEvent {
    /// The `(action, channel, resource)` triple used for classification.
    pub fn discriminator(&self) -> (EventAction, EventChannel, EventResource) {
        (self.action, self.channel, self.resource)
    }

    /// True when the event or its attributes carried keys we do not model.
    pub fn has_orphans(&self) -> bool {
        !self.orphans.is_empty() || !self.attributes.orphans.is_empty()
    }
}
