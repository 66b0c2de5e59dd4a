//! Completion reporting back to the source systems for audit.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use zaakmelder_common::types::NotifyMethod;
use zgw_client::{ServiceKind, ZgwError, ZgwExecutor};

/// What gets recorded with the source system after a successful dispatch.
#[derive(Debug, Clone)]
pub struct CompletionRecord {
    pub reference: String,
    pub channel: NotifyMethod,
    pub recipient: String,
    pub messages: Vec<String>,
}

#[async_trait]
pub trait CompletionReporter: Send + Sync {
    async fn report(&self, record: &CompletionRecord) -> Result<(), ZgwError>;
}

/// Records a contact moment in the party register.
pub struct PartyRegisterReporter {
    zgw: Arc<dyn ZgwExecutor>,
    base_url: Url,
}

impl PartyRegisterReporter {
    pub fn new(zgw: Arc<dyn ZgwExecutor>, base_url: Url) -> Self {
        Self { zgw, base_url }
    }
}

#[async_trait]
impl CompletionReporter for PartyRegisterReporter {
    async fn report(&self, record: &CompletionRecord) -> Result<(), ZgwError> {
        let url = self
            .base_url
            .join("klantinteracties/api/v1/klantcontacten")
            .map_err(|e| ZgwError::Parse {
                url: self.base_url.to_string(),
                message: e.to_string(),
            })?;

        let body = json!({
            "kanaal": record.channel.to_string(),
            "onderwerp": record.reference,
            "inhoud": record.messages.join("\n"),
            "indicatieContactGelukt": true,
            "taal": "nld",
            "vertrouwelijk": false,
        });

        self.zgw.post_json(ServiceKind::OpenKlant, &url, body).await?;
        tracing::debug!(
            reference = %record.reference,
            channel = %record.channel,
            "Registered completion"
        );
        Ok(())
    }
}
