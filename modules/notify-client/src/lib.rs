//! Client for the templated notification gateway.
//!
//! The engine only produces [`NotifyData`]; everything about actual
//! delivery (templates, provider routing, retries) lives behind the
//! [`NotifyDispatcher`] seam. This module ships the production
//! implementation that POSTs one send per channel.

pub mod error;

pub use error::{NotifyError, Result};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use zaakmelder_common::types::{NotifyData, NotifyMethod};

/// Acknowledgement of one accepted send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: Uuid,
    pub method: NotifyMethod,
    pub recipient: String,
}

/// Accepts one unit of dispatchable work and performs the send.
#[async_trait]
pub trait NotifyDispatcher: Send + Sync {
    async fn send(&self, data: &NotifyData) -> Result<DeliveryReceipt>;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    template_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    personalisation: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Uuid,
}

/// Production dispatcher backed by reqwest.
pub struct NotifyApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl NotifyApiClient {
    pub fn new(base_url: Url, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    fn endpoint(&self, method: NotifyMethod) -> Result<Url> {
        let path = match method {
            NotifyMethod::Email => "v2/notifications/email",
            NotifyMethod::Sms => "v2/notifications/sms",
            NotifyMethod::Letter => "v2/notifications/letter",
        };
        self.base_url
            .join(path)
            .map_err(|e| NotifyError::Parse(e.to_string()))
    }
}

#[async_trait]
impl NotifyDispatcher for NotifyApiClient {
    async fn send(&self, data: &NotifyData) -> Result<DeliveryReceipt> {
        let url = self.endpoint(data.method)?;

        let request = SendRequest {
            template_id: data.template_id,
            email_address: (data.method == NotifyMethod::Email).then_some(data.contact_details.as_str()),
            phone_number: (data.method == NotifyMethod::Sms).then_some(data.contact_details.as_str()),
            address: (data.method == NotifyMethod::Letter).then_some(data.contact_details.as_str()),
            personalisation: &data.personalization,
        };

        tracing::debug!(method = %data.method, template = %data.template_id, "Dispatching notification");

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let accepted: SendResponse = resp
            .json()
            .await
            .map_err(|e| NotifyError::Parse(e.to_string()))?;

        Ok(DeliveryReceipt {
            id: accepted.id,
            method: data.method,
            recipient: data.contact_details.clone(),
        })
    }
}
