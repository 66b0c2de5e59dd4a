//! A message object was created for a citizen.
//!
//! Gated solely by the global "messages allowed" flag; the BSN comes
//! directly from the message payload rather than from a case lookup.

use async_trait::async_trait;
use serde_json::{Map, Value};

use zaakmelder_common::types::IdType;
use zaakmelder_common::AbortReason;

use crate::error::ProcessError;
use crate::queries::QueryContext;
use crate::resolver::ScenarioKind;
use crate::scenarios::{Scenario, ScenarioData};

pub struct MessageReceivedScenario;

#[async_trait]
impl Scenario for MessageReceivedScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::MessageReceived
    }

    async fn prepare(&self, ctx: &mut QueryContext<'_>) -> Result<ScenarioData, ProcessError> {
        if !ctx.settings().whitelist.messages_allowed() {
            return Err(AbortReason::MessagesDisabled.into());
        }

        let message = ctx.message().await?;
        if message.identification.kind != IdType::Bsn {
            return Err(AbortReason::UnsupportedAssignee {
                kind: message.identification.kind,
            }
            .into());
        }

        let party = ctx.party(&message.identification, None).await?;

        let mut personalization = Map::new();
        personalization.insert(
            "bericht.onderwerp".into(),
            Value::String(message.subject.clone()),
        );
        personalization.insert(
            "bericht.berichttekst".into(),
            Value::String(message.body.clone()),
        );

        Ok(ScenarioData {
            party,
            reference: message.subject,
            personalization,
        })
    }
}
