//! A decision was registered for a case.
//!
//! The information-object gates run before any whitelist check: a wrong
//! object type, a non-definitive status or a confidential notice each
//! abort unconditionally.

use async_trait::async_trait;
use serde_json::{Map, Value};

use zaakmelder_common::types::{IdType, Identification, InfoObjectStatus};
use zaakmelder_common::AbortReason;

use crate::error::ProcessError;
use crate::queries::{uri, QueryContext};
use crate::resolver::ScenarioKind;
use crate::scenarios::{Scenario, ScenarioData};

pub struct DecisionMadeScenario;

#[async_trait]
impl Scenario for DecisionMadeScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::DecisionMade
    }

    async fn prepare(&self, ctx: &mut QueryContext<'_>) -> Result<ScenarioData, ProcessError> {
        let decision = ctx.decision().await?;
        let decision_type = ctx.decision_type().await?;

        let resources = ctx.decision_resources().await?;
        for resource in &resources.results {
            let info = ctx.info_object(&resource.info_object).await?;
            let type_uuid = uri::uuid_tail(&info.type_url)?;
            if !ctx
                .settings()
                .object_types
                .decision_info_objects
                .contains(&type_uuid)
            {
                return Err(AbortReason::UnsupportedInfoObjectType { uuid: type_uuid }.into());
            }
            if info.status != InfoObjectStatus::Definitive {
                return Err(AbortReason::DecisionNotDefinitive { title: info.title }.into());
            }
            if !info.confidentiality.is_public() {
                return Err(AbortReason::ConfidentialInfoObject {
                    title: info.title,
                    confidentiality: info.confidentiality,
                }
                .into());
            }
        }

        let case_type = ctx.last_case_type().await?;
        ctx.settings()
            .whitelist
            .require(self.kind(), &case_type.identification)?;
        if !case_type.is_notification_expected {
            return Err(AbortReason::NotificationNotExpected {
                case_type: case_type.identification.clone(),
            }
            .into());
        }

        let case = ctx.case().await?;
        let bsn = ctx.initiator_bsn().await?;
        let identification = Identification {
            kind: IdType::Bsn,
            value: bsn,
        };
        let party = ctx.party(&identification, Some(&case.identification)).await?;

        let mut personalization = Map::new();
        personalization.insert(
            "zaak.identificatie".into(),
            Value::String(case.identification.clone()),
        );
        personalization.insert("zaak.omschrijving".into(), Value::String(case.name.clone()));
        personalization.insert(
            "besluit.omschrijving".into(),
            Value::String(decision_type.name.clone()),
        );
        personalization.insert(
            "besluit.datum".into(),
            Value::String(decision.date.format("%d-%m-%Y").to_string()),
        );

        Ok(ScenarioData {
            party,
            reference: case.identification,
            personalization,
        })
    }
}
