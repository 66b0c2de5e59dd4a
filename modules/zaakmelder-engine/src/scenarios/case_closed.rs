//! A case reached a final status. Which terminal condition routed here is
//! decided by the resolver, not by this strategy.

use async_trait::async_trait;
use serde_json::{Map, Value};

use zaakmelder_common::types::{IdType, Identification};
use zaakmelder_common::AbortReason;

use crate::error::ProcessError;
use crate::queries::QueryContext;
use crate::resolver::ScenarioKind;
use crate::scenarios::{Scenario, ScenarioData};

pub struct CaseClosedScenario;

#[async_trait]
impl Scenario for CaseClosedScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::CaseClosed
    }

    async fn prepare(&self, ctx: &mut QueryContext<'_>) -> Result<ScenarioData, ProcessError> {
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
            "status.omschrijving".into(),
            Value::String(case_type.name.clone()),
        );

        Ok(ScenarioData {
            party,
            reference: case.identification,
            personalization,
        })
    }
}
