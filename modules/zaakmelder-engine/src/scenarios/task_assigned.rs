//! A task was assigned to a citizen or organization.
//!
//! Closed tasks and unsupported assignee types are rejected before any
//! whitelist check is attempted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use zaakmelder_common::types::{IdType, TaskStatus};
use zaakmelder_common::AbortReason;

use crate::error::ProcessError;
use crate::queries::QueryContext;
use crate::resolver::ScenarioKind;
use crate::scenarios::{Scenario, ScenarioData};

pub struct TaskAssignedScenario;

/// Citizen-facing date, or the literal marker when the task never expires.
fn format_expiration(expiration: Option<DateTime<Utc>>) -> String {
    match expiration {
        Some(moment) => moment.format("%d-%m-%Y").to_string(),
        None => "geen verloopdatum".to_string(),
    }
}

#[async_trait]
impl Scenario for TaskAssignedScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::TaskAssigned
    }

    async fn prepare(&self, ctx: &mut QueryContext<'_>) -> Result<ScenarioData, ProcessError> {
        let task = ctx.task().await?;
        if task.status == TaskStatus::Closed {
            return Err(AbortReason::TaskClosed.into());
        }
        if task.identification.kind == IdType::Unknown {
            return Err(AbortReason::UnsupportedAssignee {
                kind: task.identification.kind,
            }
            .into());
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
        let party = ctx
            .party(&task.identification, Some(&case.identification))
            .await?;

        let mut personalization = Map::new();
        personalization.insert("taak.titel".into(), Value::String(task.title.clone()));
        personalization.insert(
            "taak.verloopdatum".into(),
            Value::String(format_expiration(task.expiration)),
        );
        personalization.insert(
            "zaak.identificatie".into(),
            Value::String(case.identification.clone()),
        );

        Ok(ScenarioData {
            party,
            reference: case.identification,
            personalization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expiration_formats_as_localized_date() {
        let moment = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(format_expiration(Some(moment)), "01-07-2024");
    }

    #[test]
    fn missing_expiration_uses_literal_marker() {
        assert_eq!(format_expiration(None), "geen verloopdatum");
    }
}
