//! Scenario strategies: one per business workflow, each with its own
//! eligibility gates and personalization rules.

mod case_closed;
mod case_created;
mod case_status_updated;
mod decision_made;
mod message_received;
mod not_implemented;
mod task_assigned;

pub use case_closed::CaseClosedScenario;
pub use case_created::CaseCreatedScenario;
pub use case_status_updated::CaseStatusUpdatedScenario;
pub use decision_made::DecisionMadeScenario;
pub use message_received::MessageReceivedScenario;
pub use not_implemented::NotImplementedScenario;
pub use task_assigned::TaskAssignedScenario;

use async_trait::async_trait;
use serde_json::{Map, Value};

use zaakmelder_common::types::{CommonPartyData, NotifyData, NotifyMethod};

use crate::deps::Settings;
use crate::error::ProcessError;
use crate::queries::QueryContext;
use crate::resolver::ScenarioKind;

/// Everything a scenario resolved for one event: the party to notify, the
/// reference used for completion reporting, and the scenario-specific
/// personalization entries.
#[derive(Debug, Clone)]
pub struct ScenarioData {
    pub party: CommonPartyData,
    pub reference: String,
    pub personalization: Map<String, Value>,
}

#[async_trait]
pub trait Scenario: Send + Sync {
    fn kind(&self) -> ScenarioKind;

    /// Gather the domain objects this scenario needs and run its gates.
    /// Intentional skips surface as [`ProcessError::Abort`].
    async fn prepare(&self, ctx: &mut QueryContext<'_>) -> Result<ScenarioData, ProcessError>;
}

/// Enum-keyed dispatch table, resolved once per event.
pub fn scenario_for(kind: ScenarioKind) -> &'static dyn Scenario {
    match kind {
        ScenarioKind::CaseCreated => &CaseCreatedScenario,
        ScenarioKind::CaseStatusUpdated => &CaseStatusUpdatedScenario,
        ScenarioKind::CaseClosed => &CaseClosedScenario,
        ScenarioKind::DecisionMade => &DecisionMadeScenario,
        ScenarioKind::TaskAssigned => &TaskAssignedScenario,
        ScenarioKind::MessageReceived => &MessageReceivedScenario,
        ScenarioKind::NotImplemented => &NotImplementedScenario,
    }
}

/// Name entries every scenario shares.
fn base_personalization(party: &CommonPartyData) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        "klant.voornaam".into(),
        Value::String(party.first_name.clone()),
    );
    map.insert(
        "klant.voorvoegsel".into(),
        Value::String(party.surname_prefix.clone()),
    );
    map.insert(
        "klant.achternaam".into(),
        Value::String(party.surname.clone()),
    );
    map
}

/// Fan one prepared scenario out over the available channels. Each
/// `NotifyData` gets its own freshly allocated personalization map; the
/// list may be empty when no channel is available, which is success with
/// zero work.
pub fn build_notify_data(
    data: &ScenarioData,
    kind: ScenarioKind,
    settings: &Settings,
) -> Result<Vec<NotifyData>, ProcessError> {
    let channels = [
        (
            NotifyMethod::Email,
            data.party.has_email(),
            data.party.email.as_str(),
        ),
        (
            NotifyMethod::Sms,
            data.party.has_phone(),
            data.party.phone.as_str(),
        ),
        (
            NotifyMethod::Letter,
            data.party.has_letter_address(),
            data.party.letter_address.as_str(),
        ),
    ];

    let mut out = Vec::new();
    for (method, available, contact) in channels {
        if !available {
            continue;
        }
        let template_id = settings
            .template_for(method, kind)
            .ok_or(ProcessError::NotImplemented)?;

        let mut personalization = base_personalization(&data.party);
        for (key, value) in &data.personalization {
            personalization.insert(key.clone(), value.clone());
        }

        out.push(NotifyData {
            method,
            contact_details: contact.to_string(),
            template_id,
            personalization,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zaakmelder_common::types::DistributionChannel;

    fn party(channel: DistributionChannel) -> CommonPartyData {
        CommonPartyData {
            first_name: "Alice".into(),
            surname_prefix: String::new(),
            surname: "Jansen".into(),
            distribution_channel: channel,
            email: if channel == DistributionChannel::Email {
                "alice@example.com".into()
            } else {
                String::new()
            },
            phone: if channel == DistributionChannel::Sms {
                "+31612345678".into()
            } else {
                String::new()
            },
            letter_address: String::new(),
        }
    }

    fn data(channel: DistributionChannel) -> ScenarioData {
        ScenarioData {
            party: party(channel),
            reference: "ZAAK-1".into(),
            personalization: Map::new(),
        }
    }

    #[test]
    fn no_available_channel_is_zero_work() {
        let settings = crate::testing::test_settings();
        let out = build_notify_data(
            &data(DistributionChannel::Unknown),
            ScenarioKind::CaseCreated,
            &settings,
        )
        .expect("zero channels is not an error");
        assert!(out.is_empty());
    }

    #[test]
    fn each_notify_data_gets_its_own_personalization_map() {
        let settings = crate::testing::test_settings();
        let mut with_extras = data(DistributionChannel::Email);
        with_extras
            .personalization
            .insert("zaak.identificatie".into(), Value::String("ZAAK-1".into()));

        let out = build_notify_data(&with_extras, ScenarioKind::CaseCreated, &settings)
            .expect("email channel should fan out");
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].personalization.get("zaak.identificatie"),
            Some(&Value::String("ZAAK-1".into()))
        );
        assert_eq!(
            out[0].personalization.get("klant.voornaam"),
            Some(&Value::String("Alice".into()))
        );
    }
}
