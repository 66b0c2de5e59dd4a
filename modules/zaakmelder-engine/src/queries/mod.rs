//! Dependent query composition.
//!
//! Translates high-level "give me X" requests into the right upstream
//! calls, deriving prerequisite URIs when the caller does not already have
//! them. Resolution order per accessor: a URI already embedded in the
//! event attributes, then derivation from a previously required object,
//! then an explicit context error. Results are memoized on the per-event
//! context, so the resolver and the selected scenario share one set of
//! upstream calls.

pub mod besluit;
pub mod klant;
pub mod object;
pub mod uri;
pub mod zaak;

use url::Url;

use zaakmelder_common::events::{EventChannel, NotificationEvent};
use zaakmelder_common::types::{
    Case, CaseStatuses, CaseType, CommonPartyData, CommonTaskData, Decision, DecisionResources,
    DecisionType, Identification, InfoObject, MessageData,
};

use crate::contact;
use crate::deps::{EngineDeps, Settings};
use crate::error::ProcessError;

/// Per-event query state. Created fresh for every inbound event and
/// discarded afterwards; the `Option` fields memoize upstream results
/// within the event's lifetime.
pub struct QueryContext<'a> {
    deps: &'a EngineDeps,
    event: &'a NotificationEvent,
    case: Option<Case>,
    case_statuses: Option<CaseStatuses>,
    last_case_type: Option<CaseType>,
    decision: Option<Decision>,
    decision_type: Option<DecisionType>,
    task: Option<CommonTaskData>,
    message: Option<MessageData>,
    party: Option<CommonPartyData>,
}

impl<'a> QueryContext<'a> {
    pub fn new(deps: &'a EngineDeps, event: &'a NotificationEvent) -> Self {
        Self {
            deps,
            event,
            case: None,
            case_statuses: None,
            last_case_type: None,
            decision: None,
            decision_type: None,
            task: None,
            message: None,
            party: None,
        }
    }

    pub fn event(&self) -> &'a NotificationEvent {
        self.event
    }

    pub fn settings(&self) -> &'a Settings {
        self.deps.settings.as_ref()
    }

    /// URL of the case this event is about. For case events it is the main
    /// object; for decision and task events it is derived from the decision
    /// or task payload.
    async fn case_url(&mut self) -> Result<Url, ProcessError> {
        match self.event.channel {
            EventChannel::Zaken => Ok(self.event.main_object.clone()),
            EventChannel::Besluiten => Ok(self.decision().await?.case),
            EventChannel::Objecten => Ok(self.task().await?.case),
            EventChannel::Unknown => Err(ProcessError::Context(
                "cannot determine a case URL from the available context".into(),
            )),
        }
    }

    pub async fn case(&mut self) -> Result<Case, ProcessError> {
        if let Some(case) = &self.case {
            return Ok(case.clone());
        }
        let url = self.case_url().await?;
        let deps = self.deps;
        let case = zaak::fetch_case(deps.zgw.as_ref(), &url).await?;
        self.case = Some(case.clone());
        Ok(case)
    }

    pub async fn case_statuses(&mut self) -> Result<CaseStatuses, ProcessError> {
        if let Some(statuses) = &self.case_statuses {
            return Ok(statuses.clone());
        }
        let case_url = self.case_url().await?;
        let deps = self.deps;
        let statuses = zaak::fetch_case_statuses(
            deps.zgw.as_ref(),
            &deps.settings.services.openzaak,
            &case_url,
        )
        .await?;
        self.case_statuses = Some(statuses.clone());
        Ok(statuses)
    }

    /// Case type behind the most recent status. Carries both gates the
    /// scenarios need (`is_final_status`, `is_notification_expected`) and
    /// the identification the whitelists match on.
    pub async fn last_case_type(&mut self) -> Result<CaseType, ProcessError> {
        if let Some(case_type) = &self.last_case_type {
            return Ok(case_type.clone());
        }
        let statuses = self.case_statuses().await?;
        let last = statuses
            .last_status()
            .ok_or_else(|| ProcessError::Context("case has no statuses".into()))?;
        let deps = self.deps;
        let case_type = zaak::fetch_case_type(deps.zgw.as_ref(), &last.status_type).await?;
        self.last_case_type = Some(case_type.clone());
        Ok(case_type)
    }

    /// BSN of the case's citizen initiator.
    pub async fn initiator_bsn(&mut self) -> Result<String, ProcessError> {
        let case_url = self.case_url().await?;
        let deps = self.deps;
        let roles = zaak::fetch_initiator_roles(
            deps.zgw.as_ref(),
            &deps.settings.services.openzaak,
            &case_url,
        )
        .await?;
        roles
            .citizen_bsn()
            .map(str::to_string)
            .ok_or_else(|| {
                ProcessError::Context("case has no citizen initiator with a BSN".into())
            })
    }

    pub async fn decision(&mut self) -> Result<Decision, ProcessError> {
        if let Some(decision) = &self.decision {
            return Ok(decision.clone());
        }
        if self.event.channel != EventChannel::Besluiten {
            return Err(ProcessError::Context(
                "cannot determine a decision from the available context".into(),
            ));
        }
        let deps = self.deps;
        let decision = besluit::fetch_decision(deps.zgw.as_ref(), &self.event.resource_url).await?;
        self.decision = Some(decision.clone());
        Ok(decision)
    }

    /// Decision type, from the event attributes when present (saves one
    /// round trip), otherwise derived from the decision.
    pub async fn decision_type(&mut self) -> Result<DecisionType, ProcessError> {
        if let Some(decision_type) = &self.decision_type {
            return Ok(decision_type.clone());
        }
        let url = match &self.event.attributes.decision_type {
            Some(url) => url.clone(),
            None => self.decision().await?.decision_type,
        };
        let deps = self.deps;
        let decision_type = besluit::fetch_decision_type(deps.zgw.as_ref(), &url).await?;
        self.decision_type = Some(decision_type.clone());
        Ok(decision_type)
    }

    pub async fn decision_resources(&mut self) -> Result<DecisionResources, ProcessError> {
        let decision = self.decision().await?;
        let deps = self.deps;
        besluit::fetch_decision_resources(
            deps.zgw.as_ref(),
            &deps.settings.services.besluiten,
            &decision.url,
        )
        .await
    }

    pub async fn info_object(&self, url: &Url) -> Result<InfoObject, ProcessError> {
        besluit::fetch_info_object(self.deps.zgw.as_ref(), url).await
    }

    pub async fn task(&mut self) -> Result<CommonTaskData, ProcessError> {
        if let Some(task) = &self.task {
            return Ok(task.clone());
        }
        if self.event.channel != EventChannel::Objecten {
            return Err(ProcessError::Context(
                "cannot determine a task from the available context".into(),
            ));
        }
        let deps = self.deps;
        let envelope = object::fetch_task(deps.zgw.as_ref(), &self.event.main_object).await?;
        let task = envelope.record.data;
        self.task = Some(task.clone());
        Ok(task)
    }

    pub async fn message(&mut self) -> Result<MessageData, ProcessError> {
        if let Some(message) = &self.message {
            return Ok(message.clone());
        }
        if self.event.channel != EventChannel::Objecten {
            return Err(ProcessError::Context(
                "cannot determine a message from the available context".into(),
            ));
        }
        let deps = self.deps;
        let envelope = object::fetch_message(deps.zgw.as_ref(), &self.event.main_object).await?;
        let message = envelope.record.data;
        self.message = Some(message.clone());
        Ok(message)
    }

    /// Fully resolved party data for an identification. Contact-channel
    /// resolution runs against the optional case identification so a
    /// case-specific address subscription wins over the party's global
    /// preference.
    pub async fn party(
        &mut self,
        identification: &Identification,
        case_identification: Option<&str>,
    ) -> Result<CommonPartyData, ProcessError> {
        if let Some(party) = &self.party {
            return Ok(party.clone());
        }
        let deps = self.deps;
        let base = &deps.settings.services.openklant;
        let results = klant::fetch_party_by_id(
            deps.zgw.as_ref(),
            base,
            identification.kind,
            &identification.value,
        )
        .await?;
        let party = results.results.into_iter().next().ok_or_else(|| {
            ProcessError::Context(
                "party register returned no results for the supplied identification".into(),
            )
        })?;

        let addresses = klant::digital_addresses(deps.zgw.as_ref(), base, &party).await?;
        let preferred = party.preferred_digital_address.map(|address| address.uuid);
        let resolved = contact::resolve_contact(
            &addresses,
            preferred,
            case_identification,
            &deps.settings.channels,
        )?;

        let name = party.name.unwrap_or_default();
        let data = CommonPartyData {
            first_name: name.first_name,
            surname_prefix: name.surname_prefix,
            surname: name.surname,
            distribution_channel: resolved.channel,
            email: resolved.email,
            phone: resolved.phone,
            letter_address: String::new(),
        };
        self.party = Some(data.clone());
        Ok(data)
    }
}
