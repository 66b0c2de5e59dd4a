//! Scenario-scoped allow-lists of case-type identifications.
//!
//! Built once from configuration at startup and read-only afterwards.
//! Membership is exact string match, and each scenario queries only its own
//! set, so an id whitelisted for one scenario never leaks into another.

use std::collections::HashSet;

use zaakmelder_common::config::WhitelistConfig;
use zaakmelder_common::AbortReason;

use crate::resolver::ScenarioKind;

/// The allow-list for a single scenario, named for operator diagnostics.
#[derive(Debug, Clone)]
pub struct IdSet {
    name: &'static str,
    ids: HashSet<String>,
}

impl IdSet {
    fn new(name: &'static str, ids: &[String]) -> Self {
        Self {
            name,
            ids: ids.iter().cloned().collect(),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn contains(&self, identification: &str) -> bool {
        self.ids.contains(identification)
    }
}

#[derive(Debug, Clone)]
pub struct Whitelist {
    case_created: IdSet,
    case_status_updated: IdSet,
    case_closed: IdSet,
    decision_made: IdSet,
    task_assigned: IdSet,
    messages_allowed: bool,
}

impl Whitelist {
    pub fn from_config(config: &WhitelistConfig) -> Self {
        Self {
            case_created: IdSet::new("whitelist.case_created", &config.case_created),
            case_status_updated: IdSet::new(
                "whitelist.case_status_updated",
                &config.case_status_updated,
            ),
            case_closed: IdSet::new("whitelist.case_closed", &config.case_closed),
            decision_made: IdSet::new("whitelist.decision_made", &config.decision_made),
            task_assigned: IdSet::new("whitelist.task_assigned", &config.task_assigned),
            messages_allowed: config.messages_allowed,
        }
    }

    /// The id set for a scenario; `None` for scenarios gated by something
    /// other than a per-case whitelist.
    pub fn id_set(&self, kind: ScenarioKind) -> Option<&IdSet> {
        match kind {
            ScenarioKind::CaseCreated => Some(&self.case_created),
            ScenarioKind::CaseStatusUpdated => Some(&self.case_status_updated),
            ScenarioKind::CaseClosed => Some(&self.case_closed),
            ScenarioKind::DecisionMade => Some(&self.decision_made),
            ScenarioKind::TaskAssigned => Some(&self.task_assigned),
            ScenarioKind::MessageReceived | ScenarioKind::NotImplemented => None,
        }
    }

    /// Exact-match membership gate. The abort names both the offending id
    /// and the whitelist so operators know which setting to extend.
    pub fn require(&self, kind: ScenarioKind, identification: &str) -> Result<(), AbortReason> {
        match self.id_set(kind) {
            Some(set) if set.contains(identification) => Ok(()),
            Some(set) => Err(AbortReason::NotWhitelisted {
                identification: identification.to_string(),
                whitelist: set.name().to_string(),
            }),
            // Scenarios without a per-case whitelist (messages) gate on the
            // global flag instead.
            None => Ok(()),
        }
    }

    pub fn messages_allowed(&self) -> bool {
        self.messages_allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WhitelistConfig {
        WhitelistConfig {
            case_created: vec!["ZAAKTYPE-A".into()],
            case_status_updated: vec!["ZAAKTYPE-B".into()],
            case_closed: vec![],
            decision_made: vec![],
            task_assigned: vec![],
            messages_allowed: false,
        }
    }

    #[test]
    fn membership_is_scenario_scoped() {
        let whitelist = Whitelist::from_config(&config());

        assert!(whitelist
            .require(ScenarioKind::CaseCreated, "ZAAKTYPE-A")
            .is_ok());
        // The same id must not satisfy another scenario's whitelist.
        assert!(whitelist
            .require(ScenarioKind::CaseStatusUpdated, "ZAAKTYPE-A")
            .is_err());
    }

    #[test]
    fn rejection_names_the_whitelist() {
        let whitelist = Whitelist::from_config(&config());

        let err = whitelist
            .require(ScenarioKind::CaseClosed, "ZAAKTYPE-A")
            .expect_err("empty whitelist should reject");
        match err {
            AbortReason::NotWhitelisted {
                identification,
                whitelist,
            } => {
                assert_eq!(identification, "ZAAKTYPE-A");
                assert_eq!(whitelist, "whitelist.case_closed");
            }
            other => panic!("unexpected abort reason: {other:?}"),
        }
    }

    #[test]
    fn membership_is_exact_match() {
        let whitelist = Whitelist::from_config(&config());

        assert!(whitelist
            .require(ScenarioKind::CaseCreated, "zaaktype-a")
            .is_err());
        assert!(whitelist
            .require(ScenarioKind::CaseCreated, "ZAAKTYPE-A ")
            .is_err());
    }
}
