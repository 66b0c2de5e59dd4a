//! Central dependency container passed to the pipeline and scenarios.

use std::sync::Arc;

use uuid::Uuid;

use notify_client::NotifyDispatcher;
use zaakmelder_common::config::{
    ChannelsConfig, FileConfig, ObjectTypesConfig, ServicesConfig, TemplateSet, TemplatesConfig,
};
use zaakmelder_common::types::NotifyMethod;
use zgw_client::ZgwExecutor;

use crate::report::CompletionReporter;
use crate::resolver::ScenarioKind;
use crate::whitelist::Whitelist;

/// Everything declarative the engine needs, derived from [`FileConfig`]
/// once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub services: ServicesConfig,
    pub channels: ChannelsConfig,
    pub object_types: ObjectTypesConfig,
    pub whitelist: Whitelist,
    pub templates: TemplatesConfig,
}

impl Settings {
    pub fn from_file_config(config: FileConfig) -> Self {
        Self {
            whitelist: Whitelist::from_config(&config.whitelist),
            services: config.services,
            channels: config.channels,
            object_types: config.object_types,
            templates: config.templates,
        }
    }

    /// Template id for one channel of one scenario. `None` only for
    /// NotImplemented, which never reaches template selection.
    pub fn template_for(&self, method: NotifyMethod, kind: ScenarioKind) -> Option<Uuid> {
        let set = match method {
            NotifyMethod::Email => &self.templates.email,
            NotifyMethod::Sms => &self.templates.sms,
            NotifyMethod::Letter => &self.templates.letter,
        };
        template_in_set(set, kind)
    }
}

fn template_in_set(set: &TemplateSet, kind: ScenarioKind) -> Option<Uuid> {
    match kind {
        ScenarioKind::CaseCreated => Some(set.case_created),
        ScenarioKind::CaseStatusUpdated => Some(set.case_status_updated),
        ScenarioKind::CaseClosed => Some(set.case_closed),
        ScenarioKind::DecisionMade => Some(set.decision_made),
        ScenarioKind::TaskAssigned => Some(set.task_assigned),
        ScenarioKind::MessageReceived => Some(set.message_received),
        ScenarioKind::NotImplemented => None,
    }
}

/// Shared, read-only dependencies for processing one or many events.
#[derive(Clone)]
pub struct EngineDeps {
    pub zgw: Arc<dyn ZgwExecutor>,
    pub dispatcher: Arc<dyn NotifyDispatcher>,
    pub reporter: Arc<dyn CompletionReporter>,
    pub settings: Arc<Settings>,
}

impl EngineDeps {
    pub fn new(
        zgw: Arc<dyn ZgwExecutor>,
        dispatcher: Arc<dyn NotifyDispatcher>,
        reporter: Arc<dyn CompletionReporter>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            zgw,
            dispatcher,
            reporter,
            settings,
        }
    }
}
