//! Terminal default: guarantees an unrecognized event fails with a trace
//! instead of being silently dropped.

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::queries::QueryContext;
use crate::resolver::ScenarioKind;
use crate::scenarios::{Scenario, ScenarioData};

pub struct NotImplementedScenario;

#[async_trait]
impl Scenario for NotImplementedScenario {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::NotImplemented
    }

    async fn prepare(&self, _ctx: &mut QueryContext<'_>) -> Result<ScenarioData, ProcessError> {
        Err(ProcessError::NotImplemented)
    }
}
