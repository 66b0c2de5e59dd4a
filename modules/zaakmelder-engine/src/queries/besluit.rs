//! Decision-register queries.

use url::Url;

use zaakmelder_common::types::{Decision, DecisionResources, DecisionType, InfoObject};
use zgw_client::{get_typed, ServiceKind, ZgwExecutor};

use super::uri;
use crate::error::ProcessError;

pub async fn fetch_decision(zgw: &dyn ZgwExecutor, url: &Url) -> Result<Decision, ProcessError> {
    uri::expect_collection(url, "besluiten")?;
    Ok(get_typed(zgw, ServiceKind::Besluiten, url).await?)
}

pub async fn fetch_decision_type(
    zgw: &dyn ZgwExecutor,
    url: &Url,
) -> Result<DecisionType, ProcessError> {
    uri::expect_collection(url, "besluittypen")?;
    Ok(get_typed(zgw, ServiceKind::Besluiten, url).await?)
}

/// Links between a decision and its information objects.
pub async fn fetch_decision_resources(
    zgw: &dyn ZgwExecutor,
    base: &Url,
    decision_url: &Url,
) -> Result<DecisionResources, ProcessError> {
    uri::expect_collection(decision_url, "besluiten")?;
    let url = uri::service_url(
        base,
        "besluiten/api/v1/besluitinformatieobjecten",
        Some(&format!("besluit={decision_url}")),
    )?;
    Ok(get_typed(zgw, ServiceKind::Besluiten, &url).await?)
}

pub async fn fetch_info_object(
    zgw: &dyn ZgwExecutor,
    url: &Url,
) -> Result<InfoObject, ProcessError> {
    uri::expect_collection(url, "enkelvoudiginformatieobjecten")?;
    Ok(get_typed(zgw, ServiceKind::OpenZaak, url).await?)
}
