//! Case-register queries.

use url::Url;

use zaakmelder_common::types::{Case, CaseRoles, CaseStatuses, CaseType};
use zgw_client::{get_typed, ServiceKind, ZgwExecutor};

use super::uri;
use crate::error::ProcessError;

pub async fn fetch_case(zgw: &dyn ZgwExecutor, url: &Url) -> Result<Case, ProcessError> {
    uri::expect_collection(url, "zaken")?;
    Ok(get_typed(zgw, ServiceKind::OpenZaak, url).await?)
}

/// Full status history of one case, newest last or not: the register does
/// not guarantee ordering, callers use [`CaseStatuses::last_status`].
pub async fn fetch_case_statuses(
    zgw: &dyn ZgwExecutor,
    base: &Url,
    case_url: &Url,
) -> Result<CaseStatuses, ProcessError> {
    uri::expect_collection(case_url, "zaken")?;
    let url = uri::service_url(
        base,
        "zaken/api/v1/statussen",
        Some(&format!("zaak={case_url}")),
    )?;
    Ok(get_typed(zgw, ServiceKind::OpenZaak, &url).await?)
}

pub async fn fetch_case_type(
    zgw: &dyn ZgwExecutor,
    status_type_url: &Url,
) -> Result<CaseType, ProcessError> {
    uri::expect_collection(status_type_url, "statustypen")?;
    Ok(get_typed(zgw, ServiceKind::OpenZaak, status_type_url).await?)
}

/// Roles that identify the case's citizen/organization initiator.
pub async fn fetch_initiator_roles(
    zgw: &dyn ZgwExecutor,
    base: &Url,
    case_url: &Url,
) -> Result<CaseRoles, ProcessError> {
    uri::expect_collection(case_url, "zaken")?;
    let url = uri::service_url(
        base,
        "zaken/api/v1/rollen",
        Some(&format!("zaak={case_url}&omschrijvingGeneriek=initiator")),
    )?;
    Ok(get_typed(zgw, ServiceKind::OpenZaak, &url).await?)
}
