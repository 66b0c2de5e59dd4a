//! Party-register queries.

use url::Url;
use uuid::Uuid;

use zaakmelder_common::types::{DigitalAddress, IdType, PartyResult, PartyResults};
use zgw_client::{get_typed, ServiceKind, ZgwExecutor};

use super::uri;
use crate::error::ProcessError;

/// Look a party up by its external identification (BSN for persons, KVK
/// number for organizations), expanded digital addresses included when the
/// register supports it.
pub async fn fetch_party_by_id(
    zgw: &dyn ZgwExecutor,
    base: &Url,
    kind: IdType,
    value: &str,
) -> Result<PartyResults, ProcessError> {
    let party_kind = match kind {
        IdType::Bsn => "persoon",
        IdType::Kvk => "organisatie",
        IdType::Unknown => {
            return Err(ProcessError::Context(
                "cannot query the party register with an unknown identification type".into(),
            ))
        }
    };
    let query = format!(
        "soortPartij={party_kind}&partijIdentificator__objectId={value}&expand=digitaleAdressen"
    );
    let url = uri::service_url(base, "klantinteracties/api/v1/partijen", Some(&query))?;
    Ok(get_typed(zgw, ServiceKind::OpenKlant, &url).await?)
}

/// Long form of a digital address the party result only referenced.
pub async fn fetch_digital_address(
    zgw: &dyn ZgwExecutor,
    base: &Url,
    uuid: Uuid,
) -> Result<DigitalAddress, ProcessError> {
    let url = uri::service_url(
        base,
        &format!("klantinteracties/api/v1/digitaleadressen/{uuid}"),
        None,
    )?;
    Ok(get_typed(zgw, ServiceKind::OpenKlant, &url).await?)
}

/// All addresses of a party: the expanded set when present, otherwise each
/// short reference fetched individually.
pub async fn digital_addresses(
    zgw: &dyn ZgwExecutor,
    base: &Url,
    party: &PartyResult,
) -> Result<Vec<DigitalAddress>, ProcessError> {
    if let Some(expand) = &party.expand {
        if !expand.digital_addresses.is_empty() {
            return Ok(expand.digital_addresses.clone());
        }
    }

    let mut addresses = Vec::with_capacity(party.digital_addresses.len());
    for address_ref in &party.digital_addresses {
        addresses.push(fetch_digital_address(zgw, base, address_ref.uuid).await?);
    }
    Ok(addresses)
}
