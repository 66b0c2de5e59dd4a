//! Object-register queries (tasks and messages).

use url::Url;

use zaakmelder_common::types::{CommonTaskData, MessageData, ObjectEnvelope};
use zgw_client::{get_typed, ServiceKind, ZgwExecutor};

use super::uri;
use crate::error::ProcessError;

pub async fn fetch_task(
    zgw: &dyn ZgwExecutor,
    url: &Url,
) -> Result<ObjectEnvelope<CommonTaskData>, ProcessError> {
    uri::expect_collection(url, "objects")?;
    Ok(get_typed(zgw, ServiceKind::Objecten, url).await?)
}

pub async fn fetch_message(
    zgw: &dyn ZgwExecutor,
    url: &Url,
) -> Result<ObjectEnvelope<MessageData>, ProcessError> {
    uri::expect_collection(url, "objects")?;
    Ok(get_typed(zgw, ServiceKind::Objecten, url).await?)
}
