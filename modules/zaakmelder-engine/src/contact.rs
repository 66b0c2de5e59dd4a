//! Contact-channel resolution: which address should a party be reached on.

use uuid::Uuid;

use zaakmelder_common::config::ChannelsConfig;
use zaakmelder_common::types::{DigitalAddress, DistributionChannel};
use zaakmelder_common::AbortReason;

/// Outcome of contact resolution: exactly one channel with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContact {
    pub channel: DistributionChannel,
    pub email: String,
    pub phone: String,
}

impl ResolvedContact {
    fn email(value: &str) -> Self {
        Self {
            channel: DistributionChannel::Email,
            email: value.to_string(),
            phone: String::new(),
        }
    }

    fn phone(value: &str) -> Self {
        Self {
            channel: DistributionChannel::Sms,
            email: String::new(),
            phone: value.to_string(),
        }
    }
}

/// Map a free-text address label to a channel. The email label matches by
/// case-insensitive equality; the phone label by substring, because the
/// party register renamed it between versions.
fn classify(kind: &str, labels: &ChannelsConfig) -> DistributionChannel {
    if kind.eq_ignore_ascii_case(&labels.email_label) {
        DistributionChannel::Email
    } else if kind
        .to_lowercase()
        .contains(labels.phone_label.to_lowercase().as_str())
    {
        DistributionChannel::Sms
    } else {
        DistributionChannel::Unknown
    }
}

/// Pick the address a party should be notified on. Single pass over the
/// addresses, priority order:
///
/// 1. an address whose reference equals the case identification wins
///    immediately and unconditionally,
/// 2. otherwise the party's preferred address (a later case match can
///    still override it, so the scan continues),
/// 3. otherwise the first email seen, then the first phone seen.
///
/// Addresses with an empty value or an unrecognized label are unusable.
/// Zero usable addresses is an abort, never an empty success.
pub fn resolve_contact(
    addresses: &[DigitalAddress],
    preferred: Option<Uuid>,
    case_identification: Option<&str>,
    labels: &ChannelsConfig,
) -> Result<ResolvedContact, AbortReason> {
    let mut preferred_match: Option<ResolvedContact> = None;
    let mut first_email: Option<String> = None;
    let mut first_phone: Option<String> = None;

    for address in addresses {
        if address.value.is_empty() {
            continue;
        }
        let channel = classify(&address.kind, labels);
        let contact = match channel {
            DistributionChannel::Email => ResolvedContact::email(&address.value),
            DistributionChannel::Sms => ResolvedContact::phone(&address.value),
            _ => continue,
        };

        if let (Some(case_id), Some(reference)) =
            (case_identification, address.reference.as_deref())
        {
            if reference == case_id {
                return Ok(contact);
            }
        }

        if preferred_match.is_none() && preferred == Some(address.uuid) {
            preferred_match = Some(contact);
            continue;
        }

        match channel {
            DistributionChannel::Email if first_email.is_none() => {
                first_email = Some(address.value.clone());
            }
            DistributionChannel::Sms if first_phone.is_none() => {
                first_phone = Some(address.value.clone());
            }
            _ => {}
        }
    }

    if let Some(contact) = preferred_match {
        return Ok(contact);
    }
    if let Some(email) = first_email {
        return Ok(ResolvedContact::email(&email));
    }
    if let Some(phone) = first_phone {
        return Ok(ResolvedContact::phone(&phone));
    }
    Err(AbortReason::NoDigitalAddress)
}
