//! Domain records produced by the upstream registers, plus the normalized
//! outputs this service hands to the notification dispatcher.
//!
//! Wire names are the upstream Dutch field names; the Rust side uses the
//! English terms the rest of the codebase speaks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

// --- Case register ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub url: Url,
    pub uuid: Uuid,
    #[serde(rename = "identificatie")]
    pub identification: String,
    #[serde(rename = "omschrijving")]
    pub name: String,
    #[serde(rename = "zaaktype")]
    pub case_type: Url,
    #[serde(rename = "registratiedatum")]
    pub registration_date: NaiveDate,
}

/// The type behind a case status. Carries both gates the pipeline needs:
/// whether this status terminates the case and whether the citizen is
/// expected to be notified about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseType {
    pub url: Url,
    #[serde(rename = "omschrijving")]
    pub name: String,
    #[serde(rename = "omschrijvingGeneriek", default)]
    pub description: String,
    #[serde(rename = "zaaktypeIdentificatie", default)]
    pub identification: String,
    #[serde(rename = "volgnummer")]
    pub sequence_number: i32,
    #[serde(rename = "isEindstatus")]
    pub is_final_status: bool,
    #[serde(rename = "informeren")]
    pub is_notification_expected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStatus {
    pub url: Url,
    /// Resolves to a [`CaseType`].
    #[serde(rename = "statustype")]
    pub status_type: Url,
    #[serde(rename = "datumStatusGezet")]
    pub created: DateTime<Utc>,
}

/// The full status history of one case, as returned by the case register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStatuses {
    pub count: usize,
    pub results: Vec<CaseStatus>,
}

impl CaseStatuses {
    /// A case with a single status has only its initial status: it was
    /// created but never updated since.
    pub fn was_ever_updated(&self) -> bool {
        self.count > 1
    }

    /// The most recent status: latest `datum_status_gezet` wins, ties are
    /// broken by position in the returned collection (later element wins).
    pub fn last_status(&self) -> Option<&CaseStatus> {
        self.results
            .iter()
            .enumerate()
            .max_by_key(|(idx, status)| (status.created, *idx))
            .map(|(_, status)| status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRole {
    #[serde(rename = "betrokkene", default)]
    pub party: Option<Url>,
    #[serde(rename = "omschrijvingGeneriek", default)]
    pub role: String,
    #[serde(rename = "betrokkeneIdentificatie", default)]
    pub identification: Option<RoleIdentification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleIdentification {
    #[serde(rename = "inpBsn", default)]
    pub bsn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRoles {
    pub count: usize,
    pub results: Vec<CaseRole>,
}

impl CaseRoles {
    /// The first role with a citizen service number, if any.
    pub fn citizen_bsn(&self) -> Option<&str> {
        self.results
            .iter()
            .filter_map(|role| role.identification.as_ref())
            .find_map(|id| id.bsn.as_deref())
            .filter(|bsn| !bsn.is_empty())
    }
}

// --- Decision register ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub url: Url,
    #[serde(rename = "zaak")]
    pub case: Url,
    #[serde(rename = "besluittype")]
    pub decision_type: Url,
    #[serde(rename = "datum")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionType {
    pub url: Url,
    #[serde(rename = "omschrijving")]
    pub name: String,
    #[serde(rename = "omschrijvingGeneriek", default)]
    pub description: String,
    #[serde(rename = "publicatieIndicatie", default)]
    pub publication_required: bool,
}

/// Link between a decision and one information object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResource {
    #[serde(rename = "informatieobject")]
    pub info_object: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResources {
    pub count: usize,
    pub results: Vec<DecisionResource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoObjectStatus {
    #[serde(rename = "in_bewerking")]
    InProgress,
    #[serde(rename = "ter_vaststelling")]
    PendingApproval,
    #[serde(rename = "definitief")]
    Definitive,
    #[serde(rename = "gearchiveerd")]
    Archived,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidentiality {
    #[serde(rename = "openbaar")]
    Public,
    #[serde(rename = "beperkt_openbaar")]
    RestrictedPublic,
    #[serde(rename = "intern")]
    Internal,
    #[serde(rename = "vertrouwelijk")]
    Confidential,
    #[serde(rename = "geheim")]
    Secret,
    #[serde(other)]
    Unknown,
}

impl Confidentiality {
    pub fn is_public(self) -> bool {
        matches!(self, Confidentiality::Public)
    }
}

impl std::fmt::Display for Confidentiality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidentiality::Public => write!(f, "openbaar"),
            Confidentiality::RestrictedPublic => write!(f, "beperkt_openbaar"),
            Confidentiality::Internal => write!(f, "intern"),
            Confidentiality::Confidential => write!(f, "vertrouwelijk"),
            Confidentiality::Secret => write!(f, "geheim"),
            Confidentiality::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoObject {
    pub url: Url,
    #[serde(rename = "titel")]
    pub title: String,
    #[serde(rename = "informatieobjecttype")]
    pub type_url: Url,
    pub status: InfoObjectStatus,
    #[serde(rename = "vertrouwelijkheidaanduiding")]
    pub confidentiality: Confidentiality,
}

// --- Party register ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyName {
    #[serde(rename = "voornaam", default)]
    pub first_name: String,
    #[serde(rename = "voorvoegselAchternaam", default)]
    pub surname_prefix: String,
    #[serde(rename = "achternaam", default)]
    pub surname: String,
}

/// Short form: a reference to a digital address by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalAddressRef {
    pub uuid: Uuid,
}

/// Long form: one contact channel entry belonging to a party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalAddress {
    pub uuid: Uuid,
    /// Free-text channel label as maintained in the party register.
    #[serde(rename = "soortDigitaalAdres")]
    pub kind: String,
    #[serde(rename = "adres")]
    pub value: String,
    /// Optional case-reference tag linking this address to one case.
    #[serde(rename = "omschrijving", default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyExpand {
    #[serde(rename = "digitaleAdressen", default)]
    pub digital_addresses: Vec<DigitalAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyResult {
    pub uuid: Uuid,
    #[serde(rename = "contactnaam", default)]
    pub name: Option<PartyName>,
    #[serde(rename = "voorkeursDigitaalAdres", default)]
    pub preferred_digital_address: Option<DigitalAddressRef>,
    #[serde(rename = "digitaleAdressen", default)]
    pub digital_addresses: Vec<DigitalAddressRef>,
    #[serde(rename = "_expand", default)]
    pub expand: Option<PartyExpand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyResults {
    pub count: usize,
    pub results: Vec<PartyResult>,
}

/// Which channel was determined for a party. `Unknown` unless exactly one
/// channel came out of contact resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionChannel {
    Email,
    Sms,
    Letter,
    Unknown,
}

/// Normalized party output: name parts plus the single resolved channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonPartyData {
    pub first_name: String,
    pub surname_prefix: String,
    pub surname: String,
    pub distribution_channel: DistributionChannel,
    pub email: String,
    pub phone: String,
    pub letter_address: String,
}

impl CommonPartyData {
    pub fn full_name(&self) -> String {
        let mut name = self.first_name.clone();
        for part in [&self.surname_prefix, &self.surname] {
            if !part.is_empty() {
                if !name.is_empty() {
                    name.push(' ');
                }
                name.push_str(part);
            }
        }
        name
    }

    pub fn has_email(&self) -> bool {
        self.distribution_channel == DistributionChannel::Email && !self.email.is_empty()
    }

    pub fn has_phone(&self) -> bool {
        self.distribution_channel == DistributionChannel::Sms && !self.phone.is_empty()
    }

    pub fn has_letter_address(&self) -> bool {
        self.distribution_channel == DistributionChannel::Letter && !self.letter_address.is_empty()
    }
}

// --- Object register (tasks, messages) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "gesloten")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    /// Citizen service number: the assignee is a person.
    Bsn,
    /// Chamber-of-commerce number: the assignee is an organization.
    Kvk,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for IdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdType::Bsn => write!(f, "bsn"),
            IdType::Kvk => write!(f, "kvk"),
            IdType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: IdType,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonTaskData {
    #[serde(rename = "titel")]
    pub title: String,
    pub status: TaskStatus,
    #[serde(rename = "identificatie")]
    pub identification: Identification,
    #[serde(rename = "verloopdatum", default)]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(rename = "zaak")]
    pub case: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(rename = "onderwerp")]
    pub subject: String,
    #[serde(rename = "berichttekst", default)]
    pub body: String,
    #[serde(rename = "identificatie")]
    pub identification: Identification,
}

/// Generic wrapper the object register puts around task/message payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEnvelope<T> {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub object_type: Url,
    pub record: ObjectRecord<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord<T> {
    pub data: T,
}

// --- Dispatch output ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyMethod {
    Email,
    Sms,
    Letter,
}

impl std::fmt::Display for NotifyMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyMethod::Email => write!(f, "email"),
            NotifyMethod::Sms => write!(f, "sms"),
            NotifyMethod::Letter => write!(f, "letter"),
        }
    }
}

/// One unit of dispatchable work per channel. Produced by a scenario,
/// consumed by the notification dispatcher. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyData {
    pub method: NotifyMethod,
    pub contact_details: String,
    pub template_id: Uuid,
    pub personalization: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn status(url: &str, created: DateTime<Utc>) -> CaseStatus {
        CaseStatus {
            url: Url::parse(url).expect("invalid test URL"),
            status_type: Url::parse("https://openzaak.example.com/catalogi/api/v1/statustypen/6f25b4b5-6b3f-4b8a-9d1f-6c9d0a3c2e10")
                .expect("invalid test URL"),
            created,
        }
    }

    #[test]
    fn last_status_picks_latest_creation_time() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let statuses = CaseStatuses {
            count: 2,
            results: vec![
                status("https://openzaak.example.com/zaken/api/v1/statussen/1", late),
                status("https://openzaak.example.com/zaken/api/v1/statussen/2", early),
            ],
        };

        let last = statuses.last_status().expect("empty status list");
        assert!(last.url.as_str().ends_with("/1"));
    }

    // Domain owners have not pinned the tie-break for identical timestamps;
    // the implemented rule is "later element in the collection wins".
    #[test]
    fn last_status_tie_breaks_by_position() {
        let moment = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let statuses = CaseStatuses {
            count: 2,
            results: vec![
                status("https://openzaak.example.com/zaken/api/v1/statussen/1", moment),
                status("https://openzaak.example.com/zaken/api/v1/statussen/2", moment),
            ],
        };

        let last = statuses.last_status().expect("empty status list");
        assert!(last.url.as_str().ends_with("/2"));
    }

    #[test]
    fn full_name_skips_empty_parts() {
        let party = CommonPartyData {
            first_name: "Alice".into(),
            surname_prefix: String::new(),
            surname: "Jansen".into(),
            distribution_channel: DistributionChannel::Email,
            email: "alice@example.com".into(),
            phone: String::new(),
            letter_address: String::new(),
        };
        assert_eq!(party.full_name(), "Alice Jansen");
    }
}
