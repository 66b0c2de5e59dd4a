//! Test mocks for the notification pipeline.
//!
//! Three mocks matching the three trait boundaries:
//! - `MockZgw` (ZgwExecutor): HashMap-based URL to JSON body, with call
//!   recording for invocation-count assertions
//! - `MockDispatcher` (NotifyDispatcher): records every `NotifyData`,
//!   fabricates receipts
//! - `MockReporter` (CompletionReporter): records completion records
//!
//! Plus fixture builders for events, register payloads and settings.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use notify_client::{DeliveryReceipt, NotifyDispatcher, NotifyError};
use zaakmelder_common::config::{
    ChannelsConfig, FileConfig, ObjectTypesConfig, ServicesConfig, TemplateSet, TemplatesConfig,
    WhitelistConfig,
};
use zaakmelder_common::events::{
    EventAction, EventAttributes, EventChannel, EventResource, NotificationEvent,
};
use zaakmelder_common::types::NotifyData;
use zgw_client::{ServiceKind, ZgwError, ZgwExecutor};

use crate::deps::{EngineDeps, Settings};
use crate::report::{CompletionRecord, CompletionReporter};

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

pub const TASK_OBJECT_TYPE: &str = "0e84a293-cbb8-42e0-8ea1-e9bb05f4f969";
pub const MESSAGE_OBJECT_TYPE: &str = "9c5a9f3b-bde8-4a1f-95bd-6f92c3a7b8d2";
pub const INFO_OBJECT_TYPE: &str = "a1aa77bd-5c47-4a4f-a1d1-3b7bbd25cbd7";

pub const CASE_URL: &str =
    "https://openzaak.example.com/zaken/api/v1/zaken/91e49bc4-9024-4c1f-9a29-e5d7bd6d2a5a";
pub const STATUS_URL: &str =
    "https://openzaak.example.com/zaken/api/v1/statussen/3c0cf9a6-3a4a-4c6b-8f3f-5a1e91c4f3e0";
pub const STATUSTYPE_URL: &str =
    "https://openzaak.example.com/catalogi/api/v1/statustypen/6f25b4b5-6b3f-4b8a-9d1f-6c9d0a3c2e10";
pub const OBJECT_URL: &str =
    "https://objecten.example.com/api/v2/objects/2f49bd10-18ad-49af-9fbf-6a5e2c1b9a31";
pub const DECISION_URL: &str =
    "https://besluiten.example.com/besluiten/api/v1/besluiten/8d0fbb19-13f7-4f8a-b391-2c5f1d4e6a22";
pub const DECISION_TYPE_URL: &str =
    "https://besluiten.example.com/catalogi/api/v1/besluittypen/5b7a9c83-4f26-4e0e-9d57-8e3f2a1c0b44";
pub const INFO_OBJECT_URL: &str =
    "https://openzaak.example.com/documenten/api/v1/enkelvoudiginformatieobjecten/7d2e4f61-0c3b-4e8a-a1f9-3b6c5d8e9f00";

pub const TEST_BSN: &str = "999991802";
pub const CASE_TYPE_ID: &str = "ZAAKTYPE-2024-001";

// ---------------------------------------------------------------------------
// MockZgw
// ---------------------------------------------------------------------------

/// HashMap-based executor. GET returns the registered body for the exact
/// URL (query string included); unregistered URLs fail with a 404-shaped
/// API error. Every call is recorded.
#[derive(Default)]
pub struct MockZgw {
    responses: HashMap<String, Value>,
    pub calls: Mutex<Vec<String>>,
}

impl MockZgw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a GET response. Builder pattern.
    pub fn on(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }

    /// How many recorded calls contain the given needle.
    pub fn call_count(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .iter()
            .filter(|call| call.contains(needle))
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl ZgwExecutor for MockZgw {
    async fn get_json(&self, _kind: ServiceKind, url: &Url) -> Result<Value, ZgwError> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(url.to_string());
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ZgwError::Api {
                status: 404,
                url: url.to_string(),
                body: "not registered in mock".into(),
            })
    }

    async fn post_json(
        &self,
        _kind: ServiceKind,
        url: &Url,
        _body: Value,
    ) -> Result<Value, ZgwError> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(format!("POST {url}"));
        Ok(json!({}))
    }

    async fn patch_json(
        &self,
        _kind: ServiceKind,
        url: &Url,
        _body: Value,
    ) -> Result<Value, ZgwError> {
        self.calls
            .lock()
            .expect("mock lock poisoned")
            .push(format!("PATCH {url}"));
        Ok(json!({}))
    }
}

// ---------------------------------------------------------------------------
// MockDispatcher / MockReporter
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockDispatcher {
    pub sent: Mutex<Vec<NotifyData>>,
    fail: bool,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that rejects every send.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl NotifyDispatcher for MockDispatcher {
    async fn send(&self, data: &NotifyData) -> Result<DeliveryReceipt, NotifyError> {
        if self.fail {
            return Err(NotifyError::Gateway {
                status: 500,
                body: "mock gateway down".into(),
            });
        }
        self.sent
            .lock()
            .expect("mock lock poisoned")
            .push(data.clone());
        Ok(DeliveryReceipt {
            id: Uuid::new_v4(),
            method: data.method,
            recipient: data.contact_details.clone(),
        })
    }
}

#[derive(Default)]
pub struct MockReporter {
    pub records: Mutex<Vec<CompletionRecord>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl CompletionReporter for MockReporter {
    async fn report(&self, record: &CompletionRecord) -> Result<(), ZgwError> {
        self.records
            .lock()
            .expect("mock lock poisoned")
            .push(record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Settings and harness
// ---------------------------------------------------------------------------

fn template_set(seed: u128) -> TemplateSet {
    TemplateSet {
        case_created: Uuid::from_u128(seed),
        case_status_updated: Uuid::from_u128(seed + 1),
        case_closed: Uuid::from_u128(seed + 2),
        decision_made: Uuid::from_u128(seed + 3),
        task_assigned: Uuid::from_u128(seed + 4),
        message_received: Uuid::from_u128(seed + 5),
    }
}

pub fn test_whitelist() -> WhitelistConfig {
    WhitelistConfig {
        case_created: vec![CASE_TYPE_ID.into()],
        case_status_updated: vec![CASE_TYPE_ID.into()],
        case_closed: vec![CASE_TYPE_ID.into()],
        decision_made: vec![CASE_TYPE_ID.into()],
        task_assigned: vec![CASE_TYPE_ID.into()],
        messages_allowed: true,
    }
}

pub fn test_settings_with(whitelist: WhitelistConfig) -> Settings {
    let config = FileConfig {
        services: ServicesConfig {
            openzaak: Url::parse("https://openzaak.example.com").expect("invalid test URL"),
            openklant: Url::parse("https://openklant.example.com").expect("invalid test URL"),
            objecten: Url::parse("https://objecten.example.com").expect("invalid test URL"),
            besluiten: Url::parse("https://besluiten.example.com").expect("invalid test URL"),
            notify: Url::parse("https://notify.example.com").expect("invalid test URL"),
        },
        channels: ChannelsConfig {
            email_label: "email".into(),
            phone_label: "telefoon".into(),
        },
        object_types: ObjectTypesConfig {
            task: Uuid::parse_str(TASK_OBJECT_TYPE).expect("invalid test UUID"),
            message: Uuid::parse_str(MESSAGE_OBJECT_TYPE).expect("invalid test UUID"),
            decision_info_objects: vec![Uuid::parse_str(INFO_OBJECT_TYPE).expect("invalid test UUID")],
        },
        whitelist,
        templates: TemplatesConfig {
            email: template_set(0xE000),
            sms: template_set(0x5000),
            letter: template_set(0x1000),
        },
    };
    Settings::from_file_config(config)
}

pub fn test_settings() -> Settings {
    test_settings_with(test_whitelist())
}

/// Mocks plus the deps container wired over them.
pub struct TestHarness {
    pub zgw: Arc<MockZgw>,
    pub dispatcher: Arc<MockDispatcher>,
    pub reporter: Arc<MockReporter>,
    pub deps: EngineDeps,
}

pub fn harness(zgw: MockZgw) -> TestHarness {
    harness_with(zgw, test_settings())
}

pub fn harness_with(zgw: MockZgw, settings: Settings) -> TestHarness {
    let zgw = Arc::new(zgw);
    let dispatcher = Arc::new(MockDispatcher::new());
    let reporter = Arc::new(MockReporter::new());
    let deps = EngineDeps::new(
        zgw.clone(),
        dispatcher.clone(),
        reporter.clone(),
        Arc::new(settings),
    );
    TestHarness {
        zgw,
        dispatcher,
        reporter,
        deps,
    }
}

// ---------------------------------------------------------------------------
// Event builders
// ---------------------------------------------------------------------------

pub fn event_with(
    action: EventAction,
    channel: EventChannel,
    resource: EventResource,
) -> NotificationEvent {
    NotificationEvent {
        action,
        channel,
        resource,
        attributes: EventAttributes::default(),
        main_object: Url::parse(CASE_URL).expect("invalid test URL"),
        resource_url: Url::parse(STATUS_URL).expect("invalid test URL"),
        created: Utc.with_ymd_and_hms(2024, 4, 12, 9, 30, 0).unwrap(),
        orphans: BTreeMap::new(),
    }
}

pub fn case_status_event() -> NotificationEvent {
    event_with(EventAction::Create, EventChannel::Zaken, EventResource::Status)
}

pub fn object_event(object_type_uuid: &str) -> NotificationEvent {
    let mut event = event_with(
        EventAction::Create,
        EventChannel::Objecten,
        EventResource::Object,
    );
    event.main_object = Url::parse(OBJECT_URL).expect("invalid test URL");
    event.resource_url = Url::parse(OBJECT_URL).expect("invalid test URL");
    event.attributes.object_type = Some(
        Url::parse(&format!(
            "https://objecttypen.example.com/api/v2/objecttypes/{object_type_uuid}"
        ))
        .expect("invalid test URL"),
    );
    event
}

pub fn decision_event() -> NotificationEvent {
    let mut event = event_with(
        EventAction::Create,
        EventChannel::Besluiten,
        EventResource::Besluit,
    );
    event.main_object = Url::parse(DECISION_URL).expect("invalid test URL");
    event.resource_url = Url::parse(DECISION_URL).expect("invalid test URL");
    event
}

// ---------------------------------------------------------------------------
// Register payloads and their URLs
// ---------------------------------------------------------------------------

pub fn statuses_url() -> String {
    format!("https://openzaak.example.com/zaken/api/v1/statussen?zaak={CASE_URL}")
}

pub fn roles_url() -> String {
    format!(
        "https://openzaak.example.com/zaken/api/v1/rollen?zaak={CASE_URL}&omschrijvingGeneriek=initiator"
    )
}

pub fn party_url(party_kind: &str, id_value: &str) -> String {
    format!(
        "https://openklant.example.com/klantinteracties/api/v1/partijen?soortPartij={party_kind}&partijIdentificator__objectId={id_value}&expand=digitaleAdressen"
    )
}

pub fn decision_resources_url() -> String {
    format!(
        "https://besluiten.example.com/besluiten/api/v1/besluitinformatieobjecten?besluit={DECISION_URL}"
    )
}

pub fn case_json() -> Value {
    json!({
        "url": CASE_URL,
        "uuid": "91e49bc4-9024-4c1f-9a29-e5d7bd6d2a5a",
        "identificatie": "ZAAK-1",
        "omschrijving": "Test case",
        "zaaktype": "https://openzaak.example.com/catalogi/api/v1/zaaktypen/0b8e95b3-3d5e-4db8-b515-06a7dd739925",
        "registratiedatum": "2024-04-10"
    })
}

/// Status history with `count` entries; the entry with the latest
/// `datumStatusGezet` points at [`STATUSTYPE_URL`].
pub fn statuses_json(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|idx| {
            json!({
                "url": format!("https://openzaak.example.com/zaken/api/v1/statussen/00000000-0000-0000-0000-00000000000{idx}"),
                "statustype": STATUSTYPE_URL,
                "datumStatusGezet": format!("2024-04-1{idx}T09:30:00Z")
            })
        })
        .collect();
    json!({ "count": count, "results": results })
}

pub fn case_type_json(is_final: bool, is_notification_expected: bool) -> Value {
    json!({
        "url": STATUSTYPE_URL,
        "omschrijving": "In behandeling",
        "omschrijvingGeneriek": "In behandeling genomen",
        "zaaktypeIdentificatie": CASE_TYPE_ID,
        "volgnummer": 2,
        "isEindstatus": is_final,
        "informeren": is_notification_expected
    })
}

pub fn roles_json(bsn: &str) -> Value {
    json!({
        "count": 1,
        "results": [{
            "betrokkene": null,
            "omschrijvingGeneriek": "initiator",
            "betrokkeneIdentificatie": { "inpBsn": bsn }
        }]
    })
}

/// Party with expanded digital addresses.
pub fn party_json(addresses: Value, preferred: Option<&str>) -> Value {
    json!({
        "count": 1,
        "results": [{
            "uuid": "c9f4ab1e-97c6-4b3a-8f0e-2d1a5b6c7d8e",
            "contactnaam": {
                "voornaam": "Alice",
                "voorvoegselAchternaam": "",
                "achternaam": "Jansen"
            },
            "voorkeursDigitaalAdres": preferred.map(|uuid| json!({ "uuid": uuid })),
            "digitaleAdressen": [],
            "_expand": { "digitaleAdressen": addresses }
        }]
    })
}

pub fn email_address_json(uuid: &str, value: &str, reference: Option<&str>) -> Value {
    json!({
        "uuid": uuid,
        "soortDigitaalAdres": "email",
        "adres": value,
        "omschrijving": reference
    })
}

pub fn phone_address_json(uuid: &str, value: &str, reference: Option<&str>) -> Value {
    json!({
        "uuid": uuid,
        "soortDigitaalAdres": "telefoonnummer",
        "adres": value,
        "omschrijving": reference
    })
}

pub fn task_object_json(status: &str, id_type: &str, id_value: &str, expiration: Option<&str>) -> Value {
    json!({
        "uuid": "2f49bd10-18ad-49af-9fbf-6a5e2c1b9a31",
        "type": format!("https://objecttypen.example.com/api/v2/objecttypes/{TASK_OBJECT_TYPE}"),
        "record": {
            "data": {
                "titel": "Aanvullende documenten aanleveren",
                "status": status,
                "identificatie": { "type": id_type, "value": id_value },
                "verloopdatum": expiration,
                "zaak": CASE_URL
            }
        }
    })
}

pub fn message_object_json(id_type: &str, id_value: &str) -> Value {
    json!({
        "uuid": "2f49bd10-18ad-49af-9fbf-6a5e2c1b9a31",
        "type": format!("https://objecttypen.example.com/api/v2/objecttypes/{MESSAGE_OBJECT_TYPE}"),
        "record": {
            "data": {
                "onderwerp": "Nieuw bericht over uw aanvraag",
                "berichttekst": "Er staat een nieuw bericht voor u klaar.",
                "identificatie": { "type": id_type, "value": id_value }
            }
        }
    })
}

pub fn decision_json() -> Value {
    json!({
        "url": DECISION_URL,
        "zaak": CASE_URL,
        "besluittype": DECISION_TYPE_URL,
        "datum": "2024-04-11"
    })
}

pub fn decision_type_json() -> Value {
    json!({
        "url": DECISION_TYPE_URL,
        "omschrijving": "Vergunning verleend",
        "omschrijvingGeneriek": "Toekenning",
        "publicatieIndicatie": true
    })
}

pub fn decision_resources_json() -> Value {
    json!({
        "count": 1,
        "results": [{ "informatieobject": INFO_OBJECT_URL }]
    })
}

pub fn info_object_json(status: &str, confidentiality: &str, type_uuid: &str) -> Value {
    json!({
        "url": INFO_OBJECT_URL,
        "titel": "Besluitbrief",
        "informatieobjecttype": format!("https://openzaak.example.com/catalogi/api/v1/informatieobjecttypen/{type_uuid}"),
        "status": status,
        "vertrouwelijkheidaanduiding": confidentiality
    })
}

/// A mock pre-loaded with the full happy path for a case-status event:
/// statuses, status type, case, initiator role and a party with one email
/// address.
pub fn case_flow_mock(status_count: usize, is_final: bool) -> MockZgw {
    MockZgw::new()
        .on(&statuses_url(), statuses_json(status_count))
        .on(STATUSTYPE_URL, case_type_json(is_final, true))
        .on(CASE_URL, case_json())
        .on(&roles_url(), roles_json(TEST_BSN))
        .on(
            &party_url("persoon", TEST_BSN),
            party_json(
                json!([email_address_json(
                    "11111111-1111-1111-1111-111111111111",
                    "alice@example.com",
                    None
                )]),
                None,
            ),
        )
}
