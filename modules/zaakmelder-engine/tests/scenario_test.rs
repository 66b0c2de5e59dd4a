//! Scenario strategies: gates, gate ordering and personalization.

use serde_json::{json, Value};

use zaakmelder_common::config::WhitelistConfig;
use zaakmelder_common::types::{DistributionChannel, NotifyMethod};
use zaakmelder_common::AbortReason;
use zaakmelder_engine::queries::QueryContext;
use zaakmelder_engine::resolver::determine_scenario;
use zaakmelder_engine::scenarios::{build_notify_data, scenario_for};
use zaakmelder_engine::testing::*;
use zaakmelder_engine::{ProcessError, ScenarioKind};

fn expect_abort(err: ProcessError) -> AbortReason {
    match err {
        ProcessError::Abort(reason) => reason,
        other => panic!("expected an abort, got {other:?}"),
    }
}

fn decision_flow_mock(info_object: Value) -> MockZgw {
    case_flow_mock(1, false)
        .on(DECISION_URL, decision_json())
        .on(DECISION_TYPE_URL, decision_type_json())
        .on(&decision_resources_url(), decision_resources_json())
        .on(INFO_OBJECT_URL, info_object)
}

// ---------------------------------------------------------------------------
// Case scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn case_created_round_trip() {
    let h = harness(case_flow_mock(1, false));
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    assert_eq!(kind, ScenarioKind::CaseCreated);

    let data = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect("prepare failed");
    assert_eq!(data.reference, "ZAAK-1");
    assert_eq!(data.party.distribution_channel, DistributionChannel::Email);

    let notifications =
        build_notify_data(&data, kind, &h.deps.settings).expect("fan-out failed");
    assert_eq!(notifications.len(), 1);

    let notification = &notifications[0];
    assert_eq!(notification.method, NotifyMethod::Email);
    assert_eq!(notification.contact_details, "alice@example.com");
    assert_eq!(
        notification.template_id,
        h.deps
            .settings
            .template_for(NotifyMethod::Email, kind)
            .expect("template configured")
    );
    assert_eq!(
        notification.personalization.get("zaak.identificatie"),
        Some(&json!("ZAAK-1"))
    );
    assert_eq!(
        notification.personalization.get("zaak.omschrijving"),
        Some(&json!("Test case"))
    );
    assert_eq!(
        notification.personalization.get("klant.voornaam"),
        Some(&json!("Alice"))
    );
}

#[tokio::test]
async fn status_updated_includes_status_description() {
    let h = harness(case_flow_mock(2, false));
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    assert_eq!(kind, ScenarioKind::CaseStatusUpdated);

    let data = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect("prepare failed");
    assert_eq!(
        data.personalization.get("status.omschrijving"),
        Some(&json!("In behandeling"))
    );
}

#[tokio::test]
async fn whitelist_is_scenario_scoped() {
    // The case type is whitelisted for case_created only; a status update
    // on the same type must be rejected by its own whitelist.
    let settings = test_settings_with(WhitelistConfig {
        case_created: vec![CASE_TYPE_ID.into()],
        case_status_updated: vec![],
        case_closed: vec![],
        decision_made: vec![],
        task_assigned: vec![],
        messages_allowed: true,
    });
    let h = harness_with(case_flow_mock(2, false), settings);
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("off-whitelist id must abort");

    match expect_abort(err) {
        AbortReason::NotWhitelisted {
            identification,
            whitelist,
        } => {
            assert_eq!(identification, CASE_TYPE_ID);
            assert_eq!(whitelist, "whitelist.case_status_updated");
        }
        other => panic!("unexpected abort reason: {other:?}"),
    }
}

#[tokio::test]
async fn notify_not_expected_aborts() {
    let h = harness(
        case_flow_mock(1, false).on(STATUSTYPE_URL, case_type_json(false, false)),
    );
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("informeren=false must abort");

    assert!(matches!(
        expect_abort(err),
        AbortReason::NotificationNotExpected { .. }
    ));
}

// ---------------------------------------------------------------------------
// Decision scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decision_happy_path_builds_decision_personalization() {
    let h = harness(decision_flow_mock(info_object_json(
        "definitief",
        "openbaar",
        INFO_OBJECT_TYPE,
    )));
    let event = decision_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    assert_eq!(kind, ScenarioKind::DecisionMade);

    let data = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect("prepare failed");
    assert_eq!(
        data.personalization.get("besluit.omschrijving"),
        Some(&json!("Vergunning verleend"))
    );
    assert_eq!(
        data.personalization.get("besluit.datum"),
        Some(&json!("11-04-2024"))
    );
}

#[tokio::test]
async fn unregistered_info_object_type_aborts_before_whitelist() {
    // The decision whitelist is empty, so a whitelist rejection is also on
    // the table; the info-object gate must win.
    let settings = test_settings_with(WhitelistConfig {
        case_created: vec![],
        case_status_updated: vec![],
        case_closed: vec![],
        decision_made: vec![],
        task_assigned: vec![],
        messages_allowed: true,
    });
    let stray = "deadbeef-0000-4000-8000-000000000001";
    let h = harness_with(
        decision_flow_mock(info_object_json("definitief", "openbaar", stray)),
        settings,
    );
    let event = decision_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("wrong info-object type must abort");

    assert!(matches!(
        expect_abort(err),
        AbortReason::UnsupportedInfoObjectType { .. }
    ));
}

#[tokio::test]
async fn non_definitive_decision_aborts() {
    let h = harness(decision_flow_mock(info_object_json(
        "in_bewerking",
        "openbaar",
        INFO_OBJECT_TYPE,
    )));
    let event = decision_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("concept decision must abort");

    assert!(matches!(
        expect_abort(err),
        AbortReason::DecisionNotDefinitive { .. }
    ));
}

#[tokio::test]
async fn confidential_info_object_aborts() {
    let h = harness(decision_flow_mock(info_object_json(
        "definitief",
        "vertrouwelijk",
        INFO_OBJECT_TYPE,
    )));
    let event = decision_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("confidential notice must abort");

    assert!(matches!(
        expect_abort(err),
        AbortReason::ConfidentialInfoObject { .. }
    ));
}

// ---------------------------------------------------------------------------
// Task scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn closed_task_aborts_before_any_whitelist_lookup() {
    let h = harness(
        MockZgw::new().on(OBJECT_URL, task_object_json("gesloten", "bsn", TEST_BSN, None)),
    );
    let event = object_event(TASK_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("closed task must abort");

    assert_eq!(expect_abort(err), AbortReason::TaskClosed);
    // Only the task object itself was fetched; the whitelist id lookup
    // (status history + status type) never ran.
    assert_eq!(h.zgw.call_count("statussen"), 0);
    assert_eq!(h.zgw.total_calls(), 1);
}

#[tokio::test]
async fn unknown_assignee_type_aborts() {
    let h = harness(
        MockZgw::new().on(
            OBJECT_URL,
            task_object_json("open", "vestiging", "000012345678", None),
        ),
    );
    let event = object_event(TASK_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("unknown assignee type must abort");

    assert!(matches!(
        expect_abort(err),
        AbortReason::UnsupportedAssignee { .. }
    ));
}

#[tokio::test]
async fn open_task_formats_expiration_for_the_citizen() {
    let h = harness(
        case_flow_mock(1, false).on(
            OBJECT_URL,
            task_object_json("open", "bsn", TEST_BSN, Some("2024-07-01T00:00:00Z")),
        ),
    );
    let event = object_event(TASK_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let data = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect("prepare failed");

    assert_eq!(
        data.personalization.get("taak.verloopdatum"),
        Some(&json!("01-07-2024"))
    );
    assert_eq!(
        data.personalization.get("taak.titel"),
        Some(&json!("Aanvullende documenten aanleveren"))
    );
}

#[tokio::test]
async fn organization_task_queries_the_party_register_as_organisatie() {
    let kvk = "68750110";
    let h = harness(
        case_flow_mock(1, false)
            .on(OBJECT_URL, task_object_json("open", "kvk", kvk, None))
            .on(
                &party_url("organisatie", kvk),
                party_json(
                    json!([email_address_json(
                        "22222222-2222-2222-2222-222222222222",
                        "info@bedrijf.example.com",
                        None
                    )]),
                    None,
                ),
            ),
    );
    let event = object_event(TASK_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let data = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect("prepare failed");

    assert_eq!(data.party.email, "info@bedrijf.example.com");
    assert_eq!(h.zgw.call_count("soortPartij=organisatie"), 1);
}

// ---------------------------------------------------------------------------
// Message scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn message_flow_uses_the_payload_bsn() {
    let h = harness(
        MockZgw::new()
            .on(OBJECT_URL, message_object_json("bsn", TEST_BSN))
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
            ),
    );
    let event = object_event(MESSAGE_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    assert_eq!(kind, ScenarioKind::MessageReceived);

    let data = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect("prepare failed");
    assert_eq!(data.reference, "Nieuw bericht over uw aanvraag");
    assert_eq!(
        data.personalization.get("bericht.onderwerp"),
        Some(&json!("Nieuw bericht over uw aanvraag"))
    );
    // No case lookup is involved in the message flow.
    assert_eq!(h.zgw.call_count("zaken/api"), 0);
}

#[tokio::test]
async fn disabled_messages_abort_without_any_query() {
    let mut whitelist = test_whitelist();
    whitelist.messages_allowed = false;
    let h = harness_with(MockZgw::new(), test_settings_with(whitelist));
    let event = object_event(MESSAGE_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");
    let err = scenario_for(kind)
        .prepare(&mut ctx)
        .await
        .expect_err("disabled messages must abort");

    assert_eq!(expect_abort(err), AbortReason::MessagesDisabled);
    assert_eq!(h.zgw.total_calls(), 0);
}

// ---------------------------------------------------------------------------
// NotImplemented
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_implemented_always_fails_with_its_signal() {
    let h = harness(MockZgw::new());
    let event = event_with(
        zaakmelder_common::events::EventAction::Update,
        zaakmelder_common::events::EventChannel::Zaken,
        zaakmelder_common::events::EventResource::Status,
    );
    let mut ctx = QueryContext::new(&h.deps, &event);

    let err = scenario_for(ScenarioKind::NotImplemented)
        .prepare(&mut ctx)
        .await
        .expect_err("the default scenario never succeeds");

    assert!(matches!(err, ProcessError::NotImplemented));
}
