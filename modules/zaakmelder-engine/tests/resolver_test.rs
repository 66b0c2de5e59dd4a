//! Resolver classification: (action, channel, resource) triples plus the
//! dependent lookups for case and object events.

use uuid::Uuid;

use zaakmelder_common::events::{EventAction, EventChannel, EventResource};
use zaakmelder_engine::queries::QueryContext;
use zaakmelder_engine::resolver::determine_scenario;
use zaakmelder_engine::testing::*;
use zaakmelder_engine::{ProcessError, ScenarioKind};

// ---------------------------------------------------------------------------
// Case events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_status_classifies_as_case_created() {
    let h = harness(case_flow_mock(1, false));
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");

    assert_eq!(kind, ScenarioKind::CaseCreated);
    // A never-updated case needs only the status history.
    assert_eq!(h.zgw.total_calls(), 1);
}

#[tokio::test]
async fn updated_case_with_open_type_classifies_as_status_updated() {
    let h = harness(case_flow_mock(2, false));
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");

    assert_eq!(kind, ScenarioKind::CaseStatusUpdated);
}

#[tokio::test]
async fn final_status_classifies_as_case_closed() {
    let h = harness(
        MockZgw::new()
            .on(&statuses_url(), statuses_json(3))
            .on(STATUSTYPE_URL, case_type_json(true, true)),
    );
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");

    assert_eq!(kind, ScenarioKind::CaseClosed);
}

#[tokio::test]
async fn scenario_reuses_status_query_from_resolution() {
    let h = harness(case_flow_mock(2, false));
    let event = case_status_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    determine_scenario(&mut ctx).await.expect("classification failed");
    // A strategy asking again must hit the memo, not the register.
    ctx.case_statuses().await.expect("memoized statuses");
    ctx.last_case_type().await.expect("memoized case type");

    assert_eq!(h.zgw.call_count("statussen?zaak"), 1);
    assert_eq!(h.zgw.call_count("statustypen"), 1);
}

// ---------------------------------------------------------------------------
// Object events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_object_type_routes_to_task_assigned() {
    let h = harness(MockZgw::new());
    let event = object_event(TASK_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");

    assert_eq!(kind, ScenarioKind::TaskAssigned);
    // Routing reads the attribute UUID, no upstream call needed.
    assert_eq!(h.zgw.total_calls(), 0);
}

#[tokio::test]
async fn message_object_type_routes_to_message_received() {
    let h = harness(MockZgw::new());
    let event = object_event(MESSAGE_OBJECT_TYPE);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");

    assert_eq!(kind, ScenarioKind::MessageReceived);
}

#[tokio::test]
async fn unregistered_object_type_is_rejected_explicitly() {
    let h = harness(MockZgw::new());
    let stray = "c0ffee00-0000-4000-8000-000000000001";
    let event = object_event(stray);
    let mut ctx = QueryContext::new(&h.deps, &event);

    let err = determine_scenario(&mut ctx)
        .await
        .expect_err("stray object type must not fall through");

    match err {
        ProcessError::UnsupportedObjectType { uuid } => {
            assert_eq!(uuid, Uuid::parse_str(stray).expect("invalid test UUID"));
        }
        other => panic!("expected UnsupportedObjectType, got {other:?}"),
    }
}

#[tokio::test]
async fn object_event_without_type_attribute_is_a_context_error() {
    let h = harness(MockZgw::new());
    let mut event = object_event(TASK_OBJECT_TYPE);
    event.attributes.object_type = None;
    let mut ctx = QueryContext::new(&h.deps, &event);

    let err = determine_scenario(&mut ctx).await.expect_err("missing attribute");
    assert!(matches!(err, ProcessError::Context(_)));
}

// ---------------------------------------------------------------------------
// Decisions and the default
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decision_event_classifies_without_queries() {
    let h = harness(MockZgw::new());
    let event = decision_event();
    let mut ctx = QueryContext::new(&h.deps, &event);

    let kind = determine_scenario(&mut ctx).await.expect("classification failed");

    assert_eq!(kind, ScenarioKind::DecisionMade);
    assert_eq!(h.zgw.total_calls(), 0);
}

#[tokio::test]
async fn unmatched_triples_resolve_to_not_implemented() {
    let h = harness(MockZgw::new());
    let triples = [
        (EventAction::Update, EventChannel::Zaken, EventResource::Status),
        (EventAction::Create, EventChannel::Zaken, EventResource::Zaak),
        (EventAction::Destroy, EventChannel::Besluiten, EventResource::Besluit),
        (EventAction::Create, EventChannel::Unknown, EventResource::Unknown),
    ];

    for triple in triples {
        let event = event_with(triple.0, triple.1, triple.2);
        let mut ctx = QueryContext::new(&h.deps, &event);
        let kind = determine_scenario(&mut ctx).await.expect("classification failed");
        assert_eq!(kind, ScenarioKind::NotImplemented, "triple {triple:?}");
    }
    assert_eq!(h.zgw.total_calls(), 0);
}
