//! End-to-end workflow behavior against the in-memory dealership.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use dealer_reservation::application::error::{WorkflowAction, WorkflowError};
use dealer_reservation::application::services::{
    CancelOutcome, CancellationConfirmation, PricingEngine,
};
use dealer_reservation::application::workflow::Workflow;
use dealer_reservation::domain::entities::{Accessory, LineKind, Selection, Vehicle};
use dealer_reservation::domain::value_objects::{
    AccessoryId, DepositRate, Money, ReservationStatus, VehicleId, VehicleStatus, WorkflowStage,
};
use dealer_reservation::infrastructure::remote::{
    AccessToken, InMemoryRemoteService, RemoteService, ServiceError, SessionCredentials,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

struct Dealership {
    remote: InMemoryRemoteService,
    session: SessionCredentials,
    workflow: Workflow,
    vehicle: Vehicle,
    a: Accessory,
    b: Accessory,
}

async fn dealership() -> Dealership {
    dealership_with(None).await
}

async fn dealership_with(latency: Option<Duration>) -> Dealership {
    let vehicle = Vehicle::new(
        VehicleId::new_v4(),
        "Corolla",
        "Toyota",
        Money::from_units(20000),
        VehicleStatus::Available,
    );
    let a = Accessory::new(AccessoryId::new_v4(), "Roof rack", Money::from_units(500));
    let b = Accessory::new(AccessoryId::new_v4(), "Floor mats", Money::from_units(300));
    let session = SessionCredentials::with_token(AccessToken::new("buyer-1"));
    let mut remote = InMemoryRemoteService::new(
        vec![vehicle.clone()],
        vec![a.clone(), b.clone()],
        Arc::new(session.clone()),
    );
    if let Some(latency) = latency {
        remote = remote.with_latency(latency);
    }
    let workflow = Workflow::new(Arc::new(remote.clone()), Arc::new(session.clone()));
    workflow
        .load_catalog(Some(VehicleStatus::Available))
        .await
        .unwrap();
    Dealership {
        remote,
        session,
        workflow,
        vehicle,
        a,
        b,
    }
}

async fn quote_a(d: &Dealership) {
    d.workflow.select_vehicle(d.vehicle.id()).unwrap();
    d.workflow.toggle_accessory(d.a.id()).unwrap();
    d.workflow.simulate().await.unwrap();
    d.workflow.issue_quote().await.unwrap();
}

#[tokio::test]
async fn full_purchase_scenario() {
    let d = dealership().await;
    let wf = &d.workflow;

    wf.select_vehicle(d.vehicle.id()).unwrap();
    wf.toggle_accessory(d.a.id()).unwrap();
    wf.toggle_accessory(d.b.id()).unwrap();
    let both = wf.simulate().await.unwrap();
    assert_eq!(both.total(), Money::from_units(20800));
    assert_eq!(both.lines().len(), 3);
    assert_eq!(both.lines()[0].kind(), LineKind::Vehicle);

    assert!(!wf.toggle_accessory(d.b.id()).unwrap());
    assert_eq!(wf.stage(), WorkflowStage::Idle);
    assert!(wf.snapshot().simulation.is_none());

    let only_a = wf.simulate().await.unwrap();
    assert_eq!(only_a.total(), Money::from_units(20500));

    let quote = wf.issue_quote().await.unwrap();
    assert_eq!(quote.final_amount(), Money::from_units(20500));
    assert!(quote.is_valid());

    let reservation = wf.reserve().await.unwrap();
    assert_eq!(reservation.status(), ReservationStatus::Active);
    let expected_deposit = Money::from_units(20500)
        .safe_mul_rate(d.remote.deposit_rate())
        .unwrap();
    assert_eq!(reservation.deposit(), expected_deposit);
    assert_eq!(reservation.deposit().amount(), Decimal::new(1025, 0));
    assert!(reservation.expires_at().is_after(&quote.created_at()));
    assert_eq!(
        d.remote.vehicle_status(&d.vehicle.id()).await,
        Some(VehicleStatus::Reserved)
    );

    let consumed = d
        .remote
        .list_quotes()
        .await
        .unwrap()
        .into_iter()
        .find(|q| q.id() == quote.id())
        .unwrap();
    assert!(!consumed.is_valid());
    assert_eq!(reservation.quote_id(), quote.id());
    let snapshot = wf.snapshot();
    assert_eq!(snapshot.stage, WorkflowStage::Reserved);
    assert!(snapshot.quote.is_none());

    let refused = wf.reset().unwrap_err();
    assert_eq!(
        refused,
        WorkflowError::contract_violation(WorkflowAction::Reset, WorkflowStage::Reserved)
    );
    assert_eq!(wf.stage(), WorkflowStage::Reserved);

    let outcome = wf
        .cancel(CancellationConfirmation::confirmed_by_user())
        .await
        .unwrap();
    assert!(matches!(outcome, CancelOutcome::Cancelled { .. }));
    assert_eq!(wf.stage(), WorkflowStage::Cancelled);
    assert_eq!(
        d.remote.reservation(&reservation.id()).await.unwrap().status(),
        ReservationStatus::Cancelled
    );
    assert_eq!(
        d.remote.vehicle_status(&d.vehicle.id()).await,
        Some(VehicleStatus::Available)
    );

    wf.reset().unwrap();
    assert_eq!(wf.stage(), WorkflowStage::Idle);
}

#[tokio::test]
async fn selection_edit_in_simulated_discards_estimate() {
    let d = dealership().await;
    d.workflow.select_vehicle(d.vehicle.id()).unwrap();
    d.workflow.toggle_accessory(d.a.id()).unwrap();
    d.workflow.simulate().await.unwrap();

    d.workflow.toggle_accessory(d.b.id()).unwrap();

    let snapshot = d.workflow.snapshot();
    assert_eq!(snapshot.stage, WorkflowStage::Idle);
    assert!(snapshot.simulation.is_none());
    assert!(snapshot.quote.is_none());
    let err = d.workflow.issue_quote().await.unwrap_err();
    assert!(err.is_contract_violation());
    assert_eq!(d.remote.calls("issue_quote"), 0);
}

#[tokio::test]
async fn unauthenticated_issue_creates_no_quote() {
    let d = dealership().await;
    d.workflow.select_vehicle(d.vehicle.id()).unwrap();
    d.workflow.toggle_accessory(d.a.id()).unwrap();
    d.workflow.simulate().await.unwrap();
    d.session.sign_out();

    let err = d.workflow.issue_quote().await.unwrap_err();

    assert_eq!(err, WorkflowError::Service(ServiceError::Unauthenticated));
    assert_eq!(d.remote.quote_count().await, 0);
    let snapshot = d.workflow.snapshot();
    assert_eq!(snapshot.stage, WorkflowStage::Idle);
    assert!(snapshot.pending_quote);
    assert_eq!(
        snapshot.selection.unwrap().accessories().as_slice(),
        &[d.a.id()]
    );

    d.session.sign_in(AccessToken::new("buyer-1"));
    let quote = d.workflow.resume_after_sign_in().await.unwrap();
    assert_eq!(quote.final_amount(), Money::from_units(20500));
    assert_eq!(d.remote.quote_count().await, 1);
}

#[tokio::test]
async fn reserving_an_invalid_quote_is_rejected() {
    let d = dealership().await;
    quote_a(&d).await;
    let quote = d.workflow.snapshot().quote.unwrap();
    d.remote.invalidate_quote(&quote.id()).await;

    let err = d.workflow.reserve().await.unwrap_err();

    let service = err.service_error().unwrap();
    assert!(service.is_rejected());
    assert_eq!(d.workflow.stage(), WorkflowStage::Quoted);
    let failure = d.workflow.last_failure().unwrap();
    assert_eq!(failure.stage, WorkflowStage::Quoted);
    assert_eq!(failure.action, WorkflowAction::Reserve);
}

#[tokio::test]
async fn reissuing_supersedes_the_earlier_quote() {
    let d = dealership().await;
    quote_a(&d).await;
    let first = d.workflow.snapshot().quote.unwrap();

    assert_eq!(d.workflow.back().unwrap(), WorkflowStage::Simulated);
    d.workflow.issue_quote().await.unwrap();
    let second = d.workflow.snapshot().quote.unwrap();
    assert_ne!(first.id(), second.id());

    d.workflow.reserve().await.unwrap();
    assert_eq!(d.workflow.stage(), WorkflowStage::Reserved);
    assert_eq!(d.remote.calls("issue_quote"), 2);
}

#[tokio::test]
async fn cancelling_twice_never_regresses() {
    let d = dealership().await;
    quote_a(&d).await;
    let reservation = d.workflow.reserve().await.unwrap();
    let confirmation = CancellationConfirmation::confirmed_by_user();

    let first = d.workflow.cancel(confirmation).await.unwrap();
    let second = d.workflow.cancel(confirmation).await.unwrap();

    assert!(!first.is_already_cancelled());
    assert!(second.is_already_cancelled());
    assert_eq!(
        d.remote.reservation(&reservation.id()).await.unwrap().status(),
        ReservationStatus::Cancelled
    );
    assert_eq!(
        d.workflow.snapshot().reservation.unwrap().status(),
        ReservationStatus::Cancelled
    );
}

#[tokio::test]
async fn retried_cancel_after_lost_reply_is_already_cancelled() {
    let d = dealership().await;
    quote_a(&d).await;
    let reservation = d.workflow.reserve().await.unwrap();
    // Cancelled remotely, but the workflow never saw the answer.
    d.remote.cancel_reservation(&reservation.id()).await.unwrap();

    let outcome = d
        .workflow
        .cancel(CancellationConfirmation::confirmed_by_user())
        .await
        .unwrap();

    assert!(outcome.is_already_cancelled());
    assert_eq!(d.workflow.stage(), WorkflowStage::Cancelled);
    assert_eq!(d.remote.calls("cancel_reservation"), 2);
}

#[tokio::test]
async fn concurrent_reserve_reaches_network_once() {
    let d = dealership_with(Some(Duration::from_millis(50))).await;
    quote_a(&d).await;

    let (first, second) = tokio::join!(d.workflow.reserve(), d.workflow.reserve());

    assert!(first.is_ok());
    assert_eq!(
        second.unwrap_err(),
        WorkflowError::busy(WorkflowAction::Reserve)
    );
    assert_eq!(d.remote.calls("create_reservation"), 1);
    assert_eq!(d.remote.mutating_calls(), 2);
    assert_eq!(d.workflow.stage(), WorkflowStage::Reserved);
    assert!(!d.workflow.is_busy());
}

#[tokio::test]
async fn edits_are_refused_while_simulating() {
    let d = dealership_with(Some(Duration::from_millis(50))).await;
    d.workflow.select_vehicle(d.vehicle.id()).unwrap();

    let (simulated, edited) = tokio::join!(d.workflow.simulate(), async {
        d.workflow.toggle_accessory(d.a.id())
    });

    assert!(simulated.is_ok());
    assert_eq!(
        edited.unwrap_err(),
        WorkflowError::busy(WorkflowAction::ToggleAccessory)
    );
    let snapshot = d.workflow.snapshot();
    assert_eq!(snapshot.stage, WorkflowStage::Simulated);
    assert!(snapshot.simulation.unwrap().accessories().is_empty());
}

#[tokio::test]
async fn catalog_reads_run_alongside_actions() {
    let d = dealership_with(Some(Duration::from_millis(50))).await;
    quote_a(&d).await;

    let (reserved, loaded) = tokio::join!(d.workflow.reserve(), d.workflow.load_catalog(None));

    assert!(reserved.is_ok());
    assert!(loaded.is_ok());
    assert!(d.workflow.catalog().find_vehicle(&d.vehicle.id()).is_some());
    assert_eq!(d.remote.calls("list_vehicles"), 2);
}

#[tokio::test]
async fn transport_failure_keeps_stage_and_allows_retry() {
    let d = dealership().await;
    quote_a(&d).await;
    d.remote.fail_next(
        "create_reservation",
        ServiceError::transport("connection reset"),
    );

    let err = d.workflow.reserve().await.unwrap_err();
    assert!(err.service_error().unwrap().is_retryable());
    assert_eq!(d.workflow.stage(), WorkflowStage::Quoted);

    d.workflow.reserve().await.unwrap();
    assert_eq!(d.workflow.stage(), WorkflowStage::Reserved);
    assert!(d.workflow.last_failure().is_none());
}

#[tokio::test]
async fn deposit_preview_follows_configured_hint() {
    let d = dealership().await;
    let workflow = Workflow::new(Arc::new(d.remote.clone()), Arc::new(d.session.clone()))
        .with_deposit_rate_hint(DepositRate::from_percent(Decimal::new(10, 0)).unwrap());
    workflow.load_catalog(None).await.unwrap();
    workflow.select_vehicle(d.vehicle.id()).unwrap();
    workflow.simulate().await.unwrap();
    workflow.issue_quote().await.unwrap();

    assert_eq!(
        workflow.snapshot().deposit_preview,
        Some(Money::from_units(2000))
    );
}

fn priced_catalog(prices: &[u32]) -> (Vehicle, Vec<Accessory>, PricingEngine) {
    let vehicle = Vehicle::new(
        VehicleId::new_v4(),
        "Corolla",
        "Toyota",
        Money::from_units(20000),
        VehicleStatus::Available,
    );
    let accessories: Vec<Accessory> = prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            Accessory::new(
                AccessoryId::new_v4(),
                format!("Accessory {i}"),
                Money::from_units(*price),
            )
        })
        .collect();
    let remote = InMemoryRemoteService::new(
        vec![vehicle.clone()],
        accessories.clone(),
        Arc::new(SessionCredentials::new()),
    );
    (vehicle, accessories, PricingEngine::new(Arc::new(remote)))
}

proptest! {
    #[test]
    fn total_is_price_sum_regardless_of_order(
        (prices, order) in prop::collection::vec(0u32..100_000, 0..8).prop_flat_map(|prices| {
            let len = prices.len();
            (Just(prices), Just((0..len).collect::<Vec<usize>>()).prop_shuffle())
        })
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (vehicle, accessories, engine) = priced_catalog(&prices);

        let mut in_order = Selection::new(vehicle.clone());
        for accessory in &accessories {
            in_order.toggle_accessory(accessory.id());
        }
        let mut shuffled = Selection::new(vehicle);
        for i in &order {
            shuffled.toggle_accessory(accessories[*i].id());
        }

        let (first, second) = runtime.block_on(async {
            (
                engine.simulate(&in_order).await.unwrap(),
                engine.simulate(&shuffled).await.unwrap(),
            )
        });

        let expected = 20000u64 + prices.iter().map(|p| u64::from(*p)).sum::<u64>();
        prop_assert_eq!(first.total().amount(), Decimal::from(expected));
        prop_assert_eq!(first.total(), second.total());
        prop_assert_eq!(first.accessories(), second.accessories());
        prop_assert_eq!(first.lines().len(), prices.len() + 1);
    }
}
