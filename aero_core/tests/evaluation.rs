//! End-to-end checks of the registry, sessions and insight lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aero_core::formulas::{forces, FormulaDescriptor, FormulaGroup, InputField, InputValues};
use aero_core::insight::{InsightProvider, InsightRequest, INSIGHT_UNAVAILABLE};
use aero_core::{AeroError, EvaluationSession, FormulaRegistry, InsightOutcome, InsightState};
use async_trait::async_trait;
use tokio::sync::Notify;

/// Returns a fixed answer and counts calls
#[derive(Default)]
struct ScriptedProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl InsightProvider for ScriptedProvider {
    async fn explain(&self, request: &InsightRequest) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        format!("{} looks standard at {:.2} {}", request.formula_title, request.result, request.result_unit)
    }
}

/// Waits for a signal before answering
#[derive(Clone)]
struct GatedProvider {
    gate: Arc<Notify>,
}

#[async_trait]
impl InsightProvider for GatedProvider {
    async fn explain(&self, _request: &InsightRequest) -> String {
        self.gate.notified().await;
        "late answer".to_string()
    }
}

/// Simulates a provider whose backend failed; it must still answer with text
struct FailingProvider;

#[async_trait]
impl InsightProvider for FailingProvider {
    async fn explain(&self, _request: &InsightRequest) -> String {
        INSIGHT_UNAVAILABLE.to_string()
    }
}

fn registry() -> FormulaRegistry {
    FormulaRegistry::standard().expect("standard catalog is consistent")
}

#[test]
fn every_session_starts_at_default_result() {
    let registry = registry();
    for formula in registry.list() {
        let session = EvaluationSession::new(formula);
        let expected = formula.evaluate(&formula.default_values());
        assert_eq!(session.result().to_bits(), expected.to_bits(), "{}", formula.id());
        assert_eq!(session.values().len(), formula.inputs().len());
    }
}

#[test]
fn lift_and_drag_scenarios() {
    let registry = registry();

    let mut lift = EvaluationSession::new(registry.get("lift-force").unwrap());
    for (id, raw) in [("rho", "1.225"), ("v", "50"), ("S", "20"), ("Cl", "1.2")] {
        lift.set_input(id, raw).unwrap();
    }
    assert!((lift.result() - 36_750.0).abs() < 1e-9);

    let mut drag = EvaluationSession::new(registry.get("drag-force").unwrap());
    for (id, raw) in [("rho", "1.225"), ("v", "50"), ("S", "20"), ("Cd", "0.03")] {
        drag.set_input(id, raw).unwrap();
    }
    assert!((drag.result() - 918.75).abs() < 1e-9);
}

#[test]
fn unknown_formula_is_not_substituted() {
    let registry = registry();
    match registry.get("does-not-exist") {
        Err(AeroError::UnknownFormula { id }) => assert_eq!(id, "does-not-exist"),
        other => panic!("expected UnknownFormula, got {:?}", other.map(|f| f.id())),
    }
}

#[test]
fn duplicate_ids_fail_construction() {
    fn zero(_: &InputValues) -> f64 {
        0.0
    }

    let err = FormulaDescriptor::builder("twin-inputs", FormulaGroup::FlightForces, zero)
        .input(InputField::new("v", "Speed", "v", "m/s", 1.0))
        .input(InputField::new("v", "Speed", "v", "m/s", 2.0))
        .build()
        .unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_INPUT_ID");

    let formulas = vec![
        forces::drag_force_formula().unwrap(),
        forces::drag_force_formula().unwrap(),
    ];
    let err = FormulaRegistry::new(formulas).unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_FORMULA_ID");
}

#[test]
fn parse_fallback_is_zero() {
    let registry = registry();
    let mut session = EvaluationSession::new(registry.get("air-density").unwrap());
    session.set_input("T", "not-a-number").unwrap();
    assert_eq!(session.value("T"), Some(0.0));
    // p / (R * 0) is reported as zero rather than infinity
    assert_eq!(session.result(), 0.0);
}

#[tokio::test]
async fn insight_stored_then_invalidated() {
    let registry = registry();
    let provider = ScriptedProvider::default();
    let mut session = EvaluationSession::new(registry.get("lift-force").unwrap());

    let outcome = session.request_insight(&provider).await;
    assert_eq!(outcome, InsightOutcome::Stored);
    assert_eq!(session.insight(), Some("Lift Force looks standard at 36750.00 N"));
    assert_eq!(session.insight_state(), InsightState::Idle);

    session.set_input("Cl", "1.2").unwrap();
    assert_eq!(session.insight(), None);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn provider_failure_text_is_stored() {
    let registry = registry();
    let mut session = EvaluationSession::new(registry.get("max-lift-to-drag").unwrap());
    assert_eq!(session.request_insight(&FailingProvider).await, InsightOutcome::Stored);
    assert_eq!(session.insight(), Some(INSIGHT_UNAVAILABLE));
}

#[tokio::test]
async fn second_request_while_loading_is_busy() {
    let registry = registry();
    let provider = ScriptedProvider::default();
    let mut session = EvaluationSession::new(registry.get("parasite-drag").unwrap());

    let ticket = session.begin_insight().unwrap();
    assert_eq!(session.request_insight(&provider).await, InsightOutcome::Busy);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

    let text = provider.explain(ticket.request()).await;
    assert_eq!(session.finish_insight(ticket, text), InsightOutcome::Stored);
}

#[tokio::test]
async fn late_insight_after_edit_is_discarded() {
    let registry = registry();
    let provider = GatedProvider { gate: Arc::new(Notify::new()) };
    let mut session = EvaluationSession::new(registry.get("induced-drag").unwrap());

    let ticket = session.begin_insight().unwrap();
    let request = ticket.request().clone();
    let in_flight = tokio::spawn({
        let provider = provider.clone();
        async move { provider.explain(&request).await }
    });

    // The user keeps typing while the provider is still thinking
    session.set_input("AR", "12").unwrap();
    assert!(session.is_loading());

    provider.gate.notify_one();
    let text = in_flight.await.unwrap();

    assert_eq!(session.finish_insight(ticket, text), InsightOutcome::Discarded);
    assert_eq!(session.insight(), None);
    assert_eq!(session.insight_state(), InsightState::Idle);
}

#[test]
fn sessions_are_independent() {
    let registry = registry();
    let formula = registry.get("lift-force").unwrap();
    let mut a = EvaluationSession::new(formula);
    let b = EvaluationSession::new(formula);

    a.set_input("v", "0").unwrap();
    assert_eq!(a.result(), 0.0);
    assert!((b.result() - 36_750.0).abs() < 1e-9);
}
