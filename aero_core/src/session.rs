//! # Evaluation Sessions
//!
//! Live state for one displayed formula: current input values, the derived
//! result and an optional cached insight.
//!
//! ## Invariants
//!
//! - `values` holds exactly the formula's input ids
//! - `result` always equals `formula.evaluate(values)`; it has no setter
//! - every input change clears the insight and bumps the generation counter
//! - at most one insight request is in flight per session
//!
//! ## Insight lifecycle
//!
//! ```text
//!            begin_insight()              finish_insight()
//!   Idle ───────────────────────▶ Loading ─────────────────▶ Idle
//!    │ ▲                             │
//!    └─┘ set_input(): clear insight  └─ set_input(): result of the
//!                                       pending request is discarded
//! ```
//!
//! A request resolving after an input change no longer describes the current
//! values, so [`EvaluationSession::finish_insight`] compares the generation
//! captured in the [`InsightTicket`] with the current one and drops stale text.
//!
//! ## Example
//!
//! ```rust
//! use aero_core::registry::FormulaRegistry;
//! use aero_core::session::EvaluationSession;
//!
//! let registry = FormulaRegistry::standard().unwrap();
//! let mut session = EvaluationSession::new(registry.get("drag-force").unwrap());
//! assert!((session.result() - 918.75).abs() < 1e-9);
//!
//! session.set_input("Cd", "not-a-number").unwrap();
//! assert_eq!(session.value("Cd"), Some(0.0));
//! assert_eq!(session.result(), 0.0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::errors::{AeroError, AeroResult};
use crate::formulas::{FormulaDescriptor, InputValues};
use crate::insight::{InsightProvider, InsightRequest};

/// Ticket ids are unique across every session in the process, so a ticket
/// handed to the wrong session never matches its pending request.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// Input Parsing
// ============================================================================

/// Parse user text into an input value.
///
/// Reads the longest numeric prefix after leading whitespace (optional sign,
/// digits with optional fraction and exponent, or `Infinity`) and ignores the
/// rest. Text with no numeric prefix reads as `0.0`, never as the input's
/// default.
///
/// # Example
/// ```rust
/// use aero_core::session::parse_input_value;
///
/// assert_eq!(parse_input_value(" 12.5 m/s"), 12.5);
/// assert_eq!(parse_input_value("-3e2"), -300.0);
/// assert_eq!(parse_input_value("abc"), 0.0);
/// assert_eq!(parse_input_value(""), 0.0);
/// ```
pub fn parse_input_value(raw: &str) -> f64 {
    let text = raw.trim_start();
    let len = numeric_prefix_len(text);
    if len == 0 {
        return 0.0;
    }
    match text[..len].parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}

fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if text[i..].starts_with("Infinity") {
        return i + "Infinity".len();
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        // A lone "." only counts when digits sit on either side of it
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

// ============================================================================
// Insight State
// ============================================================================

/// Whether an insight request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InsightState {
    #[default]
    Idle,
    Loading,
}

/// Handle for one in-flight insight request.
///
/// Obtained from [`EvaluationSession::begin_insight`] and handed back to
/// [`EvaluationSession::finish_insight`] with the provider's text.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightTicket {
    id: u64,
    generation: u64,
    request: InsightRequest,
}

impl InsightTicket {
    /// What to send to the provider
    pub fn request(&self) -> &InsightRequest {
        &self.request
    }

    /// Input generation the request was built from
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to an insight response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightOutcome {
    /// Text cached on the session
    Stored,
    /// Inputs changed or the request was cancelled; text dropped
    Discarded,
    /// Another request was already in flight; nothing was sent
    Busy,
}

// ============================================================================
// Session
// ============================================================================

/// Serializable view of a session for front-ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub formula_id: String,
    pub title: String,
    /// Values in display order
    pub values: Vec<(String, f64)>,
    pub result: f64,
    pub result_unit: String,
    pub insight: Option<String>,
    pub insight_state: InsightState,
}

/// Runtime state for one formula.
///
/// Borrows its descriptor from the registry; owns its values and insight.
#[derive(Debug, Clone)]
pub struct EvaluationSession<'r> {
    formula: &'r FormulaDescriptor,
    values: InputValues,
    result: f64,
    insight: Option<String>,
    state: InsightState,
    generation: u64,
    pending: Option<u64>,
}

impl<'r> EvaluationSession<'r> {
    /// Start a session with every input at its default.
    pub fn new(formula: &'r FormulaDescriptor) -> Self {
        let values = formula.default_values();
        let result = formula.evaluate(&values);
        Self {
            formula,
            values,
            result,
            insight: None,
            state: InsightState::Idle,
            generation: 0,
            pending: None,
        }
    }

    pub fn formula(&self) -> &'r FormulaDescriptor {
        self.formula
    }

    pub fn formula_id(&self) -> &'static str {
        self.formula.id()
    }

    pub fn values(&self) -> &InputValues {
        &self.values
    }

    pub fn value(&self, id: &str) -> Option<f64> {
        self.values.try_get(id)
    }

    /// Values in the formula's display order
    pub fn ordered_values(&self) -> Vec<(String, f64)> {
        self.formula
            .inputs()
            .iter()
            .map(|field| {
                let value = self.values.try_get(field.id).unwrap_or(field.default_value);
                (field.id.to_string(), value)
            })
            .collect()
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn insight(&self) -> Option<&str> {
        self.insight.as_deref()
    }

    pub fn insight_state(&self) -> InsightState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == InsightState::Loading
    }

    /// Number of input changes since creation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set an input from user text.
    ///
    /// Unparsable text stores `0.0`. The insight is cleared even when the
    /// value does not change.
    pub fn set_input(&mut self, id: &str, raw: &str) -> AeroResult<()> {
        self.set_value(id, parse_input_value(raw))
    }

    /// Set an input to a number.
    ///
    /// Non-finite values (NaN, ±∞) are stored as `0.0`, the same as
    /// unparsable text.
    pub fn set_value(&mut self, id: &str, value: f64) -> AeroResult<()> {
        if !self.formula.has_input(id) {
            log::error!("Formula '{}' has no input '{}'", self.formula.id(), id);
            return Err(AeroError::invalid_input_key(self.formula.id(), id));
        }
        let value = if value.is_finite() {
            value
        } else {
            log::debug!("{}: non-finite value {} for '{}' stored as 0", self.formula.id(), value, id);
            0.0
        };
        self.values.insert(id, value);
        self.inputs_changed();
        Ok(())
    }

    /// Restore every input to its default.
    pub fn reset(&mut self) {
        self.values = self.formula.default_values();
        self.inputs_changed();
    }

    fn inputs_changed(&mut self) {
        self.result = self.formula.evaluate(&self.values);
        self.insight = None;
        self.generation += 1;
        log::debug!(
            "{} recomputed: {} {} (generation {})",
            self.formula.id(),
            self.result,
            self.formula.result_unit(),
            self.generation
        );
    }

    /// Request payload for the current values
    pub fn insight_request(&self) -> InsightRequest {
        InsightRequest {
            formula_title: self.formula.title().to_string(),
            inputs: self.ordered_values(),
            result: self.result,
            result_unit: self.formula.result_unit().to_string(),
        }
    }

    /// Enter `Loading` and hand out a ticket, or `None` if a request is
    /// already in flight.
    pub fn begin_insight(&mut self) -> Option<InsightTicket> {
        if self.is_loading() {
            log::debug!("Insight for {} already loading", self.formula.id());
            return None;
        }
        let id = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        self.pending = Some(id);
        self.state = InsightState::Loading;
        Some(InsightTicket {
            id,
            generation: self.generation,
            request: self.insight_request(),
        })
    }

    /// Deliver the provider's text for `ticket`.
    ///
    /// Leaves `Loading` when `ticket` is the pending request. The text is
    /// cached only if no input changed since the ticket was issued.
    pub fn finish_insight(&mut self, ticket: InsightTicket, text: String) -> InsightOutcome {
        if self.pending != Some(ticket.id) {
            log::debug!(
                "Dropping insight for request {} not pending on {}",
                ticket.id,
                self.formula.id()
            );
            return InsightOutcome::Discarded;
        }
        self.pending = None;
        self.state = InsightState::Idle;

        if ticket.generation != self.generation {
            log::warn!(
                "Discarding stale insight for {} (requested at generation {}, now {})",
                self.formula.id(),
                ticket.generation,
                self.generation
            );
            return InsightOutcome::Discarded;
        }
        self.insight = Some(text);
        InsightOutcome::Stored
    }

    /// Abandon the in-flight request, if any. Its eventual text is dropped.
    pub fn cancel_insight(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("Insight request for {} cancelled", self.formula.id());
        }
        self.state = InsightState::Idle;
    }

    /// Ask `provider` about the current values and cache its answer.
    ///
    /// Holds `&mut self` until the provider answers, so the session cannot be
    /// edited meanwhile. Front-ends that keep accepting input during a request
    /// should call [`begin_insight`](Self::begin_insight), run the provider
    /// themselves and hand the text to [`finish_insight`](Self::finish_insight).
    pub async fn request_insight(&mut self, provider: &dyn InsightProvider) -> InsightOutcome {
        let Some(ticket) = self.begin_insight() else {
            return InsightOutcome::Busy;
        };
        let text = provider.explain(ticket.request()).await;
        self.finish_insight(ticket, text)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            formula_id: self.formula.id().to_string(),
            title: self.formula.title().to_string(),
            values: self.ordered_values(),
            result: self.result,
            result_unit: self.formula.result_unit().to_string(),
            insight: self.insight.clone(),
            insight_state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::forces;

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_input_value("42"), 42.0);
        assert_eq!(parse_input_value("  7.25"), 7.25);
        assert_eq!(parse_input_value("+.5"), 0.5);
        assert_eq!(parse_input_value("5."), 5.0);
        assert_eq!(parse_input_value("1.5e3kg"), 1500.0);
        assert_eq!(parse_input_value("2e"), 2.0);
        assert_eq!(parse_input_value("2e+"), 2.0);
        assert_eq!(parse_input_value("12abc"), 12.0);
        assert_eq!(parse_input_value("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_failures_are_zero() {
        for raw in ["", " ", "-", ".", "-.", "e5", "abc", "NaN", "nan", "inf", "infinity"] {
            assert_eq!(parse_input_value(raw), 0.0, "input {:?}", raw);
        }
    }

    #[test]
    fn test_new_session_uses_defaults() {
        let formula = forces::lift_force_formula().unwrap();
        let session = EvaluationSession::new(&formula);
        assert_eq!(session.values(), &formula.default_values());
        assert_eq!(session.result().to_bits(), formula.evaluate(&formula.default_values()).to_bits());
        assert_eq!(session.insight(), None);
        assert_eq!(session.insight_state(), InsightState::Idle);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_set_input_recomputes() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        session.set_input("v", "25").unwrap();
        assert!((session.result() - 9187.5).abs() < 1e-9);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_unparsable_input_is_zero_not_default() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        session.set_input("Cl", "not-a-number").unwrap();
        assert_eq!(session.value("Cl"), Some(0.0));
        assert_eq!(session.result(), 0.0);
    }

    #[test]
    fn test_non_finite_value_stored_as_zero() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        session.set_value("v", f64::NAN).unwrap();
        assert_eq!(session.value("v"), Some(0.0));
        session.set_input("S", "-Infinity").unwrap();
        assert_eq!(session.value("S"), Some(0.0));
        assert_eq!(session.result(), 0.0);

        let prompt = session.insight_request().prompt();
        assert!(!prompt.contains("NaN"), "{}", prompt);
        assert!(!prompt.contains(": -inf"), "{}", prompt);
    }

    #[test]
    fn test_unknown_key_leaves_session_untouched() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        let err = session.set_input("Cd", "0.5").unwrap_err();
        assert_eq!(err, AeroError::invalid_input_key("lift-force", "Cd"));
        assert_eq!(session.generation(), 0);
        assert_eq!(session.values().len(), 4);
    }

    #[test]
    fn test_set_input_clears_insight_even_if_unchanged() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        let ticket = session.begin_insight().unwrap();
        assert_eq!(session.finish_insight(ticket, "Plenty of lift.".into()), InsightOutcome::Stored);
        assert_eq!(session.insight(), Some("Plenty of lift."));

        session.set_input("v", "50").unwrap();
        assert_eq!(session.value("v"), Some(50.0));
        assert_eq!(session.insight(), None);
    }

    #[test]
    fn test_single_request_in_flight() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        let ticket = session.begin_insight().unwrap();
        assert!(session.is_loading());
        assert!(session.begin_insight().is_none());

        session.finish_insight(ticket, "ok".into());
        assert!(!session.is_loading());
        assert!(session.begin_insight().is_some());
    }

    #[test]
    fn test_stale_insight_discarded() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        let ticket = session.begin_insight().unwrap();
        session.set_input("S", "16").unwrap();
        // Still one request in flight until it resolves
        assert!(session.is_loading());

        assert_eq!(session.finish_insight(ticket, "stale".into()), InsightOutcome::Discarded);
        assert_eq!(session.insight(), None);
        assert_eq!(session.insight_state(), InsightState::Idle);
    }

    #[test]
    fn test_cancelled_insight_discarded() {
        let formula = forces::lift_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        let first = session.begin_insight().unwrap();
        session.cancel_insight();
        assert!(!session.is_loading());

        let second = session.begin_insight().unwrap();
        assert_eq!(session.finish_insight(first, "old".into()), InsightOutcome::Discarded);
        // The newer request is still pending
        assert!(session.is_loading());
        assert_eq!(session.finish_insight(second, "new".into()), InsightOutcome::Stored);
        assert_eq!(session.insight(), Some("new"));
    }

    #[test]
    fn test_ticket_from_other_session_discarded() {
        let lift_formula = forces::lift_force_formula().unwrap();
        let drag_formula = forces::drag_force_formula().unwrap();
        let mut lift = EvaluationSession::new(&lift_formula);
        let mut drag = EvaluationSession::new(&drag_formula);

        let lift_ticket = lift.begin_insight().unwrap();
        let drag_ticket = drag.begin_insight().unwrap();
        assert_ne!(lift_ticket.id, drag_ticket.id);

        assert_eq!(drag.finish_insight(lift_ticket, "about lift".into()), InsightOutcome::Discarded);
        assert_eq!(drag.insight(), None);
        assert!(drag.is_loading());

        assert_eq!(drag.finish_insight(drag_ticket, "about drag".into()), InsightOutcome::Stored);
        assert_eq!(drag.insight(), Some("about drag"));
        // The lift request is still pending on its own session
        assert!(lift.is_loading());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let formula = forces::drag_force_formula().unwrap();
        let mut session = EvaluationSession::new(&formula);
        session.set_value("rho", 0.9).unwrap();
        session.reset();
        assert_eq!(session.values(), &formula.default_values());
        assert!((session.result() - 918.75).abs() < 1e-9);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_insight_request_payload() {
        let formula = forces::drag_force_formula().unwrap();
        let session = EvaluationSession::new(&formula);
        let request = session.insight_request();
        assert_eq!(request.formula_title, "Drag Force");
        assert_eq!(request.result_unit, "N");
        let ids: Vec<_> = request.inputs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["rho", "v", "S", "Cd"]);
    }

    #[test]
    fn test_snapshot_serializes() {
        let formula = forces::drag_force_formula().unwrap();
        let session = EvaluationSession::new(&formula);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["formula_id"], "drag-force");
        assert_eq!(json["insight_state"], "Idle");
        assert!(json["insight"].is_null());
        assert_eq!(json["values"][3][0], "Cd");
    }
}
