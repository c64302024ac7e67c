// Router module - aggregation, scoring, strategy selection and audit trail
// This file wires the routing plane: providers are queried concurrently,
// quotes are normalized into candidates, a strategy is selected by trade
// size, and every attempt is journaled
//
// Numan Thabit 2025 Nov

pub mod aggregator;
pub mod api;
pub mod journal;
pub mod routes;
pub mod scoring;
pub mod selector;
pub mod validation;

#[allow(clippy::module_inception)]
pub mod router;

pub use journal::{DecisionJournal, DecisionRecord};
pub use router::{Router, RouterStats};
pub use routes::{Candidate, ChosenRoute, RouteResponse, RoutingDecision, SplitLeg, Strategy, Thresholds};
pub use selector::RouteSelector;
