//! Lume Flow - session flow and decision deck engine for the Lume dating app
//!
//! A session walks invite redemption, onboarding, discovery over a deck of
//! candidate cards, and the match overlay. Catalog, invite checks, profile
//! storage, match decisions and notifications are injected collaborators.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use crate::core::{DecisionQueue, FlowController, FlowError, MatchPolicy, RandomMatchPolicy};
pub use crate::models::{Candidate, Decision, DecisionOutcome, Dismissal, FlowState, MatchedCandidate, Notification, ProfileSubmission};
pub use crate::session::{Collaborators, Session};
