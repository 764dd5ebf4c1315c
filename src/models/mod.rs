// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Candidate, Decision, DecisionEvent, Dismissal, FlowState, MatchedCandidate, ParseDecisionError, QueueProgress};
pub use requests::{InviteRequest, ProfileSubmission};
pub use responses::{DecisionOutcome, Notification, SessionSnapshot};
