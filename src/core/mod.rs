// Core engine exports
pub mod flow;
pub mod matcher;
pub mod queue;

pub use flow::{validate_profile, FlowController, FlowError, FlowEvent, RequestKind, RequestTicket};
pub use matcher::{MatchPolicy, RandomMatchPolicy, DEFAULT_MATCH_PROBABILITY};
pub use queue::{DecisionQueue, QueueError};
