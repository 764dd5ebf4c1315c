use serde::{Deserialize, Serialize};
use crate::models::domain::{Candidate, DecisionEvent, FlowState, MatchedCandidate, QueueProgress};

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(rename = "sessionId")]
    pub session_id: uuid::Uuid,
    pub state: FlowState,
    pub progress: Option<QueueProgress>,
    pub current: Option<Candidate>,
    #[serde(rename = "currentMatch")]
    pub current_match: Option<MatchedCandidate>,
}

/// Result of a committed decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub event: DecisionEvent,
    pub matched: Option<MatchedCandidate>,
    pub exhausted: bool,
}

/// Event delivered to the notification sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Decision(DecisionEvent),
    Match(MatchedCandidate),
}
