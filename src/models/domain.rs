use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Candidate profile shown on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    pub photo: String,
}

/// A user's decision on a single candidate
///
/// The text surface is the one the card buttons use: `yes`, `no`, `maybe`, `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "yes")]
    Accept,
    #[serde(rename = "no")]
    Reject,
    /// Soft undecided
    #[serde(rename = "maybe")]
    Maybe,
    /// Open undecided
    #[serde(rename = "open")]
    Open,
}

impl Decision {
    pub const ALL: [Decision; 4] = [Decision::Reject, Decision::Maybe, Decision::Open, Decision::Accept];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "yes",
            Decision::Reject => "no",
            Decision::Maybe => "maybe",
            Decision::Open => "open",
        }
    }

    /// Only an accept can lead to a match
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown decision '{0}', expected one of: yes, no, maybe, open")]
pub struct ParseDecisionError(pub String);

impl FromStr for Decision {
    type Err = ParseDecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Decision::Accept),
            "no" => Ok(Decision::Reject),
            "maybe" => Ok(Decision::Maybe),
            "open" => Ok(Decision::Open),
            _ => Err(ParseDecisionError(s.to_string())),
        }
    }
}

/// Recorded decision, emitted once per committed `decide`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub decision: Decision,
    #[serde(rename = "decidedAt")]
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

/// Match captured for the celebration overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedCandidate {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub name: String,
    pub photo: String,
    #[serde(rename = "matchedAt")]
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

impl MatchedCandidate {
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            photo: candidate.photo.clone(),
            matched_at: chrono::Utc::now(),
        }
    }
}

/// Macro-phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    AwaitingInvite,
    Onboarding,
    Discovering,
    MatchPresented,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::AwaitingInvite => "awaiting_invite",
            FlowState::Onboarding => "onboarding",
            FlowState::Discovering => "discovering",
            FlowState::MatchPresented => "match_presented",
        };
        f.write_str(name)
    }
}

/// How the match overlay was left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dismissal {
    /// Closed without acting
    Closed,
    /// "Say hello"
    Acknowledged,
}

/// Deck progress, one slot per candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueProgress {
    pub decided: usize,
    pub remaining: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parse() {
        assert_eq!("yes".parse::<Decision>(), Ok(Decision::Accept));
        assert_eq!(" NO ".parse::<Decision>(), Ok(Decision::Reject));
        assert_eq!("Maybe".parse::<Decision>(), Ok(Decision::Maybe));
        assert_eq!("open".parse::<Decision>(), Ok(Decision::Open));
        assert!("like".parse::<Decision>().is_err());
    }

    #[test]
    fn test_decision_serde_surface() {
        let json = serde_json::to_string(&Decision::Accept).unwrap();
        assert_eq!(json, "\"yes\"");

        let parsed: Decision = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(parsed, Decision::Open);
    }

    #[test]
    fn test_only_accept_is_accept() {
        let accepts: Vec<_> = Decision::ALL.iter().filter(|d| d.is_accept()).collect();
        assert_eq!(accepts, vec![&Decision::Accept]);
    }

    #[test]
    fn test_candidate_defaults() {
        let candidate: Candidate = serde_json::from_str(
            r#"{"id": "1", "name": "Alexander", "age": 32, "photo": "alexander.jpg"}"#,
        )
        .unwrap();

        assert_eq!(candidate.title, "");
        assert_eq!(candidate.bio, "");
    }
}
