use std::collections::{HashMap, HashSet};
use thiserror::Error;
use crate::models::{Candidate, Decision, DecisionEvent, QueueProgress};

/// Errors that can occur when working the deck
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Decision targets {got}, but the current candidate is {}", .expected.as_deref().unwrap_or("<none>"))]
    InvalidTarget {
        expected: Option<String>,
        got: String,
    },

    #[error("Duplicate candidate id: {0}")]
    DuplicateCandidate(String),
}

/// Ordered deck of candidates with an append-only decision record
///
/// Every candidate before the cursor has exactly one recorded decision and
/// no candidate at or after it has one.
#[derive(Debug, Clone)]
pub struct DecisionQueue {
    candidates: Vec<Candidate>,
    decisions: HashMap<String, Decision>,
    cursor: usize,
}

impl DecisionQueue {
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, QueueError> {
        let mut seen = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if !seen.insert(candidate.id.as_str()) {
                return Err(QueueError::DuplicateCandidate(candidate.id.clone()));
            }
        }

        Ok(Self {
            decisions: HashMap::with_capacity(candidates.len()),
            candidates,
            cursor: 0,
        })
    }

    /// Candidate awaiting a decision, `None` once the deck is exhausted
    pub fn current(&self) -> Option<&Candidate> {
        self.candidates.get(self.cursor)
    }

    /// Up to `n` upcoming candidates, starting with the current one
    ///
    /// The iterator borrows the deck, so it cannot outlive a `decide`. Clone it
    /// to walk the same window again.
    pub fn peek(&self, n: usize) -> impl ExactSizeIterator<Item = &Candidate> + Clone + '_ {
        self.candidates[self.cursor..].iter().take(n)
    }

    /// Record a decision on the current candidate and advance
    ///
    /// Either the decision is recorded and the cursor moves by one, or nothing
    /// changes.
    pub fn decide(&mut self, candidate_id: &str, decision: Decision) -> Result<DecisionEvent, QueueError> {
        let current = match self.current() {
            Some(candidate) if candidate.id == candidate_id => candidate,
            other => {
                return Err(QueueError::InvalidTarget {
                    expected: other.map(|c| c.id.clone()),
                    got: candidate_id.to_string(),
                });
            }
        };

        let id = current.id.clone();
        let previous = self.decisions.insert(id.clone(), decision);
        debug_assert!(previous.is_none(), "candidate {} decided twice", id);
        self.cursor += 1;

        tracing::debug!("Recorded {} for {} ({}/{})", decision, id, self.cursor, self.candidates.len());

        Ok(DecisionEvent {
            candidate_id: id,
            decision,
            decided_at: chrono::Utc::now(),
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.candidates.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    pub fn decision_for(&self, candidate_id: &str) -> Option<Decision> {
        self.decisions.get(candidate_id).copied()
    }

    pub fn decisions(&self) -> &HashMap<String, Decision> {
        &self.decisions
    }

    /// Decided candidates in deck order
    pub fn decided(&self) -> impl Iterator<Item = (&Candidate, Decision)> + '_ {
        self.candidates[..self.cursor]
            .iter()
            .filter_map(|c| self.decisions.get(&c.id).map(|d| (c, *d)))
    }

    pub fn progress(&self) -> QueueProgress {
        QueueProgress {
            decided: self.cursor,
            remaining: self.candidates.len() - self.cursor,
            total: self.candidates.len(),
        }
    }
}
