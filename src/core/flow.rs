use std::fmt;
use thiserror::Error;
use validator::Validate;
use crate::core::matcher::MatchPolicy;
use crate::core::queue::{DecisionQueue, QueueError};
use crate::models::{
    Candidate, Decision, DecisionOutcome, Dismissal, FlowState, InviteRequest, MatchedCandidate,
    ProfileSubmission, QueueProgress,
};

/// Errors surfaced by the session flow
///
/// `InvalidTarget` and `InvalidTransition` are caller mistakes. The others are
/// recoverable and leave the flow where it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Decision targets {got}, but the current candidate is {}", .expected.as_deref().unwrap_or("<none>"))]
    InvalidTarget {
        expected: Option<String>,
        got: String,
    },

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Invalid invite code: {0}")]
    InvalidCode(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Cannot handle {event} while {state}")]
    InvalidTransition {
        state: FlowState,
        event: FlowEvent,
    },

    #[error("Superseded {} request #{}", .ticket.kind, .ticket.generation)]
    StaleRequest { ticket: RequestTicket },
}

impl From<QueueError> for FlowError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::InvalidTarget { expected, got } => FlowError::InvalidTarget { expected, got },
            QueueError::DuplicateCandidate(id) => {
                FlowError::CatalogUnavailable(format!("catalog lists candidate {} more than once", id))
            }
        }
    }
}

/// External event fed to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    InviteSubmitted,
    ProfileSubmitted,
    Decision,
    Dismissal,
}

impl fmt::Display for FlowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowEvent::InviteSubmitted => "invite submission",
            FlowEvent::ProfileSubmitted => "profile submission",
            FlowEvent::Decision => "decision",
            FlowEvent::Dismissal => "match dismissal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Invite,
    Profile,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Invite => f.write_str("invite"),
            RequestKind::Profile => f.write_str("profile"),
        }
    }
}

/// Handle for an in-flight asynchronous submission
///
/// Only the most recently issued ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    pub generation: u64,
}

/// Trim and validate an onboarding profile
pub fn validate_profile(profile: &ProfileSubmission) -> Result<ProfileSubmission, FlowError> {
    let normalized = profile.normalized();
    normalized
        .validate()
        .map_err(|errors| FlowError::ValidationError(errors.to_string()))?;
    Ok(normalized)
}

/// Four-state session flow
///
/// ```text
/// AwaitingInvite --invite--> Onboarding --profile--> Discovering <--dismiss-- MatchPresented
///                                                        |                        ^
///                                                        +---accept & match-------+
/// ```
///
/// Asynchronous steps are split into `begin_*` and `complete_*` so the caller
/// can await collaborators in between; only the latest ticket commits.
#[derive(Debug)]
pub struct FlowController {
    state: FlowState,
    queue: Option<DecisionQueue>,
    profile: Option<ProfileSubmission>,
    current_match: Option<MatchedCandidate>,
    generation: u64,
    pending: Option<RequestTicket>,
}

impl FlowController {
    pub fn new() -> Self {
        Self {
            state: FlowState::AwaitingInvite,
            queue: None,
            profile: None,
            current_match: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn queue(&self) -> Option<&DecisionQueue> {
        self.queue.as_ref()
    }

    pub fn profile(&self) -> Option<&ProfileSubmission> {
        self.profile.as_ref()
    }

    pub fn current_match(&self) -> Option<&MatchedCandidate> {
        self.current_match.as_ref()
    }

    pub fn pending(&self) -> Option<RequestTicket> {
        self.pending
    }

    pub fn current(&self) -> Option<&Candidate> {
        self.queue.as_ref().and_then(|q| q.current())
    }

    pub fn peek(&self, n: usize) -> impl Iterator<Item = &Candidate> + Clone + '_ {
        self.queue.iter().flat_map(move |q| q.peek(n))
    }

    pub fn progress(&self) -> Option<QueueProgress> {
        self.queue.as_ref().map(|q| q.progress())
    }

    /// Start redeeming an invite
    ///
    /// A blank code is rejected without issuing a ticket, so a request already
    /// in flight is not superseded and may still commit.
    pub fn begin_invite(&mut self, request: &InviteRequest) -> Result<RequestTicket, FlowError> {
        self.expect_state(FlowState::AwaitingInvite, FlowEvent::InviteSubmitted)?;
        if request.normalized_code().is_none() {
            return Err(FlowError::InvalidCode("invite code is empty".to_string()));
        }
        Ok(self.issue(RequestKind::Invite))
    }

    /// Commit an accepted invite with the loaded catalog
    pub fn complete_invite(&mut self, ticket: RequestTicket, candidates: Vec<Candidate>) -> Result<(), FlowError> {
        self.settle(ticket)?;
        self.expect_state(FlowState::AwaitingInvite, FlowEvent::InviteSubmitted)?;

        let queue = DecisionQueue::new(candidates)?;
        tracing::info!("Invite accepted, {} candidates loaded", queue.len());

        self.queue = Some(queue);
        self.state = FlowState::Onboarding;
        Ok(())
    }

    /// Start submitting a profile; returns the trimmed profile to send
    pub fn begin_profile(&mut self, profile: &ProfileSubmission) -> Result<(RequestTicket, ProfileSubmission), FlowError> {
        self.expect_state(FlowState::Onboarding, FlowEvent::ProfileSubmitted)?;
        let normalized = validate_profile(profile)?;
        Ok((self.issue(RequestKind::Profile), normalized))
    }

    pub fn complete_profile(&mut self, ticket: RequestTicket, profile: ProfileSubmission) -> Result<(), FlowError> {
        self.settle(ticket)?;
        self.expect_state(FlowState::Onboarding, FlowEvent::ProfileSubmitted)?;

        tracing::info!("Profile accepted for {}, entering discovery", profile.first_name);

        self.profile = Some(profile);
        self.state = FlowState::Discovering;
        Ok(())
    }

    /// Check that `ticket` is still the latest without consuming it
    pub fn ensure_current(&self, ticket: RequestTicket) -> Result<(), FlowError> {
        if self.pending == Some(ticket) {
            Ok(())
        } else {
            Err(FlowError::StaleRequest { ticket })
        }
    }

    /// Drop a failed request; fails with `StaleRequest` if it was already superseded
    pub fn abandon(&mut self, ticket: RequestTicket) -> Result<(), FlowError> {
        self.settle(ticket)
    }

    /// Record a decision on the current candidate
    ///
    /// An accept that the policy turns into a match moves the flow to
    /// `MatchPresented`; anything else stays in `Discovering`.
    pub fn decide(
        &mut self,
        candidate_id: &str,
        decision: Decision,
        policy: &dyn MatchPolicy,
    ) -> Result<DecisionOutcome, FlowError> {
        self.expect_state(FlowState::Discovering, FlowEvent::Decision)?;
        let Some(queue) = self.queue.as_mut() else {
            return Err(FlowError::InvalidTransition {
                state: self.state,
                event: FlowEvent::Decision,
            });
        };

        let event = queue.decide(candidate_id, decision)?;

        let matched = if decision.is_accept() && policy.should_match(&event.candidate_id, decision) {
            queue.get(&event.candidate_id).map(MatchedCandidate::from_candidate)
        } else {
            None
        };
        let exhausted = queue.is_exhausted();

        if let Some(matched) = &matched {
            tracing::info!("Match with {} ({})", matched.name, matched.candidate_id);
            self.current_match = Some(matched.clone());
            self.state = FlowState::MatchPresented;
        }

        Ok(DecisionOutcome {
            event,
            matched,
            exhausted,
        })
    }

    /// Leave the match overlay and return to the deck
    pub fn dismiss_match(&mut self, dismissal: Dismissal) -> Result<MatchedCandidate, FlowError> {
        self.expect_state(FlowState::MatchPresented, FlowEvent::Dismissal)?;
        let Some(matched) = self.current_match.take() else {
            return Err(FlowError::InvalidTransition {
                state: self.state,
                event: FlowEvent::Dismissal,
            });
        };

        tracing::info!("Match with {} dismissed ({:?})", matched.name, dismissal);
        self.state = FlowState::Discovering;
        Ok(matched)
    }

    fn expect_state(&self, expected: FlowState, event: FlowEvent) -> Result<(), FlowError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                state: self.state,
                event,
            })
        }
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.generation += 1;
        let ticket = RequestTicket {
            kind,
            generation: self.generation,
        };
        if let Some(previous) = self.pending.replace(ticket) {
            tracing::debug!("{} request #{} superseded by #{}", previous.kind, previous.generation, ticket.generation);
        }
        ticket
    }

    fn settle(&mut self, ticket: RequestTicket) -> Result<(), FlowError> {
        if let Err(e) = self.ensure_current(ticket) {
            tracing::warn!("Discarding stale {} result #{}", ticket.kind, ticket.generation);
            return Err(e);
        }
        self.pending = None;
        Ok(())
    }
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candidate(id: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("User {}", id),
            age: 30,
            title: String::new(),
            bio: String::new(),
            photo: format!("{}.jpg", id),
        }
    }

    fn create_profile() -> ProfileSubmission {
        ProfileSubmission {
            first_name: "Ada".to_string(),
            age: 29,
            photo: None,
            bio: "Jazz, sailing and long dinners".to_string(),
        }
    }

    fn always(_: &str, _: Decision) -> bool {
        true
    }

    fn never(_: &str, _: Decision) -> bool {
        false
    }

    fn discovering(ids: &[&str]) -> FlowController {
        let mut flow = FlowController::new();
        let ticket = flow.begin_invite(&InviteRequest::new("RARE")).unwrap();
        flow.complete_invite(ticket, ids.iter().map(|id| create_candidate(id)).collect()).unwrap();
        let (ticket, profile) = flow.begin_profile(&create_profile()).unwrap();
        flow.complete_profile(ticket, profile).unwrap();
        flow
    }

    #[test]
    fn test_happy_path_to_discovering() {
        let flow = discovering(&["a", "b"]);
        assert_eq!(flow.state(), FlowState::Discovering);
        assert_eq!(flow.current().map(|c| c.id.as_str()), Some("a"));
        assert_eq!(flow.profile().map(|p| p.first_name.as_str()), Some("Ada"));
        assert!(flow.pending().is_none());
    }

    #[test]
    fn test_blank_invite_rejected() {
        let mut flow = FlowController::new();
        let err = flow.begin_invite(&InviteRequest::new("   ")).unwrap_err();

        assert!(matches!(err, FlowError::InvalidCode(_)));
        assert_eq!(flow.state(), FlowState::AwaitingInvite);
        assert!(flow.pending().is_none());
    }

    #[test]
    fn test_invalid_profile_keeps_onboarding() {
        let mut flow = FlowController::new();
        let ticket = flow.begin_invite(&InviteRequest::new("RARE")).unwrap();
        flow.complete_invite(ticket, vec![create_candidate("a")]).unwrap();

        let mut profile = create_profile();
        profile.age = 16;
        let err = flow.begin_profile(&profile).unwrap_err();

        assert!(matches!(err, FlowError::ValidationError(_)));
        assert_eq!(flow.state(), FlowState::Onboarding);
    }

    #[test]
    fn test_only_latest_ticket_commits() {
        let mut flow = FlowController::new();
        let first = flow.begin_invite(&InviteRequest::new("OLD")).unwrap();
        let second = flow.begin_invite(&InviteRequest::new("NEW")).unwrap();

        let err = flow.complete_invite(first, vec![create_candidate("a")]).unwrap_err();
        assert_eq!(err, FlowError::StaleRequest { ticket: first });
        assert_eq!(flow.state(), FlowState::AwaitingInvite);

        flow.complete_invite(second, vec![create_candidate("b")]).unwrap();
        assert_eq!(flow.state(), FlowState::Onboarding);
        assert_eq!(flow.current().map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn test_abandon_stale_ticket() {
        let mut flow = FlowController::new();
        let first = flow.begin_invite(&InviteRequest::new("OLD")).unwrap();
        let second = flow.begin_invite(&InviteRequest::new("NEW")).unwrap();

        assert!(flow.abandon(first).is_err());
        assert_eq!(flow.pending(), Some(second));
        assert!(flow.abandon(second).is_ok());
        assert!(flow.pending().is_none());
    }

    #[test]
    fn test_ensure_current_does_not_settle() {
        let mut flow = FlowController::new();
        let first = flow.begin_invite(&InviteRequest::new("OLD")).unwrap();
        assert!(flow.ensure_current(first).is_ok());
        assert_eq!(flow.pending(), Some(first));

        let second = flow.begin_invite(&InviteRequest::new("NEW")).unwrap();
        assert_eq!(flow.ensure_current(first), Err(FlowError::StaleRequest { ticket: first }));
        assert!(flow.ensure_current(second).is_ok());
        assert_eq!(flow.pending(), Some(second));
    }

    #[test]
    fn test_blank_invite_keeps_earlier_request() {
        let mut flow = FlowController::new();
        let first = flow.begin_invite(&InviteRequest::new("RARE")).unwrap();

        assert!(matches!(
            flow.begin_invite(&InviteRequest::new(" ")),
            Err(FlowError::InvalidCode(_))
        ));
        assert_eq!(flow.pending(), Some(first));

        flow.complete_invite(first, vec![create_candidate("a")]).unwrap();
        assert_eq!(flow.state(), FlowState::Onboarding);
    }

    #[test]
    fn test_only_latest_profile_commits() {
        let mut flow = FlowController::new();
        let ticket = flow.begin_invite(&InviteRequest::new("RARE")).unwrap();
        flow.complete_invite(ticket, vec![create_candidate("a")]).unwrap();

        let (first, older) = flow.begin_profile(&create_profile()).unwrap();
        let mut newer = create_profile();
        newer.first_name = "Grace".to_string();
        let (second, newer) = flow.begin_profile(&newer).unwrap();
        assert_eq!(first.kind, RequestKind::Profile);

        assert_eq!(
            flow.complete_profile(first, older),
            Err(FlowError::StaleRequest { ticket: first })
        );
        assert_eq!(flow.state(), FlowState::Onboarding);
        assert!(flow.profile().is_none());
        assert!(flow.abandon(first).is_err());

        flow.complete_profile(second, newer).unwrap();
        assert_eq!(flow.state(), FlowState::Discovering);
        assert_eq!(flow.profile().map(|p| p.first_name.as_str()), Some("Grace"));
    }

    #[test]
    fn test_duplicate_catalog_is_unavailable() {
        let mut flow = FlowController::new();
        let ticket = flow.begin_invite(&InviteRequest::new("RARE")).unwrap();
        let err = flow
            .complete_invite(ticket, vec![create_candidate("a"), create_candidate("a")])
            .unwrap_err();

        assert!(matches!(err, FlowError::CatalogUnavailable(_)));
        assert_eq!(flow.state(), FlowState::AwaitingInvite);
        assert!(flow.queue().is_none());
    }

    #[test]
    fn test_decide_before_discovery_is_invalid() {
        let mut flow = FlowController::new();
        let err = flow.decide("a", Decision::Accept, &always).unwrap_err();

        assert_eq!(
            err,
            FlowError::InvalidTransition {
                state: FlowState::AwaitingInvite,
                event: FlowEvent::Decision,
            }
        );
    }

    #[test]
    fn test_accept_with_match_presents_match() {
        let mut flow = discovering(&["a", "b"]);

        let outcome = flow.decide("a", Decision::Accept, &always).unwrap();

        assert_eq!(flow.state(), FlowState::MatchPresented);
        assert_eq!(outcome.matched.as_ref().map(|m| m.candidate_id.as_str()), Some("a"));
        assert_eq!(flow.current_match().map(|m| m.name.as_str()), Some("User a"));
        assert!(!outcome.exhausted);
    }

    #[test]
    fn test_forced_match_ignored_for_non_accept() {
        let mut flow = discovering(&["a", "b", "c"]);

        flow.decide("a", Decision::Maybe, &always).unwrap();
        flow.decide("b", Decision::Open, &always).unwrap();
        let outcome = flow.decide("c", Decision::Reject, &always).unwrap();

        assert_eq!(flow.state(), FlowState::Discovering);
        assert!(outcome.matched.is_none());
        assert!(outcome.exhausted);
    }

    #[test]
    fn test_decide_blocked_while_match_presented() {
        let mut flow = discovering(&["a", "b"]);
        flow.decide("a", Decision::Accept, &always).unwrap();

        let err = flow.decide("b", Decision::Accept, &never).unwrap_err();

        assert!(matches!(err, FlowError::InvalidTransition { state: FlowState::MatchPresented, .. }));
        assert_eq!(flow.queue().map(|q| q.cursor()), Some(1));
    }

    #[test]
    fn test_dismiss_returns_to_discovering() {
        let mut flow = discovering(&["a", "b"]);
        flow.decide("a", Decision::Accept, &always).unwrap();

        let matched = flow.dismiss_match(Dismissal::Acknowledged).unwrap();

        assert_eq!(matched.candidate_id, "a");
        assert_eq!(flow.state(), FlowState::Discovering);
        assert!(flow.current_match().is_none());
        assert_eq!(flow.current().map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn test_dismiss_without_match_is_invalid() {
        let mut flow = discovering(&["a"]);
        assert!(matches!(
            flow.dismiss_match(Dismissal::Closed),
            Err(FlowError::InvalidTransition { state: FlowState::Discovering, .. })
        ));
    }

    #[test]
    fn test_peek_without_queue_is_empty() {
        let flow = FlowController::new();
        assert_eq!(flow.peek(3).count(), 0);
        assert!(flow.progress().is_none());
    }
}
