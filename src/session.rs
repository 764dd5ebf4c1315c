use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;
use crate::core::{FlowController, FlowError, MatchPolicy, RandomMatchPolicy};
use crate::models::{
    Candidate, Decision, DecisionOutcome, Dismissal, FlowState, InviteRequest, MatchedCandidate,
    Notification, ProfileSubmission, SessionSnapshot,
};
use crate::services::{
    CatalogSource, InMemoryProfileStore, InviteValidator, NotificationSink, ProfileSubmitter,
    StaticCatalog, StaticInviteValidator, TracingSink,
};

/// Number of cards rendered beneath the top one, plus the top one
pub const DEFAULT_PEEK_DEPTH: usize = 3;

/// External collaborators a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogSource>,
    pub invites: Arc<dyn InviteValidator>,
    pub profiles: Arc<dyn ProfileSubmitter>,
    pub matcher: Arc<dyn MatchPolicy>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl Collaborators {
    /// Demo catalog, any invite code, in-memory profiles, default match odds, logged notifications
    pub fn demo() -> Self {
        Self {
            catalog: Arc::new(StaticCatalog::demo()),
            invites: Arc::new(StaticInviteValidator::open()),
            profiles: Arc::new(InMemoryProfileStore::new()),
            matcher: Arc::new(RandomMatchPolicy::default()),
            notifier: Arc::new(TracingSink),
        }
    }
}

/// One user's pass through invite, onboarding, discovery and matches
///
/// The flow lock is never held across an await, so overlapping submissions
/// can be in flight; only the most recent one commits.
pub struct Session {
    id: Uuid,
    collaborators: Collaborators,
    peek_depth: usize,
    flow: Mutex<FlowController>,
}

impl Session {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            id: Uuid::new_v4(),
            collaborators,
            peek_depth: DEFAULT_PEEK_DEPTH,
            flow: Mutex::new(FlowController::new()),
        }
    }

    pub fn with_peek_depth(mut self, peek_depth: usize) -> Self {
        self.peek_depth = peek_depth;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn peek_depth(&self) -> usize {
        self.peek_depth
    }

    fn flow(&self) -> MutexGuard<'_, FlowController> {
        self.flow.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> FlowState {
        self.flow().state()
    }

    pub fn current(&self) -> Option<Candidate> {
        self.flow().current().cloned()
    }

    pub fn peek(&self, n: usize) -> Vec<Candidate> {
        self.flow().peek(n).cloned().collect()
    }

    /// The visible card stack
    pub fn stack(&self) -> Vec<Candidate> {
        self.peek(self.peek_depth)
    }

    pub fn current_match(&self) -> Option<MatchedCandidate> {
        self.flow().current_match().cloned()
    }

    pub fn profile(&self) -> Option<ProfileSubmission> {
        self.flow().profile().cloned()
    }

    /// Decisions recorded so far, in deck order
    pub fn decisions(&self) -> Vec<(String, Decision)> {
        self.flow()
            .queue()
            .map(|queue| queue.decided().map(|(c, d)| (c.id.clone(), d)).collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let flow = self.flow();
        SessionSnapshot {
            session_id: self.id,
            state: flow.state(),
            progress: flow.progress(),
            current: flow.current().cloned(),
            current_match: flow.current_match().cloned(),
        }
    }

    /// Redeem an invite code and load the catalog
    ///
    /// The catalog is only loaded once the code is accepted.
    pub async fn redeem_invite(&self, code: &str) -> Result<(), FlowError> {
        let request = InviteRequest::new(code);
        let ticket = self.flow().begin_invite(&request)?;
        let code = request.normalized_code().unwrap_or_default();

        tracing::info!("Session {}: redeeming invite (request #{})", self.id, ticket.generation);

        if let Err(e) = self.collaborators.invites.redeem(code).await {
            self.flow().abandon(ticket)?;
            tracing::info!("Session {}: invite rejected: {}", self.id, e);
            return Err(e.into());
        }

        // Superseded requests never load the catalog
        if let Err(e) = self.flow().ensure_current(ticket) {
            tracing::info!("Session {}: invite request #{} superseded", self.id, ticket.generation);
            return Err(e);
        }

        let candidates = match self.collaborators.catalog.load_candidates().await {
            Ok(candidates) => candidates,
            Err(e) => {
                self.flow().abandon(ticket)?;
                tracing::error!("Session {}: failed to load catalog: {}", self.id, e);
                return Err(e.into());
            }
        };

        self.flow().complete_invite(ticket, candidates)
    }

    /// Validate and submit the onboarding profile
    pub async fn submit_profile(&self, profile: &ProfileSubmission) -> Result<(), FlowError> {
        let (ticket, profile) = self.flow().begin_profile(profile)?;

        tracing::info!("Session {}: submitting profile (request #{})", self.id, ticket.generation);

        if let Err(e) = self.collaborators.profiles.submit(&profile).await {
            self.flow().abandon(ticket)?;
            tracing::info!("Session {}: profile rejected: {}", self.id, e);
            return Err(e.into());
        }

        self.flow().complete_profile(ticket, profile)
    }

    /// Record a decision on the current candidate
    ///
    /// Never suspends. Notifications go out after the decision is committed.
    pub fn decide(&self, candidate_id: &str, decision: Decision) -> Result<DecisionOutcome, FlowError> {
        let outcome = self
            .flow()
            .decide(candidate_id, decision, &*self.collaborators.matcher)?;

        self.collaborators
            .notifier
            .notify(Notification::Decision(outcome.event.clone()));
        if let Some(matched) = &outcome.matched {
            self.collaborators
                .notifier
                .notify(Notification::Match(matched.clone()));
        }
        if outcome.exhausted {
            tracing::info!("Session {}: deck exhausted", self.id);
        }

        Ok(outcome)
    }

    pub fn dismiss_match(&self, dismissal: Dismissal) -> Result<MatchedCandidate, FlowError> {
        self.flow().dismiss_match(dismissal)
    }
}
