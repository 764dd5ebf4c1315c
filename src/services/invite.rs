use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use crate::core::FlowError;

/// Errors that can occur when redeeming an invite
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InviteError {
    #[error("Invite code not recognized: {0}")]
    InvalidCode(String),
}

impl From<InviteError> for FlowError {
    fn from(err: InviteError) -> Self {
        match err {
            InviteError::InvalidCode(code) => FlowError::InvalidCode(code),
        }
    }
}

/// Checks invite codes
#[async_trait]
pub trait InviteValidator: Send + Sync {
    async fn redeem(&self, code: &str) -> Result<(), InviteError>;
}

/// Validates against a fixed set of codes
///
/// An empty set accepts any non-blank code.
#[derive(Debug, Clone, Default)]
pub struct StaticInviteValidator {
    codes: HashSet<String>,
}

impl StaticInviteValidator {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(Into::into)
                .map(|code: String| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    /// Accept every non-blank code
    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.codes.is_empty()
    }
}

#[async_trait]
impl InviteValidator for StaticInviteValidator {
    async fn redeem(&self, code: &str) -> Result<(), InviteError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(InviteError::InvalidCode(code.to_string()));
        }
        if self.is_open() || self.codes.contains(code) {
            tracing::debug!("Invite code redeemed");
            Ok(())
        } else {
            Err(InviteError::InvalidCode(code.to_string()))
        }
    }
}
