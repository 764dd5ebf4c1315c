use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use validator::Validate;
use crate::core::FlowError;
use crate::models::ProfileSubmission;

/// Errors that can occur when submitting a profile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(String),
}

impl From<SubmitError> for FlowError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(message) => FlowError::ValidationError(message),
        }
    }
}

/// Receives the onboarding profile
#[async_trait]
pub trait ProfileSubmitter: Send + Sync {
    async fn submit(&self, profile: &ProfileSubmission) -> Result<(), SubmitError>;
}

/// Keeps the most recently accepted profile in memory
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    latest: Mutex<Option<ProfileSubmission>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<ProfileSubmission> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProfileSubmitter for InMemoryProfileStore {
    async fn submit(&self, profile: &ProfileSubmission) -> Result<(), SubmitError> {
        profile
            .validate()
            .map_err(|errors| SubmitError::Validation(errors.to_string()))?;

        *self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(profile.clone());
        tracing::debug!("Stored profile for {}", profile.first_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_profile(age: u8) -> ProfileSubmission {
        ProfileSubmission {
            first_name: "Ada".to_string(),
            age,
            photo: Some("ada.jpg".to_string()),
            bio: "Collector of stories".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_profile() {
        let store = InMemoryProfileStore::new();
        store.submit(&create_profile(30)).await.unwrap();

        assert_eq!(store.latest(), Some(create_profile(30)));
    }

    #[tokio::test]
    async fn test_invalid_profile_not_stored() {
        let store = InMemoryProfileStore::new();
        let err = store.submit(&create_profile(12)).await.unwrap_err();

        assert!(matches!(FlowError::from(err), FlowError::ValidationError(_)));
        assert!(store.latest().is_none());
    }
}
