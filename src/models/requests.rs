use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile entered during onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileSubmission {
    #[validate(length(min = 1, max = 50))]
    #[serde(alias = "first_name", rename = "firstName")]
    pub first_name: String,
    #[validate(range(min = 18, max = 100))]
    pub age: u8,
    #[serde(default)]
    pub photo: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub bio: String,
}

impl ProfileSubmission {
    /// Trim free-text fields so whitespace-only input fails the length checks
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            age: self.age,
            photo: self
                .photo
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            bio: self.bio.trim().to_string(),
        }
    }
}

/// Invite code as typed by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteRequest {
    pub code: String,
}

impl InviteRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Trimmed code, or `None` when nothing usable was entered
    pub fn normalized_code(&self) -> Option<&str> {
        let code = self.code.trim();
        (!code.is_empty()).then_some(code)
    }
}
