use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::core::FlowError;
use crate::models::Candidate;

/// Errors that can occur when loading candidates
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog format: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}

impl From<CatalogError> for FlowError {
    fn from(err: CatalogError) -> Self {
        FlowError::CatalogUnavailable(err.to_string())
    }
}

/// Source of the candidates presented in a session
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_candidates(&self) -> Result<Vec<Candidate>, CatalogError>;
}

/// Fixed, in-memory candidate list
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    candidates: Vec<Candidate>,
}

impl StaticCatalog {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// The five curated introductions used for demos
    pub fn demo() -> Self {
        let candidate = |id: &str, name: &str, age: u8, title: &str, bio: &str, photo: &str| Candidate {
            id: id.to_string(),
            name: name.to_string(),
            age,
            title: title.to_string(),
            bio: bio.to_string(),
            photo: photo.to_string(),
        };

        Self::new(vec![
            candidate(
                "1",
                "Alexander",
                32,
                "Investment Banker",
                "Passionate about art, fine dining, and weekend adventures in the Hamptons.",
                "https://images.unsplash.com/photo-1672685667592-0392f458f46f?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxwcm9mZXNzaW9uYWwlMjBtYW4lMjBwb3J0cmFpdHxlbnwxfHx8fDE3NTY2MTgyNzF8MA&ixlib=rb-4.1.0&q=80&w=1080&utm_source=figma&utm_medium=referral",
            ),
            candidate(
                "2",
                "Marcus",
                29,
                "Tech Entrepreneur",
                "Building the future while collecting vintage watches and sailing on weekends.",
                "https://images.unsplash.com/photo-1679485895677-2e685b04c3e2?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxoYW5kc29tZSUyMGJ1c2luZXNzbWFuJTIwcG9ydHJhaXR8ZW58MXx8fHwxNzU2NjE4MjczfDA&ixlib=rb-4.1.0&q=80&w=1080&utm_source=figma&utm_medium=referral",
            ),
            candidate(
                "3",
                "Sebastian",
                35,
                "Architect",
                "Designing spaces that inspire, with a love for jazz and Mediterranean cuisine.",
                "https://images.unsplash.com/photo-1754485115880-fc5d5103d0b7?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxjb25maWRlbnQlMjBtYW4lMjBoZWFkc2hvdHxlbnwxfHx8fDE3NTY2MTgyNzN8MA&ixlib=rb-4.1.0&q=80&w=1080&utm_source=figma&utm_medium=referral",
            ),
            candidate(
                "4",
                "Julian",
                31,
                "Art Dealer",
                "Curator of beauty, collector of stories, believer in serendipitous encounters.",
                "https://images.unsplash.com/photo-1568184737116-394a80864236?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxzb3BoaXN0aWNhdGVkJTIwbWFuJTIwcG9ydHJhaXR8ZW58MXx8fHwxNzU2NjE4MjczfDA&ixlib=rb-4.1.0&q=80&w=1080&utm_source=figma&utm_medium=referral",
            ),
            candidate(
                "5",
                "Maximilian",
                28,
                "Sommelier",
                "Discovering exceptional wines and sharing them with those who appreciate the finer things.",
                "https://images.unsplash.com/photo-1609818902866-a1076a14484a?crop=entropy&cs=tinysrgb&fit=max&fm=jpg&ixid=M3w3Nzg4Nzd8MHwxfHNlYXJjaHwxfHxlbGVnYW50JTIwbWFuJTIwcGhvdG98ZW58MXx8fHwxNzU2NjE4MjczfDA&ixlib=rb-4.1.0&q=80&w=1080&utm_source=figma&utm_medium=referral",
            ),
        ])
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load_candidates(&self) -> Result<Vec<Candidate>, CatalogError> {
        Ok(self.candidates.clone())
    }
}

/// Candidates read from a JSON array on disk
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load_candidates(&self) -> Result<Vec<Candidate>, CatalogError> {
        tracing::debug!("Loading catalog from {}", self.path.display());

        let bytes = tokio::fs::read(&self.path).await.map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let candidates: Vec<Candidate> = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded {} candidates from {}", candidates.len(), self.path.display());
        Ok(candidates)
    }
}
