//! Error types for fetching and rendering

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error (network, HTTP status, undecodable body)
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// The response carried GraphQL errors and no data
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// The response did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Repository {0} not found or not accessible")]
    RepositoryNotFound(String),

    #[error("Invalid repository reference: {0}. Expected owner/name")]
    InvalidRepository(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
