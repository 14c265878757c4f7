//! Recognition Client
//!
//! Translates free text ("dolo 12") into zero or more [`SaleLine`]s by
//! asking the external line-recognition service. The matching engine itself
//! lives on the server; this side only ships text and decodes results.
//!
//! This is the one suspension point of the editor. A call is issued with a
//! [`RecognitionRequest`] that remembers where its result belongs, and the
//! answer comes back as a [`RecognitionOutcome`] that the editor checks for
//! staleness before touching the store.

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpRecognitionClient;

use crate::model::SaleLine;

/// Failures of a recognition call.
///
/// None of these are fatal: the editor keeps the pending text, logs the
/// error and lets the operator retry.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Nothing to recognize after trimming
    #[error("recognition text is empty")]
    EmptyInput,

    /// Network-level failure (connect, timeout, body read)
    #[error("recognition service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("recognition service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Body was not a JSON array of sale lines
    #[error("malformed recognition response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Client-specific failure that has no transport behind it
    #[error("recognition failed: {0}")]
    Unavailable(String),
}

/// Where a recognition result must land
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognitionTarget {
    /// Fresh text from the tail input; results are appended
    Tail,
    /// Re-edit of the line at this index; results replace it
    Line(usize),
}

/// Identifier of one recognition call, unique per editor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// A recognition call the surface must run, captured at commit time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionRequest {
    /// Call identity, used to reject stale results
    pub id: RequestId,
    /// Where the result goes
    pub target: RecognitionTarget,
    /// Trimmed text to recognize
    pub text: String,
}

/// A finished recognition call, ready to be reconciled
#[derive(Debug)]
pub struct RecognitionOutcome {
    /// The request this answers
    pub request: RecognitionRequest,
    /// Lines produced, or why none were
    pub result: Result<Vec<SaleLine>, RecognitionError>,
}

/// Line-recognition service
///
/// Implement this trait to plug in a different transport (or a mock in
/// tests). Implementations must not touch editor state.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Client name for logs (e.g., "http")
    fn name(&self) -> &'static str;

    /// Recognize one line of free text.
    ///
    /// An empty vector is a valid answer: the service judged the text
    /// non-actionable.
    async fn recognize(&self, text: &str) -> Result<Vec<SaleLine>, RecognitionError>;

    /// Whether the service looks reachable
    async fn health_check(&self) -> bool {
        true
    }
}

/// Run `request` against `client`, producing an outcome
pub async fn run_request<C>(client: &C, request: RecognitionRequest) -> RecognitionOutcome
where
    C: RecognitionClient + ?Sized,
{
    let result = client.recognize(&request.text).await;
    RecognitionOutcome { request, result }
}
