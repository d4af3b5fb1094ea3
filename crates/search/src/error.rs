/// Error type for text-index requests.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The index returned a non-2xx status code.
    #[error("Index returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected index response: {0}")]
    Decode(String),
}
