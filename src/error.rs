use thiserror::Error;

/// External system a request-ending failure came from. Adverse-event
/// failures never end a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    ProductData,
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Upstream::ProductData => write!(f, "product data source"),
        }
    }
}

/// Failures that end an analysis request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid barcode '{0}': expected 8 to 14 digits")]
    InvalidBarcode(String),

    #[error("product {0} not found in the product database")]
    ProductNotFound(String),

    #[error("{0} timed out")]
    UpstreamTimeout(Upstream),

    #[error("{upstream} unavailable: {reason}")]
    UpstreamUnavailable { upstream: Upstream, reason: String },
}

impl AnalysisError {
    /// Classify a transport error from `upstream`.
    pub fn from_transport(upstream: Upstream, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::UpstreamTimeout(upstream)
        } else {
            AnalysisError::UpstreamUnavailable {
                upstream,
                reason: err.to_string(),
            }
        }
    }

    /// Short machine-readable kind, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidBarcode(_) => "invalid_barcode",
            AnalysisError::ProductNotFound(_) => "not_found",
            AnalysisError::UpstreamTimeout(_) => "upstream_timeout",
            AnalysisError::UpstreamUnavailable { .. } => "upstream_unavailable",
        }
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            AnalysisError::InvalidBarcode(_) => 2,
            AnalysisError::ProductNotFound(_) => 3,
            AnalysisError::UpstreamTimeout(_) => 4,
            AnalysisError::UpstreamUnavailable { .. } => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_exit_codes_are_distinct() {
        let errors = [
            AnalysisError::InvalidBarcode("12".into()),
            AnalysisError::ProductNotFound("12345678".into()),
            AnalysisError::UpstreamTimeout(Upstream::ProductData),
            AnalysisError::UpstreamUnavailable {
                upstream: Upstream::ProductData,
                reason: "connection refused".into(),
            },
        ];
        let mut codes: Vec<i32> = errors.iter().map(AnalysisError::exit_code).collect();
        codes.dedup();
        assert_eq!(codes, vec![2, 3, 4, 5]);
        assert_eq!(errors[2].kind(), "upstream_timeout");
    }

    #[test]
    fn test_display() {
        let err = AnalysisError::UpstreamTimeout(Upstream::ProductData);
        assert_eq!(err.to_string(), "product data source timed out");
    }
}
