//! Errors surfaced by place resolution.

use std::time::Duration;
use thiserror::Error;

use crate::models::FeatureClass;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Store returned a row of unexpected shape. Fatal for the call.
    #[error("malformed class {class} row from spatial store: {reason}")]
    MalformedRow { class: FeatureClass, reason: String },

    /// Infrastructure failure, passed through unchanged
    #[error(transparent)]
    Store(StoreError),

    #[error("resolution timed out after {0:?}")]
    Timeout(Duration),
}

impl From<StoreError> for ResolutionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedRow { class, reason } => {
                ResolutionError::MalformedRow { class, reason }
            }
            other => ResolutionError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_store_rows_become_resolution_errors() {
        let err: ResolutionError = StoreError::MalformedRow {
            class: FeatureClass::P,
            reason: "missing distance".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            ResolutionError::MalformedRow {
                class: FeatureClass::P,
                ..
            }
        ));
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err: ResolutionError = StoreError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, ResolutionError::Store(StoreError::Unavailable(_))));
        assert_eq!(err.to_string(), "spatial store unavailable: connection refused");
    }
}
