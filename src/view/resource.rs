use serde::Serialize;
use tracing::{info, warn};

use crate::gateway::GatewayError;

/// Where a remote resource stands, independent of what is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Pending,
    Ready,
    Empty,
    Failed(String),
}

/// A fetched value and its status.
///
/// Failures keep the previous value so views degrade instead of erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource<T> {
    pub value: T,
    pub status: FetchStatus,
}

impl<T> Resource<T> {
    pub fn apply(
        &mut self,
        name: &str,
        result: Result<T, GatewayError>,
        is_empty: impl FnOnce(&T) -> bool,
    ) {
        match result {
            Ok(value) => {
                self.status = if is_empty(&value) {
                    FetchStatus::Empty
                } else {
                    FetchStatus::Ready
                };
                info!(resource = name, status = ?self.status, "resource loaded");
                self.value = value;
            }
            Err(e) => {
                warn!(resource = name, error = %e, "fetch failed, keeping previous value");
                self.status = FetchStatus::Failed(e.to_string());
            }
        }
    }
}

impl<T> Resource<Vec<T>> {
    pub fn apply_list(&mut self, name: &str, result: Result<Vec<T>, GatewayError>) {
        self.apply(name, result, |v| v.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> GatewayError {
        GatewayError::Status {
            endpoint: "efficiency_7_days",
            status: 502,
            body: String::new(),
        }
    }

    #[test]
    fn test_apply_success_and_empty() {
        let mut r: Resource<Vec<u8>> = Resource::default();
        assert_eq!(r.status, FetchStatus::Pending);
        r.apply_list("x", Ok(vec![1, 2]));
        assert_eq!(r.status, FetchStatus::Ready);
        r.apply_list("x", Ok(vec![]));
        assert_eq!(r.status, FetchStatus::Empty);
        assert!(r.value.is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let mut r: Resource<Vec<u8>> = Resource::default();
        r.apply_list("x", Ok(vec![7]));
        r.apply_list("x", Err(failure()));
        assert_eq!(r.value, vec![7]);
        assert!(matches!(r.status, FetchStatus::Failed(ref m) if m.contains("502")));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(FetchStatus::Failed("boom".into())).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");
        let json = serde_json::to_value(FetchStatus::Ready).unwrap();
        assert_eq!(json["state"], "ready");
    }
}
