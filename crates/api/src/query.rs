//! Shared query parameter types for API handlers.

use forgefit_core::workout::StatusFilter;
use serde::Deserialize;

use crate::error::AppError;

/// `?status=` with values `all`, `planned`, `in-progress` or `completed`.
/// Absent means `all`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

impl StatusParams {
    pub fn filter(&self) -> Result<StatusFilter, AppError> {
        match self.status.as_deref() {
            None | Some("") => Ok(StatusFilter::All),
            Some(raw) => raw.parse().map_err(AppError::BadRequest),
        }
    }
}

/// `?limit=` for capped listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    pub fn clamped(&self, default: i64, max: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

#[cfg(test)]
mod tests {
    use forgefit_core::workout::SessionStatus;

    use super::*;

    #[test]
    fn missing_status_means_all() {
        assert_eq!(StatusParams::default().filter().unwrap(), StatusFilter::All);
    }

    #[test]
    fn known_status_is_parsed() {
        let params = StatusParams {
            status: Some("completed".to_string()),
        };
        assert_eq!(
            params.filter().unwrap(),
            StatusFilter::Only(SessionStatus::Completed)
        );
    }

    #[test]
    fn unknown_status_is_bad_request() {
        let params = StatusParams {
            status: Some("paused".to_string()),
        };
        assert!(matches!(params.filter(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(LimitParams { limit: None }.clamped(50, 200), 50);
        assert_eq!(LimitParams { limit: Some(0) }.clamped(50, 200), 1);
        assert_eq!(LimitParams { limit: Some(999) }.clamped(50, 200), 200);
    }
}
