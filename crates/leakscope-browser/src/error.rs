use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("blocked by search engine: {0}")]
    Blocked(String),

    #[error("extraction failed: {0}")]
    ExtractionError(String),

    #[error("screenshot failed: {0}")]
    ScreenshotError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::NavigationError("connection reset".to_string());
        assert_eq!(err.to_string(), "navigation failed: connection reset");
    }

    #[test]
    fn test_blocked_error() {
        let err = BrowserError::Blocked("unusual traffic interstitial".to_string());
        assert!(err.to_string().contains("blocked"));
    }
}
