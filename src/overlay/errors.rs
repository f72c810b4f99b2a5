#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("{operation} failed: {message}")]
    Os {
        operation: &'static str,
        message: String,
    },

    #[error("Main window has been closed")]
    Closed,

    #[error("Main window did not report a handle within {seconds}s")]
    CreationTimedOut { seconds: u64 },
}

impl WindowError {
    pub fn os(operation: &'static str, message: impl Into<String>) -> Self {
        WindowError::Os {
            operation,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WindowError::Os { .. } => "WINDOW_OS_CALL_FAILED",
            WindowError::Closed => "WINDOW_CLOSED",
            WindowError::CreationTimedOut { .. } => "WINDOW_CREATION_TIMED_OUT",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("Invalid monitor index {index} ({count} monitor(s) available)")]
    InvalidIndex { index: usize, count: usize },

    #[error(transparent)]
    Window(#[from] WindowError),
}

impl PlacementError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PlacementError::InvalidIndex { .. } => "PLACEMENT_INVALID_INDEX",
            PlacementError::Window(e) => e.error_code(),
        }
    }

    /// Caused by the caller's input rather than the OS.
    pub fn is_user_error(&self) -> bool {
        matches!(self, PlacementError::InvalidIndex { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_index_display() {
        let error = PlacementError::InvalidIndex { index: 3, count: 2 };
        assert_eq!(
            error.to_string(),
            "Invalid monitor index 3 (2 monitor(s) available)"
        );
        assert_eq!(error.error_code(), "PLACEMENT_INVALID_INDEX");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_window_error_passes_through() {
        let error: PlacementError = WindowError::os("SetWindowPos", "access denied").into();
        assert_eq!(error.to_string(), "SetWindowPos failed: access denied");
        assert_eq!(error.error_code(), "WINDOW_OS_CALL_FAILED");
        assert!(!error.is_user_error());
    }
}
