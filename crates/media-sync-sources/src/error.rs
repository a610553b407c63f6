use std::fmt;

#[derive(Debug)]
pub struct SourceError {
    message: String,
    /// HTTP status of the failed request, when there was a response
    status: Option<u16>,
}

impl SourceError {
    pub fn new(message: String) -> Self {
        Self { message, status: None }
    }

    pub fn with_status(message: String, status: u16) -> Self {
        Self {
            message,
            status: Some(status),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {}

impl From<anyhow::Error> for SourceError {
    fn from(err: anyhow::Error) -> Self {
        let status = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<SourceError>())
            .and_then(SourceError::status);
        // `{:#}` keeps the context chain on one line
        Self {
            message: format!("{:#}", err),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_status_survives_anyhow_context() {
        let inner: anyhow::Result<()> = Err(SourceError::with_status("Failed to rate 550: 401".to_string(), 401).into());
        let err: SourceError = inner.context("rating movie").unwrap_err().into();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "rating movie: Failed to rate 550: 401");
    }

    #[test]
    fn test_plain_error_has_no_status() {
        let err: SourceError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "connection refused");
    }
}
