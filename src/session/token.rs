use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinTokenError {
    #[error("Join token does not start with the expected prefix")]
    MissingPrefix,

    #[error("Join token does not carry a valid session id: '{0}'")]
    InvalidSessionId(String),
}

/// Issues and parses `PREFIX:<sessionId>` join tokens (the text behind a join QR code)
#[derive(Debug, Clone)]
pub struct JoinTokenConfig {
    prefix: String,
}

impl JoinTokenConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn issue(&self, session_id: i64) -> String {
        format!("{}:{}", self.prefix, session_id)
    }

    #[instrument(skip(self))]
    pub fn parse(&self, token: &str) -> Result<i64, JoinTokenError> {
        let remainder = token
            .trim()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or(JoinTokenError::MissingPrefix)?;

        let session_id = remainder
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| JoinTokenError::InvalidSessionId(remainder.to_string()))?;

        debug!(session_id, "Join token parsed");
        Ok(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config() -> JoinTokenConfig {
        JoinTokenConfig::new("HOLESCORE")
    }

    #[test]
    fn issued_token_parses_back() {
        let token = config().issue(42);
        assert_eq!(token, "HOLESCORE:42");
        assert_eq!(config().parse(&token), Ok(42));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(config().parse("  HOLESCORE:7\n"), Ok(7));
    }

    #[rstest]
    #[case("42")]
    #[case("OTHER:42")]
    #[case("HOLESCORE42")]
    #[case("holescore:42")]
    #[case("")]
    fn rejects_missing_prefix(#[case] token: &str) {
        assert_eq!(config().parse(token), Err(JoinTokenError::MissingPrefix));
    }

    #[rstest]
    #[case("HOLESCORE:", "")]
    #[case("HOLESCORE:abc", "abc")]
    #[case("HOLESCORE:12x", "12x")]
    #[case("HOLESCORE:-3", "-3")]
    #[case("HOLESCORE:0", "0")]
    #[case("HOLESCORE:99999999999999999999", "99999999999999999999")]
    fn rejects_bad_session_ids(#[case] token: &str, #[case] remainder: &str) {
        assert_eq!(
            config().parse(token),
            Err(JoinTokenError::InvalidSessionId(remainder.to_string()))
        );
    }
}
