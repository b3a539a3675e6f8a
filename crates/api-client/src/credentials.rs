//! Bearer token sources
//!
//! The client asks its [`CredentialProvider`] for a token on every request,
//! so a token refreshed by the login flow is picked up without rebuilding the
//! client. A provider returning `None` sends the request unauthenticated and
//! lets the backend reject it.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable read by [`EnvToken::default`]
pub const DEFAULT_TOKEN_VAR: &str = "RUTEKITA_TOKEN";

/// Supplies the current session's bearer token.
pub trait CredentialProvider: Send + Sync {
    /// The token to send right now, if any.
    fn bearer_token(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn bearer_token(&self) -> Option<String> {
        self()
    }
}

/// A fixed token, or none at all.
#[derive(Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Always send `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Never send a token.
    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.0.is_some() { "Some(<redacted>)" } else { "None" };
        f.debug_tuple("StaticToken").field(&format_args!("{shown}")).finish()
    }
}

/// Reads the token from an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read from `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable being read.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_VAR)
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|t| !t.trim().is_empty())
    }
}

/// Reads `access_token` from the session document written by the login flow.
///
/// The file is re-read on every call. A missing or unreadable file yields no
/// token.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

#[derive(Deserialize)]
struct SessionDocument {
    access_token: Option<String>,
}

impl SessionFile {
    /// Read from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for SessionFile {
    fn bearer_token(&self) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file not readable");
                return None;
            }
        };

        match serde_json::from_str::<SessionDocument>(&content) {
            Ok(doc) => doc.access_token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file is not valid JSON");
                None
            }
        }
    }
}

/// Tries each provider in order and uses the first token found.
#[derive(Default)]
pub struct ChainedCredentials {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentials {
    /// An empty chain, which never yields a token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain.
    #[must_use]
    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl CredentialProvider for ChainedCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.providers.iter().find_map(|p| p.bearer_token())
    }
}

impl fmt::Debug for ChainedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedCredentials")
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_static_token() {
        assert_eq!(StaticToken::new("abc").bearer_token().as_deref(), Some("abc"));
        assert_eq!(StaticToken::none().bearer_token(), None);
    }

    #[test]
    fn test_static_token_debug_redacts() {
        let debug = format!("{:?}", StaticToken::new("secret-value"));
        assert!(!debug.contains("secret-value"));
    }

    #[test]
    fn test_env_token_missing_var() {
        let provider = EnvToken::new("RUTEKITA_TEST_TOKEN_THAT_IS_NEVER_SET");
        assert_eq!(provider.bearer_token(), None);
    }

    #[test]
    fn test_closure_provider() {
        let provider = || Some("from-closure".to_string());
        assert_eq!(provider.bearer_token().as_deref(), Some("from-closure"));
    }

    #[test]
    fn test_session_file_reads_latest_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"user": {{"id": "1"}}, "access_token": "first"}}"#).unwrap();
        file.flush().unwrap();

        let provider = SessionFile::new(file.path());
        assert_eq!(provider.bearer_token().as_deref(), Some("first"));

        std::fs::write(file.path(), r#"{"access_token": "second"}"#).unwrap();
        assert_eq!(provider.bearer_token().as_deref(), Some("second"));
    }

    #[test]
    fn test_session_file_without_token() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"user": {"id": "1"}}"#).unwrap();
        assert_eq!(SessionFile::new(file.path()).bearer_token(), None);

        std::fs::write(file.path(), "not json").unwrap();
        assert_eq!(SessionFile::new(file.path()).bearer_token(), None);
    }

    #[test]
    fn test_chain_uses_first_available_token() {
        let chain = ChainedCredentials::new()
            .with(EnvToken::new("RUTEKITA_TEST_TOKEN_THAT_IS_NEVER_SET"))
            .with(StaticToken::none())
            .with(StaticToken::new("fallback"))
            .with(StaticToken::new("unused"));

        assert_eq!(chain.len(), 4);
        assert_eq!(chain.bearer_token().as_deref(), Some("fallback"));
        assert_eq!(ChainedCredentials::new().bearer_token(), None);
    }

    #[test]
    fn test_session_file_missing() {
        let provider = SessionFile::new("/nonexistent/rutekita/session.json");
        assert_eq!(provider.bearer_token(), None);
    }
}
