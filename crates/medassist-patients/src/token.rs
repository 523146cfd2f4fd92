use crate::error::FetchError;
use crate::source::BoxFuture;

/// Supplies the bearer credential for each patient-list read.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> BoxFuture<'_, Result<String, FetchError>>;
}

/// A fixed token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(****)")
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> BoxFuture<'_, Result<String, FetchError>> {
        Box::pin(async move { non_empty(self.0.clone(), "static token") })
    }
}

/// Reads the token from an environment variable on every call, so a
/// rotated token is picked up without rebuilding the selector.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn bearer_token(&self) -> BoxFuture<'_, Result<String, FetchError>> {
        Box::pin(async move {
            let token = std::env::var(&self.var)
                .map_err(|e| FetchError::Credential(format!("{}: {e}", self.var)))?;
            non_empty(token, &self.var)
        })
    }
}

fn non_empty(token: String, origin: &str) -> Result<String, FetchError> {
    if token.trim().is_empty() {
        return Err(FetchError::Credential(format!("{origin} is empty")));
    }
    Ok(token)
}
