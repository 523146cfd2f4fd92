use std::future::Future;
use std::pin::Pin;

use reqwest::header::ACCEPT;

use crate::error::FetchError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Status and body of one patient-list read, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where the patient list comes from.
///
/// Implementations perform exactly one read per call and never retry;
/// timeouts are their own business. Methods return boxed futures for dyn
/// compatibility.
pub trait PatientSource: Send + Sync {
    fn fetch<'a>(&'a self, bearer_token: &'a str) -> BoxFuture<'a, Result<RawResponse, FetchError>>;
}

/// `GET {base_url}{path}` with a bearer token.
pub struct HttpPatientSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPatientSource {
    pub fn new(base_url: &str, path: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, path)
    }

    /// Reuse an existing client (connection pool, timeouts, proxies).
    pub fn with_client(client: reqwest::Client, base_url: &str, path: &str) -> Self {
        Self {
            client,
            url: join_url(base_url, path),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PatientSource for HttpPatientSource {
    fn fetch<'a>(
        &'a self,
        bearer_token: &'a str,
    ) -> BoxFuture<'a, Result<RawResponse, FetchError>> {
        Box::pin(async move {
            tracing::debug!(url = %self.url, "fetching patient list");

            let response = self
                .client
                .get(&self.url)
                .bearer_auth(bearer_token)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
                .to_vec();

            Ok(RawResponse { status, body })
        })
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::join_url;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("https://api.example.org/", "/api/patients"),
            "https://api.example.org/api/patients"
        );
        assert_eq!(
            join_url("https://api.example.org", "api/patients"),
            "https://api.example.org/api/patients"
        );
        assert_eq!(join_url("https://api.example.org/", ""), "https://api.example.org");
    }
}
