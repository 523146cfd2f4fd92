#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use medassist_patients::source::BoxFuture;
use medassist_patients::{FetchError, PatientSelector, PatientSource, RawResponse, StaticToken};
use tokio::sync::oneshot;

/// Scripted source: each `fetch` pops the next reply and records the token.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    tokens: Mutex<Vec<String>>,
}

pub enum Reply {
    Now(Result<RawResponse, FetchError>),
    Later(oneshot::Receiver<Result<RawResponse, FetchError>>),
}

impl ScriptedSource {
    pub fn push(&self, reply: Result<RawResponse, FetchError>) {
        self.replies.lock().unwrap().push_back(Reply::Now(reply));
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.push(Ok(RawResponse::ok(body.to_string())));
    }

    /// Reply held back until the returned sender fires.
    pub fn push_deferred(&self) -> oneshot::Sender<Result<RawResponse, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

impl PatientSource for ScriptedSource {
    fn fetch<'a>(
        &'a self,
        bearer_token: &'a str,
    ) -> BoxFuture<'a, Result<RawResponse, FetchError>> {
        self.tokens.lock().unwrap().push(bearer_token.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        Box::pin(async move {
            match reply {
                Some(Reply::Now(result)) => result,
                Some(Reply::Later(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Transport("sender dropped".to_string()))),
                None => Err(FetchError::Transport("no scripted reply".to_string())),
            }
        })
    }
}

pub fn selector(source: &Arc<ScriptedSource>) -> PatientSelector {
    PatientSelector::new(source.clone(), Arc::new(StaticToken::new("test-token")))
}

pub fn roster() -> serde_json::Value {
    serde_json::json!([
        { "id": 1, "first_name": "Anna", "last_name": "Bianchi", "status": "critical" },
        { "id": 2, "first_name": "Marco", "last_name": "Rossi" },
        { "id": 3, "first_name": "Annamaria", "last_name": "Verdi", "status": "monitoring" }
    ])
}
