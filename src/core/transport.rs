//! Transport client for the Edris backend.
//!
//! One query is ever in flight (the session controller enforces that); this
//! module only moves a request onto a tokio task and delivers the outcome on
//! a channel the event loop drains. All transport-level failures collapse to
//! [`QueryOutcome::Failed`]; the cause is recorded via `tracing` but never
//! shown to the caller.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{QueryRequest, QueryResponse};
use crate::utils::url::construct_api_url;

/// Fixed connect/response timeout for every backend call.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub enum QueryOutcome {
    Response(String),
    Failed,
}

pub struct QueryParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub request: QueryRequest,
    pub generation: u64,
}

/// Spawns backend calls and forwards their outcomes, tagged with the request
/// generation, to the receiver handed out at construction.
#[derive(Clone)]
pub struct QueryService {
    tx: mpsc::UnboundedSender<(QueryOutcome, u64)>,
    shutdown: CancellationToken,
}

impl QueryService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(QueryOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                shutdown: CancellationToken::new(),
            },
            rx,
        )
    }

    pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(QUERY_TIMEOUT).build()
    }

    pub fn spawn_query(&self, params: QueryParams) {
        let tx = self.tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let QueryParams {
                client,
                base_url,
                request,
                generation,
            } = params;

            tokio::select! {
                outcome = dispatch_query(&client, &base_url, &request) => {
                    let _ = tx.send((outcome, generation));
                }
                _ = shutdown.cancelled() => {}
            }
        });
    }

    /// Fire-and-forget upload of stack files. There is no feedback loop to
    /// the UI; failures are logged so they are at least diagnosable.
    pub fn spawn_upload(
        &self,
        client: reqwest::Client,
        base_url: String,
        stack_id: String,
        files: Vec<PathBuf>,
    ) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = dispatch_upload(&client, &base_url, &stack_id, files) => {}
                _ = shutdown.cancelled() => {}
            }
        });
    }

    /// Abandon any in-flight tasks. Their outcomes are simply discarded.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    #[cfg(test)]
    pub fn send_for_test(&self, outcome: QueryOutcome, generation: u64) {
        let _ = self.tx.send((outcome, generation));
    }
}

async fn dispatch_query(
    client: &reqwest::Client,
    base_url: &str,
    request: &QueryRequest,
) -> QueryOutcome {
    let url = construct_api_url(base_url, "query");

    match client.post(url).json(request).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<no body>".to_string());
                tracing::warn!(%status, body, "query rejected by server");
                return QueryOutcome::Failed;
            }

            match response.json::<QueryResponse>().await {
                Ok(parsed) => QueryOutcome::Response(parsed.response),
                Err(e) => {
                    tracing::warn!(error = %e, "malformed query response body");
                    QueryOutcome::Failed
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "query transport failure");
            QueryOutcome::Failed
        }
    }
}

async fn dispatch_upload(
    client: &reqwest::Client,
    base_url: &str,
    stack_id: &str,
    files: Vec<PathBuf>,
) {
    let mut form = reqwest::multipart::Form::new().text("stackId", stack_id.to_string());
    let mut attached = 0usize;

    for path in files {
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".to_string());
                form = form.part(
                    "files",
                    reqwest::multipart::Part::bytes(bytes).file_name(file_name),
                );
                attached += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable upload file");
            }
        }
    }

    if attached == 0 {
        tracing::warn!(stack_id, "no readable files; upload skipped");
        return;
    }

    let url = construct_api_url(base_url, "knowledge/upload");
    match client.post(url).multipart(form).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(stack_id, attached, "uploaded stack files");
        }
        Ok(response) => {
            tracing::warn!(stack_id, status = %response.status(), "upload rejected by server");
        }
        Err(e) => {
            tracing::warn!(stack_id, error = %e, "upload transport failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_carry_their_generation() {
        let (service, mut rx) = QueryService::new();

        service.send_for_test(QueryOutcome::Response("Hi".to_string()), 3);
        service.send_for_test(QueryOutcome::Failed, 4);

        let (outcome, generation) = rx.try_recv().expect("first outcome");
        assert_eq!(generation, 3);
        assert!(matches!(outcome, QueryOutcome::Response(text) if text == "Hi"));

        let (outcome, generation) = rx.try_recv().expect("second outcome");
        assert_eq!(generation, 4);
        assert!(matches!(outcome, QueryOutcome::Failed));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unreachable_server_resolves_to_failed() {
        let (service, mut rx) = QueryService::new();
        let client = QueryService::build_client().expect("client");

        service.spawn_query(QueryParams {
            client,
            // Port 9 (discard) is a safe never-listening target.
            base_url: "http://127.0.0.1:9".to_string(),
            request: QueryRequest {
                prompt: "hello".to_string(),
                kind: "text".to_string(),
                history: Vec::new(),
                modes: Vec::new(),
                model_settings: crate::api::ModelSettings::default(),
                knowledge_stacks: Vec::new(),
            },
            generation: 1,
        });

        let (outcome, generation) = rx.recv().await.expect("outcome");
        assert_eq!(generation, 1);
        assert!(matches!(outcome, QueryOutcome::Failed));
    }
}
