use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use shared::{
    error::ErrorBody,
    protocol::{ServiceRequestRecord, SubmitRequestBody, SubmitResponse},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};
use url::Url;

pub mod presentation;

pub use presentation::ServiceRequestView;

const COLLECTION_PATH: &str = "/services/apexrest/servicerequest";

/// Supplies the opaque session token attached to every outgoing request.
/// Fetched once during [`ServiceRequestClient::initialize`] and held for the
/// component's lifetime; there is no refresh or expiry handling.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn fetch_session_token(&self) -> Result<String>;
}

pub struct MissingSessionProvider;

#[async_trait]
impl SessionProvider for MissingSessionProvider {
    async fn fetch_session_token(&self) -> Result<String> {
        Err(anyhow!("session provider is unavailable"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::Success => "Success",
            NotificationKind::Error => "Error",
        }
    }
}

/// Displays a transient feedback message. Fire-and-forget: no return value,
/// no delivery guarantee beyond call order.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _kind: NotificationKind) {}
}

/// Field-level validity check over the draft, the seam where a host toolkit
/// plugs in its own reporting.
pub trait Validator: Send + Sync {
    fn validate(&self, draft: &FormDraft) -> bool;
}

/// Default validator: every required field must be non-blank.
pub struct RequiredFieldsValidator;

impl Validator for RequiredFieldsValidator {
    fn validate(&self, draft: &FormDraft) -> bool {
        !draft.subject.trim().is_empty() && !draft.description.trim().is_empty()
    }
}

/// In-progress new-request form state. Cleared to empty strings only after a
/// confirmed successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub subject: String,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum LoadRequestsError {
    #[error("list fetch returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("list fetch failed: {0}")]
    Transport(String),
}

impl LoadRequestsError {
    fn notification_text(&self) -> String {
        match self {
            LoadRequestsError::Http { status, message } if message.is_empty() => {
                format!("Error loading requests: {status}")
            }
            LoadRequestsError::Http { status, message } => {
                format!("Error loading requests: {status} {message}")
            }
            LoadRequestsError::Transport(detail) => format!("Error: {detail}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission returned {status}")]
    Http { status: u16, message: Option<String> },
    #[error("submission failed: {0}")]
    Transport(String),
}

impl SubmitError {
    fn notification_text(&self) -> String {
        match self {
            SubmitError::Http {
                message: Some(message),
                ..
            } => message.clone(),
            SubmitError::Http {
                status,
                message: None,
            } => format!("Error: {status}"),
            SubmitError::Transport(detail) => format!("Error: {detail}"),
        }
    }
}

/// Read-only view of the component state for presentation layers.
/// `requests` is the search-filtered list actually displayed;
/// `all_requests` is the full snapshot from the last successful fetch.
/// Both are `None` exactly when the last fetch failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSnapshot {
    pub requests: Option<Vec<ServiceRequestView>>,
    pub all_requests: Option<Vec<ServiceRequestView>>,
    pub search_term: String,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub draft: FormDraft,
}

struct ComponentState {
    session_token: Option<String>,
    all_requests: Option<Vec<ServiceRequestView>>,
    displayed_requests: Option<Vec<ServiceRequestView>>,
    search_term: String,
    loading: bool,
    submitting: bool,
    draft: FormDraft,
    load_generation: u64,
}

/// The service-request component: loads and filters the request list and
/// submits new requests, reporting outcomes through the injected [`Notifier`].
///
/// All failure handling happens at this boundary; the public operations
/// return `()` and leave the component usable (possibly with an unloaded
/// list) after any failure.
pub struct ServiceRequestClient {
    http: Client,
    collection_url: Url,
    session_provider: Arc<dyn SessionProvider>,
    validator: Arc<dyn Validator>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<ComponentState>,
}

impl ServiceRequestClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::new_with_dependencies(
            base_url,
            Arc::new(MissingSessionProvider),
            Arc::new(RequiredFieldsValidator),
            Arc::new(NullNotifier),
        )
    }

    pub fn new_with_dependencies(
        base_url: impl AsRef<str>,
        session_provider: Arc<dyn SessionProvider>,
        validator: Arc<dyn Validator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        let collection_url = base_url.join(COLLECTION_PATH)?;
        Ok(Self {
            http: Client::new(),
            collection_url,
            session_provider,
            validator,
            notifier,
            inner: Mutex::new(ComponentState {
                session_token: None,
                all_requests: Some(Vec::new()),
                displayed_requests: Some(Vec::new()),
                search_term: String::new(),
                loading: false,
                submitting: false,
                draft: FormDraft::default(),
                load_generation: 0,
            }),
        })
    }

    /// Fetches the session token once, then performs the initial list load.
    ///
    /// A failed token fetch is logged and otherwise swallowed: no
    /// notification, list left unloaded, no retry.
    pub async fn initialize(&self) {
        let token = match self.session_provider.fetch_session_token().await {
            Ok(token) => token,
            Err(err) => {
                error!("session token fetch failed: {err:#}");
                return;
            }
        };
        self.inner.lock().await.session_token = Some(token);
        self.load_requests().await;
    }

    /// Fetches the request list and replaces both caches wholesale.
    ///
    /// Each invocation is tagged with a generation number; a completion that
    /// is no longer the latest issued load neither writes the caches nor
    /// clears the loading flag (the newer load owns both).
    pub async fn load_requests(&self) {
        let generation = {
            let mut state = self.inner.lock().await;
            state.loading = true;
            state.load_generation += 1;
            state.load_generation
        };

        let result = self.fetch_requests().await;

        let mut state = self.inner.lock().await;
        if generation != state.load_generation {
            info!(
                generation,
                latest = state.load_generation,
                "discarding stale list fetch"
            );
            return;
        }
        state.loading = false;
        match result {
            Ok(views) => {
                info!(count = views.len(), "service request list loaded");
                state.all_requests = Some(views);
                Self::apply_filter(&mut state);
                drop(state);
                self.notifier
                    .notify("Requests loaded successfully.", NotificationKind::Success);
            }
            Err(err) => {
                state.all_requests = None;
                state.displayed_requests = None;
                drop(state);
                if let LoadRequestsError::Transport(detail) = &err {
                    error!("list fetch failed: {detail}");
                }
                self.notifier
                    .notify(&err.notification_text(), NotificationKind::Error);
            }
        }
    }

    async fn fetch_requests(&self) -> Result<Vec<ServiceRequestView>, LoadRequestsError> {
        let token = self
            .session_token()
            .await
            .map_err(|err| LoadRequestsError::Transport(err.to_string()))?;

        let response = self
            .http
            .get(self.collection_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("OAuth {token}"))
            .send()
            .await
            .map_err(|err| LoadRequestsError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(LoadRequestsError::Http {
                status: status.as_u16(),
                message: body.message.unwrap_or_default(),
            });
        }

        let records = response
            .json::<Vec<ServiceRequestRecord>>()
            .await
            .map_err(|err| LoadRequestsError::Transport(err.to_string()))?;

        Ok(records.into_iter().map(presentation::present).collect())
    }

    /// Stores the search term and re-derives the displayed cache from the
    /// full cache. Synchronous over in-memory state and idempotent.
    pub async fn set_search_term(&self, term: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.search_term = term.into();
        Self::apply_filter(&mut state);
    }

    fn apply_filter(state: &mut ComponentState) {
        // Nothing loaded: keep whatever the displayed cache holds.
        let Some(all) = state.all_requests.as_ref() else {
            return;
        };
        let term = state.search_term.to_lowercase();
        let displayed = if term.is_empty() {
            all.clone()
        } else {
            all.iter()
                .filter(|request| request.matches(&term))
                .cloned()
                .collect()
        };
        state.displayed_requests = Some(displayed);
    }

    /// Validates the draft, posts it, and on success resets the draft and
    /// awaits a full list reload so the new entry is visible.
    pub async fn submit_request(&self) {
        let draft = self.inner.lock().await.draft.clone();
        if !self.validator.validate(&draft) {
            self.notifier.notify(
                "Please fill out all required fields.",
                NotificationKind::Error,
            );
            return;
        }

        {
            let mut state = self.inner.lock().await;
            state.submitting = true;
            state.loading = true;
        }

        match self.post_request(&draft).await {
            Ok(response) => {
                let message = response
                    .message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| "Request sent successfully!".to_string());
                self.notifier.notify(&message, NotificationKind::Success);
                self.inner.lock().await.draft = FormDraft::default();
                self.load_requests().await;
            }
            Err(err) => {
                if let SubmitError::Transport(detail) = &err {
                    error!("service request submission failed: {detail}");
                }
                self.notifier
                    .notify(&err.notification_text(), NotificationKind::Error);
            }
        }

        let mut state = self.inner.lock().await;
        state.submitting = false;
        state.loading = false;
    }

    async fn post_request(&self, draft: &FormDraft) -> Result<SubmitResponse, SubmitError> {
        let token = self
            .session_token()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;

        let body = SubmitRequestBody {
            subject: draft.subject.clone(),
            description: draft.description.clone(),
        };

        let response = self
            .http
            .post(self.collection_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("OAuth {token}"))
            .json(&body)
            .send()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(SubmitError::Http {
                status: status.as_u16(),
                message: body.message.filter(|message| !message.is_empty()),
            });
        }

        response
            .json::<SubmitResponse>()
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))
    }

    async fn session_token(&self) -> Result<String> {
        self.inner
            .lock()
            .await
            .session_token
            .clone()
            .ok_or_else(|| anyhow!("no session token: initialize() has not succeeded"))
    }

    pub async fn set_subject(&self, subject: impl Into<String>) {
        self.inner.lock().await.draft.subject = subject.into();
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.inner.lock().await.draft.description = description.into();
    }

    /// Whether the displayed list holds at least one request.
    pub async fn has_requests(&self) -> bool {
        self.inner
            .lock()
            .await
            .displayed_requests
            .as_ref()
            .is_some_and(|requests| !requests.is_empty())
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.loading
    }

    pub async fn is_submitting(&self) -> bool {
        self.inner.lock().await.submitting
    }

    pub async fn snapshot(&self) -> ComponentSnapshot {
        let state = self.inner.lock().await;
        ComponentSnapshot {
            requests: state.displayed_requests.clone(),
            all_requests: state.all_requests.clone(),
            search_term: state.search_term.clone(),
            is_loading: state.loading,
            is_submitting: state.submitting,
            draft: state.draft.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
