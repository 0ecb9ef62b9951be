//! Access to the enrollment record endpoint: the national-id lookup and the
//! final form submission, both posted as `multipart/form-data`.

pub mod bridge;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiError, ApiException, ErrorCode},
    protocol::{LookupOutcome, SearchRequest, SearchResponse, SubmitOutcome, SubmitRequest, SubmitResponse},
};
use tracing::{debug, warn};
use url::Url;

#[async_trait]
pub trait RecordBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse>;
}

/// Stand-in used when no endpoint is configured; every call fails.
pub struct MissingRecordBackend;

#[async_trait]
impl RecordBackend for MissingRecordBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        Err(ApiException::new(
            ErrorCode::Internal,
            format!(
                "record endpoint unavailable for lookup by {}",
                request.search_type
            ),
        )
        .into())
    }

    async fn submit(&self, _request: &SubmitRequest) -> Result<SubmitResponse> {
        Err(ApiException::new(
            ErrorCode::Internal,
            "record endpoint unavailable for submission",
        )
        .into())
    }
}

pub struct HttpRecordBackend {
    http: Client,
    endpoint: Url,
}

impl HttpRecordBackend {
    pub fn new(endpoint_url: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint_url)
            .with_context(|| format!("invalid record endpoint '{endpoint_url}'"))?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_form<T: DeserializeOwned>(&self, form: Form, action: &str) -> Result<T> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("{action} request failed"))?
            .error_for_status()?;
        let body = res
            .text()
            .await
            .with_context(|| format!("failed to read {action} response"))?;
        debug!(action, bytes = body.len(), "record endpoint answered");
        serde_json::from_str(&body).map_err(|err| {
            ApiException::new(
                ErrorCode::Contract,
                format!("invalid {action} response from record endpoint: {err}"),
            )
            .into()
        })
    }
}

#[async_trait]
impl RecordBackend for HttpRecordBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let form = request
            .form_parts()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        self.post_form(form, "search").await
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse> {
        let form = request
            .fields
            .iter()
            .cloned()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        self.post_form(form, "submit").await
    }
}

/// Folds a failed call into the error shown to the user. Errors raised as
/// [`ApiException`] keep their code; anything else came from the transport.
pub fn api_error(err: anyhow::Error) -> ApiError {
    match err.downcast::<ApiException>() {
        Ok(exception) => exception.into(),
        Err(err) => ApiError::new(ErrorCode::Transport, format!("{err:#}")),
    }
}

pub async fn lookup(backend: &dyn RecordBackend, request: &SearchRequest) -> LookupOutcome {
    match backend.search(request).await {
        Ok(response) => {
            debug!(search_type = %request.search_type, result = %response.result, "lookup answered");
            response.into_outcome()
        }
        Err(err) => {
            let err = api_error(err);
            warn!(search_type = %request.search_type, code = ?err.code, message = %err.message, "lookup call failed");
            LookupOutcome::Failed(err)
        }
    }
}

pub async fn submit(backend: &dyn RecordBackend, request: &SubmitRequest) -> SubmitOutcome {
    match backend.submit(request).await {
        Ok(response) => response.into_outcome(),
        Err(err) => {
            let err = api_error(err);
            warn!(code = ?err.code, message = %err.message, "submit call failed");
            SubmitOutcome::Failure(err)
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
