//! Request/response transport.
//!
//! The [`Transport`] trait is the seam between transaction behaviours and the
//! network. [`HttpTransport`] posts the form with `reqwest`; tests and dry runs
//! can plug in their own implementation.

use crate::errors::{HeidelpayError, Result};
use crate::types::Response;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;

/// Sends a prepared form to the gateway and returns its parsed answer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `form` to `url`.
    ///
    /// # Returns
    ///
    /// The parsed gateway response. A gateway side decline is still `Ok`; only
    /// failures to obtain a response at all are errors.
    async fn submit(&self, url: &str, form: &BTreeMap<String, String>) -> Result<Response>;
}

/// HTTP transport posting `application/x-www-form-urlencoded` bodies.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport using `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, url: &str, form: &BTreeMap<String, String>) -> Result<Response> {
        let response = self.client.post(url).form(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "gateway answered with an error status");
            return Err(HeidelpayError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Response::from_form_body(&body)
    }
}

/// Transport that records submitted forms and answers with a canned response.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingTransport {
    pub(crate) submitted: std::sync::Mutex<Vec<(String, BTreeMap<String, String>)>>,
    pub(crate) answer: Response,
}

#[cfg(test)]
impl RecordingTransport {
    pub(crate) fn answering(answer: Response) -> Self {
        Self {
            submitted: Default::default(),
            answer,
        }
    }

    pub(crate) fn last_form(&self) -> BTreeMap<String, String> {
        let submitted = self.submitted.lock().unwrap();
        submitted.last().map(|(_, form)| form.clone()).unwrap_or_default()
    }

    pub(crate) fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for RecordingTransport {
    async fn submit(&self, url: &str, form: &BTreeMap<String, String>) -> Result<Response> {
        self.submitted
            .lock()
            .unwrap()
            .push((url.to_string(), form.clone()));
        Ok(self.answer.clone())
    }
}
