//! Rendering service client.

use std::time::Duration;

use ureq::Agent;

use crate::consts::{DEFAULT_RENDER_URL, DEFAULT_TIMEOUT, FRAME, OPTIONS, WIDTH};
use crate::error::RenderError;

/// Turns grammar text into the raw markup of a rendered diagram page.
///
/// Implemented by [`RailroadClient`] for the real service. Tests and callers
/// that cache or replay responses provide their own implementations.
pub trait Renderer {
    /// Render one grammar.
    fn render(&self, source: &str) -> Result<String, RenderError>;
}

/// HTTP client for the Railroad Diagram Generator.
///
/// Every request is a form-encoded `POST` asking for the diagram frame at a
/// fixed width with recursion elimination, factoring and inlining enabled.
#[derive(Debug, Clone)]
pub struct RailroadClient {
    agent: Agent,
    url: String,
}

impl RailroadClient {
    /// Create a client for the service at `url` with the default timeout.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: create_agent(DEFAULT_TIMEOUT),
            url: url.into(),
        }
    }

    /// Replace the overall per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Service endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RailroadClient {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_URL)
    }
}

impl Renderer for RailroadClient {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        tracing::debug!(url = %self.url, bytes = source.len(), "Requesting diagram");

        let response = self.agent.post(&self.url).send_form(form_fields(source))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if !(200..300).contains(&status) {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(RenderError::Service {
                status,
                body: error_body,
            });
        }

        Ok(body.read_to_string()?)
    }
}

/// Create HTTP agent with the specified timeout.
///
/// Non-success statuses are returned as responses so the error body can be
/// reported.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Form fields of a render request, in wire order.
fn form_fields(source: &str) -> Vec<(&str, &str)> {
    let mut fields = vec![("frame", FRAME), ("text", source), ("width", WIDTH)];
    fields.extend(OPTIONS.iter().map(|option| ("options", *option)));
    fields
}
