//! Typed access to the REST API for the dashboard and the public site.

use std::env;
use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::client::toggle::OptimisticToggle;
use crate::models::detailed_note::DetailedNote;
use crate::models::note::{Note, NoteSection};
use crate::models::offer::Offer;
use crate::models::tool::Tool;
use crate::models::update::Update;

/// Used when `API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!("API call failed with {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn tools(&self, admin: bool) -> Result<Vec<Tool>, ApiError> {
        let path = if admin { "/tools?admin=true" } else { "/tools" };
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn toggle_tool(&self, id: &str) -> Result<Tool, ApiError> {
        self.send(self.request(Method::PATCH, &format!("/tools/{}/toggle", id)))
            .await
    }

    /// Flip the switch at once and roll it back if the PATCH fails.
    pub async fn toggle_tool_optimistic(
        &self,
        id: &str,
        switch: &mut OptimisticToggle,
    ) -> Result<Tool, ApiError> {
        let tool = switch.flip_with(|_| self.toggle_tool(id)).await?;
        switch.confirm(tool.is_active);
        Ok(tool)
    }

    pub async fn notes(&self) -> Result<Vec<Note>, ApiError> {
        self.send(self.request(Method::GET, "/notes")).await
    }

    pub async fn toggle_note_section(
        &self,
        id: &str,
        section: NoteSection,
    ) -> Result<Note, ApiError> {
        let path = format!("/notes/{}/toggle/{}", id, section.as_str());
        self.send(self.request(Method::PATCH, &path)).await
    }

    pub async fn detailed_notes(&self) -> Result<Vec<DetailedNote>, ApiError> {
        self.send(self.request(Method::GET, "/detailed-notes")).await
    }

    pub async fn updates(&self) -> Result<Vec<Update>, ApiError> {
        self.send(self.request(Method::GET, "/updates")).await
    }

    pub async fn active_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.send(self.request(Method::GET, "/offers/active")).await
    }
}
