//! Typed access to the library REST API
//!
//! Every endpoint answers with the same `{success, data?, message?}` envelope.
//! The helpers here unwrap it: `success: false` becomes [`BookdeskError::Api`],
//! transport and JSON failures become [`BookdeskError::Transport`].

use crate::config::Config;
use crate::error::{BookdeskError, Result};
use crate::models::{Book, Envelope, LoanRequest, SearchRequest, Transaction, User};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Builds a client for the API at `api_base` (for example `http://host:3000/api`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::with_client(client, &config.api_base)
    }

    /// Same as [`ApiClient::new`] with a caller-provided `reqwest::Client`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed
    pub fn with_client(client: Client, api_base: &str) -> Result<Self> {
        let base = Url::parse(api_base)?;
        if base.cannot_be_a_base() {
            return Err(BookdeskError::from(format!(
                "Invalid API base URL: {api_base}"
            )));
        }
        Ok(Self { client, base })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| BookdeskError::from("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /books`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn all_books(&self) -> Result<Vec<Book>> {
        let url = self.endpoint(&["books"])?;
        fetch_data(self.client.get(url), "/books").await
    }

    /// `GET /books/available`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn available_books(&self) -> Result<Vec<Book>> {
        let url = self.endpoint(&["books", "available"])?;
        fetch_data(self.client.get(url), "/books/available").await
    }

    /// `POST /books/search` with `{title}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn search_books(&self, title: &str) -> Result<Vec<Book>> {
        let url = self.endpoint(&["books", "search"])?;
        let request = self.client.post(url).json(&SearchRequest { title });
        fetch_data(request, "/books/search").await
    }

    /// `POST /books/loan`, returning the server's confirmation message
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn loan(&self, user_id: &str, book_id: &str) -> Result<String> {
        let url = self.endpoint(&["books", "loan"])?;
        let request = self.client.post(url).json(&LoanRequest { user_id, book_id });
        fetch_message(request, "/books/loan").await
    }

    /// `POST /books/return`, returning the server's confirmation message
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn return_book(&self, user_id: &str, book_id: &str) -> Result<String> {
        let url = self.endpoint(&["books", "return"])?;
        let request = self.client.post(url).json(&LoanRequest { user_id, book_id });
        fetch_message(request, "/books/return").await
    }

    /// `GET /users`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn users(&self) -> Result<Vec<User>> {
        let url = self.endpoint(&["users"])?;
        fetch_data(self.client.get(url), "/users").await
    }

    /// `GET /users/{id}/recommendations`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn recommendations(&self, user_id: &str) -> Result<Vec<Book>> {
        let url = self.endpoint(&["users", user_id, "recommendations"])?;
        fetch_data(self.client.get(url), "/users/{id}/recommendations").await
    }

    /// `GET /transactions`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or `success: false`
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let url = self.endpoint(&["transactions"])?;
        fetch_data(self.client.get(url), "/transactions").await
    }
}

async fn fetch_envelope<T: DeserializeOwned>(
    request: RequestBuilder,
    endpoint: &str,
) -> Result<Envelope<T>> {
    let response = request.send().await?;
    debug!("{endpoint} responded with status {}", response.status());
    // The status code is not inspected: error envelopes come back as 4xx/5xx too
    Ok(response.json::<Envelope<T>>().await?)
}

async fn fetch_data<T: DeserializeOwned>(request: RequestBuilder, endpoint: &str) -> Result<T> {
    let envelope = fetch_envelope::<T>(request, endpoint).await?;
    if !envelope.success {
        return Err(BookdeskError::Api(
            envelope
                .message
                .unwrap_or_else(|| format!("{endpoint} reported a failure")),
        ));
    }
    envelope
        .data
        .ok_or_else(|| BookdeskError::MissingData(endpoint.to_string()))
}

async fn fetch_message(request: RequestBuilder, endpoint: &str) -> Result<String> {
    let envelope = fetch_envelope::<serde_json::Value>(request, endpoint).await?;
    let message = envelope.message.unwrap_or_default();
    if envelope.success {
        Ok(message)
    } else {
        Err(BookdeskError::Api(message))
    }
}
