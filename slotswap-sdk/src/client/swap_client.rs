//! Typed HTTP client for the SlotSwap REST API.

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ClientError, NotificationStream};
use crate::objects::{
    ApiErrorBody, CreateEventRequest, EventResponse, MarketplaceEntryResponse,
    ProposeSwapRequest, RespondSwapRequest, SwapRequestResponse,
};
use crate::token::TOKEN_QUERY_PARAM;

/// Typed HTTP client for the SlotSwap API, acting as one user.
///
/// Every request carries `Authorization: Bearer {session_token}`.
#[derive(Debug, Clone)]
pub struct SwapClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl SwapClient {
    /// Create a new `SwapClient`.
    ///
    /// * `base_url` – root URL of the SlotSwap server.
    /// * `token` – a session token issued for the acting user.
    pub fn new(base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/events`
    pub async fn create_event(
        &self,
        request: &CreateEventRequest,
    ) -> Result<EventResponse, ClientError> {
        self.send(Method::POST, "/api/v1/events", Some(request)).await
    }

    /// `GET /api/v1/events/mine`
    pub async fn my_events(&self) -> Result<Vec<EventResponse>, ClientError> {
        self.send(Method::GET, "/api/v1/events/mine", None::<&()>)
            .await
    }

    /// `GET /api/v1/events/{event_id}`
    pub async fn get_event(&self, event_id: i64) -> Result<EventResponse, ClientError> {
        self.send(
            Method::GET,
            &format!("/api/v1/events/{event_id}"),
            None::<&()>,
        )
        .await
    }

    /// `POST /api/v1/events/{event_id}/swappable`
    pub async fn mark_swappable(&self, event_id: i64) -> Result<EventResponse, ClientError> {
        self.send(
            Method::POST,
            &format!("/api/v1/events/{event_id}/swappable"),
            None::<&()>,
        )
        .await
    }

    /// `POST /api/v1/events/{event_id}/busy`
    pub async fn mark_busy(&self, event_id: i64) -> Result<EventResponse, ClientError> {
        self.send(
            Method::POST,
            &format!("/api/v1/events/{event_id}/busy"),
            None::<&()>,
        )
        .await
    }

    /// `DELETE /api/v1/events/{event_id}`
    pub async fn delete_event(&self, event_id: i64) -> Result<(), ClientError> {
        let url = self.base_url.join(&format!("/api/v1/events/{event_id}"))?;
        let resp = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check_status(resp).await.map(|_| ())
    }

    /// `GET /api/v1/marketplace` – SWAPPABLE slots of other users.
    pub async fn marketplace(&self) -> Result<Vec<MarketplaceEntryResponse>, ClientError> {
        self.send(Method::GET, "/api/v1/marketplace", None::<&()>)
            .await
    }

    /// `POST /api/v1/swaps`
    pub async fn propose_swap(
        &self,
        my_slot_id: i64,
        their_slot_id: i64,
    ) -> Result<SwapRequestResponse, ClientError> {
        let body = ProposeSwapRequest {
            my_slot_id,
            their_slot_id,
        };
        self.send(Method::POST, "/api/v1/swaps", Some(&body)).await
    }

    /// `GET /api/v1/swaps/incoming`
    pub async fn incoming_swaps(&self) -> Result<Vec<SwapRequestResponse>, ClientError> {
        self.send(Method::GET, "/api/v1/swaps/incoming", None::<&()>)
            .await
    }

    /// `GET /api/v1/swaps/outgoing`
    pub async fn outgoing_swaps(&self) -> Result<Vec<SwapRequestResponse>, ClientError> {
        self.send(Method::GET, "/api/v1/swaps/outgoing", None::<&()>)
            .await
    }

    /// `GET /api/v1/swaps/{request_id}`
    pub async fn get_swap(&self, request_id: i64) -> Result<SwapRequestResponse, ClientError> {
        self.send(
            Method::GET,
            &format!("/api/v1/swaps/{request_id}"),
            None::<&()>,
        )
        .await
    }

    /// `POST /api/v1/swaps/{request_id}/respond`
    pub async fn respond_to_swap(
        &self,
        request_id: i64,
        accept: bool,
    ) -> Result<SwapRequestResponse, ClientError> {
        self.send(
            Method::POST,
            &format!("/api/v1/swaps/{request_id}/respond"),
            Some(&RespondSwapRequest { accept }),
        )
        .await
    }

    /// `POST /api/v1/swaps/{request_id}/cancel`
    pub async fn cancel_swap(&self, request_id: i64) -> Result<SwapRequestResponse, ClientError> {
        self.send(
            Method::POST,
            &format!("/api/v1/swaps/{request_id}/cancel"),
            None::<&()>,
        )
        .await
    }

    /// `GET /api/v1/ws` – open the notification stream.
    pub async fn subscribe(&self) -> Result<NotificationStream, ClientError> {
        let mut url = self.base_url.join("/api/v1/ws")?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        // Url::set_scheme only fails for cross-category changes, which
        // http(s) -> ws(s) is not.
        let _ = url.set_scheme(scheme);
        url.set_query(Some(&format!(
            "{TOKEN_QUERY_PARAM}={}",
            urlencoding::encode(&self.token)
        )));
        NotificationStream::connect(url.as_str()).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = self.base_url.join(path)?;
        let mut request = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;
        let resp = check_status(resp).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Json)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => Err(ClientError::Api { status, body }),
        Err(_) => Err(ClientError::Unexpected { status, body: text }),
    }
}
