//! Client side of the notification WebSocket.

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::ClientError;
use crate::objects::{NotificationMessage, WsServerMessage};

/// An open notification subscription.
///
/// Obtained from [`SwapClient::subscribe`](super::SwapClient::subscribe).
pub struct NotificationStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    user_id: Option<i64>,
}

impl NotificationStream {
    pub(super) async fn connect(url: &str) -> Result<Self, ClientError> {
        let (socket, _response) = tokio_tungstenite::connect_async(url).await?;
        Ok(Self {
            socket,
            user_id: None,
        })
    }

    /// The user id announced by the server's `ready` frame, once received.
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// Wait for the next notification.
    ///
    /// Returns `Ok(None)` when the server closes the stream. A server error
    /// frame is surfaced as [`ClientError::Unexpected`].
    pub async fn next_notification(&mut self) -> Result<Option<NotificationMessage>, ClientError> {
        while let Some(frame) = self.socket.next().await {
            let text = match frame? {
                Message::Text(text) => text,
                Message::Close(_) => return Ok(None),
                _ => continue,
            };
            match serde_json::from_str::<WsServerMessage>(&text)? {
                WsServerMessage::Ready { user_id } => self.user_id = Some(user_id),
                WsServerMessage::Notification { notification } => return Ok(Some(notification)),
                WsServerMessage::Error { code, reason } => {
                    return Err(ClientError::Unexpected {
                        status: reqwest::StatusCode::OK,
                        body: format!("{code}: {reason}"),
                    });
                }
            }
        }
        Ok(None)
    }

    /// Send a close frame and drop the connection.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.socket.close(None).await?;
        Ok(())
    }
}
