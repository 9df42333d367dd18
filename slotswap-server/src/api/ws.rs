use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use slotswap_core::identity::IdentityGateway;
use slotswap_sdk::objects::{NotificationMessage, WsCloseCode, WsServerMessage};

use super::extractors::AuthenticatedUser;
use crate::state::AppState;

/// `GET /ws?token={session_token}`: notification stream.
///
/// Upgrades the HTTP connection to a WebSocket and pushes a
/// [`WsServerMessage::Notification`] frame for each notification
/// published to the authenticated user.
pub(super) async fn notifications_ws(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_notifications_ws(socket, state, user))
}

/// Background task that drives a single WebSocket connection.
///
/// 1. Registers a dispatcher channel and sends the `ready` frame.
/// 2. Relays notifications until the client disconnects.
/// 3. Re-verifies the session token whenever the auth config is reloaded
///    and closes with [`WsCloseCode::TOKEN_REVOKED`] if it no longer passes.
async fn handle_notifications_ws(mut socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let user_id = user.user_id;
    // Subscribe before announcing readiness so nothing published after the
    // ready frame can be missed.
    let mut subscription = state.engine.dispatcher().subscribe(user_id);
    let mut auth_watcher = state.auth.subscribe();
    let mut shutdown_rx = state.shutdown.clone();
    tracing::debug!(user_id, channel_id = %subscription.channel_id(), "WS: session opened");

    let ready = WsServerMessage::Ready {
        user_id: subscription.user_id(),
    };
    if send_json(&mut socket, &ready).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            notification = subscription.recv() => {
                let Some(notification) = notification else {
                    break;
                };
                let msg = WsServerMessage::Notification {
                    notification: NotificationMessage::from(&notification),
                };
                if send_json(&mut socket, &msg).await.is_err() {
                    return;
                }
            }

            changed = auth_watcher.changed() => {
                if changed.is_err() {
                    break;
                }
                let verdict = state.auth.read().await.authenticate(&user.token);
                if let Err(e) = verdict {
                    tracing::info!(user_id, error = %e, "WS: session token revoked by config reload");
                    close_with(&mut socket, WsCloseCode::TOKEN_REVOKED, "session token no longer valid").await;
                    return;
                }
            }

            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    let _ = socket
                        .send(Message::Close(Some(CloseFrame {
                            code: WsCloseCode::GOING_AWAY,
                            reason: "server shutting down".into(),
                        })))
                        .await;
                    return;
                }
            }

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(user_id, "WS: client closed session");
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) => {
                        return;
                    }
                }
            }
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &'static str) {
    let _ = send_json(
        socket,
        &WsServerMessage::Error {
            code,
            reason: reason.into(),
        },
    )
    .await;
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}

/// Serialize `value` as JSON and send it as a text WebSocket frame.
///
/// Returns `Err(())` if the send fails (client disconnected).
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = serde_json::to_string(value).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}
