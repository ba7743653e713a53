//! Live viewer channel: every text frame a viewer sends is relayed to all
//! viewers of the same session, the sender included.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::{Router, routing::get};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, instrument};

use frightfate_broadcast::{BroadcastHub, ChannelConnection};
use frightfate_core::viewer::ViewerConnection;
use frightfate_session::domain::session_code::normalize;

use crate::state::AppState;

/// GET /ws/{code}
#[instrument(skip_all, fields(session_code = %code))]
async fn viewer_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Response {
    let session_code = normalize(&code);
    ws.on_upgrade(move |socket| relay(socket, session_code, state.hub))
}

async fn relay(socket: WebSocket, session_code: String, hub: Arc<BroadcastHub>) {
    let (connection, mut outbound) = ChannelConnection::new();
    let connection_id = connection.id();
    hub.connect(&session_code, Arc::new(connection));
    info!(%session_code, %connection_id, "viewer connected");

    let (mut sink, mut stream) = socket.split();

    let mut forward = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let inbound_hub = Arc::clone(&hub);
    let inbound_code = session_code.clone();
    let mut inbound = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => {
                    let delivered = inbound_hub.broadcast(&inbound_code, text.as_str()).await;
                    debug!(session_code = %inbound_code, delivered, "frame relayed");
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Whichever half finishes first ends the connection.
    tokio::select! {
        _ = &mut forward => inbound.abort(),
        _ = &mut inbound => forward.abort(),
    }

    hub.disconnect(&session_code, connection_id);
    info!(%session_code, %connection_id, "viewer disconnected");
}

/// Returns the WebSocket router.
pub fn router() -> Router<AppState> {
    Router::new().route("/ws/{code}", get(viewer_socket))
}
