/**
 * Real-time Subscription Handler
 *
 * Server-Sent Events (SSE) handler for `GET /realtime`, behind the
 * authentication middleware like every other data surface. Clients
 * open a long-lived stream and receive a `change` event whenever a row in a
 * subscribed table mutates; their reaction is always a full re-fetch of
 * the open conversation, which makes delivery gaps harmless.
 *
 * # Filtering
 *
 * - `?table=channel_messages` - only events for that table
 * - `?scope=<uuid>` - only events for that channel/group/pair scope
 * - no parameters - all change events
 *
 * # Connection Management
 *
 * Connections are kept alive by SSE keep-alive comments. A lagged
 * receiver skips the missed events and keeps listening; the client's
 * next re-fetch picks up whatever was missed.
 */

use axum::{
    extract::{Query, State},
    response::sse::{Event, Sse},
};
use futures_util::stream;
use serde::Deserialize;
use uuid::Uuid;

use crate::realtime::broadcast::ChangeBroadcast;

/// Query parameters for the realtime subscription
#[derive(Debug, Deserialize)]
pub struct RealtimeParams {
    /// Restrict events to one table
    pub table: Option<String>,
    /// Restrict events to one conversation scope
    pub scope: Option<Uuid>,
}

/// Handle real-time subscription (GET /realtime)
pub async fn handle_realtime_subscription(
    State(broadcast_tx): State<ChangeBroadcast>,
    Query(params): Query<RealtimeParams>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>> {
    tracing::info!(
        "[Realtime] Subscription request (table: {:?}, scope: {:?})",
        params.table,
        params.scope
    );

    let broadcast_rx = broadcast_tx.subscribe();

    let stream = stream::unfold(
        (broadcast_rx, params),
        move |(mut rx, params)| async move {
            // Loop until an event passes the filter
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if let Some(ref table) = params.table {
                            if &event.table != table {
                                continue;
                            }
                        }
                        if let Some(scope) = params.scope {
                            if event.scope_id != scope {
                                continue;
                            }
                        }

                        let event_data = match serde_json::to_string(&event) {
                            Ok(data) => data,
                            Err(e) => {
                                tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                                continue;
                            }
                        };

                        let sse_event = Event::default().event("change").data(event_data);
                        return Some((Ok(sse_event), (rx, params)));
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        // Clients re-fetch full state on every event, so
                        // skipping ahead loses nothing important
                        tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        tracing::warn!("[Realtime] Broadcast channel closed, ending stream");
                        return None;
                    }
                }
            }
        },
    );

    Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default())
}
