//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use crate::events::EventBus;

/// Stream every display intent emitted on `bus` to one SSE client
///
/// Each intent becomes an SSE event named after its variant with the JSON
/// body as data. Lagged clients skip what they missed and keep going.
pub fn intent_stream(bus: &EventBus) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(
        "New SSE client connected ({} already subscribed)",
        bus.subscriber_count()
    );

    let stream = BroadcastStream::new(bus.subscribe()).filter_map(|result| async move {
        match result {
            Ok(intent) => match serde_json::to_string(&intent) {
                Ok(json) => {
                    debug!("SSE: sending {}", intent.event_type());
                    Some(Ok(Event::default().event(intent.event_type()).data(json)))
                }
                Err(e) => {
                    warn!("Failed to serialize display intent: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
