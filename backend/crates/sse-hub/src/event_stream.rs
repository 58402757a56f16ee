use crate::{ClientRegistry, HubError, Result as HubResult, Subscriber, SubscriberId};

use std::convert::Infallible;
use std::panic::Location;

use axum::http::Version;
use bytes::{BufMut, Bytes, BytesMut};
use error_location::ErrorLocation;
use futures::Stream;
use log::debug;

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

const DATA_PREFIX: &[u8] = b"data: ";
const EVENT_TERMINATOR: &[u8] = b"\n\n";

/// Frame one payload as a single event: `data: <payload>\n\n`
pub fn frame_event(payload: &[u8]) -> Bytes {
    let mut framed =
        BytesMut::with_capacity(DATA_PREFIX.len() + payload.len() + EVENT_TERMINATOR.len());
    framed.put_slice(DATA_PREFIX);
    framed.put_slice(payload);
    framed.put_slice(EVENT_TERMINATOR);
    framed.freeze()
}

/// Reject transports that cannot flush each event as it is written.
///
/// HTTP/1.0 and 0.9 have no chunked transfer encoding, so a long-lived body
/// would only reach the client when the connection closes.
#[track_caller]
pub fn ensure_streaming_transport(version: Version) -> HubResult<()> {
    if version == Version::HTTP_09 || version == Version::HTTP_10 {
        return Err(HubError::TransportUnsupported {
            message: format!("{version:?} cannot stream incremental responses"),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

/// Removes the subscriber from the registry when the stream is dropped.
///
/// The body stream is dropped on every exit path: the outbox closing, the
/// peer disconnecting, or the server tearing the connection down.
struct RemovalGuard {
    registry: ClientRegistry,
    subscriber_id: SubscriberId,
    span: tracing::Span,
}

impl Drop for RemovalGuard {
    fn drop(&mut self) {
        tracing::info!(parent: &self.span, "Event stream closed");

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(
                "No runtime to remove subscriber {}, skipping",
                self.subscriber_id
            );
            return;
        };

        let registry = self.registry.clone();
        let subscriber_id = self.subscriber_id.clone();
        runtime.spawn(async move {
            match registry.remove_client(&subscriber_id).await {
                Ok(true) => debug!("Removed subscriber {subscriber_id} after stream ended"),
                Ok(false) => debug!("Subscriber {subscriber_id} was already removed"),
                Err(e) => debug!("Skipped removing subscriber {subscriber_id}: {e}"),
            }
        });
    }
}

/// Turn a subscriber's outbox into a stream of framed events.
///
/// The stream ends when the registry closes the outbox. Dropping the stream
/// early (peer gone) removes the subscriber from the registry.
pub fn subscriber_stream(
    registry: ClientRegistry,
    subscriber: Subscriber,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let span = crate::create_stream_span(subscriber.id());
    tracing::info!(parent: &span, "Event stream opened");

    let guard = RemovalGuard {
        registry,
        subscriber_id: subscriber.id().clone(),
        span,
    };

    futures::stream::unfold(
        (subscriber, guard),
        |(mut subscriber, guard)| async move {
            let payload = subscriber.recv().await?;
            Some((Ok(frame_event(&payload)), (subscriber, guard)))
        },
    )
}
