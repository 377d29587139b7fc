//! Chat response stream decoding.
//!
//! The platform answers `POST /chatbots/{id}/chat` with `text/event-stream`.
//! Each event's `data` is a JSON `{"content": ..., "session_id": ...}`
//! payload; a literal `[DONE]` ends the stream. Framing is handled by
//! `eventsource-stream`, so payloads split across network chunks are
//! reassembled before they reach [`decode_event`].

use std::fmt::Display;

use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};
use tracing::debug;

use botdesk_core::api::ChatStream;
use botdesk_types::chat::ChatChunk;
use botdesk_types::error::ApiError;

/// Terminal payload marking the end of a response.
pub const DONE_MARKER: &str = "[DONE]";

/// What a single event means for the stream.
#[derive(Debug, PartialEq, Eq)]
pub enum SseStep {
    Chunk(ChatChunk),
    Skip,
    Done,
}

/// Interpret one event.
///
/// Empty and unparseable payloads are skipped. An event named `error`, or a
/// payload carrying an `error` or `detail` field, is a stream error.
pub fn decode_event(event: &Event) -> Result<SseStep, ApiError> {
    let data = event.data.trim();
    if data.is_empty() {
        return Ok(SseStep::Skip);
    }
    if data == DONE_MARKER {
        return Ok(SseStep::Done);
    }

    let parsed = serde_json::from_str::<serde_json::Value>(data);
    if event.event == "error" {
        let message = parsed
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| data.to_string());
        return Err(ApiError::Stream(message));
    }

    let value = match parsed {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "skipping undecodable stream payload");
            return Ok(SseStep::Skip);
        }
    };
    if let Some(message) = error_message(&value) {
        return Err(ApiError::Stream(message));
    }

    match serde_json::from_value::<ChatChunk>(value) {
        Ok(chunk) => Ok(SseStep::Chunk(chunk)),
        Err(e) => {
            debug!(error = %e, "skipping stream payload with unexpected shape");
            Ok(SseStep::Skip)
        }
    }
}

fn error_message(value: &serde_json::Value) -> Option<String> {
    let field = value.get("error").or_else(|| value.get("detail"))?;
    Some(match field {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(obj) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| field.to_string()),
        other => other.to_string(),
    })
}

fn framing_error<E: Display>(err: EventStreamError<E>) -> ApiError {
    match err {
        EventStreamError::Transport(e) => ApiError::Network(e.to_string()),
        other => ApiError::Stream(other.to_string()),
    }
}

/// Turn a response byte stream into a stream of chat chunks.
///
/// The stream ends at `[DONE]` or when the body ends, whichever is first.
pub fn decode_chat_stream<S, B, E>(bytes: S) -> ChatStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut events = Box::pin(bytes.eventsource());

        while let Some(item) = events.next().await {
            let event = item.map_err(framing_error)?;
            match decode_event(&event)? {
                SseStep::Chunk(chunk) => yield chunk,
                SseStep::Skip => continue,
                SseStep::Done => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn event(name: &str, data: &str) -> Event {
        Event {
            event: name.to_string(),
            data: data.to_string(),
            ..Event::default()
        }
    }

    async fn collect(parts: Vec<&'static str>) -> Vec<Result<ChatChunk, ApiError>> {
        let bytes = stream::iter(parts.into_iter().map(Ok::<_, std::io::Error>));
        decode_chat_stream(bytes).collect().await
    }

    #[test]
    fn test_decode_event_variants() {
        assert_eq!(decode_event(&event("message", "")).unwrap(), SseStep::Skip);
        assert_eq!(decode_event(&event("message", " [DONE] ")).unwrap(), SseStep::Done);
        assert_eq!(decode_event(&event("message", "{not json")).unwrap(), SseStep::Skip);
        assert_eq!(
            decode_event(&event("message", r#"{"content": "Hi", "session_id": "s1"}"#)).unwrap(),
            SseStep::Chunk(ChatChunk {
                content: "Hi".to_string(),
                session_id: Some("s1".to_string()),
            })
        );
    }

    #[test]
    fn test_error_events() {
        let err = decode_event(&event("error", r#"{"detail": "quota exceeded"}"#)).unwrap_err();
        assert_eq!(err.user_message(), "quota exceeded");

        let err = decode_event(&event("error", "upstream failed")).unwrap_err();
        assert_eq!(err.user_message(), "upstream failed");

        let err = decode_event(&event("message", r#"{"error": {"message": "rate limited"}}"#)).unwrap_err();
        assert_eq!(err.user_message(), "rate limited");
    }

    #[tokio::test]
    async fn stream_stops_at_done() {
        let items = collect(vec![
            "data: {\"content\": \"Hel\", \"session_id\": \"s1\"}\n\n",
            "data: {\"content\": \"lo\", \"session_id\": \"s1\"}\n\n",
            "data: [DONE]\n\n",
            "data: {\"content\": \"ignored\"}\n\n",
        ])
        .await;

        let contents: Vec<String> = items.into_iter().map(|r| r.unwrap().content).collect();
        assert_eq!(contents, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn payload_split_across_chunks_is_reassembled() {
        let items = collect(vec![
            "data: {\"conte",
            "nt\": \"split\", \"session_id\"",
            ": \"s2\"}\n",
            "\ndata: [DONE]\n\n",
        ])
        .await;

        assert_eq!(items.len(), 1);
        let chunk = items.into_iter().next().unwrap().unwrap();
        assert_eq!(chunk.content, "split");
        assert_eq!(chunk.session_id.as_deref(), Some("s2"));
    }

    #[tokio::test]
    async fn bad_payloads_are_skipped_and_errors_end_stream() {
        let items = collect(vec![
            "data: garbage\n\n",
            ": keep-alive comment\n\n",
            "data: {\"content\": \"ok\"}\n\n",
            "event: error\ndata: {\"detail\": \"boom\"}\n\n",
            "data: {\"content\": \"after\"}\n\n",
        ])
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().content, "ok");
        assert!(matches!(&items[1], Err(ApiError::Stream(msg)) if msg == "boom"));
    }

    #[tokio::test]
    async fn stream_without_done_ends_with_body() {
        let items = collect(vec!["data: {\"content\": \"tail\"}\n\n"]).await;
        assert_eq!(items.len(), 1);
    }
}
