//! Server-sent event line reading for streamed chat responses.
//!
//! Both wire protocols deliver fragments as `data: <payload>` lines. This
//! module reassembles lines across network chunk boundaries and yields each
//! `data:` payload; the protocol modules decide what a payload means.

use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use super::error::ProviderError;

/// What a single `data:` payload contributes to the fragment stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A text fragment to forward.
    Text(String),
    /// Explicit end-of-stream marker.
    Done,
    /// Malformed or empty payload.
    Skip,
}

struct LineReader<S> {
    inner: Pin<Box<S>>,
    buf: Vec<u8>,
    done: bool,
}

impl<S> LineReader<S> {
    /// Pops the next complete line (without its terminator) off the buffer.
    fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Payload of a `data:` line, trimmed. Other SSE fields return `None`.
pub(crate) fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim)
}

/// Converts a byte stream into the stream of its `data:` payloads.
///
/// A transport error is yielded once and ends the stream. A trailing line
/// without a newline is still delivered when the connection closes.
pub(crate) fn data_lines<S, B>(bytes: S) -> impl Stream<Item = Result<String, ProviderError>>
where
    S: Stream<Item = Result<B, ProviderError>>,
    B: AsRef<[u8]>,
{
    let reader = LineReader {
        inner: Box::pin(bytes),
        buf: Vec::new(),
        done: false,
    };

    stream::unfold(reader, |mut reader| async move {
        loop {
            if let Some(line) = reader.next_line() {
                if let Some(payload) = data_payload(&line) {
                    return Some((Ok(payload.to_string()), reader));
                }
                continue;
            }
            if reader.done {
                return None;
            }
            match reader.inner.next().await {
                Some(Ok(chunk)) => reader.buf.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    tracing::debug!("stream aborted: {e}");
                    reader.done = true;
                    reader.buf.clear();
                    return Some((Err(e), reader));
                }
                None => {
                    tracing::debug!("stream closed by server");
                    reader.done = true;
                    if !reader.buf.is_empty() {
                        reader.buf.push(b'\n');
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static str, ProviderError>> {
        stream::iter(parts.iter().map(|p| Ok(*p)).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_lines_split_across_chunks() {
        let lines: Vec<String> = data_lines(chunks(&["data: {\"a\"", ":1}\n\nda", "ta: two\r\n"]))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["{\"a\":1}", "two"]);
    }

    #[tokio::test]
    async fn test_non_data_fields_ignored() {
        let lines: Vec<String> = data_lines(chunks(&[
            ": keep-alive\n",
            "event: message\n",
            "data:no-space\n",
            "\n",
        ]))
        .map(|r| r.unwrap())
        .collect()
        .await;
        assert_eq!(lines, vec!["no-space"]);
    }

    #[tokio::test]
    async fn test_trailing_line_without_newline() {
        let lines: Vec<String> = data_lines(chunks(&["data: last"]))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["last"]);
    }

    #[tokio::test]
    async fn test_multibyte_char_split_across_chunks() {
        let bytes = "data: héllo\n".as_bytes();
        let (a, b) = bytes.split_at(8);
        let parts: Vec<Result<Vec<u8>, ProviderError>> = vec![Ok(a.to_vec()), Ok(b.to_vec())];
        let lines: Vec<String> = data_lines(stream::iter(parts))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["héllo"]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let parts: Vec<Result<&'static str, ProviderError>> = vec![
            Ok("data: one\n"),
            Err(ProviderError::Status {
                status: 502,
                body: String::new(),
            }),
            Ok("data: never\n"),
        ];
        let items: Vec<Result<String, ProviderError>> =
            data_lines(stream::iter(parts)).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "one");
        assert!(matches!(items[1], Err(ProviderError::Status { status: 502, .. })));
    }
}
