// Chunked JSON streaming utilities
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::{header, HeaderMap, Response, StatusCode};
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Whether the client advertised brotli in `Accept-Encoding`.
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|coding| coding.trim().starts_with("br")))
        .unwrap_or(false)
}

/// Chunked response of length-prefixed JSON frames.
///
/// Each frame is `u32` big-endian length followed by the payload, brotli
/// compressed per frame when `compress` is set.
pub fn chunked_json_stream<S, T>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream = stream.then(move |frame| async move { serialize_chunk(&frame, compress).await });

    // No Content-Encoding: chunks are compressed individually, not the body.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndframe+json")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(byte_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build stream response");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn serialize_chunk<T: Serialize>(frame: &T, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(frame).map_err(std::io::Error::other)?;

    let payload = if compress {
        let mut encoder = BrotliEncoder::new(std::io::Cursor::new(json));
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await?;
        compressed
    } else {
        json
    };

    let length = u32::try_from(payload.len()).map_err(std::io::Error::other)?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Every value the receiver observes, current one first.
///
/// `keep_alive` lives as long as the stream; dropping the response body (the
/// client going away) drops it.
pub fn watch_frames<T, K>(receiver: watch::Receiver<T>, keep_alive: K) -> impl Stream<Item = T> + Send + 'static
where
    T: Clone + Send + Sync + 'static,
    K: Send + 'static,
{
    async_stream::stream! {
        let _keep_alive = keep_alive;
        let mut frames = WatchStream::new(receiver);
        while let Some(frame) = frames.next().await {
            yield frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::BrotliDecoder;
    use axum::http::HeaderValue;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn split_frames(mut bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        while bytes.len() >= 4 {
            let length = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
            frames.push(bytes[4..4 + length].to_vec());
            bytes = &bytes[4 + length..];
        }
        assert!(bytes.is_empty());
        frames
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, br;q=0.9"));
        assert!(accepts_brotli(&headers));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
        assert!(!accepts_brotli(&headers));
    }

    #[tokio::test]
    async fn test_frames_are_length_prefixed() {
        let frames = futures::stream::iter(vec![json!({"page": "dashboard"}), json!([1, 2, 3])]);
        let response = chunked_json_stream(frames, false).unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let frames = split_frames(&body);
        assert_eq!(frames.len(), 2);
        assert_eq!(serde_json::from_slice::<Value>(&frames[0]).unwrap(), json!({"page": "dashboard"}));
        assert_eq!(serde_json::from_slice::<Value>(&frames[1]).unwrap(), json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_compressed_frames_decode() {
        let chunk = serialize_chunk(&json!({"charts": []}), true).await.unwrap();
        let frames = split_frames(&chunk);

        let mut decoder = BrotliDecoder::new(std::io::Cursor::new(frames[0].clone()));
        let mut plain = Vec::new();
        decoder.read_to_end(&mut plain).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&plain).unwrap(), json!({"charts": []}));
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_watch_frames_holds_keep_alive_until_dropped() {
        let (sender, receiver) = watch::channel(1);
        let dropped = Arc::new(AtomicBool::new(false));
        let mut frames = Box::pin(watch_frames(receiver, DropFlag(dropped.clone())));

        assert_eq!(frames.next().await, Some(1));
        sender.send(2).unwrap();
        assert_eq!(frames.next().await, Some(2));
        assert!(!dropped.load(Ordering::SeqCst));

        drop(frames);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
