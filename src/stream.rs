//! Response side of an HTTP exchange, as a stream handle.
//!
//! Handlers write to an [`HttpStream`] and the sinks end it. The first
//! [`end`](HttpStream::end) sends the response; later calls are no-ops.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tokio::sync::oneshot;

pub(crate) type HttpResponse = http::Response<Full<Bytes>>;

struct State {
    status: Option<StatusCode>,
    headers: HeaderMap,
    buf: BytesMut,
    tx: Option<oneshot::Sender<HttpResponse>>,
}

/// Cloneable handle to one in-flight HTTP exchange.
///
/// Clones share the same state. If every clone is dropped before
/// [`end`](HttpStream::end), the server answers `500`.
#[derive(Clone)]
pub struct HttpStream {
    state: Arc<Mutex<State>>,
    body: Bytes,
}

impl HttpStream {
    pub(crate) fn new(body: Bytes) -> (Self, oneshot::Receiver<HttpResponse>) {
        let (tx, rx) = oneshot::channel();
        let state = State {
            status: None,
            headers: HeaderMap::new(),
            buf: BytesMut::new(),
            tx: Some(tx),
        };
        (Self { state: Arc::new(Mutex::new(state)), body }, rx)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The collected request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Sets the response status. Defaults to `200 OK`.
    pub fn respond(&self, status: StatusCode) {
        self.lock().status = Some(status);
    }

    /// The status set so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.lock().status
    }

    /// Appends a response header.
    pub fn header(&self, name: HeaderName, value: HeaderValue) {
        self.lock().headers.append(name, value);
    }

    /// Appends bytes to the response body.
    pub fn write(&self, chunk: impl AsRef<[u8]>) {
        self.lock().buf.extend_from_slice(chunk.as_ref());
    }

    /// Appends `message` (if any) and sends the response.
    ///
    /// Returns `false` when the stream had already ended.
    pub fn end(&self, message: Option<&str>) -> bool {
        let mut state = self.lock();
        let Some(tx) = state.tx.take() else {
            return false;
        };
        if let Some(message) = message {
            state.buf.extend_from_slice(message.as_bytes());
        }

        let body = std::mem::take(&mut state.buf).freeze();
        let mut headers = std::mem::take(&mut state.headers);
        if !body.is_empty() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        }

        let mut response = http::Response::new(Full::new(body));
        *response.status_mut() = state.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = headers;

        // The receiver is gone only if the connection already closed.
        let _ = tx.send(response);
        true
    }

    pub fn is_ended(&self) -> bool {
        self.lock().tx.is_none()
    }
}

impl fmt::Debug for HttpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("HttpStream")
            .field("status", &state.status)
            .field("buffered", &state.buf.len())
            .field("ended", &state.tx.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_of(response: HttpResponse) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn end_sends_buffered_body() {
        let (stream, rx) = HttpStream::new(Bytes::new());
        stream.respond(StatusCode::CREATED);
        stream.write("inside ");
        assert!(stream.end(Some("users")));

        let response = rx.await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(body_of(response).await, "inside users");
    }

    #[tokio::test]
    async fn only_first_end_counts() {
        let (stream, rx) = HttpStream::new(Bytes::new());
        let other = stream.clone();
        assert!(stream.end(None));
        assert!(!other.end(Some("late")));
        assert!(other.is_ended());

        let response = rx.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn dropping_every_handle_closes_the_channel() {
        let (stream, rx) = HttpStream::new(Bytes::from_static(b"payload"));
        assert_eq!(stream.body(), &Bytes::from_static(b"payload"));
        drop(stream);
        assert!(rx.await.is_err());
    }
}
