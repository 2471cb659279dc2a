//! HTTP response writing module
//!
//! `ResponseWriter` is the response object handed to pipeline handlers. It keeps
//! the header/body write state so the dispatcher and handlers can check whether a
//! terminal response was already produced before attempting another one.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use thiserror::Error;

/// Misuse of a `ResponseWriter`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("response headers already sent")]
    HeadersSent,
    #[error("response already ended")]
    Ended,
}

/// Accumulates one response: status line, headers, body
#[derive(Debug)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    headers_sent: bool,
    ended: bool,
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            headers_sent: false,
            ended: false,
        }
    }

    pub const fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    pub const fn writable_ended(&self) -> bool {
        self.ended
    }

    /// True while no handler has started a response
    pub const fn is_writable(&self) -> bool {
        !self.headers_sent && !self.ended
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Send the status line and headers
    pub fn write_head(&mut self, status: StatusCode, headers: HeaderMap) -> Result<(), WriteError> {
        if self.ended {
            return Err(WriteError::Ended);
        }
        if self.headers_sent {
            return Err(WriteError::HeadersSent);
        }
        self.status = status;
        self.headers.extend(headers);
        self.headers_sent = true;
        Ok(())
    }

    /// Append a body chunk, implicitly sending a 200 head if none was sent yet
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), WriteError> {
        if self.ended {
            return Err(WriteError::Ended);
        }
        if !self.headers_sent {
            self.write_head(StatusCode::OK, HeaderMap::new())?;
        }
        self.body.extend_from_slice(chunk);
        Ok(())
    }

    /// Finish the response, optionally with a last chunk
    pub fn end(&mut self, chunk: Option<&[u8]>) -> Result<(), WriteError> {
        if let Some(chunk) = chunk {
            self.write(chunk)?;
        } else if !self.headers_sent {
            self.write_head(StatusCode::OK, HeaderMap::new())?;
        }
        self.ended = true;
        Ok(())
    }

    /// Convert into the hyper response handed back to the connection
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Send a complete response if the writer is still writable.
///
/// Returns `false` (and writes nothing) when a response was already started.
pub fn send(res: &mut ResponseWriter, status: StatusCode, content_type: &str, body: &str) -> bool {
    if !res.is_writable() {
        return false;
    }

    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(content_type) {
        Ok(value) => {
            headers.insert(CONTENT_TYPE, value);
        }
        Err(e) => log_build_error(status, &e),
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));

    res.write_head(status, headers)
        .and_then(|()| res.end(Some(body.as_bytes())))
        .is_ok()
}

/// Send 404 Not Found
pub fn send_404_response(res: &mut ResponseWriter) -> bool {
    send(res, StatusCode::NOT_FOUND, "text/plain", "404 Not Found")
}

/// Send 500 Internal Server Error
///
/// The body is fixed; error details stay in the server log.
pub fn send_500_response(res: &mut ResponseWriter) -> bool {
    send(
        res,
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/plain",
        "500 Internal Server Error",
    )
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &impl std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
