//! Blocking `tiny_http` accept loop bridged onto the tokio runtime.
//!
//! `tiny_http::Server::recv` blocks, so the loop runs in `spawn_blocking`.
//! Each request is handed to its own blocking task that drives
//! [`crate::api::handle`] with `Handle::block_on` and writes the response.

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use hwv_db::service::SurveyService;
use tokio::runtime::Handle;

use crate::api::{self, ApiResponse};
use crate::error::ServerError;

/// A bound, not yet serving, HTTP listener.
pub struct HttpServer {
    inner: Arc<tiny_http::Server>,
}

/// Stops a running [`HttpServer`] from another task.
#[derive(Clone)]
pub struct ShutdownHandle {
    inner: Arc<tiny_http::Server>,
}

impl ShutdownHandle {
    /// Wake the accept loop and make it return.
    pub fn shutdown(&self) {
        self.inner.unblock();
    }
}

impl HttpServer {
    /// Bind to `addr` (`host:port`; port 0 picks a free one).
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the socket cannot be opened.
    pub fn bind(addr: &str) -> Result<Self, ServerError> {
        let server = tiny_http::Server::http(addr).map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            inner: Arc::new(server),
        })
    }

    /// The bound address, with the real port when 0 was requested.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.server_addr().to_ip()
    }

    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Serve requests until [`ShutdownHandle::shutdown`] is called.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Io` if the accept loop task panics.
    pub async fn run(self, service: Arc<SurveyService>) -> Result<(), ServerError> {
        let runtime = Handle::current();
        if let Some(addr) = self.local_addr() {
            tracing::info!(%addr, "survey API listening");
        }

        tokio::task::spawn_blocking(move || accept_loop(&self.inner, &service, &runtime))
            .await
            .map_err(|e| ServerError::Io(std::io::Error::other(format!("accept loop: {e}"))))?;

        tracing::info!("survey API stopped");
        Ok(())
    }
}

fn accept_loop(server: &tiny_http::Server, service: &Arc<SurveyService>, runtime: &Handle) {
    for request in server.incoming_requests() {
        let service = Arc::clone(service);
        let task_runtime = runtime.clone();
        runtime.spawn_blocking(move || respond(request, &service, &task_runtime));
    }
}

/// Largest request body the API reads.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

fn respond(mut request: tiny_http::Request, service: &SurveyService, runtime: &Handle) {
    let body = match read_capped(request.as_reader(), MAX_BODY_BYTES) {
        Ok(Some(body)) => body,
        Ok(None) => {
            tracing::warn!(limit = MAX_BODY_BYTES, "request body too large");
            reply_empty(request, 413);
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            reply_empty(request, 400);
            return;
        }
    };

    let method = request.method().as_str().to_string();
    let url = request.url().to_string();
    let response = runtime.block_on(api::handle(service, &method, &url, &body));

    if let Err(e) = request.respond(to_tiny(response)) {
        tracing::warn!(error = %e, %url, "failed to write response");
    }
}

fn reply_empty(request: tiny_http::Request, status: u16) {
    if let Err(e) = request.respond(tiny_http::Response::empty(status)) {
        tracing::warn!(error = %e, status, "failed to write response");
    }
}

/// Read at most `limit` bytes. `None` means the body is longer than that.
fn read_capped(reader: &mut dyn Read, limit: u64) -> std::io::Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    reader.take(limit + 1).read_to_end(&mut body)?;
    if body.len() as u64 > limit {
        return Ok(None);
    }
    Ok(Some(body))
}

fn to_tiny(response: ApiResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let mut out = tiny_http::Response::from_string(response.body).with_status_code(response.status);
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", response.content_type) {
        out = out.with_header(header);
    }
    out
}
