//! TCP listener for the HTTP service.
//!
//! Each accepted connection holds a semaphore permit for its lifetime, so
//! at most `max_connections` requests are in flight at once.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::http::{HttpRequest, HttpResponse, head_len};

/// HTTP server accepting TCP connections.
pub struct HttpServer {
    config: ServerConfig,
    listener: TcpListener,
    connection_semaphore: Arc<Semaphore>,
}

impl HttpServer {
    /// Binds to the address in the configuration.
    ///
    /// Binding to port 0 picks a free port; see [`HttpServer::local_addr`].
    pub async fn bind(config: ServerConfig) -> ServerResult<Self> {
        if config.max_connections == 0 {
            return Err(ServerError::config("max_connections must be at least 1"));
        }

        let listener = TcpListener::bind(config.bind).await?;
        info!(
            addr = %listener.local_addr()?,
            max_connections = config.max_connections,
            "HTTP server listening"
        );

        let connection_semaphore = Arc::new(Semaphore::new(config.max_connections));

        Ok(Self {
            config,
            listener,
            connection_semaphore,
        })
    }

    /// Returns the address actually bound.
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts a single connection once a slot is free.
    pub async fn accept(&self) -> ServerResult<Connection> {
        let permit = self
            .connection_semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ServerError::Shutdown)?;

        let (stream, peer) = self.listener.accept().await?;
        debug!(peer = %peer, "Accepted new connection");

        Ok(Connection {
            stream,
            peer,
            timeout: self.config.connection_timeout,
            max_request_bytes: self.config.max_request_bytes,
            _permit: permit,
        })
    }

    /// Runs the accept loop, spawning the handler for each connection.
    ///
    /// Only returns if the connection semaphore is closed.
    pub async fn run<F, Fut>(&self, handler: F) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        loop {
            match self.accept().await {
                Ok(connection) => {
                    tokio::spawn(handler(connection));
                }
                Err(ServerError::Shutdown) => return Err(ServerError::Shutdown),
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    /// Runs the accept loop until `shutdown` completes.
    pub async fn run_until_shutdown<F, Fut, S>(&self, handler: F, shutdown: S) -> ServerResult<()>
    where
        F: Fn(Connection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
        S: std::future::Future<Output = ()> + Send,
    {
        tokio::select! {
            result = self.run(handler) => result,
            _ = shutdown => {
                info!("Shutdown signal received");
                Ok(())
            }
        }
    }
}

/// A client connection carrying one request.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    timeout: Duration,
    max_request_bytes: usize,
    _permit: OwnedSemaphorePermit,
}

impl Connection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Reads the request head.
    ///
    /// The connection timeout bounds the whole head, not each read.
    /// Returns `Ok(None)` if the client closed the connection without
    /// sending anything.
    pub async fn read_request(&mut self) -> ServerResult<Option<HttpRequest>> {
        match tokio::time::timeout(self.timeout, self.read_head()).await {
            Ok(result) => result,
            Err(_) => Err(ServerError::timeout("read request")),
        }
    }

    async fn read_head(&mut self) -> ServerResult<Option<HttpRequest>> {
        let mut buf = Vec::with_capacity(1024);
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            let n = self.stream.read(&mut chunk).await?;

            if n == 0 {
                if buf.is_empty() {
                    return Ok(None);
                }
                return Err(ServerError::bad_request("connection closed mid-request"));
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = head_len(&buf) {
                break end;
            }
            if buf.len() > self.max_request_bytes {
                return Err(ServerError::RequestTooLarge {
                    size: buf.len(),
                    max: self.max_request_bytes,
                });
            }
        };

        if head_end > self.max_request_bytes {
            return Err(ServerError::RequestTooLarge {
                size: head_end,
                max: self.max_request_bytes,
            });
        }

        let head = std::str::from_utf8(&buf[..head_end])
            .map_err(|_| ServerError::bad_request("request head is not valid UTF-8"))?;
        HttpRequest::parse(head).map(Some)
    }

    /// Writes the response and closes the write half.
    pub async fn write_response(&mut self, response: &HttpResponse) -> ServerResult<()> {
        let bytes = response.to_bytes();
        let write = async {
            self.stream.write_all(&bytes).await?;
            self.stream.shutdown().await
        };

        match tokio::time::timeout(self.timeout, write).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ServerError::timeout("write response")),
        }
    }
}
