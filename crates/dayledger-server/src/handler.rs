//! Request routing.
//!
//! Routes:
//! - `GET /calendar?from=YYYY-MM-DD&to=YYYY-MM-DD`: the assembled schedule
//! - `GET /health`: liveness probe
//!
//! Anything else is 404, and non-GET methods are 405.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use dayledger_core::{ScheduleError, parse_date, render_json};
use tracing::{Instrument, debug, field, info, info_span, warn};

use crate::error::{ServerError, ServerResult};
use crate::http::{HttpRequest, HttpResponse, StatusCode};
use crate::listener::Connection;
use crate::service::ScheduleService;

/// Routes requests to the schedule service.
pub struct RequestHandler {
    service: Arc<ScheduleService>,
    /// Fixed "today" used when a date parameter is missing.
    today: Option<NaiveDate>,
}

impl RequestHandler {
    pub fn new(service: Arc<ScheduleService>) -> Self {
        Self {
            service,
            today: None,
        }
    }

    /// Pins the date substituted for missing `from`/`to` parameters.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Produces the response for one request.
    pub async fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let started = Instant::now();

        let response = if !request.is_get() {
            HttpResponse::error(StatusCode::MethodNotAllowed, "Method Not Allowed")
                .with_header("Allow", "GET")
        } else {
            match request.path.as_str() {
                "/calendar" => self.calendar(request).await,
                "/health" => HttpResponse::json(StatusCode::Ok, r#"{"status":"ok"}"#),
                _ => HttpResponse::error(StatusCode::NotFound, "Not Found"),
            }
        };

        info!(
            method = %request.method,
            path = %request.path,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Handled request"
        );

        response
    }

    async fn calendar(&self, request: &HttpRequest) -> HttpResponse {
        let result = async {
            let from = self.date_param(request, "from")?;
            let to = self.date_param(request, "to")?;
            self.service.build_schedule(from, to).await
        }
        .await;

        match result {
            Ok(events) => match render_json(&events) {
                Ok(body) => {
                    info!(events = events.len(), "Built schedule");
                    HttpResponse::json(StatusCode::Ok, body)
                }
                Err(e) => HttpResponse::error(
                    StatusCode::InternalServerError,
                    format!("failed to encode schedule: {}", e),
                ),
            },
            Err(e) => schedule_error_response(&e),
        }
    }

    fn date_param(&self, request: &HttpRequest, name: &str) -> Result<NaiveDate, ScheduleError> {
        match request.query(name) {
            Some(value) => parse_date(value),
            None => Ok(self.today()),
        }
    }

    /// Reads one request from `conn` and writes the response, inside a
    /// `request` span carrying the peer address, method and path.
    pub async fn handle_connection(&self, conn: Connection) -> ServerResult<()> {
        let span = info_span!(
            "request",
            peer = %conn.peer_addr(),
            method = field::Empty,
            path = field::Empty,
        );
        self.serve(conn).instrument(span).await
    }

    async fn serve(&self, mut conn: Connection) -> ServerResult<()> {
        let response = match conn.read_request().await {
            Ok(Some(request)) => {
                let span = tracing::Span::current();
                span.record("method", request.method.as_str());
                span.record("path", request.path.as_str());
                self.handle(&request).await
            }
            Ok(None) => {
                debug!(peer = %conn.peer_addr(), "Client disconnected");
                return Ok(());
            }
            Err(e) if e.is_client_error() => {
                warn!(peer = %conn.peer_addr(), error = %e, "Rejected request");
                HttpResponse::error(StatusCode::BadRequest, e.to_string())
            }
            Err(e) => return Err(e),
        };

        conn.write_response(&response).await
    }
}

fn schedule_error_response(err: &ScheduleError) -> HttpResponse {
    if err.is_client_error() {
        warn!(error = %err, "Rejected schedule request");
        HttpResponse::error(StatusCode::BadRequest, err.to_string())
    } else {
        warn!(error = %err, "Schedule request failed");
        HttpResponse::error(StatusCode::InternalServerError, err.to_string())
    }
}

/// Creates a connection handler function for use with [`HttpServer::run`].
///
/// [`HttpServer::run`]: crate::HttpServer::run
pub fn make_connection_handler(
    handler: Arc<RequestHandler>,
) -> impl Fn(Connection) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
    move |conn| {
        let handler = handler.clone();
        Box::pin(async move {
            if let Err(e) = handler.handle_connection(conn).await
                && !matches!(e, ServerError::Shutdown)
            {
                warn!(error = %e, "Connection handler error");
            }
        })
    }
}
