// Connection handling module
// Admission against the connection limit, then HTTP/1 serving on its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection if the limit allows it and serve it in a spawned task
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so concurrent accepts cannot overshoot
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            );
            drop(stream);
            return;
        }
    }

    tracing::debug!("[Connection] Accepted from: {peer_addr}");
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve one connection with keep-alive and an overall timeout
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let performance = &state.config.performance;
        let timeout_duration = Duration::from_secs(performance.connection_timeout());

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive());

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&peer_addr, &err),
            Err(_) => {
                tracing::debug!(
                    "Connection from {peer_addr} closed after {} seconds timeout",
                    timeout_duration.as_secs()
                );
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
