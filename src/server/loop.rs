// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;

/// Run the accept loop on `listener` until `shutdown` completes
///
/// Connections already being served keep running on their own tasks.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                }
            }

            () = &mut shutdown => {
                tracing::info!(
                    "Shutting down, {} connection(s) still active",
                    active_connections.load(Ordering::SeqCst)
                );
                break;
            }
        }
    }
}
