//! Server lifecycle: binding, Ctrl+C shutdown and background cache upkeep.
//!
//! The Ctrl+C handler is installed once at program start. Until a server is
//! registered it simply exits; afterwards it unblocks the request loop and
//! signals the background threads.

use super::state::SiteState;
use crate::{debug, log};
use anyhow::{Result, anyhow};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use std::{
    net::{IpAddr, SocketAddr},
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Upper bound on the time between expired-entry sweeps.
const MAX_PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for background threads
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Setup the global Ctrl+C handler. Call once at program start.
pub fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.send(());
        }

        if let Some(server) = SERVER.get() {
            log!("serve"; "shutting down...");
            server.unblock();
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown.
///
/// Call this after binding the server, before entering the request loop.
pub fn register_server(server: Arc<Server>, shutdown_tx: Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Sweep interval for a cache TTL.
fn purge_interval(ttl: Duration) -> Duration {
    ttl.clamp(Duration::from_secs(1), MAX_PURGE_INTERVAL)
}

/// Spawn the thread that drops expired cache entries until shutdown.
pub fn spawn_janitor(state: Arc<SiteState>, shutdown_rx: Receiver<()>) -> Option<JoinHandle<()>> {
    if !state.config().cache.enable {
        return None;
    }
    let interval = purge_interval(state.config().cache.ttl());

    Some(thread::spawn(move || {
        loop {
            match shutdown_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let purged = state.cache().purge_expired();
                    if purged > 0 {
                        debug!("cache"; "purged {} expired documents", purged);
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }))
}

/// Wait for the background thread to stop (max 2 seconds).
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_interval_bounds() {
        assert_eq!(purge_interval(Duration::ZERO), Duration::from_secs(1));
        assert_eq!(purge_interval(Duration::from_secs(30)), Duration::from_secs(30));
        assert_eq!(purge_interval(Duration::from_secs(86400)), MAX_PURGE_INTERVAL);
    }

    #[test]
    fn test_bind_with_retry_skips_taken_port() {
        let localhost = IpAddr::from([127, 0, 0, 1]);
        let (first, first_addr) = bind_with_retry(localhost, 0).unwrap();
        let port = first.server_addr().to_ip().map(|a| a.port()).unwrap();
        assert_eq!(first_addr.ip(), localhost);

        let (_second, second_addr) = bind_with_retry(localhost, port).unwrap();
        assert_ne!(second_addr.port(), port);
    }
}
