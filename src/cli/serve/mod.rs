//! Sitemap server.
//!
//! Answers the index, every sitemap page and `robots.txt` straight from the
//! content manifest. Documents are cached until their TTL runs out or the
//! manifest changes on disk.

mod lifecycle;
mod response;
mod route;
mod state;

pub use lifecycle::{is_shutdown, setup_shutdown_handler};
pub use route::{Route, robots_txt};

use crate::config::SitemapperConfig;
use crate::{debug, log};
use anyhow::{Context, Result};
use crossbeam::channel;
use state::SiteState;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Worker threads answering requests.
const WORKER_THREADS: usize = 4;

/// Bind, then answer requests until Ctrl+C.
pub fn serve(config: SitemapperConfig) -> Result<()> {
    let state = Arc::new(SiteState::load(config)?);
    let serve = &state.config().serve;

    let (server, addr) = lifecycle::bind_with_retry(serve.interface, serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server(Arc::clone(&server), shutdown_tx);
    let janitor = lifecycle::spawn_janitor(Arc::clone(&state), shutdown_rx);

    log!("serve"; "http://{}/sitemap.xml", addr);
    run_request_loop(&server, &state)?;
    lifecycle::wait_for_shutdown(janitor);
    Ok(())
}

fn run_request_loop(server: &Server, state: &Arc<SiteState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKER_THREADS)
        .build()
        .context("Failed to create request thread pool")?;

    let base_path = route::base_path(state.config().site_url()?);

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        let base_path = base_path.clone();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state, &base_path) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &SiteState, base_path: &str) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_read_method(request.method()) {
        return response::respond_method_not_allowed(request);
    }

    if let Err(e) = state.refresh() {
        log!("serve"; "keeping previous content: {e:#}");
    }

    let route = Route::parse(request.url(), base_path);
    debug!("serve"; "{} {} -> {:?}", request.method(), request.url(), route);

    match route {
        Route::Index => serve_document(request, state, crate::generator::INDEX_NAME, 1),
        Route::Sitemap { name, page } => serve_document(request, state, &name, page),
        Route::Robots => {
            let body = robots_txt(state.config().site_url()?);
            response::respond_text(request, body)
        }
        Route::NotFound => response::respond_not_found(request),
    }
}

fn serve_document(request: Request, state: &SiteState, name: &str, page: u64) -> Result<()> {
    match state.document(name, page) {
        Ok(document) => response::respond_xml(request, &document),
        Err(e) if e.is_not_found() => {
            debug!("serve"; "{}", e);
            response::respond_not_found(request)
        }
        Err(e) => {
            let e = anyhow::Error::from(e);
            log!("error"; "{e:#}");
            response::respond_error(request)
        }
    }
}
