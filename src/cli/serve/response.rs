//! HTTP response handlers.

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

pub const XML: &str = "application/xml; charset=UTF-8";
pub const PLAIN: &str = "text/plain; charset=UTF-8";

/// Respond with a sitemap document.
pub fn respond_xml(request: Request, body: &str) -> Result<()> {
    respond(request, 200, XML, body.as_bytes().to_vec())
}

/// Respond with plain text (robots.txt).
pub fn respond_text(request: Request, body: String) -> Result<()> {
    respond(request, 200, PLAIN, body.into_bytes())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 500 after a content source failure.
pub fn respond_error(request: Request) -> Result<()> {
    respond(request, 500, PLAIN, b"500 Internal Server Error".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN)?)
        .with_header(make_header("Allow", "GET, HEAD")?);
    request.respond(response)?;
    Ok(())
}

pub fn is_read_method(method: &Method) -> bool {
    matches!(method, Method::Get | Method::Head)
}

fn respond(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    if request.method() == &Method::Head {
        send_head(request, status, content_type, body.len())
    } else {
        send_body(request, status, content_type, body)
    }
}

fn send_head(request: Request, status: u16, content_type: &'static str, len: usize) -> Result<()> {
    let response = Response::new(
        StatusCode(status),
        vec![make_header("Content-Type", content_type)?],
        std::io::empty(),
        Some(len),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow::anyhow!("invalid header `{key}`"))
}
