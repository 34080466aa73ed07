//! Client metadata taken from request headers and the connection.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};

/// Header carrying the client's device identifier.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// User agent, address and device header of the caller.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub device_id: Option<String>,
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            user_agent: user_agent(&parts.headers),
            ip_address: remote_addr(&parts.headers, &parts.extensions),
            device_id: header_value(&parts.headers, DEVICE_ID_HEADER),
        })
    }
}

/// First hop of `X-Forwarded-For`, else the peer address of the connection.
pub fn remote_addr(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match forwarded {
        Some(addr) => Some(addr.to_string()),
        None => extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string()),
    }
}

/// The `User-Agent` header.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "user-agent")
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
