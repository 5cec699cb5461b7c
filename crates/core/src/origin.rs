use std::{fmt, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::config::Config;

/// Substituted whenever the request host is not on the allow list.
pub const DEFAULT_ORIGIN: &str = "yearn.fi";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// An allow-listed origin, safe to build same-origin asset URLs from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SafeOrigin {
    pub host: String,
    pub protocol: Protocol,
}

fn is_port(s: &str) -> bool {
    s.len() <= 5 && s.bytes().all(|b| b.is_ascii_digit()) && s.parse::<u16>().is_ok()
}

impl SafeOrigin {
    pub fn resolve(raw_host: &str, allowed: &[&str]) -> Self {
        let (hostname, port) = match raw_host.split_once(':') {
            Some((hostname, port)) => (hostname, Some(port)),
            None => (raw_host, None),
        };
        let host = if allowed.contains(&raw_host) {
            raw_host.to_string()
        } else if allowed.contains(&hostname) {
            match port {
                None | Some("") => hostname.to_string(),
                Some(port) if is_port(port) => format!("{hostname}:{port}"),
                // Anything else could smuggle userinfo or a path into the URL
                Some(_) => DEFAULT_ORIGIN.to_string(),
            }
        } else {
            DEFAULT_ORIGIN.to_string()
        };
        let protocol = if host.contains("localhost") { Protocol::Http } else { Protocol::Https };
        Self { host, protocol }
    }

    /// Absolute URL for a path on this origin. `path` must start with `/`.
    pub fn url(&self, path: &str) -> String { format!("{}{path}", self) }
}

impl fmt::Display for SafeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol.as_str(), self.host)
    }
}

/// Resolved from `X-Forwarded-Host`, falling back to `Host`.
impl<S> FromRequestParts<S> for SafeOrigin
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = <Arc<Config>>::from_ref(state);
        let raw_host = parts
            .headers
            .get("x-forwarded-host")
            .or_else(|| parts.headers.get(header::HOST))
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let origin = Self::resolve(raw_host, &config.server.allowed_hosts());
        if origin.host != raw_host {
            tracing::debug!("Host {:?} not allowed, using {}", raw_host, origin.host);
        }
        Ok(origin)
    }
}
