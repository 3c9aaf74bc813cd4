//! Request attributes consumed by the matcher.
//!
//! # Responsibilities
//! - Carry method, host, AJAX flag and decoded path
//! - Extract them from an `http::Request`
//!
//! # Design Decisions
//! - The matcher only sees plain fields, never the HTTP type
//! - AJAX means a non-empty `X-Requested-With` header
//! - Path is percent-decoded here; the raw path is kept if decoding
//!   does not yield UTF-8

use axum::http::{header, Request};
use std::borrow::Cow;

/// Header used by browsers' XHR helpers to flag AJAX requests.
pub const AJAX_HEADER: &str = "x-requested-with";

/// The request attributes routing depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest<'a> {
    pub method: Cow<'a, str>,
    pub hostname: Cow<'a, str>,
    pub ajax: bool,
    /// Percent-decoded path; edges are trimmed by the matcher.
    pub path: Cow<'a, str>,
}

impl<'a> RouteRequest<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            method: Cow::Borrowed(method),
            hostname: Cow::Borrowed(""),
            ajax: false,
            path: Cow::Borrowed(path),
        }
    }

    pub fn with_hostname(mut self, hostname: &'a str) -> Self {
        self.hostname = Cow::Borrowed(hostname);
        self
    }

    pub fn with_ajax(mut self, ajax: bool) -> Self {
        self.ajax = ajax;
        self
    }

    /// Extract routing attributes from an HTTP request.
    pub fn from_http<B>(req: &'a Request<B>) -> Self {
        let hostname = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()))
            .unwrap_or("");

        let ajax = req
            .headers()
            .get(AJAX_HEADER)
            .map(|v| !v.as_bytes().is_empty())
            .unwrap_or(false);

        let raw_path = req.uri().path();
        let path = urlencoding::decode(raw_path).unwrap_or(Cow::Borrowed(raw_path));

        Self {
            method: Cow::Borrowed(req.method().as_str()),
            hostname: Cow::Borrowed(hostname),
            ajax,
            path,
        }
    }
}
