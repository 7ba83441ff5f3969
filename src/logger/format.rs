//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{DateTime, Local};
use hyper::header::{HeaderMap, HeaderName, REFERER, USER_AGENT};
use hyper::{Method, StatusCode, Uri, Version};
use serde::Serialize;

const TIME_LOCAL: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One served request, as written to the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: &'static str,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Processing time in microseconds
    pub request_time_us: u64,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    remote_addr: &'a str,
    time: String,
    method: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    http_version: &'a str,
    status: u16,
    body_bytes: u64,
    referer: Option<&'a str>,
    user_agent: Option<&'a str>,
    request_time_us: u64,
}

impl AccessLogEntry {
    /// Capture the request side of the entry; the response side is filled by `finish`
    pub fn from_request(
        peer: SocketAddr,
        method: &Method,
        uri: &Uri,
        version: Version,
        headers: &HeaderMap,
    ) -> Self {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            remote_addr: peer.ip().to_string(),
            time: Local::now(),
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            http_version: version_str(version),
            status: 0,
            body_bytes: 0,
            referer: header(REFERER),
            user_agent: header(USER_AGENT),
            request_time_us: 0,
        }
    }

    pub fn finish(&mut self, status: StatusCode, body_bytes: u64, elapsed: Duration) {
        self.status = status.as_u16();
        self.body_bytes = body_bytes;
        self.request_time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    }

    /// Format the entry: `combined`, `common`, `json`, or a custom pattern
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            pattern => self.format_custom(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(TIME_LOCAL),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        let line = JsonLine {
            remote_addr: &self.remote_addr,
            time: self.time.to_rfc3339(),
            method: &self.method,
            path: &self.path,
            query: self.query.as_deref(),
            http_version: self.http_version,
            status: self.status,
            body_bytes: self.body_bytes,
            referer: self.referer.as_deref(),
            user_agent: self.user_agent.as_deref(),
            request_time_us: self.request_time_us,
        };
        serde_json::to_string(&line).unwrap_or_default()
    }

    fn variable(&self, name: &str) -> Option<String> {
        let value = match name {
            "remote_addr" => self.remote_addr.clone(),
            "time_local" => self.time.format(TIME_LOCAL).to_string(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request" => self.request_line(),
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            "http_user_agent" => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            #[allow(clippy::cast_precision_loss)]
            "request_time" => format!("{:.3}", self.request_time_us as f64 / 1_000_000.0),
            _ => return None,
        };
        Some(value)
    }

    /// Substitute `$name` variables in one pass; unknown variables are kept verbatim
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;

        while let Some(start) = rest.find('$') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..len];
            match self.variable(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }
        out.push_str(rest);
        out
    }
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn entry() -> AccessLogEntry {
        let mut headers = HeaderMap::new();
        headers.insert("referer", HeaderValue::from_static("https://example.com"));
        headers.insert("user-agent", HeaderValue::from_static("curl/8.5"));
        let uri: Uri = "/request-param-v1?username=kim&age=20".parse().unwrap();

        let mut entry = AccessLogEntry::from_request(
            "192.168.1.1:50000".parse().unwrap(),
            &Method::GET,
            &uri,
            Version::HTTP_11,
            &headers,
        );
        entry.finish(StatusCode::OK, 2, Duration::from_micros(1600));
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /request-param-v1?username=kim&age=20 HTTP/1.1\" 200 2"));
        assert!(log.ends_with("\"https://example.com\" \"curl/8.5\""));
    }

    #[test]
    fn test_format_common() {
        let log = entry().format("common");
        assert!(log.ends_with("HTTP/1.1\" 200 2"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_json() {
        let log = entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["query"], "username=kim&age=20");
        assert_eq!(value["status"], 200);
        assert_eq!(value["request_time_us"], 1600);
    }

    #[test]
    fn test_format_custom() {
        let log = entry().format("$request_method $request_uri $status $request_time $unknown");
        assert_eq!(
            log,
            "GET /request-param-v1?username=kim&age=20 200 0.002 $unknown"
        );
        assert_eq!(entry().format("$request"), "GET /request-param-v1?username=kim&age=20 HTTP/1.1");
    }
}
