// Admin backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer attachment from
// the shared `Session`, and error folding. Endpoint groups (users,
// bookings, vehicles, legal) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

// ── Error response shape from the backend ───────────────────────────

/// Validation errors arrive as a list of messages, everything else as one string.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<ErrorMessage>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        match self.message {
            Some(ErrorMessage::One(m)) => Some(m),
            Some(ErrorMessage::Many(list)) if !list.is_empty() => Some(list.join("; ")),
            _ => self.error,
        }
    }
}

/// First 200 characters of a response body, for error messages.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the booking service admin API.
///
/// Admin endpoints require a bearer token held by the shared [`Session`].
/// A call made without one fails with [`Error::NotSignedIn`] before any
/// network I/O; a 401 or 403 response clears the session.
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    timeout: Duration,
}

impl AdminClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config with a fresh session.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_session(base_url, transport, Arc::new(Session::new()))
    }

    /// Build sharing an existing session (the controller owns it).
    pub fn with_session(
        base_url: &str,
        transport: &TransportConfig,
        session: Arc<Session>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            session,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        session: Arc<Session>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            session,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// Ensure the base path ends with `/` so appended segments keep any
    /// prefix (e.g. `https://host/api` + `bookings/admin/all`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so an id containing
    /// `/`, `?` or `#` stays inside its segment. Empty, `.` and `..`
    /// segments are refused: URL normalization would drop or collapse them.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidPathSegment {
                segment: (*bad).to_owned(),
            });
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request builders ─────────────────────────────────────────────

    /// Unauthenticated request (sign-in, public legal pages).
    pub(crate) fn anonymous(&self, method: Method, path: &[&str]) -> Result<RequestBuilder, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");
        Ok(self.http.request(method, url))
    }

    /// Request carrying `Authorization: Bearer <token>`.
    pub(crate) fn authorized(&self, method: Method, path: &[&str]) -> Result<RequestBuilder, Error> {
        let token = self.session.token().ok_or(Error::NotSignedIn)?;
        let url = self.url(path)?;
        debug!("{method} {url}");
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    /// Bearer if signed in, anonymous otherwise.
    pub(crate) fn optionally_authorized(
        &self,
        method: Method,
        path: &[&str],
    ) -> Result<RequestBuilder, Error> {
        if self.session.is_signed_in() {
            self.authorized(method, path)
        } else {
            self.anonymous(method, path)
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let builder = self.authorized(Method::GET, path)?.query(params);
        let resp = self.send(builder).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let builder = self.authorized(Method::POST, path)?.json(body);
        let resp = self.send(builder).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &[&str],
        body: &B,
    ) -> Result<(), Error> {
        let builder = self.authorized(Method::POST, path)?.json(body);
        let resp = self.send(builder).await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let builder = self.authorized(Method::PATCH, path)?.json(body);
        let resp = self.send(builder).await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn patch_no_response<B: Serialize + Sync>(
        &self,
        path: &[&str],
        body: &B,
    ) -> Result<(), Error> {
        let builder = self.authorized(Method::PATCH, path)?.json(body);
        let resp = self.send(builder).await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &[&str]) -> Result<(), Error> {
        let builder = self.authorized(Method::DELETE, path)?;
        let resp = self.send(builder).await?;
        self.handle_empty(resp).await
    }

    /// Dispatch a prepared request, folding client-side timeouts into
    /// [`Error::Timeout`] with the configured limit.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout: self.timeout,
            }
        } else {
            Error::Transport(e)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| self.transport_error(e))?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = preview(&body);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    pub(crate) async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(ErrorResponse::into_message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    preview(&raw)
                }
            });

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("bearer token rejected, clearing session");
                self.session.clear();
                Error::SessionExpired
            }
            StatusCode::FORBIDDEN => {
                warn!("admin access denied, clearing session");
                self.session.clear();
                Error::Forbidden { message }
            }
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let client = AdminClient::new("https://api.example.com/v2", &TransportConfig::default())
            .unwrap();
        let url = client.url(&["bookings", "admin", "all"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/bookings/admin/all");
    }

    #[test]
    fn base_url_without_path() {
        let client =
            AdminClient::new("https://api.example.com/", &TransportConfig::default()).unwrap();
        let url = client.url(&["auth", "signin"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/auth/signin");
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let client = AdminClient::new("https://api.example.com/v2", &TransportConfig::default())
            .unwrap();
        let url = client
            .url(&["auth", "admin", "u1?x=1#", "suspend"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v2/auth/admin/u1%3Fx=1%23/suspend"
        );
        assert_eq!(url.query(), None);

        let url = client.url(&["legal", "../../bookings/admin/B1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v2/legal/..%2F..%2Fbookings%2Fadmin%2FB1"
        );
    }

    #[test]
    fn dot_and_empty_ids_are_refused() {
        let client =
            AdminClient::new("https://api.example.com", &TransportConfig::default()).unwrap();
        for id in ["", ".", ".."] {
            let result = client.url(&["auth", "admin", id]);
            assert!(
                matches!(result, Err(Error::InvalidPathSegment { ref segment }) if segment == id),
                "{id:?} should be refused"
            );
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = AdminClient::new("not a url", &TransportConfig::default());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn authorized_without_token_fails_early() {
        let client =
            AdminClient::new("https://api.example.com", &TransportConfig::default()).unwrap();
        let result = client.authorized(Method::GET, &["vehicles"]);
        assert!(matches!(result, Err(Error::NotSignedIn)));
    }

    #[test]
    fn error_message_folding() {
        let list: ErrorResponse =
            serde_json::from_str(r#"{"message":["price must be a number","price too low"]}"#)
                .unwrap();
        assert_eq!(
            list.into_message().as_deref(),
            Some("price must be a number; price too low")
        );

        let single: ErrorResponse =
            serde_json::from_str(r#"{"message":"Booking not found","error":"Not Found"}"#)
                .unwrap();
        assert_eq!(single.into_message().as_deref(), Some("Booking not found"));

        let fallback: ErrorResponse =
            serde_json::from_str(r#"{"message":[],"error":"Bad Request"}"#).unwrap();
        assert_eq!(fallback.into_message().as_deref(), Some("Bad Request"));
    }
}
