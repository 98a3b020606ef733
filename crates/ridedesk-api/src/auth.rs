// Admin sign-in
//
// `POST /auth/signin` exchanges email/password for a bearer token. The
// token is installed into the shared session; nothing else is persisted
// here.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::SignInResponse;

impl AdminClient {
    /// Authenticate with email and password.
    ///
    /// On success the access token is stored in the session and also
    /// returned so callers can persist it (keyring, config).
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SecretString, Error> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let builder = self.anonymous(Method::POST, &["auth", "signin"])?.json(&body);
        let resp = self.send(builder).await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let detail = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("sign-in rejected (HTTP {status}): {detail}"),
            });
        }

        let parsed: SignInResponse = self.handle_response(resp).await?;
        if parsed.access_token.is_empty() {
            return Err(Error::Authentication {
                message: "backend returned an empty access token".into(),
            });
        }

        self.session()
            .set_token(SecretString::from(parsed.access_token.clone()));
        debug!(email, "sign-in successful");
        Ok(SecretString::from(parsed.access_token))
    }

    /// Forget the current bearer token. There is no server-side logout.
    pub fn sign_out(&self) {
        self.session().clear();
    }
}
