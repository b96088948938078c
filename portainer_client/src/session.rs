//! Portainer session management.
//!
//! Owns the bearer-token lifecycle: tokens are created lazily on first
//! need, validated with a cheap probe before use, and re-created at most
//! once per invalidation. Validation policy is validate-then-use: every
//! [`SessionManager::token`] call probes `GET /api/status` with the cached
//! token and re-authenticates through `POST /api/auth` when the probe comes
//! back unauthorized. Tokens never survive a process restart.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::PortainerError;
use crate::transport::{ApiRequest, ApiTransport};

/// Total attempts per [`SessionManager::token`] call. An expired token
/// consumes the first attempt on its failed probe; the second performs
/// exactly one fresh login. The bound keeps a misbehaving orchestrator from
/// looping us forever.
pub const MAX_AUTH_ATTEMPTS: u32 = 2;

const AUTH_PATH: &str = "/api/auth";
const PROBE_PATH: &str = "/api/status";

/// Caches and renews the Portainer bearer token.
///
/// The token cell is shared mutable state across all concurrent operations
/// in the process; the async mutex is held across the probe/login sequence
/// so a single invalidation triggers a single re-authentication rather than
/// a storm of duplicate logins.
pub struct SessionManager {
    transport: Arc<dyn ApiTransport>,
    base_url: Url,
    username: String,
    password: SecretString,
    token: Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            transport,
            base_url,
            username: username.into(),
            password,
            token: Mutex::new(None),
        }
    }

    /// Produce a currently-valid bearer token.
    ///
    /// Errors: [`PortainerError::Authentication`] if the login itself is
    /// rejected, [`PortainerError::SessionExpired`] if the retry budget is
    /// exhausted, anything else propagated from the probe unmodified.
    pub async fn token(&self) -> Result<String, PortainerError> {
        let mut cached = self.token.lock().await;

        for _ in 0..MAX_AUTH_ATTEMPTS {
            match cached.clone() {
                None => {
                    let token = self.login().await?;
                    *cached = Some(token.clone());
                    return Ok(token);
                }
                Some(token) => {
                    let probe = ApiRequest::get(self.base_url.join(PROBE_PATH)?)
                        .with_bearer(token.clone());
                    let response = self.transport.execute(probe).await?;

                    if response.is_success() {
                        return Ok(token);
                    }
                    if response.is_unauthorized() {
                        warn!("cached Portainer token rejected, re-authenticating");
                        *cached = None;
                        continue;
                    }
                    return Err(PortainerError::from_response(&response));
                }
            }
        }

        Err(PortainerError::SessionExpired {
            attempts: MAX_AUTH_ATTEMPTS,
        })
    }

    async fn login(&self) -> Result<String, PortainerError> {
        debug!("logging in to Portainer");

        let request = ApiRequest::post(self.base_url.join(AUTH_PATH)?).with_body(json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        }));
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            return Err(PortainerError::Authentication(response.error_message()));
        }

        response
            .body
            .get("jwt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                PortainerError::MalformedResponse("auth response carried no jwt field".to_string())
            })
    }
}
