use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::{SoundDirectory, SoundMethods};
use crate::domain::{CustomSoundEntry, MethodCallError, SoundRecord, SoundUploadRecord};

const METHOD_INSERT_OR_UPDATE_SOUND: &str = "insertOrUpdateSound";
const METHOD_UPLOAD_CUSTOM_SOUND: &str = "uploadCustomSound";
const METHOD_LIST_CUSTOM_SOUNDS: &str = "listCustomSounds";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const ENV_SERVER_URL: &str = "CHIMEBOARD_SERVER_URL";
const ENV_AUTH_TOKEN: &str = "CHIMEBOARD_AUTH_TOKEN";
const ENV_USER_ID: &str = "CHIMEBOARD_USER_ID";
const ENV_TIMEOUT_SECS: &str = "CHIMEBOARD_HTTP_TIMEOUT_SECS";

const MAX_ERROR_MESSAGE_LEN: usize = 256;

/// Blocking client for the workspace server's method-call surface:
/// `POST {base}/api/v1/method.call/{method}` with admin auth headers and a
/// `{ "params": [...] }` body.
#[derive(Debug)]
pub struct MethodGateway {
    base_url: String,
    auth_token: String,
    user_id: String,
    client: Client,
}

impl MethodGateway {
    pub fn from_env() -> Result<Self, MethodCallError> {
        let base_url = read_env_var(ENV_SERVER_URL)?.ok_or_else(|| {
            MethodCallError::config(
                "workspace server URL is missing (set CHIMEBOARD_SERVER_URL)",
            )
        })?;
        let auth_token = read_env_var(ENV_AUTH_TOKEN)?.ok_or_else(|| {
            MethodCallError::config(
                "workspace auth token is missing (set CHIMEBOARD_AUTH_TOKEN)",
            )
        })?;
        let user_id = read_env_var(ENV_USER_ID)?.ok_or_else(|| {
            MethodCallError::config("workspace user id is missing (set CHIMEBOARD_USER_ID)")
        })?;
        let timeout = read_timeout_from_env(ENV_TIMEOUT_SECS)?.unwrap_or(DEFAULT_TIMEOUT);

        Self::with_config(base_url, auth_token, user_id, timeout)
    }

    pub fn with_config(
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
        user_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MethodCallError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(MethodCallError::config(
                "workspace server URL must not be empty",
            ));
        }

        let auth_token = auth_token.into();
        if auth_token.trim().is_empty() {
            return Err(MethodCallError::config(
                "workspace auth token must not be empty",
            ));
        }

        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(MethodCallError::config(
                "workspace user id must not be empty",
            ));
        }

        let client = Client::builder().timeout(timeout).build().map_err(|err| {
            MethodCallError::internal(format!("failed to create method HTTP client: {err}"))
        })?;

        Ok(Self {
            base_url,
            auth_token,
            user_id,
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/api/v1/method.call/{method}",
            self.base_url.trim_end_matches('/')
        )
    }

    fn call_method(&self, method: &str, params: Value) -> Result<Value, MethodCallError> {
        let started = Instant::now();

        let response = self
            .client
            .post(self.method_url(method))
            .header("X-Auth-Token", &self.auth_token)
            .header("X-User-Id", &self.user_id)
            .header("content-type", "application/json")
            .json(&json!({ "params": params }))
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let envelope: MethodResponse = serde_json::from_str(&body).map_err(|err| {
            MethodCallError::invalid_response(format!("{method} response decode failed: {err}"))
        })?;

        tracing::debug!(
            method,
            latency_ms = started.elapsed().as_millis() as u64,
            "server method call completed"
        );

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

impl SoundMethods for MethodGateway {
    fn insert_or_update_sound(&self, record: &SoundRecord) -> Result<String, MethodCallError> {
        let result = self.call_method(METHOD_INSERT_OR_UPDATE_SOUND, json!([record]))?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                MethodCallError::invalid_response(
                    "insertOrUpdateSound did not return a string identifier",
                )
            })
    }

    fn upload_custom_sound(
        &self,
        contents: &[u8],
        mime_type: &str,
        record: &SoundUploadRecord,
    ) -> Result<(), MethodCallError> {
        let encoded = BASE64.encode(contents);
        self.call_method(
            METHOD_UPLOAD_CUSTOM_SOUND,
            json!([encoded, mime_type, record]),
        )?;
        Ok(())
    }
}

impl SoundDirectory for MethodGateway {
    fn list_custom_sounds(&self) -> Result<Vec<CustomSoundEntry>, MethodCallError> {
        let result = self.call_method(METHOD_LIST_CUSTOM_SOUNDS, json!([]))?;
        serde_json::from_value(result).map_err(|err| {
            MethodCallError::invalid_response(format!(
                "listCustomSounds returned an unexpected payload: {err}"
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct MethodResponse {
    #[serde(default)]
    result: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MethodErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn map_http_error(status: StatusCode, body: &str) -> MethodCallError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return MethodCallError::Auth;
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return MethodCallError::RateLimited;
    }
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        return MethodCallError::Timeout;
    }

    let parsed = serde_json::from_str::<MethodErrorEnvelope>(body).ok();
    let message = parsed
        .and_then(|envelope| envelope.message.or(envelope.error))
        .unwrap_or_else(|| truncate_message(body));
    MethodCallError::server(status.as_u16(), message)
}

fn map_transport_error(error: reqwest::Error) -> MethodCallError {
    if error.is_timeout() {
        return MethodCallError::Timeout;
    }
    MethodCallError::Transport {
        message: format!("method transport error: {error}"),
    }
}

fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

fn read_env_var(name: &str) -> Result<Option<String>, MethodCallError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(MethodCallError::config(format!(
            "{name} could not be read: {error}"
        ))),
    }
}

fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, MethodCallError> {
    let parsed = value.trim().parse::<u64>().map_err(|_| {
        MethodCallError::config(format!("{name} must be a positive integer in seconds"))
    })?;
    if parsed == 0 {
        return Err(MethodCallError::config(format!(
            "{name} must be greater than 0 seconds"
        )));
    }
    Ok(Duration::from_secs(parsed))
}

fn read_timeout_from_env(name: &str) -> Result<Option<Duration>, MethodCallError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_timeout_seconds(name, &value)?))
}
