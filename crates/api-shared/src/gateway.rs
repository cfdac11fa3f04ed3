//! API-Gateway style proxy events.
//!
//! The repository can sit behind a function runtime that delivers each HTTP request as a
//! JSON event and expects a JSON response, with binary bodies base64 encoded. This module
//! models those payloads and maps them onto [`RepositoryService`].
//!
//! Only the fields the repository needs are modelled; unknown fields are ignored.

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use repo_core::{ReadOutcome, RepoError, RepositoryService};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub path_parameters: Option<PathParameters>,
    #[serde(default)]
    pub request_context: RequestContext,
}

/// Greedy path parameter captured by the route (`/{url+}`), still percent-encoded.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PathParameters {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RequestContext {
    /// Request path as sent by the client, used for trailing-slash redirects.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayRequest {
    /// HTTP method in upper case; events without one are treated as `GET`.
    pub fn method(&self) -> String {
        self.http_method
            .as_deref()
            .unwrap_or("GET")
            .to_ascii_uppercase()
    }

    /// Percent-decoded repository path, or `None` for the root.
    pub fn decoded_path(&self) -> Result<Option<String>, std::string::FromUtf8Error> {
        let Some(raw) = self.path_parameters.as_ref().and_then(|p| p.url.as_deref()) else {
            return Ok(None);
        };
        Ok(Some(urlencoding::decode(raw)?.into_owned()))
    }

    pub fn decoded_body(&self) -> Result<Bytes, base64::DecodeError> {
        let body = self.body.as_deref().unwrap_or_default();
        if self.is_base64_encoded {
            Ok(Bytes::from(general_purpose::STANDARD.decode(body)?))
        } else {
            Ok(Bytes::from(body.to_owned()))
        }
    }
}

impl GatewayResponse {
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self::with_content_type(status_code, "text/plain", body.into())
    }

    fn with_content_type(status_code: u16, content_type: &str, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_owned(), content_type.to_owned());
        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    pub fn from_outcome(outcome: ReadOutcome) -> Self {
        match outcome {
            ReadOutcome::Artifact(artifact) if artifact.is_binary() => Self {
                is_base64_encoded: true,
                ..Self::with_content_type(
                    200,
                    artifact.content_type(),
                    general_purpose::STANDARD.encode(&artifact.body),
                )
            },
            ReadOutcome::Artifact(artifact) => {
                Self::with_content_type(200, artifact.content_type(), artifact.text())
            }
            ReadOutcome::Listing(listing) => {
                Self::with_content_type(200, "text/html", listing.document)
            }
            ReadOutcome::Redirect(location) => {
                let mut response = Self::with_content_type(302, "text/html", String::new());
                response.headers.insert("Location".to_owned(), location);
                response
            }
        }
    }

    pub fn from_error(error: &RepoError) -> Self {
        if error.is_server_error() {
            tracing::error!("gateway request failed: {:?}", error);
        } else {
            tracing::debug!("gateway request rejected: {}", error);
        }
        Self::text(error.status_code(), error.public_message())
    }
}

/// Runs one gateway event against the repository.
///
/// `GET` reads files and listings, `PUT` uploads; any other method gets 405.
pub async fn dispatch(service: &RepositoryService, event: GatewayRequest) -> GatewayResponse {
    let path = match event.decoded_path() {
        Ok(path) => path,
        Err(_) => return GatewayResponse::text(400, "Invalid path"),
    };

    match event.method().as_str() {
        "GET" => match service.read(path.as_deref(), &event.request_context.path).await {
            Ok(outcome) => GatewayResponse::from_outcome(outcome),
            Err(e) => GatewayResponse::from_error(&e),
        },
        "PUT" => {
            let Ok(body) = event.decoded_body() else {
                return GatewayResponse::text(400, "Invalid body");
            };
            match service.write(path.as_deref().unwrap_or_default(), body).await {
                Ok(_) => GatewayResponse::text(200, "Uploaded"),
                Err(e) => GatewayResponse::from_error(&e),
            }
        }
        _ => GatewayResponse::text(405, "Method not allowed"),
    }
}
