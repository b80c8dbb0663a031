use crate::models::{ErrorKind, FormErrors, HelloInfo, LogonResponse};
use crate::query::Query;
use crate::store::LogonRequest;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("logon-flow/", env!("CARGO_PKG_VERSION"));

/// Header the identity provider requires on every API call
pub const XSRF_HEADER: &str = "Kopano-Konnect-XSRF";

/// Error type for identity provider requests
#[derive(Debug)]
pub enum AuthError {
    ClientError(String),
    NetworkError(String),
    JsonError(String),
    UnexpectedStatus(u16),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::ClientError(msg) => write!(f, "Client error: {}", msg),
            AuthError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AuthError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            AuthError::UnexpectedStatus(status) => {
                write!(f, "Unexpected response status: {}", status)
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ErrorKind {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::ClientError(msg) | AuthError::NetworkError(msg) => ErrorKind::Network(msg),
            AuthError::JsonError(msg) => ErrorKind::InvalidResponse(msg),
            AuthError::UnexpectedStatus(status) => ErrorKind::UnexpectedStatus(status),
        }
    }
}

/// Flow parameters sent along with hello and logon requests
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HelloRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
}

impl HelloRequest {
    pub fn from_query(query: &Query) -> Self {
        let owned = |key: &str| query.get(key).map(str::to_string);
        Self {
            prompt: owned("prompt"),
            scope: owned("scope"),
            client_id: owned("client_id"),
            redirect_uri: owned("redirect_uri"),
            flow: owned("flow"),
        }
    }
}

#[derive(Serialize)]
struct LogonBody<'a> {
    params: [&'a str; 3],
    hello: HelloRequest,
}

#[derive(Deserialize)]
struct LogonReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    hello: Option<HelloInfo>,
}

/// Seam between the submit logic and the transport
#[allow(async_fn_in_trait)]
pub trait LogonBackend {
    async fn logon(&self, request: &LogonRequest) -> Result<LogonResponse, AuthError>;
}

/// Map a logon HTTP response to the form's view of it.
///
/// 200 carries a JSON verdict, 204 means the credentials were refused.
pub fn interpret_logon_response(status: u16, body: &str) -> Result<LogonResponse, AuthError> {
    match status {
        200 => {
            let reply: LogonReply = serde_json::from_str(body)
                .map_err(|e| AuthError::JsonError(format!("Failed to parse logon reply: {}", e)))?;
            if reply.success {
                Ok(LogonResponse::succeeded(reply.hello))
            } else {
                Ok(LogonResponse::failed(FormErrors::http_error(
                    ErrorKind::LogonFailed,
                )))
            }
        }
        204 => Ok(LogonResponse::failed(FormErrors::http_error(
            ErrorKind::LogonFailed,
        ))),
        status => Err(AuthError::UnexpectedStatus(status)),
    }
}

/// Map a hello HTTP response. 204 means there is no session.
pub fn interpret_hello_response(status: u16, body: &str) -> Result<HelloInfo, AuthError> {
    match status {
        200 => serde_json::from_str(body)
            .map_err(|e| AuthError::JsonError(format!("Failed to parse hello: {}", e))),
        204 => Ok(HelloInfo::default()),
        status => Err(AuthError::UnexpectedStatus(status)),
    }
}

/// HTTP client for the identifier API
pub struct IdentifierClient {
    server_url: String,
    client: reqwest::Client,
}

impl IdentifierClient {
    /// Create a client for the identity provider at `server_url`
    pub fn new(server_url: &str) -> Result<Self, AuthError> {
        // In the browser, fetch owns timeouts and the user agent.
        #[cfg(not(target_arch = "wasm32"))]
        let builder = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(USER_AGENT);
        #[cfg(target_arch = "wasm32")]
        let builder = reqwest::Client::builder();

        let client = builder
            .build()
            .map_err(|e| AuthError::ClientError(format!("Client build failed: {}", e)))?;

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/identifier/_/{}", self.server_url, name)
    }

    async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<(u16, String), AuthError> {
        let response = self
            .client
            .post(url)
            .header(XSRF_HEADER, "1")
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::NetworkError(format!("Failed to read response: {}", e)))?;
        Ok((status, text))
    }

    /// Ask the identity provider whether a session exists for this browser
    pub async fn hello(&self, query: &Query) -> Result<HelloInfo, AuthError> {
        let url = self.endpoint("hello");
        log::debug!("hello request to {}", url);

        let (status, body) = self.post_json(&url, &HelloRequest::from_query(query)).await?;
        interpret_hello_response(status, &body)
    }
}

impl LogonBackend for IdentifierClient {
    async fn logon(&self, request: &LogonRequest) -> Result<LogonResponse, AuthError> {
        let url = self.endpoint("logon");
        log::debug!("logon request for {} to {}", request.username, url);

        let body = LogonBody {
            params: [
                request.username.as_str(),
                request.password.as_str(),
                if request.remember { "1" } else { "0" },
            ],
            hello: HelloRequest::from_query(&request.query),
        };
        let (status, text) = self.post_json(&url, &body).await?;
        interpret_logon_response(status, &text)
    }
}
