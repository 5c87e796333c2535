//! OAuth2 PKCE sign-in with Google
//!
//! Implements the Authorization Code flow with PKCE (RFC 7636) for a native
//! desktop client, with a loopback redirect to a local callback server.
//!
//! ## Components
//!
//! - [`GoogleOAuthConfig`] - Client ID, secret, redirect port and scopes
//! - [`KeyringTokenStorage`] - Secure token storage using the system keyring
//! - [`PKCEFlow`] - OAuth2 PKCE challenge/exchange logic
//! - [`LocalCallbackServer`] - Minimal HTTP server for the OAuth redirect
//! - [`GoogleIdentityProvider`] - `IIdentityProvider` over the pieces above

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use http_body_util::Full;
use hyper::{body::Bytes, header::CONTENT_TYPE, Response, StatusCode};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use vervegallery_core::{
    config::AuthConfig,
    domain::UserProfile,
    ports::{IIdentityProvider, SignedIn, Tokens},
};

/// Google OAuth2 authorization endpoint
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OpenID userinfo endpoint
pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Keyring service name for storing tokens
const KEYRING_SERVICE: &str = "vervegallery";

// ============================================================================
// GoogleOAuthConfig
// ============================================================================

/// Configuration for the OAuth2 PKCE flow
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// OAuth client ID from the Google Cloud console
    pub client_id: String,
    /// Client secret; Google issues one even for desktop clients
    pub client_secret: Option<String>,
    /// Loopback port the redirect lands on
    pub redirect_port: u16,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl GoogleOAuthConfig {
    /// Builds the flow configuration from the `auth` section
    ///
    /// # Errors
    /// Fails when no client ID is configured
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let Some(client_id) = config.client_id.clone().filter(|id| !id.trim().is_empty()) else {
            bail!("auth.client_id is not configured");
        };
        Ok(Self {
            client_id,
            client_secret: config.client_secret.clone(),
            redirect_port: config.redirect_port,
            scopes: config.scopes.clone(),
        })
    }

    /// Redirect URI registered for the loopback callback
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/callback", self.redirect_port)
    }
}

// ============================================================================
// KeyringTokenStorage
// ============================================================================

/// Stores and retrieves OAuth tokens from the system keyring
///
/// Tokens are serialized as JSON under the service name "vervegallery" with
/// the user's email as the username.
pub struct KeyringTokenStorage;

impl KeyringTokenStorage {
    /// Stores tokens in the system keyring for the given user
    pub fn store(username: &str, tokens: &Tokens) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, username)
            .context("Failed to create keyring entry")?;

        let json = serde_json::to_string(tokens).context("Failed to serialize tokens")?;

        entry
            .set_password(&json)
            .context("Failed to store tokens in keyring")?;

        debug!(username, "Stored tokens in keyring");
        Ok(())
    }

    /// Loads tokens from the system keyring for the given user
    ///
    /// # Returns
    /// `Some(Tokens)` if found, `None` if there is no entry
    pub fn load(username: &str) -> Result<Option<Tokens>> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, username)
            .context("Failed to create keyring entry")?;

        match entry.get_password() {
            Ok(json) => {
                let tokens: Tokens = serde_json::from_str(&json)
                    .context("Failed to deserialize tokens from keyring")?;
                debug!(username, "Loaded tokens from keyring");
                Ok(Some(tokens))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(username, "No tokens found in keyring");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read from keyring")),
        }
    }

    /// Removes tokens from the system keyring for the given user
    pub fn clear(username: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, username)
            .context("Failed to create keyring entry")?;

        match entry.delete_credential() {
            Ok(()) => {
                info!(username, "Cleared tokens from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!(username, "No tokens to clear");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete from keyring")),
        }
    }
}

// ============================================================================
// PKCEFlow
// ============================================================================

/// OAuth2 PKCE flow implementation using the `oauth2` crate
pub struct PKCEFlow {
    client: BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
    scopes: Vec<String>,
}

impl PKCEFlow {
    /// Creates a new PKCEFlow with the given configuration
    pub fn new(config: &GoogleOAuthConfig) -> Result<Self> {
        let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string()).context("Invalid authorization URL")?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string()).context("Invalid token URL")?)
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri()).context("Invalid redirect URI")?,
            );

        if let Some(secret) = &config.client_secret {
            client = client.set_client_secret(ClientSecret::new(secret.clone()));
        }

        Ok(Self {
            client,
            scopes: config.scopes.clone(),
        })
    }

    /// Generates an authorization URL with a PKCE challenge
    ///
    /// # Returns
    /// A tuple of `(authorization_url, csrf_token, pkce_verifier)`.
    /// The `pkce_verifier` must be kept until the code exchange step.
    pub fn generate_auth_url(&self) -> (String, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = self.client.authorize_url(CsrfToken::new_random);

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.set_pkce_challenge(pkce_challenge).url();

        debug!("Generated authorization URL");
        (auth_url.to_string(), csrf_token, pkce_verifier)
    }

    /// Exchanges an authorization code for OAuth tokens
    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<Tokens> {
        info!("Exchanging authorization code for tokens");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client)
            .await
            .context("Failed to exchange authorization code")?;

        let expires_at = token_result
            .expires_in()
            .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
            .unwrap_or_else(|| Utc::now() + Duration::hours(1));

        Ok(Tokens {
            access_token: token_result.access_token().secret().to_string(),
            refresh_token: token_result.refresh_token().map(|t| t.secret().to_string()),
            expires_at,
        })
    }
}

// ============================================================================
// LocalCallbackServer
// ============================================================================

/// Minimal HTTP server that listens on the loopback interface for the
/// OAuth2 redirect.
///
/// Bind it before opening the browser so the redirect cannot arrive first.
pub struct LocalCallbackServer {
    listener: TcpListener,
}

/// Parameters extracted from the OAuth2 callback
#[derive(Debug)]
pub struct CallbackParams {
    /// The authorization code
    pub code: String,
    /// The CSRF state parameter
    pub state: String,
}

impl LocalCallbackServer {
    /// Binds the callback server to `127.0.0.1:{port}`
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("Failed to bind callback server to 127.0.0.1:{port}"))?;
        info!(port, "OAuth callback server listening");
        Ok(Self { listener })
    }

    /// Serves connections until one carries an authorization code
    ///
    /// Requests without a code (a favicon fetch, a denied consent) get an
    /// error page; a denied consent also ends the wait with an error.
    pub async fn wait_for_callback(self) -> Result<CallbackParams> {
        use hyper::server::conn::http1;
        use hyper::service::service_fn;
        use hyper_util::rt::TokioIo;
        use tokio::sync::mpsc;

        let (tx, mut rx) = mpsc::channel::<Result<CallbackParams, String>>(1);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, _addr) =
                        accepted.context("Failed to accept connection on callback server")?;
                    let io = TokioIo::new(stream);
                    let tx = tx.clone();

                    let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                        let tx = tx.clone();
                        async move {
                            let uri = req.uri().to_string();
                            debug!(uri = %uri, "Callback server received request");

                            let response = match parse_callback_params(&uri) {
                                Some(params) => {
                                    let _ = tx.send(Ok(params)).await;
                                    html_response(StatusCode::OK, success_html())
                                }
                                None => match parse_callback_error(&uri) {
                                    Some(error) => {
                                        let page = error_html(&error);
                                        let _ = tx.send(Err(error)).await;
                                        html_response(StatusCode::BAD_REQUEST, page)
                                    }
                                    None => html_response(
                                        StatusCode::NOT_FOUND,
                                        error_html("Missing authorization code in callback"),
                                    ),
                                },
                            };
                            Ok::<_, hyper::Error>(response)
                        }
                    });

                    tokio::spawn(async move {
                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            warn!(error = %e, "Callback server connection error");
                        }
                    });
                }
                received = rx.recv() => {
                    return match received {
                        Some(Ok(params)) => {
                            info!("Received OAuth callback with authorization code");
                            Ok(params)
                        }
                        Some(Err(error)) => bail!("Authorization was denied: {error}"),
                        None => bail!("Callback server channel closed without receiving parameters"),
                    };
                }
            }
        }
    }
}

fn html_response(status: StatusCode, html: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(html)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

/// Parses the authorization code and state from a callback URI
fn parse_callback_params(uri: &str) -> Option<CallbackParams> {
    let url = url::Url::parse(&format!("http://localhost{}", uri)).ok()?;
    let mut code = None;
    let mut state = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "state" => state = Some(value.to_string()),
            _ => {}
        }
    }

    Some(CallbackParams {
        code: code?,
        state: state.unwrap_or_default(),
    })
}

/// Extracts the `error` parameter Google sends when consent is denied
fn parse_callback_error(uri: &str) -> Option<String> {
    let url = url::Url::parse(&format!("http://localhost{}", uri)).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "error")
        .map(|(_, value)| value.to_string())
}

fn success_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>VerveGallery - Signed In</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Signed In</h1>
    <p>You are signed in to VerveGallery with your Google account.</p>
    <p>You can close this window and return to the terminal.</p>
    <script>setTimeout(function() { window.close(); }, 3000);</script>
</body>
</html>"#
        .to_string()
}

fn error_html(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>VerveGallery - Sign-In Error</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Sign-In Error</h1>
    <p>{}</p>
    <p>Please close this window and try again.</p>
</body>
</html>"#,
        message
    )
}

// ============================================================================
// User profile
// ============================================================================

/// Response from the OpenID userinfo endpoint
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl From<UserInfoResponse> for UserProfile {
    fn from(info: UserInfoResponse) -> Self {
        let email = info.email.unwrap_or_default();
        let name = info.name.unwrap_or_else(|| email.clone());
        UserProfile::new(info.sub, name, email, info.picture.unwrap_or_default())
    }
}

/// Fetches the signed-in user's profile
pub async fn fetch_user_profile(
    http: &reqwest::Client,
    userinfo_url: &str,
    access_token: &str,
) -> Result<UserProfile> {
    debug!("Fetching user profile");

    let info: UserInfoResponse = http
        .get(userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await
        .context("Failed to fetch user profile")?
        .error_for_status()
        .context("Userinfo endpoint returned error status")?
        .json()
        .await
        .context("Failed to parse userinfo response")?;

    Ok(info.into())
}

// ============================================================================
// GoogleIdentityProvider
// ============================================================================

/// Google implementation of [`IIdentityProvider`]
///
/// Sign-in runs the full interactive flow:
///
/// 1. Binds the loopback callback server
/// 2. Opens the user's browser to the Google consent page
/// 3. Waits for the redirect and checks the CSRF state
/// 4. Exchanges the authorization code for tokens
/// 5. Fetches the profile and caches the tokens in the keyring
pub struct GoogleIdentityProvider {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
    userinfo_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    /// Overrides the userinfo endpoint (useful for testing)
    pub fn with_userinfo_url(mut self, url: impl Into<String>) -> Self {
        self.userinfo_url = url.into();
        self
    }

    /// Returns a reference to the current configuration
    pub fn config(&self) -> &GoogleOAuthConfig {
        &self.config
    }

    /// Fetches the profile for `access_token` from the configured endpoint
    pub async fn profile(&self, access_token: &str) -> Result<UserProfile> {
        fetch_user_profile(&self.http, &self.userinfo_url, access_token).await
    }
}

#[async_trait::async_trait]
impl IIdentityProvider for GoogleIdentityProvider {
    async fn restore(&self, profile: &UserProfile) -> Result<Option<Tokens>> {
        let tokens = KeyringTokenStorage::load(&profile.email)?;
        Ok(tokens.filter(|t| {
            let valid = !t.is_expired();
            if !valid {
                info!(email = %profile.email, "Cached token has expired");
            }
            valid
        }))
    }

    async fn sign_in(&self) -> Result<SignedIn> {
        info!("Starting OAuth2 PKCE sign-in");

        let flow = PKCEFlow::new(&self.config)?;
        let (auth_url, csrf_token, pkce_verifier) = flow.generate_auth_url();

        let server = LocalCallbackServer::bind(self.config.redirect_port).await?;

        info!("Opening browser for authentication");
        webbrowser::open(&auth_url).context("Failed to open browser for authentication")?;

        let callback = server.wait_for_callback().await?;
        if callback.state != *csrf_token.secret() {
            bail!("OAuth state mismatch; the callback did not come from this sign-in");
        }

        let tokens = flow.exchange_code(callback.code, pkce_verifier).await?;
        let profile = self.profile(&tokens.access_token).await?;

        KeyringTokenStorage::store(&profile.email, &tokens)?;

        info!(email = %profile.email, "Sign-in completed");
        Ok(SignedIn { profile, tokens })
    }

    async fn sign_out(&self, profile: &UserProfile) -> Result<()> {
        KeyringTokenStorage::clear(&profile.email)
    }
}
