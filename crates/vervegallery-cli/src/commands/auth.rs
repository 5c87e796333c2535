//! Auth commands - Login, Logout, and Status for Google sign-in
//!
//! Provides the `verve auth` CLI subcommands which:
//! 1. `login`  - Runs the OAuth2 PKCE flow in the browser, stores tokens in
//!    the system keyring and persists the profile in the session file.
//! 2. `logout` - Clears the tokens and the persisted profile.
//! 3. `status` - Restores the session silently and reports who is signed in.

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use crate::{
    context::AppContext,
    output::{get_formatter, OutputFormat, OutputFormatter},
    GlobalOptions,
};

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in with Google in the browser
    Login,
    /// Sign out and remove stored credentials
    Logout,
    /// Check authentication status
    Status,
}

impl AuthCommand {
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let fmt = get_formatter(opts);
        let ctx = AppContext::build(&opts.config_path)?;
        match self {
            AuthCommand::Login => execute_login(&ctx, &*fmt).await,
            AuthCommand::Logout => execute_logout(&ctx, &*fmt).await,
            AuthCommand::Status => execute_status(&ctx, &*fmt, opts.format).await,
        }
    }
}

async fn execute_login(ctx: &AppContext, fmt: &dyn OutputFormatter) -> Result<()> {
    info!(port = ctx.config.auth.redirect_port, "Starting OAuth2 login");
    fmt.info("Opening browser for Google sign-in...");

    let user = ctx.auth.sign_in().await.context("Sign-in failed")?;

    fmt.success(&format!("Signed in as {} ({})", user.name, user.email));
    fmt.info(&format!(
        "Session saved to {}",
        ctx.config.session.storage_path.display()
    ));
    Ok(())
}

async fn execute_logout(ctx: &AppContext, fmt: &dyn OutputFormatter) -> Result<()> {
    let signed_in = ctx
        .auth
        .init_auth()
        .await
        .context("Failed to restore session")?;

    // also forgets a stored profile whose token is gone
    ctx.auth.sign_out().await.context("Sign-out failed")?;

    if signed_in {
        fmt.success("Logged out successfully");
        fmt.info("Credentials removed from keyring");
    } else {
        fmt.info("Not signed in. Nothing to log out.");
    }
    Ok(())
}

async fn execute_status(
    ctx: &AppContext,
    fmt: &dyn OutputFormatter,
    format: OutputFormat,
) -> Result<()> {
    ctx.auth
        .init_auth()
        .await
        .context("Failed to restore session")?;
    let session = ctx.auth.session().await;

    if format == OutputFormat::Json {
        let json = serde_json::json!({
            "authenticated": session.is_authenticated,
            "user": session.user,
            "session_file": ctx.config.session.storage_path.display().to_string(),
        });
        fmt.print_json(&json);
        return Ok(());
    }

    match session.user {
        Some(user) if session.is_authenticated => {
            fmt.success(&format!("Signed in as {} ({})", user.name, user.email));
            fmt.info(&format!("User ID:  {}", user.id));
            if !user.photo_url.is_empty() {
                fmt.info(&format!("Avatar:   {}", user.photo_url));
            }
        }
        _ => {
            fmt.info("Authentication status: Not signed in");
            fmt.info("Run 'verve auth login' to authenticate");
        }
    }
    Ok(())
}
