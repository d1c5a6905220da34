//! Account command handlers

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::auth::{AuthError, LoginCredentials, SignupCredentials};
use crate::commands::AppContext;
use crate::error::Result;
use crate::session::{SessionRepository, SessionState};

/// `clubnet login`
pub async fn login(
    ctx: &AppContext,
    email: String,
    password: Option<String>,
    api_url: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    let credentials = LoginCredentials { email, password };

    match ctx.auth.login(&credentials, api_url.as_deref()).await {
        Ok(user) => {
            println!("{} Signed in as {}", "✓".green(), user.username.bold());
            Ok(())
        }
        Err(e) => Err(report(e)),
    }
}

/// Fields for `clubnet signup`
#[derive(Debug, Clone)]
pub struct SignupArgs {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub plan: Option<String>,
    pub role: Option<String>,
    pub api_url: Option<String>,
}

/// `clubnet signup`
pub async fn signup(ctx: &AppContext, args: SignupArgs) -> Result<()> {
    let credentials = SignupCredentials {
        username: args.username,
        email: args.email,
        password: password_or_prompt(args.password)?,
        plan: args.plan,
        role: args.role,
    };

    match ctx.auth.signup(&credentials, args.api_url.as_deref()).await {
        Ok(response) => {
            println!("{} Account created for {}", "✓".green(), credentials.email);
            if !response.is_verified {
                println!(
                    "Check your inbox to verify your email, then run {}.",
                    "clubnet login".cyan()
                );
            }
            if let Some(expiry) = response.expires_at_utc() {
                println!("Verification token valid until {}", expiry.to_rfc3339());
            }
            Ok(())
        }
        Err(e) => Err(report(e)),
    }
}

/// `clubnet resend-verification`
pub async fn resend_verification(
    ctx: &AppContext,
    email: &str,
    api_url: Option<&str>,
) -> Result<()> {
    match ctx.auth.resend_verification(email, api_url).await {
        Ok(response) if response.success => {
            println!("{} {}", "✓".green(), non_empty(&response.message, "Verification email sent"));
            Ok(())
        }
        Ok(response) => {
            println!(
                "{} {}",
                "!".yellow(),
                non_empty(&response.message, "The server did not send the email")
            );
            Ok(())
        }
        Err(e) => Err(report(e)),
    }
}

/// `clubnet logout`
pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout()?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

/// `clubnet whoami`
pub fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.session.get();
    match session.state() {
        SessionState::Anonymous => {
            println!("Not signed in. Run {} to sign in.", "clubnet login".cyan());
        }
        SessionState::PendingVerification => {
            println!("Signed up, waiting for email verification.");
        }
        SessionState::Authenticated => {
            if let Some(user) = session.user {
                println!("{} <{}>", user.username.bold(), user.email);
                println!("id: {}", user.id);
                if !user.permissions.is_empty() {
                    println!("permissions: {}", user.permissions.join(", "));
                }
            }
        }
    }
    println!("server: {}", ctx.server.server_url());
    Ok(())
}

fn report(error: AuthError) -> anyhow::Error {
    eprintln!("{} {}", error.error.red().bold(), error.message);
    error.into()
}

fn non_empty<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() {
        fallback
    } else {
        text
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
