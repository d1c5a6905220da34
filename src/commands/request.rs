//! `clubnet request`: raw authenticated call

use reqwest::Method;
use serde_json::Value;

use crate::commands::AppContext;
use crate::error::{ClubnetError, Result};

/// Send `method path` with an optional JSON body and print the reply.
pub async fn run_request(
    ctx: &AppContext,
    method: &str,
    path: &str,
    data: Option<&str>,
) -> Result<()> {
    let method = parse_method(method)?;
    let body = data.map(serde_json::from_str::<Value>).transpose()?;

    let response = ctx.client.request(method, path, body.as_ref()).await?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClubnetError::Connection(e.to_string()))?;

    tracing::debug!("HTTP {} ({} bytes)", status, text.len());
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| ClubnetError::Config(format!("Unsupported HTTP method: {}", method)).into())
}
