use anyhow::{Context, Result};
use clap::Args;
use jobfinder_api::{ApiRequest, HttpMethod};
use jobfinder_app_state::{AppContext, AppError, AppRoute};
use serde_json::Value;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Path under the API base URL, e.g. /jobs/saved
    path: String,

    #[arg(long, short = 'X', default_value = "get")]
    method: HttpMethod,

    /// JSON request body
    #[arg(long, short = 'd')]
    body: Option<String>,
}

pub async fn run(context: &AppContext, args: FetchArgs) -> Result<()> {
    let mut request = ApiRequest::new(args.method, args.path);
    if let Some(raw) = args.body {
        let body: Value = serde_json::from_str(&raw).context("--body is not valid JSON")?;
        request = request.with_body(body);
    }

    let response = match context.fetch_with_auth(&request).await {
        Ok(response) => response,
        Err(e @ AppError::SessionExpired) => {
            if context.route() == AppRoute::Login {
                context
                    .notifications()
                    .warning("Please log in again with `jobfinder login`");
            }
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    let text = response.text().await.context("failed to read response body")?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!(
            "{}",
            serde_json::to_string_pretty(&json).context("failed to render response")?
        ),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{text}"),
    }
    context
        .notifications()
        .info(format!("{} {}", status.as_u16(), request.path));
    Ok(())
}
