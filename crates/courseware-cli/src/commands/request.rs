//! Raw request command implementation.

use anyhow::{Context, Result, anyhow};
use clap::Args;

use courseware_http::{Method, RequestDescriptor};

use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method
    #[arg(value_parser = parse_method)]
    pub method: Method,

    /// Path relative to the API URL, e.g. /courses/categories/
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,
}

fn parse_method(s: &str) -> Result<Method> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes())
        .map_err(|_| anyhow!("invalid HTTP method '{}'", s))
}

fn parse_pair(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

pub async fn run(session: &CliSession, args: RequestArgs) -> Result<()> {
    let mut descriptor = RequestDescriptor::new(args.method, args.path).query_pairs(args.query);
    if let Some(data) = &args.data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("--data is not valid JSON")?;
        descriptor = descriptor.body(body);
    }

    let response = session
        .client()
        .request(descriptor)
        .await
        .context("Request failed")?;

    let body = response.value().context("Response is not JSON")?;
    if !body.is_null() {
        output::json_pretty(&body)?;
    }
    Ok(())
}
