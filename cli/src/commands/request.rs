use anyhow::{Context, Result};
use clap::Args;
use rhub_client::{Client, ClientError, Method};
use std::process::ExitCode;

use crate::output;

#[derive(Args, Clone)]
pub struct RequestCommand {
    /// API endpoint path (e.g. /v0/lab/region/1)
    path: String,

    #[arg(short, long, default_value = "GET", value_parser = ["GET", "POST", "PATCH", "DELETE"])]
    method: String,

    /// Request body as JSON text (use '-' for stdin)
    #[arg(short, long)]
    body: Option<String>,
}

impl RequestCommand {
    pub fn execute(self, client: &Client) -> Result<ExitCode> {
        let method = Method::from_bytes(self.method.as_bytes()).context("Fail parse method")?;
        let body = self.body.map(read_body).transpose()?;
        let changed = method != Method::GET;

        match client.request(method, &self.path, body) {
            Ok(response) => {
                let text = response.text().context("Fail read response body")?;
                output::print_json(&output::success(changed, &text)?)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(ClientError::Api(err) | ClientError::Auth(err)) => {
                output::print_json(&output::failure(&err))?;
                Ok(ExitCode::FAILURE)
            }
            Err(err) => Err(err).context("Fail send request"),
        }
    }
}

fn read_body(body: String) -> Result<String> {
    if body == "-" {
        std::io::read_to_string(std::io::stdin()).context("Fail read body from stdin")
    } else {
        Ok(body)
    }
}
