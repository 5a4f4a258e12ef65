use anyhow::{Context, Result};
use clap::Args;
use rhub_client::{Client, Method};

use crate::output;

#[derive(Args, Clone)]
pub struct LookupCommand {
    /// API endpoint paths, fetched in order
    #[arg(required = true)]
    paths: Vec<String>,
}

impl LookupCommand {
    pub fn execute(self, client: &Client) -> Result<()> {
        let bodies = self
            .paths
            .iter()
            .map(|path| {
                client
                    .request(Method::GET, path, None)
                    .with_context(|| format!("Fail lookup {}", path))?
                    .text()
                    .with_context(|| format!("Fail read body of {}", path))
            })
            .collect::<Result<Vec<_>>>()?;

        output::print_json(&bodies)
    }
}
