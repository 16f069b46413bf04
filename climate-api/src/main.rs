//! Binary crate for the `climate-api` HTTP service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Logging setup
//! - Serving the dataset queries over HTTP

use clap::Parser;

mod cli;
mod http_server;
#[cfg(test)]
mod test_fixtures;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let cmd = cli::Cli::parse();
    cmd.run().await
}
