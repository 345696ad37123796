use clap::Parser;
use maxkb_adapter::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli::invoke::run(cli).await
}
