use clap::Parser;
use dwd_temperature::cli::{run, Cli};
use dwd_temperature::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
