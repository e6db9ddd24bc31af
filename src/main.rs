use anyhow::Result;
use quill::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
