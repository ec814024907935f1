use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tlsgrab::cli::start().await
}
