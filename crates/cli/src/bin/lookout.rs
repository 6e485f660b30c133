use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lookout_cli::main_entry().await
}
