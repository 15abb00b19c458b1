use anyhow::Result;
use deskmate::cli::run_cli;
use tracing::error;


#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {

    run_cli().await.inspect_err(|e| {
        error!("Error running cli {e:?}");
    })?;
    Ok(())
}
