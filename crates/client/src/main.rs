//! Console entry point.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use curdworks_client::console::{self, Command};
use curdworks_client::{ClientConfig, HttpApi, Workbench};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    curdworks_observability::init();

    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, "starting curdworks console");

    let api = HttpApi::new(&config).context("failed to build HTTP client")?;
    let mut workbench = Workbench::new(api);
    workbench.refresh_all().await;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("Connected to: {}\ntype `help` for commands\n", config.api_url).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let output = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(cmd) => console::execute(&mut workbench, cmd).await,
            Err(msg) => msg,
        };

        if !output.is_empty() {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
    }

    Ok(())
}
