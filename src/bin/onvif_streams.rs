use anyhow::Result;
use onvif_diag::client::OnvifConnector;
use onvif_diag::config::{Credentials, HOST, STREAM_PORT};
use onvif_diag::streams;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let connector = OnvifConnector::new()?;
    let credentials = Credentials::default();
    let mut stdout = io::stdout().lock();

    streams::run(&connector, HOST, STREAM_PORT, &credentials, &mut stdout).await?;

    Ok(())
}
