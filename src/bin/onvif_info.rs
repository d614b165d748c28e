use anyhow::Result;
use onvif_diag::client::OnvifConnector;
use onvif_diag::config::Target;
use onvif_diag::probe;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let connector = OnvifConnector::new()?;
    let target = Target::default();
    let mut stdout = io::stdout().lock();

    // Every port failing is reported line by line, not treated as an error
    probe::run(&connector, &target, &mut stdout).await?;

    Ok(())
}
