//! Lists a camera's media profiles and resolves the RTSP URI of each one.
//!
//! Output is written profile by profile; the first failure aborts the run and
//! is returned to the caller, so profiles already handled stay printed.

use crate::client::{Camera, Connector, Media};
use crate::config::Credentials;
use crate::device::StreamSetup;

use anyhow::{Context, Result};
use log::info;
use std::io::Write;

/// Returns the number of profiles the device reported.
pub async fn run<C, W>(
    connector: &C,
    host: &str,
    port: u16,
    credentials: &Credentials,
    out: &mut W,
) -> Result<usize>
where
    C: Connector,
    W: Write,
{
    let camera = connector
        .connect(host, port, credentials)
        .await
        .with_context(|| format!("opening ONVIF session on {host}:{port}"))?;
    let media = camera.create_media_service()?;

    let profiles = media.get_profiles().await.context("listing media profiles")?;
    info!("{host}:{port} has {} media profiles", profiles.len());

    writeln!(out, "Profiles: {}", profiles.len())?;

    let setup = StreamSetup::rtsp_unicast();

    for (i, profile) in profiles.iter().enumerate() {
        let uri = media
            .get_stream_uri(&profile.token, &setup)
            .await
            .with_context(|| format!("resolving stream URI for profile {}", profile.token))?;

        writeln!(out, "\n[{i}] Name: {}", profile.name.as_deref().unwrap_or(""))?;
        writeln!(out, "Token: {}", profile.token)?;
        writeln!(out, "RTSP: {}", uri.uri)?;
        out.flush()?;
    }

    Ok(profiles.len())
}
