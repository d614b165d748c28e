//! Finds which candidate port exposes ONVIF device management on a host.
//!
//! Ports are tried in order; the first one that answers a device information
//! query wins and nothing after it is attempted. Every failed port is reported
//! and skipped. Running out of ports is not an error.

use crate::client::{Camera, Connector, DeviceMgmt};
use crate::config::{Credentials, Target};
use crate::device::DeviceInformation;
use crate::error::OnvifError;

use log::{info, warn};
use std::io::{self, Write};

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found(DeviceInformation),
    Failed { kind: &'static str, message: String },
}

pub async fn probe_port<C: Connector>(
    connector: &C,
    host: &str,
    port: u16,
    credentials: &Credentials,
) -> ProbeOutcome {
    match query_device(connector, host, port, credentials).await {
        Ok(info) => ProbeOutcome::Found(info),
        Err(e) => ProbeOutcome::Failed {
            kind: e.kind(),
            message: e.to_string(),
        },
    }
}

async fn query_device<C: Connector>(
    connector: &C,
    host: &str,
    port: u16,
    credentials: &Credentials,
) -> Result<DeviceInformation, OnvifError> {
    let camera = connector.connect(host, port, credentials).await?;
    let devicemgmt = camera.create_devicemgmt_service();

    devicemgmt.get_device_information().await
}

/// Probes `target.ports` in order, writing one report line per failed port and
/// the device identity block for the first success.
///
/// Returns the winning port and its device information, or `None` when every
/// port failed.
pub async fn run<C, W>(
    connector: &C,
    target: &Target,
    out: &mut W,
) -> io::Result<Option<(u16, DeviceInformation)>>
where
    C: Connector,
    W: Write,
{
    let host = &target.host;

    for &port in &target.ports {
        match probe_port(connector, host, port, &target.credentials).await {
            ProbeOutcome::Found(info) => {
                info!("ONVIF device management found on {host}:{port}");
                write_found(out, host, port, &info)?;
                return Ok(Some((port, info)));
            }
            ProbeOutcome::Failed { kind, message } => {
                warn!("Probe of {host}:{port} failed with {kind}");
                writeln!(out, "[FAIL] {host}:{port} -> {kind}: {message}")?;
            }
        }
    }

    Ok(None)
}

fn write_found<W: Write>(
    out: &mut W,
    host: &str,
    port: u16,
    info: &DeviceInformation,
) -> io::Result<()> {
    writeln!(out, "\n[OK] ONVIF on {host}:{port}")?;
    writeln!(out, "Manufacturer: {}", info.manufacturer)?;
    writeln!(out, "Model: {}", info.model)?;
    writeln!(out, "FirmwareVersion: {}", info.firmware_version)?;
    writeln!(out, "SerialNumber: {}", info.serial_number)?;
    out.flush()
}
