use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[rustfmt::skip]
pub struct DeviceInformation {
    pub manufacturer:       String,
    pub model:              String,
    pub firmware_version:   String,
    pub serial_number:      String,
    pub hardware_id:        Option<String>,
}

/// A media profile as listed by the camera. The token is opaque and must be
/// handed back to the device exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
#[rustfmt::skip]
pub struct Profile {
    pub token:   String,
    pub name:    Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[rustfmt::skip]
pub struct MediaUri {
    pub uri:                     String,
    pub invalid_after_connect:   Option<String>,
    pub invalid_after_reboot:    Option<String>,
    pub timeout:                 Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    RtpUnicast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportProtocol {
    Rtsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSetup {
    pub stream: StreamType,
    pub protocol: TransportProtocol,
}

impl StreamSetup {
    /// RTP unicast delivered over RTSP.
    pub fn rtsp_unicast() -> Self {
        StreamSetup {
            stream: StreamType::RtpUnicast,
            protocol: TransportProtocol::Rtsp,
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamType::RtpUnicast => f.write_str("RTP-Unicast"),
        }
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProtocol::Rtsp => f.write_str("RTSP"),
        }
    }
}

#[derive(Debug, Clone, Default)]
#[rustfmt::skip]
pub struct Capabilities {
    pub url_media:       Option<url::Url>,
    pub url_events:      Option<url::Url>,
    pub url_analytics:   Option<url::Url>,
    pub url_ptz:         Option<url::Url>,
    pub url_imaging:     Option<url::Url>,
}
