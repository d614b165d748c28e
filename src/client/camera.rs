use super::{Camera, Connector, DeviceMgmt, Media, Messages, Transport};
use crate::config::{Credentials, DEVICE_SERVICE_PATH, REQUEST_TIMEOUT};
use crate::device::{Capabilities, DeviceInformation, MediaUri, Profile, StreamSetup};
use crate::error::OnvifError;
use crate::utils::{find_text, parse_profiles, require_text};

use async_trait::async_trait;
use log::{debug, info};
use url::Url;

/// Opens real sessions over HTTP. Holds one reqwest client shared by every
/// session it creates.
pub struct OnvifConnector {
    http: reqwest::Client,
}

impl OnvifConnector {
    pub fn new() -> Result<Self, OnvifError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(OnvifConnector::with_client(http))
    }

    pub(crate) fn with_client(http: reqwest::Client) -> Self {
        OnvifConnector { http }
    }
}

#[async_trait]
impl Connector for OnvifConnector {
    type Camera = OnvifCamera;

    /// Builds the device service URL and asks the device for its capabilities,
    /// which both proves the endpoint speaks ONVIF and yields the service XAddrs.
    async fn connect(
        &self,
        host: &str,
        port: u16,
        credentials: &Credentials,
    ) -> Result<OnvifCamera, OnvifError> {
        let url_onvif = Url::parse(&format!("http://{host}:{port}{DEVICE_SERVICE_PATH}"))?;
        let transport = Transport::new(self.http.clone(), credentials.clone());

        let response = transport.send(&url_onvif, Messages::Capabilities).await?;
        let capabilities = parse_capabilities(&response[..])?;

        info!("ONVIF session open on {url_onvif}");

        Ok(OnvifCamera {
            url_onvif,
            capabilities,
            transport,
        })
    }
}

pub struct OnvifCamera {
    url_onvif: Url, // http://ip.address:port/onvif/device_service
    capabilities: Capabilities,
    transport: Transport,
}

impl Camera for OnvifCamera {
    type DeviceMgmt = DeviceService;
    type Media = MediaService;

    fn create_devicemgmt_service(&self) -> DeviceService {
        DeviceService {
            url: self.url_onvif.clone(),
            transport: self.transport.clone(),
        }
    }

    fn create_media_service(&self) -> Result<MediaService, OnvifError> {
        let url = self
            .capabilities
            .url_media
            .clone()
            .ok_or(OnvifError::ServiceUnavailable("media"))?;

        Ok(MediaService {
            url,
            transport: self.transport.clone(),
        })
    }
}

pub struct DeviceService {
    url: Url,
    transport: Transport,
}

#[async_trait]
impl DeviceMgmt for DeviceService {
    async fn get_device_information(&self) -> Result<DeviceInformation, OnvifError> {
        let response = self.transport.send(&self.url, Messages::DeviceInfo).await?;
        parse_device_information(&response[..])
    }
}

pub struct MediaService {
    url: Url,
    transport: Transport,
}

#[async_trait]
impl Media for MediaService {
    async fn get_profiles(&self) -> Result<Vec<Profile>, OnvifError> {
        let response = self.transport.send(&self.url, Messages::Profiles).await?;
        let profiles = parse_profiles(&response[..])?;

        debug!("Device returned {} profiles", profiles.len());

        Ok(profiles)
    }

    async fn get_stream_uri(
        &self,
        profile_token: &str,
        setup: &StreamSetup,
    ) -> Result<MediaUri, OnvifError> {
        let msg = Messages::GetStreamUri {
            profile_token,
            setup: *setup,
        };
        let response = self.transport.send(&self.url, msg).await?;

        parse_media_uri(&response[..])
    }
}

#[rustfmt::skip]
fn parse_capabilities(response: &[u8]) -> Result<Capabilities, OnvifError> {
    require_text(response, "Capabilities", Some("GetCapabilitiesResponse"))?;

    let xaddr = |service: &str| -> Result<Option<Url>, OnvifError> {
        let found = find_text(response, "XAddr", Some(service))?;
        Ok(found.and_then(|s| match Url::parse(&s) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Ignoring {service} XAddr {s:?}: {e}");
                None
            }
        }))
    };

    let result = Capabilities {
        url_media:       xaddr("Media")?,
        url_events:      xaddr("Events")?,
        url_analytics:   xaddr("Analytics")?,
        url_ptz:         xaddr("PTZ")?,
        url_imaging:     xaddr("Imaging")?,
    };

    debug!("media_service: {:?}",       result.url_media);
    debug!("event_service: {:?}",       result.url_events);
    debug!("analytics_service: {:?}",   result.url_analytics);
    debug!("ptz_service: {:?}",         result.url_ptz);
    debug!("image_service: {:?}",       result.url_imaging);

    Ok(result)
}

#[rustfmt::skip]
fn parse_device_information(response: &[u8]) -> Result<DeviceInformation, OnvifError> {
    let parent = Some("GetDeviceInformationResponse");

    let result = DeviceInformation {
        manufacturer:       require_text(response, "Manufacturer",     parent)?,
        model:              require_text(response, "Model",            parent)?,
        firmware_version:   require_text(response, "FirmwareVersion",  parent)?,
        serial_number:      require_text(response, "SerialNumber",     parent)?,
        hardware_id:        find_text(   response, "HardwareId",       parent)?,
    };

    debug!("Manufacturer: {}", result.manufacturer);
    debug!("Hardware ID: {:?}", result.hardware_id);

    Ok(result)
}

#[rustfmt::skip]
fn parse_media_uri(response: &[u8]) -> Result<MediaUri, OnvifError> {
    let parent = Some("MediaUri");

    let result = MediaUri {
        uri:                     require_text(response, "Uri",                   parent)?,
        invalid_after_connect:   find_text(   response, "InvalidAfterConnect",   parent)?,
        invalid_after_reboot:    find_text(   response, "InvalidAfterReboot",    parent)?,
        timeout:                 find_text(   response, "Timeout",               parent)?,
    };

    debug!("RTSP URI: {}", result.uri);
    debug!(
        "InvalidAfterConnect: {:?}, InvalidAfterReboot: {:?}, Timeout: {:?}",
        result.invalid_after_connect, result.invalid_after_reboot, result.timeout
    );

    Ok(result)
}
