pub mod camera;
pub mod security;

#[cfg(test)]
pub(crate) mod mock;

pub use camera::{DeviceService, MediaService, OnvifCamera, OnvifConnector};

use crate::config::Credentials;
use crate::device::{DeviceInformation, MediaUri, Profile, StreamSetup};
use crate::error::OnvifError;
use crate::utils::find_fault;

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::StatusCode;
use xml::escape::escape_str_pcdata;

/// All of the ONVIF requests that this program sends
#[derive(Debug)]
pub enum Messages<'a> {
    Capabilities,
    DeviceInfo,
    Profiles,
    GetStreamUri {
        profile_token: &'a str,
        setup: StreamSetup,
    },
}

impl Messages<'_> {
    /// SOAP 1.2 action URI, passed in the Content-Type `action` parameter
    pub fn action(&self) -> &'static str {
        match self {
            Messages::Capabilities => "http://www.onvif.org/ver10/device/wsdl/GetCapabilities",
            Messages::DeviceInfo => "http://www.onvif.org/ver10/device/wsdl/GetDeviceInformation",
            Messages::Profiles => "http://www.onvif.org/ver10/media/wsdl/GetProfiles",
            Messages::GetStreamUri { .. } => "http://www.onvif.org/ver10/media/wsdl/GetStreamUri",
        }
    }
}

/// Opens ONVIF sessions. One call per host/port attempt.
#[async_trait]
pub trait Connector: Send + Sync {
    type Camera: Camera;

    async fn connect(
        &self,
        host: &str,
        port: u16,
        credentials: &Credentials,
    ) -> Result<Self::Camera, OnvifError>;
}

/// An open session against one camera.
pub trait Camera: Send + Sync {
    type DeviceMgmt: DeviceMgmt;
    type Media: Media;

    fn create_devicemgmt_service(&self) -> Self::DeviceMgmt;
    fn create_media_service(&self) -> Result<Self::Media, OnvifError>;
}

#[async_trait]
pub trait DeviceMgmt: Send + Sync {
    async fn get_device_information(&self) -> Result<DeviceInformation, OnvifError>;
}

#[async_trait]
pub trait Media: Send + Sync {
    async fn get_profiles(&self) -> Result<Vec<Profile>, OnvifError>;

    /// `profile_token` goes to the device untouched.
    async fn get_stream_uri(
        &self,
        profile_token: &str,
        setup: &StreamSetup,
    ) -> Result<MediaUri, OnvifError>;
}

/// Shared HTTP plumbing for every service handle of a session.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    credentials: Credentials,
}

impl Transport {
    pub fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Transport { http, credentials }
    }

    /// Sends one SOAP request and returns the raw response body.
    /// Single attempt; faults and HTTP errors come back as `OnvifError`.
    pub async fn send(&self, url: &url::Url, msg: Messages<'_>) -> Result<Bytes, OnvifError> {
        let soap_msg = soap_msg(&msg, &security::security_header(&self.credentials));
        debug!("SOAP request {msg:?} to {url}");

        let content_type = format!(
            "application/soap+xml; charset=utf-8; action=\"{}\"",
            msg.action()
        );

        let response = self
            .http
            .post(url.clone())
            .header("Content-Type", content_type)
            .body(soap_msg)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        debug!(
            "SOAP reply for {msg:?} ({status}): {}",
            String::from_utf8_lossy(&body)
        );

        check_reply(status, body)
    }
}

fn check_reply(status: StatusCode, body: Bytes) -> Result<Bytes, OnvifError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(OnvifError::Authentication(format!(
            "{status}: credentials rejected"
        )));
    }

    // Non-XML bodies (HTML error pages and the like) just aren't faults
    if let Ok(Some(fault)) = find_fault(&body[..]) {
        let not_authorized = fault
            .subcode
            .as_deref()
            .map_or(false, |sub| sub.contains("NotAuthorized"));

        if not_authorized {
            return Err(OnvifError::Authentication(fault.reason));
        }

        let code = fault.subcode.unwrap_or(fault.code);
        return Err(OnvifError::Fault {
            code,
            reason: fault.reason,
        });
    }

    if !status.is_success() {
        return Err(OnvifError::Http(status));
    }

    Ok(body)
}

fn soap_msg(msg_type: &Messages, security: &str) -> String {
    let prefix = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"
                    xmlns:tds="http://www.onvif.org/ver10/device/wsdl"
                    xmlns:trt="http://www.onvif.org/ver10/media/wsdl"
                    xmlns:tt="http://www.onvif.org/ver10/schema">
            <s:Header>{security}</s:Header>
            <s:Body>"#
    );

    let suffix = "</s:Body></s:Envelope>";

    let body = match msg_type {
        Messages::Capabilities => r#"<tds:GetCapabilities>
                    <tds:Category>All</tds:Category>
                </tds:GetCapabilities>"#
            .to_string(),
        Messages::DeviceInfo => "<tds:GetDeviceInformation/>".to_string(),
        Messages::Profiles => "<trt:GetProfiles/>".to_string(),
        Messages::GetStreamUri {
            profile_token,
            setup,
        } => {
            let token = escape_str_pcdata(profile_token);
            format!(
                r#"<trt:GetStreamUri>
                    <trt:StreamSetup>
                        <tt:Stream>{}</tt:Stream>
                        <tt:Transport>
                            <tt:Protocol>{}</tt:Protocol>
                        </tt:Transport>
                    </trt:StreamSetup>
                    <trt:ProfileToken>{token}</trt:ProfileToken>
                </trt:GetStreamUri>"#,
                setup.stream, setup.protocol
            )
        }
    };

    format!("{prefix}{body}{suffix}")
}
