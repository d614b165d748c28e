//! Scripted cameras for tests: an in-memory [`MockConnector`] for the
//! orchestration tests and a blocking HTTP stub that speaks just enough
//! SOAP for the real client.

use super::{Camera, Connector, DeviceMgmt, Media};
use crate::config::Credentials;
use crate::device::{DeviceInformation, MediaUri, Profile, StreamSetup};
use crate::error::OnvifError;

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum PortBehavior {
    Refuse,
    RejectAuth,
    Answer,
}

#[derive(Default)]
pub struct MockConnector {
    ports: HashMap<u16, PortBehavior>,
    profiles: Vec<Profile>,
    fail_uri_for: Option<String>,
    /// Ports passed to `connect`, in call order.
    pub attempts: Arc<Mutex<Vec<u16>>>,
    /// Tokens passed to `get_stream_uri`, in call order.
    pub uri_requests: Arc<Mutex<Vec<(String, StreamSetup)>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        MockConnector::default()
    }

    pub fn port(mut self, port: u16, behavior: PortBehavior) -> Self {
        self.ports.insert(port, behavior);
        self
    }

    pub fn profiles(mut self, profiles: Vec<Profile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn fail_uri_for(mut self, token: &str) -> Self {
        self.fail_uri_for = Some(token.to_string());
        self
    }

    pub fn attempts(&self) -> Vec<u16> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn requested_tokens(&self) -> Vec<String> {
        self.uri_requests
            .lock()
            .unwrap()
            .iter()
            .map(|(token, _)| token.clone())
            .collect()
    }
}

pub fn device_info() -> DeviceInformation {
    DeviceInformation {
        manufacturer: "Acme".to_string(),
        model: "IPC-1080".to_string(),
        firmware_version: "V5.5.3".to_string(),
        serial_number: "SN0001".to_string(),
        hardware_id: None,
    }
}

pub fn profile(token: &str, name: Option<&str>) -> Profile {
    Profile {
        token: token.to_string(),
        name: name.map(str::to_string),
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Camera = MockCamera;

    async fn connect(
        &self,
        host: &str,
        port: u16,
        _credentials: &Credentials,
    ) -> Result<MockCamera, OnvifError> {
        self.attempts.lock().unwrap().push(port);

        let behavior = self.ports.get(&port).copied().unwrap_or(PortBehavior::Refuse);
        if let PortBehavior::Refuse = behavior {
            return Err(OnvifError::Connection(format!(
                "error sending request for url (http://{host}:{port}/onvif/device_service)"
            )));
        }

        Ok(MockCamera {
            behavior,
            profiles: self.profiles.clone(),
            fail_uri_for: self.fail_uri_for.clone(),
            uri_requests: Arc::clone(&self.uri_requests),
        })
    }
}

pub struct MockCamera {
    behavior: PortBehavior,
    profiles: Vec<Profile>,
    fail_uri_for: Option<String>,
    uri_requests: Arc<Mutex<Vec<(String, StreamSetup)>>>,
}

impl Camera for MockCamera {
    type DeviceMgmt = MockDevice;
    type Media = MockMedia;

    fn create_devicemgmt_service(&self) -> MockDevice {
        MockDevice {
            behavior: self.behavior,
        }
    }

    fn create_media_service(&self) -> Result<MockMedia, OnvifError> {
        Ok(MockMedia {
            profiles: self.profiles.clone(),
            fail_uri_for: self.fail_uri_for.clone(),
            uri_requests: Arc::clone(&self.uri_requests),
        })
    }
}

pub struct MockDevice {
    behavior: PortBehavior,
}

#[async_trait]
impl DeviceMgmt for MockDevice {
    async fn get_device_information(&self) -> Result<DeviceInformation, OnvifError> {
        match self.behavior {
            PortBehavior::Answer => Ok(device_info()),
            _ => Err(OnvifError::Authentication(
                "Sender not Authorized".to_string(),
            )),
        }
    }
}

pub struct MockMedia {
    profiles: Vec<Profile>,
    fail_uri_for: Option<String>,
    uri_requests: Arc<Mutex<Vec<(String, StreamSetup)>>>,
}

#[async_trait]
impl Media for MockMedia {
    async fn get_profiles(&self) -> Result<Vec<Profile>, OnvifError> {
        Ok(self.profiles.clone())
    }

    async fn get_stream_uri(
        &self,
        profile_token: &str,
        setup: &StreamSetup,
    ) -> Result<MediaUri, OnvifError> {
        self.uri_requests
            .lock()
            .unwrap()
            .push((profile_token.to_string(), *setup));

        if self.fail_uri_for.as_deref() == Some(profile_token) {
            return Err(OnvifError::Fault {
                code: "ter:NoProfile".to_string(),
                reason: "Profile token does not exist".to_string(),
            });
        }

        Ok(MediaUri {
            uri: format!("rtsp://192.168.1.106:554/{profile_token}"),
            ..MediaUri::default()
        })
    }
}

/// What the HTTP stub received for one request.
#[derive(Debug, Clone)]
pub struct StubRequest {
    pub path: String,
    pub content_type: String,
    pub body: String,
}

pub fn stub_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A port nothing listens on.
pub fn closed_port() -> u16 {
    let (listener, port) = stub_listener();
    drop(listener);
    port
}

/// Answers one connection per scripted `(status, body)` reply, in order, and
/// forwards each request it read.
pub fn serve(listener: TcpListener, replies: Vec<(u16, String)>) -> mpsc::Receiver<StubRequest> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in replies {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let Ok(request) = read_request(&stream) else {
                return;
            };
            let _ = tx.send(request);

            let reply = format!(
                "HTTP/1.1 {status} Stub\r\n\
                 Content-Type: application/soap+xml; charset=utf-8\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });

    rx
}

/// Accepts one connection and never answers it.
pub fn serve_nothing(listener: TcpListener) {
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(Duration::from_secs(5));
            drop(stream);
        }
    });
}

fn read_request(stream: &TcpStream) -> io::Result<StubRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut content_length = 0;
    let mut content_type = String::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }

        if let Some((name, value)) = line.split_once(':') {
            match name.to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "content-type" => content_type = value.trim().to_string(),
                _ => {}
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;

    Ok(StubRequest {
        path,
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"
            xmlns:tds="http://www.onvif.org/ver10/device/wsdl"
            xmlns:trt="http://www.onvif.org/ver10/media/wsdl"
            xmlns:tt="http://www.onvif.org/ver10/schema"
            xmlns:ter="http://www.onvif.org/ver10/error">
  <s:Body>{body}</s:Body>
</s:Envelope>"#
    )
}

pub fn capabilities_reply(port: u16) -> String {
    envelope(&format!(
        r#"<tds:GetCapabilitiesResponse><tds:Capabilities>
            <tt:Device><tt:XAddr>http://127.0.0.1:{port}/onvif/device_service</tt:XAddr></tt:Device>
            <tt:Media><tt:XAddr>http://127.0.0.1:{port}/onvif/Media</tt:XAddr></tt:Media>
        </tds:Capabilities></tds:GetCapabilitiesResponse>"#
    ))
}

pub fn device_info_reply() -> String {
    envelope(
        r#"<tds:GetDeviceInformationResponse>
            <tds:Manufacturer>Acme</tds:Manufacturer>
            <tds:Model>IPC-1080</tds:Model>
            <tds:FirmwareVersion>V5.5.3</tds:FirmwareVersion>
            <tds:SerialNumber>SN0001</tds:SerialNumber>
        </tds:GetDeviceInformationResponse>"#,
    )
}

pub fn profiles_reply() -> String {
    envelope(
        r#"<trt:GetProfilesResponse>
            <trt:Profiles token="Profile_1" fixed="true"><tt:Name>mainStream</tt:Name></trt:Profiles>
        </trt:GetProfilesResponse>"#,
    )
}

pub fn stream_uri_reply(uri: &str) -> String {
    envelope(&format!(
        r#"<trt:GetStreamUriResponse><trt:MediaUri>
            <tt:Uri>{uri}</tt:Uri>
            <tt:InvalidAfterConnect>false</tt:InvalidAfterConnect>
            <tt:InvalidAfterReboot>false</tt:InvalidAfterReboot>
            <tt:Timeout>PT0S</tt:Timeout>
        </trt:MediaUri></trt:GetStreamUriResponse>"#
    ))
}

pub fn not_authorized_reply() -> String {
    envelope(
        r#"<s:Fault>
            <s:Code>
                <s:Value>s:Sender</s:Value>
                <s:Subcode><s:Value>ter:NotAuthorized</s:Value></s:Subcode>
            </s:Code>
            <s:Reason><s:Text xml:lang="en">Sender not Authorized</s:Text></s:Reason>
        </s:Fault>"#,
    )
}
