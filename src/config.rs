use std::time::Duration;

pub const HOST: &'static str = "192.168.1.106";
// Common ONVIF ports, tried in this order
pub const PROBE_PORTS: [u16; 4] = [80, 8000, 8080, 8899];
pub const STREAM_PORT: u16 = 80;
pub const USERNAME: &'static str = "admin";
pub const PASSWORD: &'static str = "admin";

pub const DEVICE_SERVICE_PATH: &'static str = "/onvif/device_service";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        }
    }
}

/// Host, candidate ports and credentials for a probe run.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: String,
    pub ports: Vec<u16>,
    pub credentials: Credentials,
}

impl Default for Target {
    fn default() -> Self {
        Target {
            host: HOST.to_string(),
            ports: PROBE_PORTS.to_vec(),
            credentials: Credentials::default(),
        }
    }
}
