use thiserror::Error;

/// A failed remote ONVIF operation.
///
/// `Display` carries only the message; the category label comes from
/// [`OnvifError::kind`] so callers can print both separately.
#[derive(Debug, Error)]
pub enum OnvifError {
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{code}: {reason}")]
    Fault { code: String, reason: String },
    #[error("HTTP status {0}")]
    Http(reqwest::StatusCode),
    #[error("{0}")]
    MalformedResponse(String),
    #[error("device did not advertise a {0} service")]
    ServiceUnavailable(&'static str),
    #[error("{0}")]
    InvalidAddress(String),
}

impl OnvifError {
    /// Category label printed next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            OnvifError::Connection(_) => "ConnectionError",
            OnvifError::Timeout(_) => "TimeoutError",
            OnvifError::Authentication(_) => "AuthenticationError",
            OnvifError::Fault { .. } => "SoapFault",
            OnvifError::Http(_) => "HttpError",
            OnvifError::MalformedResponse(_) => "MalformedResponse",
            OnvifError::ServiceUnavailable(_) => "ServiceUnavailable",
            OnvifError::InvalidAddress(_) => "InvalidAddress",
        }
    }
}

impl From<reqwest::Error> for OnvifError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OnvifError::Timeout(e.to_string())
        } else {
            OnvifError::Connection(e.to_string())
        }
    }
}

impl From<xml::reader::Error> for OnvifError {
    fn from(e: xml::reader::Error) -> Self {
        OnvifError::MalformedResponse(e.to_string())
    }
}

impl From<url::ParseError> for OnvifError {
    fn from(e: url::ParseError) -> Self {
        OnvifError::InvalidAddress(e.to_string())
    }
}
