//! ONVIF camera diagnostics.
//!
//! Two small tools sit on top of an async ONVIF client:
//!
//! * [`probe`] walks a list of candidate ports until one answers a device
//!   information query.
//! * [`streams`] lists the media profiles of a camera and resolves the RTSP
//!   URI of each one.
//!
//! The client side lives in [`client`]: a [`client::Connector`] opens a
//! session, which hands out device management and media service handles.
//! Requests are SOAP 1.2 over HTTP, signed with a WS-Security UsernameToken.

pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod probe;
pub mod streams;
pub mod utils;

pub use error::OnvifError;
