//! WS-Security UsernameToken header (OASIS WSS 1.0, PasswordDigest profile).

use crate::config::Credentials;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use sha1::{Digest, Sha1};
use uuid::Uuid;
use xml::escape::escape_str_pcdata;

/// Base64(SHA1(nonce + created + password))
pub fn password_digest(nonce: &[u8], created: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce);
    hasher.update(created.as_bytes());
    hasher.update(password.as_bytes());

    BASE64.encode(hasher.finalize())
}

/// Builds a fresh `<wsse:Security>` header: new random nonce, `Created` set to now.
pub fn security_header(credentials: &Credentials) -> String {
    // v4 UUID bytes: 122 random bits, 6 fixed version/variant bits
    let nonce = Uuid::new_v4().into_bytes();
    let created = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    username_token(credentials, &nonce, &created)
}

fn username_token(credentials: &Credentials, nonce: &[u8], created: &str) -> String {
    let digest = password_digest(nonce, created, &credentials.password);
    let nonce = BASE64.encode(nonce);
    let username = escape_str_pcdata(&credentials.username);

    format!(
        r#"<wsse:Security s:mustUnderstand="1" xmlns:wsse="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd" xmlns:wsu="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd">
            <wsse:UsernameToken>
                <wsse:Username>{username}</wsse:Username>
                <wsse:Password Type="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest">{digest}</wsse:Password>
                <wsse:Nonce EncodingType="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary">{nonce}</wsse:Nonce>
                <wsu:Created>{created}</wsu:Created>
            </wsse:UsernameToken>
        </wsse:Security>"#
    )
}
