use crate::device::Profile;
use crate::error::OnvifError;

use std::io::BufReader;
use xml::reader::{EventReader, XmlEvent};

/// A SOAP fault pulled out of a response body. Handles both the SOAP 1.2
/// (`Code/Value`, `Reason/Text`) and SOAP 1.1 (`faultcode`, `faultstring`) shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub code: String,
    pub subcode: Option<String>,
    pub reason: String,
}

/// Returns the text of the first `element_to_find` that sits anywhere inside an
/// open `parent` element (or anywhere at all when `parent` is `None`).
/// An empty element yields `Some("")`, a missing one `None`.
pub fn find_text(
    response: &[u8],
    element_to_find: &str,
    parent: Option<&str>,
) -> Result<Option<String>, OnvifError> {
    let parser = EventReader::new(BufReader::new(response));
    let mut open: Vec<String> = Vec::new();
    // (depth the element opened at, collected text)
    let mut capture: Option<(usize, String)> = None;

    for e in parser {
        match e? {
            XmlEvent::StartElement { name, .. } => {
                if capture.is_none() && name.local_name == element_to_find {
                    let inside_parent = match parent {
                        Some(p) => open.iter().any(|el| el == p),
                        None => true,
                    };
                    if inside_parent {
                        capture = Some((open.len(), String::new()));
                    }
                }
                open.push(name.local_name);
            }
            XmlEvent::EndElement { .. } => {
                open.pop();
                if let Some((depth, text)) = &capture {
                    if open.len() == *depth {
                        return Ok(Some(text.trim().to_string()));
                    }
                }
            }
            XmlEvent::Characters(chars) | XmlEvent::CData(chars) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&chars);
                }
            }
            // There's more: https://docs.rs/xml-rs/latest/xml/reader/enum.XmlEvent.html
            _ => {}
        }
    }

    Ok(None)
}

/// Like [`find_text`] but a missing element is a malformed response.
pub fn require_text(
    response: &[u8],
    element_to_find: &str,
    parent: Option<&str>,
) -> Result<String, OnvifError> {
    find_text(response, element_to_find, parent)?.ok_or_else(|| {
        OnvifError::MalformedResponse(format!("response has no <{element_to_find}> element"))
    })
}

pub fn find_fault(response: &[u8]) -> Result<Option<Fault>, OnvifError> {
    if find_text(response, "Fault", None)?.is_none() {
        return Ok(None);
    }

    let code = match find_text(response, "Value", Some("Code"))? {
        Some(code) => code,
        None => find_text(response, "faultcode", None)?.unwrap_or_default(),
    };
    let subcode = find_text(response, "Value", Some("Subcode"))?;
    let reason = match find_text(response, "Text", Some("Reason"))? {
        Some(reason) => reason,
        None => find_text(response, "faultstring", None)?.unwrap_or_default(),
    };

    Ok(Some(Fault {
        code,
        subcode,
        reason,
    }))
}

/// Walks every `Profiles` element of a GetProfiles response, keeping device order.
/// Only the profile's direct `Name` child counts; the nested configurations
/// carry their own `Name` elements.
pub fn parse_profiles(response: &[u8]) -> Result<Vec<Profile>, OnvifError> {
    let parser = EventReader::new(BufReader::new(response));
    let mut depth = 0usize;
    let mut found_response = false;
    let mut profiles = Vec::new();
    let mut current: Option<(usize, Profile)> = None;
    let mut name_depth: Option<usize> = None;
    let mut name_text = String::new();

    for e in parser {
        match e? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                depth += 1;
                let element = name.local_name;

                if element == "GetProfilesResponse" {
                    found_response = true;
                }

                if current.is_none() && element == "Profiles" {
                    let token = attributes
                        .into_iter()
                        .find(|attr| attr.name.local_name == "token")
                        .map(|attr| attr.value)
                        .ok_or_else(|| {
                            OnvifError::MalformedResponse("profile without a token".to_string())
                        })?;

                    current = Some((depth, Profile { token, name: None }));
                } else if let Some((profile_depth, _)) = &current {
                    if element == "Name" && depth == profile_depth + 1 {
                        name_depth = Some(depth);
                        name_text.clear();
                    }
                }
            }
            XmlEvent::EndElement { .. } => {
                if name_depth == Some(depth) {
                    if let Some((_, profile)) = current.as_mut() {
                        profile.name = Some(name_text.trim().to_string());
                    }
                    name_depth = None;
                }

                let closes_profile = matches!(&current, Some((d, _)) if *d == depth);
                if closes_profile {
                    if let Some((_, profile)) = current.take() {
                        profiles.push(profile);
                    }
                }

                depth -= 1;
            }
            XmlEvent::Characters(chars) | XmlEvent::CData(chars) => {
                if name_depth.is_some() {
                    name_text.push_str(&chars);
                }
            }
            _ => {}
        }
    }

    if !found_response {
        return Err(OnvifError::MalformedResponse(
            "response has no <GetProfilesResponse> element".to_string(),
        ));
    }

    Ok(profiles)
}
