//! Outlook Autodiscover request parsing
//!
//! Clients POST a document shaped like:
//!
//! ```xml
//! <Autodiscover xmlns="https://schemas.microsoft.com/exchange/autodiscover/outlook/requestschema/2006">
//!   <Request>
//!     <EMailAddress>user@example.com</EMailAddress>
//!     <AcceptableResponseSchema>https://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a</AcceptableResponseSchema>
//!   </Request>
//! </Autodiscover>
//! ```
//!
//! Element names are matched on their local name, so namespace prefixes are
//! accepted. Elements other than the ones above are skipped.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{AutodiscoverError, Result};

const ROOT_ELEMENT: &[u8] = b"Autodiscover";
const EMAIL_ADDRESS_PATH: [&[u8]; 3] = [ROOT_ELEMENT, b"Request", b"EMailAddress"];
const RESPONSE_SCHEMA_PATH: [&[u8]; 3] = [ROOT_ELEMENT, b"Request", b"AcceptableResponseSchema"];

/// Parsed Autodiscover request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryRequest {
    /// Address the client is configuring
    pub email_address: String,
    /// Response schema the client asked for
    pub acceptable_response_schema: String,
}

impl DiscoveryRequest {
    /// Parse a request body
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(body);
        reader.trim_text(true);

        let mut request = Self::default();
        let mut path: Vec<Vec<u8>> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                AutodiscoverError::MalformedRequest(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                ))
            })?;

            match event {
                Event::Start(e) => {
                    let name = e.local_name().as_ref().to_vec();
                    if path.is_empty() {
                        check_root(&name)?;
                    }
                    path.push(name);

                    // A repeated element replaces the earlier value
                    if let Some(field) = request.field_mut(&path) {
                        field.clear();
                    }
                }
                Event::Empty(e) => {
                    if path.is_empty() {
                        check_root(e.local_name().as_ref())?;
                        return Ok(request);
                    }
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| AutodiscoverError::MalformedRequest(e.to_string()))?;
                    if let Some(field) = request.field_mut(&path) {
                        field.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| AutodiscoverError::MalformedRequest(e.to_string()))?;
                    if let Some(field) = request.field_mut(&path) {
                        field.push_str(text.trim());
                    }
                }
                Event::End(_) => {
                    path.pop();
                    // Anything after the root element is not inspected
                    if path.is_empty() {
                        return Ok(request);
                    }
                }
                Event::Eof => {
                    let reason = if path.is_empty() {
                        "missing Autodiscover element"
                    } else {
                        "unexpected end of document"
                    };
                    return Err(AutodiscoverError::MalformedRequest(reason.to_string()));
                }
                _ => {}
            }
        }
    }

    fn field_mut(&mut self, path: &[Vec<u8>]) -> Option<&mut String> {
        if path_matches(path, &EMAIL_ADDRESS_PATH) {
            Some(&mut self.email_address)
        } else if path_matches(path, &RESPONSE_SCHEMA_PATH) {
            Some(&mut self.acceptable_response_schema)
        } else {
            None
        }
    }
}

fn check_root(name: &[u8]) -> Result<()> {
    if name == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(AutodiscoverError::MalformedRequest(format!(
            "expected element <Autodiscover> but found <{}>",
            String::from_utf8_lossy(name)
        )))
    }
}

fn path_matches(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
}

/// Part of an address before the first `@`
///
/// An address without `@` is returned whole.
pub fn local_part(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

/// Per-request values substituted into a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Login name for both servers
    pub email_local_part: String,
}

impl RequestContext {
    pub fn from_request(request: &DiscoveryRequest) -> Self {
        Self {
            email_local_part: local_part(&request.email_address).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLOOK_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Autodiscover xmlns="https://schemas.microsoft.com/exchange/autodiscover/outlook/requestschema/2006">
  <Request>
    <EMailAddress>alice@example.com</EMailAddress>
    <AcceptableResponseSchema>https://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a</AcceptableResponseSchema>
  </Request>
</Autodiscover>"#;

    #[test]
    fn test_parse_outlook_request() {
        let request = DiscoveryRequest::parse(OUTLOOK_REQUEST.as_bytes()).unwrap();
        assert_eq!(request.email_address, "alice@example.com");
        assert_eq!(
            request.acceptable_response_schema,
            "https://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a"
        );
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let body = "<Autodiscover><Extra>x</Extra><Request><Legacy/><EMailAddress>bob@example.com</EMailAddress></Request></Autodiscover>";
        let request = DiscoveryRequest::parse(body.as_bytes()).unwrap();
        assert_eq!(request.email_address, "bob@example.com");
        assert!(request.acceptable_response_schema.is_empty());
    }

    #[test]
    fn test_prefixed_elements() {
        let body = r#"<a:Autodiscover xmlns:a="urn:test"><a:Request><a:EMailAddress>carol@example.com</a:EMailAddress></a:Request></a:Autodiscover>"#;
        let request = DiscoveryRequest::parse(body.as_bytes()).unwrap();
        assert_eq!(request.email_address, "carol@example.com");
    }

    #[test]
    fn test_email_outside_request_is_ignored() {
        let body = "<Autodiscover><EMailAddress>dave@example.com</EMailAddress></Autodiscover>";
        let request = DiscoveryRequest::parse(body.as_bytes()).unwrap();
        assert!(request.email_address.is_empty());
    }

    #[test]
    fn test_escaped_text() {
        let body = "<Autodiscover><Request><EMailAddress>o&apos;neil@example.com</EMailAddress></Request></Autodiscover>";
        let request = DiscoveryRequest::parse(body.as_bytes()).unwrap();
        assert_eq!(request.email_address, "o'neil@example.com");
    }

    #[test]
    fn test_empty_root_element() {
        let request = DiscoveryRequest::parse(b"<Autodiscover/>").unwrap();
        assert_eq!(request, DiscoveryRequest::default());
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"not xml at all",
            b"<Autodiscover><Request></Autodiscover>",
            b"<Autodiscover><Request>",
            b"<Other><Request/></Other>",
        ];

        for body in bodies {
            let err = DiscoveryRequest::parse(body).unwrap_err();
            assert!(
                matches!(err, AutodiscoverError::MalformedRequest(_)),
                "expected malformed request for {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("alice@example.com"), "alice");
        assert_eq!(local_part("a@b@example.com"), "a");
        assert_eq!(local_part("@example.com"), "");
    }

    #[test]
    fn test_local_part_without_at_sign() {
        assert_eq!(local_part("alice"), "alice");
        assert_eq!(local_part(""), "");
    }

    #[test]
    fn test_request_context() {
        let request = DiscoveryRequest {
            email_address: "bob@example.com".to_string(),
            acceptable_response_schema: String::new(),
        };
        assert_eq!(RequestContext::from_request(&request).email_local_part, "bob");
    }
}
