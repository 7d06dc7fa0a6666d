//! Response documents for mail client configuration wizards
//!
//! Both documents are compiled askama templates under `templates/`.
//! Substituted values are XML-escaped.

use askama::Template;

use crate::config::AutodiscoverConfig;
use crate::error::Result;
use crate::request::RequestContext;

/// IMAP port advertised to clients (implicit TLS)
pub const IMAP_PORT: u16 = 993;

/// SMTP submission port advertised to clients (STARTTLS)
pub const SMTP_PORT: u16 = 587;

/// Thunderbird provider descriptor. Display name and usernames stay as
/// `%EMAILADDRESS%` / `%EMAILLOCALPART%` for the client to expand.
#[derive(Template)]
#[template(path = "provider_descriptor.xml")]
struct ProviderDescriptor<'a> {
    domain: &'a str,
    imap_host: &'a str,
    imap_port: u16,
    smtp_host: &'a str,
    smtp_port: u16,
}

/// Account descriptor for an Autodiscover request
#[derive(Template)]
#[template(path = "account_descriptor.xml")]
struct AccountDescriptor<'a> {
    domain: &'a str,
    local_part: &'a str,
    imap_host: &'a str,
    imap_port: u16,
    smtp_host: &'a str,
    smtp_port: u16,
}

/// Render the document served at `/mail/config-v1.1.xml`
pub fn render_provider_descriptor(config: &AutodiscoverConfig) -> Result<String> {
    let document = ProviderDescriptor {
        domain: &config.domain,
        imap_host: &config.imap_host,
        imap_port: IMAP_PORT,
        smtp_host: &config.smtp_host,
        smtp_port: SMTP_PORT,
    };

    Ok(document.render()?)
}

/// Render the document answering a POST to `/Autodiscover/Autodiscover.xml`
pub fn render_account_descriptor(
    config: &AutodiscoverConfig,
    context: &RequestContext,
) -> Result<String> {
    let document = AccountDescriptor {
        domain: &config.domain,
        local_part: &context.email_local_part,
        imap_host: &config.imap_host,
        imap_port: IMAP_PORT,
        smtp_host: &config.smtp_host,
        smtp_port: SMTP_PORT,
    };

    Ok(document.render()?)
}
