//! A single redirect-resolution service.
//!
//! # Responsibilities
//! - Validate a configured token as an absolute http/https URL
//! - Optionally reject loopback and local hosts
//! - Keep the token exactly as configured for building lookup URLs

use std::fmt;
use std::net::IpAddr;
use url::{Host, Url};

/// Which hosts a resolver endpoint may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostPolicy {
    /// Loopback and single-label hosts are accepted (test environments).
    #[default]
    AllowLocal,
    /// Only publicly routable hosts are accepted.
    PublicOnly,
}

/// Why a configured token was not accepted as an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointRejection {
    Malformed(url::ParseError),
    UnsupportedScheme(String),
    MissingHost,
    LocalHost(String),
}

impl fmt::Display for EndpointRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRejection::Malformed(e) => write!(f, "malformed url: {}", e),
            EndpointRejection::UnsupportedScheme(s) => write!(f, "unsupported scheme `{}`", s),
            EndpointRejection::MissingHost => write!(f, "url has no host"),
            EndpointRejection::LocalHost(h) => write!(f, "local host `{}` not allowed", h),
        }
    }
}

/// Absolute URL of a resolver service, validated at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint {
    raw: String,
}

impl ResolverEndpoint {
    /// Validate `token` under the given host policy.
    pub fn parse(token: &str, policy: HostPolicy) -> Result<Self, EndpointRejection> {
        let url = Url::parse(token).map_err(EndpointRejection::Malformed)?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointRejection::UnsupportedScheme(other.to_string())),
        }

        let host = url.host().ok_or(EndpointRejection::MissingHost)?;
        if policy == HostPolicy::PublicOnly && is_local(&host) {
            return Err(EndpointRejection::LocalHost(host.to_string()));
        }

        Ok(Self {
            raw: token.to_string(),
        })
    }

    /// The endpoint exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lookup URL asking this endpoint about an already-encoded original URL.
    pub fn lookup_url(&self, encoded_original: &str) -> String {
        format!("{}?r={}", self.raw, encoded_original)
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_local(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.');
            domain.eq_ignore_ascii_case("localhost")
                || domain.to_ascii_lowercase().ends_with(".localhost")
                || !domain.contains('.')
        }
        Host::Ipv4(ip) => is_local_ip(IpAddr::V4(*ip)),
        Host::Ipv6(ip) => is_local_ip(IpAddr::V6(*ip)),
    }
}

fn is_local_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}
