//! Network addresses for service instances

use crate::ValidationError;
use std::fmt;
use std::str::FromStr;

/// A hostname with an optional port
///
/// Either part may be missing while the address is being assembled;
/// [`ServiceInstance`](crate::ServiceInstance) rejects addresses that lack
/// a host or a port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAndPort {
    host: String,
    port: Option<u16>,
}

impl HostAndPort {
    /// Create an address from a host and port
    ///
    /// # Examples
    ///
    /// ```
    /// use soa_discovery::HostAndPort;
    ///
    /// let address = HostAndPort::from_parts("server", 8080);
    /// assert_eq!(address.to_string(), "server:8080");
    /// ```
    pub fn from_parts(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port: Some(port),
        }
    }

    /// Create an address with no port
    pub fn from_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
        }
    }

    /// Hostname (may be empty)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port, if one was given
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Whether a port was given
    pub fn has_port(&self) -> bool {
        self.port.is_some()
    }

    /// Whether a hostname was given
    ///
    /// A blank host counts as missing, matching instance validation.
    pub fn has_host(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

impl FromStr for HostAndPort {
    type Err = ValidationError;

    /// Parse `host`, `host:port`, `:port`, `[v6]` or `[v6]:port`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| {
            ValidationError::new("address", message)
                .with_constraint("address")
                .with_value(s)
        };

        let (host, port_text) = if let Some(rest) = s.strip_prefix('[') {
            let close = rest
                .find(']')
                .ok_or_else(|| invalid("unterminated bracketed host"))?;
            let host = &rest[..close];
            let tail = &rest[close + 1..];
            match tail.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None if tail.is_empty() => (host, None),
                None => return Err(invalid("unexpected text after bracketed host")),
            }
        } else {
            match s.find(':') {
                // Exactly one colon separates host and port; more than one is a bare IPv6 host.
                Some(idx) if s[idx + 1..].contains(':') => (s, None),
                Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
                None => (s, None),
            }
        };

        let port = match port_text {
            Some(text) => Some(
                text.parse::<u16>()
                    .map_err(|_| invalid("port must be a number between 0 and 65535"))?,
            ),
            None => None,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for HostAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            write!(f, "{}", self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceInstance;
    use crate::validation::HostPresent;

    #[test]
    fn test_from_parts() {
        let address = HostAndPort::from_parts("localhost", 8080);
        assert_eq!(address.host(), "localhost");
        assert_eq!(address.port(), Some(8080));
        assert!(address.has_host());
        assert!(address.has_port());
    }

    #[test]
    fn test_parse_host_and_port() {
        let address: HostAndPort = "server:8080".parse().unwrap();
        assert_eq!(address, HostAndPort::from_parts("server", 8080));
    }

    #[test]
    fn test_parse_host_only() {
        let address: HostAndPort = "localhost".parse().unwrap();
        assert_eq!(address.host(), "localhost");
        assert!(!address.has_port());
    }

    #[test]
    fn test_parse_port_only() {
        let address: HostAndPort = ":8080".parse().unwrap();
        assert!(!address.has_host());
        assert_eq!(address.port(), Some(8080));
    }

    #[test]
    fn test_parse_ipv6() {
        let address: HostAndPort = "[::1]:9000".parse().unwrap();
        assert_eq!(address.host(), "::1");
        assert_eq!(address.port(), Some(9000));
        assert_eq!(address.to_string(), "[::1]:9000");

        let bare: HostAndPort = "::1".parse().unwrap();
        assert_eq!(bare.host(), "::1");
        assert!(!bare.has_port());

        let bracketed: HostAndPort = "[fe80::1]".parse().unwrap();
        assert_eq!(bracketed.host(), "fe80::1");
        assert!(!bracketed.has_port());
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!("server:http".parse::<HostAndPort>().is_err());
        assert!("server:70000".parse::<HostAndPort>().is_err());
        assert!("server:".parse::<HostAndPort>().is_err());
        assert!("[::1".parse::<HostAndPort>().is_err());
        assert!("[::1]x".parse::<HostAndPort>().is_err());
    }

    #[test]
    fn test_blank_host_is_missing() {
        let address = HostAndPort::from_parts("  ", 8080);
        assert!(!address.has_host());
        assert!(HostPresent::validate(address.host(), "address").is_err());

        let err = ServiceInstance::new("Foo", address, None).unwrap_err();
        assert_eq!(err.validation_error().unwrap().constraint, "hostPresent");
    }

    #[test]
    fn test_display_without_port() {
        assert_eq!(HostAndPort::from_host("localhost").to_string(), "localhost");
    }
}
