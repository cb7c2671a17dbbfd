//! Service instance records and their JSON wire format

use crate::address::HostAndPort;
use crate::config::InstanceConfig;
use crate::validation::{HostPresent, MaxChars, PortPresent, ValidServiceName};
use crate::{DiscoveryError, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// Wire key for the service name
pub const FIELD_NAME: &str = "name";
/// Wire key for the hostname
pub const FIELD_HOST: &str = "host";
/// Wire key for the port
pub const FIELD_PORT: &str = "port";
/// Wire key for the registration timestamp
pub const FIELD_REGISTRATION_TIME: &str = "registration-time";
/// Wire key for the payload
pub const FIELD_PAYLOAD: &str = "payload";

/// A single running instance of a service
///
/// Instances are validated when built and never change afterwards, so they
/// can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use soa_discovery::{HostAndPort, ServiceInstance};
///
/// let instance = ServiceInstance::new(
///     "FooService",
///     HostAndPort::from_parts("server", 8080),
///     Some("payload".to_string()),
/// )?;
///
/// let json = instance.to_json();
/// assert_eq!(ServiceInstance::from_json(&json)?, instance);
/// # Ok::<(), soa_discovery::DiscoveryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceInstance {
    service_name: String,
    hostname: String,
    port: u16,
    payload: Option<String>,
    registration_time: DateTime<Utc>,
}

/// Canonical field layout on the wire
#[derive(Serialize)]
struct WireInstance<'a> {
    name: &'a str,
    host: &'a str,
    port: u16,
    #[serde(rename = "registration-time")]
    registration_time: String,
    payload: Option<&'a str>,
}

impl ServiceInstance {
    /// Create a new instance registered now, using the default limits
    pub fn new(
        service_name: impl Into<String>,
        address: HostAndPort,
        payload: Option<String>,
    ) -> Result<Self> {
        let mut builder = Self::builder(service_name, address);
        if let Some(payload) = payload {
            builder = builder.payload(payload);
        }
        builder.build()
    }

    /// Start building an instance
    pub fn builder(service_name: impl Into<String>, address: HostAndPort) -> ServiceInstanceBuilder {
        ServiceInstanceBuilder::new(service_name, address)
    }

    /// Logical service name
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Hostname
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address as a host/port pair
    pub fn address(&self) -> HostAndPort {
        HostAndPort::from_parts(self.hostname.clone(), self.port)
    }

    /// Opaque service-defined payload
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// When this instance was created
    pub fn registration_time(&self) -> DateTime<Utc> {
        self.registration_time
    }

    /// Encode to the canonical JSON wire format
    ///
    /// The `payload` key is always written; a missing payload becomes `null`.
    /// Each field is rendered through `serde_json::Value`, whose `Display`
    /// cannot fail, so keys keep their canonical order.
    pub fn to_json(&self) -> String {
        format!(
            "{{\"{}\":{},\"{}\":{},\"{}\":{},\"{}\":{},\"{}\":{}}}",
            FIELD_NAME,
            Value::from(self.service_name.as_str()),
            FIELD_HOST,
            Value::from(self.hostname.as_str()),
            FIELD_PORT,
            Value::from(self.port),
            FIELD_REGISTRATION_TIME,
            Value::from(format_timestamp(&self.registration_time)),
            FIELD_PAYLOAD,
            Value::from(self.payload.as_deref()),
        )
    }

    /// Alias for [`to_json`](Self::to_json)
    pub fn encode(&self) -> String {
        self.to_json()
    }

    /// Decode from the canonical JSON wire format
    ///
    /// Only the presence and type of each field is checked. Name format and
    /// payload length are trusted from the wire.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Alias for [`from_json`](Self::from_json)
    pub fn decode(json: &str) -> Result<Self> {
        Self::from_json(json)
    }

    fn to_wire(&self) -> WireInstance<'_> {
        WireInstance {
            name: &self.service_name,
            host: &self.hostname,
            port: self.port,
            registration_time: format_timestamp(&self.registration_time),
            payload: self.payload.as_deref(),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(DiscoveryError::malformed("service instance must be a JSON object"));
        };

        let service_name = required_str(&root, FIELD_NAME)?;
        let hostname = required_str(&root, FIELD_HOST)?;
        let port = required_port(&root)?;
        let registration_time = parse_timestamp(&required_str(&root, FIELD_REGISTRATION_TIME)?)?;

        // The payload key must exist even when there is no payload.
        let payload = match root.get(FIELD_PAYLOAD) {
            None => return Err(DiscoveryError::missing_field(FIELD_PAYLOAD)),
            Some(Value::Null) => None,
            Some(Value::String(payload)) => Some(payload.clone()),
            Some(_) => {
                return Err(DiscoveryError::malformed(format!(
                    "field '{}' must be a string or null",
                    FIELD_PAYLOAD
                )));
            }
        };

        let instance = Self {
            service_name,
            hostname,
            port,
            payload,
            registration_time,
        };

        if !instance.satisfies(&InstanceConfig::default()) {
            warn!(
                "Decoded service instance {} would be rejected by direct construction",
                instance
            );
        }
        debug!("Decoded service instance {}", instance);

        Ok(instance)
    }

    fn satisfies(&self, config: &InstanceConfig) -> bool {
        ValidServiceName::is_valid(&self.service_name)
            && HostPresent::validate(&self.hostname, "address").is_ok()
            && self
                .payload
                .as_deref()
                .is_none_or(|p| MaxChars(config.max_payload_size).validate(p, "payload").is_ok())
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.service_name, self.address())
    }
}

impl Serialize for ServiceInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ServiceInstance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Builder for [`ServiceInstance`]
#[derive(Debug, Clone)]
pub struct ServiceInstanceBuilder {
    service_name: String,
    address: HostAndPort,
    payload: Option<String>,
    config: InstanceConfig,
}

impl ServiceInstanceBuilder {
    /// Create a builder with no payload and default limits
    pub fn new(service_name: impl Into<String>, address: HostAndPort) -> Self {
        Self {
            service_name: service_name.into(),
            address,
            payload: None,
            config: InstanceConfig::default(),
        }
    }

    /// Attach a payload
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Use explicit limits instead of the defaults
    pub fn config(mut self, config: &InstanceConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Validate and build the instance, stamping it with the current time
    pub fn build(self) -> Result<ServiceInstance> {
        ValidServiceName::validate(&self.service_name, FIELD_NAME)?;
        HostPresent::validate(self.address.host(), "address")?;
        let port = PortPresent::validate(self.address.port(), "address")?;
        if let Some(payload) = &self.payload {
            MaxChars(self.config.max_payload_size).validate(payload, FIELD_PAYLOAD)?;
        }

        let instance = ServiceInstance {
            service_name: self.service_name,
            hostname: self.address.host().to_string(),
            port,
            payload: self.payload,
            // The wire format carries milliseconds only.
            registration_time: Utc::now().trunc_subsecs(3),
        };

        debug!("Created service instance {}", instance);
        Ok(instance)
    }
}

fn required_str(root: &Map<String, Value>, field: &str) -> Result<String> {
    match root.get(field) {
        None | Some(Value::Null) => Err(DiscoveryError::missing_field(field)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(DiscoveryError::malformed(format!(
            "field '{}' must be a string",
            field
        ))),
    }
}

fn required_port(root: &Map<String, Value>) -> Result<u16> {
    match root.get(FIELD_PORT) {
        None | Some(Value::Null) => Err(DiscoveryError::missing_field(FIELD_PORT)),
        Some(value) => value
            .as_u64()
            .and_then(|port| u16::try_from(port).ok())
            .filter(|port| *port != 0)
            .ok_or_else(|| {
                DiscoveryError::malformed(format!(
                    "field '{}' must be an integer between 1 and 65535",
                    FIELD_PORT
                ))
            }),
    }
}

fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Sub-millisecond digits are dropped so decoded records match their encoding.
fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|time| time.with_timezone(&Utc).trunc_subsecs(3))
        .map_err(|e| {
            DiscoveryError::malformed(format!(
                "field '{}' is not an ISO-8601 timestamp: {}",
                FIELD_REGISTRATION_TIME, e
            ))
        })
}
