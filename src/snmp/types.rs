use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnmpError {
    #[error("SNMP request failed: {0}")]
    RequestFailed(String),

    #[error("invalid OID: {0}")]
    InvalidOid(String),

    #[error("timeout")]
    Timeout,

    #[error("authentication failure")]
    AuthFailure,

    #[error("network unreachable")]
    NetworkUnreachable,
}

pub type SnmpResult<T> = Result<T, SnmpError>;

/// SNMP value returned from a GET operation
#[derive(Debug, Clone)]
pub enum SnmpValue {
    Integer(i64),
    String(String),
    OctetString(Vec<u8>),
    Oid(String),
    Counter32(u32),
    Counter64(u64),
    Gauge32(u32),
    TimeTicks(u32),
    IpAddress(String),
    Null,
    Unsupported(String),
}

impl SnmpValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(v) => Some(*v),
            SnmpValue::Counter32(v) => Some(*v as i64),
            SnmpValue::Counter64(v) => Some(*v as i64),
            SnmpValue::Gauge32(v) => Some(*v as i64),
            SnmpValue::TimeTicks(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_i64().map(|v| v as f64)
    }
}

impl std::fmt::Display for SnmpValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{}", s),
            Self::OctetString(bytes) => write!(f, "{} bytes", bytes.len()),
            Self::Oid(oid) => write!(f, "{}", oid),
            Self::Counter32(v) => write!(f, "{}", v),
            Self::Counter64(v) => write!(f, "{}", v),
            Self::Gauge32(v) => write!(f, "{}", v),
            Self::TimeTicks(v) => write!(f, "{}", v),
            Self::IpAddress(ip) => write!(f, "{}", ip),
            Self::Null => write!(f, "null"),
            Self::Unsupported(what) => write!(f, "unsupported ({})", what),
        }
    }
}
