use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use snmp2::{Oid, SyncSession};

use super::types::{SnmpError, SnmpResult, SnmpValue};
use crate::config::SnmpAuth;

// SNMPv3 has significant encryption/auth overhead, so the timeout is
// generous compared to a plain v2c GET.
const SNMP_TIMEOUT_SECS: u64 = 30;

/// SNMP client for polling targets. Sessions are created per request
/// from the target's auth descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnmpClient;

impl SnmpClient {
    pub fn new() -> Self {
        Self
    }

    /// Perform an SNMP GET against one target using its group's
    /// credentials. The blocking SNMP I/O runs on the tokio blocking
    /// pool.
    pub async fn get(
        &self,
        ip_target: &str,
        auth: &Arc<SnmpAuth>,
        oid: &str,
    ) -> SnmpResult<SnmpValue> {
        let oid_parsed =
            Oid::from_str(oid).map_err(|_| SnmpError::InvalidOid(oid.to_owned()))?;

        let addr = format!("{}:{}", ip_target, auth.port);
        let auth = Arc::clone(auth);

        tokio::task::spawn_blocking(move || {
            let mut session = create_session(&addr, &auth)?;

            // First attempt may fail with AuthUpdated while the v3
            // engine ID is discovered.
            let mut response = match session.get(&oid_parsed) {
                Ok(resp) => resp,
                Err(snmp2::Error::AuthUpdated) => {
                    tracing::debug!("SNMPv3 engine ID discovered, retrying request");
                    session.get(&oid_parsed).map_err(map_snmp_error)?
                }
                Err(e) => return Err(map_snmp_error(e)),
            };

            if response.error_status != 0 {
                return Err(SnmpError::RequestFailed(format!(
                    "SNMP error status: {}",
                    response.error_status
                )));
            }

            let (_name, value) = response
                .varbinds
                .next()
                .ok_or(SnmpError::RequestFailed("no varbinds in response".into()))?;

            convert_value(value)
        })
        .await
        .map_err(|e| SnmpError::RequestFailed(format!("task join error: {}", e)))?
    }
}

/// Create a session appropriate for the descriptor's version.
fn create_session(addr: &str, auth: &SnmpAuth) -> SnmpResult<SyncSession> {
    let timeout = Some(Duration::from_secs(SNMP_TIMEOUT_SECS));
    let req_id = 1;

    if auth.version == 3 {
        create_v3_session(addr, timeout, auth)
    } else {
        SyncSession::new_v2c(addr, auth.community.reveal().as_bytes(), timeout, req_id)
            .map_err(|_| SnmpError::NetworkUnreachable)
    }
}

/// Create an SNMPv3 session. The security level is derived from which
/// of the group's auth/priv parameters are present.
fn create_v3_session(
    addr: &str,
    timeout: Option<Duration>,
    auth: &SnmpAuth,
) -> SnmpResult<SyncSession> {
    use snmp2::v3::{Auth, Security};

    let secname = auth
        .secname
        .as_deref()
        .ok_or_else(|| SnmpError::RequestFailed("secname required for SNMPv3".into()))?;

    let security_auth = match (&auth.authprotocol, &auth.privprotocol) {
        (Some(_), Some(priv_protocol)) => {
            let cipher = parse_priv_protocol(priv_protocol)?;
            let priv_password = auth.privpassword.as_ref().ok_or_else(|| {
                SnmpError::RequestFailed("privpassword required with privprotocol".into())
            })?;
            Auth::AuthPriv {
                cipher,
                privacy_password: priv_password.reveal().as_bytes().to_vec(),
            }
        }
        (Some(_), None) => Auth::AuthNoPriv,
        (None, _) => Auth::NoAuthNoPriv,
    };

    let auth_password = auth
        .authpassword
        .as_ref()
        .map(|secret| secret.reveal())
        .unwrap_or("");
    let needs_auth_protocol = !matches!(security_auth, Auth::NoAuthNoPriv);

    let mut security =
        Security::new(secname.as_bytes(), auth_password.as_bytes()).with_auth(security_auth);

    if needs_auth_protocol {
        let protocol = auth.authprotocol.as_deref().ok_or_else(|| {
            SnmpError::RequestFailed("authprotocol required for this security level".into())
        })?;
        security = security.with_auth_protocol(parse_auth_protocol(protocol)?);
    }

    let req_id = 1;
    let mut session = SyncSession::new_v3(addr, timeout, req_id, security).map_err(|e| {
        SnmpError::RequestFailed(format!("SNMPv3 session creation failed: {:?}", e))
    })?;

    // Engine ID discovery is only needed once authentication is in play.
    if needs_auth_protocol {
        session.init().map_err(|e| {
            SnmpError::RequestFailed(format!("engine ID discovery failed: {:?}", e))
        })?;
    }

    Ok(session)
}

/// Parse an authentication protocol name from the configuration file.
fn parse_auth_protocol(protocol: &str) -> SnmpResult<snmp2::v3::AuthProtocol> {
    use snmp2::v3::AuthProtocol;

    match protocol.trim().to_uppercase().as_str() {
        "MD5" => Ok(AuthProtocol::Md5),
        "SHA" | "SHA1" | "SHA-1" => Ok(AuthProtocol::Sha1),
        "SHA224" | "SHA-224" => Ok(AuthProtocol::Sha224),
        "SHA256" | "SHA-256" => Ok(AuthProtocol::Sha256),
        "SHA384" | "SHA-384" => Ok(AuthProtocol::Sha384),
        "SHA512" | "SHA-512" => Ok(AuthProtocol::Sha512),
        _ => Err(SnmpError::RequestFailed(format!(
            "unsupported auth protocol: '{}'",
            protocol
        ))),
    }
}

/// Parse a privacy protocol name from the configuration file.
fn parse_priv_protocol(protocol: &str) -> SnmpResult<snmp2::v3::Cipher> {
    use snmp2::v3::Cipher;

    match protocol.trim().to_uppercase().as_str() {
        "DES" => Ok(Cipher::Des),
        "AES" | "AES128" | "AES-128" => Ok(Cipher::Aes128),
        "AES192" | "AES-192" => Ok(Cipher::Aes192),
        "AES256" | "AES-256" => Ok(Cipher::Aes256),
        _ => Err(SnmpError::RequestFailed(format!(
            "unsupported priv protocol: '{}'",
            protocol
        ))),
    }
}

/// Map snmp2 errors to our error type
fn map_snmp_error(err: snmp2::Error) -> SnmpError {
    match err {
        snmp2::Error::Send => SnmpError::NetworkUnreachable,
        snmp2::Error::Receive => SnmpError::Timeout,
        snmp2::Error::CommunityMismatch => SnmpError::AuthFailure,
        snmp2::Error::AuthFailure(_) => SnmpError::AuthFailure,
        _ => SnmpError::RequestFailed(format!("{:?}", err)),
    }
}

/// Convert snmp2's value type to our SnmpValue
fn convert_value(value: snmp2::Value) -> SnmpResult<SnmpValue> {
    match value {
        snmp2::Value::Integer(i) => Ok(SnmpValue::Integer(i)),
        snmp2::Value::OctetString(bytes) => Ok(String::from_utf8(bytes.to_vec())
            .map(SnmpValue::String)
            .unwrap_or_else(|_| SnmpValue::OctetString(bytes.to_vec()))),
        snmp2::Value::ObjectIdentifier(oid) => Ok(SnmpValue::Oid(oid.to_string())),
        snmp2::Value::Counter32(c) => Ok(SnmpValue::Counter32(c)),
        snmp2::Value::Counter64(c) => Ok(SnmpValue::Counter64(c)),
        snmp2::Value::Unsigned32(g) => Ok(SnmpValue::Gauge32(g)),
        snmp2::Value::Timeticks(t) => Ok(SnmpValue::TimeTicks(t)),
        snmp2::Value::IpAddress(ip) => Ok(SnmpValue::IpAddress(format!(
            "{}.{}.{}.{}",
            ip[0], ip[1], ip[2], ip[3]
        ))),
        snmp2::Value::Null => Ok(SnmpValue::Null),
        _ => Ok(SnmpValue::Unsupported(format!("{:?}", value))),
    }
}
