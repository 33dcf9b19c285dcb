//! Session token formatting, parsing and verifier construction.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

/// Session token identifier prefix.
pub const SESSION_TOKEN_PREFIX: &str = "lr";

/// Number of secret bytes encoded in a session token.
pub const SESSION_SECRET_BYTES: usize = 32;

/// Number of random bytes behind invite and password reset tokens.
pub const OPAQUE_TOKEN_BYTES: usize = 32;

const SESSION_SECRET_HEX_CHARS: usize = SESSION_SECRET_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for SessionTokenVersion {
    type Error = SessionTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
pub struct SessionSecret {
    bytes: [u8; SESSION_SECRET_BYTES],
}

impl SessionSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSessionToken {
    pub session_uuid: Uuid,
    pub version: SessionTokenVersion,
    pub secret: SessionSecret,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_session_secret() -> SessionSecret {
    let mut secret = [0_u8; SESSION_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionSecret::from_bytes(secret)
}

#[must_use]
pub fn format_session_token(
    session_uuid: Uuid,
    version: SessionTokenVersion,
    secret: &SessionSecret,
) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        session_uuid.simple(),
        encode_hex(secret.as_bytes())
    )
}

pub fn parse_session_token(token: &str) -> Result<ParsedSessionToken, SessionTokenError> {
    let (prefix_and_id, secret_hex) = token
        .split_once('.')
        .ok_or(SessionTokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let version_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let session_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    let version = SessionTokenVersion::from_str(version_segment)?;

    let session_uuid =
        Uuid::try_parse(session_segment).map_err(|_| SessionTokenError::InvalidFormat)?;

    let secret = decode_secret_hex(secret_hex).ok_or(SessionTokenError::InvalidSecretEncoding)?;

    Ok(ParsedSessionToken {
        session_uuid,
        version,
        secret: SessionSecret::from_bytes(secret),
    })
}

/// Stored verifier for a session: hex SHA-256 of
/// `{session_uuid_hex}:{version}:{user_uuid_hex}:{secret_hex}`.
#[must_use]
pub fn session_verifier(
    session_uuid: &Uuid,
    version: SessionTokenVersion,
    user_uuid: &UserUuid,
    secret: &SessionSecret,
) -> String {
    let mut input = format!(
        "{}:{}:{}:{}",
        session_uuid.simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        encode_hex(secret.as_bytes()),
    );

    let digest = Sha256::digest(input.as_bytes());

    input.zeroize();

    encode_hex(&digest)
}

/// Random single-use token for invite and password reset links.
#[must_use]
pub fn generate_opaque_token() -> String {
    let mut bytes = [0_u8; OPAQUE_TOKEN_BYTES];

    OsRng.fill_bytes(&mut bytes);

    let token = encode_hex(&bytes);

    bytes.zeroize();

    token
}

/// Hash under which an opaque token is stored and looked up.
#[must_use]
pub fn hash_opaque_token(token: &str) -> String {
    encode_hex(&Sha256::digest(token.trim().as_bytes()))
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; SESSION_SECRET_BYTES]> {
    if secret_hex.len() != SESSION_SECRET_HEX_CHARS {
        return None;
    }

    let mut secret = [0_u8; SESSION_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let [hi, lo] = pair else {
            return None;
        };

        *byte = (decode_hex_nibble(*hi)? << 4) | decode_hex_nibble(*lo)?;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formatted_tokens_parse_back() -> TestResult {
        let session_uuid = Uuid::nil();
        let secret = SessionSecret::from_bytes([0xAB; SESSION_SECRET_BYTES]);
        let token = format_session_token(session_uuid, SessionTokenVersion::V1, &secret);

        assert!(token.starts_with("lr_v1_"), "unexpected prefix in {token}");

        let parsed = parse_session_token(&token)?;

        assert_eq!(parsed.session_uuid, session_uuid);
        assert_eq!(parsed.version, SessionTokenVersion::V1);
        assert_eq!(parsed.secret.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn parse_rejects_invalid_prefix() {
        assert!(
            parse_session_token("nope_v1_00000000000000000000000000000000.aa").is_err(),
            "foreign prefixes must be rejected"
        );
    }

    #[test]
    fn parse_rejects_short_secret() {
        assert!(
            matches!(
                parse_session_token("lr_v1_00000000000000000000000000000000.abcd"),
                Err(SessionTokenError::InvalidSecretEncoding)
            ),
            "secrets must be exactly 64 hex characters"
        );
    }

    #[test]
    fn verifier_binds_the_user() {
        let session_uuid = Uuid::nil();
        let secret = SessionSecret::from_bytes([0xCD; SESSION_SECRET_BYTES]);
        let alice = UserUuid::new();
        let bob = UserUuid::new();

        let first = session_verifier(&session_uuid, SessionTokenVersion::V1, &alice, &secret);
        let again = session_verifier(&session_uuid, SessionTokenVersion::V1, &alice, &secret);
        let other = session_verifier(&session_uuid, SessionTokenVersion::V1, &bob, &secret);

        assert_eq!(first, again, "verifier must be deterministic");
        assert_ne!(first, other, "verifier must differ per user");
        assert_eq!(first.len(), 64, "verifier is hex sha-256");
    }

    #[test]
    fn opaque_tokens_hash_consistently() {
        let token = generate_opaque_token();

        assert_eq!(token.len(), OPAQUE_TOKEN_BYTES * 2);
        assert_eq!(hash_opaque_token(&token), hash_opaque_token(&format!(" {token} ")));
        assert_ne!(hash_opaque_token(&token), token);
    }
}
