use base64ct::{Base64UrlUnpadded as Base64, Encoding};
use jsonwebtoken::{crypto, Algorithm, EncodingKey, Header};
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;

use super::TokenProducer;
use crate::{Error, Result};

/// Sign `payload` verbatim as the JWS payload segment.
///
/// The payload is not re-serialized, so any byte string (JSON or not) can be
/// signed.
fn sign_compact(payload: &[u8], header: &Header, key: &EncodingKey) -> Result<String> {
    let encoded_header = Base64::encode_string(&serde_json::to_vec(header)?);
    let encoded_payload = Base64::encode_string(payload);
    let message = format!("{encoded_header}.{encoded_payload}");
    let signature = crypto::sign(message.as_bytes(), key, header.alg)?;
    Ok(format!("{message}.{signature}"))
}

pub struct Hs256Signer {
    key: EncodingKey,
    header: Header,
}

impl Hs256Signer {
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::key("secret must not be empty"));
        }
        Ok(Self {
            key: EncodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
        })
    }
}

impl TokenProducer for Hs256Signer {
    fn name(&self) -> &'static str {
        "HS256"
    }

    fn produce(&self, payload: &[u8]) -> Result<String> {
        sign_compact(payload, &self.header, &self.key)
    }
}

pub struct Rs256Signer {
    key: EncodingKey,
    header: Header,
}

impl Rs256Signer {
    /// Accepts a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        if pem.is_empty() {
            return Err(Error::key("empty RSA private key"));
        }
        // jsonwebtoken only unwraps the PEM, so a public key would slip through
        let text = std::str::from_utf8(pem)
            .map_err(|_| Error::key("RSA private key is not valid PEM text"))?;
        RsaPrivateKey::from_pkcs8_pem(text)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(text))
            .map_err(|e| Error::key(format!("invalid RSA private key: {e}")))?;

        Ok(Self {
            key: EncodingKey::from_rsa_pem(pem)?,
            header: Header::new(Algorithm::RS256),
        })
    }
}

impl TokenProducer for Rs256Signer {
    fn name(&self) -> &'static str {
        "RS256"
    }

    fn produce(&self, payload: &[u8]) -> Result<String> {
        sign_compact(payload, &self.header, &self.key)
    }
}

pub struct Es256Signer {
    key: EncodingKey,
    header: Header,
}

impl Es256Signer {
    /// Accepts a P-256 key as PKCS#8 (`PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`) PEM.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        if pem.is_empty() {
            return Err(Error::key("empty EC private key"));
        }
        let pem = std::str::from_utf8(pem)
            .map_err(|_| Error::key("EC private key is not valid PEM text"))?;

        // ring only takes PKCS#8, so SEC1 keys are re-encoded
        let secret = p256::SecretKey::from_pkcs8_pem(pem)
            .or_else(|_| p256::SecretKey::from_sec1_pem(pem))
            .map_err(|e| Error::key(format!("invalid P-256 private key: {e}")))?;
        let der = secret
            .to_pkcs8_der()
            .map_err(|e| Error::key(format!("issue re-encoding P-256 private key: {e}")))?;

        Ok(Self {
            key: EncodingKey::from_ec_der(der.as_bytes()),
            header: Header::new(Algorithm::ES256),
        })
    }
}

impl TokenProducer for Es256Signer {
    fn name(&self) -> &'static str {
        "ES256"
    }

    fn produce(&self, payload: &[u8]) -> Result<String> {
        sign_compact(payload, &self.header, &self.key)
    }
}

/// Sign a single payload with HS256 and a shared secret.
pub fn sign_hs256(payload: &[u8], secret: &[u8]) -> Result<String> {
    Hs256Signer::new(secret)?.produce(payload)
}

/// Sign a single payload with RS256 and a PEM-encoded RSA private key.
pub fn sign_rs256(payload: &[u8], private_pem: &[u8]) -> Result<String> {
    Rs256Signer::from_pem(private_pem)?.produce(payload)
}

/// Sign a single payload with ES256 and a PEM-encoded P-256 private key.
pub fn sign_es256(payload: &[u8], private_pem: &[u8]) -> Result<String> {
    Es256Signer::from_pem(private_pem)?.produce(payload)
}
