//! # JSON Web Encryption (JWE)
//!
//! Compact JWE ([RFC7516]) with `RSA-OAEP` key wrapping and `A256GCM` content
//! encryption ([RFC7518]). Token assembly and parsing are left to `josekit`;
//! this module only loads keys and pins the algorithm pair.
//!
//! [RFC7516]: https://www.rfc-editor.org/rfc/rfc7516
//! [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518

use josekit::jwe::alg::rsaes::RsaesJweEncrypter;
use josekit::jwe::{self, JweHeader, RSA_OAEP};
use josekit::JoseError;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, LineEnding};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

use super::TokenProducer;
use crate::{Error, Result};

const CONTENT_ENCRYPTION: &str = "A256GCM";

pub struct RsaOaepA256GcmEncryptor {
    encrypter: RsaesJweEncrypter,
    header: JweHeader,
}

impl RsaOaepA256GcmEncryptor {
    /// Accepts an SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`) PEM.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        if pem.is_empty() {
            return Err(Error::key("public key must not be empty"));
        }
        let pem = std::str::from_utf8(pem)
            .map_err(|_| Error::key("RSA public key is not valid PEM text"))?;
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| Error::key(format!("invalid RSA public key: {e}")))?;

        // josekit is always handed SPKI
        let spki = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::key(format!("issue re-encoding RSA public key: {e}")))?;
        let encrypter = RSA_OAEP.encrypter_from_pem(spki).map_err(key_error)?;

        let mut header = JweHeader::new();
        header.set_content_encryption(CONTENT_ENCRYPTION);

        Ok(Self { encrypter, header })
    }
}

impl TokenProducer for RsaOaepA256GcmEncryptor {
    fn name(&self) -> &'static str {
        "RSA-OAEP+A256GCM"
    }

    fn produce(&self, payload: &[u8]) -> Result<String> {
        jwe::serialize_compact(payload, &self.header, &self.encrypter).map_err(encoding_error)
    }
}

/// Encrypt a single payload into a compact JWE using RSA-OAEP and A256GCM.
pub fn encrypt_rsa_oaep_a256gcm(payload: &[u8], public_pem: &[u8]) -> Result<String> {
    RsaOaepA256GcmEncryptor::from_pem(public_pem)?.produce(payload)
}

/// Decrypt a compact RSA-OAEP / A256GCM JWE and return the plaintext.
///
/// Accepts a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM.
pub fn decrypt_rsa_oaep_a256gcm(token: &str, private_pem: &[u8]) -> Result<Vec<u8>> {
    if private_pem.is_empty() {
        return Err(Error::key("private key must not be empty"));
    }
    let pem = std::str::from_utf8(private_pem)
        .map_err(|_| Error::key("RSA private key is not valid PEM text"))?;
    let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::key(format!("invalid RSA private key: {e}")))?;
    let pkcs8 = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| Error::key(format!("issue re-encoding RSA private key: {e}")))?;
    let decrypter = RSA_OAEP.decrypter_from_pem(pkcs8.as_bytes()).map_err(key_error)?;

    // josekit checks `alg` against the decrypter; `enc` is ours to pin
    let (payload, header) = jwe::deserialize_compact(token, &decrypter).map_err(encoding_error)?;
    match header.content_encryption() {
        Some(CONTENT_ENCRYPTION) => Ok(payload),
        other => Err(Error::encoding(format!(
            "unexpected content encryption {other:?}, want {CONTENT_ENCRYPTION}"
        ))),
    }
}

fn key_error(err: JoseError) -> Error {
    Error::Key(err.to_string())
}

fn encoding_error(err: JoseError) -> Error {
    Error::Encoding(err.to_string())
}
