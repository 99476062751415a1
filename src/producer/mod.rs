//! Token producers.
//!
//! A producer owns parsed key material and turns a payload into a compact
//! token. Keys are parsed once, when the producer is built, so a bad key is
//! reported before any input is read.

mod jwe;
mod jws;

pub use jwe::{decrypt_rsa_oaep_a256gcm, encrypt_rsa_oaep_a256gcm, RsaOaepA256GcmEncryptor};
pub use jws::{sign_es256, sign_hs256, sign_rs256, Es256Signer, Hs256Signer, Rs256Signer};

use crate::Result;

pub trait TokenProducer: Send + Sync {
    /// Algorithm label, used in log output.
    fn name(&self) -> &'static str;

    /// Produce one compact token from `payload`.
    fn produce(&self, payload: &[u8]) -> Result<String>;
}

/// Returns true if `token` has the shape of a compact JWE (5 dot-separated parts).
pub fn is_compact_jwe(token: &str) -> bool {
    token.split('.').count() == 5
}

/// Returns true if `token` has the shape of a compact JWS (3 dot-separated parts).
pub fn is_compact_jws(token: &str) -> bool {
    token.split('.').count() == 3
}
