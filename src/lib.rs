//! Line-oriented JOSE token producers.
//!
//! Each producer turns one payload into one compact token: a signed JWT
//! (HS256, RS256, ES256) or an encrypted JWE (RSA-OAEP with A256GCM). The
//! [`lines`] driver feeds a newline-delimited stream through a producer, and
//! [`claims`] generates random claim sets to feed the signers with.

pub mod claims;
pub mod error;
pub mod lines;
pub mod producer;

pub use claims::{
    encode_json_lines, generate_claims, generate_claims_with, Claims, Config, IatPolicy,
};
pub use error::{Error, Result};
pub use lines::{produce_lines, LineStats};
pub use producer::{
    decrypt_rsa_oaep_a256gcm, encrypt_rsa_oaep_a256gcm, is_compact_jwe, is_compact_jws,
    sign_es256, sign_hs256, sign_rs256, Es256Signer, Hs256Signer, Rs256Signer,
    RsaOaepA256GcmEncryptor, TokenProducer,
};
