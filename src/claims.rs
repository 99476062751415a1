//! Random claim sets for exercising the signers.
//!
//! Generation is deterministic for a non-zero seed: the same [`Config`]
//! always yields the same claims.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A basic claim set.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub rnd: String,
}

/// How `iat` is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IatPolicy {
    /// Fixed value, in seconds since the epoch.
    Fixed(i64),
    /// Current time when generation runs.
    Now,
}

impl Default for IatPolicy {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of claim sets to generate.
    pub count: i64,
    /// Length of the random `sub`.
    pub sub_len: i64,
    /// Length of the random `rnd`.
    pub rnd_len: i64,
    pub iat: IatPolicy,
    /// PRNG seed; 0 derives one from the current time.
    pub seed: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 1,
            sub_len: 16,
            rnd_len: 16,
            iat: IatPolicy::default(),
            seed: 0,
        }
    }
}

/// Generate claims according to `config`.
///
/// # Errors
///
/// [`Error::InvalidCount`] when `count <= 0`, [`Error::InvalidLength`] when
/// either random length is `<= 0`.
pub fn generate_claims(config: &Config) -> Result<Vec<Claims>> {
    let now = Utc::now();
    let seed = match config.seed {
        0 => now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()),
        seed => seed,
    };
    let mut rng = StdRng::seed_from_u64(seed as u64);
    generate_claims_with(config, &mut rng, now.timestamp())
}

/// Generate claims with an explicit random source and clock value.
///
/// `now` (seconds since the epoch) is only used for [`IatPolicy::Now`]. The
/// seed in `config` is ignored.
pub fn generate_claims_with<R: Rng + ?Sized>(config: &Config, rng: &mut R, now: i64) -> Result<Vec<Claims>> {
    if config.count <= 0 {
        return Err(Error::InvalidCount);
    }
    if config.sub_len <= 0 || config.rnd_len <= 0 {
        return Err(Error::InvalidLength);
    }

    let iat = match config.iat {
        IatPolicy::Fixed(iat) => iat,
        IatPolicy::Now => now,
    };

    let claims = (0..config.count)
        .map(|_| Claims {
            sub: random_string(rng, config.sub_len as usize),
            iat,
            rnd: random_string(rng, config.rnd_len as usize),
        })
        .collect();
    Ok(claims)
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Encode claims as JSON Lines: one object per line, each ending in `\n`.
pub fn encode_json_lines(claims: &[Claims]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for c in claims {
        serde_json::to_writer(&mut out, c)?;
        out.push(b'\n');
    }
    Ok(out)
}
