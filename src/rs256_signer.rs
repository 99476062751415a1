use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libsigners::Rs256Signer;
use tokio::io::{AsyncRead, AsyncWrite};

mod cli_core;
mod signer_core;

/// Sign each non-empty input line as an RS256 JWT.
#[derive(Debug, Parser)]
#[command(name = "jwt-sign-rs256", version)]
struct Cli {
    /// Path to RSA private key (PEM, PKCS#1 or PKCS#8)
    #[arg(long, env = "RSA_PRIVATE_KEY_FILE")]
    key_file: PathBuf,
}

async fn run<I, T, R, W>(args: I, stdin: R, stdout: W, stderr: &mut impl Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let cli: Cli = match cli_core::parse_args(args, stderr) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli_core::report(stderr, sign(cli, stdin, stdout).await)
}

async fn sign<R, W>(cli: Cli, stdin: R, stdout: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let key = signer_core::read_key_file(&cli.key_file).await?;
    let signer = Rs256Signer::from_pem(&key).context("sign")?;
    signer_core::stream(stdin, stdout, &signer).await.context("sign")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = cli_core::init_tracing() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    let code = run(std::env::args_os(), tokio::io::stdin(), tokio::io::stdout(), &mut std::io::stderr()).await;
    ExitCode::from(code)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use jsonwebtoken::{crypto, Algorithm, DecodingKey};
    use rand::rngs::OsRng;
    use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
    use rsa::pkcs8::EncodePublicKey;
    use rsa::{RsaPrivateKey, RsaPublicKey};

    use super::*;

    async fn invoke(args: &[&str], input: &str) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let argv = std::iter::once("jwt-sign-rs256").chain(args.iter().copied());
        let code = run(argv, input.as_bytes(), &mut out, &mut err).await;
        (code, String::from_utf8(out).expect("utf-8"), String::from_utf8(err).expect("utf-8"))
    }

    /// Writes a fresh PKCS#1 private key to `dir`, returning its path and the
    /// public half as SPKI PEM.
    fn write_rsa_private_key(dir: &Path) -> (PathBuf, String) {
        let key = RsaPrivateKey::new(&mut OsRng, 2048).expect("should generate RSA key");
        let path = dir.join("rs256.key");
        let pem = key.to_pkcs1_pem(LineEnding::LF).expect("should encode");
        std::fs::write(&path, pem.as_bytes()).expect("write key");
        let public = RsaPublicKey::from(&key).to_public_key_pem(LineEnding::LF).expect("should encode");
        (path, public)
    }

    #[tokio::test]
    async fn signs_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (path, public) = write_rsa_private_key(dir.path());

        let (code, out, err) =
            invoke(&["--key-file", path.to_str().expect("path")], "{\"x\":1}\n\n{\"y\":2}\n").await;
        assert_eq!(code, 0, "stderr: {err}");

        let decoding = DecodingKey::from_rsa_pem(public.as_bytes()).expect("public key");
        let tokens: Vec<&str> = out.lines().collect();
        assert_eq!(tokens.len(), 2);
        for token in tokens {
            let (message, signature) = token.rsplit_once('.').expect("signature");
            assert!(crypto::verify(signature, message.as_bytes(), &decoding, Algorithm::RS256)
                .expect("should verify"));
        }
    }

    #[tokio::test]
    async fn missing_key_file_is_usage_error() {
        if std::env::var_os("RSA_PRIVATE_KEY_FILE").is_some() {
            return;
        }
        let (code, _, err) = invoke(&[], "").await;
        assert_eq!(code, 2);
        assert!(err.contains("--key-file"), "stderr: {err}");
    }

    #[tokio::test]
    async fn public_key_is_rejected_before_reading_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (_, public) = write_rsa_private_key(dir.path());
        let path = dir.path().join("rs256.pub");
        std::fs::write(&path, public).expect("write key");

        let (code, out, err) = invoke(&["--key-file", path.to_str().expect("path")], "\n\n").await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("sign: key error"), "stderr: {err}");
    }

    #[tokio::test]
    async fn bad_key_is_runtime_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.key");
        std::fs::write(&path, "not a key").expect("write key");

        let (code, out, err) = invoke(&["--key-file", path.to_str().expect("path")], "{}\n").await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.starts_with("sign:"), "stderr: {err}");
    }
}
