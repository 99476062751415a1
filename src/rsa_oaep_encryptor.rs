use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libsigners::RsaOaepA256GcmEncryptor;
use tokio::io::{AsyncRead, AsyncWrite};

mod cli_core;
mod signer_core;

/// Encrypt each non-empty input line into a compact JWE (RSA-OAEP, A256GCM).
#[derive(Debug, Parser)]
#[command(name = "jwe-encrypt-rsa-oaep-a256gcm", version)]
struct Cli {
    /// Path to RSA public key (PEM, SPKI or PKCS#1)
    #[arg(long, env = "RSA_PUBLIC_KEY_FILE")]
    pub_key_file: PathBuf,
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
    cli_core::report(stderr, encrypt(cli, stdin, stdout).await)
}

async fn encrypt<R, W>(cli: Cli, stdin: R, stdout: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let key = signer_core::read_key_file(&cli.pub_key_file).await?;
    let encryptor = RsaOaepA256GcmEncryptor::from_pem(&key).context("encrypt")?;
    signer_core::stream(stdin, stdout, &encryptor).await.context("encrypt")?;
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
