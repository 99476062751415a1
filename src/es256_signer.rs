use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libsigners::Es256Signer;
use tokio::io::{AsyncRead, AsyncWrite};

mod cli_core;
mod signer_core;

/// Sign each non-empty input line as an ES256 JWT.
#[derive(Debug, Parser)]
#[command(name = "jwt-sign-es256", version)]
struct Cli {
    /// Path to EC private key (PEM, P-256, SEC1 or PKCS#8)
    #[arg(long, env = "EC_PRIVATE_KEY_FILE")]
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
    let signer = Es256Signer::from_pem(&key).context("sign")?;
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
