use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use libsigners::Hs256Signer;
use tokio::io::{AsyncRead, AsyncWrite};

mod cli_core;
mod signer_core;

/// Sign each non-empty input line as an HS256 JWT.
#[derive(Debug, Parser)]
#[command(name = "jwt-sign-hs256", version)]
#[command(group(ArgGroup::new("secret").required(true).multiple(true).args(["key", "key_file"])))]
struct Cli {
    /// HS256 secret value
    #[arg(
        long,
        env = "SECRET",
        hide_env_values = true,
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    key: Option<String>,

    /// Path to HS256 secret (text); takes precedence over --key
    #[arg(long, env = "SECRET_FILE")]
    key_file: Option<PathBuf>,
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
    let secret = match (cli.key_file, cli.key) {
        (Some(path), _) => signer_core::read_key_file(&path).await?,
        (None, Some(key)) => key.into_bytes(),
        (None, None) => bail!("either --key or --key-file must be set"),
    };

    let signer = Hs256Signer::new(&secret).context("sign")?;
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
