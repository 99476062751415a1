use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libsigners::{encode_json_lines, generate_claims, Config, IatPolicy};
use tokio::io::{AsyncWrite, AsyncWriteExt};

mod cli_core;

/// Generate random claim sets as JSON Lines.
#[derive(Debug, Parser)]
#[command(name = "jwt-claims", version)]
struct Cli {
    /// Number of claims to generate
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    count: i64,

    /// Length of random 'sub'
    #[arg(long, default_value_t = 16, allow_negative_numbers = true)]
    sub_len: i64,

    /// Length of random 'rnd'
    #[arg(long, default_value_t = 16, allow_negative_numbers = true)]
    rnd_len: i64,

    /// Fixed iat value (epoch seconds)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    iat: i64,

    /// Use current time for iat
    #[arg(long)]
    iat_now: bool,

    /// Random seed (0 => time-based)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    seed: i64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            count: cli.count,
            sub_len: cli.sub_len,
            rnd_len: cli.rnd_len,
            iat: if cli.iat_now { IatPolicy::Now } else { IatPolicy::Fixed(cli.iat) },
            seed: cli.seed,
        }
    }
}

async fn run<I, T, W>(args: I, stdout: W, stderr: &mut impl Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: AsyncWrite + Unpin,
{
    let cli: Cli = match cli_core::parse_args(args, stderr) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    cli_core::report(stderr, generate(cli.into(), stdout).await)
}

async fn generate<W: AsyncWrite + Unpin>(config: Config, mut stdout: W) -> Result<()> {
    let claims = generate_claims(&config).context("generate claims")?;
    let data = encode_json_lines(&claims).context("encode")?;

    stdout.write_all(&data).await.context("write")?;
    stdout.flush().await.context("write")?;

    tracing::info!(count = claims.len(), seed = config.seed, "generated claims");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = cli_core::init_tracing() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    let code = run(std::env::args_os(), tokio::io::stdout(), &mut std::io::stderr()).await;
    ExitCode::from(code)
}

#[cfg(test)]
mod tests {
    use libsigners::Claims;

    use super::*;

    async fn invoke(args: &[&str]) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let argv = std::iter::once("jwt-claims").chain(args.iter().copied());
        let code = run(argv, &mut out, &mut err).await;
        (code, String::from_utf8(out).expect("utf-8"), String::from_utf8(err).expect("utf-8"))
    }

    #[tokio::test]
    async fn generates_lines() {
        let (code, out, err) = invoke(&["--count=2", "--sub-len=4", "--rnd-len=4", "--iat=1"]).await;
        assert_eq!(code, 0, "stderr: {err}");

        let claims: Vec<Claims> =
            out.lines().map(|l| serde_json::from_str(l).expect("should parse")).collect();
        assert_eq!(claims.len(), 2);
        assert!(claims.iter().all(|c| c.iat == 1 && c.sub.len() == 4 && c.rnd.len() == 4));
    }

    #[tokio::test]
    async fn seeded_output_is_stable() {
        let (_, a, _) = invoke(&["--count", "3", "--seed", "42"]).await;
        let (_, b, _) = invoke(&["--count", "3", "--seed", "42"]).await;
        assert_eq!(a, b);
        assert_eq!(a.lines().count(), 3);
    }

    #[tokio::test]
    async fn invalid_count() {
        let (code, out, err) = invoke(&["--count", "0"]).await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("generate claims"), "stderr: {err}");

        let (code, _, err) = invoke(&["--count", "-3"]).await;
        assert_eq!(code, 1);
        assert!(err.contains("count must be > 0"), "stderr: {err}");
    }

    #[tokio::test]
    async fn invalid_length() {
        let (code, _, err) = invoke(&["--rnd-len=0"]).await;
        assert_eq!(code, 1);
        assert!(err.contains("random length must be > 0"), "stderr: {err}");
    }

    #[tokio::test]
    async fn unknown_flag_is_usage_error() {
        let (code, _, err) = invoke(&["--bogus"]).await;
        assert_eq!(code, 2);
        assert!(!err.is_empty());
    }

    #[test]
    fn iat_now_overrides_fixed() {
        let cli = Cli::try_parse_from(["jwt-claims", "--iat", "5", "--iat-now"]).expect("should parse");
        assert_eq!(Config::from(cli).iat, IatPolicy::Now);
    }
}
