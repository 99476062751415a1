//! Flag parsing, logging and exit status handling shared by every binary.

use std::ffi::OsString;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Logs go to stderr so stdout carries nothing but tokens. `RUST_LOG`
/// overrides the default `warn` level.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("init tracing subscriber")
}

/// Parse command-line flags.
///
/// On `--help` or `--version` the text is printed and `Err(0)` returned; on
/// invalid usage the message is written to `stderr` and `Err(2)` returned.
pub fn parse_args<C, I, T>(args: I, stderr: &mut impl Write) -> std::result::Result<C, u8>
where
    C: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    C::try_parse_from(args).map_err(|err| {
        if err.use_stderr() {
            let _ = write!(stderr, "{}", err.render());
        } else {
            let _ = err.print();
        }
        u8::try_from(err.exit_code()).unwrap_or(EXIT_FAILURE)
    })
}

/// Map the outcome of a command to its exit status, reporting any error.
pub fn report(stderr: &mut impl Write, result: Result<()>) -> u8 {
    match result {
        Ok(()) => EXIT_OK,
        Err(err) => {
            let _ = writeln!(stderr, "{err:#}");
            EXIT_FAILURE
        }
    }
}
