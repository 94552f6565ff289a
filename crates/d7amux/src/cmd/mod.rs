use std::path::PathBuf;

use clap::{Args, Subcommand};
use d7amux_engine::NlsMethod;
use d7amux_session::DEFAULT_MAX_PAYLOAD;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod address;
pub mod budget;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the application payload budget per security method.
    Budget(BudgetArgs),
    /// Resolve the device address from stored configuration.
    Address(AddressArgs),
    /// Run a send through a session stack over the simulated engine.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Budget(args) => budget::run(args, format),
        Command::Address(args) => address::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Parse a security method by name, e.g. `aes-ccm-128`.
pub fn parse_method(input: &str) -> Result<NlsMethod, String> {
    let wanted = input.trim().to_ascii_lowercase();
    NlsMethod::ALL
        .into_iter()
        .find(|method| method.name() == wanted)
        .ok_or_else(|| {
            let names: Vec<&str> = NlsMethod::ALL.iter().map(|m| m.name()).collect();
            format!("unknown security method '{input}' (expected one of: {})", names.join(", "))
        })
}

#[derive(Args, Debug)]
pub struct BudgetArgs {
    /// Protocol maximum payload in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
    /// Only show this security method.
    #[arg(long, value_parser = parse_method)]
    pub method: Option<NlsMethod>,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Device record file. Created with defaults when missing.
    #[arg(long, value_name = "FILE", env = "D7AMUX_STORE")]
    pub store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Payload string.
    #[arg(long)]
    pub data: String,
    /// Security method of the session.
    #[arg(long, value_parser = parse_method, default_value = "none")]
    pub method: NlsMethod,
    /// Expected response length in bytes.
    #[arg(long, default_value_t = 0)]
    pub expected: u8,
    /// Simulated response payload.
    #[arg(long, conflicts_with = "fail")]
    pub respond: Option<String>,
    /// Make the simulated transmission fail without acknowledgement.
    #[arg(long)]
    pub fail: bool,
    /// Return on acceptance and dispatch completions afterwards.
    #[arg(long = "async")]
    pub async_mode: bool,
    /// Transmit power index (1-16) applied before sending.
    #[arg(long)]
    pub tx_power: Option<u8>,
    /// Device record file. Created with defaults when missing.
    #[arg(long, value_name = "FILE", env = "D7AMUX_STORE")]
    pub store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
