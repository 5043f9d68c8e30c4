//! # risc
//!
//! The reference driver for the `ris` compiler's front and middle end: lexes,
//! parses, and semantically analyzes `.ris` source, reporting diagnostics.
//! Codegen is out of scope here — `check` validates a program; `dump` prints
//! its resolved AST for inspection.

use clap::Parser as _;
use ris_compiler::cli::{Command, RisCommand as _};

/// The command-line arguments for `risc`.
#[derive(clap::Parser)]
struct Arguments {
	/// The subcommand to run, such as `check` or `dump`.
	#[command(subcommand)]
	command: Command,
}

fn main() -> anyhow::Result<()> {
	Arguments::parse().command.execute()
}
