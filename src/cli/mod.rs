//! The thin command-line driver: wires the front/middle end to a filesystem
//! and stdout. Everything interesting (lexing, parsing, analysis) lives in
//! the library; this module's job is argument parsing, file discovery, an
//! optional `risc.toml`, and formatting diagnostics for a terminal.

use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use crate::{diagnostics::DiagnosticSink, lexer::SystemIncludeProvider};

/// `#include <name>` resolution backed by a `risc.toml`'s `[includes]`
/// table, each entry mapping a bare name to a file on disk.
pub struct FileSystemIncludeProvider {
	system_includes: HashMap<String, PathBuf>,
}

impl SystemIncludeProvider for FileSystemIncludeProvider {
	fn resolve(&self, name: &str) -> Option<Vec<u8>> {
		let path = self.system_includes.get(name)?;
		std::fs::read(path).ok()
	}
}

/// Project-local configuration, loaded from an optional `risc.toml` sitting
/// next to the source being checked. Absence is not an error: an empty
/// config (no extra system includes beyond the always-available `<std>`) is
/// used instead.
#[derive(Default)]
pub struct Config {
	pub system_includes: HashMap<String, PathBuf>,
}

impl Config {
	/// Reads `risc.toml` from `directory`, if present. A `[includes]` table
	/// maps bare `#include <name>` names to file paths, resolved relative to
	/// `directory` when not absolute.
	#[must_use]
	pub fn load(directory: &Path) -> Self {
		let Ok(text) = std::fs::read_to_string(directory.join("risc.toml")) else {
			return Self::default();
		};
		let Ok(document) = text.parse::<toml_edit::DocumentMut>() else {
			return Self::default();
		};
		let mut system_includes = HashMap::new();
		if let Some(includes) = document.get("includes").and_then(toml_edit::Item::as_table) {
			for (name, value) in includes.iter() {
				if let Some(path) = value.as_str() {
					let path = Path::new(path);
					let resolved = if path.is_absolute() { path.to_path_buf() } else { directory.join(path) };
					system_includes.insert(name.to_owned(), resolved);
				}
			}
		}
		Self { system_includes }
	}

	#[must_use]
	pub fn provider(&self) -> FileSystemIncludeProvider {
		FileSystemIncludeProvider { system_includes: self.system_includes.clone() }
	}
}

/// Every `.ris` file under `path`, or `path` itself if it's a single file.
#[must_use]
pub fn discover_sources(path: &Path) -> Vec<PathBuf> {
	if path.is_file() {
		return vec![path.to_path_buf()];
	}
	walkdir::WalkDir::new(path)
		.into_iter()
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_file() && entry.path().extension().is_some_and(|extension| extension == "ris"))
		.map(walkdir::DirEntry::into_path)
		.collect()
}

/// Runs the front/middle end on one file's bytes, reporting diagnostics and
/// returning whether compilation succeeded (no errors).
#[must_use]
pub fn check_file(path: &Path) -> (bool, DiagnosticSink) {
	let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
	let config = Config::load(base_dir);
	let provider = config.provider();
	let mut sink = DiagnosticSink::new();
	let source = match std::fs::read(path) {
		Ok(bytes) => bytes,
		Err(error) => {
			sink.error(crate::diagnostics::Component::Lexer, crate::position::Position::start(), format!("cannot read '{}': {error}", path.display()));
			return (false, sink);
		},
	};
	let result = crate::compile_front_end(&source, base_dir, &provider, &mut sink);
	(result.is_some(), sink)
}

#[enum_dispatch::enum_dispatch]
pub trait RisCommand {
	fn execute(self) -> anyhow::Result<()>;
}

#[derive(clap::Args)]
pub struct CheckCommand {
	/// A `.ris` source file, or a directory to check every `.ris` file within.
	pub path: PathBuf,
	/// Print diagnostics as `file:line:column: severity: message` instead of `[component] message at line:column`.
	#[arg(long)]
	pub gcc_format: bool,
}

impl RisCommand for CheckCommand {
	fn execute(self) -> anyhow::Result<()> {
		let mut any_errors = false;
		for path in discover_sources(&self.path) {
			let (succeeded, sink) = check_file(&path);
			any_errors |= !succeeded;
			let rendered = if self.gcc_format { sink.format_gcc_style(&path.display().to_string()) } else { sink.format_for_display() };
			if !rendered.is_empty() {
				println!("{rendered}");
			}
		}
		if any_errors {
			anyhow::bail!("compilation failed");
		}
		Ok(())
	}
}

#[derive(clap::Args)]
pub struct DumpCommand {
	/// A `.ris` source file to parse and analyze, printing the resolved AST.
	pub path: PathBuf,
}

impl RisCommand for DumpCommand {
	fn execute(self) -> anyhow::Result<()> {
		let base_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
		let config = Config::load(base_dir);
		let provider = config.provider();
		let mut sink = DiagnosticSink::new();
		let source = std::fs::read(&self.path)?;
		match crate::compile_front_end(&source, base_dir, &provider, &mut sink) {
			Some((program, _symbols)) => println!("{program:#?}"),
			None => println!("{}", sink.format_for_display()),
		}
		Ok(())
	}
}

#[derive(clap::Subcommand)]
#[enum_dispatch::enum_dispatch(RisCommand)]
pub enum Command {
	/// Lex, parse, and semantically analyze one file or a directory of files, reporting diagnostics.
	Check(CheckCommand),
	/// Parse and analyze one file, printing its resolved AST for inspection.
	Dump(DumpCommand),
}

#[cfg(test)]
mod tests {
	use std::io::Write as _;

	use super::{check_file, discover_sources, Config};

	#[test]
	fn check_file_reports_no_errors_for_a_well_formed_program() {
		let file = tempfile_with_contents(b"int main() { return 0; }");
		let (succeeded, sink) = check_file(file.path());
		assert!(succeeded, "{}", sink.format_for_display());
	}

	#[test]
	fn check_file_reports_errors_for_a_malformed_program() {
		let file = tempfile_with_contents(b"int main() { return x; }");
		let (succeeded, _sink) = check_file(file.path());
		assert!(!succeeded);
	}

	#[test]
	fn discover_sources_finds_a_single_file_directly() {
		let file = tempfile_with_contents(b"int main() { return 0; }");
		let sources = discover_sources(file.path());
		assert_eq!(sources.len(), 1);
	}

	#[test]
	fn missing_config_yields_an_empty_config() {
		let directory = std::env::temp_dir();
		let config = Config::load(&directory.join("this-directory-should-not-have-a-risc-toml-in-it"));
		assert!(config.system_includes.is_empty());
	}

	fn tempfile_with_contents(contents: &[u8]) -> tempfile::NamedTempFile {
		let mut file = tempfile::Builder::new().suffix(".ris").tempfile().expect("create temp file");
		file.write_all(contents).expect("write temp file contents");
		file
	}
}
