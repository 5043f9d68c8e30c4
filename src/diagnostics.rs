//! The diagnostic sink: the one channel every phase reports through. There are
//! no exceptions anywhere in this crate's public surface — a lexical, syntactic,
//! or semantic problem is always a [`Diagnostic`] pushed to a [`DiagnosticSink`],
//! never a `Result::Err` or a panic.

use colored::Colorize as _;

use crate::position::Position;

/// How serious a diagnostic is. Unlike `anyhow`'s "everything is an error",
/// this mirrors the sink's own taxonomy so the driver can filter by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
	Error,
	Warning,
	Info,
}

impl Severity {
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Error => "error",
			Self::Warning => "warning",
			Self::Info => "info",
		}
	}
}

impl std::fmt::Display for Severity {
	fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(formatter, "{}", self.as_str())
	}
}

/// Which phase produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
	Lexer,
	Parser,
	Semantic,
}

impl Component {
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Lexer => "lexer",
			Self::Parser => "parser",
			Self::Semantic => "semantic",
		}
	}
}

impl std::fmt::Display for Component {
	fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(formatter, "{}", self.as_str())
	}
}

/// One reportable compiler message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	severity: Severity,
	component: Component,
	position: Position,
	message: String,
}

impl Diagnostic {
	#[must_use]
	pub const fn severity(&self) -> Severity {
		self.severity
	}

	#[must_use]
	pub const fn component(&self) -> Component {
		self.component
	}

	#[must_use]
	pub const fn position(&self) -> Position {
		self.position
	}

	#[must_use]
	pub fn message(&self) -> &str {
		&self.message
	}

	fn color(&self, text: &str) -> colored::ColoredString {
		match self.severity {
			Severity::Error => text.red().bold(),
			Severity::Warning => text.yellow().bold(),
			Severity::Info => text.blue().bold(),
		}
	}
}

/// Append-only accumulator of [`Diagnostic`]s. Single-threaded, owned by the
/// driver for the duration of one compilation; never deduplicates and never
/// escalates severities on its own.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
	diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn report(&mut self, severity: Severity, component: Component, position: Position, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic { severity, component, position, message: message.into() });
	}

	pub fn error(&mut self, component: Component, position: Position, message: impl Into<String>) {
		self.report(Severity::Error, component, position, message);
	}

	pub fn warning(&mut self, component: Component, position: Position, message: impl Into<String>) {
		self.report(Severity::Warning, component, position, message);
	}

	/// All diagnostics in insertion order.
	#[must_use]
	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}

	#[must_use]
	pub fn errors(&self) -> Vec<&Diagnostic> {
		self.diagnostics.iter().filter(|diagnostic| diagnostic.severity == Severity::Error).collect()
	}

	#[must_use]
	pub fn warnings(&self) -> Vec<&Diagnostic> {
		self.diagnostics.iter().filter(|diagnostic| diagnostic.severity == Severity::Warning).collect()
	}

	#[must_use]
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(|diagnostic| diagnostic.severity == Severity::Error)
	}

	/// `"[component] message at line:column"`, one per line, insertion order.
	#[must_use]
	pub fn format_for_display(&self) -> String {
		self.diagnostics
			.iter()
			.map(|diagnostic| format!("[{}] {} at {}", diagnostic.color(diagnostic.component.as_str()), diagnostic.message, diagnostic.position))
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// `file:line:column: severity: message`, insertion order.
	#[must_use]
	pub fn format_gcc_style(&self, file_name: &str) -> String {
		self.diagnostics
			.iter()
			.map(|diagnostic| format!("{file_name}:{}: {}: {}", diagnostic.position, diagnostic.color(diagnostic.severity.as_str()), diagnostic.message))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

#[cfg(test)]
mod tests {
	use super::{Component, DiagnosticSink, Severity};
	use crate::position::Position;

	#[test]
	fn has_errors_iff_an_error_was_reported() {
		let mut sink = DiagnosticSink::new();
		assert!(!sink.has_errors());
		sink.warning(Component::Lexer, Position::start(), "just a warning");
		assert!(!sink.has_errors());
		sink.error(Component::Semantic, Position::start(), "boom");
		assert!(sink.has_errors());
	}

	#[test]
	fn filters_preserve_insertion_order() {
		let mut sink = DiagnosticSink::new();
		sink.error(Component::Lexer, Position::new(1, 1, 0), "first");
		sink.warning(Component::Parser, Position::new(2, 1, 5), "second");
		sink.error(Component::Semantic, Position::new(3, 1, 10), "third");
		let errors = sink.errors();
		assert_eq!(errors.len(), 2);
		assert_eq!(errors[0].message(), "first");
		assert_eq!(errors[1].message(), "third");
	}

	#[test]
	fn display_format_includes_component_and_position() {
		let mut sink = DiagnosticSink::new();
		sink.error(Component::Semantic, Position::new(1, 10, 9), "Undefined variable 'x'");
		let rendered = sink.format_for_display();
		assert!(rendered.contains("Undefined variable 'x'"));
		assert!(rendered.contains("1:10"));
	}
}
