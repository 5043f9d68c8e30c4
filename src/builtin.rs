//! The runtime-provided function catalogue. The backend links these against
//! its own runtime library; this crate only needs their signatures so that
//! calls to them type-check like any user-defined function.

use crate::{position::Position, symbol_table::FunctionSymbol, types::Type};

/// `print` and `println` are the one arity-and-type-polymorphic pair in the
/// language: any positive number of primitive-or-list-typed arguments (plus
/// zero arguments for `println`). They are pre-seeded here with an empty
/// parameter list as a placeholder signature — the semantic analyzer
/// special-cases these two names at the call site instead of checking
/// arguments against `parameter_types`.
pub const VARIADIC_PRINT_NAMES: [&str; 2] = ["print", "println"];

fn typed_helper(name: &str, parameter: Type) -> FunctionSymbol {
	FunctionSymbol { name: name.to_owned(), return_type: Type::void(), parameter_types: vec![parameter], position: Position::start() }
}

/// The fixed catalogue pre-seeded into the symbol table's root scope. Mirrors
/// what `#include <std>` declares in the source language, but built directly
/// rather than lexed from bundled source text (see `Lexer::push_system_include`).
#[must_use]
pub fn catalog() -> Vec<FunctionSymbol> {
	let mut functions = vec![
		FunctionSymbol { name: "print".to_owned(), return_type: Type::void(), parameter_types: vec![], position: Position::start() },
		FunctionSymbol { name: "println".to_owned(), return_type: Type::void(), parameter_types: vec![], position: Position::start() },
		FunctionSymbol { name: "ris_println".to_owned(), return_type: Type::void(), parameter_types: vec![], position: Position::start() },
		FunctionSymbol {
			name: "ris_malloc".to_owned(),
			return_type: Type::string(),
			parameter_types: vec![Type::int()],
			position: Position::start(),
		},
		typed_helper("ris_free", Type::string()),
		FunctionSymbol {
			name: "ris_string_concat".to_owned(),
			return_type: Type::string(),
			parameter_types: vec![Type::string(), Type::string()],
			position: Position::start(),
		},
		FunctionSymbol {
			name: "ris_string_length".to_owned(),
			return_type: Type::int(),
			parameter_types: vec![Type::string()],
			position: Position::start(),
		},
		typed_helper("ris_exit", Type::int()),
	];

	for (suffix, parameter_type) in [
		("int", Type::int()),
		("float", Type::float()),
		("bool", Type::bool()),
		("char", Type::char()),
		("string", Type::string()),
	] {
		functions.push(typed_helper(&format!("ris_print_{suffix}"), parameter_type.clone()));
		functions.push(typed_helper(&format!("ris_println_{suffix}"), parameter_type));
	}

	functions
}

#[cfg(test)]
mod tests {
	use super::catalog;

	#[test]
	fn catalog_contains_every_documented_name() {
		let names: Vec<&str> = catalog().iter().map(|function| function.name.as_str()).collect();
		for expected in [
			"print",
			"println",
			"ris_println",
			"ris_malloc",
			"ris_free",
			"ris_string_concat",
			"ris_string_length",
			"ris_exit",
			"ris_print_int",
			"ris_println_string",
		] {
			assert!(names.contains(&expected), "missing builtin '{expected}'");
		}
	}
}
