//! The semantic analyzer: walks a `Program`, builds the symbol table, and
//! checks every construct's scoping, typing, and control-flow context. Every
//! failed check reports a diagnostic and keeps going — this phase never stops
//! at the first error.

use crate::{
	ast::{
		expressions::{BinaryOperator, Expression, ListMethod, LiteralValue, UnaryOperator},
		statements::{ForInit, Statement},
		FunctionDeclaration, Node as _, Program,
	},
	builtin,
	diagnostics::{Component, DiagnosticSink},
	position::Position,
	symbol_table::{FunctionSymbol, Symbol, SymbolTable, VariableSymbol},
	types::Type,
};

/// Runs the full two-stage analysis described in the component design and
/// returns the populated symbol table. Errors are reported to `sink`, not
/// returned; callers check `sink.has_errors()` to decide whether to proceed.
#[must_use]
pub fn analyze(program: &Program, sink: &mut DiagnosticSink) -> SymbolTable {
	let symbols = SymbolTable::new(builtin::catalog());
	let mut analyzer = Analyzer { symbols, sink, current_return_type: None, loop_or_switch_depth: 0 };

	for global in &program.globals {
		analyzer.analyze_variable_declaration(global);
	}

	for function in &program.functions {
		analyzer.declare_function_signature(function);
	}
	for function in &program.functions {
		analyzer.analyze_function_body(function);
	}

	analyzer.symbols
}

struct Analyzer<'s> {
	symbols: SymbolTable,
	sink: &'s mut DiagnosticSink,
	/// `None` outside any function body (unreachable in practice — every
	/// statement analyzed here is inside a function — but kept `Option` so a
	/// missing context fails loudly rather than silently defaulting).
	current_return_type: Option<Type>,
	/// Counts nested `while`/`for`/`switch` bodies so `break`/`continue` can be
	/// rejected outside of one, per §4.5.
	loop_or_switch_depth: u32,
}

impl Analyzer<'_> {
	fn error(&mut self, position: Position, message: impl Into<String>) {
		self.sink.error(Component::Semantic, position, message);
	}

	fn declare_function_signature(&mut self, function: &FunctionDeclaration) {
		let parameter_types = function.parameters.iter().map(|parameter| parameter.declared_type.clone()).collect();
		let symbol = Symbol::Function(FunctionSymbol {
			name: function.name.clone(),
			return_type: function.return_type.clone(),
			parameter_types,
			position: function.position,
		});
		if let Err(symbol) = self.symbols.insert(symbol) {
			self.error(function.position, format!("'{}' is already declared", symbol.name()));
		}
	}

	fn analyze_function_body(&mut self, function: &FunctionDeclaration) {
		self.symbols.enter_scope();
		for parameter in &function.parameters {
			let symbol = Symbol::Variable(VariableSymbol {
				name: parameter.name.clone(),
				variable_type: parameter.declared_type.clone(),
				position: function.position,
			});
			if let Err(symbol) = self.symbols.insert(symbol) {
				self.error(function.position, format!("'{}' is already declared", symbol.name()));
			}
		}
		self.current_return_type = Some(function.return_type.clone());
		for statement in &function.body.statements {
			self.analyze_statement(statement);
		}
		self.current_return_type = None;
		self.symbols.exit_scope();
	}

	fn analyze_variable_declaration(&mut self, declaration: &crate::ast::statements::VariableDeclaration) {
		let declared_type = declaration.declared_type.clone();
		if let Some(initializer) = &declaration.initializer {
			let initializer_type = self.analyze_expression_expecting(initializer, &declared_type);
			if !declared_type.is_assignable_from(&initializer_type) {
				self.error(
					declaration.position,
					format!("Type mismatch: expected {declared_type}, got {initializer_type}"),
				);
			}
		}
		let symbol = Symbol::Variable(VariableSymbol { name: declaration.name.clone(), variable_type: declared_type, position: declaration.position });
		if let Err(symbol) = self.symbols.insert(symbol) {
			self.error(declaration.position, format!("'{}' is already declared", symbol.name()));
		}
	}

	fn analyze_statement(&mut self, statement: &Statement) {
		match statement {
			Statement::Block(block) => {
				self.symbols.enter_scope();
				for inner in &block.statements {
					self.analyze_statement(inner);
				}
				self.symbols.exit_scope();
			},
			Statement::VariableDeclaration(declaration) => self.analyze_variable_declaration(declaration),
			Statement::ExpressionStatement(statement) => {
				self.analyze_expression(&statement.expression);
			},
			Statement::If(statement) => {
				self.require_boolean(&statement.condition);
				self.analyze_statement(&statement.then_branch);
				if let Some(else_branch) = &statement.else_branch {
					self.analyze_statement(else_branch);
				}
			},
			Statement::While(statement) => {
				self.require_boolean(&statement.condition);
				self.loop_or_switch_depth += 1;
				self.analyze_statement(&statement.body);
				self.loop_or_switch_depth -= 1;
			},
			Statement::For(statement) => {
				self.symbols.enter_scope();
				if let Some(init) = &statement.init {
					match init.as_ref() {
						ForInit::VariableDeclaration(declaration) => self.analyze_variable_declaration(declaration),
						ForInit::Expression(expression) => {
							self.analyze_expression(expression);
						},
					}
				}
				if let Some(condition) = &statement.condition {
					self.require_boolean(condition);
				}
				if let Some(update) = &statement.update {
					self.analyze_expression(update);
				}
				self.loop_or_switch_depth += 1;
				self.analyze_statement(&statement.body);
				self.loop_or_switch_depth -= 1;
				self.symbols.exit_scope();
			},
			Statement::Switch(statement) => {
				let scrutinee_type = self.analyze_expression(&statement.scrutinee);
				if !scrutinee_type.is_int_or_char() && !scrutinee_type.is_boolean() {
					self.error(
						statement.position,
						format!("switch scrutinee must be arithmetic or boolean, got {scrutinee_type}"),
					);
				}
				self.loop_or_switch_depth += 1;
				for case in &statement.cases {
					if let Some(value) = &case.value {
						let value_type = self.analyze_expression_expecting(value, &scrutinee_type);
						if !scrutinee_type.is_assignable_from(&value_type) {
							self.error(case.position, format!("Type mismatch: expected {scrutinee_type}, got {value_type}"));
						}
					}
					for inner in &case.statements {
						self.analyze_statement(inner);
					}
				}
				self.loop_or_switch_depth -= 1;
			},
			Statement::Break(statement) => {
				if self.loop_or_switch_depth == 0 {
					self.error(statement.position, "'break' is only legal inside a loop or switch");
				}
			},
			Statement::Continue(statement) => {
				if self.loop_or_switch_depth == 0 {
					self.error(statement.position, "'continue' is only legal inside a loop or switch");
				}
			},
			Statement::Return(statement) => self.analyze_return(statement),
		}
	}

	fn analyze_return(&mut self, statement: &crate::ast::statements::Return) {
		let Some(return_type) = self.current_return_type.clone() else {
			self.error(statement.position, "'return' outside of a function body");
			return;
		};
		match &statement.value {
			Some(value) => {
				let value_type = self.analyze_expression_expecting(value, &return_type);
				if !return_type.is_assignable_from(&value_type) {
					self.error(statement.position, format!("Type mismatch: expected {return_type}, got {value_type}"));
				}
			},
			None => {
				if !return_type.is_void() {
					self.error(statement.position, format!("missing return value in a function returning {return_type}"));
				}
			},
		}
	}

	fn require_boolean(&mut self, condition: &Expression) {
		let condition_type = self.analyze_expression(condition);
		if !condition_type.is_boolean() {
			self.error(condition.position(), format!("condition must be boolean, got {condition_type}"));
		}
	}

	/// Analyzes an expression with no expected-type context. Used wherever
	/// there is no assignability target (operands, conditions, receivers).
	fn analyze_expression(&mut self, expression: &Expression) -> Type {
		self.analyze_expression_inner(expression, None)
	}

	/// Analyzes an expression where `expected` is the type it will be
	/// assigned/passed/returned into. The only place this matters is an empty
	/// `ListLiteral`, whose element type cannot be inferred from its own
	/// contents (§4.5's contextual-typing rule).
	fn analyze_expression_expecting(&mut self, expression: &Expression, expected: &Type) -> Type {
		self.analyze_expression_inner(expression, Some(expected))
	}

	fn analyze_expression_inner(&mut self, expression: &Expression, expected: Option<&Type>) -> Type {
		match expression {
			Expression::Literal(literal) => match literal.value {
				LiteralValue::Integer(_) => Type::int(),
				LiteralValue::Float(_) => Type::float(),
				LiteralValue::Char(_) => Type::char(),
				LiteralValue::String(_) => Type::string(),
				LiteralValue::Bool(_) => Type::bool(),
			},
			Expression::Identifier(identifier) => match self.symbols.lookup(&identifier.name) {
				Some(Symbol::Variable(variable)) => variable.variable_type.clone(),
				Some(Symbol::Function(_)) => {
					self.error(identifier.position, format!("'{}' is a function, not a variable", identifier.name));
					Type::void()
				},
				None => {
					self.report_undefined(identifier.position, "variable", &identifier.name);
					Type::void()
				},
			},
			Expression::Binary(binary) => self.analyze_binary(binary),
			Expression::Unary(unary) => self.analyze_unary(unary),
			Expression::Assignment(assignment) => self.analyze_assignment(assignment),
			Expression::Increment(increment) => self.analyze_increment(increment),
			Expression::Call(call) => self.analyze_call(call),
			Expression::Index(index) => self.analyze_index(index),
			Expression::MethodCall(method_call) => self.analyze_method_call(method_call),
			Expression::ListLiteral(list_literal) => self.analyze_list_literal(list_literal, expected),
			Expression::FieldAccess(field_access) => {
				self.error(field_access.position, "field access is not supported");
				Type::void()
			},
		}
	}

	fn report_undefined(&mut self, position: Position, kind: &str, name: &str) {
		let suggestion = self.symbols.closest_name(name);
		let mut message = format!("Undefined {kind} '{name}'");
		if let Some(suggestion) = suggestion {
			message.push_str(&format!(". Did you mean '{suggestion}'?"));
		}
		self.error(position, message);
	}

	fn analyze_binary(&mut self, binary: &crate::ast::expressions::Binary) -> Type {
		let left_type = self.analyze_expression(&binary.left);
		let right_type = self.analyze_expression(&binary.right);
		let position = binary.position;
		match binary.operator {
			BinaryOperator::Add if left_type.is_string() && right_type.is_string() => Type::string(),
			BinaryOperator::Add | BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
				if !left_type.is_arithmetic() || !right_type.is_arithmetic() {
					self.error(position, format!("Type mismatch: expected arithmetic operands, got {left_type} and {right_type}"));
				}
				left_type.arithmetic_result(&right_type)
			},
			BinaryOperator::Less | BinaryOperator::Greater | BinaryOperator::LessEqual | BinaryOperator::GreaterEqual => {
				let both_arithmetic = left_type.is_arithmetic() && right_type.is_arithmetic();
				let both_string = left_type.is_string() && right_type.is_string();
				if !both_arithmetic && !both_string {
					self.error(position, format!("Type mismatch: cannot compare {left_type} with {right_type}"));
				}
				Type::bool()
			},
			BinaryOperator::Equal | BinaryOperator::NotEqual => {
				if !left_type.is_comparable_with(&right_type) {
					self.error(position, format!("Type mismatch: cannot compare {left_type} with {right_type}"));
				}
				Type::bool()
			},
			BinaryOperator::And | BinaryOperator::Or => {
				if !left_type.is_boolean() || !right_type.is_boolean() {
					self.error(position, format!("Type mismatch: expected bool, got {left_type} and {right_type}"));
				}
				Type::bool()
			},
		}
	}

	fn analyze_unary(&mut self, unary: &crate::ast::expressions::Unary) -> Type {
		let operand_type = self.analyze_expression(&unary.operand);
		match unary.operator {
			UnaryOperator::Not => {
				if !operand_type.is_boolean() {
					self.error(unary.position, format!("Type mismatch: expected bool, got {operand_type}"));
				}
				Type::bool()
			},
			UnaryOperator::Negate => {
				if !operand_type.is_arithmetic() {
					self.error(unary.position, format!("Type mismatch: expected an arithmetic type, got {operand_type}"));
				}
				operand_type
			},
		}
	}

	fn analyze_assignment(&mut self, assignment: &crate::ast::expressions::Assignment) -> Type {
		if !assignment.target.is_lvalue() {
			self.error(assignment.position, "left-hand side of an assignment must be an l-value");
		}
		let target_type = self.analyze_expression(&assignment.target);
		let value_type = self.analyze_expression_expecting(&assignment.value, &target_type);
		if !target_type.is_assignable_from(&value_type) {
			self.error(assignment.value.position(), format!("Type mismatch: expected {target_type}, got {value_type}"));
		}
		target_type
	}

	fn analyze_increment(&mut self, increment: &crate::ast::expressions::Increment) -> Type {
		if !increment.operand.is_lvalue() {
			self.error(increment.position, "'++' requires an l-value operand");
		}
		let operand_type = self.analyze_expression(&increment.operand);
		if !operand_type.is_arithmetic() {
			self.error(increment.position, format!("Type mismatch: expected an arithmetic type, got {operand_type}"));
		}
		operand_type
	}

	fn analyze_call(&mut self, call: &crate::ast::expressions::Call) -> Type {
		if builtin::VARIADIC_PRINT_NAMES.contains(&call.callee_name.as_str()) {
			if call.callee_name == "print" && call.arguments.is_empty() {
				self.error(call.position, "'print' requires at least one argument");
			}
			for argument in &call.arguments {
				let argument_type = self.analyze_expression(argument);
				if argument_type.is_void() {
					self.error(argument.position(), "cannot print a void value");
				}
			}
			return Type::void();
		}

		let Some(symbol) = self.symbols.lookup(&call.callee_name).cloned() else {
			self.report_undefined(call.position, "function", &call.callee_name);
			for argument in &call.arguments {
				self.analyze_expression(argument);
			}
			return Type::void();
		};
		let Symbol::Function(function) = symbol else {
			self.error(call.position, format!("'{}' is a variable, not a function", call.callee_name));
			for argument in &call.arguments {
				self.analyze_expression(argument);
			}
			return Type::void();
		};

		if call.arguments.len() != function.parameter_types.len() {
			self.error(
				call.position,
				format!("arity mismatch: '{}' expects {} argument(s), got {}", call.callee_name, function.parameter_types.len(), call.arguments.len()),
			);
		}
		for (argument, parameter_type) in call.arguments.iter().zip(&function.parameter_types) {
			let argument_type = self.analyze_expression_expecting(argument, parameter_type);
			if !parameter_type.is_assignable_from(&argument_type) {
				self.error(argument.position(), format!("Type mismatch: expected {parameter_type}, got {argument_type}"));
			}
		}
		for argument in call.arguments.iter().skip(function.parameter_types.len()) {
			self.analyze_expression(argument);
		}
		function.return_type
	}

	fn analyze_index(&mut self, index: &crate::ast::expressions::Index) -> Type {
		let target_type = self.analyze_expression(&index.target);
		let index_type = self.analyze_expression(&index.index);
		if !index_type.is_int_or_char() {
			self.error(index.position, format!("Type mismatch: expected an arithmetic index, got {index_type}"));
		}
		match target_type.list_element() {
			Some(element) => element.clone(),
			None => {
				self.error(index.position, format!("expected a list, got {target_type}"));
				Type::void()
			},
		}
	}

	fn analyze_method_call(&mut self, method_call: &crate::ast::expressions::MethodCall) -> Type {
		let receiver_type = self.analyze_expression(&method_call.receiver);
		let Some(element_type) = receiver_type.list_element().cloned() else {
			self.error(method_call.position, format!("expected a list, got {receiver_type}"));
			for argument in &method_call.arguments {
				self.analyze_expression(argument);
			}
			return Type::void();
		};

		match method_call.method {
			ListMethod::Push => {
				if method_call.arguments.len() != 1 {
					self.error(method_call.position, format!("'push' expects 1 argument, got {}", method_call.arguments.len()));
				}
				for argument in &method_call.arguments {
					let argument_type = self.analyze_expression_expecting(argument, &element_type);
					if !element_type.is_assignable_from(&argument_type) {
						self.error(argument.position(), format!("Type mismatch: expected {element_type}, got {argument_type}"));
					}
				}
				Type::void()
			},
			ListMethod::Pop => {
				if !method_call.arguments.is_empty() {
					self.error(method_call.position, "'pop' takes no arguments");
				}
				element_type
			},
			ListMethod::Size => {
				if !method_call.arguments.is_empty() {
					self.error(method_call.position, "'size' takes no arguments");
				}
				Type::int()
			},
		}
	}

	fn analyze_list_literal(&mut self, list_literal: &crate::ast::expressions::ListLiteral, expected: Option<&Type>) -> Type {
		if list_literal.elements.is_empty() {
			return match expected.filter(|expected| expected.is_list()) {
				Some(expected) => expected.clone(),
				None => {
					self.error(list_literal.position, "cannot infer the type of an empty list literal");
					Type::list(Type::void())
				},
			};
		}

		let expected_element = expected.and_then(Type::list_element);
		let mut running_type = self.analyze_expression_inner(&list_literal.elements[0], expected_element);
		for element in &list_literal.elements[1..] {
			let element_type = self.analyze_expression_inner(element, Some(&running_type));
			if running_type.is_assignable_from(&element_type) {
				continue;
			}
			if element_type.is_assignable_from(&running_type) {
				running_type = element_type;
				continue;
			}
			self.error(element.position(), format!("Type mismatch: expected {running_type}, got {element_type}"));
		}
		Type::list(running_type)
	}
}

#[cfg(test)]
mod tests {
	use super::analyze;
	use crate::{diagnostics::DiagnosticSink, lexer::{Lexer, NoSystemIncludes}, parser::parse};

	fn diagnostics_for(source: &str) -> DiagnosticSink {
		let provider = NoSystemIncludes;
		let mut lexer = Lexer::new(source.as_bytes(), ".", &provider);
		let mut sink = DiagnosticSink::new();
		let tokens = lexer.tokenize(&mut sink);
		let program = parse(tokens, &mut sink);
		analyze(&program, &mut sink);
		sink
	}

	#[test]
	fn basic_acceptance_has_no_errors() {
		let sink = diagnostics_for("int main() { return 42; }");
		assert!(!sink.has_errors());
	}

	#[test]
	fn undefined_variable_is_reported() {
		let sink = diagnostics_for("int main() { return x; }");
		assert!(sink.has_errors());
		assert!(sink.errors()[0].message().contains("Undefined variable 'x'"));
	}

	#[test]
	fn redeclaration_is_reported() {
		let sink = diagnostics_for("int main() { int x = 1; int x = 2; return x; }");
		assert!(sink.errors().iter().any(|diagnostic| diagnostic.message().contains("already declared")));
	}

	#[test]
	fn initializer_type_mismatch_is_reported() {
		let sink = diagnostics_for("int main() { int x = true; return x; }");
		let message = sink.errors()[0].message();
		assert!(message.contains("expected int"));
		assert!(message.contains("got bool"));
	}

	#[test]
	fn non_boolean_condition_is_reported() {
		let sink = diagnostics_for("int main() { if (1) { return 0; } return 1; }");
		assert!(sink.errors()[0].message().contains("boolean"));
	}

	#[test]
	fn list_methods_type_check() {
		let sink = diagnostics_for("int main() { list<int> a = [1,2,3]; a.push(4); int s = a.size(); return a[0] + s; }");
		assert!(!sink.has_errors());
	}

	#[test]
	fn float_switch_scrutinee_is_rejected() {
		let sink = diagnostics_for("int main() { switch (3.14) { case 1: return 0; } return 1; }");
		assert!(sink.errors().iter().any(|diagnostic| diagnostic.message().contains("switch scrutinee must be arithmetic or boolean")));
	}

	#[test]
	fn float_list_index_is_rejected() {
		let sink = diagnostics_for("int main() { list<int> a = [1,2,3]; return a[3.14]; }");
		assert!(sink.errors().iter().any(|diagnostic| diagnostic.message().contains("expected an arithmetic index")));
	}

	#[test]
	fn break_outside_loop_is_rejected() {
		let sink = diagnostics_for("int main() { break; return 0; }");
		assert!(sink.has_errors());
	}

	#[test]
	fn forward_call_between_user_functions_is_allowed() {
		let sink = diagnostics_for("int a() { return b(); } int b() { return 1; }");
		assert!(!sink.has_errors());
	}

	#[test]
	fn empty_list_literal_is_typed_by_its_declaration_target() {
		let sink = diagnostics_for("int main() { list<int> a = []; a.push(1); return a.size(); }");
		assert!(!sink.has_errors());
	}

	#[test]
	fn a_small_recursive_program_analyzes_cleanly() {
		let source = unindent::unindent(
			"
			int fibonacci(int n) {
				if (n < 2) {
					return n;
				}
				return fibonacci(n - 1) + fibonacci(n - 2);
			}

			int main() {
				int i = 0;
				list<int> results = [];
				while (i < 10) {
					results.push(fibonacci(i));
					i = i + 1;
				}
				return results.size();
			}
			",
		);
		let sink = diagnostics_for(&source);
		assert!(!sink.has_errors(), "{}", sink.format_for_display());
	}

	#[test]
	fn scope_depth_returns_to_one_after_analysis() {
		let provider = NoSystemIncludes;
		let mut lexer = Lexer::new(b"int main() { int x = 1; { int y = 2; } return x; }", ".", &provider);
		let mut sink = DiagnosticSink::new();
		let tokens = lexer.tokenize(&mut sink);
		let program = parse(tokens, &mut sink);
		let table = analyze(&program, &mut sink);
		assert_eq!(table.depth(), 1);
	}
}
