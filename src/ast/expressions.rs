//! Expression nodes. Every node type here implements `Node` and is wrapped by
//! exactly one `Expression` variant; `#[enum_dispatch]` generates the `From`
//! impls and the `Node` dispatch on `Expression` itself so callers can just
//! call `.position()` on an `Expression` without matching first.

use super::Node;
use crate::position::Position;

/// The value a literal token scanned to. Computed once, at parse time, so the
/// semantic analyzer never has to re-parse lexeme text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
	Integer(i64),
	Float(f64),
	Char(char),
	String(String),
	Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	Equal,
	NotEqual,
	Less,
	Greater,
	LessEqual,
	GreaterEqual,
	And,
	Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
	Not,
	Negate,
}

/// `push`/`pop`/`size`/`get` — the closed set of list method names. `get` is
/// accepted by the parser and desugared to `Index` rather than kept as its
/// own node (it's equivalent to indexing; see `Index`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMethod {
	Push,
	Pop,
	Size,
}

#[derive(Debug, Clone)]
pub struct Literal {
	pub value: LiteralValue,
	pub position: Position,
}

impl Node for Literal {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct Identifier {
	pub name: String,
	pub position: Position,
}

impl Node for Identifier {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct Binary {
	pub operator: BinaryOperator,
	pub left: Box<Expression>,
	pub right: Box<Expression>,
	pub position: Position,
}

impl Node for Binary {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct Unary {
	pub operator: UnaryOperator,
	pub operand: Box<Expression>,
	pub position: Position,
}

impl Node for Unary {
	fn position(&self) -> Position {
		self.position
	}
}

/// Assignment is its own node, not a `Binary` variant, because its left side
/// is constrained to an l-value (`Identifier` or `Index`) and the semantic
/// analyzer's check for that is specific to assignment.
#[derive(Debug, Clone)]
pub struct Assignment {
	pub target: Box<Expression>,
	pub value: Box<Expression>,
	pub position: Position,
}

impl Node for Assignment {
	fn position(&self) -> Position {
		self.position
	}
}

/// `++x` or `x++`; `is_prefix` distinguishes evaluation order, both variants
/// require an l-value operand of arithmetic type.
#[derive(Debug, Clone)]
pub struct Increment {
	pub operand: Box<Expression>,
	pub is_prefix: bool,
	pub position: Position,
}

impl Node for Increment {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct Call {
	pub callee_name: String,
	pub arguments: Vec<Expression>,
	pub position: Position,
}

impl Node for Call {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct Index {
	pub target: Box<Expression>,
	pub index: Box<Expression>,
	pub position: Position,
}

impl Node for Index {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct MethodCall {
	pub receiver: Box<Expression>,
	pub method: ListMethod,
	pub arguments: Vec<Expression>,
	pub position: Position,
}

impl Node for MethodCall {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
pub struct ListLiteral {
	pub elements: Vec<Expression>,
	pub position: Position,
}

impl Node for ListLiteral {
	fn position(&self) -> Position {
		self.position
	}
}

/// Reserved per the data model: `object.field` where `field` is not followed
/// by `(`. Struct/record types are out of scope, so the semantic analyzer
/// always rejects this node with "field access is not supported"; it exists
/// so the parser's `.`-postfix grammar is total.
#[derive(Debug, Clone)]
pub struct FieldAccess {
	pub object: Box<Expression>,
	pub field_name: String,
	pub position: Position,
}

impl Node for FieldAccess {
	fn position(&self) -> Position {
		self.position
	}
}

#[derive(Debug, Clone)]
#[enum_dispatch::enum_dispatch(Node)]
pub enum Expression {
	Literal(Literal),
	Identifier(Identifier),
	Binary(Binary),
	Unary(Unary),
	Assignment(Assignment),
	Increment(Increment),
	Call(Call),
	Index(Index),
	MethodCall(MethodCall),
	ListLiteral(ListLiteral),
	FieldAccess(FieldAccess),
}

impl Expression {
	/// Whether this expression denotes a mutable storage location, per the
	/// data model's l-value set: `Identifier`, `Index`, `FieldAccess`.
	#[must_use]
	pub const fn is_lvalue(&self) -> bool {
		matches!(self, Self::Identifier(_) | Self::Index(_) | Self::FieldAccess(_))
	}
}
