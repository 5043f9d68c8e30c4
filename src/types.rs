//! The type model. The original `ris` compiler represents types with a virtual
//! `Type` base class and three subclasses (`PrimitiveType`, `ArrayType`,
//! `FunctionType`). There's no dynamic dispatch need here, so this collapses
//! that hierarchy into one closed enum matched exhaustively by every phase
//! that cares about types.

use std::fmt;

/// The six built-in primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
	Int,
	Float,
	Bool,
	Char,
	String,
	Void,
}

impl fmt::Display for Primitive {
	fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Int => "int",
			Self::Float => "float",
			Self::Bool => "bool",
			Self::Char => "char",
			Self::String => "string",
			Self::Void => "void",
		};
		write!(formatter, "{name}")
	}
}

/// `Primitive(P) | List(Type) | Function(return, params)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
	Primitive(Primitive),
	List(Box<Type>),
	Function(Box<Type>, Vec<Type>),
}

impl Type {
	#[must_use]
	pub const fn int() -> Self {
		Self::Primitive(Primitive::Int)
	}

	#[must_use]
	pub const fn float() -> Self {
		Self::Primitive(Primitive::Float)
	}

	#[must_use]
	pub const fn bool() -> Self {
		Self::Primitive(Primitive::Bool)
	}

	#[must_use]
	pub const fn char() -> Self {
		Self::Primitive(Primitive::Char)
	}

	#[must_use]
	pub const fn string() -> Self {
		Self::Primitive(Primitive::String)
	}

	#[must_use]
	pub const fn void() -> Self {
		Self::Primitive(Primitive::Void)
	}

	#[must_use]
	pub fn list(element: Self) -> Self {
		Self::List(Box::new(element))
	}

	/// True for `int`, `float`, and `char` — the types arithmetic operators accept.
	#[must_use]
	pub const fn is_arithmetic(&self) -> bool {
		matches!(self, Self::Primitive(Primitive::Int | Primitive::Float | Primitive::Char))
	}

	/// True for `int` and `char` only — the narrower arithmetic subset a
	/// switch scrutinee or list index accepts (`float` is excluded).
	#[must_use]
	pub const fn is_int_or_char(&self) -> bool {
		matches!(self, Self::Primitive(Primitive::Int | Primitive::Char))
	}

	#[must_use]
	pub const fn is_boolean(&self) -> bool {
		matches!(self, Self::Primitive(Primitive::Bool))
	}

	#[must_use]
	pub const fn is_void(&self) -> bool {
		matches!(self, Self::Primitive(Primitive::Void))
	}

	#[must_use]
	pub const fn is_string(&self) -> bool {
		matches!(self, Self::Primitive(Primitive::String))
	}

	#[must_use]
	pub const fn is_list(&self) -> bool {
		matches!(self, Self::List(_))
	}

	/// The element type of a `list<T>`, or `None` for anything else.
	#[must_use]
	pub fn list_element(&self) -> Option<&Self> {
		match self {
			Self::List(element) => Some(element),
			_ => None,
		}
	}

	/// Whether a value of `source` type may be stored into a `self`-typed
	/// ("target") location or passed as a `self`-typed parameter. Per the data
	/// model: identical types are always assignable; `int → float` and
	/// `char → int` widen implicitly; `list<T> → list<T>` is assignable only
	/// when the element types are themselves identical (no covariance);
	/// function types are never assignable.
	#[must_use]
	pub fn is_assignable_from(&self, source: &Self) -> bool {
		if self == source {
			return true;
		}
		match (self, source) {
			(Self::Primitive(Primitive::Float), Self::Primitive(Primitive::Int)) => true,
			(Self::Primitive(Primitive::Int), Self::Primitive(Primitive::Char)) => true,
			_ => false,
		}
	}

	/// Whether `self` and `other` may appear on either side of `==`/`!=`/
	/// `</<=/>/>=`: both arithmetic, both bool, or both string. Lists and
	/// functions are never comparable.
	#[must_use]
	pub fn is_comparable_with(&self, other: &Self) -> bool {
		(self.is_arithmetic() && other.is_arithmetic()) || (self.is_boolean() && other.is_boolean()) || (self.is_string() && other.is_string())
	}

	/// The widened result type of a binary arithmetic operation: `float` if
	/// either operand is `float`, otherwise `int` (char promotes to int).
	#[must_use]
	pub fn arithmetic_result(&self, other: &Self) -> Self {
		if matches!(self, Self::Primitive(Primitive::Float)) || matches!(other, Self::Primitive(Primitive::Float)) {
			Self::float()
		} else {
			Self::int()
		}
	}
}

impl fmt::Display for Type {
	fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Primitive(primitive) => write!(formatter, "{primitive}"),
			Self::List(element) => write!(formatter, "list<{element}>"),
			Self::Function(return_type, parameters) => {
				write!(formatter, "function({return_type}")?;
				for parameter in parameters {
					write!(formatter, ", {parameter}")?;
				}
				write!(formatter, ")")
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Primitive, Type};

	#[test]
	fn int_widens_to_float() {
		assert!(Type::float().is_assignable_from(&Type::int()));
		assert!(!Type::int().is_assignable_from(&Type::float()));
	}

	#[test]
	fn char_widens_to_int() {
		assert!(Type::int().is_assignable_from(&Type::char()));
	}

	#[test]
	fn identical_lists_are_assignable_nested_lists_are_not_covariant() {
		let list_of_int = Type::list(Type::int());
		let list_of_float = Type::list(Type::float());
		assert!(list_of_int.is_assignable_from(&Type::list(Type::int())));
		assert!(!list_of_float.is_assignable_from(&list_of_int));
	}

	#[test]
	fn function_types_are_never_assignable() {
		let a = Type::Function(Box::new(Type::void()), vec![]);
		let b = Type::Function(Box::new(Type::void()), vec![]);
		assert!(!a.is_assignable_from(&b));
	}

	#[test]
	fn int_or_char_excludes_float() {
		assert!(Type::int().is_int_or_char());
		assert!(Type::char().is_int_or_char());
		assert!(!Type::float().is_int_or_char());
		assert!(Type::float().is_arithmetic());
	}

	#[test]
	fn comparability_excludes_lists_and_functions() {
		assert!(Type::int().is_comparable_with(&Type::char()));
		assert!(Type::string().is_comparable_with(&Type::string()));
		assert!(!Type::list(Type::int()).is_comparable_with(&Type::list(Type::int())));
		assert!(!Type::int().is_comparable_with(&Type::string()));
	}

	#[test]
	fn display_matches_source_syntax() {
		assert_eq!(Type::list(Type::Primitive(Primitive::Int)).to_string(), "list<int>");
	}
}
