//! Type descriptors for instance checks.

use std::fmt;

use crate::fault::FaultType;

/// Type descriptor.
///
/// Used as an expected value to assert that the actual value is an instance
/// of a type, and (as [`Type::Fault`]) to assert that evaluating the actual
/// expression raised a fault of a given type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Only `nil`.
    Nil,
    /// Booleans.
    Bool,
    /// 64-bit signed integers.
    Int,
    /// 64-bit floats. Also accepts integers.
    Float,
    /// Strings.
    String,
    /// Keywords.
    Keyword,
    /// Vectors whose elements are all of one type.
    Vec(Box<Type>),
    /// Sets whose members are all of one type.
    Set(Box<Type>),
    /// Maps with uniform key and value types.
    Map(Box<Type>, Box<Type>),
    /// `nil` or the inner type.
    Option(Box<Type>),
    /// Every value.
    Any,
    /// Callables of a compatible arity.
    Fn(Arity),
    /// Compiled text patterns.
    Pattern,
    /// Type descriptors themselves.
    Type,
    /// Membership wrappers produced by [`crate::in_`].
    Membership,
    /// Faults of the given type or any of its descendants.
    Fault(FaultType),
}

/// Number of arguments a callable takes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly N arguments.
    Exact(usize),
    /// Between min and max arguments (inclusive).
    Range(usize, usize),
    /// N or more arguments.
    Variadic(usize),
}

impl Arity {
    /// Returns true if a call with `count` arguments is allowed.
    #[must_use]
    pub const fn admits(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::Variadic(min) => count >= min,
        }
    }

    /// Returns true if every call allowed by `other` is allowed by `self`.
    #[must_use]
    pub const fn covers(&self, other: &Self) -> bool {
        let (self_min, self_max) = self.bounds();
        let (other_min, other_max) = other.bounds();
        let upper_ok = match (self_max, other_max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(s), Some(o)) => o <= s,
        };
        other_min >= self_min && upper_ok
    }

    const fn bounds(&self) -> (usize, Option<usize>) {
        match *self {
            Self::Exact(n) => (n, Some(n)),
            Self::Range(min, max) => (min, Some(max)),
            Self::Variadic(min) => (min, None),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min}..={max}"),
            Self::Variadic(min) => write!(f, "at least {min}"),
        }
    }
}

impl Type {
    /// Vector of `element`.
    #[must_use]
    pub fn vec(element: Type) -> Self {
        Self::Vec(Box::new(element))
    }

    /// Set of `element`.
    #[must_use]
    pub fn set(element: Type) -> Self {
        Self::Set(Box::new(element))
    }

    /// Map from `key` to `value`.
    #[must_use]
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// `nil` or `inner`.
    #[must_use]
    pub fn option(inner: Type) -> Self {
        Self::Option(Box::new(inner))
    }

    /// Returns the fault type if this descriptor names one.
    #[must_use]
    pub const fn as_fault(&self) -> Option<&FaultType> {
        match self {
            Self::Fault(ty) => Some(ty),
            _ => None,
        }
    }

    /// Returns true if a value whose runtime type is `actual` is an
    /// instance of `self` (is it, or a subtype of it).
    ///
    /// Runtime collections report `Any` element types, since their elements
    /// are not inspected. An `Any` element is accepted by every element type.
    #[must_use]
    pub fn accepts(&self, actual: &Type) -> bool {
        match (self, actual) {
            (Self::Any, _) => true,
            (Self::Option(_), Self::Nil) => true,
            (Self::Option(inner), _) => inner.accepts(actual),
            (Self::Float, Self::Int) => true,
            (Self::Vec(e), Self::Vec(a)) | (Self::Set(e), Self::Set(a)) => element_accepts(e, a),
            (Self::Map(ek, ev), Self::Map(ak, av)) => {
                element_accepts(ek, ak) && element_accepts(ev, av)
            }
            (Self::Fn(e), Self::Fn(a)) => e.covers(a),
            (Self::Fault(e), Self::Fault(a)) => a.is_a(e),
            (
                Self::Nil
                | Self::Bool
                | Self::Int
                | Self::Float
                | Self::String
                | Self::Keyword
                | Self::Pattern
                | Self::Type
                | Self::Membership,
                _,
            ) => self == actual,
            _ => false,
        }
    }
}

fn element_accepts(expected: &Type, actual: &Type) -> bool {
    matches!(actual, Type::Any) || expected.accepts(actual)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Keyword => f.write_str("keyword"),
            Self::Vec(t) => write!(f, "vec<{t}>"),
            Self::Set(t) => write!(f, "set<{t}>"),
            Self::Map(k, v) => write!(f, "map<{k}, {v}>"),
            Self::Option(t) => write!(f, "option<{t}>"),
            Self::Any => f.write_str("any"),
            Self::Fn(arity) => write!(f, "fn/{arity}"),
            Self::Pattern => f.write_str("pattern"),
            Self::Type => f.write_str("type"),
            Self::Membership => f.write_str("membership"),
            Self::Fault(ty) => write!(f, "fault<{}>", ty.path()),
        }
    }
}
