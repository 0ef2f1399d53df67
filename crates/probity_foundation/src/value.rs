//! The dynamic value every assertion operand evaluates to.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::{LtMap, LtSet, LtVec};
use crate::error::Error;
use crate::fault::{Evaluated, Fault};
use crate::pattern::Pattern;
use crate::types::{Arity, Type};

/// Dynamic value produced by evaluating an expected or actual expression.
///
/// Values are immutable and cheaply cloneable (O(1) for most variants).
/// Composite values use structural sharing via persistent data structures.
/// Comparison strategies are chosen by inspecting which variant each side
/// holds, not by any static type.
#[derive(Clone)]
pub enum Value {
    /// The nil value (represents absence).
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Keyword (`:name`), typically used as a map key.
    Keyword(Arc<str>),
    /// Persistent vector (ordered sequence).
    Vec(LtVec<Value>),
    /// Persistent set.
    Set(LtSet<Value>),
    /// Persistent map.
    Map(LtMap<Value, Value>),
    /// Callable, used as a predicate when it is the expected value.
    Fn(NativeFn),
    /// Compiled text pattern.
    Pattern(Pattern),
    /// Type descriptor.
    Type(Type),
    /// Membership wrapper: asks for a containment check against the target.
    Membership(Arc<Value>),
}

/// Wraps `target` so the comparator tests membership in it instead of
/// equality with it.
#[must_use]
pub fn in_(target: impl Into<Value>) -> Value {
    Value::Membership(Arc::new(target.into()))
}

// =============================================================================
// Native Functions
// =============================================================================

type NativeBody = dyn Fn(&[Value]) -> Evaluated + Send + Sync;

/// Callable implemented in Rust.
///
/// Identity is by allocation: two clones of the same `NativeFn` are equal,
/// two separately constructed functions never are.
#[derive(Clone)]
pub struct NativeFn {
    name: Arc<str>,
    arity: Arity,
    body: Arc<NativeBody>,
}

impl NativeFn {
    /// Creates a callable with the given arity.
    pub fn new(
        name: impl Into<Arc<str>>,
        arity: Arity,
        body: impl Fn(&[Value]) -> Evaluated + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            body: Arc::new(body),
        }
    }

    /// Creates a unary predicate.
    pub fn predicate(
        name: impl Into<Arc<str>>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, Arity::Exact(1), move |args| {
            Ok(Value::Bool(test(&args[0])))
        })
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared arity.
    #[must_use]
    pub const fn arity(&self) -> &Arity {
        &self.arity
    }

    /// Invokes the function.
    ///
    /// # Errors
    ///
    /// Returns a fault if the argument count does not satisfy the arity or
    /// the body itself faults.
    pub fn call(&self, args: &[Value]) -> Evaluated {
        if !self.arity.admits(args.len()) {
            let err = Error::arity_mismatch(self.arity.to_string(), args.len());
            return Err(Fault::from(err));
        }
        (self.body)(args)
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.body), Arc::as_ptr(&other.body))
    }
}

impl Eq for NativeFn {}

impl Hash for NativeFn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.body).cast::<()>().hash(state);
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

// =============================================================================
// Value
// =============================================================================

impl Value {
    /// Creates a keyword value.
    #[must_use]
    pub fn keyword(name: &str) -> Self {
        Self::Keyword(name.into())
    }

    /// Compiles a pattern value.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidPattern` error if `source` does not compile.
    pub fn pattern(source: &str) -> crate::Result<Self> {
        Pattern::new(source).map(Self::Pattern)
    }

    /// Builds a map value from key-value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a set value.
    pub fn set<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Builds a vector value.
    pub fn vec<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Vec(items.into_iter().map(Into::into).collect())
    }

    /// Returns the runtime type of this value.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::Keyword(_) => Type::Keyword,
            Self::Vec(_) => Type::vec(Type::Any),
            Self::Set(_) => Type::set(Type::Any),
            Self::Map(_) => Type::map(Type::Any, Type::Any),
            Self::Fn(f) => Type::Fn(f.arity().clone()),
            Self::Pattern(_) => Type::Pattern,
            Self::Type(_) => Type::Type,
            Self::Membership(_) => Type::Membership,
        }
    }

    /// Returns true if this value is truthy.
    ///
    /// Only `nil` and `false` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a vector reference.
    #[must_use]
    pub const fn as_vec(&self) -> Option<&LtVec<Value>> {
        match self {
            Self::Vec(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract a set reference.
    #[must_use]
    pub const fn as_set(&self) -> Option<&LtSet<Value>> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a map reference.
    #[must_use]
    pub const fn as_map(&self) -> Option<&LtMap<Value, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract the target of a membership wrapper.
    #[must_use]
    pub fn as_membership(&self) -> Option<&Value> {
        match self {
            Self::Membership(target) => Some(target),
            _ => None,
        }
    }
}

// Bit equality keeps Eq reflexive and consistent with Hash. Assertion-level
// NaN handling lives in the engine's normalization pass.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) | (Self::Keyword(a), Self::Keyword(b)) => a == b,
            (Self::Vec(a), Self::Vec(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a == b,
            (Self::Type(a), Self::Type(b)) => a == b,
            (Self::Membership(a), Self::Membership(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) | Self::Keyword(s) => s.hash(state),
            Self::Vec(v) => v.hash(state),
            Self::Set(s) => s.hash(state),
            Self::Map(m) => m.hash(state),
            Self::Fn(f) => f.hash(state),
            Self::Pattern(p) => p.hash(state),
            Self::Type(t) => t.hash(state),
            Self::Membership(target) => target.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Keyword(k) => write!(f, ":{k}"),
            Self::Vec(v) => write!(f, "{v:?}"),
            Self::Set(s) => write!(f, "#{s:?}"),
            Self::Map(m) => write!(f, "{m:?}"),
            Self::Fn(func) => write!(f, "{func:?}"),
            Self::Pattern(p) => write!(f, "{p:?}"),
            Self::Type(t) => write!(f, "{t}"),
            Self::Membership(target) => write!(f, "(in {target:?})"),
        }
    }
}

/// Renders items separated by `sep`, sorted by their rendering so that
/// unordered collections print the same way on every run.
fn write_sorted(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = String>,
    sep: &str,
) -> fmt::Result {
    let mut rendered: Vec<String> = items.collect();
    rendered.sort();
    f.write_str(&rendered.join(sep))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Keyword(k) => write!(f, ":{k}"),
            Self::Vec(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Set(s) => {
                write!(f, "#{{")?;
                write_sorted(f, s.iter().map(ToString::to_string), " ")?;
                write!(f, "}}")
            }
            Self::Map(m) => {
                write!(f, "{{")?;
                write_sorted(f, m.iter().map(|(k, v)| format!("{k} {v}")), ", ")?;
                write!(f, "}}")
            }
            Self::Fn(func) => write!(f, "{func:?}"),
            Self::Pattern(p) => write!(f, "{p}"),
            Self::Type(t) => write!(f, "{t}"),
            Self::Membership(target) => write!(f, "(in {target})"),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Type> for Value {
    fn from(t: Type) -> Self {
        Self::Type(t)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Self::Fn(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Vec(v.into_iter().map(Into::into).collect())
    }
}
