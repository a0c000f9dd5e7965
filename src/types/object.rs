//! Runtime object model.
//!
//! [`Object`] is the closed set of value variants the dispatcher operates
//! over. Payloads are reference-counted so an `Object` can be cloned freely
//! into rest lists and across the C boundary.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::callable::Callable;
use super::closure::Closure;
use super::collections::{Keyword, List, Map, Seq, Set, Vector};
use super::error::{CallError, CallResult};
use super::var::Var;

// =============================================================================
// Object
// =============================================================================

/// A runtime value.
#[derive(Debug, Clone, Default)]
pub enum Object {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(Arc<str>),
    Keyword(Keyword),
    List(List),
    Vector(Vector),
    Map(Map),
    Set(Set),
    Var(Arc<Var>),
    Closure(Arc<Closure>),
    Native(Arc<dyn Callable>),
}

impl Object {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Object::String(value.into())
    }

    pub fn keyword(name: impl Into<Arc<str>>) -> Self {
        Object::Keyword(Keyword::new(name))
    }

    pub fn list<I: IntoIterator<Item = Object>>(items: I) -> Self {
        Object::List(items.into_iter().collect())
    }

    pub fn vector<I: IntoIterator<Item = Object>>(items: I) -> Self {
        Object::Vector(items.into_iter().collect())
    }

    pub fn map<I: IntoIterator<Item = (Object, Object)>>(pairs: I) -> Self {
        Object::Map(Map::from_pairs(pairs))
    }

    pub fn set<I: IntoIterator<Item = Object>>(items: I) -> Self {
        Object::Set(Set::from_items(items))
    }

    /// Wrap a Rust-implemented callable
    pub fn native<C: Callable + 'static>(callable: C) -> Self {
        Object::Native(Arc::new(callable))
    }

    pub fn closure(closure: Closure) -> Self {
        Object::Closure(Arc::new(closure))
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Short name of the variant
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Nil => "nil",
            Object::Bool(_) => "boolean",
            Object::Integer(_) => "integer",
            Object::Real(_) => "real",
            Object::String(_) => "string",
            Object::Keyword(_) => "keyword",
            Object::List(_) => "list",
            Object::Vector(_) => "vector",
            Object::Map(_) => "map",
            Object::Set(_) => "set",
            Object::Var(_) => "var",
            Object::Closure(_) => "closure",
            Object::Native(_) => "native-fn",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Object::Nil)
    }

    /// Everything except `nil` and `false` is truthy
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Nil | Object::Bool(false))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Object::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vector> {
        match self {
            Object::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    /// The callable capability of this object, if it has one.
    ///
    /// Vars are not callables themselves; the dispatcher derefs them first.
    pub fn as_callable(&self) -> Option<&dyn Callable> {
        match self {
            Object::Closure(closure) => Some(closure.as_ref()),
            Object::Native(native) => Some(native.as_ref()),
            _ => None,
        }
    }

    /// Fresh iteration over a seqable object
    pub fn fresh_seq(&self) -> CallResult<Seq<'_>> {
        match self {
            Object::Nil => Ok(Seq::Empty),
            Object::List(list) => Ok(Seq::Items(list.iter())),
            Object::Vector(vector) => Ok(Seq::Items(vector.iter())),
            Object::Set(set) => Ok(Seq::Items(set.iter())),
            Object::Map(map) => Ok(Seq::Entries(map.iter())),
            other => Err(CallError::NotSeqable(other.to_string())),
        }
    }

    /// Hash consistent with `PartialEq`
    pub fn hash_value(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_into(&mut hasher);
        hasher.finish()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Object::Nil => {}
            Object::Bool(b) => b.hash(state),
            Object::Integer(n) => n.hash(state),
            // Signed zeros compare equal
            Object::Real(r) if *r == 0.0 => 0.0f64.to_bits().hash(state),
            Object::Real(r) if r.is_nan() => f64::NAN.to_bits().hash(state),
            Object::Real(r) => r.to_bits().hash(state),
            Object::String(s) => s.hash(state),
            Object::Keyword(k) => k.hash(state),
            Object::List(list) => list.iter().for_each(|v| v.hash_into(state)),
            Object::Vector(vector) => vector.iter().for_each(|v| v.hash_into(state)),
            // Unordered collections combine element hashes commutatively
            Object::Map(map) => map
                .iter()
                .fold(0u64, |acc, (k, v)| {
                    acc.wrapping_add(k.hash_value() ^ v.hash_value().rotate_left(1))
                })
                .hash(state),
            Object::Set(set) => set
                .iter()
                .fold(0u64, |acc, v| acc.wrapping_add(v.hash_value()))
                .hash(state),
            Object::Var(var) => (Arc::as_ptr(var) as usize).hash(state),
            Object::Closure(closure) => (Arc::as_ptr(closure) as usize).hash(state),
            Object::Native(native) => (Arc::as_ptr(native) as *const () as usize).hash(state),
        }
    }

    // -------------------------------------------------------------------------
    // Raw ownership transfer
    // -------------------------------------------------------------------------

    /// Move the object to the heap and hand out an owning pointer.
    ///
    /// The pointer must eventually be passed back to [`Object::from_raw`].
    pub fn into_raw(self) -> *mut Object {
        Box::into_raw(Box::new(self))
    }

    /// Reclaim ownership of an object produced by [`Object::into_raw`].
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, come from `Object::into_raw`, and not have been
    /// reclaimed already.
    pub unsafe fn from_raw(ptr: *mut Object) -> Object {
        *Box::from_raw(ptr)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Nil, Object::Nil) => true,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Real(a), Object::Real(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Keyword(a), Object::Keyword(b)) => a == b,
            (Object::List(a), Object::List(b)) => a == b,
            (Object::Vector(a), Object::Vector(b)) => a == b,
            (Object::Map(a), Object::Map(b)) => a == b,
            (Object::Set(a), Object::Set(b)) => a == b,
            (Object::Var(a), Object::Var(b)) => Arc::ptr_eq(a, b),
            (Object::Closure(a), Object::Closure(b)) => Arc::ptr_eq(a, b),
            (Object::Native(a), Object::Native(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Object>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Nil => write!(f, "nil"),
            Object::Bool(b) => write!(f, "{}", b),
            Object::Integer(n) => write!(f, "{}", n),
            Object::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{:.1}", r),
            Object::Real(r) => write!(f, "{}", r),
            Object::String(s) => write!(f, "{:?}", s),
            Object::Keyword(k) => write!(f, ":{}", k.name()),
            Object::List(list) => {
                write!(f, "(")?;
                write_joined(f, list.iter())?;
                write!(f, ")")
            }
            Object::Vector(vector) => {
                write!(f, "[")?;
                write_joined(f, vector.iter())?;
                write!(f, "]")
            }
            Object::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", k, v)?;
                }
                write!(f, "}}")
            }
            Object::Set(set) => {
                write!(f, "#{{")?;
                write_joined(f, set.iter())?;
                write!(f, "}}")
            }
            Object::Var(var) => write!(f, "{}", var),
            Object::Closure(closure) => write!(f, "{}", closure.describe()),
            Object::Native(native) => write!(f, "{}", native.describe()),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::Bool(value)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Object::Real(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::String(Arc::from(value))
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::String(Arc::from(value))
    }
}

impl From<List> for Object {
    fn from(value: List) -> Self {
        Object::List(value)
    }
}

impl From<Vector> for Object {
    fn from(value: Vector) -> Self {
        Object::Vector(value)
    }
}

impl From<Arc<Var>> for Object {
    fn from(value: Arc<Var>) -> Self {
        Object::Var(value)
    }
}

impl From<Arc<Closure>> for Object {
    fn from(value: Arc<Closure>) -> Self {
        Object::Closure(value)
    }
}
