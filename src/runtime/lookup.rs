//! Lookup invocables.
//!
//! Maps, sets and keywords are invocable without being [`Callable`]s. They
//! answer a fixed 1- or 2-argument lookup and never take part in variadic
//! resolution.
//!
//! [`Callable`]: crate::types::Callable

use crate::types::{CallError, CallResult, Keyword, Map, Object, Set};

/// A borrowed lookup-capable collection or key.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// `(m k)` / `(m k default)`
    Map(&'a Map),
    /// `(s x)`
    Set(&'a Set),
    /// `(:k m)` / `(:k m default)`
    Keyword(&'a Keyword),
}

impl<'a> Lookup<'a> {
    /// The lookup capability of `object`, if it has one
    pub fn of(object: &'a Object) -> Option<Self> {
        match object {
            Object::Map(map) => Some(Lookup::Map(map)),
            Object::Set(set) => Some(Lookup::Set(set)),
            Object::Keyword(keyword) => Some(Lookup::Keyword(keyword)),
            _ => None,
        }
    }

    /// Single-argument lookup; misses produce `nil`
    pub fn call1(self, a1: &Object) -> Object {
        self.lookup(a1).unwrap_or(Object::Nil)
    }

    /// Two-argument lookup with a default, where the shape supports it
    pub fn call2(self, a1: &Object, default: &Object) -> Option<Object> {
        match self {
            Lookup::Map(_) | Lookup::Keyword(_) => {
                Some(self.lookup(a1).unwrap_or_else(|| default.clone()))
            }
            Lookup::Set(_) => None,
        }
    }

    /// Invoke with a positional argument list.
    ///
    /// `callee` is the object this lookup was derived from and only feeds
    /// the error description.
    pub fn invoke(self, callee: &Object, args: &[Object]) -> CallResult<Object> {
        let result = match args {
            [a1] => Some(self.call1(a1)),
            [a1, a2] => self.call2(a1, a2),
            _ => None,
        };
        result.ok_or_else(|| CallError::invalid_arity(args.len(), callee.to_string()))
    }

    fn lookup(self, a1: &Object) -> Option<Object> {
        match self {
            Lookup::Map(map) => map.get(a1).cloned(),
            Lookup::Set(set) => set.get(a1).cloned(),
            Lookup::Keyword(keyword) => match a1 {
                Object::Map(map) => map.get(&Object::Keyword(keyword.clone())).cloned(),
                _ => None,
            },
        }
    }
}
