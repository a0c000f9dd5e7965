//! The callable capability contract.
//!
//! Every invocable runtime value implements [`Callable`]: one method per
//! positional arity 0..=10 plus the arity descriptor the dispatcher resolves
//! variadic calls against. A callable overrides only the arities it
//! implements; the rest fail with [`CallError::InvalidArity`].
//!
//! Arguments are borrowed for the duration of the call. A variadic body of a
//! callable whose tail starts at `k` lives at `call{k+1}`, and receives the
//! packed rest as a [`List`](super::collections::List) object (or `nil` when
//! the rest is empty) in its last position.

use std::fmt;

use super::arity::ArityFlags;
use super::error::{CallError, CallResult};
use super::object::Object;

/// Per-arity invocation protocol.
#[allow(clippy::too_many_arguments)]
pub trait Callable: Send + Sync + fmt::Debug {
    /// Diagnostic description used in error messages
    fn describe(&self) -> String;

    /// Arity descriptor; defaults to "fixed arities only, highest 0"
    fn arity_flags(&self) -> ArityFlags {
        ArityFlags::default()
    }

    fn call0(&self) -> CallResult<Object> {
        Err(CallError::invalid_arity(0, self.describe()))
    }

    fn call1(&self, _a1: &Object) -> CallResult<Object> {
        Err(CallError::invalid_arity(1, self.describe()))
    }

    fn call2(&self, _a1: &Object, _a2: &Object) -> CallResult<Object> {
        Err(CallError::invalid_arity(2, self.describe()))
    }

    fn call3(&self, _a1: &Object, _a2: &Object, _a3: &Object) -> CallResult<Object> {
        Err(CallError::invalid_arity(3, self.describe()))
    }

    fn call4(&self, _a1: &Object, _a2: &Object, _a3: &Object, _a4: &Object) -> CallResult<Object> {
        Err(CallError::invalid_arity(4, self.describe()))
    }

    fn call5(
        &self,
        _a1: &Object,
        _a2: &Object,
        _a3: &Object,
        _a4: &Object,
        _a5: &Object,
    ) -> CallResult<Object> {
        Err(CallError::invalid_arity(5, self.describe()))
    }

    fn call6(
        &self,
        _a1: &Object,
        _a2: &Object,
        _a3: &Object,
        _a4: &Object,
        _a5: &Object,
        _a6: &Object,
    ) -> CallResult<Object> {
        Err(CallError::invalid_arity(6, self.describe()))
    }

    fn call7(
        &self,
        _a1: &Object,
        _a2: &Object,
        _a3: &Object,
        _a4: &Object,
        _a5: &Object,
        _a6: &Object,
        _a7: &Object,
    ) -> CallResult<Object> {
        Err(CallError::invalid_arity(7, self.describe()))
    }

    fn call8(
        &self,
        _a1: &Object,
        _a2: &Object,
        _a3: &Object,
        _a4: &Object,
        _a5: &Object,
        _a6: &Object,
        _a7: &Object,
        _a8: &Object,
    ) -> CallResult<Object> {
        Err(CallError::invalid_arity(8, self.describe()))
    }

    fn call9(
        &self,
        _a1: &Object,
        _a2: &Object,
        _a3: &Object,
        _a4: &Object,
        _a5: &Object,
        _a6: &Object,
        _a7: &Object,
        _a8: &Object,
        _a9: &Object,
    ) -> CallResult<Object> {
        Err(CallError::invalid_arity(9, self.describe()))
    }

    fn call10(
        &self,
        _a1: &Object,
        _a2: &Object,
        _a3: &Object,
        _a4: &Object,
        _a5: &Object,
        _a6: &Object,
        _a7: &Object,
        _a8: &Object,
        _a9: &Object,
        _a10: &Object,
    ) -> CallResult<Object> {
        Err(CallError::invalid_arity(10, self.describe()))
    }
}
