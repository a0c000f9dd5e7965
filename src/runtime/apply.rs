//! Apply a callable to a runtime sequence.
//!
//! At most [`APPLY_LOOKAHEAD`] elements are realized before choosing between
//! the fixed-arity entry points and the ten-plus-rest overload, so the
//! decision never depends on the full length of a long sequence.

use tracing::trace;

use super::dispatch::{dispatch, dispatch_rest, ArgBuf};
use crate::types::{CallResult, List, Object, APPLY_LOOKAHEAD, MAX_PARAMS};

/// Apply `source` to the elements of a seqable `collection`.
///
/// `nil`, lists, vectors and sets contribute their elements; maps contribute
/// their entries as `[key value]` vectors. Anything else fails with
/// [`CallError::NotSeqable`](crate::types::CallError::NotSeqable).
pub fn apply_to(source: &Object, collection: &Object) -> CallResult<Object> {
    apply_iter(source, collection.fresh_seq()?)
}

/// Apply `source` to the items of any iterator.
pub fn apply_iter<I>(source: &Object, items: I) -> CallResult<Object>
where
    I: IntoIterator<Item = Object>,
{
    let mut iter = items.into_iter();
    let mut args: ArgBuf = iter.by_ref().take(APPLY_LOOKAHEAD).collect();
    if args.len() <= MAX_PARAMS {
        return dispatch(source, args);
    }

    // The eleventh element opens the trailing collection.
    let mut rest = Vec::with_capacity(1 + iter.size_hint().0);
    rest.extend(args.pop());
    rest.extend(iter);
    trace!(target: "calltron::dispatch", rest = rest.len(), "apply beyond positional limit");
    dispatch_rest(source, args, List::new(rest))
}
