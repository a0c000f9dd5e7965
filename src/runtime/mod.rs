//! Call Runtime
//!
//! This module resolves calls against arity descriptors:
//! - [`dispatch`]: `dynamic_call0`..`dynamic_call10`, the slice form and the
//!   ten-plus-rest overload
//! - [`lookup`]: The 1-/2-argument convention of maps, sets and keywords
//! - [`apply`]: Applying a callable to a sequence of unknown length

pub mod apply;
pub mod dispatch;
pub mod lookup;


pub use apply::{apply_iter, apply_to};
pub use dispatch::{
    dynamic_call, dynamic_call0, dynamic_call1, dynamic_call10, dynamic_call2, dynamic_call3,
    dynamic_call4, dynamic_call5, dynamic_call6, dynamic_call7, dynamic_call8, dynamic_call9,
    dynamic_call_rest, ArgBuf, Invocable,
};
pub use lookup::Lookup;
