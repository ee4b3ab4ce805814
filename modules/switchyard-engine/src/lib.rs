//! Reducer compiler.
//!
//! Turns a mapping of event kinds to transition functions into one reducer:
//! `(state, event) -> state`. Keys may be plain names, unique tokens, event
//! constructors, or several kinds combined. A kind may also map to a
//! normal/failure pair selected by the event's failure flag.
//!
//! [`Store`] is a minimal synchronous runtime that folds events through a
//! reducer and keeps a dispatch history.

pub mod error;
pub mod handler;
pub mod keys;
pub mod reducer;
pub mod store;
pub mod traits;

pub use error::{CompileError, Result};
pub use handler::{Branches, Handler, Transition, TransitionMap};
pub use keys::{combine_kinds, HandlerKey};
pub use reducer::{compile_reducer, handle_event, CompiledReducer, HandlerSource};
pub use store::{DispatchRecord, Store};
pub use traits::Reducer;
