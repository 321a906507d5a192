//! orangec-util - Foundation types shared by every compiler phase.
//!
//! Nothing in this crate knows that Orange has modules, structs, or a
//! shunting-yard parser. It provides the plumbing every phase needs:
//!
//! - [`symbol::Symbol`] — interned strings, so identifier comparison is an
//!   integer compare instead of a byte-for-byte one.
//! - [`span::Span`] / [`span::SourceMap`] — where a token or AST node came
//!   from, and how to recover the source line for an error message.
//! - [`diagnostic`] — turning a phase error into the `file:line: error: ...`
//!   wire format the compiler prints before exiting.
//! - [`index_vec::IndexVec`] / [`index_vec::Idx`] — a `Vec<T>` indexed by a
//!   newtype instead of `usize`, used for the symbol-tree arena.
//! - [`base36`] — the base-36 rendering used for emitted symbol names
//!   (`_<id>`) and canonical type tags (`Name#<id>`).

pub mod base36;
pub mod diagnostic;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
