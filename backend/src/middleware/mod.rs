//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently the
//! per-request trace identifier and completion log.

pub mod trace;

pub use trace::Trace;
