#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Terminal output primitives for noted frontends.
//!
//! This crate isolates terminal rendering, prompts, and spinners so libnoted
//! can remain UI-agnostic.

/// Terminal output abstractions and implementations.
mod output;

pub use output::{Output, OutputError, Quiet, Spinner, Terminal};
