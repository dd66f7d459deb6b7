//! Bindings-facing packaging of [`chatkit_core`].
//!
//! Swift, Kotlin and React Native bindings are generated from this crate's
//! library artifact; Rust consumers can depend on it or on `chatkit-core`
//! directly.

pub use chatkit_core::*;
