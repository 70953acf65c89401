//! Bookshelf application library
//!
//! The books resource and the bootstrap that wires it to a storage backend.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::{build, run, Application};
pub use modules::books;
