//! In-memory model of compiled JVM classes.
//!
//! The model only carries what remapping and access transformation look at: names, descriptors, signatures,
//! access flags, annotation types and the symbol-bearing instructions. Everything else is kept as opaque data,
//! so that a writer can put it back unchanged.
//!
//! Reading and writing the actual class file format is not done here.

mod macros;

pub mod tree;

pub use tree::access::Access;
