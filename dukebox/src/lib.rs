//! Operations on whole collections of classes: renaming every symbol into another naming scheme, and widening
//! access flags.
//!
//! Both operations take a [`ClassCollection`][collection::ClassCollection] to transform plus any number of
//! reference collections, which are only read to know the super classes and interfaces of classes the transformed
//! ones use. Neither changes its inputs, the result is always a new collection.
//!
//! The [`pipeline`] module chains them the way a typical run needs them.

pub mod access;
pub mod collection;
pub mod inheritance;
pub mod pipeline;
pub mod progress;
pub mod remap;
pub mod resolve;
