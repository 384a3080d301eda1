//! Crate for the translation tables between naming schemes, and for rewriting descriptors and signatures with them.
//!
//! A [`Mapping`][mapping::Mapping] goes from one [`NamingScheme`][scheme::NamingScheme] to another one. It
//! answers the question "what is the name of X in the other scheme?" for classes, fields and methods, and never
//! fails on names it doesn't know: these are just given back unchanged.
//!
//! Reading mapping files is not done here, a mapping is filled by calling the `set_*` methods.

pub mod descriptor;
pub mod mapping;
pub mod scheme;
