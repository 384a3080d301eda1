pub mod access;
pub mod annotation;
pub mod class;
pub mod field;
pub mod method;
