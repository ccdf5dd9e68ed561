//! Identity resolver implementations.

pub mod query;

pub use query::QueryParamIdentityResolver;
