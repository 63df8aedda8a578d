//! Value objects of the interception engine
//!
//! Immutable descriptions of *what* is being resolved and *which* member is
//! being called. They carry identity only; behaviour lives in the
//! application layer.

pub mod member;
pub mod request;
pub mod strategy;
pub mod type_key;

pub use member::{Dispatch, MemberId, MemberKind};
pub use request::RequestMetadata;
pub use strategy::ProxyStrategy;
pub use type_key::TypeKey;
