//! # weft domain layer
//!
//! Core types shared by every other layer of the interception engine.
//! Nothing in this crate decides *whether* something is intercepted; it only
//! names the things the engine reasons about.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | The engine-wide [`Error`](error::Error) enum and [`Result`](error::Result) alias |
//! | [`constants`] | Shared defaults |
//! | [`value_objects`] | Type keys, member identities, request metadata, proxy strategies |

pub mod constants;
pub mod error;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{Dispatch, MemberId, MemberKind, ProxyStrategy, RequestMetadata, TypeKey};
