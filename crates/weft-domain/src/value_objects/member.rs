//! Member identity
//!
//! A member is a method or a property accessor of an interceptable type.
//! Property accessors are modelled as two members (getter and setter) so the
//! engine only ever deals with "methods".

use super::type_key::TypeKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an interceptable member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Plain method
    Method,
    /// Property read accessor
    Getter,
    /// Property write accessor
    Setter,
}

/// Whether a member can be redirected by the override-based strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    /// Routed through the type's interception slot
    Virtual,
    /// Always runs the type's own body; reachable only through a contract
    NonVirtual,
}

/// Strongly typed identity of a member: declaring type, name and kind.
///
/// Generic methods are identified by their open definition; the type
/// arguments of a particular call travel with the invocation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId {
    declaring_type: TypeKey,
    name: &'static str,
    kind: MemberKind,
}

impl MemberId {
    pub fn new(declaring_type: TypeKey, name: &'static str, kind: MemberKind) -> Self {
        Self {
            declaring_type,
            name,
            kind,
        }
    }

    /// Method `name` declared by `T`
    pub fn method<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(TypeKey::of::<T>(), name, MemberKind::Method)
    }

    /// Read accessor of property `name` declared by `T`
    pub fn getter<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(TypeKey::of::<T>(), name, MemberKind::Getter)
    }

    /// Write accessor of property `name` declared by `T`
    pub fn setter<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(TypeKey::of::<T>(), name, MemberKind::Setter)
    }

    pub fn declaring_type(&self) -> TypeKey {
        self.declaring_type
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Same member as seen from another declaring type (e.g. a contract)
    #[must_use]
    pub fn rebased(&self, declaring_type: TypeKey) -> Self {
        Self {
            declaring_type,
            ..*self
        }
    }

    /// Whether both identities share name and kind, whatever declares them
    pub fn same_signature(&self, other: &MemberId) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{}::{}()", self.declaring_type, self.name),
            MemberKind::Getter => write!(f, "{}::{} [get]", self.declaring_type, self.name),
            MemberKind::Setter => write!(f, "{}::{} [set]", self.declaring_type, self.name),
        }
    }
}
