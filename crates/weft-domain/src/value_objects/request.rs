//! Request metadata

use super::member::MemberId;
use super::type_key::TypeKey;

/// Immutable description of one resolution.
///
/// Built by the container when a resolution begins and handed to every
/// binding predicate. [`RequestMetadata::for_member`] derives the per-member
/// view used while planning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestMetadata {
    service: TypeKey,
    implementation: TypeKey,
    member: Option<MemberId>,
    constructor_arguments: Vec<String>,
}

impl RequestMetadata {
    pub fn new(service: TypeKey, implementation: TypeKey) -> Self {
        Self {
            service,
            implementation,
            member: None,
            constructor_arguments: Vec::new(),
        }
    }

    /// Request for service `S` implemented by `I`
    pub fn for_types<S: ?Sized + 'static, I: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<S>(), TypeKey::of::<I>())
    }

    /// Attach the names of the constructor arguments supplied by the binding
    #[must_use]
    pub fn with_constructor_arguments<N, S>(mut self, names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constructor_arguments = names.into_iter().map(Into::into).collect();
        self
    }

    /// Same request, narrowed to one member
    #[must_use]
    pub fn for_member(&self, member: MemberId) -> Self {
        Self {
            member: Some(member),
            ..self.clone()
        }
    }

    pub fn service(&self) -> TypeKey {
        self.service
    }

    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub fn member(&self) -> Option<&MemberId> {
        self.member.as_ref()
    }

    pub fn constructor_arguments(&self) -> &[String] {
        &self.constructor_arguments
    }

    pub fn has_constructor_argument(&self, name: &str) -> bool {
        self.constructor_arguments.iter().any(|arg| arg == name)
    }

    /// Whether the concrete type was requested as itself
    pub fn is_self_bound(&self) -> bool {
        self.service == self.implementation
    }

    /// Whether `S` is the requested service
    pub fn requests<S: ?Sized + 'static>(&self) -> bool {
        self.service.is::<S>()
    }

    /// Whether `I` is the implementation type
    pub fn is_implemented_by<I: ?Sized + 'static>(&self) -> bool {
        self.implementation.is::<I>()
    }
}
