//! Interceptable component types
//!
//! Rust cannot subclass a type or synthesize an interface at runtime, so a
//! component opts into interception by describing itself: which members can
//! be intercepted, which contracts expose them, and whether the type embeds
//! an [`InterceptionSlot`] for the override-based strategy.

use std::fmt;

use weft_domain::value_objects::{Dispatch, MemberId, MemberKind, TypeKey};

use crate::factory::InterceptionSlot;
use crate::ports::interceptor::InterceptorFactory;

/// A component type the engine can proxy.
///
/// # Example
///
/// ```ignore
/// impl Interceptable for Mock {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::new::<Self>()
///             .overridable()
///             .member(MemberDescriptor::method::<Self>("get_my_property"))
///     }
///
///     fn interception_slot(&self) -> Option<&InterceptionSlot> {
///         Some(&self.slot)
///     }
/// }
/// ```
pub trait Interceptable: Send + Sync + 'static {
    /// Interceptable surface of the type
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;

    /// Slot used by the override-based strategy, if the type embeds one
    fn interception_slot(&self) -> Option<&InterceptionSlot> {
        None
    }
}

/// Interceptor a member carries by itself
#[derive(Clone)]
pub enum DeclaredInterceptor {
    /// Self-contained factory
    Factory(InterceptorFactory),
    /// Interceptor type whose factory is provided to the registry
    Provided(TypeKey),
}

impl fmt::Debug for DeclaredInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory(factory) => f.debug_tuple("Factory").field(factory).finish(),
            Self::Provided(key) => f.debug_tuple("Provided").field(key).finish(),
        }
    }
}

/// One interceptable member
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    id: MemberId,
    dispatch: Dispatch,
    generic: bool,
    exposed_by: Vec<TypeKey>,
    declared: Vec<DeclaredInterceptor>,
}

impl MemberDescriptor {
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            dispatch: Dispatch::Virtual,
            generic: false,
            exposed_by: Vec::new(),
            declared: Vec::new(),
        }
    }

    /// Virtual method `name` of `T`
    pub fn method<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(MemberId::method::<T>(name))
    }

    /// Virtual read accessor of property `name` of `T`
    pub fn getter<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(MemberId::getter::<T>(name))
    }

    /// Virtual write accessor of property `name` of `T`
    pub fn setter<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(MemberId::setter::<T>(name))
    }

    /// Member that never routes through the interception slot
    #[must_use]
    pub fn non_virtual(mut self) -> Self {
        self.dispatch = Dispatch::NonVirtual;
        self
    }

    /// Member declared with type parameters
    #[must_use]
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }

    /// Member is part of service contract `C`
    #[must_use]
    pub fn exposed_by<C: ?Sized + 'static>(mut self) -> Self {
        let contract = TypeKey::of::<C>();
        if !self.exposed_by.contains(&contract) {
            self.exposed_by.push(contract);
        }
        self
    }

    /// Declare an interceptor this member always carries
    #[must_use]
    pub fn intercepted_by(mut self, factory: InterceptorFactory) -> Self {
        self.declared.push(DeclaredInterceptor::Factory(factory));
        self
    }

    /// Declare an interceptor type provided through the registry
    #[must_use]
    pub fn intercepted_with<I: ?Sized + 'static>(mut self) -> Self {
        self.declared
            .push(DeclaredInterceptor::Provided(TypeKey::of::<I>()));
        self
    }

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn kind(&self) -> MemberKind {
        self.id.kind()
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    pub fn is_virtual(&self) -> bool {
        self.dispatch == Dispatch::Virtual
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }

    pub fn contracts(&self) -> &[TypeKey] {
        &self.exposed_by
    }

    pub fn is_exposed_by(&self, contract: TypeKey) -> bool {
        self.exposed_by.contains(&contract)
    }

    pub fn declared_interceptors(&self) -> &[DeclaredInterceptor] {
        &self.declared
    }

    /// Whether `selector` names this member, directly or through a contract
    pub fn is_selected_by(&self, selector: &MemberId) -> bool {
        self.id == *selector
            || (self.is_exposed_by(selector.declaring_type()) && self.id.same_signature(selector))
    }
}

/// Interceptable surface of a component type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_key: TypeKey,
    overridable: bool,
    members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    /// Descriptor of `T`; sealed until [`TypeDescriptor::overridable`] is called
    pub fn new<T: ?Sized + 'static>() -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            overridable: false,
            members: Vec::new(),
        }
    }

    /// The type embeds an interception slot
    #[must_use]
    pub fn overridable(mut self) -> Self {
        self.overridable = true;
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Add both accessors of property `name`, exposed by the same contracts
    #[must_use]
    pub fn property(self, getter: MemberDescriptor, setter: MemberDescriptor) -> Self {
        self.member(getter).member(setter)
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    pub fn find(&self, member: &MemberId) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.id() == member)
    }

    /// Members a selector can name on this type
    pub fn selected_by<'a>(
        &'a self,
        selector: &'a MemberId,
    ) -> impl Iterator<Item = &'a MemberDescriptor> + 'a {
        self.members.iter().filter(move |m| m.is_selected_by(selector))
    }

    /// Whether any member is part of contract `C`
    pub fn implements(&self, contract: TypeKey) -> bool {
        self.members.iter().any(|m| m.is_exposed_by(contract))
    }
}
