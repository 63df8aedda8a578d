//! Interceptor Binding Registry
//!
//! Stores the rules that decide which members are intercepted and by which
//! ordered chain. The registry belongs to one engine configuration; nothing
//! here is process wide.
//!
//! ## Resolution order
//!
//! For one member of one resolution the chain is:
//!
//! 1. interceptors the member declares itself, in declaration order
//! 2. every matching registered binding, sorted by `(order, registration)`
//!
//! The resulting order is the execution order, outermost first.

mod binding;

pub use binding::{BindingId, BindingRule, InterceptorBinding, MemberPredicate, RequestPredicate};

use std::any::Any;
use std::collections::HashMap;

use tracing::debug;
use weft_domain::constants::DEFAULT_BINDING_ORDER;
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, RequestMetadata, TypeKey};

use crate::adapters::{AfterInterceptor, AroundInterceptor, BeforeInterceptor, ReplaceInterceptor};
use crate::pipeline::Invocation;
use crate::ports::interceptable::{DeclaredInterceptor, Interceptable, MemberDescriptor};
use crate::ports::interceptor::{Interceptor, InterceptorFactory};

/// Ordered collection of interceptor bindings
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<InterceptorBinding>,
    providers: HashMap<TypeKey, InterceptorFactory>,
    next_sequence: u64,
    deduplicate: bool,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse repeated handles of the same factory when resolving
    #[must_use]
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    /// Register `factories` under `rule`.
    ///
    /// Every call adds a binding; nothing is ever replaced.
    pub fn register(
        &mut self,
        rule: BindingRule,
        factories: Vec<InterceptorFactory>,
        order: i32,
    ) -> Result<BindingId> {
        if factories.is_empty() {
            return Err(Error::registration(format!(
                "binding {rule:?} needs at least one interceptor"
            )));
        }
        let id = BindingId::new(self.next_sequence);
        self.next_sequence += 1;
        debug!(binding = id.sequence(), ?rule, order, interceptors = factories.len(), "registered interceptor binding");
        self.bindings
            .push(InterceptorBinding::new(id, rule, factories, order));
        Ok(id)
    }

    /// Drop a binding; returns whether it was registered
    pub fn remove(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.id() != id);
        before != self.bindings.len()
    }

    /// Bind `factory` to one member of `T`.
    ///
    /// The selector is checked against `T`'s descriptor immediately; it may
    /// name the member on `T` itself or on a contract exposing it.
    pub fn bind_member<T: Interceptable>(
        &mut self,
        member: MemberId,
        factory: InterceptorFactory,
    ) -> Result<BindingId> {
        self.bind_member_ordered::<T>(member, factory, DEFAULT_BINDING_ORDER)
    }

    pub fn bind_member_ordered<T: Interceptable>(
        &mut self,
        member: MemberId,
        factory: InterceptorFactory,
        order: i32,
    ) -> Result<BindingId> {
        validate_selector::<T>(&member)?;
        self.register(BindingRule::Member(member), vec![factory], order)
    }

    /// Bind `factory` to every member of resolutions accepted by `predicate`
    pub fn bind_request<P>(&mut self, predicate: P, factory: InterceptorFactory) -> Result<BindingId>
    where
        P: Fn(&RequestMetadata) -> bool + Send + Sync + 'static,
    {
        self.register(
            BindingRule::request(predicate),
            vec![factory],
            DEFAULT_BINDING_ORDER,
        )
    }

    /// Bind `factory` to the members accepted by `predicate`
    pub fn bind_members<P>(&mut self, predicate: P, factory: InterceptorFactory) -> Result<BindingId>
    where
        P: Fn(&RequestMetadata, &MemberDescriptor) -> bool + Send + Sync + 'static,
    {
        self.register(
            BindingRule::members(predicate),
            vec![factory],
            DEFAULT_BINDING_ORDER,
        )
    }

    /// Run `action` before `member` of `T`
    pub fn bind_before<T, F>(&mut self, member: MemberId, action: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&mut Invocation<'_>) + Send + Sync + 'static,
    {
        self.bind_member::<T>(member, InterceptorFactory::shared(BeforeInterceptor::new(action)))
    }

    /// Run `action` after `member` of `T` returned
    pub fn bind_after<T, F>(&mut self, member: MemberId, action: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&mut Invocation<'_>) + Send + Sync + 'static,
    {
        self.bind_member::<T>(member, InterceptorFactory::shared(AfterInterceptor::new(action)))
    }

    /// Replace `member` of `T` by `function`
    pub fn bind_replace<T, F, R>(&mut self, member: MemberId, function: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&Invocation<'_>) -> Result<R> + Send + Sync + 'static,
        R: Any + Send,
    {
        self.bind_member::<T>(
            member,
            InterceptorFactory::shared(ReplaceInterceptor::new(function)),
        )
    }

    /// Run `action` instead of `member` of `T`; the action proceeds only if
    /// it calls [`Invocation::proceed`] itself
    pub fn add_method_interceptor<T, F>(&mut self, member: MemberId, action: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.bind_member::<T>(member, InterceptorFactory::shared(AroundInterceptor::new(action)))
    }

    /// Supply the factory behind `intercepted_with::<I>()` declarations.
    ///
    /// Each interceptor type has at most one provider; a second one for the
    /// same type is rejected.
    pub fn provide_interceptor<I: Interceptor + ?Sized + 'static>(&mut self, factory: InterceptorFactory) -> Result<()> {
        let key = TypeKey::of::<I>();
        if self.providers.contains_key(&key) {
            return Err(Error::registration(format!("interceptor {key} already has a provider")));
        }
        debug!(interceptor = %key, "registered declared interceptor provider");
        self.providers.insert(key, factory);
        Ok(())
    }

    /// Ordered interceptor factories for `member` in `request`
    pub fn resolve(
        &self,
        request: &RequestMetadata,
        member: &MemberDescriptor,
    ) -> Result<Vec<InterceptorFactory>> {
        let mut chain = Vec::new();
        for declared in member.declared_interceptors() {
            match declared {
                DeclaredInterceptor::Factory(factory) => chain.push(factory.clone()),
                DeclaredInterceptor::Provided(key) => {
                    let factory = self.providers.get(key).ok_or_else(|| {
                        Error::missing_interceptor_provider(key.name(), member.id().to_string())
                    })?;
                    chain.push(factory.clone());
                }
            }
        }

        let mut matched: Vec<&InterceptorBinding> = self
            .bindings
            .iter()
            .filter(|binding| binding.matches(request, member))
            .collect();
        matched.sort_by_key(|binding| (binding.order(), binding.id()));
        chain.extend(
            matched
                .into_iter()
                .flat_map(|binding| binding.factories().iter().cloned()),
        );

        if self.deduplicate {
            let mut unique: Vec<InterceptorFactory> = Vec::with_capacity(chain.len());
            for factory in chain {
                if !unique.iter().any(|kept| kept.same_as(&factory)) {
                    unique.push(factory);
                }
            }
            chain = unique;
        }
        Ok(chain)
    }

    pub fn bindings(&self) -> &[InterceptorBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn validate_selector<T: Interceptable>(member: &MemberId) -> Result<()> {
    let descriptor = T::descriptor();
    let declaring = member.declaring_type();
    if declaring != descriptor.type_key() && !descriptor.implements(declaring) {
        return Err(Error::invalid_selector(format!(
            "{member} is declared on {declaring}, which {} neither is nor implements",
            descriptor.type_key()
        )));
    }
    if descriptor.selected_by(member).next().is_none() {
        return Err(Error::invalid_selector(format!(
            "{} has no interceptable member {member}",
            descriptor.type_key()
        )));
    }
    Ok(())
}
