//! Proxy Planner
//!
//! Decides, for one resolution, which members are intercepted and which
//! strategy the proxy uses:
//!
//! - a resolution through a service contract always gets a forwarding proxy
//! - a self-bound resolution gets the override strategy, which requires an
//!   overridable type whose matched members are all virtual
//!
//! Anything else that matched is a planning failure, including a contract
//! resolution whose only matched members are not exposed by the contract. An
//! object is left unproxied only when nothing matched at all.

use std::collections::BTreeMap;

use tracing::debug;
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, ProxyStrategy, RequestMetadata, TypeKey};

use crate::ports::interceptable::{MemberDescriptor, TypeDescriptor};
use crate::ports::interceptor::InterceptorFactory;
use crate::registry::BindingRegistry;

/// A member selected for interception and its ordered chain
#[derive(Debug, Clone)]
pub struct PlannedMember {
    descriptor: MemberDescriptor,
    interceptors: Vec<InterceptorFactory>,
}

impl PlannedMember {
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    pub fn interceptors(&self) -> &[InterceptorFactory] {
        &self.interceptors
    }
}

/// Complete, immutable interception plan for one resolution shape
#[derive(Debug, Clone)]
pub struct ProxyPlan {
    request: RequestMetadata,
    strategy: ProxyStrategy,
    members: BTreeMap<MemberId, PlannedMember>,
}

impl ProxyPlan {
    pub fn request(&self) -> &RequestMetadata {
        &self.request
    }

    pub fn service(&self) -> TypeKey {
        self.request.service()
    }

    pub fn implementation(&self) -> TypeKey {
        self.request.implementation()
    }

    pub fn strategy(&self) -> ProxyStrategy {
        self.strategy
    }

    pub fn members(&self) -> impl Iterator<Item = (&MemberId, &PlannedMember)> {
        self.members.iter()
    }

    /// Intercepted member identities, sorted
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.keys().copied().collect()
    }

    pub fn chain_for(&self, member: &MemberId) -> Option<&[InterceptorFactory]> {
        self.members
            .get(member)
            .map(|planned| planned.interceptors.as_slice())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Stateless planner; all inputs come from the descriptor and the registry
#[derive(Debug, Default, Clone, Copy)]
pub struct ProxyPlanner;

impl ProxyPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan the proxy for `request`, or `None` when no member matches
    pub fn plan(
        &self,
        request: &RequestMetadata,
        descriptor: &TypeDescriptor,
        registry: &BindingRegistry,
    ) -> Result<Option<ProxyPlan>> {
        let self_bound = request.is_self_bound();
        let mut members = BTreeMap::new();
        let mut non_virtual = Vec::new();
        let mut unreachable = Vec::new();

        for member in descriptor.members() {
            let chain = registry.resolve(&request.for_member(*member.id()), member)?;
            if chain.is_empty() {
                continue;
            }
            // a contract proxy can only reach members the contract exposes
            if !self_bound && !member.is_exposed_by(request.service()) {
                unreachable.push(*member.id());
                continue;
            }
            if !member.is_virtual() {
                non_virtual.push(*member.id());
            }
            members.insert(
                *member.id(),
                PlannedMember {
                    descriptor: member.clone(),
                    interceptors: chain,
                },
            );
        }

        if members.is_empty() {
            return match unreachable.first() {
                Some(member) => Err(Error::planning(
                    descriptor.type_key().name(),
                    format!(
                        "{member} matched an interceptor binding but is not exposed by {}, the service it is resolved through",
                        request.service()
                    ),
                )),
                None => Ok(None),
            };
        }
        if !unreachable.is_empty() {
            debug!(
                service = %request.service(),
                members = ?unreachable,
                "matched members outside the service contract are not intercepted"
            );
        }

        let strategy = if self_bound {
            if let Some(member) = non_virtual.first() {
                return Err(Error::planning(
                    descriptor.type_key().name(),
                    format!(
                        "{member} is non-virtual and {} is resolved as itself; resolve it through a service contract to intercept it",
                        descriptor.type_key()
                    ),
                ));
            }
            if !descriptor.is_overridable() {
                return Err(Error::planning(
                    descriptor.type_key().name(),
                    "type is sealed (no interception slot) and is resolved as itself",
                ));
            }
            ProxyStrategy::Override
        } else {
            ProxyStrategy::Forwarding
        };

        debug!(
            service = %request.service(),
            implementation = %request.implementation(),
            %strategy,
            members = members.len(),
            "planned proxy"
        );

        Ok(Some(ProxyPlan {
            request: request.clone(),
            strategy,
            members,
        }))
    }
}
