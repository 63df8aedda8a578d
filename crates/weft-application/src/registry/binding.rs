//! Interceptor bindings

use std::fmt;
use std::sync::Arc;

use weft_domain::value_objects::{MemberId, RequestMetadata};

use crate::ports::interceptable::MemberDescriptor;
use crate::ports::interceptor::InterceptorFactory;

/// Predicate over the resolution being planned
pub type RequestPredicate = Arc<dyn Fn(&RequestMetadata) -> bool + Send + Sync>;

/// Predicate over the resolution and one candidate member
pub type MemberPredicate = Arc<dyn Fn(&RequestMetadata, &MemberDescriptor) -> bool + Send + Sync>;

/// Which members a binding applies to
#[derive(Clone)]
pub enum BindingRule {
    /// Exactly one member, validated when registered
    Member(MemberId),
    /// Every interceptable member of a matching resolution
    Request(RequestPredicate),
    /// Members accepted by a member-aware predicate
    Members(MemberPredicate),
}

impl BindingRule {
    pub fn request<P>(predicate: P) -> Self
    where
        P: Fn(&RequestMetadata) -> bool + Send + Sync + 'static,
    {
        Self::Request(Arc::new(predicate))
    }

    pub fn members<P>(predicate: P) -> Self
    where
        P: Fn(&RequestMetadata, &MemberDescriptor) -> bool + Send + Sync + 'static,
    {
        Self::Members(Arc::new(predicate))
    }

    pub fn matches(&self, request: &RequestMetadata, member: &MemberDescriptor) -> bool {
        match self {
            Self::Member(selector) => member.is_selected_by(selector),
            Self::Request(predicate) => predicate(request),
            Self::Members(predicate) => predicate(request, member),
        }
    }
}

impl fmt::Debug for BindingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(member) => f.debug_tuple("Member").field(member).finish(),
            Self::Request(_) => f.write_str("Request(<predicate>)"),
            Self::Members(_) => f.write_str("Members(<predicate>)"),
        }
    }
}

/// Registration handle, unique within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    pub(crate) fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A rule plus the ordered interceptors it contributes
#[derive(Debug, Clone)]
pub struct InterceptorBinding {
    id: BindingId,
    rule: BindingRule,
    factories: Vec<InterceptorFactory>,
    order: i32,
}

impl InterceptorBinding {
    pub(crate) fn new(
        id: BindingId,
        rule: BindingRule,
        factories: Vec<InterceptorFactory>,
        order: i32,
    ) -> Self {
        Self {
            id,
            rule,
            factories,
            order,
        }
    }

    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn rule(&self) -> &BindingRule {
        &self.rule
    }

    pub fn factories(&self) -> &[InterceptorFactory] {
        &self.factories
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn matches(&self, request: &RequestMetadata, member: &MemberDescriptor) -> bool {
        self.rule.matches(request, member)
    }
}
