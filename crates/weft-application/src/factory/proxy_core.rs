//! Per-proxy interception state shared by both strategies

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, ProxyStrategy, RequestMetadata, TypeKey};

use crate::pipeline::{self, Arguments, CallSite, ReturnValue};
use crate::planner::ProxyPlan;
use crate::ports::interceptor::SharedInterceptor;
use crate::ports::proxy::ProxyTarget;

struct MemberChain {
    member: MemberId,
    interceptors: Vec<SharedInterceptor>,
}

/// Instantiated chains of one proxy, keyed by the member identities callers
/// use to reach them
pub struct ProxyCore {
    request: RequestMetadata,
    strategy: ProxyStrategy,
    chains: HashMap<MemberId, Arc<MemberChain>>,
}

impl ProxyCore {
    /// Instantiate every interceptor of `plan` for a new proxy.
    ///
    /// Forwarding proxies are called with contract member identities, so
    /// their chains are reachable under both the implementation identity and
    /// the identity rebased onto the service contract.
    pub(crate) fn from_plan(plan: &ProxyPlan) -> Self {
        let request = plan.request().clone();
        let mut chains = HashMap::new();
        for (member, planned) in plan.members() {
            let member_request = request.for_member(*member);
            let chain = Arc::new(MemberChain {
                member: *member,
                interceptors: planned
                    .interceptors()
                    .iter()
                    .map(|factory| factory.create(&member_request))
                    .collect(),
            });
            if plan.strategy() == ProxyStrategy::Forwarding {
                chains.insert(member.rebased(plan.service()), Arc::clone(&chain));
            }
            chains.insert(*member, chain);
        }
        Self {
            request,
            strategy: plan.strategy(),
            chains,
        }
    }

    /// Route one call: through the pipeline when `member` is intercepted,
    /// straight into `body` otherwise.
    pub(crate) fn call<T, R, F>(
        &self,
        target: &T,
        target_any: &(dyn Any + Send + Sync),
        member: &MemberId,
        type_arguments: &[TypeKey],
        arguments: Arguments,
        body: F,
    ) -> Result<R>
    where
        T: ?Sized,
        R: Any + Send + Default,
        F: FnOnce(&T, &mut Arguments) -> Result<R>,
    {
        let Some(chain) = self.chains.get(member) else {
            let mut arguments = arguments;
            return body(target, &mut arguments);
        };

        let mut body = Some(body);
        let mut terminal = |arguments: &mut Arguments| -> Result<ReturnValue> {
            let body = body
                .take()
                .ok_or_else(|| Error::internal("target member reached twice in one call"))?;
            let value = body(target, arguments)?;
            Ok(Box::new(value) as ReturnValue)
        };

        let site = CallSite::new(&self.request, &chain.member, target_any, type_arguments);
        let value = pipeline::invoke(site, &chain.interceptors, arguments, &mut terminal)?;
        pipeline::into_return::<R>(&chain.member, value)
    }

    pub fn request(&self) -> &RequestMetadata {
        &self.request
    }

    pub fn strategy(&self) -> ProxyStrategy {
        self.strategy
    }

    pub fn intercepts(&self, member: &MemberId) -> bool {
        self.chains.contains_key(member)
    }

    pub(crate) fn proxy_target(&self, target: Arc<dyn Any + Send + Sync>) -> ProxyTarget {
        ProxyTarget::new(
            self.request.service(),
            self.request.implementation(),
            self.strategy,
            target,
        )
    }
}

impl fmt::Debug for ProxyCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCore")
            .field("request", &self.request)
            .field("strategy", &self.strategy)
            .field("members", &self.chains.len())
            .finish()
    }
}
