//! Shared test types for the application layer

#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use weft_application::pipeline::{Arguments, CallSite, ReturnValue, invoke};
use weft_application::{
    ForwardingProxy, InterceptionSlot, Interceptable, Interceptor, Invocation, MemberDescriptor,
    ProxyTarget, ProxyTargetAccessor, SharedInterceptor, TypeDescriptor,
};
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, RequestMetadata, TypeKey};

// ============================================================================
// Contracts
// ============================================================================

pub trait Arithmetic: ProxyTargetAccessor + Send + Sync {
    fn add(&self, a: i32, b: i32) -> Result<i32>;
    fn fail(&self) -> Result<i32>;
}

pub trait Pinger: ProxyTargetAccessor + Send + Sync {
    fn ping(&self) -> Result<String>;
}

pub fn add_member() -> MemberId {
    MemberId::method::<Calculator>("add")
}

pub fn fail_member() -> MemberId {
    MemberId::method::<Calculator>("fail")
}

pub fn describe_member() -> MemberId {
    MemberId::method::<Calculator>("describe")
}

// ============================================================================
// Overridable component
// ============================================================================

#[derive(Default)]
pub struct Calculator {
    slot: InterceptionSlot,
    body_calls: AtomicUsize,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, a: i32, b: i32) -> Result<i32> {
        self.slot.dispatch(
            self,
            &add_member(),
            Arguments::new().with(a).with(b),
            |this, args| {
                this.body_calls.fetch_add(1, Ordering::SeqCst);
                Ok(args.get::<i32>(0)? + args.get::<i32>(1)?)
            },
        )
    }

    pub fn fail(&self) -> Result<i32> {
        self.slot
            .dispatch(self, &fail_member(), Arguments::new(), |this, _| {
                this.body_calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::raised("calculator failure"))
            })
    }

    pub fn describe<T: Debug + Send + 'static>(&self, value: T) -> Result<String> {
        self.slot.dispatch_generic(
            self,
            &describe_member(),
            &[TypeKey::of::<T>()],
            Arguments::new().with(value),
            |this, args| {
                this.body_calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("{:?}", args.take::<T>(0)?))
            },
        )
    }

    pub fn body_calls(&self) -> usize {
        self.body_calls.load(Ordering::SeqCst)
    }
}

impl Interceptable for Calculator {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>()
            .overridable()
            .member(MemberDescriptor::method::<Self>("add").exposed_by::<dyn Arithmetic>())
            .member(MemberDescriptor::method::<Self>("fail").exposed_by::<dyn Arithmetic>())
            .member(MemberDescriptor::method::<Self>("describe").generic())
    }

    fn interception_slot(&self) -> Option<&InterceptionSlot> {
        Some(&self.slot)
    }
}

impl ProxyTargetAccessor for Calculator {
    fn proxy_target(&self) -> Option<ProxyTarget> {
        self.slot.proxy_target()
    }
}

impl Arithmetic for Calculator {
    fn add(&self, a: i32, b: i32) -> Result<i32> {
        Calculator::add(self, a, b)
    }

    fn fail(&self) -> Result<i32> {
        Calculator::fail(self)
    }
}

pub struct ArithmeticProxy(pub ForwardingProxy<dyn Arithmetic>);

impl Arithmetic for ArithmeticProxy {
    fn add(&self, a: i32, b: i32) -> Result<i32> {
        self.0.call(
            &MemberId::method::<dyn Arithmetic>("add"),
            Arguments::new().with(a).with(b),
            |target, args| target.add(*args.get::<i32>(0)?, *args.get::<i32>(1)?),
        )
    }

    fn fail(&self) -> Result<i32> {
        self.0.call(
            &MemberId::method::<dyn Arithmetic>("fail"),
            Arguments::new(),
            |target, _| target.fail(),
        )
    }
}

impl ProxyTargetAccessor for ArithmeticProxy {
    fn proxy_target(&self) -> Option<ProxyTarget> {
        Some(self.0.proxy_target())
    }
}

pub fn arithmetic_backend(proxy: ForwardingProxy<dyn Arithmetic>) -> Arc<dyn Arithmetic> {
    Arc::new(ArithmeticProxy(proxy))
}

// ============================================================================
// Sealed component with a non-virtual member
// ============================================================================

#[derive(Default)]
pub struct SealedPinger;

impl Interceptable for SealedPinger {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>().member(
            MemberDescriptor::method::<Self>("ping")
                .non_virtual()
                .exposed_by::<dyn Pinger>(),
        )
    }
}

impl ProxyTargetAccessor for SealedPinger {}

impl Pinger for SealedPinger {
    fn ping(&self) -> Result<String> {
        Ok("pong".to_string())
    }
}

/// Component without interceptable members
#[derive(Default)]
pub struct Plain;

impl Interceptable for Plain {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>()
    }
}

// ============================================================================
// Interceptor doubles
// ============================================================================

/// Writes `label:before` / `label:after` around proceeding
pub struct Recording {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    pub fn new(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log: Arc::clone(log),
        }
    }
}

impl Interceptor for Recording {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        self.log.lock().unwrap().push(format!("{}:before", self.label));
        let outcome = invocation.proceed();
        self.log.lock().unwrap().push(format!("{}:after", self.label));
        outcome
    }
}

/// Counts calls and proceeds
#[derive(Clone, Default)]
pub struct Counting {
    count: Arc<AtomicUsize>,
}

impl Counting {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Interceptor for Counting {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        invocation.proceed()
    }
}

pub fn shared<I: Interceptor + 'static>(interceptor: I) -> SharedInterceptor {
    Arc::new(interceptor)
}

pub fn new_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Run `chain` for a `Calculator::add` call site around `terminal`
pub fn run_chain<F>(chain: &[SharedInterceptor], arguments: Arguments, mut terminal: F) -> Result<Option<ReturnValue>>
where
    F: FnMut(&mut Arguments) -> Result<ReturnValue>,
{
    let request = RequestMetadata::for_types::<Calculator, Calculator>();
    let member = add_member();
    let target = Calculator::new();
    invoke(
        CallSite::new(&request, &member, &target, &[]),
        chain,
        arguments,
        &mut terminal,
    )
}
