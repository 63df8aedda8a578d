//! Kernel tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use weft_application::{
    Arguments, ForwardingProxy, InterceptionSlot, Interceptable, InterceptorFactory, MemberDescriptor,
    ProxyTarget, ProxyTargetAccessor, TypeDescriptor,
};
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, ProxyStrategy};
use weft_infrastructure::config::{AppConfig, EngineConfig};
use weft_infrastructure::kernel::{Kernel, Scope, ServiceBinding};

trait Greeter: ProxyTargetAccessor + Send + Sync {
    fn greet(&self, name: &str) -> Result<String>;
}

#[derive(Default)]
struct English {
    slot: InterceptionSlot,
    salutation: String,
}

impl English {
    fn new(salutation: &str) -> Self {
        Self {
            slot: InterceptionSlot::new(),
            salutation: salutation.to_string(),
        }
    }

    fn greet(&self, name: &str) -> Result<String> {
        self.slot.dispatch(
            self,
            &greet_member(),
            Arguments::new().with(name.to_string()),
            |this, args| Ok(format!("{}, {}", this.salutation, args.get::<String>(0)?)),
        )
    }
}

fn greet_member() -> MemberId {
    MemberId::method::<English>("greet")
}

impl Interceptable for English {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>()
            .overridable()
            .member(MemberDescriptor::method::<Self>("greet").exposed_by::<dyn Greeter>())
    }

    fn interception_slot(&self) -> Option<&InterceptionSlot> {
        Some(&self.slot)
    }
}

impl ProxyTargetAccessor for English {
    fn proxy_target(&self) -> Option<ProxyTarget> {
        self.slot.proxy_target()
    }
}

impl Greeter for English {
    fn greet(&self, name: &str) -> Result<String> {
        English::greet(self, name)
    }
}

struct GreeterProxy(ForwardingProxy<dyn Greeter>);

impl Greeter for GreeterProxy {
    fn greet(&self, name: &str) -> Result<String> {
        self.0.call(
            &MemberId::method::<dyn Greeter>("greet"),
            Arguments::new().with(name.to_string()),
            |target, args| target.greet(args.get::<String>(0)?),
        )
    }
}

impl ProxyTargetAccessor for GreeterProxy {
    fn proxy_target(&self) -> Option<ProxyTarget> {
        Some(self.0.proxy_target())
    }
}

fn as_greeter(english: Arc<English>) -> Arc<dyn Greeter> {
    english
}

fn greeter_backend(proxy: ForwardingProxy<dyn Greeter>) -> Arc<dyn Greeter> {
    Arc::new(GreeterProxy(proxy))
}

/// Dependent component pulling a `dyn Greeter` from the kernel
struct Welcome {
    greeter: Arc<dyn Greeter>,
}

impl Interceptable for Welcome {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>()
    }
}

fn english_kernel() -> Kernel {
    let mut kernel = Kernel::new();
    kernel.register_proxy::<dyn Greeter, _>(greeter_backend);
    kernel
        .bind(
            ServiceBinding::<dyn Greeter>::to(
                |ctx| Ok(English::new(&ctx.argument::<String>("salutation")?)),
                as_greeter,
            )
            .with_constructor_argument("salutation", "Hello".to_string()),
        )
        .unwrap();
    kernel
}

#[test]
fn test_unbound_service_fails() {
    let kernel = Kernel::new();

    match kernel.get::<dyn Greeter>() {
        Err(Error::NotBound { service }) => assert!(service.contains("Greeter")),
        _ => panic!("Expected NotBound error"),
    }
}

#[test]
fn test_resolution_without_interceptors_is_unproxied() {
    let kernel = english_kernel();

    let greeter = kernel.get::<dyn Greeter>().unwrap();

    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada");
    assert!(!greeter.is_proxy());
}

#[test]
fn test_binding_twice_fails_and_rebind_replaces() {
    let mut kernel = english_kernel();

    let again = kernel.bind(ServiceBinding::<dyn Greeter>::to(|_| Ok(English::new("Hi")), as_greeter));
    assert!(matches!(again, Err(Error::Registration { .. })));

    kernel
        .rebind(ServiceBinding::<dyn Greeter>::to(|_| Ok(English::new("Hi")), as_greeter))
        .unwrap();
    assert_eq!(kernel.get::<dyn Greeter>().unwrap().greet("Bo").unwrap(), "Hi, Bo");
}

#[test]
fn test_member_interceptor_wraps_contract_resolution() {
    let mut kernel = english_kernel();
    kernel
        .intercept_after::<English, _>(greet_member(), |invocation| {
            let greeting = invocation.return_value::<String>().cloned().unwrap_or_default();
            invocation.set_return_value(format!("{greeting}!"));
        })
        .unwrap();

    let greeter = kernel.get::<dyn Greeter>().unwrap();

    assert_eq!(greeter.greet("Ada").unwrap(), "Hello, Ada!");
    let target = greeter.proxy_target().unwrap();
    assert_eq!(target.strategy(), ProxyStrategy::Forwarding);
    assert!(target.downcast::<English>().is_some());
}

#[test]
fn test_self_binding_uses_override_strategy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let mut kernel = Kernel::new();
    kernel
        .bind(ServiceBinding::<English>::to_self(|_| Ok(English::new("Hey"))))
        .unwrap();
    kernel
        .intercept_before::<English, _>(greet_member(), move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let english = kernel.get::<English>().unwrap();

    assert_eq!(english.greet("Cy").unwrap(), "Hey, Cy");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(english.proxy_target().unwrap().strategy(), ProxyStrategy::Override);
}

#[test]
fn test_binding_level_interceptor_is_dropped_on_rebind() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let mut kernel = Kernel::new();
    kernel
        .bind(
            ServiceBinding::<English>::to_self(|_| Ok(English::new("Yo"))).intercept_with(
                InterceptorFactory::shared(weft_application::BeforeInterceptor::new(move |_| {
                    counted.fetch_add(1, Ordering::SeqCst);
                })),
            ),
        )
        .unwrap();

    kernel.get::<English>().unwrap().greet("A").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(kernel.engine().registry().len(), 1);

    kernel
        .rebind(ServiceBinding::<English>::to_self(|_| Ok(English::new("Yo"))))
        .unwrap();
    let plain = kernel.get::<English>().unwrap();
    plain.greet("B").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!plain.is_proxy());
    assert!(kernel.engine().registry().is_empty());
}

#[test]
fn test_singleton_scope_reuses_delivered_instance() {
    let mut kernel = Kernel::new();
    kernel.register_proxy::<dyn Greeter, _>(greeter_backend);
    kernel
        .bind(ServiceBinding::<dyn Greeter>::to(|_| Ok(English::new("Hello")), as_greeter).in_singleton_scope())
        .unwrap();
    kernel
        .intercept(|_| true, InterceptorFactory::shared(weft_application::AroundInterceptor::new(|i| i.proceed())))
        .unwrap();

    let first = kernel.get::<dyn Greeter>().unwrap();
    let second = kernel.get::<dyn Greeter>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.is_proxy());
}

#[test]
fn test_transient_scope_creates_new_instances() {
    let mut kernel = Kernel::new();
    kernel
        .bind(ServiceBinding::<English>::to_self(|_| Ok(English::new("Hi"))).in_scope(Scope::Transient))
        .unwrap();

    let first = kernel.get::<English>().unwrap();
    let second = kernel.get::<English>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_resolving_itself_is_a_cycle() {
    let mut kernel = Kernel::new();
    kernel
        .bind(
            ServiceBinding::<Welcome>::to_self(|ctx| {
                let inner = ctx.get::<Welcome>()?;
                Ok(Welcome {
                    greeter: Arc::clone(&inner.greeter),
                })
            })
            .in_singleton_scope(),
        )
        .unwrap();

    match kernel.get::<Welcome>() {
        Err(Error::Registration { message }) => {
            assert!(message.contains("cyclic dependency"));
            assert!(message.contains("Welcome"));
        }
        _ => panic!("Expected Registration error"),
    }
}

#[test]
fn test_transient_cycle_is_reported_and_kernel_stays_usable() {
    let mut kernel = english_kernel();
    kernel
        .bind(ServiceBinding::<Welcome>::to_self(|ctx| {
            ctx.get::<Welcome>()?;
            Ok(Welcome {
                greeter: ctx.get::<dyn Greeter>()?,
            })
        }))
        .unwrap();

    assert!(matches!(kernel.get::<Welcome>(), Err(Error::Registration { .. })));
    assert_eq!(kernel.get::<dyn Greeter>().unwrap().greet("Bo").unwrap(), "Hello, Bo");
}

#[test]
fn test_constructor_resolves_dependencies() {
    let mut kernel = english_kernel();
    kernel
        .bind(ServiceBinding::<Welcome>::to_self(|ctx| {
            Ok(Welcome {
                greeter: ctx.get::<dyn Greeter>()?,
            })
        }))
        .unwrap();

    let welcome = kernel.get::<Welcome>().unwrap();

    assert_eq!(welcome.greeter.greet("Di").unwrap(), "Hello, Di");
}

#[test]
fn test_missing_constructor_argument() {
    let mut kernel = Kernel::new();
    kernel
        .bind(ServiceBinding::<English>::to_self(|ctx| {
            Ok(English::new(&ctx.argument::<String>("salutation")?))
        }))
        .unwrap();

    match kernel.get::<English>() {
        Err(Error::MissingConstructorArgument { name, .. }) => assert_eq!(name, "salutation"),
        _ => panic!("Expected MissingConstructorArgument error"),
    }
}

#[test]
fn test_constructor_arguments_reach_request_metadata() {
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_predicate = Arc::clone(&seen);
    let mut kernel = english_kernel();
    kernel
        .intercept(
            move |request| {
                let matched = request.has_constructor_argument("salutation");
                if matched {
                    seen_in_predicate.fetch_add(1, Ordering::SeqCst);
                }
                matched
            },
            InterceptorFactory::shared(weft_application::AroundInterceptor::new(|i| i.proceed())),
        )
        .unwrap();

    let greeter = kernel.get::<dyn Greeter>().unwrap();

    assert!(greeter.is_proxy());
    assert!(seen.load(Ordering::SeqCst) > 0);
}

#[test]
fn test_kernel_from_config_disables_plan_cache() {
    let config = AppConfig {
        engine: EngineConfig {
            cache_plans: false,
            ..EngineConfig::default()
        },
        ..AppConfig::default()
    };
    let mut kernel = Kernel::with_config(&config);
    kernel
        .bind(ServiceBinding::<English>::to_self(|_| Ok(English::default())))
        .unwrap();

    kernel.get::<English>().unwrap();

    assert!(!kernel.engine().options().cache_plans);
    assert_eq!(kernel.engine().cached_plan_count(), 0);
}
