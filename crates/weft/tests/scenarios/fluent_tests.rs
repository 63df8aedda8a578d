//! Before / after / replace / add-method-interceptor scenarios on `Mock`

use std::sync::{Arc, Mutex};

use weft::prelude::*;

use crate::fixtures::{CountInterceptor, Mock, OrderInterceptor, mock_kernel, new_log};

fn captured() -> Arc<Mutex<String>> {
    Arc::new(Mutex::new("empty".to_string()))
}

#[test]
fn test_unintercepted_mock_reads_backing_value() {
    let kernel = mock_kernel();

    let mock = kernel.get::<Mock>().unwrap();

    assert_eq!(mock.my_property().unwrap(), "start");
    assert_eq!(mock.get_my_property().unwrap(), "start");
    assert!(!mock.is_proxy());
}

#[test]
fn test_replace_changes_result_but_not_state() {
    let mut kernel = mock_kernel();
    kernel
        .intercept_replace::<Mock, _, _>(Mock::get_my_property_member(), |_| Ok("intercepted".to_string()))
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();

    assert_eq!(mock.my_property().unwrap(), "start");
    assert_eq!(mock.get_my_property().unwrap(), "intercepted");
}

#[test]
fn test_before_observes_pre_call_state() {
    let seen = captured();
    let seen_in_action = Arc::clone(&seen);
    let mut kernel = mock_kernel();
    kernel
        .intercept_before::<Mock, _>(Mock::set_my_property_member(), move |invocation| {
            if let Some(mock) = invocation.target::<Mock>() {
                *seen_in_action.lock().unwrap() = mock.raw_property();
            }
        })
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();
    assert_eq!(mock.my_property().unwrap(), "start");
    assert_eq!(*seen.lock().unwrap(), "empty");

    mock.set_my_property("end").unwrap();

    assert_eq!(mock.my_property().unwrap(), "end");
    assert_eq!(*seen.lock().unwrap(), "start");
}

#[test]
fn test_after_observes_post_call_state() {
    let seen = captured();
    let seen_in_action = Arc::clone(&seen);
    let mut kernel = mock_kernel();
    kernel
        .intercept_after::<Mock, _>(Mock::set_my_property_member(), move |invocation| {
            if let Some(mock) = invocation.target::<Mock>() {
                *seen_in_action.lock().unwrap() = mock.raw_property();
            }
        })
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();
    assert_eq!(*seen.lock().unwrap(), "empty");

    mock.set_my_property("end").unwrap();

    assert_eq!(mock.my_property().unwrap(), "end");
    assert_eq!(*seen.lock().unwrap(), "end");
}

#[test]
fn test_method_interceptor_without_proceed_skips_member() {
    let seen = captured();
    let seen_in_action = Arc::clone(&seen);
    let mut kernel = mock_kernel();
    kernel
        .add_method_interceptor::<Mock, _>(Mock::set_my_property_member(), move |_| {
            *seen_in_action.lock().unwrap() = "intercepted".to_string();
            Ok(())
        })
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();
    mock.set_my_property("dummy").unwrap();

    assert_eq!(mock.my_property().unwrap(), "start");
    assert_eq!(*seen.lock().unwrap(), "intercepted");
}

#[test]
fn test_method_interceptor_can_resume() {
    let seen = captured();
    let seen_in_action = Arc::clone(&seen);
    let mut kernel = mock_kernel();
    kernel
        .add_method_interceptor::<Mock, _>(Mock::set_my_property_member(), move |invocation| {
            *seen_in_action.lock().unwrap() = "intercepted".to_string();
            invocation.proceed()
        })
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();
    mock.set_my_property("dummy").unwrap();

    assert_eq!(mock.my_property().unwrap(), "dummy");
    assert_eq!(*seen.lock().unwrap(), "intercepted");
}

#[test]
fn test_interceptors_run_as_onion_in_registration_order() {
    let log = new_log();
    let counter = CountInterceptor::default();
    let mut kernel = mock_kernel();
    kernel
        .intercept_member::<Mock>(Mock::get_my_property_member(), OrderInterceptor::factory("a", &log))
        .unwrap();
    kernel
        .intercept_member::<Mock>(Mock::get_my_property_member(), OrderInterceptor::factory("b", &log))
        .unwrap();
    kernel
        .intercept_member::<Mock>(Mock::get_my_property_member(), counter.factory())
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();
    mock.get_my_property().unwrap();
    mock.get_my_property().unwrap();

    assert_eq!(counter.count(), 2);
    assert_eq!(
        log.lock().unwrap()[..4],
        ["a:before", "b:before", "b:after", "a:after"]
    );
    assert_eq!(log.lock().unwrap().len(), 8);
}

#[test]
fn test_property_accessors_are_intercepted() {
    let counter = CountInterceptor::default();
    let mut kernel = mock_kernel();
    kernel
        .intercept_member::<Mock>(Mock::my_property_getter(), counter.factory())
        .unwrap();
    kernel
        .intercept_member::<Mock>(Mock::my_property_setter(), counter.factory())
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();
    mock.assign_my_property("changed").unwrap();
    let value = mock.my_property().unwrap();

    assert_eq!(value, "changed");
    assert_eq!(counter.count(), 2);
    mock.get_my_property().unwrap();
    assert_eq!(counter.count(), 2);
}

#[test]
fn test_replace_error_surfaces_as_member_error() {
    let mut kernel = mock_kernel();
    kernel
        .intercept_replace::<Mock, _, String>(Mock::get_my_property_member(), |_| {
            Err(Error::raised("not today"))
        })
        .unwrap();

    let mock = kernel.get::<Mock>().unwrap();

    match mock.get_my_property() {
        Err(Error::Raised { message, .. }) => assert_eq!(message, "not today"),
        _ => panic!("Expected Raised error"),
    }
}
