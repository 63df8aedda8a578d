//! Tests for request metadata

use weft_domain::value_objects::{MemberId, RequestMetadata, TypeKey};

struct Mock;
trait Service {}

#[test]
fn test_self_bound_request() {
    let request = RequestMetadata::for_types::<Mock, Mock>();

    assert!(request.is_self_bound());
    assert!(request.requests::<Mock>());
    assert!(request.is_implemented_by::<Mock>());
    assert!(request.member().is_none());
}

#[test]
fn test_service_request_is_not_self_bound() {
    let request = RequestMetadata::for_types::<dyn Service, Mock>();

    assert!(!request.is_self_bound());
    assert_eq!(request.service(), TypeKey::of::<dyn Service>());
    assert_eq!(request.implementation(), TypeKey::of::<Mock>());
}

#[test]
fn test_for_member_narrows_without_changing_types() {
    let request = RequestMetadata::for_types::<Mock, Mock>().with_constructor_arguments(["myProperty"]);
    let member = MemberId::method::<Mock>("get_my_property");

    let narrowed = request.for_member(member);

    assert_eq!(narrowed.member(), Some(&member));
    assert_eq!(narrowed.service(), request.service());
    assert!(narrowed.has_constructor_argument("myProperty"));
    assert!(request.member().is_none());
    assert_ne!(narrowed, request);
}
