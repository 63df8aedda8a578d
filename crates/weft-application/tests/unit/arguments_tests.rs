//! Argument list tests

use weft_application::Arguments;
use weft_domain::error::Error;

#[test]
fn test_typed_access() {
    let arguments = Arguments::new().with(7_i32).with("seven".to_string());

    assert_eq!(arguments.len(), 2);
    assert_eq!(*arguments.get::<i32>(0).unwrap(), 7);
    assert_eq!(arguments.get::<String>(1).unwrap(), "seven");
}

#[test]
fn test_type_mismatch_is_reported() {
    let arguments = Arguments::new().with(7_i32);

    match arguments.get::<String>(0) {
        Err(Error::Argument { index, message }) => {
            assert_eq!(index, 0);
            assert!(message.contains("String"));
        }
        _ => panic!("Expected Argument error"),
    }
}

#[test]
fn test_out_of_range_is_reported() {
    let arguments = Arguments::new();

    assert!(arguments.is_empty());
    assert!(matches!(
        arguments.get::<i32>(3),
        Err(Error::Argument { index: 3, .. })
    ));
}

#[test]
fn test_set_may_change_type() {
    let mut arguments = Arguments::new().with(1_u8);

    arguments.set(0, "replaced").unwrap();

    assert_eq!(*arguments.get::<&str>(0).unwrap(), "replaced");
}

#[test]
fn test_get_mut_mutates_in_place() {
    let mut arguments = Arguments::new().with(vec![1, 2]);

    arguments.get_mut::<Vec<i32>>(0).unwrap().push(3);

    assert_eq!(arguments.get::<Vec<i32>>(0).unwrap(), &vec![1, 2, 3]);
}

#[test]
fn test_take_consumes_slot() {
    let mut arguments = Arguments::new().with("value".to_string());

    assert_eq!(arguments.take::<String>(0).unwrap(), "value");

    match arguments.take::<String>(0) {
        Err(Error::Argument { message, .. }) => assert_eq!(message, "already consumed"),
        _ => panic!("Expected Argument error"),
    }
    assert!(arguments.get::<String>(0).is_err());
}

#[test]
fn test_take_with_wrong_type_keeps_value() {
    let mut arguments = Arguments::new().with(5_i64);

    assert!(arguments.take::<i32>(0).is_err());
    assert_eq!(arguments.take::<i64>(0).unwrap(), 5);
}
