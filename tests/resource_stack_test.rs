use learn_ngin::{DemoError, InitStage, ResourceStack};

use crate::common::test_utils::DropLog;

mod common;

#[test]
fn should_release_in_reverse_order_of_acquisition() {
    let log = DropLog::new();
    {
        let mut stack = ResourceStack::new();
        stack.push("engine", log.track("engine"));
        stack.push("swap chain", log.track("swap chain"));
        stack.push("material", log.track("material"));
        stack.push("renderable", log.track("renderable"));
        assert_eq!(stack.len(), 4);
        assert!(log.dropped().is_empty());
    }
    assert_eq!(
        log.dropped(),
        ["renderable", "material", "swap chain", "engine"]
    );
}

#[test]
fn should_release_each_resource_exactly_once() {
    let log = DropLog::new();
    let stack = {
        let mut stack = ResourceStack::new();
        for name in ["a", "b", "c"] {
            stack.push(name, log.track(name));
        }
        stack
    };
    // moving the stack around must not release anything
    let moved = stack;
    assert!(log.dropped().is_empty());
    drop(moved);
    assert_eq!(log.dropped(), ["c", "b", "a"]);
}

#[test]
fn failed_acquire_releases_what_came_before() {
    let log = DropLog::new();
    let result = (|| {
        let mut stack = ResourceStack::new();
        stack.push("window", log.track("window"));
        stack.push("surface", log.track("surface"));
        stack.acquire("device", || {
            Err::<u32, _>(DemoError::init(InitStage::Device, "no device"))
        })?;
        stack.push("swap chain", log.track("swap chain"));
        Ok::<_, DemoError>(stack)
    })();

    let error = result.err().expect("acquire should have failed");
    assert_eq!(error.exit_code(), 1);
    assert!(matches!(
        error,
        DemoError::Initialization {
            stage: InitStage::Device,
            ..
        }
    ));
    assert_eq!(log.dropped(), ["surface", "window"]);
}

#[test]
fn successful_acquire_pushes_the_value() {
    let mut stack = ResourceStack::new();
    let handle = stack.acquire("answer", || Ok(42u32)).unwrap();
    assert_eq!(stack.get(handle), Some(&42));
    assert_eq!(stack.labels().collect::<Vec<_>>(), ["answer"]);
}

#[test]
fn handles_resolve_to_their_value() {
    let mut stack = ResourceStack::new();
    let name = stack.push("name", String::from("cube"));
    let count = stack.push("count", 24u32);

    assert_eq!(stack.resolve(name).unwrap(), "cube");
    *stack.resolve_mut(count).unwrap() += 12;
    assert_eq!(*stack.resolve(count).unwrap(), 36);
}

#[test]
fn foreign_handle_is_rejected() {
    let mut other = ResourceStack::new();
    let _ = other.push("padding", 0u8);
    let foreign = other.push("text", String::from("not here"));

    let mut stack = ResourceStack::new();
    stack.push("number", 1u32);
    stack.push("float", 1.0f32);

    // index 1 exists but holds an f32
    assert!(stack.get(foreign).is_none());
    assert!(matches!(
        stack.resolve(foreign),
        Err(DemoError::InvalidHandle { kind: "String" })
    ));
}

#[test]
fn out_of_range_handle_is_rejected() {
    let mut other = ResourceStack::new();
    other.push("a", 1u32);
    let far = other.push("b", 2u32);

    let empty = ResourceStack::new();
    assert!(empty.is_empty());
    assert!(empty.resolve(far).is_err());
}
