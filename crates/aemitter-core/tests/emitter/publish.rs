//! Synchronous fan-out.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aemitter_core::{json, Emitter, EmitterError, Evented, Listener};

use super::support::Calls;

#[test]
fn test_publish_calls_listeners_in_order_per_publish() {
    let emitter = Emitter::new();
    let calls = Calls::new();

    emitter.subscribe("foo", calls.recorder("one"));
    emitter.subscribe("foo", calls.recorder("two"));

    emitter.publish("foo", &[json!(1)]).unwrap();
    emitter.publish("bar", &[json!(1)]).unwrap();
    emitter.publish("foo", &[json!(2)]).unwrap();

    assert_eq!(calls.take(), vec!["one:1", "two:1", "one:2", "two:2"]);
}

#[test]
fn test_publish_without_listeners_is_ok() {
    let emitter = Emitter::new();
    assert!(emitter.publish("nothing", &[json!(null)]).is_ok());
}

#[test]
fn test_once_fires_a_single_time() {
    let emitter = Emitter::new();
    let calls = Calls::new();

    emitter.subscribe_once("foo", calls.recorder("one"));

    emitter.publish("foo", &[json!(1)]).unwrap();
    emitter.publish("foo", &[json!(2)]).unwrap();
    emitter.publish("foo", &[json!(3)]).unwrap();
    emitter.publish("bar", &[json!(1)]).unwrap();

    assert_eq!(calls.take(), vec!["one:1"]);
    assert!(!emitter.has_listeners("foo"));
}

#[test]
fn test_once_keeps_persistent_duplicate() {
    let emitter = Emitter::new();
    let calls = Calls::new();
    let one = calls.recorder("one");

    emitter.subscribe("foo", one.clone());
    emitter.subscribe_once("foo", one.clone());

    emitter.publish("foo", &[]).unwrap();
    emitter.publish("foo", &[]).unwrap();

    assert_eq!(calls.take(), vec!["one", "one", "one"]);
    assert_eq!(emitter.listeners("foo"), vec![one]);
}

#[test]
fn test_listener_receives_emitting_instance() {
    let emitter = Emitter::new();
    let seen = Arc::new(Mutex::new(None));

    let slot = Arc::clone(&seen);
    emitter.on("foo", move |call| {
        *slot.lock().unwrap() = Some(call.emitter.clone());
        assert_eq!(call.event, "foo");
        assert!(!call.is_waterfall());
        Ok(())
    });
    emitter.publish("foo", &[]).unwrap();

    let context = seen.lock().unwrap().take().expect("listener ran");
    assert!(context.same(&emitter));
}

#[test]
fn test_all_args_are_forwarded() {
    let emitter = Emitter::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let slot = Arc::clone(&seen);
    emitter.on("foo", move |call| {
        slot.lock().unwrap().extend(call.args.iter().cloned());
        assert_eq!(call.arg(1), Some(&json!("two")));
        assert_eq!(call.arg(5), None);
        Ok(())
    });
    emitter
        .publish("foo", &[json!(1), json!("two"), json!({"three": 3})])
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![json!(1), json!("two"), json!({"three": 3})]
    );
}

#[test]
fn test_unsubscribe_during_publish_uses_snapshot() {
    let emitter = Emitter::new();
    let called = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&called);
    let b = Listener::new(move |_| {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let target = b.clone();
    emitter.on("tobi", move |call| {
        call.emitter.unsubscribe("tobi", &target);
        Ok(())
    });
    emitter.subscribe("tobi", b);

    emitter.publish("tobi", &[]).unwrap();
    assert!(called.swap(false, Ordering::SeqCst));

    emitter.publish("tobi", &[]).unwrap();
    assert!(!called.load(Ordering::SeqCst));
}

#[test]
fn test_subscribe_during_publish_waits_for_next_publish() {
    let emitter = Emitter::new();
    let calls = Calls::new();

    let log = calls.clone();
    emitter.once("foo", move |call| {
        log.push("first");
        call.emitter.subscribe("foo", log.recorder("late"));
        Ok(())
    });

    emitter.publish("foo", &[]).unwrap();
    assert_eq!(calls.take(), vec!["first"]);

    emitter.publish("foo", &[]).unwrap();
    assert_eq!(calls.take(), vec!["late"]);
}

#[test]
fn test_nested_publish_runs_to_completion_first() {
    let emitter = Emitter::new();
    let calls = Calls::new();

    let log = calls.clone();
    emitter.on("outer", move |call| {
        log.push("outer:start");
        call.emitter.publish("inner", &[])?;
        log.push("outer:end");
        Ok(())
    });
    emitter.subscribe("outer", calls.recorder("outer:second"));
    emitter.subscribe("inner", calls.recorder("inner"));

    emitter.publish("outer", &[]).unwrap();

    assert_eq!(
        calls.take(),
        vec!["outer:start", "inner", "outer:end", "outer:second"]
    );
}

#[test]
fn test_listener_error_stops_fan_out_and_propagates() {
    let emitter = Emitter::new();
    let calls = Calls::new();

    emitter.subscribe("foo", calls.recorder("one"));
    emitter.on("foo", |_| anyhow::bail!("boom"));
    emitter.subscribe("foo", calls.recorder("three"));

    let err = emitter.publish("foo", &[]).unwrap_err();

    match &err {
        EmitterError::Listener { event, index, source } => {
            assert_eq!(event, "foo");
            assert_eq!(*index, 1);
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.take(), vec!["one"]);
}

#[test]
fn test_once_is_removed_even_when_it_fails() {
    let emitter = Emitter::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&runs);
    emitter.once("foo", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("first run fails")
    });

    assert!(emitter.publish("foo", &[]).is_err());
    assert!(emitter.publish("foo", &[]).is_ok());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
#[should_panic(expected = "listener panicked")]
fn test_listener_panic_propagates() {
    let emitter = Emitter::new();
    emitter.on("foo", |_| panic!("listener panicked"));
    let _ = emitter.publish("foo", &[]);
}

#[test]
fn test_once_publishing_itself_runs_once() {
    let emitter = Emitter::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&runs);
    emitter.once("again", move |call| {
        counter.fetch_add(1, Ordering::SeqCst);
        call.emitter.publish("again", &[])?;
        Ok(())
    });

    emitter.publish("again", &[]).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
