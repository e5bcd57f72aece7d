//! The process-wide emitter and its macros.
//!
//! Every test in this binary shares one global emitter, so each test uses
//! its own event names.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aemitter_core::{emit, global, init_global, on_event, EmitterConfig, Evented};

#[test]
fn test_global_is_shared() {
    let handle = global().on("global.shared", |_| Ok(()));
    assert!(global().has_listeners("global.shared"));
    assert!(global().unsubscribe("global.shared", &handle));
}

#[test]
fn test_init_after_use_is_rejected() {
    let _ = global();
    let config = EmitterConfig::named("late");
    let rejected = init_global(config.clone()).unwrap_err();
    assert_eq!(rejected, config);
}

#[test]
fn test_macros_target_global() {
    let total = Arc::new(AtomicUsize::new(0));

    let sum = Arc::clone(&total);
    let handle = on_event!("global.macro", move |call| {
        let n = call.args.iter().filter_map(|v| v.as_u64()).sum::<u64>();
        sum.fetch_add(n as usize, Ordering::SeqCst);
        Ok(())
    });

    emit!("global.macro", 1, 2).unwrap();
    emit!("global.macro").unwrap();
    emit!("global.macro", 4,).unwrap();

    assert_eq!(total.load(Ordering::SeqCst), 7);
    global().unsubscribe("global.macro", &handle);
}
