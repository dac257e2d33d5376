//! Purpose: Exercise the process-wide configuration lifecycle end to end.
//! Exports: Integration tests only (no runtime exports).
//! Role: Global snapshot/update semantics plus decode behavior switching.
//! Invariants: Tests touching the global configuration serialize through one
//! mutex so parallel test threads never interleave mutator batches.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use silt::api::{from_slice, from_slice_with, global, update, Bool, Config, Dirtyable, Integer};

static GLOBAL_GUARD: Mutex<()> = Mutex::new(());

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct Event {
    id: i64,
    is_active: bool,
}

#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
struct EventTwin {
    id: Integer,
    is_active: Bool,
}

impl Dirtyable for Event {
    type Twin = EventTwin;
}

#[test]
fn global_starts_from_the_shipped_defaults() {
    let _guard = GLOBAL_GUARD.lock().unwrap();
    update(|cfg| cfg.reset_to_default());
    assert_eq!(global(), Config::standard());
}

#[test]
fn global_config_drives_from_slice() {
    let _guard = GLOBAL_GUARD.lock().unwrap();

    update(|cfg| cfg.reset_to_default());
    let event: Event = from_slice(br#"{"id":"7","is_active":"on"}"#).unwrap();
    assert_eq!(
        event,
        Event {
            id: 7,
            is_active: true
        }
    );

    update(|cfg| cfg.reset_to_empty());
    assert!(from_slice::<Event>(br#"{"id":"7","is_active":"on"}"#).is_err());

    update(|cfg| cfg.reset_to_default());
}

#[test]
fn mutator_batches_apply_atomically() {
    let _guard = GLOBAL_GUARD.lock().unwrap();

    update(|cfg| {
        cfg.reset_to_empty();
        cfg.flex_keys.disabled = false;
        cfg.flex_keys.case_insensitive = true;
        cfg.flex_keys.chameleon_case = true;
        cfg.number.disabled = false;
        cfg.number.from_strings.disabled = false;
        cfg.boolean.disabled = false;
        cfg.boolean.from_strings.disabled = false;
        cfg.boolean.from_strings.respect_from_numbers_logic = true;
        cfg.boolean.from_numbers.disabled = false;
    });

    let snapshot = global();
    assert!(!snapshot.flex_keys.is_disabled());
    assert!(snapshot.boolean.from_strings.respect_from_numbers_logic);
    assert!(snapshot.date.is_disabled());

    let event: Event = from_slice(br#"{"id":"123","Is-Active":"1"}"#).unwrap();
    assert_eq!(
        event,
        Event {
            id: 123,
            is_active: true
        }
    );

    update(|cfg| cfg.reset_to_default());
}

#[test]
fn explicit_handles_ignore_the_global() {
    let _guard = GLOBAL_GUARD.lock().unwrap();
    update(|cfg| cfg.reset_to_empty());

    // An explicit handle decodes leniently even while the global is strict.
    let event: Event =
        from_slice_with(br#"{"id":"9","is_active":"yes"}"#, &Config::standard()).unwrap();
    assert_eq!(event.id, 9);
    assert!(event.is_active);

    update(|cfg| cfg.reset_to_default());
}

#[test]
fn external_text_materializes_disabled_sections() {
    let cfg = Config::from_bytes(
        br#"
[Number]
Disabled = false

[Number.FromStrings]
Disabled = false
CommasAllowed = true
"#,
    )
    .unwrap();

    let event_err = from_slice_with::<Event>(br#"{"id":"1,024","is_active":"on"}"#, &cfg);
    // Bool section is absent from the text, so it behaves as disabled.
    assert!(event_err.is_err());

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Count {
        id: i64,
    }

    #[derive(Default, Deserialize, Serialize)]
    #[serde(default)]
    struct CountTwin {
        id: Integer,
    }

    impl Dirtyable for Count {
        type Twin = CountTwin;
    }

    let count: Count = from_slice_with(br#"{"id":"1,024"}"#, &cfg).unwrap();
    assert_eq!(count.id, 1024);
}
