//! Purpose: Project the lenient twin back into the strict target value.
//! Exports: `overlay`, `recover_with_drops`, `Seg`.
//! Role: The merge half of the two-pass decode. Matched keys take the twin's
//! projected value under the twin's canonical name; unmatched keys keep
//! their raw values and are dropped one-by-one if they block strict decoding.
//! Invariants: The merged result equals the twin-roundtrip result for every
//! matched field.
//! Invariants: Drop recovery is deterministic (input key order).

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::decode::flex::key_matches;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Seg {
    Key(String),
    Idx(usize),
}

pub(crate) type Path = Vec<Seg>;

pub(crate) fn path_display(path: &[Seg]) -> String {
    struct Display<'a>(&'a [Seg]);
    impl fmt::Display for Display<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for (i, seg) in self.0.iter().enumerate() {
                match seg {
                    Seg::Key(key) if i == 0 => write!(f, "{key}")?,
                    Seg::Key(key) => write!(f, ".{key}")?,
                    Seg::Idx(idx) => write!(f, "[{idx}]")?,
                }
            }
            Ok(())
        }
    }
    Display(path).to_string()
}

/// Overlays the serialized twin onto the raw input value. Returns the merged
/// value plus the paths of raw keys no twin field matched.
pub(crate) fn overlay(raw: &Value, twin: &Value, cfg: &Config) -> (Value, Vec<Path>) {
    let mut unmatched = Vec::new();
    let mut path = Vec::new();
    let merged = overlay_at(raw, twin, cfg, &mut path, &mut unmatched);
    (merged, unmatched)
}

fn overlay_at(
    raw: &Value,
    twin: &Value,
    cfg: &Config,
    path: &mut Path,
    unmatched: &mut Vec<Path>,
) -> Value {
    match (raw, twin) {
        (Value::Object(raw_map), Value::Object(twin_map)) => {
            let mut out = Map::new();
            for (key, raw_value) in raw_map {
                let matched = twin_map
                    .iter()
                    .find(|(twin_key, _)| key_matches(key, twin_key, &cfg.flex_keys));
                match matched {
                    Some((twin_key, twin_value)) => {
                        path.push(Seg::Key(twin_key.clone()));
                        let merged = overlay_at(raw_value, twin_value, cfg, path, unmatched);
                        path.pop();
                        out.insert(twin_key.clone(), merged);
                    }
                    None => {
                        let mut lost = path.clone();
                        lost.push(Seg::Key(key.clone()));
                        unmatched.push(lost);
                        out.insert(key.clone(), raw_value.clone());
                    }
                }
            }
            // Twin fields with no raw counterpart (defaulted during the twin
            // pass) still project into the merge.
            for (twin_key, twin_value) in twin_map {
                if !out.contains_key(twin_key) {
                    out.insert(twin_key.clone(), twin_value.clone());
                }
            }
            Value::Object(out)
        }
        (Value::Array(raw_items), Value::Array(twin_items))
            if raw_items.len() == twin_items.len() =>
        {
            let merged = raw_items
                .iter()
                .zip(twin_items)
                .enumerate()
                .map(|(idx, (raw_item, twin_item))| {
                    path.push(Seg::Idx(idx));
                    let item = overlay_at(raw_item, twin_item, cfg, path, unmatched);
                    path.pop();
                    item
                })
                .collect();
            Value::Array(merged)
        }
        _ => twin.clone(),
    }
}

fn get_path<'a>(value: &'a Value, path: &[Seg]) -> Option<&'a Value> {
    let mut cursor = value;
    for seg in path {
        cursor = match seg {
            Seg::Key(key) => cursor.as_object()?.get(key)?,
            Seg::Idx(idx) => cursor.as_array()?.get(*idx)?,
        };
    }
    Some(cursor)
}

fn remove_path(value: &mut Value, path: &[Seg]) {
    let Some((Seg::Key(last), parents)) = path.split_last() else {
        return;
    };
    let mut cursor = value;
    for seg in parents {
        let next = match seg {
            Seg::Key(key) => cursor.as_object_mut().and_then(|map| map.get_mut(key)),
            Seg::Idx(idx) => cursor.as_array_mut().and_then(|items| items.get_mut(*idx)),
        };
        match next {
            Some(inner) => cursor = inner,
            None => return,
        }
    }
    if let Some(map) = cursor.as_object_mut() {
        map.remove(last);
    }
}

fn set_path(value: &mut Value, path: &[Seg], leaf: Value) {
    let Some((Seg::Key(last), parents)) = path.split_last() else {
        return;
    };
    let mut cursor = value;
    for seg in parents {
        let next = match seg {
            Seg::Key(key) => cursor.as_object_mut().and_then(|map| map.get_mut(key)),
            Seg::Idx(idx) => cursor.as_array_mut().and_then(|items| items.get_mut(*idx)),
        };
        match next {
            Some(inner) => cursor = inner,
            None => return,
        }
    }
    if let Some(map) = cursor.as_object_mut() {
        map.insert(last.clone(), leaf);
    }
}

/// Red-mode recovery: the merged value failed to strict-decode, so unmatched
/// raw keys are suspect. Start from the merge with all of them removed, then
/// re-add each in order, keeping the ones the strict decode tolerates.
/// Returns the recovered value plus the dropped key paths.
pub(crate) fn recover_with_drops<T: DeserializeOwned>(
    merged: &Value,
    unmatched: &[Path],
) -> Result<(T, Vec<String>), serde_json::Error> {
    let mut baseline = merged.clone();
    for path in unmatched {
        remove_path(&mut baseline, path);
    }
    let mut recovered: T = T::deserialize(&baseline)?;

    let mut dropped = Vec::new();
    for path in unmatched {
        let Some(raw_value) = get_path(merged, path) else {
            continue;
        };
        let mut candidate = baseline.clone();
        set_path(&mut candidate, path, raw_value.clone());
        match T::deserialize(&candidate) {
            Ok(value) => {
                baseline = candidate;
                recovered = value;
            }
            Err(_) => dropped.push(path_display(path)),
        }
    }
    Ok((recovered, dropped))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::{overlay, path_display, recover_with_drops, Seg};
    use crate::config::{Config, FlexKeysConfig};

    #[test]
    fn overlay_prefers_twin_values_under_canonical_names() {
        let mut cfg = Config::empty();
        cfg.flex_keys = FlexKeysConfig {
            disabled: false,
            case_insensitive: true,
            chameleon_case: true,
        };

        let raw = json!({"Is-Active": "1", "name": "foo", "stray": 9});
        let twin = json!({"is_active": true});
        let (merged, unmatched) = overlay(&raw, &twin, &cfg);

        assert_eq!(merged, json!({"is_active": true, "name": "foo", "stray": 9}));
        let lost: Vec<String> = unmatched.iter().map(|p| path_display(p)).collect();
        assert_eq!(lost, ["name", "stray"]);
    }

    #[test]
    fn overlay_recurses_through_arrays() {
        let cfg = Config::empty();
        let raw = json!({"data": [{"id": "1"}, {"id": "2"}]});
        let twin = json!({"data": [{"id": 1}, {"id": 2}]});
        let (merged, unmatched) = overlay(&raw, &twin, &cfg);
        assert_eq!(merged, json!({"data": [{"id": 1}, {"id": 2}]}));
        assert!(unmatched.is_empty());
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Event {
        id: i64,
        name: String,
        must_bool: bool,
    }

    #[test]
    fn recovery_drops_only_blocking_keys() {
        let merged = json!({"id": 1, "name": "foo", "must_bool": "true"});
        let unmatched = vec![
            vec![Seg::Key("name".into())],
            vec![Seg::Key("must_bool".into())],
        ];
        let (event, dropped) = recover_with_drops::<Event>(&merged, &unmatched).unwrap();
        assert_eq!(
            event,
            Event {
                id: 1,
                name: "foo".into(),
                must_bool: false
            }
        );
        assert_eq!(dropped, ["must_bool"]);
    }
}
