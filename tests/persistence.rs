use std::fs;

use tempfile::TempDir;

use ringtype::engine::EngineState;
use ringtype::engine::frequency::STORAGE_KEY;
use ringtype::session::clock::ManualClock;
use ringtype::store::json_store::JsonStore;
use ringtype::store::{KeyValueStore, MemoryStore};

fn engine_in(dir: &TempDir) -> EngineState {
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    EngineState::new(Box::new(store), Box::new(ManualClock::new()))
}

fn type_text(engine: &mut EngineState, text: &str) {
    for ch in text.chars() {
        engine.submit_char(ch);
    }
}

#[test]
fn counts_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_in(&dir);
        type_text(&mut engine, "the the");
    }

    let engine = engine_in(&dir);
    assert_eq!(engine.model().digram('t', 'h'), 2);
    assert_eq!(engine.model().digram(' ', 't'), 2);
    assert_eq!(engine.model().digram('e', ' '), 1);
    assert_eq!(engine.model().unigram('h'), 2);
}

#[test]
fn persisted_file_has_bi_and_uni_tables() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    type_text(&mut engine, "Hi!");

    let path = dir.path().join(format!("{STORAGE_KEY}.json"));
    let raw = fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["bi"][" h"], 1);
    assert_eq!(value["bi"]["hi"], 1);
    assert_eq!(value["uni"]["h"], 1);
    assert_eq!(value["uni"]["!"], 1);
    assert!(value["bi"].get("i!").is_none(), "symbols stay out of digrams");
}

#[test]
fn corrupt_counts_are_replaced_on_next_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(format!("{STORAGE_KEY}.json"));
    fs::write(&path, "not json").unwrap();

    let mut engine = engine_in(&dir);
    assert!(engine.model().is_empty());
    type_text(&mut engine, "a");

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["uni"]["a"], 1);
}

#[test]
fn missing_table_loads_as_empty() {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, r#"{"bi":{"ab":3}}"#).unwrap();
    let mut engine = EngineState::new(Box::new(store), Box::new(ManualClock::new()));
    assert_eq!(engine.model().digram('a', 'b'), 3);
    assert_eq!(engine.model().unigram('b'), 0);

    engine.submit_char('a');
    // b leads, the rest of the slots tie at zero and fill alphabetically
    assert_eq!(engine.candidates(), vec![' ', 'a', 'b', 'c', 'd', 'e']);
}

#[test]
fn predictions_learn_from_input() {
    let mut engine = EngineState::new(Box::new(MemoryStore::new()), Box::new(ManualClock::new()));
    engine.submit_char('q');
    // only the unigram of q itself is known: q leads, ties fill alphabetically
    assert_eq!(engine.candidates(), vec![' ', 'a', 'b', 'c', 'd', 'q']);

    engine.submit_reset();
    type_text(&mut engine, "qu qu qu q");
    let candidates = engine.candidates();
    assert!(candidates.contains(&'u'), "{candidates:?}");
    assert!(candidates.contains(&'q'));
    assert_eq!(candidates[0], ' ');
    assert_eq!(engine.candidates(), candidates, "ranking is deterministic");
}
