// Browser-only checks; run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use flag_rush::storage::{HIGH_SCORE_KEY, HighScoreStore, LocalStorageStore, load_high_score, record_total};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item(HIGH_SCORE_KEY).unwrap();

    let mut store = LocalStorageStore::open().expect("localStorage available");
    assert_eq!(load_high_score(&store), 0);
    let update = record_total(&mut store, 1234);
    assert!(update.new_record);
    assert_eq!(store.read().unwrap().as_deref(), Some("1234"));
    assert!(!record_total(&mut store, 1000).new_record);
    assert_eq!(load_high_score(&store), 1234);

    storage.remove_item(HIGH_SCORE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn snapshot_is_null_before_launch() {
    assert_eq!(flag_rush::render_game_to_text().unwrap(), "null");
}

#[wasm_bindgen_test]
fn intl_names_resolve_regions_outside_the_embedded_table() {
    use flag_rush::RegionCode;
    use flag_rush::catalog::{IntlNames, RegionNames};

    let names = IntlNames::new().expect("Intl.DisplayNames available");
    let name = |code: &str| names.display_name(RegionCode::new(code).unwrap());
    assert_eq!(name("FR").as_deref(), Some("France"));
    assert_eq!(name("EU").as_deref(), Some("European Union"));
    assert!(name("UN").is_some());
}
