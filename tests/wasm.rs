#![cfg(target_arch = "wasm32")]

use liquidity_arena::LiquidityArena;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn default_world_ticks() {
    let mut arena = LiquidityArena::new("").unwrap();
    assert!(!arena.tick().is_null());
    arena.run_batch(9);
    assert_eq!(arena.current_tick(), 10);
    assert!(!arena.get_report().is_null());
}

#[wasm_bindgen_test]
fn submitted_actions_run_next_tick() {
    let mut arena = LiquidityArena::new("").unwrap();
    arena.submit_action("bridge", "A", "B", 2.0).unwrap();
    assert!(arena.submit_action("teleport", "A", "B", 2.0).is_err());
    arena.tick();
    assert!(!arena.get_chains().is_null());

    arena.reset().unwrap();
    assert_eq!(arena.current_tick(), 0);
}

#[wasm_bindgen_test]
fn invalid_config_rejected() {
    assert!(LiquidityArena::new(r#"{"chains": []}"#).is_err());
}
