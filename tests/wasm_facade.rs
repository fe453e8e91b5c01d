#![cfg(target_arch = "wasm32")]

use ar_interaction_engine::InteractionWorld;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn facade_grabs_in_browser() {
    ar_interaction_engine::init();
    let mut world = InteractionWorld::new();
    let ball = world.spawn_sphere(0.0, 0.0, 0.0, 0.1, 1.0);
    world.set_candidate(ball, 0.0, 0.0, 0.0);
    world.set_grab_pressed(true);
    world.step();
    assert_eq!(world.active_body(), ball);
    assert!(world.last_step_ms() >= 0.0);
}
