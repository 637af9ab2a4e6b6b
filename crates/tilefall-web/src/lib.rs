pub mod runner;

pub use runner::GameRunner;

use std::cell::RefCell;

use tilefall::{AssetManifest, GameConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Calls made before `game_init` are ignored.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("game not initialized; call game_init() first");
                None
            }
        }
    })
}

/// Create the game from a JSON config (may be empty) and the asset manifest.
#[wasm_bindgen]
pub fn game_init(config_json: &str, manifest_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut config = if config_json.trim().is_empty() {
        GameConfig::default()
    } else {
        GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    if config.seed.is_none() {
        config.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
    }

    let manifest =
        AssetManifest::from_json(manifest_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let runner = GameRunner::new(config, &manifest).map_err(|e| JsValue::from_str(&e.to_string()))?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("tilefall: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn game_add_map(name: &str, json: &str) {
    with_runner(|r| r.add_map(name, json));
}

#[wasm_bindgen]
pub fn game_start(map: &str) -> Result<(), JsValue> {
    match with_runner(|r| r.start(map)) {
        Some(result) => result.map_err(|e| JsValue::from_str(&e.to_string())),
        None => Err(JsValue::from_str("game not initialized")),
    }
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_key(key_code, true));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner(|r| r.push_key(key_code, false));
}

#[wasm_bindgen]
pub fn game_quit_requested() -> bool {
    with_runner(|r| r.quit_requested()).unwrap_or(false)
}

/// Current map as level JSON, for an external editor to persist.
#[wasm_bindgen]
pub fn game_save_map() -> Result<String, JsValue> {
    match with_runner(|r| r.save_map()) {
        Some(result) => result.map_err(|e| JsValue::from_str(&e.to_string())),
        None => Err(JsValue::from_str("game not initialized")),
    }
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_len() -> u32 {
    with_runner(|r| r.buffer_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_display_width() -> f32 {
    with_runner(|r| r.display_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_display_height() -> f32 {
    with_runner(|r| r.display_height()).unwrap_or(0.0)
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_records() -> u32 {
    with_runner(|r| r.max_records()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_runner(|r| r.max_sounds()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_record_data_offset() -> u32 {
    with_runner(|r| r.record_data_offset()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_sound_data_offset() -> u32 {
    with_runner(|r| r.sound_data_offset()).unwrap_or(0)
}
