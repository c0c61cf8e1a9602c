//! BugRocket App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles all platform adapters and hands them to the egui UI.

pub mod settings;

#[cfg(target_arch = "wasm32")]
mod app;


#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "bugrocket_canvas";

/// WASM entry point, called from index.html
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn main() -> Result<(), JsValue> {
    use bugrocket_platform::storage::auto_detect_storage;
    use bugrocket_types::config::StorageBackendType;

    // Initialize logging
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("BugRocket WASM starting...");

    // Config always lives in the browser store, whatever the archive uses
    let settings_store = auto_detect_storage(&StorageBackendType::Auto);
    let config = settings::load_config(settings_store.as_ref()).await;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("No canvas element with id 'bugrocket_canvas'"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    let web_options = eframe::WebOptions::default();
    eframe::WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(move |cc| Ok(Box::new(app::BugRocketApp::new(cc, config, settings_store)))),
        )
        .await
}
