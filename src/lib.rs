#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod color;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod field;
pub mod shaders;
pub mod trail;
pub mod viewport;

pub use color::Rgb;
pub use config::{DotFieldConfig, DotFieldOptions, TrailConfig};
pub use controller::{Controller, Dirty, RenderParameters};
pub use error::DotFieldError;
pub use trail::TrailField;
pub use viewport::{DeviceProfile, ViewportState};

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount_dot_field, DotFieldHandle};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    mod host;
    mod render;

    pub use host::DotFieldHandle;

    /// Canvas id auto-mounted on start when present.
    const AUTO_MOUNT_ID: &str = "c";

    thread_local! {
        static AUTO_MOUNTED: RefCell<Option<DotFieldHandle>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let Some(element) = document.get_element_by_id(AUTO_MOUNT_ID) else {
            return Ok(());
        };
        let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;

        if let Some(handle) = mount_dot_field(canvas, JsValue::UNDEFINED) {
            AUTO_MOUNTED.with(|cell| *cell.borrow_mut() = Some(handle));
        }
        Ok(())
    }

    /// Mounts the background on `canvas`. Returns `undefined` when the
    /// environment cannot render it; the page carries on without it.
    #[wasm_bindgen(js_name = mountDotField)]
    pub fn mount_dot_field(canvas: web_sys::HtmlCanvasElement, options: JsValue) -> Option<DotFieldHandle> {
        let options = host::parse_options(options);
        match host::DotFieldHandle::mount(canvas, options.resolve()) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::warn!("dot field disabled: {err}");
                None
            }
        }
    }

    /// Unmounts the background started automatically on `#c`, if any.
    #[wasm_bindgen(js_name = unmountAutoDotField)]
    pub fn unmount_auto_dot_field() {
        AUTO_MOUNTED.with(|cell| cell.borrow_mut().take());
    }
}
