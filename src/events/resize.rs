use crate::dom;
use lantern_core::Simulation;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Track window resizes: new canvas backing size and new visible volume.
/// The renderer picks up the backing size on its next frame.
pub fn wire_resize(
    container: &web::HtmlElement,
    canvas: &web::HtmlCanvasElement,
    sim: Rc<RefCell<Simulation>>,
) {
    let container = container.clone();
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        let css = dom::container_size(&container);
        let mut sim = sim.borrow_mut();
        let (w_px, h_px) = dom::sync_canvas_backing_size(&canvas, css, &sim.params().display);
        match sim.resize(css.0, css.1) {
            Ok(()) => log::debug!("[resize] {}x{} css, {}x{} px", css.0, css.1, w_px, h_px),
            Err(e) => log::debug!("[resize] ignored: {e}"),
        }
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
