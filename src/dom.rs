use crate::constants::*;
use crate::input;
use lantern_core::constants::{FALLBACK_HEIGHT_PX, FALLBACK_WIDTH_PX};
use lantern_core::params::DisplayParams;
use lantern_core::SimParams;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn find_container(document: &web::Document) -> Option<web::HtmlElement> {
    document
        .query_selector(CONTAINER_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

/// CSS size of the mount container, falling back to its client box and then
/// to a fixed default when layout has not happened yet.
pub fn container_size(container: &web::HtmlElement) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    input::pick_container_size(
        (rect.width() as f32, rect.height() as f32),
        (container.client_width() as f32, container.client_height() as f32),
        (FALLBACK_WIDTH_PX, FALLBACK_HEIGHT_PX),
    )
}

/// Parameter defaults with every `data-<key>` override on the container applied.
pub fn read_params(container: &web::HtmlElement) -> SimParams {
    let mut params = SimParams::default();
    let pairs: Vec<(&str, String)> = SimParams::KEYS
        .iter()
        .filter_map(|key| {
            container
                .get_attribute(&format!("{OVERRIDE_ATTRIBUTE_PREFIX}{key}"))
                .map(|value| (*key, value))
        })
        .collect();
    params.apply_overrides(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    params
}

pub fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_class_name(CANVAS_CLASS);
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// Size the canvas backing store for the container, honouring the pixel
/// ratio caps. Returns the new backing size.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    css_size: (f32, f32),
    display: &DisplayParams,
) -> (u32, u32) {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0);
    let ratio = display.pixel_ratio(dpr, css_size.0);
    let (w_px, h_px) = input::backing_size(css_size.0, css_size.1, ratio);
    if canvas.width() != w_px || canvas.height() != h_px {
        canvas.set_width(w_px);
        canvas.set_height(h_px);
    }
    (w_px, h_px)
}

/// The pause control lives next to the container, inside the same media block.
pub fn find_pause_button(container: &web::HtmlElement) -> Option<web::Element> {
    container
        .closest(MEDIA_SELECTOR)
        .ok()
        .flatten()?
        .query_selector(PAUSE_SELECTOR)
        .ok()
        .flatten()
}

pub fn add_click_listener(el: &web::Element, mut handler: impl FnMut() + 'static) {
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
