use crate::input;
use glam::Vec2;
use lantern_core::Simulation;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Hover follows the pointer over the container; leaving it drops every flag.
pub fn wire_pointer_handlers(container: &web::HtmlElement, sim: Rc<RefCell<Simulation>>) {
    wire_pointermove(container, sim.clone());
    wire_pointerleave(container, sim);
}

fn wire_pointermove(container: &web::HtmlElement, sim: Rc<RefCell<Simulation>>) {
    let target = container.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let rect = target.get_bounding_client_rect();
        let Some(ndc) = input::client_to_ndc(
            Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
        ) else {
            return;
        };
        // the event timestamp drives the throttle
        sim.borrow_mut().pointer_move(ndc, ev.time_stamp());
    }) as Box<dyn FnMut(_)>);
    _ = container.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(container: &web::HtmlElement, sim: Rc<RefCell<Simulation>>) {
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        sim.borrow_mut().pointer_leave();
    }) as Box<dyn FnMut(_)>);
    _ = container.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}
