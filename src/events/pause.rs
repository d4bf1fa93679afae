use crate::constants::{PAUSE_LABEL, PLAY_LABEL};
use crate::dom;
use lantern_core::Simulation;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Toggle the simulation from the page's pause button; the label names the
/// action the next click will take.
pub fn wire_pause_button(button: &web::Element, sim: Rc<RefCell<Simulation>>) {
    button.set_text_content(Some(label(sim.borrow().is_paused())));
    let target = button.clone();
    dom::add_click_listener(button, move || {
        let paused = sim.borrow_mut().toggle_pause();
        target.set_text_content(Some(label(paused)));
        log::info!("[pause] {}", if paused { "paused" } else { "resumed" });
    });
}

fn label(paused: bool) -> &'static str {
    if paused {
        PLAY_LABEL
    } else {
        PAUSE_LABEL
    }
}
