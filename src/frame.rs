use instant::Instant;
use lantern_core::Simulation;
use lantern_render::LanternRenderer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub sim: Rc<RefCell<Simulation>>,
    pub renderer: LanternRenderer<'a>,
    pub canvas: web::HtmlCanvasElement,
    /// Cleared to stop the loop; no further frames are scheduled.
    pub running: Rc<Cell<bool>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let mut sim = self.sim.borrow_mut();
        sim.tick(dt_sec);

        self.renderer
            .resize(self.canvas.width(), self.canvas.height());
        match self.renderer.render(&mut sim) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("[frame] surface lost, reconfiguring");
                self.renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[frame] GPU out of memory, stopping");
                self.running.set(false);
            }
            Err(e) => log::warn!("[frame] render error: {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let running = frame_ctx_tick.borrow().running.clone();
        if running.get() {
            frame_ctx_tick.borrow_mut().frame();
        }
        if !running.get() {
            log::info!("[frame] loop stopped");
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
