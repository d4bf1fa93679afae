#![cfg(target_arch = "wasm32")]
use instant::Instant;
use lantern_core::{SimParams, SimRegistry, Simulation};
use lantern_render::LanternRenderer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;

/// Entry point for a hero simulation: takes over the container.
type MountFn = fn(web::HtmlElement, SimParams);

fn build_registry() -> SimRegistry<MountFn> {
    let mut registry = SimRegistry::new();
    registry.register(lantern_core::DEFAULT_SIMULATION, mount_lanterns as MountFn);
    registry
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hero-lanterns starting");

    spawn_local(async move {
        if let Err(e) = init(build_registry()).await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init(registry: SimRegistry<MountFn>) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    // Pages without a hero banner simply have nothing to mount
    let Some(container) = dom::find_container(&document) else {
        log::debug!("no {} container, nothing to mount", constants::CONTAINER_SELECTOR);
        return Ok(());
    };
    let name = container.get_attribute(constants::SIM_ATTRIBUTE);
    let mount = registry.resolve(name.as_deref())?;
    let params = dom::read_params(&container);
    mount(container, params);
    Ok(())
}

fn mount_lanterns(container: web::HtmlElement, params: SimParams) {
    spawn_local(async move {
        if let Err(e) = mount(container, params).await {
            log::error!("lantern mount error: {:?}", e);
        }
    });
}

async fn mount(container: web::HtmlElement, params: SimParams) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let css = dom::container_size(&container);
    let canvas = dom::create_canvas(&document, &container)?;
    let (w_px, h_px) = dom::sync_canvas_backing_size(&canvas, css, &params.display);

    let seed = input::seed_from_unit(js_sys::Math::random());
    let sim = Simulation::new(params, css.0, css.1, seed)?;
    log::info!(
        "[mount] {}x{} css, {}x{} px, {} lanterns",
        css.0,
        css.1,
        w_px,
        h_px,
        sim.lanterns().len()
    );

    // The surface owns its canvas handle, so no borrow outlives this function
    let renderer =
        LanternRenderer::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), w_px, h_px, &sim)
            .await?;
    let sim = Rc::new(RefCell::new(sim));

    events::wire_pointer_handlers(&container, sim.clone());
    events::wire_resize(&container, &canvas, sim.clone());
    if let Some(button) = dom::find_pause_button(&container) {
        events::wire_pause_button(&button, sim.clone());
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        sim,
        renderer,
        canvas,
        running: Rc::new(Cell::new(true)),
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
