use glam::Vec2;
use lantern_core::{SimParams, Simulation};
use lantern_render::LanternRenderer;
use std::time::Instant;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

const DEFAULT_SEED: u64 = 0x1a57e12;

/// `key=value` arguments: `seed` picks the RNG seed, everything else is a
/// parameter override. Malformed arguments are logged and skipped.
fn parse_args(args: impl IntoIterator<Item = String>) -> (SimParams, u64) {
    let mut params = SimParams::default();
    let mut seed = DEFAULT_SEED;
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            log::warn!("[args] expected key=value, got `{arg}`");
            continue;
        };
        if key == "seed" {
            match value.parse() {
                Ok(s) => seed = s,
                Err(_) => log::warn!("[args] invalid seed `{value}`"),
            }
            continue;
        }
        params.apply_overrides([(key, value)]);
    }
    (params, seed)
}

/// Window-relative cursor position to normalized device coordinates.
fn cursor_to_ndc(position: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> Option<Vec2> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    let u = position.x as f32 / size.width as f32;
    let v = position.y as f32 / size.height as f32;
    Some(Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0))
}

fn logical_size(window: &winit::window::Window) -> (f32, f32) {
    let size: LogicalSize<f32> = window.inner_size().to_logical(window.scale_factor());
    (size.width, size.height)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let (params, seed) = parse_args(std::env::args().skip(1));

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Hero lanterns (native)")
        .with_inner_size(LogicalSize::new(
            lantern_core::constants::FALLBACK_WIDTH_PX,
            lantern_core::constants::FALLBACK_HEIGHT_PX,
        ))
        .build(&event_loop)?;

    // The window plays the container: its logical size sizes the population.
    let (css_w, css_h) = logical_size(&window);
    let mut sim = Simulation::new(params, css_w.max(1.0), css_h.max(1.0), seed)?;
    let physical = window.inner_size();
    let mut renderer = pollster::block_on(LanternRenderer::new(
        &window,
        physical.width,
        physical.height,
        &sim,
    ))?;
    log::info!("[native] space toggles pause; seed {seed}");

    // The renderer borrows the window, so the loop captures it by reference
    let window = &window;
    let start = Instant::now();
    let mut last_frame = start;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            renderer.resize(size.width, size.height);
            let (w, h) = logical_size(window);
            if let Err(e) = sim.resize(w, h) {
                log::debug!("[resize] ignored: {e}");
            }
        }
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            if let Some(ndc) = cursor_to_ndc(position, window.inner_size()) {
                let now_ms = start.elapsed().as_secs_f64() * 1000.0;
                sim.pointer_move(ndc, now_ms);
            }
        }
        Event::WindowEvent {
            event: WindowEvent::CursorLeft { .. },
            ..
        } => sim.pointer_leave(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Space),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => {
            let paused = sim.toggle_pause();
            log::info!("[native] {}", if paused { "paused" } else { "resumed" });
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::AboutToWait => {
            let now = Instant::now();
            sim.tick((now - last_frame).as_secs_f32());
            last_frame = now;
            match renderer.render(&mut sim) {
                Ok(()) => window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.reconfigure()
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[native] GPU out of memory, exiting");
                    elwt.exit()
                }
                Err(e) => log::warn!("[native] render error: {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_override_params_and_seed() {
        let args = ["gravity=-0.4", "seed=7", "junk", "nope=1", "seed=x"].map(String::from);
        let (params, seed) = parse_args(args);
        assert_eq!(params.physics.gravity, -0.4);
        assert_eq!(seed, 7);
    }

    #[test]
    fn cursor_maps_to_ndc() {
        let size = PhysicalSize::new(800, 400);
        let centre = cursor_to_ndc(PhysicalPosition::new(400.0, 200.0), size).unwrap();
        assert_eq!(centre, Vec2::ZERO);
        let corner = cursor_to_ndc(PhysicalPosition::new(0.0, 0.0), size).unwrap();
        assert_eq!(corner, Vec2::new(-1.0, 1.0));
        assert!(cursor_to_ndc(PhysicalPosition::new(1.0, 1.0), PhysicalSize::new(0, 10)).is_none());
    }
}
