mod helpers;
mod instances;
mod renderer;

pub static LANTERN_WGSL: &str = include_str!("../shaders/lantern.wgsl");

pub use instances::{basket_instances, lantern_instances, InstanceRaw};
pub use renderer::LanternRenderer;
