// DOM contract between the page and the hero simulation.

// Mount container and the attribute naming which simulation to run
pub const CONTAINER_SELECTOR: &str = "[data-hero-sim]";
pub const SIM_ATTRIBUTE: &str = "data-sim";
// Parameter overrides are read from `data-<key>` attributes on the container
pub const OVERRIDE_ATTRIBUTE_PREFIX: &str = "data-";

// Optional pause control, looked up inside the surrounding media block
pub const MEDIA_SELECTOR: &str = ".hero-media";
pub const PAUSE_SELECTOR: &str = "[data-sim-pause]";
pub const PAUSE_LABEL: &str = "Pause";
pub const PLAY_LABEL: &str = "Play";

pub const CANVAS_CLASS: &str = "hero-sim-canvas";
