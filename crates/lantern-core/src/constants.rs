// Default tuning constants for the lantern simulation.
// `SimParams::default()` is built from these; hosts may override any of them.

// Lantern body
pub const LANTERN_WIDTH: f32 = 0.6;
pub const LANTERN_HEIGHT: f32 = 1.0;
pub const LANTERN_DEPTH: f32 = 0.6;
pub const LANTERN_CORNER_RADIUS: f32 = 0.3;
pub const LANTERN_SMOOTHNESS: u32 = 3; // rounded-box segments per corner
pub const LANTERN_FLARE: f32 = 1.3; // x/z scale applied to the upper half

// Basket hanging under each lantern, relative to the lantern body
pub const BASKET_WIDTH_RATIO: f32 = 0.35;
pub const BASKET_HEIGHT_RATIO: f32 = 0.18;
pub const BASKET_DEPTH_RATIO: f32 = 0.35;
pub const BASKET_DROP_RATIO: f32 = 0.7; // basket centre sits this many basket heights below the body

// Forces
pub const GRAVITY: f32 = -0.2;
pub const LIFT_STRENGTH: f32 = 1.2;
pub const BUOYANCY_RISE_RATE: f32 = 200.5; // per second while hovered
pub const BUOYANCY_DECAY_RATE: f32 = 0.4; // per second, scaled per lantern
pub const DECAY_SCALE_MIN: f32 = 0.6;
pub const DECAY_SCALE_MAX: f32 = 1.6;
pub const RANDOM_LIGHT_RATE: f32 = 0.08; // ignition chance per second for an unlit lantern
pub const IGNITE_THRESHOLD: f32 = 0.01;
pub const IGNITE_CEILING_FRACTION: f32 = 0.8; // of the visible top

// Drag and limits
pub const HORIZONTAL_DRAG: f32 = 0.949;
pub const VERTICAL_DRAG: f32 = 0.995;
pub const MAX_VERTICAL_SPEED: f32 = 4.0;
pub const DEPTH_BOUNCE_DAMPING: f32 = 0.6;

// Frame timing (seconds)
pub const MAX_FRAME_DT: f32 = 0.05;
pub const FALLBACK_FRAME_DT: f32 = 0.016;

// Collisions
pub const COLLISION_RESTITUTION: f32 = 0.3;
pub const COLLISION_RADIUS_FACTOR: f32 = 0.35; // of the larger of flared width and height
pub const COLLISION_CELL_FACTOR: f32 = 2.5; // cell edge in collision radii

// Colour
pub const BRIGHTNESS_STEPS: u32 = 24;
pub const LIT_LIGHTNESS_GAIN: f32 = 0.35;
pub const EMISSIVE_BASE: f32 = 0.1;
pub const EMISSIVE_GAIN: f32 = 1.0;
pub const EMISSIVE_HEX: u32 = 0xe2a112; // warm peachy orange
pub const BASKET_HEX: u32 = 0xd6b48a; // light brown-cream
pub const LANTERN_OPACITY: f32 = 0.9;

// Unlit base colour: random hue, deep saturation, darker lightness
pub const BASE_SATURATION_MIN: f32 = 0.95;
pub const BASE_SATURATION_SPAN: f32 = 0.05;
pub const BASE_LIGHTNESS_MIN: f32 = 0.35;
pub const BASE_LIGHTNESS_SPAN: f32 = 0.08;

// Palette siblings as (hue, saturation, lightness) offsets from the base colour
pub const PALETTE_BRIGHT_OFFSET: [f32; 3] = [0.05, 0.08, 0.10];
pub const PALETTE_DARK_OFFSET: [f32; 3] = [-0.05, -0.05, -0.08];

// Pattern tiling
pub const PATTERN_STRIPES: u32 = 8;
pub const PATTERN_CELLS_Y: u32 = 6;
pub const PATTERN_CELLS_A: u32 = 8;

// Population: `POPULATION_PER_BASE_AREA` lanterns per 800x400 px
pub const POPULATION_BASE_AREA: f64 = 800.0 * 400.0;
pub const POPULATION_PER_BASE_AREA: f64 = 210.0;
pub const POPULATION_MIN: usize = 35;
pub const POPULATION_MAX: usize = 210;

// Device pixel ratio caps
pub const PIXEL_RATIO_CAP: f32 = 2.0;
pub const PIXEL_RATIO_CAP_NARROW: f32 = 1.25;
pub const NARROW_WIDTH_PX: f32 = 700.0;
pub const PIXEL_RATIO_CAP_SMALL: f32 = 1.1;
pub const SMALL_WIDTH_PX: f32 = 500.0;

// Interaction
pub const HOVER_RADIUS_NDC: f32 = 0.3;
pub const HOVER_THROTTLE_MS: f64 = 30.0;

// Camera
pub const CAMERA_FOV_Y_DEG: f32 = 45.0;
pub const CAMERA_EYE: [f32; 3] = [0.0, 5.0, 22.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 5.0, 0.0];
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Spawn / recycle bands around the visible volume
pub const SPAWN_TOP_MARGIN: f32 = 4.0;
pub const OFF_BOTTOM_MARGIN: f32 = 4.0;
pub const RESPAWN_BAND_OFFSET: f32 = 2.0; // respawns start this far above the visible top
pub const X_RECYCLE_FACTOR: f32 = 1.3;
pub const Z_MIN: f32 = -8.0;
pub const Z_MAX: f32 = 4.0;

// Fallback container size when the host reports nothing usable
pub const FALLBACK_WIDTH_PX: f32 = 800.0;
pub const FALLBACK_HEIGHT_PX: f32 = 400.0;
