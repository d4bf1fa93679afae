//! Tunable simulation parameters.
//!
//! Defaults come from [`crate::constants`]. Hosts may override individual
//! values by kebab-case key (`gravity`, `lift-strength`, ...): the web host
//! reads `data-*` attributes on the mount container, the native host reads
//! `key=value` arguments.

use crate::constants::*;
use crate::error::{SimError, SimResult};
use crate::geometry::ShapeSpec;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsParams {
    pub gravity: f32,
    pub lift_strength: f32,
    pub rise_rate: f32,
    pub decay_rate: f32,
    pub decay_scale_min: f32,
    pub decay_scale_max: f32,
    pub random_light_rate: f32,
    pub ignite_threshold: f32,
    pub ignite_ceiling_fraction: f32,
    pub horizontal_drag: f32,
    pub vertical_drag: f32,
    pub max_vertical_speed: f32,
    pub depth_bounce_damping: f32,
    pub max_dt: f32,
    pub fallback_dt: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            lift_strength: LIFT_STRENGTH,
            rise_rate: BUOYANCY_RISE_RATE,
            decay_rate: BUOYANCY_DECAY_RATE,
            decay_scale_min: DECAY_SCALE_MIN,
            decay_scale_max: DECAY_SCALE_MAX,
            random_light_rate: RANDOM_LIGHT_RATE,
            ignite_threshold: IGNITE_THRESHOLD,
            ignite_ceiling_fraction: IGNITE_CEILING_FRACTION,
            horizontal_drag: HORIZONTAL_DRAG,
            vertical_drag: VERTICAL_DRAG,
            max_vertical_speed: MAX_VERTICAL_SPEED,
            depth_bounce_damping: DEPTH_BOUNCE_DAMPING,
            max_dt: MAX_FRAME_DT,
            fallback_dt: FALLBACK_FRAME_DT,
        }
    }
}

/// How often the collision resolver runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollisionCadence {
    EveryFrame,
    #[default]
    EveryOtherFrame,
}

impl FromStr for CollisionCadence {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "every-frame" | "1" => Ok(Self::EveryFrame),
            "every-other-frame" | "2" => Ok(Self::EveryOtherFrame),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollisionParams {
    pub restitution: f32,
    pub cell_factor: f32,
    pub cadence: CollisionCadence,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            restitution: COLLISION_RESTITUTION,
            cell_factor: COLLISION_CELL_FACTOR,
            cadence: CollisionCadence::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LookParams {
    pub brightness_steps: u32,
    pub lit_lightness_gain: f32,
    pub emissive_base: f32,
    pub emissive_gain: f32,
    pub emissive_hex: u32,
    pub basket_hex: u32,
    pub opacity: f32,
}

impl Default for LookParams {
    fn default() -> Self {
        Self {
            brightness_steps: BRIGHTNESS_STEPS,
            lit_lightness_gain: LIT_LIGHTNESS_GAIN,
            emissive_base: EMISSIVE_BASE,
            emissive_gain: EMISSIVE_GAIN,
            emissive_hex: EMISSIVE_HEX,
            basket_hex: BASKET_HEX,
            opacity: LANTERN_OPACITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PopulationParams {
    pub per_base_area: f64,
    pub base_area: f64,
    pub min: usize,
    pub max: usize,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            per_base_area: POPULATION_PER_BASE_AREA,
            base_area: POPULATION_BASE_AREA,
            min: POPULATION_MIN,
            max: POPULATION_MAX,
        }
    }
}

impl PopulationParams {
    /// Lantern count for a container of `width x height` CSS pixels.
    pub fn count_for(&self, width: f32, height: f32) -> usize {
        let area = (width.max(0.0) as f64) * (height.max(0.0) as f64);
        let raw = (area * self.per_base_area / self.base_area).floor();
        let raw = if raw.is_finite() { raw as usize } else { 0 };
        raw.min(self.max).max(self.min)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayParams {
    pub pixel_ratio_cap: f32,
    pub narrow_width_px: f32,
    pub narrow_cap: f32,
    pub small_width_px: f32,
    pub small_cap: f32,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            pixel_ratio_cap: PIXEL_RATIO_CAP,
            narrow_width_px: NARROW_WIDTH_PX,
            narrow_cap: PIXEL_RATIO_CAP_NARROW,
            small_width_px: SMALL_WIDTH_PX,
            small_cap: PIXEL_RATIO_CAP_SMALL,
        }
    }
}

impl DisplayParams {
    /// Device pixel ratio actually used for a container `width` CSS pixels wide.
    pub fn pixel_ratio(&self, device_pixel_ratio: f32, width: f32) -> f32 {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let mut ratio = dpr.min(self.pixel_ratio_cap);
        if width < self.narrow_width_px {
            ratio = ratio.min(self.narrow_cap);
        }
        if width < self.small_width_px {
            ratio = ratio.min(self.small_cap);
        }
        ratio
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionParams {
    pub hover_radius: f32,
    pub throttle_ms: f64,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            hover_radius: HOVER_RADIUS_NDC,
            throttle_ms: HOVER_THROTTLE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundsParams {
    pub spawn_top_margin: f32,
    pub off_bottom_margin: f32,
    pub respawn_band_offset: f32,
    pub x_recycle_factor: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Default for BoundsParams {
    fn default() -> Self {
        Self {
            spawn_top_margin: SPAWN_TOP_MARGIN,
            off_bottom_margin: OFF_BOTTOM_MARGIN,
            respawn_band_offset: RESPAWN_BAND_OFFSET,
            x_recycle_factor: X_RECYCLE_FACTOR,
            z_min: Z_MIN,
            z_max: Z_MAX,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimParams {
    pub shape: ShapeSpec,
    pub physics: PhysicsParams,
    pub collision: CollisionParams,
    pub look: LookParams,
    pub population: PopulationParams,
    pub display: DisplayParams,
    pub interaction: InteractionParams,
    pub bounds: BoundsParams,
}

impl SimParams {
    /// Every key accepted by [`SimParams::apply_override`].
    pub const KEYS: &'static [&'static str] = &[
        "gravity",
        "lift-strength",
        "rise-rate",
        "decay-rate",
        "random-light-rate",
        "horizontal-drag",
        "vertical-drag",
        "max-vertical-speed",
        "restitution",
        "collision-cadence",
        "hover-radius",
        "hover-throttle-ms",
        "brightness-steps",
        "population-min",
        "population-max",
        "population-density",
        "pixel-ratio-cap",
    ];

    /// Set one parameter from its textual form.
    pub fn apply_override(&mut self, key: &str, value: &str) -> SimResult<()> {
        let value = value.trim();
        match key {
            "gravity" => self.physics.gravity = parse_finite(key, value)?,
            "lift-strength" => self.physics.lift_strength = parse_finite(key, value)?,
            "rise-rate" => self.physics.rise_rate = parse_non_negative(key, value)?,
            "decay-rate" => self.physics.decay_rate = parse_non_negative(key, value)?,
            "random-light-rate" => {
                self.physics.random_light_rate = parse_non_negative(key, value)?
            }
            "horizontal-drag" => self.physics.horizontal_drag = parse_unit(key, value)?,
            "vertical-drag" => self.physics.vertical_drag = parse_unit(key, value)?,
            "max-vertical-speed" => {
                self.physics.max_vertical_speed = parse_non_negative(key, value)?
            }
            "restitution" => self.collision.restitution = parse_unit(key, value)?,
            "collision-cadence" => {
                self.collision.cadence = value.parse().map_err(|_| invalid(key, value))?
            }
            "hover-radius" => self.interaction.hover_radius = parse_non_negative(key, value)?,
            "hover-throttle-ms" => {
                let ms: f64 = parse(key, value)?;
                if ms < 0.0 {
                    return Err(invalid(key, value));
                }
                self.interaction.throttle_ms = ms;
            }
            "brightness-steps" => {
                let steps: u32 = parse(key, value)?;
                if steps == 0 {
                    return Err(invalid(key, value));
                }
                self.look.brightness_steps = steps;
            }
            "population-min" => self.population.min = parse(key, value)?,
            "population-max" => {
                let max: usize = parse(key, value)?;
                if max < self.population.min {
                    return Err(invalid(key, value));
                }
                self.population.max = max;
            }
            "population-density" => {
                let per_base: f64 = parse(key, value)?;
                if !(per_base >= 0.0) {
                    return Err(invalid(key, value));
                }
                self.population.per_base_area = per_base;
            }
            "pixel-ratio-cap" => self.display.pixel_ratio_cap = parse_non_negative(key, value)?,
            _ => return Err(SimError::UnknownParam(key.to_string())),
        }
        // A raised minimum lifts the maximum with it
        if self.population.min > self.population.max {
            log::debug!("[params] population-max raised to {}", self.population.min);
            self.population.max = self.population.min;
        }
        Ok(())
    }

    /// Apply a batch of overrides, logging and skipping the ones that fail.
    pub fn apply_overrides<'a>(
        &mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<SimError> {
        let mut errors = Vec::new();
        for (key, value) in pairs {
            match self.apply_override(key, value) {
                Ok(()) => log::debug!("[params] {key} = {value}"),
                Err(e) => {
                    log::warn!("[params] skipped override: {e}");
                    errors.push(e);
                }
            }
        }
        errors
    }
}

fn invalid(key: &str, value: &str) -> SimError {
    SimError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> SimResult<T> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_finite(key: &str, value: &str) -> SimResult<f32> {
    let v: f32 = parse(key, value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(key, value))
    }
}

fn parse_non_negative(key: &str, value: &str) -> SimResult<f32> {
    let v = parse_finite(key, value)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(invalid(key, value))
    }
}

fn parse_unit(key: &str, value: &str) -> SimResult<f32> {
    let v = parse_finite(key, value)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(invalid(key, value))
    }
}
