//! The simulation as a whole: owns the pool, camera, collision grid and
//! hover throttle, and advances everything one frame per [`Simulation::tick`].

use crate::camera::{Camera, VisibleVolume};
use crate::collision::SpatialHash;
use crate::error::{SimError, SimResult};
use crate::geometry::LanternGeometry;
use crate::interaction::{apply_hover, clear_hover, HoverThrottle};
use crate::lantern::LanternInstance;
use crate::params::{CollisionCadence, SimParams};
use crate::physics::{clamp_dt, integrate, StepContext};
use crate::pool::LanternPool;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// What one call to [`Simulation::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Lanterns whose vertex colours were rewritten.
    pub recolored: usize,
    pub recycled: usize,
    pub collision_pairs: usize,
    /// Lanterns that had non-finite state replaced.
    pub sanitized: usize,
}

impl FrameStats {
    fn accumulate(&mut self, other: &FrameStats) {
        self.recolored += other.recolored;
        self.recycled += other.recycled;
        self.collision_pairs += other.collision_pairs;
        self.sanitized += other.sanitized;
    }
}

/// Running totals for the once-per-second debug line.
#[derive(Default)]
struct StatsWindow {
    seconds: f32,
    frames: u32,
    totals: FrameStats,
}

pub struct Simulation {
    params: SimParams,
    camera: Camera,
    volume: VisibleVolume,
    pool: LanternPool,
    grid: SpatialHash,
    throttle: HoverThrottle,
    rng: StdRng,
    width: f32,
    height: f32,
    paused: bool,
    elapsed: f32,
    collision_phase: bool,
    window: StatsWindow,
}

impl Simulation {
    /// Build the shared geometry and the initial population for a container
    /// of `width x height` CSS pixels.
    pub fn new(params: SimParams, width: f32, height: f32, seed: u64) -> SimResult<Self> {
        check_viewport(width, height)?;
        let geometry = Arc::new(LanternGeometry::build(&params.shape));
        let camera = Camera::hero(width / height);
        let volume = VisibleVolume::from_camera(&camera, &params.bounds);
        let grid = SpatialHash::new(geometry.collision_radius * params.collision.cell_factor);
        let throttle = HoverThrottle::new(params.interaction.throttle_ms);
        let mut rng = StdRng::seed_from_u64(seed);

        let count = params.population.count_for(width, height);
        let mut pool = LanternPool::new(geometry);
        pool.populate(count, &params, &volume, &mut rng);
        log::info!(
            "[sim] {} lanterns for {}x{} ({} vertices each)",
            count,
            width,
            height,
            pool.geometry().vertex_count()
        );

        Ok(Self {
            params,
            camera,
            volume,
            pool,
            grid,
            throttle,
            rng,
            width,
            height,
            paused: false,
            elapsed: 0.0,
            collision_phase: false,
            window: StatsWindow::default(),
        })
    }

    /// Track a container resize. Degenerate sizes are rejected and the
    /// previous bounds kept.
    pub fn resize(&mut self, width: f32, height: f32) -> SimResult<()> {
        check_viewport(width, height)?;
        self.width = width;
        self.height = height;
        self.camera.set_aspect(width / height);
        self.volume = VisibleVolume::from_camera(&self.camera, &self.params.bounds);
        log::debug!(
            "[sim] resize {}x{}, x band ±{:.2}",
            width,
            height,
            self.volume.x_off
        );
        Ok(())
    }

    /// Advance one frame. `raw_dt` is the wall-clock delta in seconds.
    /// While paused nothing is mutated.
    pub fn tick(&mut self, raw_dt: f32) -> FrameStats {
        let dt = clamp_dt(raw_dt, &self.params.physics);
        let mut stats = FrameStats::default();
        if !self.paused {
            self.step(dt, &mut stats);
        }
        self.record(dt, &stats);
        stats
    }

    fn step(&mut self, dt: f32, stats: &mut FrameStats) {
        self.elapsed += dt;
        let ctx = StepContext {
            dt,
            time: self.elapsed,
            physics: &self.params.physics,
            volume: &self.volume,
        };
        for lantern in self.pool.lanterns_mut() {
            let outcome = integrate(lantern, &ctx, &mut self.rng);
            stats.recycled += outcome.recycled as usize;
            stats.sanitized += outcome.sanitized as usize;
        }

        self.collision_phase = !self.collision_phase;
        let collide = match self.params.collision.cadence {
            CollisionCadence::EveryFrame => true,
            CollisionCadence::EveryOtherFrame => !self.collision_phase,
        };
        if collide {
            let radius = self.pool.geometry().collision_radius;
            stats.collision_pairs =
                self.grid
                    .resolve(self.pool.lanterns_mut(), radius, self.params.collision.restitution);
        }

        let geometry = Arc::clone(self.pool.geometry());
        let look = &self.params.look;
        for lantern in self.pool.lanterns_mut() {
            if lantern.refresh_colors(look.brightness_steps, look.lit_lightness_gain, &geometry.height_factor) {
                stats.recolored += 1;
            }
            lantern.update_emissive(look.emissive_base, look.emissive_gain);
        }

        if stats.sanitized > 0 {
            log::warn!("[sim] sanitized {} lanterns with non-finite state", stats.sanitized);
        }
    }

    fn record(&mut self, dt: f32, stats: &FrameStats) {
        let w = &mut self.window;
        w.seconds += dt;
        w.frames += 1;
        w.totals.accumulate(stats);
        if w.seconds >= 1.0 {
            log::debug!(
                "[sim] {} frames: recolored={} recycled={} pairs={} paused={}",
                w.frames,
                w.totals.recolored,
                w.totals.recycled,
                w.totals.collision_pairs,
                self.paused
            );
            *w = StatsWindow::default();
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("[sim] paused={}", paused);
        }
        self.paused = paused;
    }

    /// Flip the pause flag and return the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Re-evaluate hover flags for a pointer at `ndc`, unless throttled.
    /// Returns whether an evaluation ran.
    pub fn pointer_move(&mut self, ndc: Vec2, now_ms: f64) -> bool {
        if !self.throttle.should_evaluate(now_ms) {
            return false;
        }
        let view_proj = self.camera.view_proj();
        apply_hover(
            self.pool.lanterns_mut(),
            &view_proj,
            ndc,
            self.params.interaction.hover_radius,
        );
        true
    }

    pub fn pointer_leave(&mut self) {
        clear_hover(self.pool.lanterns_mut());
    }

    /// Hand every lantern whose colours changed since the last drain to `upload`.
    pub fn drain_dirty_colors(&mut self, mut upload: impl FnMut(usize, &[f32])) -> usize {
        let mut drained = 0;
        for (i, lantern) in self.pool.lanterns_mut().iter_mut().enumerate() {
            if lantern.colors_dirty {
                upload(i, &lantern.colors);
                lantern.colors_dirty = false;
                drained += 1;
            }
        }
        drained
    }

    pub fn lanterns(&self) -> &[LanternInstance] {
        self.pool.lanterns()
    }

    pub fn lanterns_mut(&mut self) -> &mut [LanternInstance] {
        self.pool.lanterns_mut()
    }

    pub fn geometry(&self) -> &Arc<LanternGeometry> {
        self.pool.geometry()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn volume(&self) -> &VisibleVolume {
        &self.volume
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Simulated seconds; does not advance while paused.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

fn check_viewport(width: f32, height: f32) -> SimResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SimError::DegenerateViewport { width, height })
    }
}
