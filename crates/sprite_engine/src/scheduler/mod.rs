//! # Frame Scheduler
//!
//! Drives exactly one simulation + render cycle per invocation, in a fixed
//! phase order: the update groups (Input, Animation, the fixed-step physics
//! loop, Update, LateUpdate, DebugDraw), then the staging pass, then the
//! batched render pass.
//!
//! Pausing skips the update groups only; staging and rendering still run so
//! editor-time field edits and debug drawing stay visible. A one-shot
//! single-step flag forces one update despite pause. Any update callback can
//! abort the frame by returning [`FrameFlow::AbortFrame`]; the abort is
//! ordinary control flow, surfaced as [`FrameOutcome::Aborted`], never as an
//! error.

use crate::core::config::{EngineConfig, SchedulerConfig};
use crate::foundation::math::Mat3;
use crate::foundation::time::Timer;
use crate::render::batch_renderer::BatchRenderer;
use crate::render::device::RenderDevice;
use crate::render::stats::RenderStats;
use crate::scene::destruction::DestructionQueue;
use crate::scene::graph::SceneGraph;
use crate::scene::staging::{StagingPass, StagingStats};
use crate::scene::z_order::ZOrderIndex;

/// Control-flow result of a single update callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    /// Proceed with the rest of the frame
    Continue,
    /// Discard the remainder of this frame's work (engine reload etc.)
    AbortFrame,
}

impl FrameFlow {
    /// Whether this value aborts the frame
    pub fn is_abort(self) -> bool {
        self == Self::AbortFrame
    }
}

/// How a frame invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// All phases ran
    Completed,
    /// An update callback aborted; staging and rendering were skipped
    Aborted,
}

/// Scheduler phase, cyclic across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Between frames
    Idle,
    /// Running the update groups
    Updating,
    /// Running the staging pass
    Staging,
    /// Running the render pass
    Rendering,
}

/// Per-frame collaborators, passed explicitly instead of living in globals
///
/// Borrowed for the duration of one [`FrameScheduler::run_frame`] call.
pub struct Frame<'a> {
    /// The scene forest
    pub scene: &'a mut SceneGraph,
    /// Paint-order index over the scene's renderables
    pub z_order: &'a mut ZOrderIndex,
    /// Deferred structural mutations, drained by staging
    pub destruction: &'a mut DestructionQueue,
    /// Physics collaborator owning the fixed-step accumulator
    pub physics: &'a mut dyn Physics,
    /// GPU boundary for the render pass
    pub device: &'a mut dyn RenderDevice,
    /// Shared camera transform for pre-multiplied renderables
    pub camera: Mat3,
}

impl Frame<'_> {
    /// Narrow view handed to update callbacks
    pub fn update_ctx(&mut self, delta_time: f32) -> UpdateContext<'_> {
        UpdateContext {
            scene: &mut *self.scene,
            destruction: &mut *self.destruction,
            delta_time,
        }
    }
}

/// What an update callback may touch
///
/// Structural removals go through the destruction queue; the scene graph and
/// z-order index are repaired by staging after the update phase completes.
pub struct UpdateContext<'a> {
    /// The scene forest (local fields free to mutate)
    pub scene: &'a mut SceneGraph,
    /// Queue for deferred destruction
    pub destruction: &'a mut DestructionQueue,
    /// Delta for this callback: the frame delta, or the fixed step size
    /// inside the fixed-update group
    pub delta_time: f32,
}

/// Callback groups dispatched by the scheduler, in declaration order
///
/// Implemented by the scene/component layer, which fans each group out to
/// its live components in hierarchy order. Every method defaults to
/// [`FrameFlow::Continue`].
pub trait FrameCallbacks {
    /// Process external input events
    fn input(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }

    /// Advance time-based animation/tween state
    fn animation(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }

    /// Fixed-step simulation update (before the physics step)
    fn fixed_update(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }

    /// Fixed-step update that must see the physics step's results
    fn late_fixed_update(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }

    /// General per-frame update
    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }

    /// Update that must see this frame's [`FrameCallbacks::update`] results
    fn late_update(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }

    /// Editor-only diagnostic drawing
    fn debug_draw(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
        let _ = ctx;
        FrameFlow::Continue
    }
}

/// Physics collaborator boundary
///
/// The engine core never steps physics itself; it drives this trait from the
/// fixed-step loop. The accumulator lives with the collaborator so external
/// tools can read and reset banked time.
pub trait Physics {
    /// Advance one fixed physics step; `advance_time` distinguishes a real
    /// simulation step from a forced re-solve
    fn step(&mut self, advance_time: bool);

    /// Hook invoked on frames where zero fixed steps ran, letting dependent
    /// systems resolve forced state changes without a simulation step
    fn step_zero(&mut self);

    /// Banked simulation time in seconds
    fn accumulator(&self) -> f32;

    /// Overwrite the banked simulation time
    fn set_accumulator(&mut self, seconds: f32);
}

/// Physics stand-in that owns only the accumulator
///
/// Used when no physics engine is wired up, and by tests.
#[derive(Debug, Default)]
pub struct NullPhysics {
    accumulator: f32,
}

impl NullPhysics {
    /// Create a stand-in with zero banked time
    pub fn new() -> Self {
        Self::default()
    }
}

impl Physics for NullPhysics {
    fn step(&mut self, _advance_time: bool) {}

    fn step_zero(&mut self) {}

    fn accumulator(&self) -> f32 {
        self.accumulator
    }

    fn set_accumulator(&mut self, seconds: f32) {
        self.accumulator = seconds;
    }
}

/// Top-level per-frame orchestrator
///
/// Owns the staging pass and batch renderer; everything else arrives through
/// the explicit [`Frame`] context so tests can supply fakes.
pub struct FrameScheduler {
    config: SchedulerConfig,
    timer: Timer,
    staging: StagingPass,
    renderer: BatchRenderer,
    phase: FramePhase,
    paused: bool,
    step_once: bool,
}

impl FrameScheduler {
    /// Create a scheduler from the engine configuration
    ///
    /// # Panics
    ///
    /// Panics on non-positive step sizes; a zero fixed step would spin the
    /// accumulator loop forever.
    pub fn new(config: &EngineConfig) -> Self {
        assert!(
            config.scheduler.fixed_delta_time > 0.0,
            "fixed_delta_time must be positive"
        );
        assert!(
            config.scheduler.max_delta_time > 0.0,
            "max_delta_time must be positive"
        );
        Self {
            config: config.scheduler.clone(),
            timer: Timer::new(),
            staging: StagingPass::new(),
            renderer: BatchRenderer::new(config.renderer.clone()),
            phase: FramePhase::Idle,
            paused: false,
            step_once: false,
        }
    }

    /// Current phase (Idle between frames)
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Whether the update phase is being skipped
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Skip the update phase on subsequent frames
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume running the update phase
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Run the update phase once on the next frame despite pause
    pub fn step_frame(&mut self) {
        self.step_once = true;
    }

    /// Render statistics from the most recent render pass
    pub fn render_stats(&self) -> &RenderStats {
        self.renderer.stats()
    }

    /// Reset the peak draw-call counter
    pub fn reset_peak_stats(&mut self) {
        self.renderer.reset_peak_stats();
    }

    /// Staging statistics from the most recent staging pass
    pub fn staging_stats(&self) -> &StagingStats {
        self.staging.stats()
    }

    /// Run one frame, measuring the delta with the internal timer
    pub fn run_frame(
        &mut self,
        callbacks: &mut dyn FrameCallbacks,
        frame: &mut Frame<'_>,
    ) -> FrameOutcome {
        self.timer.tick();
        let delta_time = self.timer.delta_time();
        self.run_frame_with_delta(callbacks, frame, delta_time)
    }

    /// Run one frame with an externally supplied delta (frame pumps, tests)
    pub fn run_frame_with_delta(
        &mut self,
        callbacks: &mut dyn FrameCallbacks,
        frame: &mut Frame<'_>,
        delta_time: f32,
    ) -> FrameOutcome {
        self.phase = FramePhase::Updating;
        if !self.paused || self.step_once {
            self.step_once = false;
            if self
                .run_update_groups(callbacks, frame, delta_time)
                .is_abort()
            {
                log::debug!("frame aborted during update");
                self.phase = FramePhase::Idle;
                return FrameOutcome::Aborted;
            }
        }

        // Staging and rendering run even while paused: by the time any
        // render-phase consumer observes the scene, world transforms and the
        // z-order index are fully consistent.
        self.phase = FramePhase::Staging;
        self.staging
            .run(frame.scene, frame.z_order, frame.destruction);

        self.phase = FramePhase::Rendering;
        let camera = frame.camera;
        self.renderer
            .render_pass(frame.scene, frame.z_order, &camera, frame.device);

        self.phase = FramePhase::Idle;
        FrameOutcome::Completed
    }

    /// Dispatch the update groups in their fixed order
    fn run_update_groups(
        &self,
        callbacks: &mut dyn FrameCallbacks,
        frame: &mut Frame<'_>,
        delta_time: f32,
    ) -> FrameFlow {
        if callbacks.input(&mut frame.update_ctx(delta_time)).is_abort() {
            return FrameFlow::AbortFrame;
        }
        if callbacks
            .animation(&mut frame.update_ctx(delta_time))
            .is_abort()
        {
            return FrameFlow::AbortFrame;
        }
        if self.run_fixed_steps(callbacks, frame, delta_time).is_abort() {
            return FrameFlow::AbortFrame;
        }
        if callbacks
            .update(&mut frame.update_ctx(delta_time))
            .is_abort()
        {
            return FrameFlow::AbortFrame;
        }
        if callbacks
            .late_update(&mut frame.update_ctx(delta_time))
            .is_abort()
        {
            return FrameFlow::AbortFrame;
        }
        if callbacks
            .debug_draw(&mut frame.update_ctx(delta_time))
            .is_abort()
        {
            return FrameFlow::AbortFrame;
        }
        FrameFlow::Continue
    }

    /// Accumulator-driven fixed-step loop
    ///
    /// The delta clamp bounds catch-up work after a slow frame (the "spiral
    /// of death"). Leftover time stays banked: subtraction, never a reset.
    /// Zero iterations is a valid outcome; the zero-step hook still lets
    /// dependent systems resolve forced state changes.
    fn run_fixed_steps(
        &self,
        callbacks: &mut dyn FrameCallbacks,
        frame: &mut Frame<'_>,
        delta_time: f32,
    ) -> FrameFlow {
        let fixed_delta = self.config.fixed_delta_time;
        let mut accumulator =
            frame.physics.accumulator() + delta_time.min(self.config.max_delta_time);
        let mut iterations = 0u32;

        while accumulator >= fixed_delta {
            accumulator -= fixed_delta;
            iterations += 1;

            if callbacks
                .fixed_update(&mut frame.update_ctx(fixed_delta))
                .is_abort()
            {
                frame.physics.set_accumulator(accumulator);
                return FrameFlow::AbortFrame;
            }
            frame.physics.step(true);
            if callbacks
                .late_fixed_update(&mut frame.update_ctx(fixed_delta))
                .is_abort()
            {
                frame.physics.set_accumulator(accumulator);
                return FrameFlow::AbortFrame;
            }
        }

        if iterations == 0 {
            frame.physics.step_zero();
        }
        frame.physics.set_accumulator(accumulator);
        FrameFlow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::core::config::BatchRendererConfig;
    use crate::foundation::math::Vec2;
    use crate::render::device::NullDevice;
    use crate::render::mesh::Mesh;
    use crate::render::renderable::{BlendMode, Renderable, ShaderId};
    use crate::scene::node::NodeKey;

    fn config() -> EngineConfig {
        EngineConfig {
            scheduler: SchedulerConfig {
                fixed_delta_time: 1.0 / 60.0,
                max_delta_time: 1.0 / 30.0,
            },
            renderer: BatchRendererConfig::default(),
        }
    }

    /// Scene-independent world: all collaborators a frame needs
    struct Harness {
        scene: SceneGraph,
        z_order: ZOrderIndex,
        destruction: DestructionQueue,
        physics: CountingPhysics,
        device: NullDevice,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                scene: SceneGraph::new(),
                z_order: ZOrderIndex::new(),
                destruction: DestructionQueue::new(),
                physics: CountingPhysics::default(),
                device: NullDevice::new(),
            }
        }

        fn run(
            &mut self,
            scheduler: &mut FrameScheduler,
            callbacks: &mut dyn FrameCallbacks,
            delta_time: f32,
        ) -> FrameOutcome {
            let mut frame = Frame {
                scene: &mut self.scene,
                z_order: &mut self.z_order,
                destruction: &mut self.destruction,
                physics: &mut self.physics,
                device: &mut self.device,
                camera: Mat3::identity(),
            };
            scheduler.run_frame_with_delta(callbacks, &mut frame, delta_time)
        }
    }

    #[derive(Debug, Default)]
    struct CountingPhysics {
        accumulator: f32,
        steps: u32,
        zero_steps: u32,
    }

    impl Physics for CountingPhysics {
        fn step(&mut self, advance_time: bool) {
            assert!(advance_time);
            self.steps += 1;
        }

        fn step_zero(&mut self) {
            self.zero_steps += 1;
        }

        fn accumulator(&self) -> f32 {
            self.accumulator
        }

        fn set_accumulator(&mut self, seconds: f32) {
            self.accumulator = seconds;
        }
    }

    /// Records the dispatch order of every group
    #[derive(Debug, Default)]
    struct RecordingCallbacks {
        order: Vec<&'static str>,
        abort_in: Option<&'static str>,
    }

    impl RecordingCallbacks {
        fn visit(&mut self, group: &'static str) -> FrameFlow {
            self.order.push(group);
            if self.abort_in == Some(group) {
                FrameFlow::AbortFrame
            } else {
                FrameFlow::Continue
            }
        }
    }

    impl FrameCallbacks for RecordingCallbacks {
        fn input(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("input")
        }

        fn animation(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("animation")
        }

        fn fixed_update(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("fixed_update")
        }

        fn late_fixed_update(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("late_fixed_update")
        }

        fn update(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("update")
        }

        fn late_update(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("late_update")
        }

        fn debug_draw(&mut self, _ctx: &mut UpdateContext<'_>) -> FrameFlow {
            self.visit("debug_draw")
        }
    }

    #[test]
    fn test_update_groups_run_in_order() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        // One fixed step's worth of time, delivered exactly
        let outcome = harness.run(&mut scheduler, &mut callbacks, 1.0 / 60.0);

        assert_eq!(outcome, FrameOutcome::Completed);
        assert_eq!(
            callbacks.order,
            vec![
                "input",
                "animation",
                "fixed_update",
                "late_fixed_update",
                "update",
                "late_update",
                "debug_draw",
            ]
        );
        assert_eq!(scheduler.phase(), FramePhase::Idle);
    }

    #[test]
    fn test_small_delta_banks_time_and_runs_zero_step() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        harness.run(&mut scheduler, &mut callbacks, 1.0 / 120.0);

        assert_eq!(harness.physics.steps, 0);
        assert_eq!(harness.physics.zero_steps, 1);
        assert_relative_eq!(harness.physics.accumulator, 1.0 / 120.0);
        assert!(!callbacks.order.contains(&"fixed_update"));
    }

    #[test]
    fn test_banked_time_triggers_step_on_later_frame() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        harness.run(&mut scheduler, &mut callbacks, 1.0 / 120.0);
        harness.run(&mut scheduler, &mut callbacks, 1.0 / 120.0);

        // 1/120 + 1/120 reaches exactly one fixed step with nothing left
        assert_eq!(harness.physics.steps, 1);
        assert_eq!(harness.physics.zero_steps, 1);
        assert_relative_eq!(harness.physics.accumulator, 0.0);
    }

    #[test]
    fn test_half_step_cadence_over_eight_frames() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        // Feeding half a fixed step per frame alternates between banking and
        // stepping; after 8 frames exactly 4 steps ran and the bank is empty.
        for _ in 0..8 {
            harness.run(&mut scheduler, &mut callbacks, 1.0 / 120.0);
        }

        assert_eq!(harness.physics.steps, 4);
        assert_eq!(harness.physics.zero_steps, 4);
        assert_relative_eq!(harness.physics.accumulator, 0.0);
    }

    #[test]
    fn test_slow_frame_is_clamped() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        // A full second of delta only banks max_delta_time = 2 fixed steps
        harness.run(&mut scheduler, &mut callbacks, 1.0);

        assert_eq!(harness.physics.steps, 2);
        assert_relative_eq!(harness.physics.accumulator, 0.0);
    }

    #[test]
    fn test_leftover_time_is_subtracted_not_reset() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        harness.physics.accumulator = 0.025;
        harness.run(&mut scheduler, &mut callbacks, 0.0);

        assert_eq!(harness.physics.steps, 1);
        assert_relative_eq!(
            harness.physics.accumulator,
            0.025 - 1.0 / 60.0,
            epsilon = 1e-7
        );
    }

    #[test]
    fn test_abort_skips_rest_of_frame() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks {
            abort_in: Some("animation"),
            ..Default::default()
        };

        let key = harness.scene.spawn_root();
        harness.destruction.queue_soft_destroy(key);
        let outcome = harness.run(&mut scheduler, &mut callbacks, 1.0 / 60.0);

        assert_eq!(outcome, FrameOutcome::Aborted);
        assert_eq!(callbacks.order, vec!["input", "animation"]);
        // Staging never ran: the queued destruction is still pending
        assert!(!harness.destruction.is_empty());
        assert!(harness.scene.contains(key));
        assert_eq!(scheduler.phase(), FramePhase::Idle);
    }

    #[test]
    fn test_abort_in_fixed_loop_keeps_consumed_accumulator() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks {
            abort_in: Some("fixed_update"),
            ..Default::default()
        };

        let outcome = harness.run(&mut scheduler, &mut callbacks, 1.0 / 30.0);

        assert_eq!(outcome, FrameOutcome::Aborted);
        // One step's worth was consumed before the abort; the rest is banked
        assert_relative_eq!(harness.physics.accumulator, 1.0 / 60.0, epsilon = 1e-7);
        assert_eq!(harness.physics.steps, 0);
    }

    #[test]
    fn test_pause_skips_update_but_stages_and_renders() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        let key = harness.scene.spawn_root();
        harness.destruction.queue_soft_destroy(key);

        scheduler.pause();
        let outcome = harness.run(&mut scheduler, &mut callbacks, 1.0 / 60.0);

        assert_eq!(outcome, FrameOutcome::Completed);
        assert!(callbacks.order.is_empty());
        // Staging ran while paused: the destruction was drained
        assert!(!harness.scene.contains(key));
        assert_eq!(harness.physics.zero_steps, 0);
    }

    #[test]
    fn test_step_frame_forces_one_update_while_paused() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();
        let mut callbacks = RecordingCallbacks::default();

        scheduler.pause();
        scheduler.step_frame();
        harness.run(&mut scheduler, &mut callbacks, 1.0 / 60.0);
        let first_frame_groups = callbacks.order.len();
        harness.run(&mut scheduler, &mut callbacks, 1.0 / 60.0);

        assert_eq!(first_frame_groups, 7);
        assert_eq!(callbacks.order.len(), first_frame_groups);
        assert!(scheduler.is_paused());
    }

    #[test]
    #[should_panic(expected = "fixed_delta_time must be positive")]
    fn test_zero_fixed_delta_rejected() {
        let mut bad = config();
        bad.scheduler.fixed_delta_time = 0.0;
        FrameScheduler::new(&bad);
    }

    /// Minimal premultiplied sprite for pipeline integration tests
    struct QuadSprite {
        mesh: Mesh,
    }

    impl QuadSprite {
        fn new() -> Self {
            Self {
                mesh: Mesh::unit_quad(),
            }
        }
    }

    impl Renderable for QuadSprite {
        fn mesh(&mut self) -> &Mesh {
            &self.mesh
        }

        fn shader(&self) -> ShaderId {
            ShaderId(1)
        }

        fn blend_mode(&self) -> BlendMode {
            BlendMode::Normal
        }

        fn premultiplied_world(&self) -> bool {
            true
        }
    }

    /// Moves a node each update; used to verify the full pipeline contract
    struct MovingCallbacks {
        target: NodeKey,
    }

    impl FrameCallbacks for MovingCallbacks {
        fn update(&mut self, ctx: &mut UpdateContext<'_>) -> FrameFlow {
            if let Some(node) = ctx.scene.node_mut(self.target) {
                node.transform.position += Vec2::new(1.0, 0.0) * ctx.delta_time;
            }
            FrameFlow::Continue
        }
    }

    #[test]
    fn test_full_frame_pipeline() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();

        let a = harness.scene.spawn_root();
        let b = harness.scene.spawn_root();
        harness.scene.node_mut(a).unwrap().z_offset = 2.0;
        harness.scene.node_mut(b).unwrap().z_offset = 1.0;
        harness
            .scene
            .set_renderable(a, Box::new(QuadSprite::new()), &mut harness.z_order);
        harness
            .scene
            .set_renderable(b, Box::new(QuadSprite::new()), &mut harness.z_order);

        let mut callbacks = MovingCallbacks { target: a };
        let outcome = harness.run(&mut scheduler, &mut callbacks, 1.0 / 60.0);

        assert_eq!(outcome, FrameOutcome::Completed);
        // Both quads share all GPU state: one draw call, four triangles
        assert_eq!(scheduler.render_stats().draw_calls, 1);
        assert_eq!(scheduler.render_stats().triangles, 4);
        assert!(harness.z_order.is_sorted());
        // The moved node's world transform is consistent after the frame
        let world = *harness.scene.node(a).unwrap().world_matrix();
        assert_relative_eq!(world[(0, 2)], 1.0 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_second_clean_frame_restages_nothing() {
        let mut scheduler = FrameScheduler::new(&config());
        let mut harness = Harness::new();

        let a = harness.scene.spawn_root();
        harness
            .scene
            .set_renderable(a, Box::new(QuadSprite::new()), &mut harness.z_order);

        let mut callbacks = RecordingCallbacks::default();
        harness.run(&mut scheduler, &mut callbacks, 1.0 / 120.0);
        harness.run(&mut scheduler, &mut callbacks, 1.0 / 120.0);

        assert_eq!(scheduler.staging_stats().local_recomputes, 0);
        assert_eq!(scheduler.staging_stats().world_recomputes, 0);
        // Rendering still issues the frame's draw
        assert_eq!(scheduler.render_stats().draw_calls, 1);
    }
}
