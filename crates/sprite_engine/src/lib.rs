//! # Sprite Engine
//!
//! The per-frame execution core of a 2D game engine: a frame scheduler with
//! a fixed-timestep accumulator, a staging pass that repairs hierarchical
//! world transforms and the z-ordered draw list through dirty propagation,
//! and a batched mesh renderer that coalesces draw calls while preserving
//! correct GPU state ordering.
//!
//! ## Architecture
//!
//! - **FrameScheduler**: runs the update groups, then staging, then the
//!   render pass, once per invocation, single-threaded and cooperative
//! - **StagingPass**: drains deferred destruction and recomputes only the
//!   transforms the dirty rules say changed
//! - **ZOrderIndex**: flat descending-z paint order, incrementally maintained
//! - **BatchRenderer**: accumulates geometry and flushes exactly when GPU
//!   state must change
//!
//! The GPU, physics engine, and component callbacks are external
//! collaborators behind narrow traits ([`render::RenderDevice`],
//! [`scheduler::Physics`], [`scheduler::FrameCallbacks`]), so the core runs
//! headless under test.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprite_engine::prelude::*;
//!
//! struct Game;
//! impl FrameCallbacks for Game {}
//!
//! let config = EngineConfig::default();
//! let mut scheduler = FrameScheduler::new(&config);
//! let mut scene = SceneGraph::new();
//! let mut z_order = ZOrderIndex::new();
//! let mut destruction = DestructionQueue::new();
//! let mut physics = NullPhysics::new();
//! let mut device = NullDevice::new();
//! let mut game = Game;
//!
//! loop {
//!     let mut frame = Frame {
//!         scene: &mut scene,
//!         z_order: &mut z_order,
//!         destruction: &mut destruction,
//!         physics: &mut physics,
//!         device: &mut device,
//!         camera: Mat3::identity(),
//!     };
//!     scheduler.run_frame(&mut game, &mut frame);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod scheduler;

/// Common imports for engine users
pub mod prelude {
    pub use crate::core::config::{BatchRendererConfig, Config, EngineConfig, SchedulerConfig};
    pub use crate::foundation::{
        math::{Mat3, Transform2D, Vec2},
        time::Timer,
    };
    pub use crate::render::{
        BatchRenderer, BlendMode, Mesh, NullDevice, RenderDevice, RenderError, RenderStats,
        Renderable, ShaderId, TextureHandle, UniformFlags, Vertex2D,
    };
    pub use crate::scene::{
        DestructionQueue, NodeKey, SceneGraph, StagingPass, StagingStats, TransformNode,
        ZOrderIndex,
    };
    pub use crate::scheduler::{
        Frame, FrameCallbacks, FrameFlow, FrameOutcome, FramePhase, FrameScheduler, NullPhysics,
        Physics, UpdateContext,
    };
}
