//! Scene forest, staging, z-order, and deferred destruction

pub mod destruction;
pub mod graph;
pub mod node;
pub mod staging;
pub mod z_order;

pub use destruction::DestructionQueue;
pub use graph::SceneGraph;
pub use node::{NodeKey, TransformNode};
pub use staging::{StagingPass, StagingStats};
pub use z_order::ZOrderIndex;
