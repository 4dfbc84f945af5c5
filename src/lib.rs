//! Grid snake driven by a binary-weighted feed-forward policy.
//!
//! The crate is an evaluation environment: a [`SnakeGame`] plants apples from a
//! seeded [`AppleGenerator`], feeds the [`DistanceSensor`] perception of its
//! [`Snake`] to a [`Policy`], and reports score and step counts. Episodes share
//! nothing, so [`eval::evaluate`] runs them in parallel.

pub mod apple;
pub mod brain;
pub mod config;
pub mod draw;
pub mod error;
pub mod eval;
pub mod game;
pub mod landscape;
pub mod sensor;
pub mod snake;
pub mod store;

pub use apple::AppleGenerator;
pub use brain::{Activation, BinaryNetwork, NetworkShape, Policy};
pub use config::{AppConfig, EpisodeConfig, NetworkConfig};
pub use draw::{FrameRender, NoRender, Render};
pub use error::{ConfigError, GameError, PolicyError, SnakeError};
pub use game::{EpisodeReport, SnakeGame, Termination};
pub use landscape::{Cell, Coordinate, Landscape};
pub use sensor::{DistanceSensor, PERCEPTION_LEN, Perception};
pub use snake::{Action, DeathCause, Move, Snake};
pub use store::{FileStore, MemoryStore, WeightSet, WeightStore};
