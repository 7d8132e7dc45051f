//! Procedural level generation on a grid of rooms
//!
//! The crate is split in two layers:
//!
//! - [`graph`]: a generic 4-connected grid graph with an A* search that takes
//!   a caller-supplied blocking predicate and can return partial paths.
//! - [`level`]: rooms with obstacles, shape stamping, route carving, key
//!   placement and the player's path.
//!
//! Generation is deterministic for a given [`GameRng`] seed:
//!
//! ```
//! use ink_core::{GameRng, LevelTemplate, ShapeLibrary, generate_level};
//!
//! let mut shapes = ShapeLibrary::builtin()?;
//! let mut rng = GameRng::new(42);
//! let level = generate_level(&LevelTemplate::default(), &mut shapes, &mut rng)?;
//! assert_eq!(level.route_positions().first(), Some(&level.start()));
//! # Ok::<(), ink_core::GenerationError>(())
//! ```

pub mod error;
pub mod graph;
pub mod level;
mod rng;

pub use error::{GenerationError, Result};
pub use graph::{Direction, Graph, NodeId, Position};
pub use level::{
    Level, LevelTemplate, PlayerPath, RoomConsumer, RoomDescriptor, ShapeLibrary, ShapeSource,
    ShapeTemplate, Side, generate_level,
};
pub use rng::GameRng;
