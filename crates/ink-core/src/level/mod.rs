//! Level generation on top of the grid graph
//!
//! Rooms carry ink (obstacles), role stickers and exit flags. A level is
//! generated by stamping obstacle shapes, carving a route through them and
//! placing keys along it. The player then draws their own path through the
//! rooms, and the finished path is handed to a room builder.

mod carve;
mod generator;
mod keys;
mod player_path;
mod room;
mod shape;
mod template;

pub use carve::{CarveOutcome, PathCarver, TravelDirection, is_blocked};
pub use generator::{Level, generate_level};
pub use keys::place_keys;
pub use player_path::PlayerPath;
pub use room::{
    ExitFlags, InkState, RoleMarker, RoomConsumer, RoomDescription, RoomDescriptor, RoomGraph,
};
pub use shape::{ShapeLibrary, ShapeRecord, ShapeSource, ShapeTemplate, Side, StampAxis, stamp};
pub use template::LevelTemplate;
