//! Room payload carried by every node of the level graph

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::graph::{Direction, Graph, GridNode, Position};

/// Graph type used for levels
pub type RoomGraph = Graph<RoomDescription>;

/// Obstacle state of a room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum InkState {
    #[default]
    None = 0,
    Blocked = 1,
}

/// Role sticker placed on a room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum RoleMarker {
    #[default]
    None = 0,
    Start = 1,
    Exit = 2,
    Key = 3,
}

impl RoleMarker {
    /// Map symbol, if the sticker is drawn over the room
    pub const fn symbol(&self) -> Option<char> {
        match self {
            RoleMarker::None => None,
            RoleMarker::Start => Some('S'),
            RoleMarker::Exit => Some('E'),
            RoleMarker::Key => Some('K'),
        }
    }
}

bitflags! {
    /// Open exits of a room
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExitFlags: u8 {
        const NORTH = 0x01;
        const SOUTH = 0x02;
        const WEST = 0x04;
        const EAST = 0x08;
    }
}

impl ExitFlags {
    /// Flag for a single direction
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::North => ExitFlags::NORTH,
            Direction::South => ExitFlags::SOUTH,
            Direction::West => ExitFlags::WEST,
            Direction::East => ExitFlags::EAST,
        }
    }

    /// Number of open exits
    pub const fn count(&self) -> u32 {
        self.bits().count_ones()
    }
}

// Manual serde impl for ExitFlags
impl Serialize for ExitFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExitFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(ExitFlags::from_bits_truncate(bits))
    }
}

/// Per-room generation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomDescription {
    pub ink: InkState,
    pub role: RoleMarker,
    pub exits: ExitFlags,
}

impl RoomDescription {
    pub const fn is_inked(&self) -> bool {
        matches!(self.ink, InkState::Blocked)
    }

    pub fn has_exit(&self, direction: Direction) -> bool {
        self.exits.contains(ExitFlags::from_direction(direction))
    }

    /// Number of open exits; always equal to the number of set exit flags
    pub const fn exit_count(&self) -> u32 {
        self.exits.count()
    }

    pub fn open_exit(&mut self, direction: Direction) {
        self.exits.insert(ExitFlags::from_direction(direction));
    }

    pub fn close_exit(&mut self, direction: Direction) {
        self.exits.remove(ExitFlags::from_direction(direction));
    }

    /// Display character for the debug map
    pub const fn symbol(&self) -> char {
        if let Some(c) = self.role.symbol() {
            return c;
        }
        match self.ink {
            InkState::Blocked => '#',
            InkState::None => '.',
        }
    }
}

/// What the room builder receives for each room of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    pub position: Position,
    pub role: RoleMarker,
    pub ink: InkState,
    pub north: bool,
    pub south: bool,
    pub west: bool,
    pub east: bool,
}

impl RoomDescriptor {
    pub fn from_node(node: &GridNode<RoomDescription>) -> Self {
        let room = &node.data;
        Self {
            position: node.position(),
            role: room.role,
            ink: room.ink,
            north: room.has_exit(Direction::North),
            south: room.has_exit(Direction::South),
            west: room.has_exit(Direction::West),
            east: room.has_exit(Direction::East),
        }
    }
}

/// Consumer of finished rooms, implemented by the room builder
pub trait RoomConsumer {
    fn build_room(&mut self, room: &RoomDescriptor);
}

impl RoomConsumer for Vec<RoomDescriptor> {
    fn build_room(&mut self, room: &RoomDescriptor) {
        self.push(*room);
    }
}
