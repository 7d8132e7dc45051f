//! Key placement along the carved route

use crate::error::{GenerationError, Result};
use crate::graph::{NodeId, Position};
use crate::rng::GameRng;

use super::room::{InkState, RoleMarker, RoomGraph};
use super::template::LevelTemplate;

/// Place `template.key_count` keys on rooms of `route`
///
/// Candidates are the route rooms at least `min_key_start_distance` from the
/// start, excluding the start and exit. They are split into one contiguous
/// section per key (the last section takes the remainder) and each key is
/// drawn from its own section, at least `min_key_spacing` away from every key
/// already placed. Key rooms get their ink cleared and the `Key` sticker.
///
/// Within a section a room is drawn uniformly and the nearest admissible room
/// to it is taken. Rooms right next to inadmissible ones therefore come up
/// more often than the rest: on a straight route where the first key rules
/// out the start of a section, the first admissible room wins every draw that
/// lands in the ruled-out part.
///
/// Returns the key rooms in section order.
pub fn place_keys(
    graph: &mut RoomGraph,
    route: &[NodeId],
    start: NodeId,
    exit: NodeId,
    template: &LevelTemplate,
    rng: &mut GameRng,
) -> Result<Vec<NodeId>> {
    let count = template.key_count;
    if count == 0 {
        return Ok(Vec::new());
    }

    let start_pos = graph.node(start).position();
    let exit_pos = graph.node(exit).position();

    let mut seen = vec![false; graph.len()];
    let candidates: Vec<Position> = route
        .iter()
        .filter(|&&id| id != start && id != exit)
        .filter(|&&id| !std::mem::replace(&mut seen[id.index()], true))
        .map(|&id| graph.node(id).position())
        .filter(|pos| pos.manhattan(start_pos) >= template.min_key_start_distance)
        .collect();

    if candidates.len() < count {
        return Err(GenerationError::NoValidKeyLocation { section: 0 });
    }

    let section_len = candidates.len() / count;
    let mut keys: Vec<NodeId> = Vec::with_capacity(count);
    let mut key_positions: Vec<Position> = Vec::with_capacity(count);

    for section in 0..count {
        let lo = section * section_len;
        let hi = if section + 1 == count {
            candidates.len()
        } else {
            lo + section_len
        };
        let rooms = &candidates[lo..hi];
        let seed = rooms[rng.rn2(rooms.len())];

        let found = graph.find_node(seed, |node| {
            let pos = node.position();
            rooms.contains(&pos)
                && pos != start_pos
                && pos != exit_pos
                && node.data.role != RoleMarker::Key
                && key_positions
                    .iter()
                    .all(|key| key.manhattan(pos) >= template.min_key_spacing)
        })?;

        let Some(id) = found else {
            return Err(GenerationError::NoValidKeyLocation { section });
        };

        let node = graph.node_mut(id);
        node.data.ink = InkState::None;
        node.data.role = RoleMarker::Key;
        let pos = node.position();
        tracing::debug!(section, key = %pos, seed = %seed, "placed key");

        keys.push(id);
        key_positions.push(pos);
    }

    Ok(keys)
}
