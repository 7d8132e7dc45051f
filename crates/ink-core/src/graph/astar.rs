//! A* search over the grid graph
//!
//! The open and closed sets are plain lists. Each iteration stable-sorts the
//! open list by f-score and takes the first entry, so among equal scores the
//! node that entered the list first wins. The carving loop relies on that
//! order being deterministic.
//!
//! A node that is already open or closed is never relaxed again. The search
//! still finds the goal whenever it is reachable, and on an open unit-cost
//! grid the path is shortest. Around ink the first path found to a node
//! sticks, so a returned path can be longer than the shortest one.

use crate::error::{GenerationError, Result};

use super::grid::Graph;
use super::node::{GridNode, NodeId, Position, SearchState, SearchStatus};

impl<T> Graph<T> {
    /// Find a path from `start` to `end`
    ///
    /// `blocked(current, candidate)` returns true when `candidate` must not be
    /// entered from `current`. If the goal cannot be reached, returns the path
    /// to the visited node with the lowest f-score when `allow_partial` is
    /// set (ties go to the node closest to the goal), or an empty path.
    pub fn find_path<B>(
        &mut self,
        start: Position,
        end: Position,
        mut blocked: B,
        allow_partial: bool,
    ) -> Result<Vec<NodeId>>
    where
        B: FnMut(&GridNode<T>, &GridNode<T>) -> bool,
    {
        let start_id = self.id_at(start)?;
        let end_id = self.id_at(end)?;

        self.reset_search();

        let h = start.manhattan(end);
        self.nodes[start_id.0].search = SearchState {
            g: 0,
            h,
            f: h,
            parent: None,
            status: SearchStatus::Open,
        };

        let mut open = vec![start_id];
        let mut closed = Vec::new();

        while !open.is_empty() {
            open.sort_by_key(|id| self.nodes[id.0].search.f);
            let current = open.remove(0);

            if current == end_id {
                return self.reconstruct_path(current);
            }

            self.nodes[current.0].search.status = SearchStatus::Closed;
            closed.push(current);

            let current_g = self.nodes[current.0].search.g;
            for i in 0..self.nodes[current.0].edges.len() {
                let edge = self.nodes[current.0].edges[i];
                let candidate = &self.nodes[edge.target.0];

                if candidate.search.status != SearchStatus::Unvisited {
                    continue;
                }
                if blocked(&self.nodes[current.0], candidate) {
                    continue;
                }

                let h = candidate.position.manhattan(end);
                let g = current_g + edge.cost;
                self.nodes[edge.target.0].search = SearchState {
                    g,
                    h,
                    f: g + h,
                    parent: Some(current),
                    status: SearchStatus::Open,
                };
                open.push(edge.target);
            }
        }

        if !allow_partial {
            return Ok(Vec::new());
        }

        let best = closed.iter().copied().min_by_key(|id| {
            let s = &self.nodes[id.0].search;
            (s.f, s.h)
        });
        match best {
            Some(goal) => self.reconstruct_path(goal),
            None => Ok(Vec::new()),
        }
    }

    /// Clear the scratch scores left by the previous search
    pub fn reset_search(&mut self) {
        for node in &mut self.nodes {
            node.search = SearchState::default();
        }
    }

    /// Walk parent links back from `goal` and return the path start-first
    ///
    /// A valid parent chain is never longer than the graph; a longer one
    /// means the links form a cycle.
    fn reconstruct_path(&self, goal: NodeId) -> Result<Vec<NodeId>> {
        let limit = self.nodes.len();
        let mut path = Vec::new();
        let mut cursor = Some(goal);

        while let Some(id) = cursor {
            if path.len() >= limit {
                tracing::error!(
                    goal = %self.nodes[goal.0].position,
                    limit,
                    "parent chain longer than the graph"
                );
                return Err(GenerationError::InternalInconsistency {
                    steps: path.len() + 1,
                    limit,
                });
            }
            path.push(id);
            cursor = self.nodes[id.0].search.parent;
        }

        path.reverse();
        Ok(path)
    }
}
