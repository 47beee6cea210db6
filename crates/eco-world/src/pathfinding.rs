//! Route finding over the field.
//!
//! Organisms, plants and obstacles block movement; void cells are open.
//! Steps go to any of the eight Moore neighbours at unit cost.

use crate::field::Field;
use eco_core::{Coordinate, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::trace;

/// Distance estimate guiding [`Field::find_path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Row plus column difference. Overestimates diagonal routes, so the
    /// path found is not always the shortest one.
    Manhattan,
    /// Larger of row and column difference. Never overestimates.
    Diagonal,
}

impl Heuristic {
    pub fn estimate(&self, from: Coordinate, to: Coordinate) -> u32 {
        let drow = from.row.abs_diff(to.row);
        let dcol = from.col.abs_diff(to.col);
        match self {
            Heuristic::Manhattan => drow + dcol,
            Heuristic::Diagonal => drow.max(dcol),
        }
    }
}

/// Cells visited from start to goal, both included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    steps: Vec<Coordinate>,
}

impl Path {
    pub fn start(&self) -> Coordinate {
        self.steps[0]
    }

    pub fn end(&self) -> Coordinate {
        self.steps[self.steps.len() - 1]
    }

    /// Number of moves, one less than the number of cells
    pub fn len(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn steps(&self) -> &[Coordinate] {
        &self.steps
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.steps.contains(&coord)
    }
}

impl Field {
    /// A* search from `from` to `to` through non-occupying cells.
    ///
    /// `from` itself may be occupied (the walker stands there). Returns
    /// `Ok(None)` when `to` is occupied or unreachable. Ties in the open set
    /// break toward the lower row-major index, so the result is stable.
    pub fn find_path(
        &self,
        from: Coordinate,
        to: Coordinate,
        heuristic: Heuristic,
    ) -> Result<Option<Path>> {
        self.get(from)?;
        if self.get(to)?.is_occupying() {
            return Ok(None);
        }

        let width = self.width();
        let index = |c: Coordinate| c.row as usize * width + c.col as usize;
        let cells = self.height() * width;

        let mut cost = vec![u32::MAX; cells];
        let mut came_from: Vec<Option<Coordinate>> = vec![None; cells];
        let mut closed = vec![false; cells];
        let mut open = BinaryHeap::new();

        cost[index(from)] = 0;
        open.push(Reverse((heuristic.estimate(from, to), index(from), from)));

        while let Some(Reverse((_, current_index, current))) = open.pop() {
            if current == to {
                let mut steps = vec![current];
                let mut cursor = current;
                while let Some(previous) = came_from[index(cursor)] {
                    steps.push(previous);
                    cursor = previous;
                }
                steps.reverse();
                trace!(moves = steps.len() - 1, "Path found");
                return Ok(Some(Path { steps }));
            }
            if closed[current_index] {
                continue;
            }
            closed[current_index] = true;

            let tentative = cost[current_index] + 1;
            for (neighbor, entity) in self.neighbors(current, 1)? {
                let neighbor_index = index(neighbor);
                if entity.is_occupying() || closed[neighbor_index] {
                    continue;
                }
                if tentative < cost[neighbor_index] {
                    cost[neighbor_index] = tentative;
                    came_from[neighbor_index] = Some(current);
                    let estimate = tentative + heuristic.estimate(neighbor, to);
                    open.push(Reverse((estimate, neighbor_index, neighbor)));
                }
            }
        }

        Ok(None)
    }

    /// Nearest non-occupying cell to `coord` by Chebyshev distance,
    /// `coord` itself included. Within a ring the first cell in row-major
    /// order wins. Returns `Ok(None)` on a completely full field.
    pub fn find_free_near(&self, coord: Coordinate) -> Result<Option<Coordinate>> {
        if !self.get(coord)?.is_occupying() {
            return Ok(Some(coord));
        }

        let reach = self.height().max(self.width()) as u32;
        for radius in 1..=reach {
            let ring = self
                .neighbors(coord, radius)?
                .into_iter()
                .filter(|(c, _)| c.chebyshev_distance(&coord) == radius as i32);
            for (candidate, entity) in ring {
                if !entity.is_occupying() {
                    return Ok(Some(candidate));
                }
            }
        }

        Ok(None)
    }
}
