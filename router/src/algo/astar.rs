use crate::error::RouterError;
use crate::grid::RoutingGrid;
use pcb_common::geom::GridPoint;
use pcb_common::util::config::MazeRoutingConfig;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

/// Eight compass directions, counter-clockwise from east in 45° steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }

    /// Rotates counter-clockwise by `steps` eighths of a turn.
    pub fn rotate(self, steps: i32) -> Direction {
        Self::ALL[(self.index() as i32 + steps).rem_euclid(8) as usize]
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::North => (0, 1),
            Direction::NorthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::South => (0, -1),
            Direction::SouthEast => (1, -1),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.delta() == (dx.signum(), dy.signum()) && (dx != 0 || dy != 0))
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// Moves allowed after entering a cell heading `self`: straight on or a 45° turn.
    pub fn continuations(self) -> [Direction; 3] {
        [self, self.rotate(1), self.rotate(-1)]
    }

    /// Incoming direction for a pin escaping on `side` ("E" or "W") at `angle` degrees.
    pub fn from_escape(side: &str, angle: f64) -> Result<Direction, RouterError> {
        let base = match side {
            "E" => Direction::East,
            "W" => Direction::West,
            _ => return Err(RouterError::InvalidDirectionKey(side.to_string())),
        };
        if !(0.0..360.0).contains(&angle) || angle % 45.0 != 0.0 {
            return Err(RouterError::InvalidAngle(angle));
        }
        Ok(base.rotate((angle / 45.0) as i32))
    }
}

/// A found path in start-to-goal order.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub points: Vec<GridPoint>,
    pub cost: f64,
    pub bends: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    pub bend_penalty: f64,
    pub expansion_ratio: f64,
    pub min_expansions: usize,
}

impl SearchParams {
    /// Expansions allowed on a grid of `cells` cells; half of them by default.
    pub fn max_expansions(&self, cells: usize) -> usize {
        ((self.expansion_ratio * cells as f64) as usize).max(self.min_expansions)
    }

    /// Lower bound on the remaining cost: octile distance plus one bend
    /// penalty for every 45° turn still needed to face `goal`.
    fn estimate(&self, from: GridPoint, heading: Option<Direction>, goal: GridPoint) -> f64 {
        octile(from, goal) + self.bend_penalty * turns_needed(from, heading, goal) as f64
    }
}

impl From<&MazeRoutingConfig> for SearchParams {
    fn from(config: &MazeRoutingConfig) -> Self {
        Self {
            bend_penalty: config.bend_penalty,
            expansion_ratio: config.expansion_ratio,
            min_expansions: config.min_expansions,
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from(&MazeRoutingConfig::default())
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    f_score: f64,
    g_score: f64,
    index: u32,
    from: u32,
    heading: Option<Direction>,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| self.g_score.total_cmp(&other.g_score))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const NO_PARENT: u32 = u32::MAX;

/// Octile distance: diagonal moves cost √2, straight moves 1.
#[inline(always)]
pub fn octile(a: GridPoint, b: GridPoint) -> f64 {
    let dx = (a.x - b.x).abs() as f64;
    let dy = (a.y - b.y).abs() as f64;
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    SQRT_2 * lo + (hi - lo)
}

/// Fewest 45° turns a path heading `heading` at `from` must make to reach
/// `goal`. Without a heading, one turn is needed unless `goal` lies on one of
/// the eight compass rays.
pub fn turns_needed(from: GridPoint, heading: Option<Direction>, goal: GridPoint) -> u32 {
    let (dx, dy) = (goal.x - from.x, goal.y - from.y);
    if dx == 0 && dy == 0 {
        return 0;
    }
    match heading {
        None => u32::from(dx != 0 && dy != 0 && dx.abs() != dy.abs()),
        Some(h) => {
            let (ux, uy) = h.delta();
            let cross = (ux * dy - uy * dx) as f64;
            let dot = (ux * dx + uy * dy) as f64;
            let degrees = cross.atan2(dot).abs().to_degrees();
            (degrees / 45.0 - 1e-9).ceil().max(0.0) as u32
        }
    }
}

/// Direction-constrained A* with buffers reused across searches.
///
/// A cell is closed the first time it is popped, regardless of the heading it
/// was entered with, so later arrivals from a better-aligned direction are
/// dropped. Searches never touch the grid.
#[derive(Clone)]
pub struct AStar {
    parents: Vec<u32>,
    g_score: Vec<f64>,
    visited_tag: Vec<u32>,
    closed_tag: Vec<u32>,
    current_tag: u32,
    expansions: usize,
}

impl AStar {
    pub fn new() -> Self {
        Self {
            parents: Vec::new(),
            g_score: Vec::new(),
            visited_tag: Vec::new(),
            closed_tag: Vec::new(),
            current_tag: 1,
            expansions: 0,
        }
    }

    /// Expansions performed by the most recent search.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    fn ensure_capacity(&mut self, size: usize) {
        if size > self.parents.len() {
            self.parents.resize(size, NO_PARENT);
            self.g_score.resize(size, f64::INFINITY);
            self.visited_tag.resize(size, 0);
            self.closed_tag.resize(size, 0);
        }
    }

    fn reset(&mut self) {
        self.current_tag = self.current_tag.wrapping_add(1);
        if self.current_tag == 0 {
            self.visited_tag.fill(0);
            self.closed_tag.fill(0);
            self.current_tag = 1;
        }
        self.expansions = 0;
    }

    pub fn find_path<G: RoutingGrid + ?Sized>(
        &mut self,
        grid: &G,
        start: GridPoint,
        goal: GridPoint,
        incoming: Option<Direction>,
        params: &SearchParams,
    ) -> Option<Route> {
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            log::debug!("Search endpoints {:?} -> {:?} outside grid", start, goal);
            return None;
        }

        let width = grid.width();
        let cells = (width as usize) * (grid.height() as usize);
        self.ensure_capacity(cells);
        self.reset();

        let index_of = |p: GridPoint| (p.y as usize) * (width as usize) + (p.x as usize);
        let point_of = |i: u32| GridPoint::new(i as i32 % width, i as i32 / width);
        let enterable = |p: GridPoint| p == start || p == goal || !grid.is_blocked(p);
        let budget = params.max_expansions(cells);

        let start_idx = index_of(start);
        self.g_score[start_idx] = 0.0;
        self.visited_tag[start_idx] = self.current_tag;

        let mut heap = BinaryHeap::new();
        heap.push(State {
            f_score: params.estimate(start, incoming, goal),
            g_score: 0.0,
            index: start_idx as u32,
            from: NO_PARENT,
            heading: incoming,
        });

        while let Some(state) = heap.pop() {
            let idx = state.index as usize;
            if self.closed_tag[idx] == self.current_tag || state.g_score > self.g_score[idx] {
                continue;
            }
            self.closed_tag[idx] = self.current_tag;
            self.parents[idx] = state.from;

            let position = point_of(state.index);
            if position == goal {
                return Some(self.reconstruct(idx, state.g_score, point_of));
            }

            self.expansions += 1;
            if self.expansions > budget {
                log::debug!(
                    "Search {:?} -> {:?} aborted after {} expansions",
                    start,
                    goal,
                    self.expansions
                );
                return None;
            }

            let continuations;
            let moves: &[Direction] = match state.heading {
                Some(d) => {
                    continuations = d.continuations();
                    &continuations
                }
                None => &Direction::ALL,
            };

            for &dir in moves {
                let (dx, dy) = dir.delta();
                let next = position.offset(dx, dy);
                if !grid.in_bounds(next) || !enterable(next) {
                    continue;
                }
                if dir.is_diagonal()
                    && !enterable(position.offset(dx, 0))
                    && !enterable(position.offset(0, dy))
                {
                    continue;
                }
                let next_idx = index_of(next);
                if self.closed_tag[next_idx] == self.current_tag {
                    continue;
                }

                let mut step = if dir.is_diagonal() { SQRT_2 } else { 1.0 };
                step += grid.cost(next);
                if state.heading.is_some_and(|h| h != dir) {
                    step += params.bend_penalty;
                }
                let tentative = state.g_score + step;

                if self.visited_tag[next_idx] != self.current_tag
                    || tentative < self.g_score[next_idx]
                {
                    self.visited_tag[next_idx] = self.current_tag;
                    self.g_score[next_idx] = tentative;
                    heap.push(State {
                        f_score: tentative + params.estimate(next, Some(dir), goal),
                        g_score: tentative,
                        index: next_idx as u32,
                        from: state.index,
                        heading: Some(dir),
                    });
                }
            }
        }
        None
    }

    fn reconstruct(
        &self,
        goal_idx: usize,
        cost: f64,
        point_of: impl Fn(u32) -> GridPoint,
    ) -> Route {
        let mut points = Vec::new();
        let mut curr = goal_idx as u32;
        loop {
            points.push(point_of(curr));
            let parent = self.parents[curr as usize];
            if parent == NO_PARENT {
                break;
            }
            curr = parent;
        }
        points.reverse();

        let bends = count_bends(&points);
        log::trace!(
            "Route {:?} -> {:?}: {} cells, {} bends, cost {:.3}, {} expansions",
            points.first(),
            points.last(),
            points.len(),
            bends,
            cost,
            self.expansions
        );
        Route {
            points,
            cost,
            bends,
        }
    }
}

impl Default for AStar {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of direction changes along a cell path.
pub fn count_bends(points: &[GridPoint]) -> usize {
    points
        .windows(3)
        .filter(|w| {
            (w[1].x - w[0].x, w[1].y - w[0].y) != (w[2].x - w[1].x, w[2].y - w[1].y)
        })
        .count()
}
