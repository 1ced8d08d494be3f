use rand::{seq::SliceRandom, Rng};
use rand_distr::{Bernoulli, Distribution};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::{
    env::{DiscreteActionSpace, Environment, Report},
    error::{Error, Result},
    gym::perception::{self, StateRow},
};

/// Side length of the square field
pub const SIZE: usize = 10;

/// Number of actions available to the robot
pub const NUM_ACTIONS: usize = 5;

const PICK_UP_REWARD: i32 = 10;
const EMPTY_PICK_UP_REWARD: i32 = -1;
const COLLISION_REWARD: i32 = -5;

/// What the robot would find on a tile
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tile {
    Wall,
    Empty,
    Coin,
}

impl Tile {
    /// Binary encoding `(bound_flag, item_flag)`
    pub fn binary(self) -> (u8, u8) {
        match self {
            Tile::Wall => (1, 0),
            Tile::Empty => (0, 0),
            Tile::Coin => (0, 1),
        }
    }
}

#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Action {
    PickUp = 0,
    North = 1,
    South = 2,
    East = 3,
    West = 4,
}

impl Action {
    /// Index of the action in a Q-table row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Row and column offset of a move, `(0, 0)` for [`Action::PickUp`]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Action::PickUp => (0, 0),
            Action::North => (-1, 0),
            Action::South => (1, 0),
            Action::East => (0, 1),
            Action::West => (0, -1),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Action::VARIANTS
            .choose(rng)
            .expect("There is always at least one action")
    }
}

impl TryFrom<u8> for Action {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Action::from_repr(code).ok_or(Error::InvalidAction(code))
    }
}

/// Robot coordinates `(row, col)`
///
/// Signed so that a look one tile past the border is representable. [`Pos::new`] checks the
/// range; a position built from the fields directly may be off the field, which the tile
/// lookups read as a wall and [`Grid::get`]/[`Grid::set`] reject with a panic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    /// A position on the field
    pub fn new(row: i32, col: i32) -> Result<Self> {
        let pos = Self { row, col };
        if !pos.in_bounds() {
            return Err(Error::InvalidPosition { row, col });
        }
        Ok(pos)
    }

    /// A uniformly random position on the field
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            row: rng.gen_range(0..SIZE as i32),
            col: rng.gen_range(0..SIZE as i32),
        }
    }

    pub fn in_bounds(self) -> bool {
        (0..SIZE as i32).contains(&self.row) && (0..SIZE as i32).contains(&self.col)
    }

    /// The position one tile away in the direction of `action`
    pub fn neighbor(self, action: Action) -> Self {
        let (dr, dc) = action.offset();
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

/// A field of cans, `1` marks a can and `0` an empty tile
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Grid {
    cells: [[u8; SIZE]; SIZE],
}

impl Grid {
    /// A field with no cans
    pub fn empty() -> Self {
        Self::default()
    }

    /// A field where each tile independently holds a can with probability one half
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let coin = Bernoulli::new(0.5).expect("0.5 is a valid probability");
        let mut cells = [[0; SIZE]; SIZE];
        for cell in cells.iter_mut().flatten() {
            *cell = coin.sample(rng) as u8;
        }
        Self { cells }
    }

    /// Build a field from raw cells, rejecting anything other than `0` or `1`
    pub fn from_cells(cells: [[u8; SIZE]; SIZE]) -> Result<Self> {
        for (row, line) in cells.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value > 1 {
                    return Err(Error::InvalidCell { row, col, value });
                }
            }
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[[u8; SIZE]; SIZE] {
        &self.cells
    }

    /// Raw value at a position, `1` for a can
    ///
    /// **Panics** if `pos` is off the field
    pub fn get(&self, pos: Pos) -> u8 {
        assert!(pos.in_bounds(), "Position {pos:?} is off the field");
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Place or remove a can
    ///
    /// **Panics** if `pos` is off the field
    pub fn set(&mut self, pos: Pos, can: bool) {
        assert!(pos.in_bounds(), "Position {pos:?} is off the field");
        self.cells[pos.row as usize][pos.col as usize] = can as u8;
    }

    /// Number of cans left on the field
    pub fn cans(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == 1).count()
    }
}

/// Classify the tile at `(row, col)`, anything off the field is a wall
pub fn tile_content(grid: &Grid, row: i32, col: i32) -> Tile {
    let pos = Pos { row, col };
    if !pos.in_bounds() {
        return Tile::Wall;
    }
    match grid.get(pos) {
        0 => Tile::Empty,
        _ => Tile::Coin,
    }
}

/// [`tile_content`] encoded as `(bound_flag, item_flag)`
pub fn tile_content_binary(grid: &Grid, row: i32, col: i32) -> (u8, u8) {
    tile_content(grid, row, col).binary()
}

/// The tile next to `pos` in the direction of `action`
pub fn look_ahead(grid: &Grid, pos: Pos, action: Action) -> Tile {
    let next = pos.neighbor(action);
    tile_content(grid, next.row, next.col)
}

/// Apply `action` to the world
///
/// Picking up clears the current tile. A move into a wall leaves the robot where it is.
///
/// **Returns** the new position
pub fn apply_action(grid: &mut Grid, pos: Pos, action: Action) -> Pos {
    match action {
        Action::PickUp => {
            grid.set(pos, false);
            pos
        }
        _ if look_ahead(grid, pos, action) == Tile::Wall => pos,
        _ => pos.neighbor(action),
    }
}

/// Reward for taking `action` in the given world, evaluated before the action is applied
pub fn reward(grid: &Grid, pos: Pos, action: Action) -> i32 {
    match action {
        Action::PickUp => match tile_content(grid, pos.row, pos.col) {
            Tile::Coin => PICK_UP_REWARD,
            _ => EMPTY_PICK_UP_REWARD,
        },
        _ => match look_ahead(grid, pos, action) {
            Tile::Wall => COLLISION_REWARD,
            Tile::Empty | Tile::Coin => 0,
        },
    }
}

/// A 10x10 field of cans for a robot that can move in four directions and pick cans up
///
/// The robot only sees its own tile and the four neighbouring ones, see
/// [`perception`](crate::gym::perception). Every `teleport_every` steps (counting the first) the
/// robot is dropped onto a random tile without touching the cans.
pub struct CanField {
    grid: Grid,
    pos: Pos,
    step: usize,
    teleport_every: Option<usize>,
    pub report: Report,
}

impl CanField {
    pub fn new() -> Self {
        Self {
            grid: Grid::empty(),
            pos: Pos::default(),
            step: 0,
            teleport_every: Some(50),
            report: Report::new(vec!["reward", "cans", "collisions", "steps"]),
        }
    }

    /// Set how often the robot is teleported, `None` disables teleporting
    pub fn with_teleport_every(mut self, every: Option<usize>) -> Result<Self> {
        if let Some(n) = every {
            crate::error::ensure_positive("teleport_every", n)?;
        }
        self.teleport_every = every;
        Ok(self)
    }

    /// Place the robot in a known world
    pub fn with_world(mut self, grid: Grid, pos: Pos) -> Self {
        self.grid = grid;
        self.pos = pos;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// The state row the robot currently perceives
    pub fn state(&self) -> StateRow {
        perception::state_row(&perception::encode_state(&self.grid, self.pos))
    }
}

impl Default for CanField {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscreteActionSpace for CanField {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

impl Environment for CanField {
    type State = StateRow;
    type Action = Action;

    fn step<R: Rng + ?Sized>(&mut self, action: Self::Action, rng: &mut R) -> (Self::State, f32) {
        let reward = reward(&self.grid, self.pos, action);
        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report.entry("reward").and_modify(|x| *x += reward as f64);
        if reward == PICK_UP_REWARD {
            self.report.entry("cans").and_modify(|x| *x += 1.0);
        } else if reward == COLLISION_REWARD {
            self.report.entry("collisions").and_modify(|x| *x += 1.0);
        }

        self.pos = apply_action(&mut self.grid, self.pos, action);
        let next_state = self.state();

        // The returned state is the one observed before the teleport; the agent keeps
        // acting on it until its next move is encoded.
        if self.teleport_every.is_some_and(|n| self.step % n == 0) {
            self.pos = Pos::random(rng);
            log::trace!("step {}: teleported to {:?}", self.step, self.pos);
        }
        self.step += 1;

        (next_state, reward as f32)
    }

    fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Self::State {
        self.grid = Grid::random(rng);
        self.pos = Pos::random(rng);
        self.step = 0;
        self.report.reset();
        self.state()
    }

    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action {
        Action::random(rng)
    }
}
