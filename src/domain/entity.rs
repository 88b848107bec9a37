/// Entities: Player and the four Ghosts, plus the closed direction and
/// mode enumerations they move through.

/// Cardinal movement direction. A closed enumeration: there is no
/// "invalid direction" state to guard against at runtime.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Fixed evaluation order for ghost decisions. Ties in target distance are
/// broken by the first minimal candidate in this order.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// Total opposite mapping, used by the no-reverse rule.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// (row, col) delta of a single step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Ghost identity. Never changes after construction; only the display
/// icon is overridden while Frightened.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Identity {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl Identity {
    pub fn icon(self) -> char {
        match self {
            Identity::Blinky => 'B',
            Identity::Pinky => 'P',
            Identity::Inky => 'I',
            Identity::Clyde => 'C',
        }
    }
}

/// Ghost mode. All four ghosts share one mode clock (see sim::mode);
/// the per-ghost field is synced from it at the top of every tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Scatter,
    Chase,
    Frightened,
}

/// Icon shown for every ghost while Frightened.
pub const FRIGHTENED_ICON: char = 'X';

/// Frame input: at most one logical command per tick cycle. Absence of
/// input is the common case and leaves the facing unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub facing: Option<Direction>,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub row: usize,
    pub col: usize,
    pub facing: Direction,
    /// Mouth animation, cycles 1..=4. Cosmetic only.
    pub anim_phase: u8,
    /// Mutated only by the tick resolver.
    pub score: u32,
    /// Computed once at load from pellet counts.
    pub max_score: u32,
    /// Sticky loss flag: set once, never cleared.
    pub lost: bool,
}

impl Player {
    pub fn new(row: usize, col: usize, max_score: u32) -> Self {
        Player {
            row,
            col,
            facing: Direction::Up,
            anim_phase: 1,
            score: 0,
            max_score,
            lost: false,
        }
    }

    /// Display glyph: mouth open (directional) for phases 1-2, closed 'o'
    /// for phases 3-4.
    pub fn icon(&self) -> char {
        if self.anim_phase < 3 {
            match self.facing {
                Direction::Up => '^',
                Direction::Down => 'v',
                Direction::Left => '<',
                Direction::Right => '>',
            }
        } else {
            'o'
        }
    }

    /// Advance the mouth animation by one step.
    pub fn advance_anim(&mut self) {
        self.anim_phase += 1;
        if self.anim_phase == 5 {
            self.anim_phase = 1;
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub row: usize,
    pub col: usize,
    pub identity: Identity,
    pub mode: Mode,
    /// Last committed move. None means no constraint (fresh spawn).
    pub prev_move: Option<Direction>,
    pub icon: char,
    /// Respawn tile used when eaten while Frightened.
    pub home: (usize, usize),
}

impl Ghost {
    pub fn new(identity: Identity, row: usize, col: usize, home: (usize, usize)) -> Self {
        Ghost {
            row,
            col,
            identity,
            mode: Mode::Scatter,
            prev_move: None,
            icon: identity.icon(),
            home,
        }
    }

    /// Eaten while Frightened: back to the home tile, identity icon
    /// restored, mode forced to Chase, movement unconstrained.
    pub fn respawn(&mut self) {
        self.row = self.home.0;
        self.col = self.home.1;
        self.icon = self.identity.icon();
        self.mode = Mode::Chase;
        self.prev_move = None;
    }
}
