/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Passability is answered per agent kind: the player may enter portal
/// cells, ghosts may not. Both queries run against this static layer only,
/// never against the per-tick presentation snapshot, so agent overlays can
/// never be misread as walls.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    /// Solid cell. Keeps its source glyph ('#', '|', '-', '*') for display.
    Wall(char),
    Pellet,       // +10, cleared on consumption
    PowerPellet,  // +50, cleared on consumption, frightens ghosts
    PortalA,      // ']' — paired with PortalB
    PortalB,      // '[' — paired with PortalA
    Door,         // '~' — ghost-house door: ghosts pass, the player does not
}

impl Tile {
    /// Can the player occupy this cell? Walls and the ghost door block;
    /// the player travels through portals (and, visually, through ghosts).
    pub fn passable_for_player(self) -> bool {
        !matches!(self, Tile::Wall(_) | Tile::Door)
    }

    /// Can a ghost occupy this cell? Walls block, and ghosts never use
    /// the portals. The door is theirs to pass.
    pub fn passable_for_ghost(self) -> bool {
        !matches!(self, Tile::Wall(_) | Tile::PortalA | Tile::PortalB)
    }

    /// Display glyph for the presentation snapshot.
    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall(c) => c,
            Tile::Pellet => '.',
            Tile::PowerPellet => '@',
            Tile::PortalA => ']',
            Tile::PortalB => '[',
            Tile::Door => '~',
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}
