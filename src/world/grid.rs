//! Tile grid and level data.
//!
//! A cell packs a wall-texture id in its low decimal digit and a block
//! height in its tens digit (`21` = texture 1, two blocks tall; `0` =
//! walkable). Every query treats off-grid coordinates as solid so rays and
//! movement can never escape the level.

use glam::{Vec2, vec2};

use crate::sim::ActorKind;

/// Immutable per-level wall grid.
#[derive(Clone, Debug)]
pub struct TileGrid {
    w: usize,
    h: usize,
    cells: Vec<u16>,
}

impl TileGrid {
    pub fn new(w: usize, h: usize, cells: Vec<u16>) -> Result<Self, LevelError> {
        if cells.len() != w * h {
            return Err(LevelError::BadGridSize {
                got: cells.len(),
                want: w * h,
            });
        }
        Ok(Self { w, h, cells })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height_cells(&self) -> usize {
        self.h
    }

    #[inline]
    fn raw(&self, x: i32, y: i32) -> Option<u16> {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            None
        } else {
            Some(self.cells[y as usize * self.w + x as usize])
        }
    }

    /// Solid test; out-of-bounds counts as solid.
    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.raw(x, y).map_or(true, |c| c > 0)
    }

    /// Wall-texture id, 0 = empty. Out-of-bounds reads as id 1.
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> u8 {
        self.raw(x, y).map_or(1, |c| (c % 10) as u8)
    }

    /// Block height in grid units. Empty cells report 0, solid cells at
    /// least 1, out-of-bounds exactly 1.
    #[inline]
    pub fn height(&self, x: i32, y: i32) -> u8 {
        match self.raw(x, y) {
            None => 1,
            Some(0) => 0,
            Some(c) => ((c / 10) as u8).max(1),
        }
    }
}

/// One parsed level: grid, player start, actor spawns, sky flag.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: TileGrid,
    pub player_pos: Vec2,
    pub player_yaw: f32,
    pub spawns: Vec<(ActorKind, Vec2)>,
    pub sky: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("line {line}: unknown keyword `{word}`")]
    UnknownKeyword { line: usize, word: String },

    #[error("line {line}: malformed number")]
    BadNumber { line: usize },

    #[error("line {line}: unknown actor kind `{name}`")]
    UnknownActor { line: usize, name: String },

    #[error("line {line}: row has {got} cells, expected {want}")]
    RaggedRow { line: usize, got: usize, want: usize },

    #[error("grid holds {got} cells, expected {want}")]
    BadGridSize { got: usize, want: usize },

    #[error("level defines no tile rows")]
    NoTiles,

    #[error("level defines no `player` line")]
    MissingPlayer,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Level {
    pub fn from_file(path: &std::path::Path) -> Result<Self, LevelError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse the line-oriented level format:
    ///
    /// ```text
    /// # comment
    /// sky on
    /// player 2.5 2.5 0.0
    /// spawn grunt 8.5 3.5
    /// tiles
    /// 1 1 1 1
    /// 1 0 0 1
    /// 1 1 1 1
    /// ```
    pub fn parse(src: &str) -> Result<Self, LevelError> {
        let mut player: Option<(Vec2, f32)> = None;
        let mut spawns = Vec::new();
        let mut sky = true;
        let mut rows: Vec<Vec<u16>> = Vec::new();
        let mut in_tiles = false;

        for (idx, raw_line) in src.lines().enumerate() {
            let line = idx + 1;
            let text = raw_line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            if in_tiles {
                let row = text
                    .split_whitespace()
                    .map(|t| t.parse::<u16>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| LevelError::BadNumber { line })?;
                if let Some(first) = rows.first() {
                    if row.len() != first.len() {
                        return Err(LevelError::RaggedRow {
                            line,
                            got: row.len(),
                            want: first.len(),
                        });
                    }
                }
                rows.push(row);
                continue;
            }

            let mut toks = text.split_whitespace();
            let word = toks.next().unwrap_or_default();
            match word {
                "sky" => sky = matches!(toks.next(), Some("on") | Some("true")),
                "player" => {
                    let x = parse_f32(toks.next(), line)?;
                    let y = parse_f32(toks.next(), line)?;
                    let yaw = parse_f32(toks.next(), line)?;
                    player = Some((vec2(x, y), yaw));
                }
                "spawn" => {
                    let name = toks.next().unwrap_or_default();
                    let kind =
                        ActorKind::from_name(name).ok_or_else(|| LevelError::UnknownActor {
                            line,
                            name: name.to_string(),
                        })?;
                    let x = parse_f32(toks.next(), line)?;
                    let y = parse_f32(toks.next(), line)?;
                    spawns.push((kind, vec2(x, y)));
                }
                "tiles" => in_tiles = true,
                _ => {
                    return Err(LevelError::UnknownKeyword {
                        line,
                        word: word.to_string(),
                    });
                }
            }
        }

        if rows.is_empty() {
            return Err(LevelError::NoTiles);
        }
        let (player_pos, player_yaw) = player.ok_or(LevelError::MissingPlayer)?;

        let w = rows[0].len();
        let h = rows.len();
        let grid = TileGrid::new(w, h, rows.into_iter().flatten().collect())?;

        Ok(Self {
            grid,
            player_pos,
            player_yaw,
            spawns,
            sky,
        })
    }

    /// Built-in arena so the binary runs without a level file.
    pub fn demo() -> Self {
        Self::parse(DEMO_ARENA).expect("built-in demo arena must parse")
    }
}

fn parse_f32(tok: Option<&str>, line: usize) -> Result<f32, LevelError> {
    tok.and_then(|t| t.parse().ok())
        .ok_or(LevelError::BadNumber { line })
}

const DEMO_ARENA: &str = "\
# demo arena: outer ring, tall pillars, a stone keep
sky on
player 3.5 3.5 0.8
spawn grunt 12.5 4.5
spawn grunt 16.5 12.5
spawn charger 9.5 16.5
spawn turret 18.5 3.5
spawn tank 12.5 12.5
spawn health 4.5 17.5
tiles
1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 21 0 0 0 0 0 0 21 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 31 0 0 0 0 0 0 0 0 0 0 31 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 2 2 2 12 2 2 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 2 0 0 0 0 2 0 0 0 0 0 0 0 1
1 0 0 21 0 0 0 0 2 0 0 0 0 2 0 0 0 21 0 0 0 1
1 0 0 0 0 0 0 0 12 0 0 0 0 12 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 2 0 0 0 0 2 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 2 0 0 0 0 2 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 2 2 0 0 2 2 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 31 0 0 0 0 0 0 0 0 0 0 31 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 21 0 0 0 0 0 0 21 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
";

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three() -> TileGrid {
        // 21 in the middle: texture 1, two blocks tall
        TileGrid::new(3, 3, vec![1, 1, 1, 1, 21, 1, 1, 1, 0]).unwrap()
    }

    #[test]
    fn cell_encoding_splits_tile_and_height() {
        let g = three_by_three();
        assert_eq!(g.tile(1, 1), 1);
        assert_eq!(g.height(1, 1), 2);
        assert!(g.is_wall(1, 1));

        // plain `1` has implicit height 1
        assert_eq!(g.height(0, 0), 1);

        // empty cell
        assert!(!g.is_wall(2, 2));
        assert_eq!(g.tile(2, 2), 0);
        assert_eq!(g.height(2, 2), 0);
    }

    #[test]
    fn off_grid_is_solid() {
        let g = three_by_three();
        assert!(g.is_wall(-1, 0));
        assert!(g.is_wall(0, 3));
        assert_eq!(g.tile(99, 99), 1);
        assert_eq!(g.height(-5, 1), 1);
    }

    #[test]
    fn demo_arena_parses() {
        let lvl = Level::demo();
        assert!(lvl.sky);
        assert_eq!(lvl.grid.width(), 22);
        assert_eq!(lvl.grid.height_cells(), 22);
        assert_eq!(lvl.spawns.len(), 6);
        assert!(lvl.grid.is_wall(0, 0));
        assert!(!lvl.grid.is_wall(3, 3));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Level::parse("player 1 1 0\ntiles\n1 1 1\n1 1\n").unwrap_err();
        assert!(matches!(err, LevelError::RaggedRow { got: 2, want: 3, .. }));
    }

    #[test]
    fn missing_player_rejected() {
        let err = Level::parse("tiles\n1 1\n1 1\n").unwrap_err();
        assert!(matches!(err, LevelError::MissingPlayer));
    }

    #[test]
    fn unknown_actor_rejected() {
        let err = Level::parse("player 1 1 0\nspawn dragon 2 2\ntiles\n1\n").unwrap_err();
        assert!(matches!(err, LevelError::UnknownActor { .. }));
    }
}
