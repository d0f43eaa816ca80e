use crate::game::board::{Board, PieceId};
use crate::game::pieces::Color;
use crate::game::reach::{attack_reach, relocation_reach};
use crate::utils::{Bitboard, BitboardExt, BoardSquare};
use strum_macros::{EnumCount, EnumIter, FromRepr};

/// How many hypothetical relocations ahead the speculative expansion
/// projects a piece's potential reach.
#[derive(Copy, Clone, Debug, PartialEq, EnumIter, EnumCount, FromRepr)]
pub enum CoverageDepth {
    One = 1,
    Two = 2,
    Three = 3,
}

impl CoverageDepth {
    pub fn parse(string: &str) -> Option<CoverageDepth> {
        string
            .parse::<usize>()
            .ok()
            .and_then(CoverageDepth::from_repr)
    }

    pub fn levels(&self) -> usize {
        *self as usize
    }
}

/// One unit of reach, attributed to a specific piece instance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttackContribution {
    pub piece: PieceId,
    pub color: Color,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthCoverage {
    pub attackers: Vec<AttackContribution>,
    /// Only populated at the first level; deeper levels never re-inspect
    /// the occupant.
    pub defenders: Vec<AttackContribution>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SquareCoverage {
    levels: Vec<DepthCoverage>,
}

impl SquareCoverage {
    fn new(levels: usize) -> Self {
        Self {
            levels: vec![DepthCoverage::default(); levels],
        }
    }

    pub fn direct(&self) -> &DepthCoverage {
        &self.levels[0]
    }

    pub fn level(&self, depth: CoverageDepth) -> Option<&DepthCoverage> {
        self.levels.get(depth.levels() - 1)
    }

    pub fn levels(&self) -> &[DepthCoverage] {
        &self.levels
    }
}

/// Per-square attack/defense attribution for a whole board, one entry per
/// computed level. Read-only snapshot; recomputed from scratch per call.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageGrid {
    depth: CoverageDepth,
    squares: [SquareCoverage; 64],
}

impl CoverageGrid {
    fn empty(depth: CoverageDepth) -> Self {
        Self {
            depth,
            squares: std::array::from_fn(|_| SquareCoverage::new(depth.levels())),
        }
    }

    fn add_attacker(&mut self, level: usize, square: BoardSquare, contribution: AttackContribution) {
        self.squares[square as usize].levels[level]
            .attackers
            .push(contribution);
    }

    fn add_defender(&mut self, level: usize, square: BoardSquare, contribution: AttackContribution) {
        self.squares[square as usize].levels[level]
            .defenders
            .push(contribution);
    }

    pub fn depth(&self) -> CoverageDepth {
        self.depth
    }

    pub fn at(&self, square: BoardSquare) -> &SquareCoverage {
        &self.squares[square as usize]
    }

    /// Distinct attacking pieces per square at the first level, for
    /// consumers that only want a heat map.
    pub fn attack_counts(&self) -> [u8; 64] {
        let mut counts = [0u8; 64];

        for (square, coverage) in self.squares.iter().enumerate() {
            counts[square] = coverage.direct().attackers.len() as u8;
        }

        counts
    }

    /// Distinct contributing pieces per square at the given level.
    pub fn level_counts(&self, depth: CoverageDepth) -> [u8; 64] {
        let mut counts = [0u8; 64];

        for (square, coverage) in self.squares.iter().enumerate() {
            if let Some(level) = coverage.level(depth) {
                counts[square] = (level.attackers.len() + level.defenders.len()) as u8;
            }
        }

        counts
    }
}

/// First-level attack/defense attribution against the real board.
pub fn compute_direct(board: &Board) -> CoverageGrid {
    compute_with_depth(board, CoverageDepth::One)
}

/// Attribution for levels 1..=depth.
///
/// Level 1 classifies every occlusion-aware reach square by its occupant:
/// same color as the source piece makes a defender, anything else an
/// attacker. Levels 2 and 3 relocate the piece to each of its relocation
/// squares (once, then twice) and union the unoccluded reach from there;
/// the real board's occlusion is deliberately not reapplied at hypothetical
/// positions, which overstates sliders' speculative reach. A per-piece
/// bitboard of already-covered squares keeps the levels disjoint.
pub fn compute_with_depth(board: &Board, depth: CoverageDepth) -> CoverageGrid {
    let mut grid = CoverageGrid::empty(depth);

    for (square, placed) in board.iter_pieces() {
        let contribution = AttackContribution {
            piece: placed.id,
            color: placed.color,
        };

        let direct = attack_reach(placed.piece, placed.color, square, Some(board));

        for target in direct.iter_positions() {
            match board.piece_at(target) {
                Some(occupant) if occupant.color == placed.color => {
                    grid.add_defender(0, target, contribution)
                }
                _ => grid.add_attacker(0, target, contribution),
            }
        }

        if depth.levels() < 2 {
            continue;
        }

        // Squares this piece already covers at shallower levels
        let mut covered = direct;

        let relocations = relocation_reach(placed.piece, placed.color, square, Some(board));

        let mut speculative: Bitboard = 0;
        for hop in relocations.iter_positions() {
            speculative |= attack_reach(placed.piece, placed.color, hop, None);
        }

        let fresh = speculative & !covered;
        for target in fresh.iter_positions() {
            grid.add_attacker(1, target, contribution);
        }
        covered |= fresh;

        if depth.levels() < 3 {
            continue;
        }

        let mut speculative: Bitboard = 0;
        for hop in relocations.iter_positions() {
            for second in relocation_reach(placed.piece, placed.color, hop, None).iter_positions() {
                speculative |= attack_reach(placed.piece, placed.color, second, None);
            }
        }

        let fresh = speculative & !covered;
        for target in fresh.iter_positions() {
            grid.add_attacker(2, target, contribution);
        }
    }

    grid
}
