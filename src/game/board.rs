use crate::game::pieces::{Color, Piece};
use crate::utils::{Bitboard, BitboardExt, BoardSquare, BoardSquareExt};
use fxhash::FxHashSet;
use std::fmt;

/// Caller-assigned identity of a placed piece, stable for as long as the
/// piece stays on the board. Distinguishes otherwise-identical pieces
/// (e.g. two knights of the same color) when attributing reach.
pub type PieceId = u32;

pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub color: Color,
    pub id: PieceId,
}

#[derive(Debug, PartialEq)]
pub enum SetupError {
    SquareOccupied(BoardSquare),
    DuplicateIdentity(PieceId),
    BadPlacement(String),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::SquareOccupied(square) => {
                write!(f, "square {} is already occupied", square.unparse())
            }
            SetupError::DuplicateIdentity(id) => {
                write!(f, "piece identity {} is already on the board", id)
            }
            SetupError::BadPlacement(reason) => write!(f, "bad placement string: {}", reason),
        }
    }
}

impl std::error::Error for SetupError {}

/// Sparse 8x8 placement of pieces.
///
/// The occupancy bitboard is kept in sync with the cells so reach
/// computations can test blockers without scanning the array.
#[derive(Clone, Debug)]
pub struct Board {
    cells: [Option<PlacedPiece>; 64],
    occupancy: Bitboard,
    identities: FxHashSet<PieceId>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [None; 64],
            occupancy: 0,
            identities: FxHashSet::default(),
        }
    }

    pub fn starting_position() -> Self {
        Self::from_placement(STARTING_PLACEMENT).expect("starting placement is well-formed")
    }

    /// Builds a board from a FEN-style piece placement field
    /// (ranks from 8 down to 1, separated by '/', digits encoding gaps).
    ///
    /// Identities are assigned sequentially in reading order.
    pub fn from_placement(placement: &str) -> Result<Self, SetupError> {
        let ranks = placement.split('/').collect::<Vec<_>>();

        if ranks.len() != 8 {
            return Err(SetupError::BadPlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Self::empty();
        let mut id: PieceId = 0;

        for (i, rank) in ranks.iter().enumerate() {
            let y = 7 - i as u8;
            let mut x = 0u8;

            for char in rank.chars() {
                // Numbers encode empty spaces
                if let Some(gap) = char.to_digit(10) {
                    x += gap as u8;
                    continue;
                }

                let piece = match Piece::from_char(char.to_ascii_lowercase()) {
                    Some(piece) => piece,
                    None => {
                        return Err(SetupError::BadPlacement(format!(
                            "unknown piece letter '{}'",
                            char
                        )));
                    }
                };

                if x >= 8 {
                    return Err(SetupError::BadPlacement(format!(
                        "rank {} overflows the board",
                        y + 1
                    )));
                }

                let color = if char.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                board.place(BoardSquare::from_position(x, y), piece, color, id)?;

                id += 1;
                x += 1;
            }

            if x != 8 {
                return Err(SetupError::BadPlacement(format!(
                    "rank {} covers {} files instead of 8",
                    y + 1,
                    x
                )));
            }
        }

        board.occupancy.print(Some("Occupancy"), None);

        Ok(board)
    }

    /// Inverse of `from_placement`.
    pub fn placement(&self) -> String {
        let mut out = String::new();

        for y in (0..8).rev() {
            let mut gap = 0;

            for x in 0..8 {
                match self.cells[(x + y * 8) as usize] {
                    Some(placed) => {
                        if gap > 0 {
                            out.push_str(&gap.to_string());
                            gap = 0;
                        }

                        let letter = placed.piece.to_char();
                        out.push(match placed.color {
                            Color::White => letter.to_ascii_uppercase(),
                            Color::Black => letter,
                        });
                    }
                    None => gap += 1,
                }
            }

            if gap > 0 {
                out.push_str(&gap.to_string());
            }

            if y > 0 {
                out.push('/');
            }
        }

        out
    }

    pub fn place(
        &mut self,
        square: BoardSquare,
        piece: Piece,
        color: Color,
        id: PieceId,
    ) -> Result<(), SetupError> {
        if self.cells[square as usize].is_some() {
            return Err(SetupError::SquareOccupied(square));
        }

        if !self.identities.insert(id) {
            return Err(SetupError::DuplicateIdentity(id));
        }

        self.cells[square as usize] = Some(PlacedPiece { piece, color, id });
        self.occupancy |= square.to_mask();

        Ok(())
    }

    pub fn remove(&mut self, square: BoardSquare) -> Option<PlacedPiece> {
        let removed = self.cells[square as usize].take();

        if let Some(placed) = removed {
            self.occupancy &= !square.to_mask();
            self.identities.remove(&placed.id);
        }

        removed
    }

    pub fn clear(&mut self) {
        self.cells = [None; 64];
        self.occupancy = 0;
        self.identities.clear();
    }

    pub fn piece_at(&self, square: BoardSquare) -> Option<PlacedPiece> {
        self.cells[square as usize]
    }

    pub fn occupancy(&self) -> Bitboard {
        self.occupancy
    }

    pub fn piece_count(&self) -> usize {
        self.occupancy.count_ones() as usize
    }

    pub fn iter_pieces(&self) -> impl Iterator<Item = (BoardSquare, PlacedPiece)> + '_ {
        (0..64u8).filter_map(|square| self.cells[square as usize].map(|placed| (square, placed)))
    }
}
