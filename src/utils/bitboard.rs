use crate::game::{Color, Piece};
use strum::EnumCount;

pub type Bitboard = u64;
pub type BoardSquare = u8;

pub trait BitboardExt {
    fn is_set(&self, index: BoardSquare) -> bool;
    fn print(&self, title: Option<&str>, position: Option<BoardSquare>);
    fn iter_positions(&self) -> BitboardIterator;
}

// used like this because we can't have a const fn as a trait,
// but we want to use it for the compile-time table calculation
pub const fn position_to_bitmask(x: u32, y: u32) -> u64 {
    1u64 << x + y * 8
}

pub const fn is_position_valid(x: isize, y: isize) -> bool {
    x >= 0 && x < 8 && y >= 0 && y < 8
}

impl BitboardExt for u64 {
    fn is_set(&self, index: BoardSquare) -> bool {
        self & (1 << index) != 0
    }

    fn print(&self, title: Option<&str>, position: Option<BoardSquare>) {
        if let Some(title_text) = title {
            log::debug!("\x1b[97m{}\x1b[0m", title_text);
        }

        for y in (0..8).rev() {
            let mut line = String::new();
            for x in 0..8 {
                let is_marked_position =
                    position.map_or(false, |b| b.get_x() == x && b.get_y() == y);

                line.push_str(
                    match (
                        position_to_bitmask(x as u32, y as u32) & self != 0,
                        is_marked_position,
                    ) {
                        (_, true) => "\x1b[93m ● \x1b[0m",
                        (true, false) => "\x1b[97m 1 \x1b[0m",
                        (false, false) => "\x1b[90m 0 \x1b[0m",
                    },
                );
            }
            log::debug!("{}", line);
        }

        if title.is_some() {
            log::debug!("");
        }
    }

    fn iter_positions(&self) -> BitboardIterator {
        BitboardIterator { remaining: *self }
    }
}

pub trait BoardSquareExt {
    fn get_x(&self) -> u8;
    fn get_y(&self) -> u8;
    fn parse(string: &str) -> Option<BoardSquare>;
    fn unparse(&self) -> String;
    fn from_position(x: u8, y: u8) -> BoardSquare;
    fn to_mask(&self) -> Bitboard;
}

impl BoardSquareExt for u8 {
    fn get_x(&self) -> u8 {
        self % 8
    }

    fn get_y(&self) -> u8 {
        self / 8
    }

    fn parse(string: &str) -> Option<BoardSquare> {
        let mut chars = string.chars();

        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None)
                if ('a'..='h').contains(&file) && ('1'..='8').contains(&rank) =>
            {
                Some(BoardSquare::from_position(
                    file as u8 - b'a',
                    rank as u8 - b'1',
                ))
            }
            (_, _, _) => None,
        }
    }

    fn unparse(&self) -> String {
        format!(
            "{}{}",
            (self.get_x() + b'a') as char,
            (self.get_y() + b'1') as char
        )
    }

    fn from_position(x: u8, y: u8) -> BoardSquare {
        x + y * 8
    }

    fn to_mask(&self) -> Bitboard {
        1 << self
    }
}

pub struct BitboardIterator {
    remaining: u64,
}

impl Iterator for BitboardIterator {
    type Item = BoardSquare;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.remaining.trailing_zeros() as u8;
        self.remaining &= self.remaining - 1; // Clear the lowest set bit

        Some(index)
    }
}

type ReachTable = [Bitboard; 64];
type PieceReachTables = [ReachTable; Piece::COUNT];
type PawnReachTables = [ReachTable; Color::COUNT];

/// Walks every delta from (x, y), collecting on-board squares.
///
/// Sliders keep stepping along a delta until they leave the board or hit a
/// blocker; the blocker's square is still collected (a slider reaches the
/// first occupied square, friend or foe, and nothing past it).
pub const fn trace_reach(
    x: usize,
    y: usize,
    deltas: &[[i8; 2]],
    slider: bool,
    blockers: Bitboard,
) -> Bitboard {
    let mut reach = 0;

    let mut i = 0;
    while i < deltas.len() {
        let dx = deltas[i][0];
        let dy = deltas[i][1];

        let mut nx = x as i8;
        let mut ny = y as i8;

        loop {
            nx += dx;
            ny += dy;

            if !is_position_valid(nx as isize, ny as isize) {
                break;
            }

            let mask = position_to_bitmask(nx as u32, ny as u32);
            reach |= mask;

            if !slider || blockers & mask != 0 {
                break;
            }
        }

        i += 1;
    }

    reach
}

pub const fn reach_deltas(piece: &Piece, color_value: usize) -> &'static [[i8; 2]] {
    match piece {
        Piece::Pawn => match color_value {
            0 => &[[-1, -1], [1, -1]],
            1 => &[[-1, 1], [1, 1]],
            _ => unreachable!(),
        },
        Piece::Knight => &[
            [1, 2],
            [2, 1],
            [-1, 2],
            [-2, 1],
            [1, -2],
            [2, -1],
            [-1, -2],
            [-2, -1],
        ],
        Piece::Bishop => &[[1, 1], [1, -1], [-1, 1], [-1, -1]],
        Piece::Rook => &[[1, 0], [0, 1], [-1, 0], [0, -1]],
        Piece::Queen => &[
            [1, 0],
            [0, 1],
            [-1, 0],
            [0, -1],
            [1, 1],
            [1, -1],
            [-1, 1],
            [-1, -1],
        ],
        Piece::King => &[
            [1, 0],
            [0, 1],
            [-1, 0],
            [0, -1],
            [1, 1],
            [1, -1],
            [-1, 1],
            [-1, -1],
        ],
    }
}

pub const fn is_slider(piece: &Piece) -> bool {
    match piece {
        Piece::Pawn => false,
        Piece::Knight => false,
        Piece::Bishop => true,
        Piece::Rook => true,
        Piece::Queen => true,
        Piece::King => false,
    }
}

const fn calculate_piece_reach_tables() -> PieceReachTables {
    let mut tables = [[0; 64]; Piece::COUNT];

    let mut piece = 0;
    while piece < Piece::COUNT {
        match Piece::from_repr(piece) {
            // Pawn reach depends on the color; see PAWN_REACH_TABLES
            Some(Piece::Pawn) => {}
            Some(piece_type) => {
                let deltas = reach_deltas(&piece_type, Color::White as usize);
                let slider = is_slider(&piece_type);

                let mut x = 0;
                while x < 8 {
                    let mut y = 0;

                    while y < 8 {
                        tables[piece][x + y * 8] = trace_reach(x, y, deltas, slider, 0);

                        y += 1;
                    }

                    x += 1;
                }
            }
            None => unreachable!(),
        }

        piece += 1;
    }

    tables
}

const fn calculate_pawn_reach_tables() -> PawnReachTables {
    let mut tables = [[0; 64]; Color::COUNT];

    let mut color = 0;
    while color < Color::COUNT {
        let deltas = reach_deltas(&Piece::Pawn, color);

        let mut x = 0;
        while x < 8 {
            let mut y = 0;

            while y < 8 {
                tables[color][x + y * 8] = trace_reach(x, y, deltas, false, 0);

                y += 1;
            }

            x += 1;
        }

        color += 1;
    }

    tables
}

/// Unoccluded reach of every non-pawn piece from every square.
pub const PIECE_REACH_TABLES: PieceReachTables = calculate_piece_reach_tables();

/// Forward-diagonal attack squares of a pawn, per color.
pub const PAWN_REACH_TABLES: PawnReachTables = calculate_pawn_reach_tables();
