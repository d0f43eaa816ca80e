use crate::game::board::Board;
use crate::game::pieces::{Color, Piece};
use crate::utils::{
    Bitboard, BoardSquare, BoardSquareExt, PAWN_REACH_TABLES, PIECE_REACH_TABLES,
    is_position_valid, is_slider, position_to_bitmask, reach_deltas, trace_reach,
};

/// Squares a piece attacks from `square`.
///
/// With a board supplied, sliding rays stop at (and include) the first
/// occupied square. Without one the reach is taken from the precomputed
/// empty-board tables, which is what the speculative expansion wants.
pub fn attack_reach(
    piece: Piece,
    color: Color,
    square: BoardSquare,
    board: Option<&Board>,
) -> Bitboard {
    match piece {
        Piece::Pawn => PAWN_REACH_TABLES[color as usize][square as usize],
        _ if !is_slider(&piece) => PIECE_REACH_TABLES[piece as usize][square as usize],
        _ => match board {
            Some(board) => {
                let blockers = board.occupancy() & !square.to_mask();

                trace_reach(
                    square.get_x() as usize,
                    square.get_y() as usize,
                    reach_deltas(&piece, color as usize),
                    true,
                    blockers,
                )
            }
            None => PIECE_REACH_TABLES[piece as usize][square as usize],
        },
    }
}

/// Squares a piece could relocate to, for the speculative expansion.
///
/// Identical to `attack_reach` for everything but the pawn, which moves
/// straight ahead instead of diagonally. The pawn's diagonal attack squares
/// are still included as hypothetical relocation targets.
pub fn relocation_reach(
    piece: Piece,
    color: Color,
    square: BoardSquare,
    board: Option<&Board>,
) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_relocations(color, square, board),
        _ => attack_reach(piece, color, square, board),
    }
}

fn pawn_relocations(color: Color, square: BoardSquare, board: Option<&Board>) -> Bitboard {
    let mut reach = PAWN_REACH_TABLES[color as usize][square as usize];

    let x = square.get_x() as i8;
    let y = square.get_y() as i8;
    let direction = color.pawn_direction();

    if !is_position_valid(x as isize, (y + direction) as isize) {
        return reach;
    }

    let single = position_to_bitmask(x as u32, (y + direction) as u32);
    if board.map_or(false, |board| board.occupancy() & single != 0) {
        return reach;
    }
    reach |= single;

    // Double push, only from the start rank and only through an empty square
    if square.get_y() == color.pawn_start_rank() {
        let double = position_to_bitmask(x as u32, (y + 2 * direction) as u32);
        if !board.map_or(false, |board| board.occupancy() & double != 0) {
            reach |= double;
        }
    }

    reach
}
