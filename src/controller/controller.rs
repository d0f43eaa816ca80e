use crate::game::{
    Board, Color, CoverageDepth, DepthCoverage, Piece, PieceId, PlacedPiece, SetupError,
    compute_with_depth,
};
use crate::utils::{BoardSquare, BoardSquareExt};
use rand::Rng;
use strum::EnumCount;

const RESET: &str = "\x1b[0m";
const LIGHT_SQUARE_BG: &str = "\x1b[48;5;172m";
const DARK_SQUARE_BG: &str = "\x1b[48;5;130m";
const WHITE_PIECE: &str = "\x1b[1;97m";
const BLACK_PIECE: &str = "\x1b[1;30m";
const HIGHLIGHT: &str = "\x1b[1;34m";
const HEADING_BG: &str = "\x1b[48;5;240m"; // Neutral gray background

// Fades from single coverage to a contested square
const HEAT_COLORS: &[&str] = &["\x1b[97m", "\x1b[93m", "\x1b[38;5;208m", "\x1b[91m"];

/// Owns the board between computations and renders results to the terminal.
///
/// The board is the controller's; the coverage computation only ever sees a
/// shared snapshot of it.
pub struct BoardController {
    pub board: Board,
    pub depth: CoverageDepth,
    next_id: PieceId,
}

impl BoardController {
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            depth: CoverageDepth::One,
            next_id: 0,
        }
    }

    fn allocate_id(&mut self) -> PieceId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_startpos(&mut self) {
        self.board = Board::starting_position();
        self.next_id = self.board.piece_count() as PieceId;
    }

    pub fn set_position(&mut self, placement: &str) -> Result<(), SetupError> {
        self.board = Board::from_placement(placement)?;
        self.next_id = self.board.piece_count() as PieceId;
        Ok(())
    }

    pub fn clear_board(&mut self) {
        self.board.clear();
        self.next_id = 0;
    }

    /// Places a piece given its FEN letter (uppercase white, lowercase black).
    pub fn place_piece(&mut self, square_string: &str, letter: char) {
        let Some(square) = BoardSquare::parse(square_string) else {
            log::warn!("Invalid square: {}", square_string);
            return;
        };

        let Some(piece) = Piece::from_char(letter.to_ascii_lowercase()) else {
            log::warn!("Invalid piece letter: {}", letter);
            return;
        };

        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let id = self.allocate_id();
        match self.board.place(square, piece, color, id) {
            Ok(()) => self.print_board(Some(square)),
            Err(error) => log::warn!("{}", error),
        }
    }

    pub fn remove_piece(&mut self, square_string: &str) {
        let Some(square) = BoardSquare::parse(square_string) else {
            log::warn!("Invalid square: {}", square_string);
            return;
        };

        match self.board.remove(square) {
            Some(placed) => {
                log::info!(
                    "Removed {} from {}",
                    placed.piece.name(),
                    square.unparse()
                );
                self.print_board(None);
            }
            None => log::warn!("No piece on {}", square_string),
        }
    }

    /// Scatters random pieces over empty squares.
    pub fn random_scatter(&mut self, count: usize) {
        let mut rng = rand::rng();
        let mut placed = 0;
        let mut attempts = 0;

        while placed < count && attempts < 1_000 {
            attempts += 1;

            let square: BoardSquare = rng.random_range(0..64);
            if self.board.piece_at(square).is_some() {
                continue;
            }

            let piece = Piece::from_repr(rng.random_range(0..Piece::COUNT)).unwrap_or(Piece::Pawn);
            let color = if rng.random_bool(0.5) {
                Color::White
            } else {
                Color::Black
            };

            let id = self.allocate_id();
            match self.board.place(square, piece, color, id) {
                Ok(()) => placed += 1,
                Err(error) => log::warn!("{}", error),
            }
        }

        if placed < count {
            log::warn!("Only scattered {} of {} pieces", placed, count);
        }
    }

    fn print_heading(&self, heading_text: &str) {
        // Board width is 8 squares * 3 chars each = 24 chars
        let board_width = 24;
        let padding = (board_width - heading_text.len()) / 2;
        let right_padding = board_width - heading_text.len() - padding;

        println!(
            "{}{}{}{}{}{}",
            HEADING_BG,
            " ".repeat(padding),
            WHITE_PIECE,
            heading_text,
            " ".repeat(right_padding),
            RESET
        );
    }

    pub fn print_board(&self, highlight: Option<BoardSquare>) {
        self.print_heading(&format!("{} pieces", self.board.piece_count()));

        for y in (0..8).rev() {
            let mut line = String::new();
            for x in 0..8 {
                let square = BoardSquare::from_position(x, y);
                let is_light_square = (x + y) % 2 == 1;
                let bg_color = if is_light_square {
                    LIGHT_SQUARE_BG
                } else {
                    DARK_SQUARE_BG
                };
                line.push_str(bg_color);

                match self.board.piece_at(square) {
                    Some(placed) => {
                        let piece_color = match placed.color {
                            Color::White => WHITE_PIECE,
                            Color::Black => BLACK_PIECE,
                        };
                        line.push_str(&format!(
                            "{} {} {}",
                            piece_color,
                            placed.piece.to_emoji(),
                            RESET
                        ));
                    }
                    None => {
                        if highlight == Some(square) {
                            line.push_str(&format!("{} ● {}", HIGHLIGHT, RESET));
                        } else {
                            line.push_str("   ");
                        }
                    }
                }

                line.push_str(RESET);
            }
            println!("{}", line);
        }
    }

    /// Renders one heat grid per computed level: distinct contributing
    /// pieces per square, brighter with more contention.
    pub fn print_coverage(&self, depth: Option<CoverageDepth>) {
        let depth = depth.unwrap_or(self.depth);
        let grid = compute_with_depth(&self.board, depth);

        for level in 1..=depth.levels() {
            let Some(level_depth) = CoverageDepth::from_repr(level) else {
                continue;
            };
            let counts = grid.level_counts(level_depth);

            self.print_heading(&format!("Coverage level {}", level));

            for y in (0..8).rev() {
                let mut line = String::new();
                for x in 0..8 {
                    let is_light_square = (x + y) % 2 == 1;
                    let bg_color = if is_light_square {
                        LIGHT_SQUARE_BG
                    } else {
                        DARK_SQUARE_BG
                    };
                    line.push_str(bg_color);

                    let count = counts[(x + y * 8) as usize];
                    if count == 0 {
                        line.push_str("   ");
                    } else {
                        let heat =
                            HEAT_COLORS[(count as usize - 1).min(HEAT_COLORS.len() - 1)];
                        line.push_str(&format!("{}{:^3}{}", heat, count, RESET));
                    }

                    line.push_str(RESET);
                }
                println!("{}", line);
            }
        }
    }

    /// Lists every contribution on one square, level by level.
    pub fn print_attackers(&self, square_string: &str, depth: Option<CoverageDepth>) {
        let Some(square) = BoardSquare::parse(square_string) else {
            log::warn!("Invalid square: {}", square_string);
            return;
        };

        let depth = depth.unwrap_or(self.depth);
        let grid = compute_with_depth(&self.board, depth);
        let coverage = grid.at(square);

        println!("{}:", square.unparse());

        for (i, level) in coverage.levels().iter().enumerate() {
            println!(
                "  level {}: {} attackers, {} defenders",
                i + 1,
                level.attackers.len(),
                level.defenders.len()
            );

            self.print_contributions(level);
        }
    }

    fn print_contributions(&self, level: &DepthCoverage) {
        for (label, contributions) in [
            ("attacker", &level.attackers),
            ("defender", &level.defenders),
        ] {
            for contribution in contributions {
                let name = self
                    .find_piece(contribution.piece)
                    .map(|placed| placed.piece.name())
                    .unwrap_or("piece");

                let color = match contribution.color {
                    Color::White => "white",
                    Color::Black => "black",
                };

                println!("    {}: {} {} #{}", label, color, name, contribution.piece);
            }
        }
    }

    fn find_piece(&self, id: PieceId) -> Option<PlacedPiece> {
        self.board
            .iter_pieces()
            .map(|(_, placed)| placed)
            .find(|placed| placed.id == id)
    }

    pub fn print_placement(&self) {
        println!("{}", self.board.placement());
    }
}
