use crate::game::{
    AttackContribution, Board, Color, CoverageDepth, Piece, STARTING_PLACEMENT, SetupError,
    attack_reach, compute_direct, compute_with_depth, relocation_reach,
};
use crate::utils::{Bitboard, BitboardExt, BoardSquare, BoardSquareExt};
use std::collections::HashMap;

fn square(notation: &str) -> BoardSquare {
    BoardSquare::parse(notation).expect("test squares are well-formed")
}

fn mask_of(notations: &[&str]) -> Bitboard {
    notations
        .iter()
        .fold(0, |mask, notation| mask | square(notation).to_mask())
}

#[test]
fn test_empty_board_direct() {
    let board = Board::empty();
    let grid = compute_direct(&board);

    for target in 0..64u8 {
        let coverage = grid.at(target).direct();

        assert!(
            coverage.attackers.is_empty() && coverage.defenders.is_empty(),
            "empty board produced coverage on {}",
            target.unparse()
        );
    }
}

#[test]
fn test_reach_counts_on_empty_board() {
    let mut failures = Vec::new();

    // (piece, color, square, expected reach size)
    let test_cases = [
        (Piece::King, Color::White, "a1", 3),
        (Piece::King, Color::White, "e4", 8),
        (Piece::Knight, Color::White, "a1", 2),
        (Piece::Knight, Color::White, "d4", 8),
        (Piece::Knight, Color::White, "b1", 3),
        (Piece::Rook, Color::White, "a1", 14),
        (Piece::Rook, Color::White, "d4", 14),
        (Piece::Bishop, Color::White, "a1", 7),
        (Piece::Bishop, Color::White, "d4", 13),
        (Piece::Queen, Color::White, "a1", 21),
        (Piece::Queen, Color::White, "d4", 27),
        (Piece::Pawn, Color::White, "d4", 2),
        (Piece::Pawn, Color::White, "a2", 1),
        (Piece::Pawn, Color::White, "h5", 1),
        (Piece::Pawn, Color::White, "d8", 0),
        (Piece::Pawn, Color::Black, "a7", 1),
        (Piece::Pawn, Color::Black, "d5", 2),
        (Piece::Pawn, Color::Black, "d1", 0),
    ];

    for (piece, color, notation, expected) in test_cases {
        let reach = attack_reach(piece, color, square(notation), None);
        let actual = reach.count_ones();

        println!("{:?} {:?} on {}: {} squares", color, piece, notation, actual);

        if actual != expected {
            failures.push(format!(
                "{:?} {:?} on {}: expected {} reachable squares, got {}",
                color, piece, notation, expected, actual
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Reach count test failed with {} error(s):\n  {}",
            failures.len(),
            failures.join("\n  ")
        );
    }
}

#[test]
fn test_slider_occlusion() {
    let mut board = Board::empty();
    board
        .place(square("d4"), Piece::Rook, Color::White, 0)
        .expect("d4 is free");
    board
        .place(square("d6"), Piece::Pawn, Color::White, 1)
        .expect("d6 is free");

    let reach = attack_reach(Piece::Rook, Color::White, square("d4"), Some(&board));

    // The ray includes the blocker itself and nothing past it
    assert!(reach.is_set(square("d5")));
    assert!(reach.is_set(square("d6")));
    assert!(!reach.is_set(square("d7")));
    assert!(!reach.is_set(square("d8")));

    // The blocked squares on the other rays are unaffected
    assert!(reach.is_set(square("d1")));
    assert!(reach.is_set(square("a4")));
    assert!(reach.is_set(square("h4")));

    // Same color on the blocker square makes it a defender contribution
    let grid = compute_direct(&board);
    let blocker_coverage = grid.at(square("d6")).direct();

    assert_eq!(
        blocker_coverage.defenders,
        vec![AttackContribution {
            piece: 0,
            color: Color::White
        }]
    );
    assert!(blocker_coverage.attackers.is_empty());
}

#[test]
fn test_opposite_color_blocker_is_attacked() {
    let mut board = Board::empty();
    board
        .place(square("d4"), Piece::Rook, Color::White, 0)
        .expect("d4 is free");
    board
        .place(square("d6"), Piece::Pawn, Color::Black, 1)
        .expect("d6 is free");

    let grid = compute_direct(&board);
    let blocker_coverage = grid.at(square("d6")).direct();

    assert_eq!(
        blocker_coverage.attackers,
        vec![AttackContribution {
            piece: 0,
            color: Color::White
        }]
    );
    assert!(blocker_coverage.defenders.is_empty());
}

#[test]
fn test_lone_rook_grid() {
    let mut board = Board::empty();
    board
        .place(square("d4"), Piece::Rook, Color::White, 7)
        .expect("d4 is free");

    let grid = compute_direct(&board);
    let origin = square("d4");

    for target in 0..64u8 {
        let coverage = grid.at(target).direct();
        let on_cross = target != origin
            && (target.get_x() == origin.get_x() || target.get_y() == origin.get_y());

        if on_cross {
            assert_eq!(
                coverage.attackers,
                vec![AttackContribution {
                    piece: 7,
                    color: Color::White
                }],
                "rook should attack {}",
                target.unparse()
            );
        } else {
            assert!(
                coverage.attackers.is_empty(),
                "rook should not attack {}",
                target.unparse()
            );
        }

        assert!(coverage.defenders.is_empty());
    }
}

#[test]
fn test_knight_depth_two() {
    let mut board = Board::empty();
    board
        .place(square("b1"), Piece::Knight, Color::White, 0)
        .expect("b1 is free");

    let grid = compute_with_depth(&board, CoverageDepth::Two);

    let depth_one = attack_reach(Piece::Knight, Color::White, square("b1"), Some(&board));
    assert_eq!(depth_one, mask_of(&["a3", "c3", "d2"]));

    let mut depth_two: Bitboard = 0;
    for hop in depth_one.iter_positions() {
        depth_two |= attack_reach(Piece::Knight, Color::White, hop, None);
    }
    depth_two &= !depth_one;

    // The knight's own square is reachable again after two hops
    assert!(depth_two.is_set(square("b1")));

    for target in 0..64u8 {
        let coverage = grid.at(target);

        assert_eq!(
            coverage.direct().attackers.len(),
            depth_one.is_set(target) as usize,
            "level 1 mismatch on {}",
            target.unparse()
        );

        let second = coverage
            .level(CoverageDepth::Two)
            .expect("level 2 was computed");
        assert_eq!(
            second.attackers.len(),
            depth_two.is_set(target) as usize,
            "level 2 mismatch on {}",
            target.unparse()
        );
    }
}

#[test]
fn test_pawn_relocations() {
    let mut failures = Vec::new();

    let blocked_a3 = {
        let mut board = Board::empty();
        board
            .place(square("a3"), Piece::Knight, Color::Black, 0)
            .expect("a3 is free");
        board
    };
    let blocked_a4 = {
        let mut board = Board::empty();
        board
            .place(square("a4"), Piece::Knight, Color::Black, 0)
            .expect("a4 is free");
        board
    };

    // (color, square, board, expected squares)
    let test_cases: [(Color, &str, Option<&Board>, &[&str]); 6] = [
        (Color::White, "a2", None, &["a3", "a4", "b3"]),
        (Color::White, "a2", Some(&blocked_a3), &["b3"]),
        (Color::White, "a2", Some(&blocked_a4), &["a3", "b3"]),
        (Color::White, "d4", None, &["d5", "c5", "e5"]),
        (Color::Black, "d7", None, &["d6", "d5", "c6", "e6"]),
        (Color::Black, "h2", None, &["h1", "g1"]),
    ];

    for (color, notation, board, expected) in test_cases {
        let actual = relocation_reach(Piece::Pawn, color, square(notation), board);
        let expected_mask = mask_of(expected);

        if actual != expected_mask {
            failures.push(format!(
                "{:?} pawn on {}: expected {:?}, got {:016x}",
                color, notation, expected, actual
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Pawn relocation test failed with {} error(s):\n  {}",
            failures.len(),
            failures.join("\n  ")
        );
    }
}

#[test]
fn test_identity_unique_per_square() {
    let board = Board::starting_position();
    let grid = compute_with_depth(&board, CoverageDepth::Three);

    // Across all levels combined: one contribution per piece per square
    let mut seen: HashMap<(u32, BoardSquare), usize> = HashMap::new();

    for target in 0..64u8 {
        for level in grid.at(target).levels() {
            for contribution in level.attackers.iter().chain(level.defenders.iter()) {
                let count = seen.entry((contribution.piece, target)).or_insert(0);
                *count += 1;

                assert_eq!(
                    *count,
                    1,
                    "piece {} contributes more than once on {}",
                    contribution.piece,
                    target.unparse()
                );
            }
        }
    }
}

#[test]
fn test_idempotence() {
    let board = Board::starting_position();

    assert_eq!(compute_direct(&board), compute_direct(&board));
    assert_eq!(
        compute_with_depth(&board, CoverageDepth::Three),
        compute_with_depth(&board, CoverageDepth::Three)
    );
}

#[test]
fn test_starting_position_direct() {
    let board = Board::starting_position();
    let grid = compute_direct(&board);
    let counts = grid.attack_counts();

    // Nothing reaches the center from the starting ranks
    for notation in ["d4", "d5", "e4", "e5"] {
        let coverage = grid.at(square(notation)).direct();

        assert!(coverage.attackers.is_empty(), "{} is attacked", notation);
        assert!(coverage.defenders.is_empty(), "{} is defended", notation);
    }

    // Pawns and knights cover the third rank
    let expected_third_rank = [2, 2, 3, 2, 2, 3, 2, 2];
    for x in 0..8u8 {
        let white_side = BoardSquare::from_position(x, 2);
        let black_side = BoardSquare::from_position(x, 5);

        assert_eq!(
            counts[white_side as usize], expected_third_rank[x as usize],
            "attacker count mismatch on {}",
            white_side.unparse()
        );
        assert_eq!(
            counts[black_side as usize], expected_third_rank[x as usize],
            "attacker count mismatch on {}",
            black_side.unparse()
        );
    }

    // The counts view agrees with the structured grid
    for target in 0..64u8 {
        assert_eq!(
            counts[target as usize] as usize,
            grid.at(target).direct().attackers.len()
        );
    }
}

#[test]
fn test_placement_round_trip() {
    let board = Board::starting_position();
    assert_eq!(board.placement(), STARTING_PLACEMENT);

    let rebuilt = Board::from_placement(&board.placement()).expect("round trip parses");
    assert_eq!(rebuilt.placement(), STARTING_PLACEMENT);
    assert_eq!(rebuilt.piece_count(), 32);
}

#[test]
fn test_placement_rejects_malformed_strings() {
    for placement in [
        "",
        "8/8/8/8",
        "9/8/8/8/8/8/8/8",
        "7/8/8/8/8/8/8/8",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX",
        "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
    ] {
        assert!(
            matches!(
                Board::from_placement(placement),
                Err(SetupError::BadPlacement(_))
            ),
            "placement '{}' should be rejected",
            placement
        );
    }
}

#[test]
fn test_board_setup_fail_fast() {
    let mut board = Board::empty();

    board
        .place(square("a1"), Piece::Rook, Color::White, 0)
        .expect("a1 is free");

    assert_eq!(
        board.place(square("a1"), Piece::Knight, Color::White, 1),
        Err(SetupError::SquareOccupied(square("a1")))
    );
    assert_eq!(
        board.place(square("b1"), Piece::Knight, Color::White, 0),
        Err(SetupError::DuplicateIdentity(0))
    );

    // Removing a piece frees its identity again
    assert!(board.remove(square("a1")).is_some());
    board
        .place(square("b1"), Piece::Knight, Color::White, 0)
        .expect("identity 0 was freed");
}

#[test]
fn test_depth_parse() {
    assert_eq!(CoverageDepth::parse("1"), Some(CoverageDepth::One));
    assert_eq!(CoverageDepth::parse("2"), Some(CoverageDepth::Two));
    assert_eq!(CoverageDepth::parse("3"), Some(CoverageDepth::Three));
    assert_eq!(CoverageDepth::parse("0"), None);
    assert_eq!(CoverageDepth::parse("4"), None);
    assert_eq!(CoverageDepth::parse("x"), None);
}

#[test]
fn test_requested_depth_populates_all_levels() {
    let board = Board::starting_position();

    for depth in [CoverageDepth::One, CoverageDepth::Two, CoverageDepth::Three] {
        let grid = compute_with_depth(&board, depth);

        assert_eq!(grid.depth(), depth);
        for target in 0..64u8 {
            assert_eq!(grid.at(target).levels().len(), depth.levels());
        }
    }
}
