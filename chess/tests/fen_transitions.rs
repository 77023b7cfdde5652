use chess::{
    apply_occupancy_change, apply_uci_move, decode_board, encode_board, update_fen, Board,
    MoveSource, Occupancy, Outcome, Piece, PieceColor, PieceKind, Position, Square,
    TransitionOptions, Unresolvable, START_BOARD, START_FEN,
};
use proptest::prelude::*;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn cell() -> impl Strategy<Value = Option<Piece>> {
    proptest::option::of((0..6usize, any::<bool>()).prop_map(|(kind, white)| {
        let color = if white {
            PieceColor::White
        } else {
            PieceColor::Black
        };
        Piece::new(color, PieceKind::ALL[kind])
    }))
}

fn grid() -> impl Strategy<Value = Board> {
    proptest::array::uniform8(proptest::array::uniform8(cell())).prop_map(Board::from_rows)
}

proptest! {
    #[test]
    fn test_board_codec_round_trips_grids(board in grid()) {
        let field = encode_board(&board);
        prop_assert_eq!(decode_board(&field).unwrap(), board);
    }

    #[test]
    fn test_board_codec_round_trips_fields(board in grid()) {
        let field = encode_board(&board);
        prop_assert_eq!(encode_board(&decode_board(&field).unwrap()), field);
    }

    #[test]
    fn test_output_never_carries_en_passant(board in grid(), white in any::<bool>()) {
        let color = if white { "w" } else { "b" };
        let pos = Position::from_fen(&format!("{} {color} - - 0 1", encode_board(&board))).unwrap();
        let occ = Occupancy::from_board(pos.board());
        let t = apply_occupancy_change(&pos, &occ, &occ, &TransitionOptions::default()).unwrap();
        let fen = t.position.to_fen();
        let fields: Vec<&str> = fen.split(' ').collect();
        prop_assert_eq!(fields[3], "-");
    }
}

#[test]
fn test_starting_grid_encodes_to_standard_field() {
    assert_eq!(
        encode_board(&Board::starting()),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    );
    assert_eq!(START_BOARD, encode_board(&Board::starting()));
}

#[test]
fn test_e2e4_from_start() {
    let next = apply_uci_move(
        &Position::from_fen(START_FEN).unwrap(),
        "e2e4",
        &TransitionOptions::default(),
    )
    .unwrap();

    let rows = next.board().rows();
    assert_eq!(rows[4][4], Some(Piece::new(PieceColor::White, PieceKind::Pawn)));
    assert_eq!(rows[6][4], None);
    assert_eq!(next.active_color(), PieceColor::Black);
    assert_eq!(next.castling().to_string(), "KQkq");
    assert_eq!(next.halfmove_clock(), 0);
    assert_eq!(next.fullmove_number(), 1);
}

#[test]
fn test_g1f3_from_start() {
    let fen = update_fen(START_FEN, MoveSource::Uci("g1f3"), &TransitionOptions::default())
        .unwrap();
    assert_eq!(
        fen,
        "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1"
    );
}

#[test]
fn test_en_passant_input_is_cleared() {
    let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
    let out = update_fen(fen, MoveSource::Uci("g8f6"), &TransitionOptions::default()).unwrap();
    assert_eq!(
        out,
        "rnbqkb1r/ppp1pppp/5n2/8/3pP3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 4"
    );
}

#[test]
fn test_white_king_move_clears_only_white_rights() {
    let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let next = apply_uci_move(&pos, "e1d1", &TransitionOptions::default()).unwrap();
    assert_eq!(next.castling().to_string(), "kq");

    let next = apply_uci_move(&pos, "a1b1", &TransitionOptions::default()).unwrap();
    assert_eq!(next.castling().to_string(), "Kkq");
}

#[test]
fn test_diff_pair_is_order_independent() {
    let prev = Position::from_fen(START_FEN).unwrap();
    let before = Occupancy::from_board(prev.board());

    // d2 sits after d4 in row order, b1 sits after c3.
    for (from, to) in [("d2", "d4"), ("b1", "c3")] {
        let mut after = before;
        after.set(sq(from), false);
        after.set(sq(to), true);
        let t = apply_occupancy_change(&prev, &before, &after, &TransitionOptions::default())
            .unwrap();
        let Outcome::Moved(mv) = t.outcome else {
            panic!("expected a move for {from}{to}");
        };
        assert_eq!((mv.from, mv.to), (sq(from), sq(to)));
        assert!(t.position.board().is_occupied(sq(to)));
        assert!(!t.position.board().is_occupied(sq(from)));
    }
}

#[test]
fn test_corrupted_diff_falls_back_to_side_toggle() {
    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    let prev = Position::from_fen(fen).unwrap();
    let before = Occupancy::from_board(prev.board());
    let mut after = before;
    after.set(sq("a7"), false);
    after.set(sq("h7"), false);
    after.set(sq("d5"), true);

    let t = apply_occupancy_change(&prev, &before, &after, &TransitionOptions::default()).unwrap();
    assert_eq!(t.outcome, Outcome::TurnPassed(Unresolvable::ChangedSquares(3)));
    assert_eq!(
        t.position.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
    );
}

/// Quiet moves and captures agree with a full move generator on board,
/// side to move, castling and clocks.
#[test]
fn test_agrees_with_cozy_chess_on_an_opening() {
    let moves = [
        "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "f3e5", "c6e5", "c4f7", "e8f7",
    ];
    let mut oracle = cozy_chess::Board::default();
    let mut pos = Position::from_fen(START_FEN).unwrap();
    let opts = TransitionOptions::default();

    for mv in moves {
        oracle.play(mv.parse().unwrap());
        pos = apply_uci_move(&pos, mv, &opts).unwrap();

        let expected = oracle.to_string();
        let expected: Vec<&str> = expected.split(' ').collect();
        let ours = pos.to_fen();
        let ours: Vec<&str> = ours.split(' ').collect();
        for field in [0, 1, 2, 4, 5] {
            assert_eq!(ours[field], expected[field], "field {field} after {mv}");
        }
    }
    assert_eq!(pos.castling().to_string(), "KQ");
}
