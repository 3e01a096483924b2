use super::*;
use crate::error::GomokuError;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_pos_index_round_trip() {
    let pos = Pos::new(9, 9);
    assert_eq!(pos.to_index(), 180);
    assert_eq!(Pos::from_index(180), pos);
    assert_eq!(Pos::new(18, 18).to_index(), TOTAL_CELLS - 1);
}

#[test]
fn test_pos_try_new() {
    assert_eq!(Pos::try_new(0, 18).unwrap(), Pos::new(0, 18));
    assert_eq!(
        Pos::try_new(-1, 4),
        Err(GomokuError::OutOfBounds { row: -1, col: 4 })
    );
    assert_eq!(
        Pos::try_new(3, 19),
        Err(GomokuError::OutOfBounds { row: 3, col: 19 })
    );
}

#[test]
fn test_pos_offset_and_distance() {
    let pos = Pos::new(0, 0);
    assert_eq!(pos.offset(1, 1, 2), Some(Pos::new(2, 2)));
    assert_eq!(pos.offset(-1, 0, 1), None);
    assert_eq!(Pos::new(9, 9).distance(Pos::new(11, 8)), 2);
    assert_eq!(Pos::center(), Pos::new(9, 9));
}

#[test]
fn test_pos_ordering() {
    assert!(Pos::new(0, 0) < Pos::new(0, 1));
    assert!(Pos::new(0, 18) < Pos::new(1, 0));
}

#[test]
fn test_new_board_is_empty() {
    let board = Board::new();
    assert!(board.is_board_empty());
    assert_eq!(board.stone_count(), 0);
    assert_eq!(board.captures(Stone::Black), 0);
    assert_eq!(board.captures(Stone::White), 0);
    assert_eq!(board.at(Pos::new(9, 9)), Stone::Empty);
}

#[test]
fn test_at_coord_bounds() {
    let mut board = Board::new();
    board.place_stone(Pos::new(0, 0), Stone::White);
    assert_eq!(board.at_coord(0, 0), Ok(Stone::White));
    assert_eq!(
        board.at_coord(19, 0),
        Err(GomokuError::OutOfBounds { row: 19, col: 0 })
    );
    assert_eq!(board.cell(-1, 5), None);
    assert_eq!(board.cell(0, 0), Some(Stone::White));
}

#[test]
fn test_place_and_remove_restore_signature() {
    let mut board = Board::new();
    let empty = board.signature();
    board.place_stone(Pos::new(3, 4), Stone::Black);
    assert_ne!(board.signature(), empty);
    board.remove_stone(Pos::new(3, 4));
    assert_eq!(board.signature(), empty);
    assert_eq!(board, Board::new());
}

#[test]
fn test_signature_is_order_independent() {
    let mut a = Board::new();
    a.place_stone(Pos::new(1, 1), Stone::Black);
    a.place_stone(Pos::new(2, 2), Stone::White);
    let mut b = Board::new();
    b.place_stone(Pos::new(2, 2), Stone::White);
    b.place_stone(Pos::new(1, 1), Stone::Black);
    assert_eq!(a.signature(), b.signature());
}

#[test]
fn test_signature_includes_captures() {
    let mut a = Board::new();
    let b = Board::new();
    a.set_captures(Stone::Black, 1);
    assert_ne!(a.signature(), b.signature());
    a.set_captures(Stone::Black, 0);
    assert_eq!(a.signature(), b.signature());
}

#[test]
fn test_apply_undo_with_captures() {
    let mut board = Board::new();
    board.place_stone(Pos::new(9, 9), Stone::Black);
    board.place_stone(Pos::new(9, 10), Stone::White);
    board.place_stone(Pos::new(9, 11), Stone::White);
    let before = board.clone();

    let mv = Move::new(Pos::new(9, 12), Stone::Black);
    let mut record = CaptureRecord::new();
    record.push(Pos::new(9, 10), Pos::new(9, 11));
    board.apply(mv, &record);

    assert_eq!(board.at(Pos::new(9, 10)), Stone::Empty);
    assert_eq!(board.at(Pos::new(9, 11)), Stone::Empty);
    assert_eq!(board.captures(Stone::Black), 1);
    assert_eq!(board.captured_stones(Stone::Black), 2);

    board.undo(mv, &record).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_undo_rejects_mismatched_board() {
    let mut board = Board::new();
    let mv = Move::new(Pos::new(4, 4), Stone::Black);
    let err = board.undo(mv, &CaptureRecord::new()).unwrap_err();
    assert!(matches!(err, GomokuError::InvariantViolation(_)));

    board.place_stone(Pos::new(4, 4), Stone::Black);
    let mut record = CaptureRecord::new();
    record.push(Pos::new(4, 5), Pos::new(4, 6));
    let err = board.undo(mv, &record).unwrap_err();
    assert!(matches!(err, GomokuError::InvariantViolation(_)));
    // Failed undo leaves the board as it was
    assert_eq!(board.at(Pos::new(4, 4)), Stone::Black);
}

#[test]
fn test_capture_record() {
    let mut record = CaptureRecord::new();
    assert!(record.is_empty());
    record.push(Pos::new(1, 1), Pos::new(1, 2));
    record.push(Pos::new(2, 1), Pos::new(3, 1));
    assert_eq!(record.pair_count(), 2);
    assert_eq!(record.stone_count(), 4);
    assert!(record.contains(Pos::new(3, 1)));
    assert!(!record.contains(Pos::new(0, 0)));
}

#[test]
fn test_display_marks_stones() {
    let mut board = Board::new();
    board.place_stone(Pos::new(0, 0), Stone::Black);
    board.place_stone(Pos::new(0, 1), Stone::White);
    let text = board.to_string();
    assert!(text.contains(" 0  X O ."));
    assert!(text.ends_with("captures: X 0 / O 0"));
}
