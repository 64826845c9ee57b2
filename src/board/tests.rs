use super::*;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_stone_wire_encoding() {
    assert_eq!(serde_json::to_string(&Stone::Black).unwrap(), "1");
    assert_eq!(serde_json::from_str::<Stone>("2").unwrap(), Stone::White);
    assert!(serde_json::from_str::<Stone>("3").is_err());
    assert_eq!(Stone::from_u8(0), Some(Stone::Empty));
    assert_eq!(Stone::from_u8(7), None);
}

#[test]
fn test_board_size_bounds() {
    assert!(Board::new(4).is_err());
    assert!(Board::new(26).is_err());
    assert_eq!(Board::new(5).unwrap().size(), 5);
    assert_eq!(Board::new(25).unwrap().size(), 25);
    assert_eq!(Board::default().size(), DEFAULT_BOARD_SIZE);
}

#[test]
fn test_pos_ordering_is_row_major() {
    let a = Pos::new(3, 0);
    let b = Pos::new(0, 1);
    assert!(a < b);
    assert!(Pos::new(0, 0) < Pos::new(1, 0));
}

#[test]
fn test_bounds() {
    let board = Board::new(15).unwrap();
    assert!(board.in_bounds(0, 0));
    assert!(board.in_bounds(14, 14));
    assert!(!board.in_bounds(-1, 0));
    assert!(!board.in_bounds(15, 3));
    assert_eq!(board.get_at(15, 0), None);
    assert_eq!(board.get_at(7, 7), Some(Stone::Empty));
}

#[test]
fn test_rows_layout_is_y_major() {
    let mut board = Board::new(5).unwrap();
    board.place_stone(Pos::new(3, 1), Stone::Black);
    let rows = board.to_rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1][3], 1);
    assert_eq!(rows[3][1], 0);
    assert_eq!(Board::from_rows(&rows).unwrap(), board);
}

#[test]
fn test_from_rows_rejects_bad_input() {
    let ragged = vec![vec![0u8; 5], vec![0u8; 4], vec![0; 5], vec![0; 5], vec![0; 5]];
    assert!(matches!(
        Board::from_rows(&ragged),
        Err(BoardError::RaggedRow { row: 1, .. })
    ));

    let mut bad = vec![vec![0u8; 5]; 5];
    bad[2][4] = 9;
    assert_eq!(
        Board::from_rows(&bad),
        Err(BoardError::InvalidCell { x: 4, y: 2, value: 9 })
    );
}

#[test]
fn test_neighbor_radius() {
    let mut board = Board::new(15).unwrap();
    board.place_stone(Pos::new(7, 7), Stone::White);
    assert!(board.has_neighbor(Pos::new(9, 9), 2));
    assert!(!board.has_neighbor(Pos::new(10, 7), 2));
    assert!(board.has_neighbor(Pos::new(10, 7), 3));
    // the stone itself does not count as its own neighbor
    assert!(!board.has_neighbor(Pos::new(7, 7), 2));
}

#[test]
fn test_empties_and_counts() {
    let mut board = Board::new(5).unwrap();
    assert!(board.is_board_empty());
    assert_eq!(board.empties().count(), 25);
    board.place_stone(Pos::new(0, 0), Stone::Black);
    board.place_stone(Pos::new(4, 4), Stone::White);
    assert_eq!(board.stone_count(), 2);
    assert_eq!(board.empties().count(), 23);
    assert_eq!(board.empties().next(), Some(Pos::new(1, 0)));
    assert!(!board.is_full());
}

#[test]
fn test_center_distance() {
    assert_eq!(Pos::new(7, 7).center_distance_sq(15), 0.0);
    assert_eq!(Pos::new(0, 0).center_distance_sq(15), 98.0);
}
