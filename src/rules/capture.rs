//! Pair capture detection
//!
//! Placing a stone so that exactly two opponent stones sit between it and
//! another of the mover's stones (X-O-O-X) removes the pair. Only the moving
//! stone can flank, so playing into a flanked gap is safe.

use crate::board::{Board, CaptureRecord, Pos, Stone, DIRECTIONS};

/// The eight rays out of a cell.
pub(crate) const RAYS: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (-1, 1),
];

/// The pair captured along one ray if `side` plays at `pos`.
#[inline]
fn pair_on_ray(board: &Board, pos: Pos, side: Stone, dr: i32, dc: i32) -> Option<(Pos, Pos)> {
    let opp = side.opponent();
    let first = pos.offset(dr, dc, 1)?;
    let second = pos.offset(dr, dc, 2)?;
    let anchor = pos.offset(dr, dc, 3)?;
    if board.at(first) == opp && board.at(second) == opp && board.at(anchor) == side {
        Some((first, second))
    } else {
        None
    }
}

/// Pairs `side` would capture by playing at `pos`.
///
/// The cell at `pos` itself is not inspected, so this works both before and
/// after the stone is placed.
pub fn find_captures(board: &Board, pos: Pos, side: Stone) -> CaptureRecord {
    let mut record = CaptureRecord::new();
    if !side.is_player() {
        return record;
    }
    for (dr, dc) in RAYS {
        if let Some((a, b)) = pair_on_ray(board, pos, side, dr, dc) {
            record.push(a, b);
        }
    }
    record
}

/// Whether playing at `pos` captures anything. Stops at the first pair.
#[inline]
pub fn has_capture(board: &Board, pos: Pos, side: Stone) -> bool {
    side.is_player()
        && RAYS
            .iter()
            .any(|&(dr, dc)| pair_on_ray(board, pos, side, dr, dc).is_some())
}

/// Number of pairs captured by playing at `pos`.
pub fn capture_count(board: &Board, pos: Pos, side: Stone) -> u8 {
    if !side.is_player() {
        return 0;
    }
    RAYS.iter()
        .filter(|&&(dr, dc)| pair_on_ray(board, pos, side, dr, dc).is_some())
        .count() as u8
}

/// Every empty cell where `side` captures at least one pair right now.
///
/// Walks out from `side`'s own stones (the anchors), so the cost scales with
/// the number of stones rather than the board size.
pub fn capture_moves(board: &Board, side: Stone) -> Vec<Pos> {
    let Some(own) = board.stones(side) else {
        return Vec::new();
    };
    let opp = side.opponent();
    let mut moves = Vec::new();
    for anchor in own {
        for (dr, dc) in RAYS {
            let (Some(a), Some(b), Some(target)) = (
                anchor.offset(dr, dc, 1),
                anchor.offset(dr, dc, 2),
                anchor.offset(dr, dc, 3),
            ) else {
                continue;
            };
            if board.at(a) == opp
                && board.at(b) == opp
                && board.is_empty(target)
                && !moves.contains(&target)
            {
                moves.push(target);
            }
        }
    }
    moves
}

/// Whether the stone at `pos` belongs to a pair the opponent could take with
/// one move.
pub fn is_capturable(board: &Board, pos: Pos) -> bool {
    let owner = board.at(pos);
    if !owner.is_player() {
        return false;
    }
    let opp = owner.opponent();
    DIRECTIONS.iter().any(|&(dr, dc)| {
        // The pair is either (pos, pos+d) or (pos-d, pos)
        [0, -1].iter().any(|&shift| {
            let (Some(first), Some(second)) =
                (pos.offset(dr, dc, shift), pos.offset(dr, dc, shift + 1))
            else {
                return false;
            };
            if board.at(first) != owner || board.at(second) != owner {
                return false;
            }
            let before = first.offset(dr, dc, -1).map(|p| board.at(p));
            let after = second.offset(dr, dc, 1).map(|p| board.at(p));
            matches!(
                (before, after),
                (Some(Stone::Empty), Some(s)) | (Some(s), Some(Stone::Empty)) if s == opp
            )
        })
    })
}
