use tablemind_engine::cards::Card;
use tablemind_engine::errors::GameError;
use tablemind_engine::hand::{compare_hands, evaluate_hand, Category, HandEvaluator, StandardEvaluator};

fn seven(codes: [&str; 7]) -> [Card; 7] {
    codes.map(|c| c.parse().expect("card code"))
}

fn hole_board(codes: [&str; 7]) -> ([Card; 2], Vec<Card>) {
    let all = seven(codes);
    ([all[0], all[1]], all[2..].to_vec())
}

#[test]
fn detects_royal_flush() {
    let hs = evaluate_hand(&seven(["10H", "JH", "QH", "KH", "AH", "2C", "3D"]));
    assert_eq!(hs.category, Category::StraightFlush);
}

#[test]
fn category_ordering_is_correct() {
    let quads = evaluate_hand(&seven(["AC", "AD", "AH", "AS", "KC", "QD", "2H"]));
    let full_house = evaluate_hand(&seven(["KC", "KD", "KH", "QC", "QD", "2H", "3S"]));
    assert!(compare_hands(&quads, &full_house).is_gt());
}

#[test]
fn straight_beats_three_of_a_kind() {
    let straight = evaluate_hand(&seven(["5C", "6H", "7C", "8H", "9D", "2S", "3C"]));
    let trips = evaluate_hand(&seven(["QC", "QH", "QD", "2S", "3C", "4H", "9D"]));
    assert_eq!(straight.category, Category::Straight);
    assert_eq!(trips.category, Category::ThreeOfAKind);
    assert!(compare_hands(&straight, &trips).is_gt());
}

#[test]
fn flush_beats_straight_and_is_detected() {
    let flush = evaluate_hand(&seven(["2H", "7H", "JH", "QH", "9H", "AC", "KD"]));
    let straight = evaluate_hand(&seven(["5C", "6H", "7C", "8H", "9D", "2S", "3C"]));
    assert_eq!(flush.category, Category::Flush);
    assert!(compare_hands(&flush, &straight).is_gt());
}

#[test]
fn pair_beats_high_card() {
    let pair = evaluate_hand(&seven(["AC", "AH", "2S", "6D", "9C", "JD", "KH"]));
    let high = evaluate_hand(&seven(["AC", "KH", "9S", "8D", "7C", "3D", "2H"]));
    assert_eq!(pair.category, Category::OnePair);
    assert_eq!(high.category, Category::HighCard);
    assert!(compare_hands(&pair, &high).is_gt());
}

#[test]
fn score_is_lower_for_better_hand() {
    let e = StandardEvaluator;
    let (h1, board) = hole_board(["AS", "AD", "AH", "KC", "7D", "4S", "2C"]);
    let (h2, _) = hole_board(["KS", "KD", "AH", "KC", "7D", "4S", "2C"]);
    let trips_aces = e.evaluate(&h1, &board).unwrap();
    let trips_kings = e.evaluate(&h2, &board).unwrap();
    assert!(trips_aces.beats(&trips_kings));
    assert!(trips_aces.value() < trips_kings.value());
}

#[test]
fn board_plays_for_both_players() {
    let e = StandardEvaluator;
    let (h1, board) = hole_board(["2C", "3D", "AH", "KH", "QH", "JH", "10H"]);
    let (h2, _) = hole_board(["4C", "5D", "AH", "KH", "QH", "JH", "10H"]);
    assert_eq!(e.evaluate(&h1, &board).unwrap(), e.evaluate(&h2, &board).unwrap());
}

#[test]
fn evaluation_needs_five_board_cards() {
    let e = StandardEvaluator;
    let (hole, board) = hole_board(["AS", "AD", "AH", "KC", "7D", "4S", "2C"]);
    assert_eq!(
        e.evaluate(&hole, &board[..3]),
        Err(GameError::IncompleteBoard(3))
    );
}
