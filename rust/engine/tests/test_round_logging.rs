use std::fs;

use tablemind_engine::logger::{LoggedRound, RoundLogger};
use tablemind_engine::player::PlayerAction;
use tablemind_engine::record::{GameRecord, PlayerSnapshot, RoundEvent, Street};

fn sample_round(id: u32) -> GameRecord {
    let mut rec = GameRecord::new();
    rec.start_round(
        id,
        vec!["ann".into(), "bob".into()],
        vec![PlayerSnapshot {
            player_name: "ann".into(),
            chips: 1000,
            hand: vec!["AS".parse().unwrap(), "KD".parse().unwrap()],
        }],
    );
    rec.record(RoundEvent::Deal {
        street: Street::Flop,
        cards: vec!["2C".parse().unwrap(), "7D".parse().unwrap(), "9H".parse().unwrap()],
    });
    rec.record(RoundEvent::Play {
        player: "ann".into(),
        street: Street::Flop,
        action: PlayerAction::Raise(40),
        paid: 40,
        pot: 40,
        current_bet: 40,
        behavior: "I raise 40".into(),
    });
    rec
}

#[test]
fn writes_jsonl_with_lf_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    logger.write(sample_round(1).current().unwrap()).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
}

#[test]
fn every_line_is_a_timestamped_round() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("rounds.jsonl");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    for id in 1..=3 {
        logger.write(sample_round(id).current().unwrap()).unwrap();
    }
    assert_eq!(logger.written(), 3);

    let text = fs::read_to_string(&path).unwrap();
    let rounds: Vec<LoggedRound> = text
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json line"))
        .collect();
    assert_eq!(rounds.len(), 3);
    assert_eq!(rounds[2].round.round_id, 3);
    assert!(rounds.iter().all(|r| r.ts.ends_with('Z')));
    assert_eq!(rounds[0].round, *sample_round(1).current().unwrap());
}

#[test]
fn reopening_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.jsonl");
    for _ in 0..2 {
        let mut logger = RoundLogger::create(&path).unwrap();
        logger.write(sample_round(1).current().unwrap()).unwrap();
    }
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn event_tags_match_record_format() {
    let rec = sample_round(1);
    let json = serde_json::to_value(rec.current().unwrap()).unwrap();
    assert_eq!(json["actions"][0]["type"], "deal");
    assert_eq!(json["actions"][0]["cards"][0], "2C");
    assert_eq!(json["actions"][1]["type"], "play");
    assert_eq!(json["actions"][1]["action"]["kind"], "raise");
    assert_eq!(json["actions"][1]["action"]["amount"], 40);
    assert_eq!(json["initial_states"][0]["hand"][1], "KD");
}

#[test]
fn disabled_logger_counts_without_writing() {
    let mut logger = RoundLogger::disabled();
    logger.write(sample_round(1).current().unwrap()).unwrap();
    assert_eq!(logger.written(), 1);
}
