use std::fs;
use tablemind_cli::run;

fn run_play(extra: &[&str]) -> (i32, String, String) {
    let mut argv = vec!["tablemind", "play"];
    argv.extend_from_slice(extra);
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn scripted_check_down_narrates_one_hand() {
    let records = tempfile::tempdir().unwrap();
    let (code, out, _) = run_play(&[
        "--player",
        "ann=scripted:check,check,check",
        "--player",
        "bob=scripted:check,check,check",
        "--seed",
        "42",
        "--records-dir",
        records.path().to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(out.contains("play: players=2 hands=1 seed=42"));
    assert!(out.contains("Seat 1: ann (scripted:check,check,check) 1000 chips"));
    assert!(out.contains("Seat 2: bob (scripted:check,check,check) 1000 chips"));
    assert!(out.contains("===== Hand 1 ====="));
    for street in ["--- flop ---", "--- turn ---", "--- river ---"] {
        assert!(out.contains(street), "missing {}", street);
    }
    assert_eq!(out.matches("] ann: check (paid 0, pot 0)").count(), 3);
    assert!(out.contains("Last reply: \"check\""));
    assert!(out.contains("Showdown:"));
    assert!(out.contains("Hands played: 1"));
    // nobody was knocked out, so nothing is exported
    assert!(fs::read_dir(records.path()).unwrap().next().is_none());
}

#[test]
fn all_in_ends_match_and_exports_record() {
    let records = tempfile::tempdir().unwrap();
    let (code, out, err) = run_play(&[
        "--player",
        "ann=scripted:raise 500",
        "--player",
        "bob=scripted:call",
        "--chips",
        "100",
        "--hands",
        "5",
        "--seed",
        "3",
        "--records-dir",
        records.path().to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {}", err);
    assert!(out.contains("[flop] ann: raise 500 (paid 100, pot 100)"));
    assert!(out.contains("[flop] bob: call (paid 100, pot 200)"));
    assert!(out.contains("is eliminated"));
    assert!(out.contains("Match over: "));
    assert!(out.contains("Hands played: 1"));

    let exported: Vec<_> = fs::read_dir(records.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(exported.len(), 1);
    let name = exported[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("game_record_") && name.ends_with(".json"));
    assert!(out.contains(&format!("Round record exported to {}", exported[0].display())));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&exported[0]).unwrap()).unwrap();
    assert_eq!(doc["round_id"], 1);
    let types: Vec<&str> = doc["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"challenge"));
    assert!(types.contains(&"penalty"));
}

#[test]
fn baseline_players_play_several_hands() {
    let records = tempfile::tempdir().unwrap();
    let history = records.path().join("history.jsonl");
    let (code, out, _) = run_play(&[
        "--player",
        "ann=baseline",
        "--player",
        "bob=baseline",
        "--player",
        "cat=baseline",
        "--hands",
        "3",
        "--seed",
        "11",
        "--blinds",
        "--records-dir",
        records.path().to_str().unwrap(),
        "--history",
        history.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(out.contains("posts small blind of 10"));
    assert!(out.contains("posts big blind of 20"));
    let hands = out.matches("===== Hand ").count();
    assert!((1..=3).contains(&hands));
    assert_eq!(
        fs::read_to_string(&history).unwrap().lines().count(),
        hands
    );
}

#[test]
fn exhausted_script_falls_back_to_check() {
    let records = tempfile::tempdir().unwrap();
    let (code, out, _) = run_play(&[
        "--player",
        "ann=scripted:",
        "--player",
        "bob=scripted:",
        "--seed",
        "1",
        "--records-dir",
        records.path().to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(out.matches(": check (paid 0, pot 0)").count(), 6);
    assert!(out.contains("* ann: decision failed"));
}

#[test]
fn single_player_is_rejected() {
    let (code, _, err) = run_play(&["--player", "ann=baseline"]);
    assert_eq!(code, 2);
    assert!(err.contains("Error: Invalid input: At least 2 players required, got 1"));
}

#[test]
fn duplicate_names_are_rejected() {
    let (code, _, err) = run_play(&["--player", "ann=baseline", "--player", "ann=baseline"]);
    assert_eq!(code, 2);
    assert!(err.contains("Duplicate player name: ann"));
}

#[test]
fn malformed_player_spec_is_a_usage_error() {
    let (code, _, err) = run_play(&["--player", "ann", "--player", "bob=baseline"]);
    assert_eq!(code, 2);
    assert!(err.contains("expected NAME=MODEL"));
    assert!(err.contains("Usage: tablemind"));
}

#[test]
fn zero_hands_is_a_config_error() {
    let (code, _, err) = run_play(&[
        "--player",
        "ann=baseline",
        "--player",
        "bob=baseline",
        "--hands",
        "0",
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("hands must be >=1"));
}
