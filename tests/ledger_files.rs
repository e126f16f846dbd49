use std::fs;

use tempfile::tempdir;
use typemaster::leaderboard::Leaderboard;
use typemaster::{CsvLedger, ScoreLedger, ScoreRecord};

fn record(name: &str, score: u32) -> ScoreRecord {
    ScoreRecord::new(
        name.to_string(),
        score,
        score as f64 + 0.5,
        97.25,
        "2024-05-01 10:30".to_string(),
    )
}

#[test]
fn scores_survive_a_new_ledger_handle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("high_scores.txt");

    let ledger = CsvLedger::with_path(&path);
    ledger.append(&record("Ann", 40)).unwrap();
    ledger.append(&record("Bo", 55)).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "Ann,40,40.50,97.25,2024-05-01 10:30\nBo,55,55.50,97.25,2024-05-01 10:30\n"
    );

    let reopened = CsvLedger::with_path(&path);
    let board = Leaderboard::load(&reopened, 10);
    let names: Vec<&str> = board.entries().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Bo", "Ann"]);
    assert!(board.warning().is_none());
}

#[test]
fn hand_edited_ledger_keeps_good_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_scores.txt");
    fs::write(
        &path,
        "Ann,40,40.5,97.25,2024-05-01 10:30\n\
         garbage line\n\
         Cy,not a number,1,1,2024-05-01 10:31\n\
         Di, 12 ,12.0,100.0,2024-05-02 09:00\n",
    )
    .unwrap();

    let records = CsvLedger::with_path(&path).load_all().unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Ann", "Di"]);
    assert_eq!(records[1].score(), 12);
}

#[test]
fn missing_ledger_is_an_empty_board() {
    let dir = tempdir().unwrap();
    let ledger = CsvLedger::with_path(dir.path().join("absent.txt"));

    let board = Leaderboard::load(&ledger, 10);
    assert!(board.is_empty());
    assert_eq!(board.to_string(), "No high scores yet!\n");
}

#[test]
fn ties_keep_insertion_order() {
    let dir = tempdir().unwrap();
    let ledger = CsvLedger::with_path(dir.path().join("high_scores.txt"));
    for (name, score) in [("Ann", 30), ("Bo", 50), ("Cy", 30), ("Di", 10)] {
        ledger.append(&record(name, score)).unwrap();
    }

    let board = Leaderboard::load(&ledger, 3);
    let names: Vec<&str> = board.entries().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Bo", "Ann", "Cy"]);
}

#[test]
fn stray_quote_only_loses_its_own_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_scores.txt");
    fs::write(
        &path,
        "\"Ann,40,40.50,97.25,2024-05-01 10:30\n\
         Bob,42,55.50,88.00,2024-01-01 10:00\n\
         Cy,7,9.00,90.00,2024-01-02 11:00\n",
    )
    .unwrap();

    let records = CsvLedger::with_path(&path).load_all().unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Bob", "Cy"]);
}

#[test]
fn quoted_comma_is_two_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("high_scores.txt");
    fs::write(&path, "\"A,B\",1,2.00,3.00,2024-01-01 10:00\n").unwrap();

    let records = CsvLedger::with_path(&path).load_all().unwrap();
    assert!(records.is_empty());
}
