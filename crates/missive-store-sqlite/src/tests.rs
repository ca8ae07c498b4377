//! Tests for `SqliteLog` against in-memory and on-disk databases.

use chrono::{Duration, TimeZone as _, Utc};
use missive_core::{
  SubmissionInput,
  sink::{LogRecord, SubmissionLog},
};

use crate::SqliteLog;

async fn log() -> SqliteLog {
  SqliteLog::open_in_memory()
    .await
    .expect("in-memory log")
}

fn record(first_name: &str, minutes: i64) -> LogRecord {
  LogRecord {
    recorded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
      + Duration::minutes(minutes),
    input:       SubmissionInput::new(
      first_name,
      "Lee",
      "ann@example.com",
      "Hello there",
      "This is a valid message body.",
    ),
  }
}

#[tokio::test]
async fn append_then_read_back() {
  let l = log().await;
  let rec = record("Ann", 0);
  l.append(&rec).await.unwrap();

  let recent = l.recent(10).await.unwrap();
  assert_eq!(recent.len(), 1);
  assert_eq!(recent[0].1, rec);
}

#[tokio::test]
async fn recent_is_newest_first_and_limited() {
  let l = log().await;
  l.append(&record("Ann", 0)).await.unwrap();
  l.append(&record("Bob", 5)).await.unwrap();
  l.append(&record("Cat", 10)).await.unwrap();

  let names: Vec<_> = l
    .recent(2)
    .await
    .unwrap()
    .into_iter()
    .map(|(_, r)| r.input.first_name)
    .collect();
  assert_eq!(names, ["Cat", "Bob"]);
  assert_eq!(l.count().await.unwrap(), 3);
}

#[tokio::test]
async fn each_append_gets_its_own_id() {
  let l = log().await;
  let a = l.insert(&record("Ann", 0)).await.unwrap();
  let b = l.insert(&record("Ann", 0)).await.unwrap();
  assert_ne!(a, b);
  assert_eq!(l.count().await.unwrap(), 2);
}

#[tokio::test]
async fn concurrent_appends_are_all_kept() {
  let l = log().await;
  let mut handles = Vec::new();
  for i in 0..16 {
    let l = l.clone();
    handles.push(tokio::spawn(async move {
      l.append(&record("Ann", i)).await.unwrap();
    }));
  }
  for h in handles {
    h.await.unwrap();
  }
  assert_eq!(l.count().await.unwrap(), 16);
}

#[tokio::test]
async fn cyrillic_text_survives() {
  let l = log().await;
  let mut rec = record("Алёна", 0);
  rec.input.message = "Здравствуйте, у меня вопрос.".into();
  l.append(&rec).await.unwrap();
  assert_eq!(l.recent(1).await.unwrap()[0].1, rec);
}

#[tokio::test]
async fn reopening_a_file_keeps_records() {
  let path = std::env::temp_dir().join(format!(
    "missive-sqlite-{}.db",
    uuid::Uuid::new_v4()
  ));
  {
    let l = SqliteLog::open(&path).await.unwrap();
    l.append(&record("Ann", 0)).await.unwrap();
    assert!(l.target().ends_with(".db"));
  }
  let l = SqliteLog::open(&path).await.unwrap();
  assert_eq!(l.count().await.unwrap(), 1);
  let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn open_in_missing_directory_fails() {
  let path = std::env::temp_dir()
    .join(format!("missive-missing-{}", uuid::Uuid::new_v4()))
    .join("log.db");
  assert!(SqliteLog::open(&path).await.is_err());
}
