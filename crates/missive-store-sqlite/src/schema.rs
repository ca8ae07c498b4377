//! SQL schema for the missive submission log.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version` so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Strictly append-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS submissions (
    submission_id TEXT PRIMARY KEY,
    recorded_at   TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL,
    subject       TEXT NOT NULL,
    message       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS submissions_recorded_idx ON submissions(recorded_at);
CREATE INDEX IF NOT EXISTS submissions_email_idx    ON submissions(email);

PRAGMA user_version = 1;
";
