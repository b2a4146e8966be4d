//! SQL schema for the Catedra SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS faculties (
    faculty_id   TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    abbreviation TEXT NOT NULL,
    created_at   TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS departments (
    department_id TEXT PRIMARY KEY,
    faculty_id    TEXT NOT NULL REFERENCES faculties(faculty_id),
    name          TEXT NOT NULL
);

-- normalized_name is the diacritic-stripped lowercase fold of name,
-- used only for duplicate detection and search.
CREATE TABLE IF NOT EXISTS subjects (
    subject_id      TEXT PRIMARY KEY,
    faculty_id      TEXT NOT NULL REFERENCES faculties(faculty_id),
    department_id   TEXT,
    name            TEXT NOT NULL,
    normalized_name TEXT NOT NULL,
    credits         INTEGER NOT NULL DEFAULT 0,
    description     TEXT,
    professor_ids   TEXT NOT NULL DEFAULT '[]',  -- JSON array of UUIDs
    UNIQUE (faculty_id, normalized_name)
);

-- rating_stats is a denormalized JSON snapshot, recomputed wholesale on
-- every rating-set change.
CREATE TABLE IF NOT EXISTS professors (
    professor_id TEXT PRIMARY KEY,
    faculty_id   TEXT NOT NULL REFERENCES faculties(faculty_id),
    name         TEXT NOT NULL,
    department   TEXT,
    subject_ids  TEXT NOT NULL DEFAULT '[]',  -- JSON array of UUIDs
    rating_stats TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

-- Ratings are immutable except for the vote arrays.
CREATE TABLE IF NOT EXISTS ratings (
    rating_id     TEXT PRIMARY KEY,
    professor_id  TEXT NOT NULL,
    subject_id    TEXT NOT NULL,
    general       REAL NOT NULL,
    explanation   REAL NOT NULL,
    accessibility REAL NOT NULL,
    difficulty    REAL NOT NULL,
    attendance    REAL NOT NULL,
    would_retake  INTEGER NOT NULL,
    comment       TEXT NOT NULL,
    likes         TEXT NOT NULL DEFAULT '[]',  -- JSON array of voter ids
    dislikes      TEXT NOT NULL DEFAULT '[]',  -- legacy, kept for compat
    created_at    TEXT NOT NULL
);

-- Reports snapshot the rating's content so the ticket survives deletion
-- of the rating through this same workflow.
CREATE TABLE IF NOT EXISTS reports (
    report_id      TEXT PRIMARY KEY,
    rating_id      TEXT,
    professor_id   TEXT,
    subject_id     TEXT NOT NULL,
    rating_comment TEXT NOT NULL,
    rating_date    TEXT NOT NULL,
    reasons        TEXT NOT NULL DEFAULT '[]',  -- JSON array of reason codes
    comment        TEXT,
    status         TEXT NOT NULL DEFAULT 'pending',  -- 'pending' | 'deleted' | 'rejected'
    reported_at    TEXT NOT NULL
);

-- Append-only; read only by the admin activity feed.
CREATE TABLE IF NOT EXISTS activity_log (
    activity_id TEXT PRIMARY KEY,
    action      TEXT NOT NULL,
    entity_kind TEXT NOT NULL,   -- 'faculty' | 'subject' | 'professor'
    entity_id   TEXT NOT NULL,
    changes     TEXT,
    timestamp   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS subjects_faculty_idx    ON subjects(faculty_id);
CREATE INDEX IF NOT EXISTS professors_faculty_idx  ON professors(faculty_id);
CREATE INDEX IF NOT EXISTS ratings_professor_idx   ON ratings(professor_id);
CREATE INDEX IF NOT EXISTS ratings_subject_idx     ON ratings(subject_id);
CREATE INDEX IF NOT EXISTS activity_timestamp_idx  ON activity_log(timestamp);

PRAGMA user_version = 1;
";
