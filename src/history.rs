use crate::auth::Auth;
use crate::db;
use crate::error::HistoryError;
use crate::models::{HistoryRecord, OptionLetter};
use crate::answer_key::MARKER;
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

pub use crate::db::history::{unix_now, StoredRecord};

pub const ALL_SUBJECTS: &str = "All Subjects";
const GENERAL_TOPIC: &str = "General";

lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref LEADING_LETTER_RE: Regex = Regex::new(r"^([A-D])[.)\s]").unwrap();
}

/// Append-only per-user store of completed attempts.
pub trait HistorySink: Send + Sync {
    fn append(&self, user_id: &str, record: &HistoryRecord) -> Result<u64, HistoryError>;

    /// Every record owned by `user_id`, in no particular order.
    fn fetch(&self, user_id: &str) -> Result<Vec<StoredRecord>, HistoryError>;
}

pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl HistorySink for SqliteHistory {
    fn append(&self, user_id: &str, record: &HistoryRecord) -> Result<u64, HistoryError> {
        let conn = self.conn.lock().map_err(|_| HistoryError::Poisoned)?;
        db::history::insert_record(&conn, user_id, record)
    }

    fn fetch(&self, user_id: &str) -> Result<Vec<StoredRecord>, HistoryError> {
        let conn = self.conn.lock().map_err(|_| HistoryError::Poisoned)?;
        db::history::load_records(&conn, user_id)
    }
}

/// Process-local store, used when the database cannot be opened.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<StoredRecord>>,
}

impl HistorySink for MemoryHistory {
    fn append(&self, user_id: &str, record: &HistoryRecord) -> Result<u64, HistoryError> {
        let mut records = self.records.lock().map_err(|_| HistoryError::Poisoned)?;
        let id = records.len() as u64 + 1;
        let created_at = unix_now();
        records.push(StoredRecord {
            id,
            user_id: user_id.to_string(),
            created_at,
            record: record.clone(),
        });
        Ok(id)
    }

    fn fetch(&self, user_id: &str) -> Result<Vec<StoredRecord>, HistoryError> {
        let records = self.records.lock().map_err(|_| HistoryError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// History bound to whoever is signed in. Does nothing for anonymous users.
#[derive(Clone)]
pub struct HistoryLog {
    sink: Arc<dyn HistorySink>,
    auth: Auth,
}

impl HistoryLog {
    pub fn new(sink: Arc<dyn HistorySink>, auth: Auth) -> Self {
        Self { sink, auth }
    }

    /// Records a completed attempt. Failures are logged and swallowed.
    pub fn log(&self, record: &HistoryRecord) {
        let Some(user) = self.auth.current_user() else {
            tracing::debug!(kind = record.kind(), "not signed in, attempt not recorded");
            return;
        };

        match self.sink.append(&user.uid, record) {
            Ok(id) => tracing::info!(id, kind = record.kind(), subject = %record.subject(), "attempt recorded"),
            Err(e) => tracing::error!(error = %e, "failed to record attempt"),
        }
    }

    /// The signed-in user's records, newest first.
    pub fn load(&self) -> Result<Vec<StoredRecord>, HistoryError> {
        let Some(user) = self.auth.current_user() else {
            return Ok(Vec::new());
        };
        let mut records = self.sink.fetch(&user.uid)?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

pub fn sort_newest_first(records: &mut [StoredRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// Subject with punctuation removed, used to group history entries.
pub fn topic(subject: &str) -> String {
    let cleaned = NON_WORD_RE.replace_all(subject, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        GENERAL_TOPIC.to_string()
    } else {
        cleaned.to_string()
    }
}

/// "All Subjects" followed by each distinct topic in sorted order.
pub fn subject_filters(records: &[StoredRecord]) -> Vec<String> {
    let topics: BTreeSet<String> = records
        .iter()
        .map(|r| topic(r.record.subject().as_str()))
        .collect();
    std::iter::once(ALL_SUBJECTS.to_string())
        .chain(topics)
        .collect()
}

pub fn filter_by_topic<'a>(records: &'a [StoredRecord], filter: &str) -> Vec<&'a StoredRecord> {
    records
        .iter()
        .filter(|r| filter == ALL_SUBJECTS || topic(r.record.subject().as_str()) == filter)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLines {
    pub lines: Vec<String>,
    pub correct_index: Option<usize>,
}

impl PromptLines {
    pub fn chosen_index(&self, chosen: OptionLetter) -> Option<usize> {
        let prefix = chosen.as_char();
        self.lines.iter().position(|l| l.starts_with(prefix))
    }
}

/// Splits a stored prompt into display lines and finds the correct option's line.
pub fn prompt_lines(prompt: &str, correct: Option<OptionLetter>) -> PromptLines {
    let raw: Vec<&str> = prompt
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let marked = raw.iter().position(|l| l.contains(MARKER));
    let lines: Vec<String> = raw
        .iter()
        .map(|l| l.replace(MARKER, "").trim().to_string())
        .collect();

    let correct_index = marked.or_else(|| {
        let letter = correct?.as_char();
        lines
            .iter()
            .position(|l| {
                LEADING_LETTER_RE
                    .captures(l)
                    .and_then(|c| c[1].chars().next())
                    == Some(letter)
            })
            .or_else(|| lines.iter().position(|l| l.starts_with(letter)))
    });

    PromptLines {
        lines,
        correct_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::signed_in_auth;
    use crate::auth::{Auth, IdentityProvider, UserProfile};
    use crate::error::AuthError;
    use crate::models::{Score, Subject};

    struct NoProvider;

    impl IdentityProvider for NoProvider {
        fn sign_in(&self) -> Result<UserProfile, AuthError> {
            Err(AuthError::Unavailable("offline".to_string()))
        }
    }

    fn mcq(subject: &str) -> HistoryRecord {
        HistoryRecord::MultipleChoice {
            subject: Subject::new(subject),
            prompt: "Q\nA) 1\nB) 2".to_string(),
            chosen: OptionLetter::A,
            correct: OptionLetter::B,
            is_match: false,
        }
    }

    fn stored(id: u64, created_at: u64, subject: &str) -> StoredRecord {
        StoredRecord {
            id,
            user_id: "u1".to_string(),
            created_at,
            record: mcq(subject),
        }
    }

    #[test]
    fn test_log_and_load_for_signed_in_user() {
        let sink = Arc::new(SqliteHistory::new(db::open_in_memory()));
        let log = HistoryLog::new(sink, signed_in_auth("u1"));

        log.log(&mcq("AP Biology"));
        log.log(&HistoryRecord::FreeResponse {
            subject: Subject::new("AP Biology"),
            prompt: "Explain.".to_string(),
            response: "Because.".to_string(),
            feedback: "Ok.".to_string(),
            score: Score::Number(3.0),
        });

        let records = log.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record.kind(), "FRQ");
    }

    #[test]
    fn test_signed_out_is_a_no_op() {
        let sink = Arc::new(MemoryHistory::default());
        let auth = Auth::new(Arc::new(NoProvider));
        let log = HistoryLog::new(sink.clone(), auth);

        log.log(&mcq("AP Biology"));
        assert!(log.load().unwrap().is_empty());
        assert!(sink.fetch("").unwrap().is_empty());
    }

    #[test]
    fn test_signing_out_hides_history() {
        let auth = signed_in_auth("u1");
        let log = HistoryLog::new(Arc::new(MemoryHistory::default()), auth.clone());
        log.log(&mcq("AP Biology"));
        assert_eq!(log.load().unwrap().len(), 1);

        auth.sign_out();
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = vec![
            stored(1, 100, "a"),
            stored(2, 300, "b"),
            stored(3, 200, "c"),
            stored(4, 300, "d"),
        ];
        sort_newest_first(&mut records);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_topic() {
        assert_eq!(topic("SAT Math: Algebra"), "SAT Math Algebra");
        assert_eq!(topic("ACT Math: Geometry & Trigonometry"), "ACT Math Geometry  Trigonometry");
        assert_eq!(topic("AP Calculus AB"), "AP Calculus AB");
        assert_eq!(topic("  ?!  "), "General");
        assert_eq!(topic(""), "General");
    }

    #[test]
    fn test_subject_filters_and_filtering() {
        let records = vec![
            stored(1, 1, "SAT Math: Algebra"),
            stored(2, 2, "AP Biology"),
            stored(3, 3, "SAT Math - Algebra"),
        ];

        let filters = subject_filters(&records);
        assert_eq!(
            filters,
            vec!["All Subjects", "AP Biology", "SAT Math  Algebra", "SAT Math Algebra"]
        );

        assert_eq!(filter_by_topic(&records, ALL_SUBJECTS).len(), 3);
        let algebra = filter_by_topic(&records, "SAT Math Algebra");
        assert_eq!(algebra.len(), 1);
        assert_eq!(algebra[0].id, 1);
    }

    #[test]
    fn test_prompt_lines_with_marker() {
        let parsed = prompt_lines("What is 2+2?\n\n A) 3\n B) 4***\n", Some(OptionLetter::A));
        assert_eq!(parsed.lines, vec!["What is 2+2?", "A) 3", "B) 4"]);
        assert_eq!(parsed.correct_index, Some(2));
        assert_eq!(parsed.chosen_index(OptionLetter::A), Some(1));
    }

    #[test]
    fn test_prompt_lines_by_letter() {
        let parsed = prompt_lines("Pick one\nA. red\nB. blue\nC. green", Some(OptionLetter::C));
        assert_eq!(parsed.correct_index, Some(3));

        let parsed = prompt_lines("Pick one\nA:red\nB:blue", Some(OptionLetter::B));
        assert_eq!(parsed.correct_index, Some(2));

        let parsed = prompt_lines("Pick one\nA. red", None);
        assert_eq!(parsed.correct_index, None);
        assert_eq!(parsed.chosen_index(OptionLetter::D), None);
    }
}
