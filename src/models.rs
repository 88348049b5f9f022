use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque subject string, sent verbatim to the question service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title-cases hyphen separated words for headings, e.g. `calc-ab` -> `Calc Ab`.
    pub fn display_name(&self) -> String {
        self.0
            .split('-')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamTrack {
    Ap,
    Sat,
    Act,
    StudyAnything,
}

impl ExamTrack {
    pub const ALL: [ExamTrack; 4] = [
        ExamTrack::Ap,
        ExamTrack::Sat,
        ExamTrack::Act,
        ExamTrack::StudyAnything,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExamTrack::Ap => "AP Exams",
            ExamTrack::Sat => "SAT",
            ExamTrack::Act => "ACT",
            ExamTrack::StudyAnything => "Study Anything",
        }
    }

    /// AP subjects go through the type-select step, the others start right away.
    pub fn has_type_select(&self) -> bool {
        matches!(self, ExamTrack::Ap)
    }

    /// Builds the subject sent to the API from a catalog entry name.
    pub fn subject_for(&self, name: &str) -> Subject {
        match self {
            ExamTrack::Sat => Subject::new(format!("SAT {}", name)),
            ExamTrack::Act => Subject::new(format!("ACT {}", name)),
            ExamTrack::Ap | ExamTrack::StudyAnything => Subject::new(name.trim()),
        }
    }

    /// Recovers the track a subject was created for.
    pub fn of_subject(subject: &Subject) -> ExamTrack {
        let s = subject.as_str();
        if s.starts_with("SAT ") {
            ExamTrack::Sat
        } else if s.starts_with("ACT ") {
            ExamTrack::Act
        } else if s.starts_with("AP ") {
            ExamTrack::Ap
        } else {
            ExamTrack::StudyAnything
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    FreeResponse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::FreeResponse => "free-response",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::FreeResponse => "Free Response",
        }
    }

    pub fn toggled(&self) -> QuestionType {
        match self {
            QuestionType::MultipleChoice => QuestionType::FreeResponse,
            QuestionType::FreeResponse => QuestionType::MultipleChoice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Multiple choice text with the answer markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub display_text: String,
    pub correct_letter: OptionLetter,
}

/// Scores come back either as numbers or as strings such as "N/A".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Number(f64),
    Text(String),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Number(n) if n.fract() == 0.0 => write!(f, "{:.0}", n),
            Score::Number(n) => write!(f, "{}", n),
            Score::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Score {
    fn from(s: &str) -> Self {
        Score::Text(s.to_string())
    }
}

/// Free response grading returned by the evaluation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub feedback: String,
    pub score: Score,
    pub max_score: Score,
    #[serde(default)]
    pub score_explanation: String,
}

impl EvaluationResult {
    /// Stand-in shown when the evaluation endpoint cannot be reached.
    pub fn fallback() -> Self {
        Self {
            feedback: "An error occurred while evaluating your response. Please try again."
                .to_string(),
            score: Score::from("N/A"),
            max_score: Score::from("9"),
            score_explanation: "Could not evaluate due to an error.".to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.score == Score::from("N/A")
    }
}

/// One completed attempt, written once to the history sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryRecord {
    #[serde(rename = "MCQ")]
    MultipleChoice {
        subject: Subject,
        prompt: String,
        chosen: OptionLetter,
        correct: OptionLetter,
        #[serde(rename = "match")]
        is_match: bool,
    },
    #[serde(rename = "FRQ")]
    FreeResponse {
        subject: Subject,
        prompt: String,
        response: String,
        feedback: String,
        score: Score,
    },
}

impl HistoryRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            HistoryRecord::MultipleChoice { .. } => "MCQ",
            HistoryRecord::FreeResponse { .. } => "FRQ",
        }
    }

    pub fn subject(&self) -> &Subject {
        match self {
            HistoryRecord::MultipleChoice { subject, .. }
            | HistoryRecord::FreeResponse { subject, .. } => subject,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            HistoryRecord::MultipleChoice { prompt, .. }
            | HistoryRecord::FreeResponse { prompt, .. } => prompt,
        }
    }
}
