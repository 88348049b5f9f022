use crate::models::{ExamTrack, Subject};

const AP_SUBJECTS: &[&str] = &[
    "AP Calculus AB",
    "AP Calculus BC",
    "AP Statistics",
    "AP Biology",
    "AP Chemistry",
    "AP Physics C",
    "AP US History",
    "AP European History",
    "AP Human Geography",
    "AP Psychology",
    "AP Computer Science A",
    "AP Literature",
];

const SAT_SECTIONS: &[&str] = &[
    "English: Craft and Structure",
    "English: Information and Ideas",
    "English: Standard English Conventions",
    "English: Expression of Ideas",
    "Math: Algebra",
    "Math: Advanced & Quadratics",
    "Math: Data Analysis",
    "Math: Geometry & Trigonometry",
];

const ACT_SECTIONS: &[&str] = &[
    "English: Grammar & Usage",
    "English: Structure & Rhetorical Skills",
    "Math: Pre-Algebra & Algebra",
    "Math: Geometry & Trigonometry",
    "Reading: Fiction & Social Science",
    "Reading: Humanities & Natural Science",
    "Science: Data Representation",
    "Science: Research Summaries & Conflicting Viewpoints",
];

/// Names shown in a track's picker. Study Anything takes free text instead.
pub fn entries(track: ExamTrack) -> &'static [&'static str] {
    match track {
        ExamTrack::Ap => AP_SUBJECTS,
        ExamTrack::Sat => SAT_SECTIONS,
        ExamTrack::Act => ACT_SECTIONS,
        ExamTrack::StudyAnything => &[],
    }
}

/// The subject sent to the API for the `index`th picker entry.
pub fn subject_at(track: ExamTrack, index: usize) -> Option<Subject> {
    entries(track)
        .get(index)
        .map(|name| track.subject_for(name))
}
