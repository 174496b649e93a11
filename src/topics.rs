//! The closed set of category labels used to classify questions.

pub const TOPIC_CATEGORIES: [&str; 11] = [
    "Python",
    "JavaScript",
    "Data Science",
    "Machine Learning",
    "AI",
    "Math",
    "Statistics",
    "Algorithms",
    "Web Development",
    "Database",
    "General",
];

pub const DEFAULT_TOPIC: &str = "General";

pub fn is_known(label: &str) -> bool {
    TOPIC_CATEGORIES.contains(&label)
}

/// Maps an arbitrary label onto the taxonomy. Labels outside the closed
/// set collapse to the default category instead of erroring.
pub fn normalize(label: &str) -> &str {
    if is_known(label) {
        label
    } else {
        DEFAULT_TOPIC
    }
}
