// Layout heuristic for resume names.
//
// Resumes almost always open with the candidate's name on its own line,
// capitalized, before any section heading. Without an NER model we look for
// a short run of capitalized words near the top that isn't a heading or a
// job title.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::Result;

use super::traits::NameRecognizer;

/// Words that look like names by capitalization but never are on a resume.
static NON_NAME_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        // section headings
        "resume", "curriculum", "vitae", "cv", "profile", "summary", "objective",
        "experience", "education", "skills", "projects", "certifications",
        "contact", "references", "languages", "interests", "achievements",
        "work", "history", "professional", "personal", "technical",
        // contact labels
        "email", "phone", "mobile", "address", "linkedin", "github", "website",
        // job titles
        "engineer", "developer", "manager", "scientist", "analyst", "administrator",
        "consultant", "architect", "specialist", "director", "intern", "senior",
        "junior", "lead", "principal", "head", "officer", "assistant", "associate",
        "data", "database", "software", "platform", "systems", "full", "stack",
        // articles and connectives that appear capitalized in headings
        "the", "and", "of", "for", "in", "at", "with",
    ])
});

/// Heuristic name finder over the first lines of a resume.
pub struct HeuristicNameRecognizer {
    /// How many non-empty lines from the top to inspect
    pub max_lines: usize,
    /// Minimum words in a name run
    pub min_words: usize,
    /// Maximum words in a name run
    pub max_words: usize,
}

impl Default for HeuristicNameRecognizer {
    fn default() -> Self {
        Self {
            max_lines: 8,
            min_words: 2,
            max_words: 4,
        }
    }
}

impl NameRecognizer for HeuristicNameRecognizer {
    fn person_candidates(&self, text: &str) -> Result<Vec<String>> {
        let mut candidates = Vec::new();
        for line in text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(self.max_lines)
        {
            candidates.extend(self.runs_in_line(line));
        }
        Ok(candidates)
    }
}

impl HeuristicNameRecognizer {
    /// Split a line into runs of name-like words; keep runs of acceptable length.
    fn runs_in_line(&self, line: &str) -> Vec<String> {
        let mut runs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for raw in line.split_whitespace() {
            let word = raw.trim_end_matches([',', '.', ';', ':', '|']);
            let ends_run = word.len() != raw.len();

            if is_name_word(word) {
                current.push(word);
            } else {
                self.flush(&mut current, &mut runs);
            }
            if ends_run {
                self.flush(&mut current, &mut runs);
            }
        }
        self.flush(&mut current, &mut runs);
        runs
    }

    fn flush(&self, current: &mut Vec<&str>, runs: &mut Vec<String>) {
        if (self.min_words..=self.max_words).contains(&current.len()) {
            runs.push(current.join(" "));
        }
        current.clear();
    }
}

/// Capitalized, alphabetic (allowing inner `-` and `'`), and not a known
/// heading or title word.
fn is_name_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() || word.chars().count() < 2 {
        return false;
    }
    if !word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'') {
        return false;
    }
    !NON_NAME_WORDS.contains(word.to_lowercase().as_str())
}
