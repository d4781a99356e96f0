use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pipeline artifacts
// ---------------------------------------------------------------------------

/// Improvement suggestion produced from an issue description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}

/// Code change produced from a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDiff {
    pub text: String,
}

/// Reviewer output: the raw text plus its interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    pub verdict: ReviewVerdict,
}

impl Review {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let verdict = ReviewVerdict::parse(&text);
        Self { text, verdict }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reasons", rename_all = "snake_case")]
pub enum ReviewVerdict {
    Approved,
    NeedsRevision(Vec<String>),
}

impl ReviewVerdict {
    /// Only a reply that is exactly `approved` (ASCII case-insensitive, after
    /// trimming) approves. Anything else, including `Approved.` or
    /// `Approved with nits`, needs revision.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("approved") {
            return ReviewVerdict::Approved;
        }
        let reasons = trimmed
            .lines()
            .map(strip_bullet)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        ReviewVerdict::NeedsRevision(reasons)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ReviewVerdict::Approved)
    }
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim();
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim();
        }
    }
    line
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

/// Caller-supplied options for publishing a code diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushRequest {
    pub code_diff: String,
    pub branch_name: Option<String>,
    pub commit_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub url: String,
    pub branch: String,
}

// ---------------------------------------------------------------------------
// Automation outcome
// ---------------------------------------------------------------------------

pub const MANUAL_REVIEW_MESSAGE: &str =
    "The generated code diff did not pass automated review. Please review manually.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationOutcome {
    pub suggestion: Suggestion,
    pub code_diff: CodeDiff,
    pub review: Review,
    /// Set only when the review approved and the change was published.
    pub pull_request: Option<PullRequestRef>,
}

impl AutomationOutcome {
    /// Notice for the caller when nothing was published.
    pub fn message(&self) -> Option<&'static str> {
        self.pull_request
            .is_none()
            .then_some(MANUAL_REVIEW_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_ignores_case_and_surrounding_whitespace() {
        assert!(ReviewVerdict::parse("Approved").is_approved());
        assert!(ReviewVerdict::parse("  APPROVED\n").is_approved());
        assert!(ReviewVerdict::parse("approved").is_approved());
    }

    #[test]
    fn near_misses_need_revision() {
        assert!(!ReviewVerdict::parse("Approved.").is_approved());
        assert!(!ReviewVerdict::parse("Approved with minor nits").is_approved());
        assert!(!ReviewVerdict::parse("").is_approved());
    }

    #[test]
    fn reasons_are_listed_lines_without_bullets() {
        let verdict = ReviewVerdict::parse(
            "1. Missing semicolon\n\n- Color contrast too low\n* Unused import\n2) No tests",
        );
        assert_eq!(
            verdict,
            ReviewVerdict::NeedsRevision(vec![
                "Missing semicolon".into(),
                "Color contrast too low".into(),
                "Unused import".into(),
                "No tests".into(),
            ])
        );
    }

    #[test]
    fn verdict_serializes_tagged() {
        let json = serde_json::to_value(ReviewVerdict::NeedsRevision(vec!["x".into()])).unwrap();
        assert_eq!(json["status"], "needs_revision");
        assert_eq!(json["reasons"][0], "x");
        let json = serde_json::to_value(ReviewVerdict::Approved).unwrap();
        assert_eq!(json["status"], "approved");
    }

    #[test]
    fn outcome_message_only_without_pull_request() {
        let mut outcome = AutomationOutcome {
            suggestion: Suggestion { text: "s".into() },
            code_diff: CodeDiff { text: "d".into() },
            review: Review::from_text("Approved"),
            pull_request: None,
        };
        assert_eq!(outcome.message(), Some(MANUAL_REVIEW_MESSAGE));
        outcome.pull_request = Some(PullRequestRef {
            url: "https://github.com/o/r/pull/1".into(),
            branch: "b".into(),
        });
        assert_eq!(outcome.message(), None);
    }
}
