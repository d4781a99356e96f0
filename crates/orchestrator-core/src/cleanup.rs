//! Post-processing of raw model output before it is returned to a chat
//! client. Each query profile configures its own ordered list of steps.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{OrchestratorError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CleanupStep {
    /// Keep only the text after the last occurrence of `marker`. Text without
    /// the marker is left alone. Generation APIs often echo the prompt, so
    /// this drops everything up to the answer cue.
    AfterMarker { marker: String },
    /// Remove every match of each regex.
    StripPhrases { patterns: Vec<String> },
    /// Cut to at most `max_chars` characters.
    Truncate { max_chars: usize },
    /// Keep the final blank-line-separated paragraph.
    LastParagraph,
}

#[derive(Debug, Clone)]
enum CompiledStep {
    AfterMarker(String),
    StripPhrases(Vec<Regex>),
    Truncate(usize),
    LastParagraph,
}

/// A validated, ready-to-run list of cleanup steps.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    steps: Vec<CompiledStep>,
}

impl CleanupPlan {
    pub fn compile(steps: &[CleanupStep]) -> Result<Self> {
        let steps = steps
            .iter()
            .map(|step| -> Result<CompiledStep> {
                Ok(match step {
                    CleanupStep::AfterMarker { marker } => {
                        CompiledStep::AfterMarker(marker.clone())
                    }
                    CleanupStep::StripPhrases { patterns } => CompiledStep::StripPhrases(
                        patterns
                            .iter()
                            .map(|p| {
                                Regex::new(p).map_err(|e| {
                                    OrchestratorError::InvalidConfig(format!(
                                        "bad cleanup pattern '{p}': {e}"
                                    ))
                                })
                            })
                            .collect::<Result<Vec<_>>>()?,
                    ),
                    CleanupStep::Truncate { max_chars } => CompiledStep::Truncate(*max_chars),
                    CleanupStep::LastParagraph => CompiledStep::LastParagraph,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order; the result is always trimmed.
    pub fn apply(&self, raw: &str) -> String {
        let mut text = raw.trim().to_string();
        for step in &self.steps {
            text = match step {
                CompiledStep::AfterMarker(marker) => match text.rfind(marker.as_str()) {
                    Some(idx) => text[idx + marker.len()..].to_string(),
                    None => text,
                },
                CompiledStep::StripPhrases(patterns) => patterns
                    .iter()
                    .fold(text, |acc, re| re.replace_all(&acc, "").into_owned()),
                CompiledStep::Truncate(max) => truncate_chars(&text, *max).to_string(),
                CompiledStep::LastParagraph => last_paragraph(&text).to_string(),
            };
            text = text.trim().to_string();
        }
        text
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn last_paragraph(text: &str) -> &str {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .last()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(steps: Vec<CleanupStep>) -> CleanupPlan {
        CleanupPlan::compile(&steps).unwrap()
    }

    #[test]
    fn after_marker_uses_last_occurrence() {
        let p = plan(vec![CleanupStep::AfterMarker {
            marker: "Answer:".into(),
        }]);
        assert_eq!(p.apply("Q Answer: draft Answer:  final "), "final");
        assert_eq!(p.apply("no marker here"), "no marker here");
    }

    #[test]
    fn strip_phrases_removes_all_matches() {
        let p = plan(vec![CleanupStep::StripPhrases {
            patterns: vec![r"(?i)as an ai language model,?\s*".into()],
        }]);
        assert_eq!(
            p.apply("As an AI language model, we offer audits. as an AI language model you know"),
            "we offer audits. you know"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let p = plan(vec![CleanupStep::Truncate { max_chars: 3 }]);
        assert_eq!(p.apply("héllo"), "hél");
        assert_eq!(p.apply("hi"), "hi");
    }

    #[test]
    fn last_paragraph_skips_trailing_blank_lines() {
        let p = plan(vec![CleanupStep::LastParagraph]);
        assert_eq!(p.apply("first\n\nsecond line\nstill second\n\n\n"), "second line\nstill second");
    }

    #[test]
    fn steps_run_in_order() {
        let p = plan(vec![
            CleanupStep::AfterMarker {
                marker: "A:".into(),
            },
            CleanupStep::Truncate { max_chars: 5 },
        ]);
        assert_eq!(p.apply("prompt text A: abcdefgh"), "abcde");
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let err = CleanupPlan::compile(&[CleanupStep::StripPhrases {
            patterns: vec!["(".into()],
        }])
        .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidConfig(_)));
    }

    #[test]
    fn steps_deserialize_from_yaml() {
        let yaml = "- step: after_marker\n  marker: 'Answer:'\n- step: truncate\n  max_chars: 10\n- step: last_paragraph\n";
        let steps: Vec<CleanupStep> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2], CleanupStep::LastParagraph);
    }
}
