//! Fixed prompt profiles for the three pipeline steps.

use llm_client::{ChatMessage, ChatRequest, Sampling};

const ANALYZE_SYSTEM: &str = "You are an expert developer and UX designer. Provide a concise \
suggestion to improve a website based on the issue provided.";

const CODEGEN_SYSTEM: &str = "You are an expert developer. Given a suggestion to improve a \
website, generate only the code changes in a diff format (or as a code snippet) that implements \
the suggestion. Do not include any commentary; output only the code.";

const REVIEW_SYSTEM: &str = "You are an expert software engineer and code reviewer. Review the \
following code diff for potential issues, bugs, or improvements. If there are no issues, simply \
respond with 'Approved'. Otherwise, list the issues briefly. Do not include any extra commentary.";

pub fn analyze_issue(issue: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system(ANALYZE_SYSTEM),
            ChatMessage::user(format!(
                "Issue: \"{issue}\". Provide a concise suggestion:"
            )),
        ],
        sampling: Sampling {
            max_tokens: 100,
            temperature: 0.3,
            top_p: Some(1.0),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(0.0),
        },
    }
}

pub fn generate_code_diff(suggestion: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system(CODEGEN_SYSTEM),
            ChatMessage::user(format!("Suggestion: \"{suggestion}\"")),
        ],
        sampling: Sampling {
            max_tokens: 150,
            temperature: 0.2,
            ..Default::default()
        },
    }
}

/// Deterministic sampling so the same diff reviews the same way.
pub fn review_code_diff(code_diff: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::system(REVIEW_SYSTEM),
            ChatMessage::user(format!("Code Diff:\n{code_diff}\nReview:")),
        ],
        sampling: Sampling {
            max_tokens: 100,
            temperature: 0.0,
            top_p: Some(1.0),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(0.0),
        },
    }
}
