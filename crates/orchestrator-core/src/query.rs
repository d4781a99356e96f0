//! Chat assistant answers for the website widgets.

use llm_client::TextGenerator;
use tracing::debug;

use crate::cleanup::CleanupPlan;
use crate::error::Result;

/// Cue at the end of the public prompt. Generation APIs echo the prompt back,
/// so the public cleanup profile cuts everything up to and including it.
pub const ANSWER_MARKER: &str = "Answer (be concise and avoid repeating yourself):";

pub const PUBLIC_FALLBACK: &str = "No response found.";
pub const SECURE_FALLBACK: &str = "No answer available.";

/// Prompt for the public business assistant.
pub fn public_prompt(knowledge_base: &str, question: &str) -> String {
    format!(
        "You are a helpful AI for the VirtualAIOfficer.com.au business.\n\
         Answer succinctly and focus on the business/team offerings. Avoid repeating text \
         verbatim from the knowledge base.\n\
         If the question is irrelevant, politely say it's outside your current scope.\n\
         \n\
         Knowledge Base:\n\
         {knowledge_base}\n\
         \n\
         User's Question:\n\
         {question}\n\
         \n\
         {ANSWER_MARKER}\n"
    )
}

/// Prompt for the secure proposal assistant. Without reference documents the
/// question is sent as-is.
pub fn secure_prompt(documents: &str, question: &str) -> String {
    if documents.trim().is_empty() {
        return question.to_string();
    }
    format!("Reference documents:\n{documents}\n\nQuestion:\n{question}\n\nAnswer:")
}

/// Generate, fall back when the upstream has no text, then clean up.
/// An answer that cleans up to nothing also gets the fallback.
pub async fn answer(
    generator: &dyn TextGenerator,
    prompt: &str,
    fallback: &str,
    cleanup: &CleanupPlan,
) -> Result<String> {
    let raw = generator.generate(prompt).await?;
    let Some(raw) = raw else {
        debug!("upstream returned no generated text");
        return Ok(fallback.to_string());
    };
    let cleaned = cleanup.apply(&raw);
    if cleaned.is_empty() {
        debug!(raw_len = raw.len(), "reply empty after cleanup");
        return Ok(fallback.to_string());
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::CleanupStep;
    use crate::config::Config;
    use async_trait::async_trait;

    struct Echo(Option<String>);

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str) -> llm_client::Result<Option<String>> {
            Ok(self.0.clone().map(|suffix| format!("{prompt}{suffix}")))
        }
    }

    #[test]
    fn public_prompt_ends_with_marker() {
        let p = public_prompt("We build AI agents.", "What do you do?");
        assert!(p.contains("Knowledge Base:\nWe build AI agents.\n"));
        assert!(p.contains("User's Question:\nWhat do you do?\n"));
        assert!(p.trim_end().ends_with(ANSWER_MARKER));
    }

    #[test]
    fn secure_prompt_without_documents_is_question() {
        assert_eq!(secure_prompt("  ", "hi"), "hi");
        assert!(secure_prompt("Proposal", "hi").starts_with("Reference documents:\nProposal"));
    }

    #[tokio::test]
    async fn echoed_prompt_is_removed_by_public_cleanup() {
        let cfg = Config::default();
        let plan = CleanupPlan::compile(&cfg.query.cleanup).unwrap();
        let prompt = public_prompt("KB text", "What do you do?");
        let generator = Echo(Some(" As an AI, we build agents for small teams.".into()));

        let reply = answer(&generator, &prompt, PUBLIC_FALLBACK, &plan)
            .await
            .unwrap();
        assert_eq!(reply, "we build agents for small teams.");
    }

    #[tokio::test]
    async fn missing_text_uses_fallback() {
        let reply = answer(&Echo(None), "p", SECURE_FALLBACK, &CleanupPlan::default())
            .await
            .unwrap();
        assert_eq!(reply, SECURE_FALLBACK);
    }

    #[tokio::test]
    async fn empty_after_cleanup_uses_fallback() {
        let plan = CleanupPlan::compile(&[CleanupStep::AfterMarker {
            marker: "p".into(),
        }])
        .unwrap();
        let reply = answer(&Echo(Some("   ".into())), "p", PUBLIC_FALLBACK, &plan)
            .await
            .unwrap();
        assert_eq!(reply, PUBLIC_FALLBACK);
    }
}
