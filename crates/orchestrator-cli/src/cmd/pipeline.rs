use crate::output::print_json;
use std::path::Path;

pub fn analyze(config_path: Option<&Path>, issue: &str, json: bool) -> anyhow::Result<()> {
    let state = super::app_state(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;
    let suggestion = rt.block_on(state.orchestrator().analyze_issue(issue))?;

    if json {
        print_json(&serde_json::json!({ "suggestion": suggestion.text }))?;
    } else {
        println!("{}", suggestion.text);
    }
    Ok(())
}

pub fn automate(config_path: Option<&Path>, issue: &str, json: bool) -> anyhow::Result<()> {
    let state = super::app_state(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(state.orchestrator().automate(issue))?;

    if json {
        let mut value = serde_json::json!({
            "suggestion": outcome.suggestion.text,
            "codeDiff": outcome.code_diff.text,
            "review": outcome.review.text,
            "approved": outcome.review.verdict.is_approved(),
        });
        if let Some(message) = outcome.message() {
            value["message"] = serde_json::json!(message);
        }
        if let Some(ref pr) = outcome.pull_request {
            value["prUrl"] = serde_json::json!(pr.url);
            value["branch"] = serde_json::json!(pr.branch);
        }
        return print_json(&value);
    }

    println!("Suggestion:\n{}\n", outcome.suggestion.text);
    println!("Code diff:\n{}\n", outcome.code_diff.text);
    println!("Review:\n{}\n", outcome.review.text);
    match (&outcome.pull_request, outcome.message()) {
        (Some(pr), _) => println!("Pull request opened: {} (branch {})", pr.url, pr.branch),
        (None, Some(message)) => println!("{message}"),
        (None, None) => {}
    }
    Ok(())
}
