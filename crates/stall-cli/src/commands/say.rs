use anyhow::{Context, Result};
use colored::Colorize;
use stall_application::build_manager;
use stall_core::config::StallConfig;

/// Sends each utterance to one session in order and prints the replies.
pub async fn run(
    config: &StallConfig,
    session: Option<String>,
    utterances: &[String],
    summary: bool,
) -> Result<()> {
    let manager = build_manager(config)
        .await
        .context("Failed to start the dialogue manager")?;
    let session_id = super::session_id(session);

    for utterance in utterances {
        let reply = manager.handle(&session_id, utterance).await;
        println!("{} {}", ">".green(), utterance.green());
        println!("{}", reply.bright_blue());
    }

    if summary {
        if let Some(order) = manager.order_summary(&session_id).await {
            println!(
                "{}",
                serde_json::to_string_pretty(&order).context("Failed to serialize the summary")?
            );
        }
    }
    Ok(())
}
