//! Interactive chat with the job assistant.

use crate::context::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use api_client::ChatMessage;
use session_sync::StoreWatcher;

/// Run the chat screen. The transcript lives here and is echoed in full
/// on every request; `search_history` seeds the assistant's suggestions
/// with whatever the user searched for earlier in the session.
pub async fn chat(
    ctx: &AppContext,
    search_history: Vec<String>,
    format: &OutputFormat,
) -> Result<()> {
    // Long-running screen: keep the session in sync with other
    // terminals while the user chats.
    let watcher = StoreWatcher::spawn(ctx.manager.clone());
    let mut session_rx = watcher.subscribe();

    let mut history = vec![ChatMessage::assistant(
        "Hey, I'm Jobber. Ask me for job suggestions or career help :)",
    )];
    println!("{}", history[0].content);
    println!("(empty line or 'quit' to leave)\n");

    loop {
        let line = super::prompt("you")?;
        if line.is_empty() || line == "quit" || line == "exit" {
            break;
        }

        if session_rx.has_changed().unwrap_or(false) {
            session_rx.mark_unchanged();
            announce_session_change(ctx);
        }

        history.push(ChatMessage::user(line));

        match ctx.api.chat(&history, &search_history).await {
            Ok(reply) => {
                println!("jobber: {}", reply.reply);
                if !reply.jobs.is_empty() {
                    for job in &reply.jobs {
                        println!("  -> {} at {} ({})", job.title, job.company, job.url);
                    }
                }
                history.push(ChatMessage::assistant(reply.reply));
            }
            Err(err) => {
                tracing::debug!(error = %err, "chat request failed");
                output::print_error("Sorry, I had a problem answering.", format);
            }
        }
    }

    Ok(())
}

fn announce_session_change(ctx: &AppContext) {
    match ctx.session().user() {
        Some(user) => println!("(session changed in another window: now {})", user.display_name()),
        None => println!("(session changed in another window: logged out)"),
    }
}
