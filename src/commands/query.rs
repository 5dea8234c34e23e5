//! Conversation with a deployed agent.
//!
//! One session is created per invocation. In interactive mode every line read
//! from `input` is sent as a message on that session until a quit word or
//! end of input.

use crate::console::Printer;
use crate::error::{PlaytimeError, Result};
use crate::platform::{collect_text, AgentEngine, Session};
use std::io::{BufRead, Write};

const RESPONSE_TITLE: &str = "Agent Response";
const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];

pub struct QueryOptions<'a> {
    pub resource_name: &'a str,
    pub user_id: &'a str,
    /// Single message; `None` starts the interactive loop
    pub query: Option<&'a str>,
}

pub async fn execute<E, R, W>(
    engine: &E,
    options: &QueryOptions<'_>,
    input: R,
    printer: &mut Printer<W>,
) -> Result<()>
where
    E: AgentEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    printer.header("Query Deployed Agent")?;
    printer.info(&format!("Connecting to agent: {}", options.resource_name))?;

    let agent = match engine.get(options.resource_name).await {
        Ok(agent) => agent,
        Err(e) => {
            printer.error(&format!("Failed to get agent: {}", e))?;
            return Err(PlaytimeError::AgentLookup {
                resource_name: options.resource_name.to_string(),
                reason: e.to_string(),
            });
        }
    };
    tracing::debug!(agent = %agent.resource_name, "agent found");

    let session = engine
        .create_session(&agent.resource_name, options.user_id)
        .await?;
    printer.info(&format!("Session created: {}", session.id))?;
    printer.blank()?;

    match options.query {
        Some(message) => {
            let text = send(engine, &agent.resource_name, &session, message).await?;
            printer.response(&text, RESPONSE_TITLE)?;
            Ok(())
        }
        None => interactive(engine, &agent.resource_name, &session, input, printer).await,
    }
}

async fn interactive<E, R, W>(
    engine: &E,
    resource_name: &str,
    session: &Session,
    mut input: R,
    printer: &mut Printer<W>,
) -> Result<()>
where
    E: AgentEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    printer.info("Interactive mode. Type 'quit' or 'exit' to stop.")?;
    printer.blank()?;

    let mut line = String::new();
    loop {
        printer.prompt("You: ")?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            printer.blank()?;
            printer.info("Goodbye!")?;
            return Ok(());
        }

        let message = line.trim();
        if is_quit(message) {
            printer.info("Goodbye!")?;
            return Ok(());
        }
        if message.is_empty() {
            continue;
        }

        let text = send(engine, resource_name, session, message).await?;
        if !text.is_empty() {
            printer.response(&text, RESPONSE_TITLE)?;
        }
        printer.blank()?;
    }
}

async fn send<E>(engine: &E, resource_name: &str, session: &Session, message: &str) -> Result<String>
where
    E: AgentEngine + ?Sized,
{
    let stream = engine
        .stream_query(resource_name, &session.user_id, &session.id, message)
        .await?;
    collect_text(stream).await
}

fn is_quit(message: &str) -> bool {
    QUIT_WORDS.iter().any(|word| message.eq_ignore_ascii_case(word))
}
