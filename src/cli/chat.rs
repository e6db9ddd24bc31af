use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::Arc;

use crate::core::AppConfig;
use crate::openai::{CompletionAdapter, OpenAiCompletion};
use crate::tutor::session::SessionBuilder;

/// An unauthenticated, unpersisted tutoring session in the terminal.
pub async fn run() -> Result<()> {
    let mut rl = DefaultEditor::new().expect("Editor failed");
    let config = AppConfig::default();

    let adapter: Arc<dyn CompletionAdapter> =
        Arc::new(OpenAiCompletion::new(config.completion_config()));
    let mut session = SessionBuilder::new(adapter)
        .seeded(&config.system_message, &config.greeting)
        .build();

    println!("{}", config.greeting);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => match session.handle_turn(&line).await {
                Ok(reply) => println!("{}", reply.content),
                Err(err) => println!("Error: {}", err),
            },
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
