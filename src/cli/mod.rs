pub mod commands;

use std::io::Write;

use crate::ai::{ExplanationGenerator, GeneratorFactory};
use crate::cli::commands::{Commands, ConversationAction};
use crate::config::AppConfig;
use crate::store::{self, ConversationWithExplanation, NewConversation, NewExplanation, Storage};

pub async fn run_cli(command: Commands, config_path: String) {
    let config = AppConfig::load(&config_path).expect("Failed to load config");

    match command {
        Commands::Serve => {
            panic!("Serve command should be intercepted by main.rs to boot actix-web");
        }
        Commands::Ask { question } => {
            let store = store::from_config(&config).expect("Storage error");
            let generator = GeneratorFactory::create_default(&config)
                .expect("Failed to initialize explanation generator from config");

            ask(&*store, &*generator, &question).await;
        }
        Commands::Conversation { action } => {
            let store = store::from_config(&config).expect("Storage error");

            match action {
                ConversationAction::List => match store.list_conversations().await {
                    Ok(conversations) => {
                        if conversations.is_empty() {
                            println!("No conversations found.");
                        } else {
                            println!(
                                "{:<38} | {:<20} | {:<16} | {}",
                                "ID", "Created At", "Topic", "Question"
                            );
                            println!("{:-<38}-+-{:-<20}-+-{:-<16}-+-{:-<30}", "", "", "", "");
                            for record in conversations {
                                let c = &record.conversation;
                                println!(
                                    "{:<38} | {:<20} | {:<16} | {}",
                                    c.id.to_string(),
                                    c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                                    c.topic.as_deref().unwrap_or("-"),
                                    c.question
                                );
                            }
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                },
                ConversationAction::Show { id } => match store.get_conversation(id).await {
                    Ok(Some(record)) => print!("{}", transcript(&record)),
                    Ok(None) => eprintln!("Conversation {} not found.", id),
                    Err(e) => eprintln!("Error: {}", e),
                },
                ConversationAction::Delete { id } => match store.delete_conversation(id).await {
                    Ok(()) => println!("Deleted conversation {}", id),
                    Err(e) => eprintln!("Error: {}", e),
                },
                ConversationAction::Export { id, path } => {
                    let record = match store.get_conversation(id).await {
                        Ok(Some(record)) => record,
                        _ => {
                            eprintln!("Conversation {} not found.", id);
                            return;
                        }
                    };

                    let export_path = path.unwrap_or_else(|| format!("conversation_{}.txt", id));
                    let mut file =
                        std::fs::File::create(&export_path).expect("Failed to create file");
                    file.write_all(transcript(&record).as_bytes())
                        .expect("Failed to write file");

                    println!("Conversation exported successfully to: {}", export_path);
                }
            }
        }
    }
}

async fn ask(store: &dyn Storage, generator: &dyn ExplanationGenerator, question: &str) {
    let question = question.trim();
    if question.is_empty() {
        eprintln!("Question cannot be empty.");
        return;
    }

    let generated = match generator.generate(question).await {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let conversation = match store
        .create_conversation(NewConversation {
            question: question.to_string(),
            topic: Some(generated.topic.clone()),
        })
        .await
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let record = match store
        .create_explanation(NewExplanation {
            conversation_id: conversation.id,
            definition: generated.definition,
            explanation: generated.explanation,
            code_example: generated.code_example,
            summary: generated.summary,
        })
        .await
    {
        Ok(explanation) => ConversationWithExplanation {
            conversation,
            explanation: Some(explanation),
        },
        Err(e) => {
            let _ = store.delete_conversation(conversation.id).await;
            eprintln!("Error: {}", e);
            return;
        }
    };

    print!("{}", transcript(&record));
}

fn transcript(record: &ConversationWithExplanation) -> String {
    let c = &record.conversation;

    let mut out = String::new();
    out.push_str(&format!("Question: {}\n", c.question));
    out.push_str(&format!("Topic: {}\n", c.topic.as_deref().unwrap_or("-")));
    out.push_str(&format!("ID: {}\n", c.id));
    out.push_str(&format!("Created At: {}\n", c.created_at));
    out.push_str("---\n");

    match &record.explanation {
        Some(e) => {
            if let Some(definition) = &e.definition {
                out.push_str(&format!("[DEFINITION]\n{}\n---\n", definition));
            }
            out.push_str(&format!("[EXPLANATION]\n{}\n---\n", e.explanation));
            if let Some(code) = &e.code_example {
                out.push_str(&format!("[CODE EXAMPLE]\n{}\n---\n", code));
            }
            if let Some(summary) = &e.summary {
                out.push_str(&format!("[SUMMARY]\n{}\n---\n", summary));
            }
        }
        None => out.push_str("(no explanation recorded)\n"),
    }

    out
}
