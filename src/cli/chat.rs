//! Interactive chat loop.

use std::error::Error;
use std::io::Write as _;
use std::time::Duration;

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::OllamaClient;
use crate::core::constants::CONNECTIVITY_POLL_SECS;
use crate::core::contacts::ContactManager;
use crate::core::images::ImagePool;
use crate::core::message::ContactMessage;
use crate::core::random::SystemRandom;
use crate::core::session::{ChatSession, SendError};
use crate::core::settings::SettingsStore;
use crate::core::storage::FileStore;

fn print_bubble(name: &str, message: &ContactMessage, show_timestamps: bool) {
    let stamp = if show_timestamps {
        format!("[{}] ", message.timestamp.with_timezone(&Local).format("%H:%M"))
    } else {
        String::new()
    };
    if message.image.is_some() {
        println!("{stamp}{name}: 📷 (picture)");
    } else {
        println!("{stamp}{name}: {}", message.content);
    }
}

pub async fn run_chat(
    model: Option<String>,
    base_url: Option<String>,
    images: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let settings_store = SettingsStore::load(Box::new(FileStore::new()));
    let mut settings = settings_store.settings().clone();
    if let Some(model) = model {
        settings.model = model;
    }
    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    let custom_personas = settings_store.custom_personas();

    let mut contacts = ContactManager::new(Box::new(FileStore::new()));
    contacts.initialize_defaults();

    let pool = match images {
        Some(dir) => match ImagePool::from_dir(&dir) {
            Ok(pool) => Some(pool),
            Err(err) => {
                eprintln!("⚠️  {err}; continuing without pictures");
                None
            }
        },
        None => None,
    };

    let client = OllamaClient::new(&settings.base_url);
    println!("📡 Endpoint: {}", client.base_url());
    println!("🤖 Model: {}", settings.model);

    let show_timestamps = settings.show_timestamps;
    let mut session = ChatSession::new(
        Box::new(client),
        contacts,
        settings,
        custom_personas,
        pool,
        Box::new(SystemRandom),
    );

    if session.refresh_connectivity().await {
        println!("✅ Connected");
    } else {
        println!("❌ Endpoint unreachable; messages will fail until it comes back");
    }

    let contact_name = session
        .contacts()
        .active_contact()
        .map(|c| c.name)
        .unwrap_or_else(|| "?".to_string());
    println!("💬 Chatting with {contact_name}. Type /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(Duration::from_secs(CONNECTIVITY_POLL_SECS));
    poll.tick().await; // First tick fires immediately.

    let mut pending_image: Option<String> = None;

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = line.trim();
                if input.is_empty() && pending_image.is_none() {
                    continue;
                }
                if handle_command(input, &mut session, &mut pending_image) {
                    if input == "/quit" {
                        break;
                    }
                    continue;
                }

                match session.send_message(input, pending_image.take()).await {
                    Ok(outcome) => {
                        let name = session
                            .contacts()
                            .active_contact()
                            .map(|c| c.name)
                            .unwrap_or_else(|| "?".to_string());
                        for reply in &outcome.replies {
                            print_bubble(&name, reply, show_timestamps);
                        }
                        if outcome.filtered.is_some() {
                            println!("(reply withheld by the content filter)");
                        }
                    }
                    Err(SendError::Rejected(result)) => {
                        println!(
                            "🚫 {}",
                            result.reason.as_deref().unwrap_or("Message not allowed")
                        );
                    }
                    Err(err) => {
                        println!("⚠️  {err}");
                    }
                }
            }
            _ = poll.tick() => {
                session.refresh_connectivity().await;
            }
        }
    }

    println!("👋 Bye!");
    Ok(())
}

/// Handle slash commands. Returns true when the input was a command.
fn handle_command(
    input: &str,
    session: &mut ChatSession,
    pending_image: &mut Option<String>,
) -> bool {
    if !input.starts_with('/') {
        return false;
    }
    match input.split_whitespace().next().unwrap_or("") {
        "/quit" => {}
        "/attach" => {
            let path = input.splitn(2, char::is_whitespace).nth(1).unwrap_or("").trim();
            if path.is_empty() {
                println!("Usage: /attach <path>");
            } else {
                match crate::core::images::data_url_for_file(path) {
                    Ok(asset) => {
                        *pending_image = Some(asset.data_url);
                        println!("📎 {} will ride along with your next message", asset.file_name);
                    }
                    Err(err) => println!("⚠️  {err}"),
                }
            }
        }
        "/contacts" => {
            for summary in session.contacts().summaries() {
                let pin = if summary.pinned { "📌 " } else { "" };
                let last = summary.last_message.as_deref().unwrap_or("(no messages)");
                println!("{pin}{} {} — {last}  [{}]", summary.avatar, summary.name, summary.id);
            }
        }
        "/switch" => {
            let id = input.split_whitespace().nth(1).unwrap_or("");
            if session.contacts().get_by_id(id).is_some() {
                session.contacts_mut().set_active_contact(Some(id));
                println!("Switched.");
            } else {
                println!("Unknown contact id: {id}");
            }
        }
        "/personas" => {
            let _ = crate::cli::persona_list::list_personas();
        }
        other => {
            println!("Unknown command: {other}");
        }
    }
    true
}
