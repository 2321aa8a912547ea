//! Model listing against the inference endpoint.

use std::error::Error;

use crate::api::{InferenceClient, OllamaClient};
use crate::core::settings::SettingsStore;
use crate::core::storage::FileStore;

pub async fn list_models(base_url: Option<String>) -> Result<(), Box<dyn Error>> {
    let settings_store = SettingsStore::load(Box::new(FileStore::new()));
    let base_url = base_url.unwrap_or_else(|| settings_store.settings().base_url.clone());
    let client = OllamaClient::new(&base_url);

    println!("🤖 Available Models at {}", client.base_url());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut models = client.list_models().await?;
    if models.is_empty() {
        println!("(no models installed)");
        return Ok(());
    }
    models.sort_by(|a, b| a.name.cmp(&b.name));
    for model in models {
        match model.size {
            Some(size) => {
                let gb = size as f64 / 1_000_000_000.0;
                println!("  {} ({gb:.1} GB)", model.name);
            }
            None => println!("  {}", model.name),
        }
    }
    Ok(())
}
