//! Persona listing.

use std::error::Error;

use crate::core::persona::list_all;
use crate::core::settings::SettingsStore;
use crate::core::storage::FileStore;

pub fn list_personas() -> Result<(), Box<dyn Error>> {
    let settings_store = SettingsStore::load(Box::new(FileStore::new()));
    let customs = settings_store.custom_personas();

    println!("🎭 Personas");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for persona in list_all(&customs) {
        let kind = if persona.is_custom { "custom" } else { "built-in" };
        println!("  {} — {} ({kind})", persona.id, persona.description);
        if !persona.tags.is_empty() {
            println!("      tags: {}", persona.tags.join(", "));
        }
    }
    Ok(())
}
