//! Opaque identifier minting for contacts, messages, and imported personas.

use chrono::Utc;

/// Mint a fresh identifier of the form `{prefix}_{millis}_{suffix}`.
///
/// The millisecond timestamp keeps ids roughly sortable by creation time; the
/// random suffix disambiguates ids minted within the same millisecond. Never
/// panics: if the system entropy source fails, the suffix degrades to zeros
/// and uniqueness still rests on the timestamp.
pub fn mint_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let mut buf = [0u8; 4];
    let _ = getrandom::fill(&mut buf);
    format!(
        "{}_{}_{:02x}{:02x}{:02x}{:02x}",
        prefix, millis, buf[0], buf[1], buf[2], buf[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_carry_the_prefix() {
        let id = mint_id("contact");
        assert!(id.starts_with("contact_"));
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn minted_ids_are_unique() {
        let a = mint_id("msg");
        let b = mint_id("msg");
        assert_ne!(a, b);
    }
}
