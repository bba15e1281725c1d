//! Discord message formatting helpers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Render an amount the way every user-facing message shows it
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Pack pre-rendered entries into as few messages as possible
///
/// Entries are never split across two messages; the header only goes on the
/// first one. An entry that is larger than `max_size` on its own is cut at a
/// character boundary so the message can still be delivered.
pub fn pack_entries(header: &str, entries: &[String], max_size: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = header.to_string();

    for entry in entries {
        let entry = truncate_chars(entry, max_size);
        let separator = if current.is_empty() { "" } else { "\n" };

        if current.len() + separator.len() + entry.len() > max_size && !current.is_empty() {
            messages.push(current.trim_end().to_string());
            current = entry;
        } else {
            current.push_str(separator);
            current.push_str(&entry);
        }
    }

    if !current.trim().is_empty() {
        messages.push(current.trim_end().to_string());
    }
    messages
}

fn truncate_chars(text: &str, max_size: usize) -> String {
    if text.len() <= max_size {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.len() + ch.len_utf8() > max_size {
            break;
        }
        out.push(ch);
    }
    out
}

/// Pack entries for regular message content (2000 character limit)
pub fn pack_for_message(header: &str, entries: &[String]) -> Vec<String> {
    pack_entries(header, entries, MESSAGE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(9.99), "9.99");
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(0.5), "0.50");
    }

    #[test]
    fn test_pack_entries_single_message() {
        let entries = vec!["a".to_string(), "b".to_string()];
        let messages = pack_entries("Header", &entries, 100);
        assert_eq!(messages, vec!["Header\na\nb".to_string()]);
    }

    #[test]
    fn test_pack_entries_splits_at_entry_boundary() {
        let entries = vec!["x".repeat(6), "y".repeat(6), "z".repeat(6)];
        let messages = pack_entries("H", &entries, 14);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], format!("H\n{}", "x".repeat(6)));
        assert_eq!(messages[1], format!("{}\n{}", "y".repeat(6), "z".repeat(6)));
        assert!(messages.iter().all(|m| m.len() <= 14));
    }

    #[test]
    fn test_pack_entries_truncates_oversized_entry_utf8_safe() {
        let entries = vec!["é".repeat(10)];
        let messages = pack_entries("", &entries, 5);
        assert_eq!(messages, vec!["éé".to_string()]);
    }

    #[test]
    fn test_pack_entries_empty_input() {
        assert!(pack_entries("", &[], 100).is_empty());
        assert_eq!(pack_entries("Only header", &[], 100), vec!["Only header"]);
    }
}
