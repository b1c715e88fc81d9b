//! Shared output formatting helpers for commands

use serde::Serialize;
use serde_json::json;

use tally_core::error::Result;
use tally_core::records::format_header;
use tally_core::store::Store;

/// Print a JSON status message with optional fields
pub fn print_json_status(
    status: &str,
    message: Option<&str>,
    extra_fields: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut output = json!({ "status": status });

    if let Some(obj) = output.as_object_mut() {
        if let Some(msg) = message {
            obj.insert("message".to_string(), json!(msg));
        }
        for (key, value) in extra_fields {
            obj.insert(key.to_string(), value.clone());
        }
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Pretty-print any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_records_header(mode: &str, extra: &str) {
    println!("{}", format_header(mode, extra));
}

/// Decimal places for scores, from the store's `[output]` section
pub fn precision(store: &Store) -> usize {
    store.config().output.precision
}
