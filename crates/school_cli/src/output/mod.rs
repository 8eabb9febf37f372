//! Output formatting functions.

pub mod pretty;

use serde::Serialize;
use serde_json::Value;

/// Formats `value` as pretty JSON with every `password` field removed.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(value)?;
    strip_passwords(&mut value);
    serde_json::to_string_pretty(&value)
}

fn strip_passwords(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("password");
            map.values_mut().for_each(strip_passwords);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_passwords),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::format_json;
    use serde_json::json;

    #[test]
    fn passwords_are_removed_at_any_depth() {
        let raw = json!({
            "password": "top",
            "users": [{ "email": "a@b.c", "password": "inner" }]
        });
        let text = format_json(&raw).unwrap();
        assert!(!text.contains("password"));
        assert!(text.contains("a@b.c"));
    }
}
