use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// The single persisted record, keyed by email address.
///
/// `confirmed_at` is an integer timestamp; `0` means unconfirmed.
/// Missing JSON fields decode to their zero values.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailEntry {
    pub email: String,
    pub confirmed_at: i64,
}

impl EmailEntry {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), confirmed_at: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmailEntry, Health};

    #[test]
    fn health_serializes_as_status_object() {
        let json = serde_json::to_value(Health { status: "ok" }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn entry_uses_camel_case_keys() {
        let entry = EmailEntry { email: "a@b.c".into(), confirmed_at: 42 };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["email"], "a@b.c");
        assert_eq!(json["confirmedAt"], 42);
    }

    #[test]
    fn missing_fields_decode_as_zero_values() {
        let entry: EmailEntry = serde_json::from_str(r#"{"email":"x@y.z"}"#).unwrap();
        assert_eq!(entry.confirmed_at, 0);

        let empty: EmailEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, EmailEntry::default());
    }
}
