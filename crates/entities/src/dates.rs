//! Serde helpers for optional form fields.
//!
//! Dates and references are stored as strings and an unset value is often
//! persisted as `""` rather than omitted, so both forms decode to `None`.

/// `Option<NaiveDate>` stored as `YYYY-MM-DD`.
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            // Full timestamps are accepted by keeping the date part.
            Some(s) => NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// `Option<String>` where an empty string means unset.
pub(crate) mod optional_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
