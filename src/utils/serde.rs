use serde::{Deserialize, Deserializer};

/// Deserialize an optional bool from a query string, treating an empty
/// string the same as an absent parameter.
pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<bool>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "super::deserialize_optional_bool")]
        deleted: Option<bool>,
    }

    #[test]
    fn test_empty_string_deserializes_to_none() {
        let params: Params = serde_json::from_str(r#"{"deleted":""}"#).unwrap();
        assert!(params.deleted.is_none());
    }

    #[test]
    fn test_valid_values_deserialize() {
        let params: Params = serde_json::from_str(r#"{"deleted":"true"}"#).unwrap();
        assert_eq!(params.deleted, Some(true));

        let params: Params = serde_json::from_str(r#"{"deleted":"false"}"#).unwrap();
        assert_eq!(params.deleted, Some(false));
    }

    #[test]
    fn test_missing_field_deserializes_to_none() {
        let params: Params = serde_json::from_str("{}").unwrap();
        assert!(params.deleted.is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result: Result<Params, _> = serde_json::from_str(r#"{"deleted":"maybe"}"#);
        assert!(result.is_err());
    }
}
