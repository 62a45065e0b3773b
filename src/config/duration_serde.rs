//! Serde helpers for human-readable durations in configuration.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::{fmt, time::Duration};

/// Custom serde functions for Duration that support human-readable strings
pub mod duration {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration_str = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&duration_str)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a duration as seconds (number) or human-readable string (e.g., '30s', '2h', '365d')",
                )
            }

            fn visit_u64<E>(self, seconds: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Duration::from_secs(seconds))
            }

            fn visit_i64<E>(self, seconds: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(seconds)
                    .map(Duration::from_secs)
                    .map_err(|_| de::Error::custom(format!("Negative duration: {seconds}")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                humantime::parse_duration(value)
                    .map_err(|e| de::Error::custom(format!("Invalid duration '{value}': {e}")))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

/// Optional variant of [`duration`]; an absent key means "no value"
pub mod option_duration {
    use super::*;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => super::duration::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionDurationVisitor;

        impl<'de> Visitor<'de> for OptionDurationVisitor {
            type Value = Option<Duration>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional duration as seconds or human-readable string")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                super::duration::deserialize(deserializer).map(Some)
            }
        }

        deserializer.deserialize_option(OptionDurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "duration")]
        value: Duration,
    }

    #[test]
    fn test_parses_human_readable_and_numeric() {
        let parsed: Wrapper = toml::from_str("value = \"1h 30m\"").unwrap();
        assert_eq!(parsed.value, Duration::from_secs(5400));

        let parsed: Wrapper = toml::from_str("value = 45").unwrap();
        assert_eq!(parsed.value, Duration::from_secs(45));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(toml::from_str::<Wrapper>("value = \"soon\"").is_err());
        assert!(toml::from_str::<Wrapper>("value = -5").is_err());
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct OptionalWrapper {
        #[serde(
            default,
            with = "option_duration",
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<Duration>,
    }

    #[test]
    fn test_optional_duration_absent_or_present() {
        let parsed: OptionalWrapper = toml::from_str("").unwrap();
        assert_eq!(parsed.value, None);

        let parsed: OptionalWrapper = toml::from_str("value = \"2h\"").unwrap();
        assert_eq!(parsed.value, Some(Duration::from_secs(7200)));

        let out = toml::to_string(&OptionalWrapper::default()).unwrap();
        assert!(!out.contains("value"));
    }

    #[test]
    fn test_serializes_as_string() {
        let out = toml::to_string(&Wrapper {
            value: Duration::from_secs(86400),
        })
        .unwrap();
        assert!(out.contains("value = \"1day\""));
    }
}
