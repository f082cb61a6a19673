use serde::{Deserialize, Serialize};

use crate::{ParsePolicy, Variant};

/// Settings a [`SerialCodec`](crate::SerialCodec) is built from.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub variant: Variant,
    pub tx_sets: usize,
    pub rx_sets: usize,
    pub text: String,
    pub parse_policy: ParsePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::Int,
            tx_sets: 1,
            rx_sets: 0,
            text: String::new(),
            parse_policy: ParsePolicy::Lenient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{ "variant": "float", "rx_sets": 2 }"#).unwrap();
        assert_eq!(
            config,
            Config { variant: Variant::Float, rx_sets: 2, ..Config::default() }
        );
    }

    #[test]
    fn policy_uses_lowercase_names() {
        let config: Config = serde_json::from_str(r#"{ "parse_policy": "strict" }"#).unwrap();
        assert_eq!(config.parse_policy, ParsePolicy::Strict);
    }
}
