use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum U64Input {
    String(String),
    Number(u64),
}

impl U64Input {
    fn into_u64<E: Error>(self) -> Result<u64, E> {
        match self {
            U64Input::String(raw) => raw.trim().parse::<u64>().map_err(E::custom),
            U64Input::Number(value) => Ok(value),
        }
    }
}

pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    U64Input::deserialize(deserializer)?.into_u64()
}

/// Same encoding for optional seeds; `null` and absent fields decode to `None`.
pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&value.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<U64Input>::deserialize(deserializer)?
            .map(U64Input::into_u64)
            .transpose()
    }
}
