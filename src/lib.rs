pub mod aggregator;
pub mod config;
pub mod decoder;
pub mod error;
pub mod handoff;
pub mod http_server;
pub mod messages;
pub mod pipeline;
pub mod pump;
pub mod render;
pub mod shutdown;
pub mod sink;
pub mod websocket;
pub mod window;

pub(crate) mod utils {
    use std::fmt::{self, Display};
    use std::str::FromStr;

    use serde::{
        de::{self, IgnoredAny, SeqAccess, Visitor},
        Deserialize, Deserializer,
    };

    pub(crate) type Millis = u64;

    pub fn deserialize_using_parse<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        <T as FromStr>::Err: Display,
    {
        String::deserialize(deserializer)?
            .parse::<T>()
            .map_err(serde::de::Error::custom)
    }

    /// A numeric field of a level entry kept as text, so that the decoder can report
    /// exactly what it was unable to parse. Exchanges usually quote numbers as JSON
    /// strings, bare JSON numbers are accepted too. Other scalars (`null`, booleans)
    /// are kept as their JSON text and fail later as a bad level.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NumericText(pub String);

    impl<'de> de::Deserialize<'de> for NumericText {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct NumericTextVisitor;

            impl<'de> Visitor<'de> for NumericTextVisitor {
                type Value = NumericText;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a number or a numeric string")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Ok(NumericText(v.to_owned()))
                }

                fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                    Ok(NumericText(v))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                    Ok(NumericText(v.to_string()))
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                    Ok(NumericText(v.to_string()))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                    Ok(NumericText(v.to_string()))
                }

                fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                    Ok(NumericText(v.to_string()))
                }

                fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                    Ok(NumericText("null".to_owned()))
                }
            }

            deserializer.deserialize_any(NumericTextVisitor)
        }
    }

    /// Target deserialization type for a single `[price, amount, ...]` entry in a list of
    /// asks or bids, having a custom Visitor which keeps the first two fields and skips
    /// any trailing ones. Missing fields are left as `None` for the decoder to report.
    #[derive(Debug, Default)]
    pub struct LevelEntry {
        pub price: Option<NumericText>,
        pub amount: Option<NumericText>,
    }

    impl<'de> de::Deserialize<'de> for LevelEntry {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct LevelEntryVisitor;

            impl<'de> Visitor<'de> for LevelEntryVisitor {
                type Value = LevelEntry;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a [price, amount, ...] sequence")
                }

                fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
                where
                    V: SeqAccess<'de>,
                {
                    let price = seq.next_element()?;
                    let amount = match price {
                        Some(_) => seq.next_element()?,
                        None => None,
                    };

                    while let Some(IgnoredAny) = seq.next_element()? {
                        // Skip all subsequent fields
                    }

                    Ok(LevelEntry { price, amount })
                }
            }

            deserializer.deserialize_seq(LevelEntryVisitor)
        }
    }

}
