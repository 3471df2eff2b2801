/*
 * Copyright (c) 2026 The gphotos-upload Authors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::Deserialize;

// Parses counts the API encodes as decimal strings (e.g. "mediaItemsCount")
pub fn from_count_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    match Count::deserialize(deserializer)? {
        Count::Text(s) => s.parse().map_err(serde::de::Error::custom),
        Count::Number(n) => Ok(n),
    }
}
