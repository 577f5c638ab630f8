//! Column data types accepted in external table definitions.

use crate::error::OptionsError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const KNOWN_TYPES: &[&str] = &[
    "NUMBER",
    "DECIMAL",
    "NUMERIC",
    "INT",
    "INTEGER",
    "BIGINT",
    "SMALLINT",
    "TINYINT",
    "BYTEINT",
    "FLOAT",
    "FLOAT4",
    "FLOAT8",
    "DOUBLE",
    "DOUBLE PRECISION",
    "REAL",
    "VARCHAR",
    "CHAR",
    "CHARACTER",
    "STRING",
    "TEXT",
    "BINARY",
    "VARBINARY",
    "BOOLEAN",
    "DATE",
    "DATETIME",
    "TIME",
    "TIMESTAMP",
    "TIMESTAMP_LTZ",
    "TIMESTAMP_NTZ",
    "TIMESTAMP_TZ",
    "VARIANT",
    "OBJECT",
    "ARRAY",
    "GEOGRAPHY",
    "GEOMETRY",
];

fn type_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_ ]*?)\s*(?:\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\))?\s*$")
            .expect("static data type pattern")
    })
}

/// A validated type name with optional precision/scale or length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataType {
    name: String,
    params: Vec<u32>,
}

impl DataType {
    pub fn parse(raw: &str) -> Result<Self, OptionsError> {
        let caps = type_pattern()
            .captures(raw)
            .ok_or_else(|| OptionsError::InvalidDataType(raw.to_string()))?;
        let name = caps[1].split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        if !KNOWN_TYPES.contains(&name.as_str()) {
            return Err(OptionsError::InvalidDataType(raw.to_string()));
        }
        let mut params = Vec::new();
        for i in [2, 3] {
            if let Some(m) = caps.get(i) {
                let n = m
                    .as_str()
                    .parse()
                    .map_err(|_| OptionsError::InvalidDataType(raw.to_string()))?;
                params.push(n);
            }
        }
        Ok(DataType { name, params })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return f.write_str(&self.name);
        }
        let params: Vec<String> = self.params.iter().map(u32::to_string).collect();
        write!(f, "{}({})", self.name, params.join(", "))
    }
}
