use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::{Error, Result, COLLECTION_PREFIX};

/// Which NFIP collection to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Policies,
    Claims,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Policies => "policies",
            DatasetKind::Claims => "claims",
        }
    }

    /// Name of the remote collection, which is also the key holding the rows
    /// in the response envelope.
    pub fn collection_name(&self) -> String {
        let kind = self.as_str();
        let mut name = String::with_capacity(COLLECTION_PREFIX.len() + kind.len());
        name.push_str(COLLECTION_PREFIX);
        let mut chars = kind.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        name
    }
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "policies" => Ok(DatasetKind::Policies),
            "claims" => Ok(DatasetKind::Claims),
            other => Err(Error::InvalidArgument(format!(
                "invalid dataset '{other}', pass either 'policies' or 'claims'"
            ))),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// County code used as the filter value. Passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RegionCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl TryFrom<&Value> for RegionCode {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(code) => Ok(Self(code.clone())),
            other => Err(Error::InvalidArgument(format!(
                "county code {other} must be passed as a string"
            ))),
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies the saved result of one download: `{dataset}-{region}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputKey {
    pub dataset: DatasetKind,
    pub region: RegionCode,
}

impl OutputKey {
    pub fn new(dataset: DatasetKind, region: RegionCode) -> Self {
        Self { dataset, region }
    }

    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.dataset, self.region)
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}
