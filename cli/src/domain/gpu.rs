//! GPU specifications accepted by Modal's `gpu=` argument.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::TemplateError;

/// Maximum number of GPUs Modal attaches to a single container.
pub const MAX_GPU_COUNT: u8 = 8;

/// GPU families Modal can schedule.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuKind {
    Any,
    T4,
    L4,
    A10G,
    A100,
    A100_80GB,
    H100,
}

impl GpuKind {
    pub const ALL: [Self; 7] = [
        Self::Any,
        Self::T4,
        Self::L4,
        Self::A10G,
        Self::A100,
        Self::A100_80GB,
        Self::H100,
    ];

    /// The identifier Modal expects in `gpu="..."`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::T4 => "T4",
            Self::L4 => "L4",
            Self::A10G => "A10G",
            Self::A100 => "A100",
            Self::A100_80GB => "A100-80GB",
            Self::H100 => "H100",
        }
    }
}

/// A GPU family plus how many of them to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GpuSpec {
    pub kind: GpuKind,
    pub count: u8,
}

impl GpuSpec {
    #[must_use]
    pub fn single(kind: GpuKind) -> Self {
        Self { kind, count: 1 }
    }
}

impl FromStr for GpuSpec {
    type Err = TemplateError;

    /// Parses `T4`, `a100-80gb`, `H100:2`. Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind_str, count_str) = match s.split_once(':') {
            Some((k, c)) => (k, Some(c)),
            None => (s, None),
        };

        let kind = GpuKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(kind_str))
            .ok_or_else(|| TemplateError::UnknownGpu(kind_str.to_string()))?;

        let count = match count_str {
            None => 1,
            Some(c) => c
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=MAX_GPU_COUNT).contains(n))
                .ok_or_else(|| TemplateError::InvalidGpuCount(c.to_string()))?,
        };

        Ok(Self { kind, count })
    }
}

impl fmt::Display for GpuSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{}:{}", self.kind.as_str(), self.count)
        } else {
            f.write_str(self.kind.as_str())
        }
    }
}

impl TryFrom<String> for GpuSpec {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GpuSpec> for String {
    fn from(value: GpuSpec) -> Self {
        value.to_string()
    }
}
