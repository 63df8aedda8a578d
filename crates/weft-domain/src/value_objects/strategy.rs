//! Proxying strategies

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a proxy reaches the real target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyStrategy {
    /// The target itself routes matched virtual members through its
    /// interception slot; used for self-bound concrete resolutions only
    Override,
    /// A contract implementation wraps the target and relays every call
    Forwarding,
}

impl ProxyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Forwarding => "forwarding",
        }
    }
}

impl fmt::Display for ProxyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
