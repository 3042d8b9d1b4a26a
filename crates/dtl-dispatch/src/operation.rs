use std::fmt;

use serde::{Deserialize, Serialize};

/// Which host entry point an operation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// State-changing calls.
    Invoke,
    /// Read-only calls.
    Query,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke => write!(f, "invoke"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// A recognised ledger operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    RegisterDonator,
    RegisterReceiver,
    RegisterProject,
    Donate,
    Assign,
    TrackProject,
    TrackReceiver,
    TrackDonator,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Self::RegisterDonator,
        Self::RegisterReceiver,
        Self::RegisterProject,
        Self::Donate,
        Self::Assign,
        Self::TrackProject,
        Self::TrackReceiver,
        Self::TrackDonator,
    ];

    /// Resolve an external function name.
    ///
    /// Besides the canonical names, the spellings used by earlier
    /// deployments (`registerDonater`, `registerProfiteReceiver`, and the
    /// lowercase `track*` queries) are still accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "registerDonator" | "registerDonater" => Self::RegisterDonator,
            "registerReceiver" | "registerProfiteReceiver" => Self::RegisterReceiver,
            "registerProject" => Self::RegisterProject,
            "donate" => Self::Donate,
            "assign" => Self::Assign,
            "trackProject" | "trackproject" => Self::TrackProject,
            "trackReceiver" | "trackreceiver" => Self::TrackReceiver,
            "trackDonator" | "trackdonator" => Self::TrackDonator,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical external name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterDonator => "registerDonator",
            Self::RegisterReceiver => "registerReceiver",
            Self::RegisterProject => "registerProject",
            Self::Donate => "donate",
            Self::Assign => "assign",
            Self::TrackProject => "trackProject",
            Self::TrackReceiver => "trackReceiver",
            Self::TrackDonator => "trackDonator",
        }
    }

    /// Required number of arguments.
    pub fn arity(&self) -> usize {
        match self {
            Self::Donate | Self::Assign => 3,
            _ => 1,
        }
    }

    /// Argument names, in order, for usage messages.
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            Self::RegisterDonator | Self::TrackDonator => &["donator"],
            Self::RegisterReceiver | Self::TrackReceiver => &["receiver"],
            Self::RegisterProject | Self::TrackProject => &["project"],
            Self::Donate => &["donator", "project", "amount"],
            Self::Assign => &["project", "receiver", "amount"],
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::TrackProject | Self::TrackReceiver | Self::TrackDonator => Channel::Query,
            _ => Channel::Invoke,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
