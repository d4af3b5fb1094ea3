//! Article access tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Who may see an article.
///
/// - `private`: owner only (admin surface).
/// - `public`: listed and reachable by anyone.
/// - `withLink`: reachable through its url but never listed publicly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "public")]
    Public,
    #[serde(rename = "withLink")]
    WithLink,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [
        Visibility::Private,
        Visibility::Public,
        Visibility::WithLink,
    ];

    /// Wire names of every tier the public detail endpoint may return.
    pub fn linkable_names() -> Vec<&'static str> {
        Self::ALL
            .into_iter()
            .filter(|v| v.is_linkable())
            .map(Visibility::as_str)
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
            Visibility::WithLink => "withLink",
        }
    }

    /// Reachable through the public detail endpoint.
    pub fn is_linkable(self) -> bool {
        matches!(self, Visibility::Public | Visibility::WithLink)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            "withLink" => Ok(Visibility::WithLink),
            other => Err(CoreError::Validation(format!(
                "Unknown visibility '{other}'. Expected one of: private, public, withLink"
            ))),
        }
    }
}

impl TryFrom<String> for Visibility {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
