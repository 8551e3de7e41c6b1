//! Wildcard permissions.
//!
//! A permission string is a colon-delimited hierarchy of up to three parts,
//! `domain:actions:targets`. Each part is a comma-delimited set of tokens and
//! the `*` token matches anything at its level. Parts left out of the string
//! default to `*`, so `"printer:print"` is the same permission as
//! `"printer:print:*"`.
//!
//! ```
//! use warden_security::Permission;
//!
//! let granted: Permission = "printer:print,query".parse().unwrap();
//! let wanted: Permission = "printer:print:lp7200".parse().unwrap();
//! assert!(granted.implies(&wanted));
//! assert!(!wanted.implies(&granted));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Token matching anything at its level.
pub const WILDCARD_TOKEN: &str = "*";

const PART_DIVIDER: char = ':';
const SUBPART_DIVIDER: char = ',';
const MAX_PARTS: usize = 3;

/// Errors produced while parsing a wildcard permission string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionParseError {
    /// The string is empty or whitespace only.
    #[error("wildcard string cannot be empty")]
    Empty,

    /// The string consists of part dividers only (e.g. `"::"`).
    #[error("wildcard string '{0}' contains only part dividers")]
    OnlyDividers(String),

    /// One of the parts has no tokens (e.g. `"printer::lp7200"` or `"printer:,"`).
    #[error("part {index} of wildcard string '{input}' has no tokens")]
    EmptyPart { input: String, index: usize },
}

/// A hierarchical access grant: `domain : actions : targets`.
///
/// Equality is structural over the three token sets. Implication is
/// reflexive but not symmetric; see [`Permission::implies`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission {
    domain: BTreeSet<String>,
    actions: BTreeSet<String>,
    targets: BTreeSet<String>,
}

impl Permission {
    /// Parse a wildcard string, lower-casing it first.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionParseError`] if the string is empty, consists of
    /// dividers only, or contains a part without tokens.
    pub fn parse(wildcard: &str) -> Result<Self, PermissionParseError> {
        Self::parse_with(wildcard, false)
    }

    /// Parse a wildcard string, keeping token case as given.
    ///
    /// # Errors
    ///
    /// See [`Permission::parse`].
    pub fn parse_case_sensitive(wildcard: &str) -> Result<Self, PermissionParseError> {
        Self::parse_with(wildcard, true)
    }

    /// Parse a wildcard string with explicit case handling.
    ///
    /// # Errors
    ///
    /// See [`Permission::parse`].
    pub fn parse_with(wildcard: &str, case_sensitive: bool) -> Result<Self, PermissionParseError> {
        let trimmed = wildcard.trim();
        if trimmed.is_empty() {
            return Err(PermissionParseError::Empty);
        }
        if trimmed.chars().all(|c| c == PART_DIVIDER) {
            return Err(PermissionParseError::OnlyDividers(trimmed.to_owned()));
        }

        let normalized = if case_sensitive {
            trimmed.to_owned()
        } else {
            trimmed.to_lowercase()
        };

        let mut parts: Vec<BTreeSet<String>> = Vec::with_capacity(MAX_PARTS);
        for (index, part) in normalized.splitn(MAX_PARTS, PART_DIVIDER).enumerate() {
            let tokens: BTreeSet<String> = part
                .split(SUBPART_DIVIDER)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned)
                .collect();
            if tokens.is_empty() {
                return Err(PermissionParseError::EmptyPart {
                    input: trimmed.to_owned(),
                    index,
                });
            }
            parts.push(tokens);
        }

        let mut parts = parts.into_iter();
        Ok(Self {
            domain: parts.next().unwrap_or_else(wildcard_part),
            actions: parts.next().unwrap_or_else(wildcard_part),
            targets: parts.next().unwrap_or_else(wildcard_part),
        })
    }

    /// Build a permission from explicit token sets. Empty sets become `*`.
    #[must_use]
    pub fn from_parts<D, A, T>(domain: D, actions: A, targets: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            domain: collect_part(domain),
            actions: collect_part(actions),
            targets: collect_part(targets),
        }
    }

    /// The permission that implies every other permission (`"*"`).
    #[must_use]
    pub fn universal() -> Self {
        Self {
            domain: wildcard_part(),
            actions: wildcard_part(),
            targets: wildcard_part(),
        }
    }

    #[must_use]
    pub fn domain(&self) -> &BTreeSet<String> {
        &self.domain
    }

    #[must_use]
    pub fn actions(&self) -> &BTreeSet<String> {
        &self.actions
    }

    #[must_use]
    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    /// Whether every level of this permission is the wildcard.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.levels().iter().all(|part| is_wildcard(part))
    }

    /// Whether the domain part is (or contains) the wildcard.
    #[must_use]
    pub fn has_wildcard_domain(&self) -> bool {
        is_wildcard(&self.domain)
    }

    /// Whether holding `self` grants `other`.
    ///
    /// Level by level, this permission's part must either contain the
    /// wildcard or be a superset of `other`'s corresponding part.
    #[must_use]
    pub fn implies(&self, other: &Permission) -> bool {
        self.levels()
            .iter()
            .zip(other.levels())
            .all(|(mine, theirs)| is_wildcard(mine) || theirs.is_subset(mine))
    }

    fn levels(&self) -> [&BTreeSet<String>; MAX_PARTS] {
        [&self.domain, &self.actions, &self.targets]
    }
}

fn wildcard_part() -> BTreeSet<String> {
    BTreeSet::from([WILDCARD_TOKEN.to_owned()])
}

fn is_wildcard(part: &BTreeSet<String>) -> bool {
    part.contains(WILDCARD_TOKEN)
}

fn collect_part<I>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let part: BTreeSet<String> = tokens
        .into_iter()
        .map(Into::into)
        .filter(|t| !t.is_empty())
        .collect();
    if part.is_empty() {
        wildcard_part()
    } else {
        part
    }
}

impl fmt::Display for Permission {
    /// Canonical form: sorted tokens, trailing wildcard levels dropped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels = self.levels();
        let significant = levels
            .iter()
            .rposition(|part| !(part.len() == 1 && is_wildcard(part)))
            .map_or(1, |last| last + 1);

        for (index, part) in levels.iter().take(significant).enumerate() {
            if index > 0 {
                write!(f, "{PART_DIVIDER}")?;
            }
            for (n, token) in part.iter().enumerate() {
                if n > 0 {
                    write!(f, "{SUBPART_DIVIDER}")?;
                }
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Permission {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Reads the string form back verbatim. Case folding belongs to the resolver
/// that built the permission, so a stored permission keeps its tokens.
impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_case_sensitive(&raw).map_err(serde::de::Error::custom)
    }
}
