use crate::error::{TidyError, TidyResult};
use std::{fmt, str::FromStr};
use tracing::{debug, warn};

/// The three survey questions whose answers get split out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Helpful,
    Unhelpful,
    Suggestions,
}

impl Role {
    /// Resolution order: a header is claimed by the first role whose marker
    /// it contains.
    pub const ALL: [Role; 3] = [Role::Helpful, Role::Unhelpful, Role::Suggestions];

    /// Upper-case substring looked for in the upper-cased header.
    pub fn marker(&self) -> &'static str {
        match self {
            Role::Helpful => "HELPED",
            Role::Unhelpful => "UNHELPFUL",
            Role::Suggestions => "SUGGESTIONS",
        }
    }

    /// Column name used in the split output.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Helpful => "Question1_Helpful",
            Role::Unhelpful => "Question2_Unhelpful",
            Role::Suggestions => "Question3_Suggestions",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Helpful => "Helpful",
            Role::Unhelpful => "Unhelpful",
            Role::Suggestions => "Suggestions",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when several headers carry the same marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Later headers replace earlier ones.
    #[default]
    Last,
    /// The first matching header is kept.
    First,
    /// Multiple matches are an error.
    Strict,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(TieBreak::Last),
            "first" => Ok(TieBreak::First),
            "strict" => Ok(TieBreak::Strict),
            other => Err(format!("unknown tie-break policy {other:?}")),
        }
    }
}

/// A resolved header: its position and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// One column per role, all three present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleColumns {
    columns: [ColumnRef; 3],
}

impl RoleColumns {
    pub fn get(&self, role: Role) -> &ColumnRef {
        &self.columns[role.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &ColumnRef)> + '_ {
        Role::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

/// Which role, if any, `header` belongs to.
pub fn classify(header: &str) -> Option<Role> {
    let upper = header.to_uppercase();
    Role::ALL.into_iter().find(|r| upper.contains(r.marker()))
}

/// Scan `headers` left to right and pick one column for each role,
/// settling duplicates with `tie_break`.
pub fn resolve_columns<S: AsRef<str>>(
    headers: &[S],
    tie_break: TieBreak,
) -> TidyResult<RoleColumns> {
    let mut found: [Option<ColumnRef>; 3] = [None, None, None];

    for (index, header) in headers.iter().enumerate() {
        let name = header.as_ref();
        let Some(role) = classify(name) else {
            continue;
        };
        let candidate = ColumnRef {
            index,
            name: name.to_string(),
        };
        let slot = &mut found[role.slot()];
        let prev = slot.as_ref().map(|c| c.name.clone());
        match (prev, tie_break) {
            (None, _) => {
                debug!(%role, column = name, "matched column");
                *slot = Some(candidate);
            }
            (Some(prev), TieBreak::Last) => {
                warn!(%role, kept = name, dropped = %prev, "several columns match; keeping the last");
                *slot = Some(candidate);
            }
            (Some(prev), TieBreak::First) => {
                warn!(%role, kept = %prev, dropped = name, "several columns match; keeping the first");
            }
            (Some(prev), TieBreak::Strict) => {
                return Err(TidyError::AmbiguousColumn {
                    role: role.to_string(),
                    first: prev,
                    second: name.to_string(),
                });
            }
        }
    }

    let [helpful, unhelpful, suggestions] = found;
    let missing = |role: Role| TidyError::UnresolvedColumn {
        role: role.to_string(),
        marker: role.marker(),
    };
    Ok(RoleColumns {
        columns: [
            helpful.ok_or_else(|| missing(Role::Helpful))?,
            unhelpful.ok_or_else(|| missing(Role::Unhelpful))?,
            suggestions.ok_or_else(|| missing(Role::Suggestions))?,
        ],
    })
}
