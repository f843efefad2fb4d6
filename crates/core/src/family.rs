//! Job family taxonomy shared by the scheduler, engine, and history queries.
//!
//! Each autonomous job belongs to exactly one family. History rows are
//! tagged `"{family}-{kind}"` (e.g. `"maintenance-scheduled"`,
//! `"actor-generation-manual"`) so operators can audit scheduled and
//! manual runs separately while filtering on a family prefix.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Family tags
// ---------------------------------------------------------------------------

/// Family tag for per-actor SMART playlist generation.
pub const FAMILY_GENERATION: &str = "actor-generation";
/// Family tag for the orphaned-item maintenance sweep.
pub const FAMILY_MAINTENANCE: &str = "maintenance";
/// Family tag for the SMART playlist refresh pass.
pub const FAMILY_REFRESH: &str = "smart-refresh";
/// Family tag for snapshot backup and rotation.
pub const FAMILY_BACKUP: &str = "backup";

// ---------------------------------------------------------------------------
// JobFamily
// ---------------------------------------------------------------------------

/// One timer-owning job family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobFamily {
    Generation,
    Maintenance,
    Refresh,
    Backup,
}

/// All families, in scheduler registration order.
pub const ALL_FAMILIES: &[JobFamily] = &[
    JobFamily::Generation,
    JobFamily::Maintenance,
    JobFamily::Refresh,
    JobFamily::Backup,
];

impl JobFamily {
    /// The family tag used in settings keys and history rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generation => FAMILY_GENERATION,
            Self::Maintenance => FAMILY_MAINTENANCE,
            Self::Refresh => FAMILY_REFRESH,
            Self::Backup => FAMILY_BACKUP,
        }
    }

    /// Parse from a family tag, returning an error for unknown families.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            FAMILY_GENERATION => Ok(Self::Generation),
            FAMILY_MAINTENANCE => Ok(Self::Maintenance),
            FAMILY_REFRESH => Ok(Self::Refresh),
            FAMILY_BACKUP => Ok(Self::Backup),
            other => Err(CoreError::Validation(format!(
                "Unknown job family: '{other}'"
            ))),
        }
    }

    /// Settings key for the family's enabled flag.
    pub fn enabled_key(&self) -> String {
        format!("{}.enabled", self.as_str())
    }

    /// Settings key for the family's trigger hour (0-23, UTC).
    pub fn hour_key(&self) -> String {
        format!("{}.hour", self.as_str())
    }

    /// Settings key for the family's interval (`daily` | `hourly` | `weekly`).
    pub fn interval_key(&self) -> String {
        format!("{}.interval", self.as_str())
    }

    /// Settings key for the family's weekday (weekly interval only).
    pub fn weekday_key(&self) -> String {
        format!("{}.weekday", self.as_str())
    }

    /// Documented default trigger hour (UTC) for daily runs.
    pub fn default_hour(&self) -> u32 {
        match self {
            Self::Generation => 4,
            Self::Maintenance => 3,
            Self::Refresh => 3,
            Self::Backup => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// RunKind
// ---------------------------------------------------------------------------

/// Whether a run was fired by a timer or requested by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Manual,
    Scheduled,
}

impl RunKind {
    /// Suffix appended to the family tag in history rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
        }
    }
}

/// History tag for one run: `"{family}-{kind}"`.
pub fn history_tag(family: JobFamily, kind: RunKind) -> String {
    format!("{}-{}", family.as_str(), kind.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_round_trips_through_str() {
        for family in ALL_FAMILIES {
            assert_eq!(JobFamily::from_str(family.as_str()).unwrap(), *family);
        }
    }

    #[test]
    fn unknown_family_rejected() {
        assert!(JobFamily::from_str("nonsense").is_err());
        assert!(JobFamily::from_str("").is_err());
    }

    #[test]
    fn history_tags_match_audit_convention() {
        assert_eq!(
            history_tag(JobFamily::Maintenance, RunKind::Scheduled),
            "maintenance-scheduled"
        );
        assert_eq!(
            history_tag(JobFamily::Generation, RunKind::Manual),
            "actor-generation-manual"
        );
    }

    #[test]
    fn settings_keys_are_family_prefixed() {
        assert_eq!(JobFamily::Backup.enabled_key(), "backup.enabled");
        assert_eq!(JobFamily::Refresh.hour_key(), "smart-refresh.hour");
        assert_eq!(JobFamily::Refresh.interval_key(), "smart-refresh.interval");
        assert_eq!(JobFamily::Refresh.weekday_key(), "smart-refresh.weekday");
    }

    #[test]
    fn default_hours_are_documented_values() {
        assert_eq!(JobFamily::Maintenance.default_hour(), 3);
        assert_eq!(JobFamily::Generation.default_hour(), 4);
        assert_eq!(JobFamily::Refresh.default_hour(), 3);
        assert_eq!(JobFamily::Backup.default_hour(), 2);
    }
}
