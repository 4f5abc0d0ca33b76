//! Core domain types for liftmap.
//!
//! This module defines the records that flow through the pipeline:
//! - Catalog entries and match results
//! - Parsed exercise lines and their targets
//! - Parsed workouts with their warnings

use serde::{Deserialize, Serialize};

/// Matches at or above this score count as confident; anything lower is
/// reported as a warning.
pub const CONFIDENCE_THRESHOLD: u8 = 70;

/// Confidence reported for an exact catalog key match
pub const EXACT_CONFIDENCE: u8 = 100;

/// Category assigned to exercises the catalog doesn't know
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

// ============================================================================
// Catalog Types
// ============================================================================

/// Canonical exercise metadata stored in the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    #[serde(alias = "garmin_name")]
    pub canonical_name: String,
    #[serde(alias = "garmin_category")]
    pub category: String,
    #[serde(default)]
    pub muscles: Vec<String>,
}

impl CatalogEntry {
    /// Entry synthesized for a name the catalog couldn't resolve
    pub fn unknown(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            category: UNKNOWN_CATEGORY.into(),
            muscles: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == UNKNOWN_CATEGORY
    }
}

/// A resolved exercise name with its certainty
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub entry: CatalogEntry,
    /// 100 = exact, 70..=99 = fuzzy, 0 = unknown
    pub confidence: u8,
}

impl MatchResult {
    pub fn is_confident(&self) -> bool {
        self.confidence >= CONFIDENCE_THRESHOLD
    }
}

// ============================================================================
// Parsed Line Types
// ============================================================================

/// Which rule of the line classifier produced a record
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// "4x8 Pull-ups"
    SetsRepsName,
    /// "Pull-ups 4x8"
    NameSetsReps,
    /// "Pull-ups — 4 sets × 8 reps"
    VerboseSetsReps,
    /// "2×30 sec Dead hang"
    SetsDurationName,
    /// "Dead hang — 30 sec"
    NameDuration,
    /// "3 sets of Push-ups"
    SetsOfName,
    /// Anything else that looks like an exercise name
    BareName,
}

/// Shape of the work a line prescribes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Reps,
    Duration,
}

/// What each set of a line asks for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineTarget {
    /// Repetition count, optionally a range ("8-10")
    Reps { low: u32, high: Option<u32> },
    /// Timed hold or effort
    Duration { seconds: u32 },
}

impl LineTarget {
    pub fn kind(&self) -> LineKind {
        match self {
            LineTarget::Reps { .. } => LineKind::Reps,
            LineTarget::Duration { .. } => LineKind::Duration,
        }
    }
}

/// One exercise line after classification and name resolution
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParsedExerciseLine {
    pub raw_name: String,
    pub sets: u32,
    pub target: LineTarget,
    pub section: Option<String>,
    #[serde(rename = "match")]
    pub matched: MatchResult,
    pub rule: RuleKind,
}

impl ParsedExerciseLine {
    pub fn kind(&self) -> LineKind {
        self.target.kind()
    }

    pub fn reps_low(&self) -> Option<u32> {
        match self.target {
            LineTarget::Reps { low, .. } => Some(low),
            LineTarget::Duration { .. } => None,
        }
    }

    pub fn reps_high(&self) -> Option<u32> {
        match self.target {
            LineTarget::Reps { high, .. } => high,
            LineTarget::Duration { .. } => None,
        }
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        match self.target {
            LineTarget::Duration { seconds } => Some(seconds),
            LineTarget::Reps { .. } => None,
        }
    }

    pub fn confidence(&self) -> u8 {
        self.matched.confidence
    }

    /// Compact prescription such as "4x8", "4x8-10" or "2x30s"
    pub fn prescription(&self) -> String {
        match self.target {
            LineTarget::Reps { low, high: Some(high) } => {
                format!("{}x{}-{}", self.sets, low, high)
            }
            LineTarget::Reps { low, high: None } => format!("{}x{}", self.sets, low),
            LineTarget::Duration { seconds } => format!("{}x{}s", self.sets, seconds),
        }
    }
}

// ============================================================================
// Workout Type
// ============================================================================

/// A whole workout parsed from free text
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParsedWorkout {
    pub name: String,
    pub lines: Vec<ParsedExerciseLine>,
    pub warnings: Vec<String>,
}

impl ParsedWorkout {
    pub fn exercise_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(target: LineTarget) -> ParsedExerciseLine {
        ParsedExerciseLine {
            raw_name: "Dips".into(),
            sets: 4,
            target,
            section: None,
            matched: MatchResult {
                entry: CatalogEntry::unknown("DIPS"),
                confidence: 0,
            },
            rule: RuleKind::SetsRepsName,
        }
    }

    #[test]
    fn test_prescription_formats() {
        assert_eq!(line(LineTarget::Reps { low: 8, high: None }).prescription(), "4x8");
        assert_eq!(
            line(LineTarget::Reps { low: 8, high: Some(10) }).prescription(),
            "4x8-10"
        );
        assert_eq!(line(LineTarget::Duration { seconds: 30 }).prescription(), "4x30s");
    }

    #[test]
    fn test_target_accessors_follow_kind() {
        let reps = line(LineTarget::Reps { low: 8, high: Some(10) });
        assert_eq!(reps.kind(), LineKind::Reps);
        assert_eq!(reps.reps_low(), Some(8));
        assert_eq!(reps.reps_high(), Some(10));
        assert_eq!(reps.duration_seconds(), None);

        let timed = line(LineTarget::Duration { seconds: 45 });
        assert_eq!(timed.kind(), LineKind::Duration);
        assert_eq!(timed.reps_low(), None);
        assert_eq!(timed.duration_seconds(), Some(45));
    }

    #[test]
    fn test_legacy_entry_field_names_accepted() {
        let json = r#"{"garmin_name": "PULL_UP", "garmin_category": "PULL_UP"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.canonical_name, "PULL_UP");
        assert_eq!(entry.category, "PULL_UP");
        assert!(entry.muscles.is_empty());
    }

    #[test]
    fn test_unknown_entry() {
        let entry = CatalogEntry::unknown("DEAD_HANG");
        assert!(entry.is_unknown());
        assert!(entry.muscles.is_empty());
    }
}
