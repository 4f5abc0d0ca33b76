//! Line classifier for free-text workout descriptions.
//!
//! Each line is matched against an ordered table of rules. Patterns overlap
//! ("2x30 s Dead hang" fits both the sets×reps and the sets×duration shape),
//! so the table order decides: the first rule whose extractor accepts the
//! line wins. An extractor may decline a pattern match, in which case the
//! next rule is tried.
//!
//! | # | rule               | example                      |
//! |---|--------------------|------------------------------|
//! | 1 | skip               | `Warm-up`, `# note`, `---`   |
//! | 2 | `SetsRepsName`     | `4x8 Pull-ups`, `4×8-10 Dips`|
//! | 3 | `NameSetsReps`     | `Pull-ups 4x8`               |
//! | 4 | `VerboseSetsReps`  | `Rows — 4 sets × 8 reps`     |
//! | 5 | `SetsDurationName` | `2×30 sec Dead hang`         |
//! | 6 | `NameDuration`     | `Dead hang — 30 sec`         |
//! | 7 | `SetsOfName`       | `3 sets of Push-ups`         |
//! | 8 | `BareName`         | `Face pulls`                 |

use crate::matcher::Matcher;
use crate::{LineTarget, ParsedExerciseLine, Result, RuleKind};
use regex::{Captures, Regex};

/// Spelled-out time units that turn "NxM <unit> name" into a timed line
const TIME_UNIT_WORDS: [&str; 4] = ["sec", "secs", "second", "seconds"];

/// Sets and reps assumed when a line doesn't state them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserDefaults {
    pub sets: u32,
    pub reps: u32,
}

impl Default for ParserDefaults {
    fn default() -> Self {
        Self { sets: 3, reps: 10 }
    }
}

/// Result of classifying a line, before the name is resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    pub rule: RuleKind,
    pub raw_name: String,
    pub sets: u32,
    pub target: LineTarget,
}

/// What an extractor pulls out of a pattern match
struct Extracted {
    raw_name: String,
    sets: u32,
    target: LineTarget,
}

type Extractor = fn(&Captures<'_>, &ParserDefaults) -> Option<Extracted>;

struct Rule {
    kind: RuleKind,
    pattern: Regex,
    extract: Extractor,
}

/// Ordered-rule classifier for single workout lines
pub struct LineParser {
    skip: Vec<Regex>,
    list_marker: Regex,
    rules: Vec<Rule>,
    defaults: ParserDefaults,
}

impl LineParser {
    /// Compiles the skip patterns and the rule table.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        let skip = vec![
            Regex::new(r"^(?:#|//)")?,
            Regex::new(r"(?i)^warm[\s-]?up")?,
            Regex::new(r"(?i)^cool[\s-]?down")?,
            Regex::new(r"(?i)^stretch")?,
            Regex::new(r"(?i)^rest\b")?,
            Regex::new(r"(?i)^\d+\s*min")?,
            // bare duration such as "90 sec" or "45s"
            Regex::new(r"(?i)^\d+\s*(?:sec(?:ond)?s?|s|min(?:ute)?s?)\.?$")?,
            Regex::new(r"^[-–—]+$")?,
        ];

        let rules = vec![
            Rule {
                kind: RuleKind::SetsRepsName,
                pattern: Regex::new(r"(?i)^(\d+)\s*[x×]\s*(\d+)(?:\s*[-–]\s*(\d+))?\s+(.+)$")?,
                extract: sets_reps_name,
            },
            Rule {
                kind: RuleKind::NameSetsReps,
                pattern: Regex::new(r"(?i)^(.+?)[-–—:\s]+(\d+)\s*[x×]\s*(\d+)(?:\s*[-–]\s*(\d+))?$")?,
                extract: name_sets_reps,
            },
            Rule {
                kind: RuleKind::VerboseSetsReps,
                pattern: Regex::new(
                    r"(?i)^(.+?)[-–—:\s]+(\d+)\s*sets?\s*[x×,]\s*(\d+)(?:\s*[-–]\s*(\d+))?\s*reps?\b",
                )?,
                extract: name_sets_reps,
            },
            Rule {
                kind: RuleKind::SetsDurationName,
                pattern: Regex::new(
                    r"(?i)^(\d+)\s*[x×]\s*(\d+)\s*(?:sec(?:ond)?s?|s)\.?\s+(.+)$",
                )?,
                extract: sets_duration_name,
            },
            Rule {
                kind: RuleKind::NameDuration,
                pattern: Regex::new(r"(?i)^(.+?)[-–—:\s]+(\d+)\s*(?:sec(?:ond)?s?|s)\.?$")?,
                extract: name_duration,
            },
            Rule {
                kind: RuleKind::SetsOfName,
                pattern: Regex::new(r"(?i)^(\d+)\s*sets?\s+(?:of\s+)?(.+)$")?,
                extract: sets_of_name,
            },
            Rule {
                kind: RuleKind::BareName,
                pattern: Regex::new(r"^(.{4,})$")?,
                extract: bare_name,
            },
        ];

        Ok(Self {
            skip,
            list_marker: Regex::new(r"^(?:[-*•]\s+|\d+[.)]\s+)")?,
            rules,
            defaults: ParserDefaults::default(),
        })
    }

    /// Override the sets/reps used when a line leaves them out
    pub fn with_defaults(mut self, defaults: ParserDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> ParserDefaults {
        self.defaults
    }

    /// Rule kinds in evaluation order
    pub fn rule_order(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|rule| rule.kind).collect()
    }

    /// Classify and resolve one line. `None` for skipped or empty lines.
    pub fn parse_line(&self, line: &str, matcher: &Matcher<'_>) -> Option<ParsedExerciseLine> {
        let classified = self.classify(line)?;
        let matched = matcher.resolve(&classified.raw_name);

        tracing::debug!(
            "{:?} parsed {:?} as {} ({}%)",
            classified.rule,
            classified.raw_name,
            matched.entry.canonical_name,
            matched.confidence
        );

        Some(ParsedExerciseLine {
            raw_name: classified.raw_name,
            sets: classified.sets,
            target: classified.target,
            section: None,
            matched,
            rule: classified.rule,
        })
    }

    /// Run the rule table without resolving the exercise name
    pub fn classify(&self, line: &str) -> Option<Classified> {
        let line = self.strip_list_marker(line.trim());
        if self.is_skipped(line) {
            return None;
        }

        for rule in &self.rules {
            let Some(caps) = rule.pattern.captures(line) else {
                continue;
            };
            match (rule.extract)(&caps, &self.defaults) {
                Some(extracted) => {
                    return Some(Classified {
                        rule: rule.kind,
                        raw_name: extracted.raw_name,
                        sets: extracted.sets,
                        target: extracted.target,
                    });
                }
                None => {
                    tracing::trace!("{:?} matched {:?} but declined it", rule.kind, line);
                }
            }
        }

        None
    }

    fn strip_list_marker<'a>(&self, line: &'a str) -> &'a str {
        match self.list_marker.find(line) {
            Some(marker) => line[marker.end()..].trim_start(),
            None => line,
        }
    }

    fn is_skipped(&self, line: &str) -> bool {
        line.is_empty() || self.skip.iter().any(|pattern| pattern.is_match(line))
    }
}

// ============================================================================
// Extractors
// ============================================================================

fn sets_reps_name(caps: &Captures<'_>, _: &ParserDefaults) -> Option<Extracted> {
    let raw_name = name(caps, 4)?;
    // "2x30 sec Dead hang" belongs to the timed rule
    if starts_with_time_unit(&raw_name) {
        return None;
    }
    Some(Extracted {
        raw_name,
        sets: positive(&caps[1])?,
        target: reps(&caps[2], caps.get(3).map(|m| m.as_str()))?,
    })
}

fn name_sets_reps(caps: &Captures<'_>, _: &ParserDefaults) -> Option<Extracted> {
    Some(Extracted {
        raw_name: name(caps, 1)?,
        sets: positive(&caps[2])?,
        target: reps(&caps[3], caps.get(4).map(|m| m.as_str()))?,
    })
}

fn sets_duration_name(caps: &Captures<'_>, _: &ParserDefaults) -> Option<Extracted> {
    Some(Extracted {
        raw_name: name(caps, 3)?,
        sets: positive(&caps[1])?,
        target: LineTarget::Duration {
            seconds: positive(&caps[2])?,
        },
    })
}

fn name_duration(caps: &Captures<'_>, _: &ParserDefaults) -> Option<Extracted> {
    Some(Extracted {
        raw_name: name(caps, 1)?,
        sets: 1,
        target: LineTarget::Duration {
            seconds: positive(&caps[2])?,
        },
    })
}

fn sets_of_name(caps: &Captures<'_>, defaults: &ParserDefaults) -> Option<Extracted> {
    Some(Extracted {
        raw_name: name(caps, 2)?,
        sets: positive(&caps[1])?,
        target: LineTarget::Reps {
            low: defaults.reps,
            high: None,
        },
    })
}

fn bare_name(caps: &Captures<'_>, defaults: &ParserDefaults) -> Option<Extracted> {
    let raw_name = name(caps, 1)?;
    // Section headers are handled by the caller
    if raw_name.ends_with(':') {
        return None;
    }
    Some(Extracted {
        raw_name,
        sets: defaults.sets,
        target: LineTarget::Reps {
            low: defaults.reps,
            high: None,
        },
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn name(caps: &Captures<'_>, group: usize) -> Option<String> {
    let name = caps.get(group)?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

fn reps(low: &str, high: Option<&str>) -> Option<LineTarget> {
    let low = positive(low)?;
    let high = high
        .and_then(|h| h.parse::<u32>().ok())
        .filter(|h| *h >= low);
    Some(LineTarget::Reps { low, high })
}

fn starts_with_time_unit(name: &str) -> bool {
    name.split_whitespace()
        .next()
        .map(|word| word.trim_end_matches('.').to_lowercase())
        .is_some_and(|word| TIME_UNIT_WORDS.contains(&word.as_str()))
}
