//! Whole-workout parsing.
//!
//! Splits text into lines, tracks the current section header, feeds the
//! remaining lines through the [`LineParser`] and collects low-confidence
//! warnings.

use crate::matcher::Matcher;
use crate::parser::LineParser;
use crate::{Catalog, ParsedExerciseLine, ParsedWorkout, Result};

/// Parses workout text against a borrowed catalog
pub struct WorkoutAssembler<'c> {
    parser: LineParser,
    matcher: Matcher<'c>,
}

impl<'c> WorkoutAssembler<'c> {
    /// Assembler with the default line parser
    pub fn new(catalog: &'c Catalog) -> Result<Self> {
        Ok(Self::with_parser(catalog, LineParser::new()?))
    }

    /// Assembler with a pre-configured line parser
    pub fn with_parser(catalog: &'c Catalog, parser: LineParser) -> Self {
        Self {
            parser,
            matcher: Matcher::new(catalog),
        }
    }

    pub fn matcher(&self) -> &Matcher<'c> {
        &self.matcher
    }

    /// Parse multi-line workout text into a named workout
    pub fn parse_workout(&self, text: &str, name: &str) -> ParsedWorkout {
        let mut lines = Vec::new();
        let mut warnings = Vec::new();
        let mut section: Option<String> = None;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = section_header(line) {
                tracing::debug!("Entering section {:?}", header);
                section = header;
                continue;
            }

            let Some(mut parsed) = self.parser.parse_line(line, &self.matcher) else {
                continue;
            };
            parsed.section = section.clone();

            if !parsed.matched.is_confident() {
                warnings.push(low_confidence_warning(&parsed));
            }
            lines.push(parsed);
        }

        tracing::info!(
            "Parsed workout {:?}: {} exercises, {} warnings",
            name,
            lines.len(),
            warnings.len()
        );

        ParsedWorkout {
            name: name.to_string(),
            lines,
            warnings,
        }
    }
}

/// `Some(section)` when the line is a header; the inner value is `None` for
/// headers with no text ("##", ":").
fn section_header(line: &str) -> Option<Option<String>> {
    if !(line.ends_with(':') || line.starts_with("##")) {
        return None;
    }
    let title = line.trim_end_matches(':').trim_start_matches('#').trim();
    Some((!title.is_empty()).then(|| title.to_string()))
}

fn low_confidence_warning(line: &ParsedExerciseLine) -> String {
    format!(
        "Low confidence mapping for '{}' -> '{}' ({}%)",
        line.raw_name, line.matched.entry.canonical_name, line.matched.confidence
    )
}
