//! Template compiler for line format strings
//!
//! A format string such as `"Temp: ${temp}, Hum: ${humidity}"` describes the
//! shape of one line of incoming text. Each `${name}` placeholder marks a spot
//! where a numeric value appears; all literal text around the placeholders
//! must match exactly.
//!
//! [`Template::compile`] turns such a string into a [`regex::Regex`] matcher
//! with one named capture group per placeholder. Literal text is escaped, so
//! regex metacharacters typed by the user are matched verbatim.
//!
//! Matching is anchored at the start of the line, mirroring how devices
//! usually emit fixed-prefix telemetry lines.

use crate::error::{PlotterError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Pattern for one `${identifier}` placeholder in a format string.
const PLACEHOLDER_PATTERN: &str = r"\$\{(\w+)\}";

/// Pattern a placeholder's capture slot matches: an optionally signed decimal
/// number with at most one decimal point.
const NUMBER_SLOT: &str = r"-?\d*\.?\d+";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("static pattern"))
}

/// Outcome of matching one line against a compiled template
#[derive(Debug)]
pub enum MatchOutcome {
    /// The line does not have the template's shape. Not an error; the caller
    /// records a gap so the time axis stays aligned.
    NoMatch,
    /// The line matched and every placeholder parsed; values are in
    /// placeholder order.
    Values(Vec<f64>),
    /// The line matched but a captured slot failed numeric parsing. No
    /// partial values are reported.
    Invalid(PlotterError),
}

/// A compiled line template: ordered placeholder names plus the matcher
/// derived from the format string.
///
/// Immutable once compiled; a format change requires recompilation.
#[derive(Debug, Clone)]
pub struct Template {
    placeholders: Vec<String>,
    matcher: Regex,
}

impl Template {
    /// Compile a format string into a template.
    ///
    /// Fails with [`PlotterError::EmptyTemplate`] when the string contains no
    /// `${name}` placeholders, and with [`PlotterError::InvalidTemplate`] when
    /// a placeholder name repeats or the assembled pattern does not compile.
    pub fn compile(format: &str) -> Result<Self> {
        let placeholder_re = placeholder_regex();

        let mut placeholders = Vec::new();
        let mut seen = HashSet::new();
        // Anchored at the line start, like the telemetry lines it describes.
        let mut pattern = String::from("^");
        let mut literal_start = 0;

        for caps in placeholder_re.captures_iter(format) {
            let whole = caps.get(0).ok_or_else(|| {
                PlotterError::InvalidTemplate("placeholder match without span".into())
            })?;
            let name = &caps[1];

            if !seen.insert(name.to_string()) {
                return Err(PlotterError::InvalidTemplate(format!(
                    "duplicate placeholder `{name}`"
                )));
            }

            pattern.push_str(&regex::escape(&format[literal_start..whole.start()]));
            pattern.push_str(&format!("(?P<{name}>{NUMBER_SLOT})"));
            literal_start = whole.end();
            placeholders.push(name.to_string());
        }

        if placeholders.is_empty() {
            return Err(PlotterError::EmptyTemplate);
        }
        pattern.push_str(&regex::escape(&format[literal_start..]));

        let matcher = Regex::new(&pattern)
            .map_err(|e| PlotterError::InvalidTemplate(e.to_string()))?;

        Ok(Self {
            placeholders,
            matcher,
        })
    }

    /// The placeholder names in left-to-right template order.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Match one line against the template.
    ///
    /// Value parsing is atomic per line: either every placeholder yields a
    /// number, or the whole line is reported as invalid.
    pub fn match_line(&self, line: &str) -> MatchOutcome {
        let Some(caps) = self.matcher.captures(line) else {
            return MatchOutcome::NoMatch;
        };

        let mut values = Vec::with_capacity(self.placeholders.len());
        for name in &self.placeholders {
            let Some(group) = caps.name(name) else {
                return MatchOutcome::Invalid(PlotterError::ValueParse {
                    name: name.clone(),
                    text: String::new(),
                });
            };
            match group.as_str().parse::<f64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    return MatchOutcome::Invalid(PlotterError::ValueParse {
                        name: name.clone(),
                        text: group.as_str().to_string(),
                    });
                }
            }
        }

        MatchOutcome::Values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_match() {
        let template = Template::compile("Temp: ${temp}, Hum: ${humidity}").unwrap();
        assert_eq!(template.placeholders(), ["temp", "humidity"]);

        match template.match_line("Temp: 23.50, Hum: 61.10") {
            MatchOutcome::Values(values) => assert_eq!(values, vec![23.50, 61.10]),
            other => panic!("expected values, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match_on_garbage() {
        let template = Template::compile("Temp: ${temp}").unwrap();
        assert!(matches!(
            template.match_line("garbage"),
            MatchOutcome::NoMatch
        ));
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let template = Template::compile("Temp: ${temp}").unwrap();
        assert!(matches!(
            template.match_line("xxTemp: 1.0"),
            MatchOutcome::NoMatch
        ));
    }

    #[test]
    fn test_empty_template_rejected() {
        assert!(matches!(
            Template::compile("no placeholders here"),
            Err(PlotterError::EmptyTemplate)
        ));
        assert!(matches!(
            Template::compile(""),
            Err(PlotterError::EmptyTemplate)
        ));
    }

    #[test]
    fn test_duplicate_placeholder_rejected() {
        match Template::compile("${a} ${a}") {
            Err(PlotterError::InvalidTemplate(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("expected invalid template, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_metacharacters_escaped() {
        let template = Template::compile("V(+): ${v} [mV]").unwrap();
        match template.match_line("V(+): -3.3 [mV]") {
            MatchOutcome::Values(values) => assert_eq!(values, vec![-3.3]),
            other => panic!("expected values, got {:?}", other),
        }
        // The parenthesis must not act as a group.
        assert!(matches!(
            template.match_line("V+: -3.3 mV"),
            MatchOutcome::NoMatch
        ));
    }

    #[test]
    fn test_signed_and_fractional_numbers() {
        let template = Template::compile("x=${x} y=${y}").unwrap();
        match template.match_line("x=-0.5 y=.25") {
            MatchOutcome::Values(values) => assert_eq!(values, vec![-0.5, 0.25]),
            other => panic!("expected values, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_value_is_atomic() {
        // A hand-built template with the legacy permissive slot class can
        // capture text like "1.2.3" that is not a number. The outcome must
        // carry no partial values.
        let template = Template {
            placeholders: vec!["a".to_string(), "b".to_string()],
            matcher: Regex::new(r"^a=(?P<a>[-\d.]+) b=(?P<b>[-\d.]+)").unwrap(),
        };
        match template.match_line("a=1.0 b=1.2.3") {
            MatchOutcome::Invalid(PlotterError::ValueParse { name, text }) => {
                assert_eq!(name, "b");
                assert_eq!(text, "1.2.3");
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }
}
