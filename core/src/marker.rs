use std::fmt;

pub const DEFAULT_START_MARKER: &str = "// tinybench start";
pub const DEFAULT_STOP_MARKER: &str = "// tinybench stop";

/// Marker lines that open and close a benchmark region.
///
/// A line is a marker when its trimmed content equals the marker text. The
/// start marker may additionally carry a label: `// tinybench start: for-of`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub start: String,
    pub stop: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_MARKER.to_string(),
            stop: DEFAULT_STOP_MARKER.to_string(),
        }
    }
}

impl Delimiters {
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        let start = self.start.trim();
        let stop = self.stop.trim();
        if start.is_empty() || stop.is_empty() {
            return Err(ParseError::InvalidDelimiters(
                "start and stop markers must not be blank".to_string(),
            ));
        }
        if start == stop {
            return Err(ParseError::InvalidDelimiters(format!(
                "start and stop markers must differ (both are '{start}')"
            )));
        }
        Ok(())
    }

    // Outer None: not a start marker. Inner None: start marker without a label.
    fn match_start(&self, trimmed: &str) -> Option<Option<String>> {
        let rest = trimmed.strip_prefix(self.start.trim())?;
        if rest.is_empty() {
            return Some(None);
        }
        let label = rest.strip_prefix(':')?.trim();
        if label.is_empty() {
            Some(None)
        } else {
            Some(Some(label.to_string()))
        }
    }

    fn is_stop(&self, trimmed: &str) -> bool {
        trimmed == self.stop.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    NoBenchmarks { start: String, stop: String },
    InvalidDelimiters(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoBenchmarks { start, stop } => write!(
                f,
                "No benchmarks found. Please define at least one benchmark:\n\t{start}\n\t{{{{ CODE TO BENCHMARK }}}}\n\t{stop}"
            ),
            ParseError::InvalidDelimiters(msg) => write!(f, "Invalid benchmark markers: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A delimited region of code, timed as an independent unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCase {
    /// 1-based position among the cases of the file.
    pub index: usize,
    pub label: Option<String>,
    pub body: String,
    /// 1-based line of the start marker.
    pub line: usize,
}

impl BenchCase {
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("benchmark {}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    /// Every line outside a benchmark region, in source order.
    pub prelude: String,
    pub cases: Vec<BenchCase>,
}

impl ParsedSource {
    /// Program text executed for one sample of `case`: the prelude (which
    /// builds any fixture) followed by the case body.
    pub fn script_for(&self, case: &BenchCase) -> String {
        let mut script = String::with_capacity(self.prelude.len() + case.body.len());
        script.push_str(&self.prelude);
        script.push_str(&case.body);
        script
    }
}

struct OpenRegion {
    label: Option<String>,
    line: usize,
    body: String,
}

pub fn parse_source(source: &str, delimiters: &Delimiters) -> Result<ParsedSource, ParseError> {
    delimiters.validate()?;

    let mut prelude = String::with_capacity(source.len());
    let mut cases: Vec<BenchCase> = Vec::new();
    let mut open: Option<OpenRegion> = None;

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();

        if delimiters.is_stop(trimmed) {
            match open.take() {
                Some(region) => cases.push(BenchCase {
                    index: cases.len() + 1,
                    label: region.label,
                    body: region.body,
                    line: region.line,
                }),
                None => tracing::warn!(line = line_no, "stop marker outside a benchmark region ignored"),
            }
            continue;
        }

        if let Some(label) = delimiters.match_start(trimmed) {
            if let Some(previous) = &open {
                tracing::warn!(
                    line = line_no,
                    opened_at = previous.line,
                    "start marker inside an open region; discarding partial body"
                );
            }
            open = Some(OpenRegion {
                label,
                line: line_no,
                body: String::new(),
            });
            continue;
        }

        let target = match open.as_mut() {
            Some(region) => &mut region.body,
            None => &mut prelude,
        };
        target.push_str(line);
        target.push('\n');
    }

    if let Some(region) = open {
        tracing::warn!(line = region.line, "unterminated benchmark region dropped");
    }

    if cases.is_empty() {
        return Err(ParseError::NoBenchmarks {
            start: delimiters.start.clone(),
            stop: delimiters.stop.clone(),
        });
    }

    tracing::debug!(cases = cases.len(), prelude_bytes = prelude.len(), "parsed benchmark source");
    Ok(ParsedSource { prelude, cases })
}
