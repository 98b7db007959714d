use std::fmt;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use log::warn;
use serde::Serialize;
use crate::errors::TextGridError;

// @module: TextGrid parsing and dialog extraction

// @const: Tier header regex (`item [1]:`)
static TIER_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*item\s*\[\s*(\d+)\s*\]").unwrap()
});

// @const: Interval header regex (`intervals [1]:`)
static INTERVAL_HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*intervals\s*\[\s*(\d+)\s*\]").unwrap()
});

/// Structural classification of one physical line, independent of parser
/// state. The captured index is advisory only: tiers and intervals are
/// appended in arrival order, and the 1-based index Praat writes is never
/// validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// `item [n]` header opening a new tier
    TierHeader(usize),
    /// `intervals [n]` header opening a new interval
    IntervalHeader(usize),
    /// Anything else: a key/value line or ignorable noise
    Plain,
}

/// Classify one physical line. Whitespace is tolerated around the brackets
/// and the numeric index.
pub fn classify_line(line: &str) -> LineClass {
    if let Some(caps) = TIER_HEADER_REGEX.captures(line) {
        let index = caps[1].parse().unwrap_or(0);
        return LineClass::TierHeader(index);
    }
    if let Some(caps) = INTERVAL_HEADER_REGEX.captures(line) {
        let index = caps[1].parse().unwrap_or(0);
        return LineClass::IntervalHeader(index);
    }
    LineClass::Plain
}

// @struct: Single labeled time span inside a tier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interval {
    // @field: Start time in seconds
    pub xmin: f64,

    // @field: End time in seconds
    pub xmax: f64,

    // @field: Label text; empty means the interval is silent
    pub text: String,
}

impl Interval {
    /// Creates a new interval - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(xmin: f64, xmax: f64, text: String) -> Self {
        Interval { xmin, xmax, text }
    }
}

/// One tier: an ordered run of intervals, in source order (index order,
/// not necessarily time order). The source format's per-tier `class` and
/// `name` keys are not modeled; a tier is identified by its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tier {
    /// Intervals in the order they appeared in the source
    pub intervals: Vec<Interval>,
}

/// A dialog line derived from one non-empty interval. `speaker` is the
/// owning tier's 0-based position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogEntry {
    pub speaker: usize,
    pub begin: f64,
    pub end: f64,
    pub text: String,
}

impl fmt::Display for DialogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{:.3} - {:.3}] speaker {}: {}",
            self.begin, self.end, self.speaker, self.text
        )
    }
}

/// Non-fatal condition observed while parsing. Collected and returned by
/// [`parse_with_diagnostics`] so callers can assert on what was seen
/// without going through the global logger.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A parsed TextGrid document.
///
/// Write-once: a document is fully constructed by one parse call or not at
/// all, and is never mutated afterwards, so it can be shared read-only
/// across threads. The dialog projection is computed lazily on first
/// access and cached for the document's lifetime; the one-time cell
/// guarantees the scan-and-sort runs at most once even under concurrent
/// first access.
#[derive(Debug)]
pub struct TextGrid {
    xmin: f64,
    xmax: f64,
    size: usize,
    tiers: Vec<Tier>,
    dialog: OnceCell<Vec<DialogEntry>>,
}

impl TextGrid {
    /// Document start time from the file header
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// Document end time from the file header
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Declared tier count from the `size` header line. Not cross-checked
    /// against the number of tiers actually parsed.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All tiers, in the order they appeared in the source
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Indexed tier access, bounds-checked against both the declared
    /// `size` and the actually parsed tier count, so a header that
    /// overstates `size` cannot turn into a panic.
    pub fn tier(&self, index: usize) -> Result<&Tier, TextGridError> {
        if index >= self.size {
            return Err(TextGridError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        self.tiers.get(index).ok_or(TextGridError::IndexOutOfRange {
            index,
            size: self.size,
        })
    }

    /// The flattened dialog transcript: every non-empty-text interval
    /// across all tiers, tagged with its tier position as `speaker` and
    /// sorted ascending by `begin`. The sort is stable, so entries with
    /// equal begin times keep their (tier, interval) emission order.
    ///
    /// Computed once and cached; repeated calls return the same slice.
    pub fn dialog(&self) -> &[DialogEntry] {
        self.dialog.get_or_init(|| {
            let mut entries = Vec::new();
            for (speaker, tier) in self.tiers.iter().enumerate() {
                for interval in &tier.intervals {
                    if !interval.text.is_empty() {
                        entries.push(DialogEntry {
                            speaker,
                            begin: interval.xmin,
                            end: interval.xmax,
                            text: interval.text.clone(),
                        });
                    }
                }
            }
            entries.sort_by(|a, b| a.begin.total_cmp(&b.begin));
            entries
        })
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TextGrid document")?;
        writeln!(f, "Time range: {} - {}", self.xmin, self.xmax)?;
        writeln!(f, "Declared size: {}", self.size)?;
        writeln!(f, "Tiers: {}", self.tiers.len())?;
        Ok(())
    }
}

// @enum: Parsing mode
// `Tier` implies at least one tier exists; `Interval` additionally implies
// the last tier has at least one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Base,
    Tier,
    Interval,
}

/// Collects the physical lines of a quoted text value that spans lines.
///
/// The format never escapes an embedded quote differently from a closing
/// quote, so the only reliable continuation signal is "quote opened but
/// not validly closed yet": the same collapse-doubled-quotes-and-check
/// test has to run on every appended line, not just the first.
#[derive(Debug, Default)]
struct TextAccumulator {
    lines: Vec<String>,
}

impl TextAccumulator {
    fn is_active(&self) -> bool {
        !self.lines.is_empty()
    }

    fn start(&mut self, first: &str) {
        self.lines.push(first.to_string());
    }

    /// Append one raw line. Returns the assembled text if this line closes
    /// the quote, `None` if the value continues.
    fn push(&mut self, line: &str) -> Option<String> {
        self.lines.push(line.to_string());
        if line.replace("\"\"", "").trim_end().ends_with('"') {
            let joined = self.lines.join("\n");
            self.lines.clear();
            let unescaped = joined.trim().replace("\"\"", "\"");
            Some(strip_quote_surround(&unescaped).to_string())
        } else {
            None
        }
    }
}

/// Strip one pair of surrounding double quotes, if both are present.
fn strip_quote_surround(s: &str) -> &str {
    if !s.starts_with('"') || !s.ends_with('"') {
        return s;
    }
    if s.len() < 2 {
        // a lone quote counts as both the opening and the closing quote
        return "";
    }
    &s[1..s.len() - 1]
}

/// True if a `text` value opens a quoted string without validly closing
/// it on the same line.
fn opens_unterminated_quote(value: &str) -> bool {
    let collapsed = value.replace("\"\"", "");
    let collapsed = collapsed.trim();
    collapsed.starts_with('"') && !collapsed[1..].ends_with('"')
}

/// Split a key/value line on the first `=`. Lines with no `=` carry no
/// data in any state and are skipped by the caller.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value))
}

fn parse_float(value: &str, line: usize) -> Result<f64, TextGridError> {
    value.trim().parse().map_err(|_| TextGridError::MalformedDocument {
        line,
        message: format!("invalid numeric value `{}`", value.trim()),
    })
}

fn parse_int(value: &str, line: usize) -> Result<usize, TextGridError> {
    value.trim().parse().map_err(|_| TextGridError::MalformedDocument {
        line,
        message: format!("invalid integer value `{}`", value.trim()),
    })
}

/// The in-progress interval is always the last interval of the last tier;
/// positions are recomputed from the vector lengths rather than held as
/// references across pushes.
fn current_interval<'a>(
    tiers: &'a mut [Tier],
    line: usize,
) -> Result<&'a mut Interval, TextGridError> {
    tiers
        .last_mut()
        .and_then(|tier| tier.intervals.last_mut())
        .ok_or(TextGridError::MalformedDocument {
            line,
            message: "interval data outside any interval".to_string(),
        })
}

/// Parse TextGrid text into a document, forwarding non-fatal warnings to
/// the `log` facade.
pub fn parse(text: &str) -> Result<TextGrid, TextGridError> {
    let (grid, warnings) = parse_with_diagnostics(text)?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    Ok(grid)
}

/// Parse TextGrid text into a document, returning collected non-fatal
/// warnings alongside it.
///
/// Fatal conditions (invalid numeric literals, an interval header before
/// any tier header) abort the parse; no partial document is ever
/// returned. Warnings never block completion.
pub fn parse_with_diagnostics(
    text: &str,
) -> Result<(TextGrid, Vec<ParseWarning>), TextGridError> {
    let mut xmin = 0.0;
    let mut xmax = 0.0;
    let mut size = 0usize;
    let mut tiers: Vec<Tier> = Vec::new();
    let mut warnings = Vec::new();
    let mut state = ParseState::Base;
    let mut accumulator = TextAccumulator::default();

    for (n, line) in text.lines().enumerate() {
        let lineno = n + 1;

        // An open quoted value swallows every line until one closes it;
        // normal classification is suspended meanwhile.
        if accumulator.is_active() {
            if let Some(assembled) = accumulator.push(line) {
                current_interval(&mut tiers, lineno)?.text = assembled;
            }
            continue;
        }

        match classify_line(line) {
            LineClass::TierHeader(_) => {
                tiers.push(Tier::default());
                state = ParseState::Tier;
            }
            LineClass::IntervalHeader(_) => {
                let tier = tiers.last_mut().ok_or(TextGridError::MalformedDocument {
                    line: lineno,
                    message: "interval header before any tier header".to_string(),
                })?;
                tier.intervals.push(Interval::default());
                state = ParseState::Interval;
            }
            LineClass::Plain => match state {
                ParseState::Base => {
                    let Some((key, value)) = split_key_value(line) else {
                        continue;
                    };
                    match key {
                        "xmin" => xmin = parse_float(value, lineno)?,
                        "xmax" => xmax = parse_float(value, lineno)?,
                        "size" => size = parse_int(value, lineno)?,
                        // header metadata (file type, object class, the
                        // tier list opener) is not modeled
                        _ => {}
                    }
                }
                // tier metadata (class/name/interval count) is not modeled
                ParseState::Tier => {}
                ParseState::Interval => {
                    let Some((key, value)) = split_key_value(line) else {
                        continue;
                    };
                    let value = value.trim_start();
                    match key {
                        "xmin" => {
                            let parsed = parse_float(value, lineno)?;
                            current_interval(&mut tiers, lineno)?.xmin = parsed;
                        }
                        "xmax" => {
                            let parsed = parse_float(value, lineno)?;
                            current_interval(&mut tiers, lineno)?.xmax = parsed;
                        }
                        "text" => {
                            if opens_unterminated_quote(value) {
                                accumulator.start(value);
                            } else {
                                let unescaped = value.replace("\"\"", "\"");
                                current_interval(&mut tiers, lineno)?.text =
                                    strip_quote_surround(unescaped.trim()).to_string();
                            }
                        }
                        other => warnings.push(ParseWarning {
                            line: lineno,
                            message: format!("unrecognized field `{}` in interval scope", other),
                        }),
                    }
                }
            },
        }
    }

    Ok((
        TextGrid {
            xmin,
            xmax,
            size,
            tiers,
            dialog: OnceCell::new(),
        },
        warnings,
    ))
}
