// src/dialect/sniffer.rs
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{Dialect, DialectDetector};
use crate::error::SplitError;

/// Tie-break order when several characters look equally like a delimiter.
const PREFERRED: [char; 5] = [',', '\t', ';', ' ', ':'];

/// Lines examined per pass of the frequency analysis.
const CHUNK_LINES: usize = 10;

/// First character outside the 7-bit range; nothing at or above it is a candidate.
const ASCII_LIMIT: usize = 127;

const QUOTES: [char; 2] = ['"', '\''];

/// One set of quoted-field shapes per quote character, tried in this order:
/// `,"x",`  then  `^"x",`  then  `,"x"$`  then  `^"x"$`.
static QUOTE_PATTERNS: Lazy<Vec<[Regex; 2]>> = Lazy::new(|| {
    let shapes = [
        r#"(?sm)(?P<delim>[^\w\n"'])(?P<space> ?)Q.*?Q(?P<close>[^\w\n"'])"#,
        r#"(?sm)(?:^|\n)Q.*?Q(?P<delim>[^\w\n"'])(?P<space> ?)"#,
        r#"(?sm)(?P<delim>[^\w\n"'])(?P<space> ?)Q.*?Q(?:$|\n)"#,
        r#"(?sm)(?:^|\n)Q.*?Q(?:$|\n)"#,
    ];
    shapes
        .iter()
        .map(|shape| {
            QUOTES.map(|q| {
                let q = regex::escape(&q.to_string());
                Regex::new(&shape.replace('Q', &q)).expect("quoted-field pattern compiles")
            })
        })
        .collect()
});

/// Heuristic dialect detection from a sample of text.
///
/// Quoted fields are looked at first since they pin down both the quote and
/// the delimiter. Failing that, every ASCII character is scored on how
/// consistently it occurs across the sample's lines.
#[derive(Debug, Clone)]
pub struct Sniffer {
    preferred: Vec<char>,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self {
            preferred: PREFERRED.to_vec(),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct QuoteGuess {
    quote: Option<char>,
    delimiter: Option<char>,
    skip_initial_space: bool,
}

impl Sniffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tie-break order used when several delimiters qualify.
    pub fn with_preferred(preferred: impl IntoIterator<Item = char>) -> Self {
        Self {
            preferred: preferred.into_iter().collect(),
        }
    }

    pub fn sniff(&self, sample: &str) -> Result<Dialect, SplitError> {
        let guess = guess_quote_and_delimiter(sample);
        trace!(?guess, "quote pass");

        let (delimiter, skip_initial_space) = match guess.delimiter {
            Some(d) => (d, guess.skip_initial_space),
            None => self
                .guess_delimiter(sample)
                .ok_or_else(|| detection_error(sample, "could not determine delimiter"))?,
        };
        let quote = guess.quote.unwrap_or('"');

        Ok(Dialect {
            delimiter: to_ascii(delimiter, sample, "delimiter")?,
            quote: to_ascii(quote, sample, "quote character")?,
            escape: None,
            double_quote: true,
            skip_initial_space,
        })
    }

    fn guess_delimiter(&self, sample: &str) -> Option<(char, bool)> {
        let lines: Vec<&str> = sample.split('\n').filter(|l| !l.is_empty()).collect();
        let first = *lines.first()?;
        let chunk = lines.len().min(CHUNK_LINES);

        // per character: (occurrences in a line, lines with that many) in first-seen order
        let mut histograms: Vec<Vec<(usize, usize)>> = vec![Vec::new(); ASCII_LIMIT];
        let mut modes: Vec<Option<(usize, isize)>> = vec![None; ASCII_LIMIT];
        let mut candidates: Vec<(char, (usize, isize))> = Vec::new();

        let (mut start, mut end, mut iteration) = (0, chunk, 0);
        while start < lines.len() {
            iteration += 1;
            for line in &lines[start..end.min(lines.len())] {
                let mut counts = [0usize; ASCII_LIMIT];
                for b in line.bytes().filter(|&b| (b as usize) < ASCII_LIMIT) {
                    counts[b as usize] += 1;
                }
                for (hist, &freq) in histograms.iter_mut().zip(counts.iter()) {
                    match hist.iter_mut().find(|(f, _)| *f == freq) {
                        Some(entry) => entry.1 += 1,
                        None => hist.push((freq, 1)),
                    }
                }
            }

            for (mode, hist) in modes.iter_mut().zip(histograms.iter()) {
                if hist.is_empty() || (hist.len() == 1 && hist[0].0 == 0) {
                    continue;
                }
                let mut best = hist[0];
                for &entry in &hist[1..] {
                    if entry.1 > best.1 {
                        best = entry;
                    }
                }
                let others: usize = hist.iter().map(|e| e.1).sum::<usize>() - best.1;
                *mode = Some((best.0, best.1 as isize - others as isize));
            }

            let total = (chunk * iteration).min(lines.len()) as f64;
            let mut consistency = 1.0_f64;
            while candidates.is_empty() && consistency >= 0.9 {
                for (code, mode) in modes.iter().enumerate() {
                    if let Some((freq, count)) = *mode {
                        if freq > 0 && count > 0 && count as f64 / total >= consistency {
                            candidates.push((char::from(code as u8), (freq, count)));
                        }
                    }
                }
                consistency -= 0.01;
            }

            if let [(only, _)] = candidates.as_slice() {
                return Some((*only, skips_initial_space(first, *only)));
            }

            start = end;
            end += chunk;
        }

        if let Some(&d) = self
            .preferred
            .iter()
            .find(|p| candidates.iter().any(|(c, _)| c == *p))
        {
            return Some((d, skips_initial_space(first, d)));
        }

        let (_, delimiter) = candidates.iter().map(|(c, m)| (*m, *c)).max()?;
        Some((delimiter, skips_initial_space(first, delimiter)))
    }
}

impl DialectDetector for Sniffer {
    fn detect(&self, sample: &str) -> Result<Dialect, SplitError> {
        self.sniff(sample)
    }
}

fn guess_quote_and_delimiter(sample: &str) -> QuoteGuess {
    for (shape, patterns) in QUOTE_PATTERNS.iter().enumerate() {
        let mut quotes: Vec<(char, usize)> = Vec::new();
        let mut delims: Vec<(char, usize)> = Vec::new();
        let mut spaces = 0;

        for (quote, re) in QUOTES.iter().zip(patterns.iter()) {
            for caps in re.captures_iter(sample) {
                let delim = caps.name("delim").map(|m| m.as_str());
                if let (Some(open), Some(close)) = (delim, caps.name("close")) {
                    if open != close.as_str() {
                        continue;
                    }
                }
                bump(&mut quotes, *quote);
                if let Some(d) = delim.and_then(|d| d.chars().next()) {
                    bump(&mut delims, d);
                }
                if caps.name("space").is_some_and(|m| !m.as_str().is_empty()) {
                    spaces += 1;
                }
            }
        }

        if quotes.is_empty() {
            continue;
        }
        trace!(shape, ?quotes, ?delims, "quoted fields found");

        let quote = most_frequent(&quotes);
        return match most_frequent(&delims) {
            Some((d, n)) if d != '\n' => QuoteGuess {
                quote: quote.map(|(q, _)| q),
                delimiter: Some(d),
                skip_initial_space: n == spaces,
            },
            _ => QuoteGuess {
                quote: quote.map(|(q, _)| q),
                ..QuoteGuess::default()
            },
        };
    }
    QuoteGuess::default()
}

fn bump(tally: &mut Vec<(char, usize)>, c: char) {
    match tally.iter_mut().find(|(k, _)| *k == c) {
        Some(entry) => entry.1 += 1,
        None => tally.push((c, 1)),
    }
}

/// Highest count wins; ties go to whichever was seen first.
fn most_frequent(tally: &[(char, usize)]) -> Option<(char, usize)> {
    let mut best: Option<(char, usize)> = None;
    for &(c, n) in tally {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((c, n));
        }
    }
    best
}

fn skips_initial_space(line: &str, delimiter: char) -> bool {
    let spaced = format!("{delimiter} ");
    line.matches(delimiter).count() == line.matches(spaced.as_str()).count()
}

fn to_ascii(c: char, sample: &str, what: &str) -> Result<u8, SplitError> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| detection_error(sample, &format!("{what} {c:?} is not ASCII")))
}

fn detection_error(sample: &str, reason: &str) -> SplitError {
    SplitError::DialectDetection {
        sample: sample.chars().take(80).collect(),
        reason: reason.to_string(),
    }
}
