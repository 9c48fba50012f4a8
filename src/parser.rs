//! # Tab Parser
//!
//! Parses guitar tablature text into a [`GuitarSheet`].
//!
//! ## Format
//! ```text
//! title: Agua Marina
//! author: Unknown
//! bpm: 90
//! capo fret: 2
//!
//! # a comment line
//! e |----------------|
//! B |----1------1----|
//! G |------0------0--|
//! D |--2-------2-----|
//! A |----------------|
//! E |----------------|
//! ```
//!
//! - Each instrument string contributes one line starting with a one-character
//!   label (`e B G D A E`, high to low = strings 1..6); tab content begins at
//!   the third character.
//! - Content characters: `-` rest, `0`-`9` frets, `a`-`f` frets 10-15,
//!   `!`/`+` duration symbols attached to the preceding fret, `r` let-ring
//!   marker for the column. Anything else (bar lines, spaces) occupies a
//!   column without producing notes.
//! - `key: value` metadata lines may appear anywhere and are stripped before
//!   musical parsing.
//! - Blank lines separate sections; sections are parsed independently and
//!   concatenated in order (time and state carry across). `#` lines inside a
//!   section are comments.
//!
//! ## Column walk
//! A shared column index advances across all string lines simultaneously; a
//! column is one rhythmic slot. Each string greedily consumes a run of fret
//! tokens with their duration symbols, and the column advances by the maximum
//! number of characters any string consumed (minimum 1), so wider chord
//! groupings keep all strings aligned. The token set is tiny and the real
//! complexity is this cross-string alignment, hence a hand-written scanner
//! rather than a grammar.

use crate::error::TabSynthError;
use crate::types::{GuitarSheet, NoteValue, SequenceElement, Stroke};

/// Map a string-label character to its 1-based string number.
fn string_number_for_label(label: u8) -> Option<usize> {
    match label {
        b'e' => Some(1), // high E
        b'B' => Some(2),
        b'G' => Some(3),
        b'D' => Some(4),
        b'A' => Some(5),
        b'E' => Some(6), // low E
        _ => None,
    }
}

/// Fret number for a content byte: decimal digits, or `a`-`f` for 10-15.
fn fret_for_byte(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u32),
        b'a'..=b'f' => Some(10 + (byte - b'a') as u32),
        _ => None,
    }
}

fn is_symbol_byte(byte: u8) -> bool {
    byte == b'+' || byte == b'!'
}

/// Note value for a duration-symbol run following a fret.
///
/// A bare fret is a quarter note; any unrecognized symbol run falls back to
/// an eighth note, the default for grouped frets.
fn note_value_for_symbols(symbols: &[u8]) -> NoteValue {
    match symbols {
        b"" => NoteValue::Quarter,
        b"!" => NoteValue::Eighth,
        b"!!" => NoteValue::Sixteenth,
        b"+" => NoteValue::Half,
        b"++" => NoteValue::Whole,
        _ => NoteValue::Eighth,
    }
}

/// Sheet metadata extracted from `key: value` lines.
struct SheetMetadata {
    title: String,
    author: String,
    bpm: u32,
    capo_fret: u32,
}

impl Default for SheetMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            author: "Unknown Author".to_string(),
            bpm: 60,
            capo_fret: 0,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum MetaKey {
    Title,
    Author,
    Bpm,
    CapoFret,
}

/// Strip a case-insensitive key prefix from a line. Keys are ASCII, so a
/// byte-wise match keeps the remainder on a char boundary.
fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    if line.len() >= key.len()
        && line.as_bytes()[..key.len()].eq_ignore_ascii_case(key.as_bytes())
    {
        Some(&line[key.len()..])
    } else {
        None
    }
}

/// The value following `: ` on a metadata line, if a colon is present.
fn value_after_colon(rest: &str) -> Option<&str> {
    rest.trim_start().strip_prefix(':').map(str::trim)
}

/// Recognize a metadata line. Returns the key and, when a colon follows, its
/// value. Metadata lines are stripped even when the value is missing.
fn match_metadata(line: &str) -> Option<(MetaKey, Option<&str>)> {
    for (key, kind) in [
        ("title", MetaKey::Title),
        ("author", MetaKey::Author),
        ("bpm", MetaKey::Bpm),
    ] {
        if let Some(rest) = strip_key(line, key) {
            return Some((kind, value_after_colon(rest)));
        }
    }
    if let Some(rest) = strip_key(line, "capo") {
        if let Some(rest) = strip_key(rest.trim_start(), "fret") {
            return Some((MetaKey::CapoFret, value_after_colon(rest)));
        }
    }
    None
}

/// Leading decimal digits of a metadata value, if any.
fn leading_number(value: &str) -> Option<u32> {
    let digits: &str = {
        let end = value
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(value.len());
        &value[..end]
    };
    digits.parse().ok()
}

/// Split metadata lines out of the source. Returns the extracted metadata
/// (first occurrence of each key wins) and the remaining lines in order.
fn extract_metadata(source: &str) -> (SheetMetadata, Vec<&str>) {
    let mut metadata = SheetMetadata::default();
    let mut seen_title = false;
    let mut seen_author = false;
    let mut seen_bpm = false;
    let mut seen_capo = false;
    let mut remaining = Vec::new();

    for line in source.lines() {
        match match_metadata(line) {
            Some((key, value)) => {
                match (key, value) {
                    (MetaKey::Title, Some(value)) if !seen_title => {
                        metadata.title = value.to_string();
                        seen_title = true;
                    }
                    (MetaKey::Author, Some(value)) if !seen_author => {
                        metadata.author = value.to_string();
                        seen_author = true;
                    }
                    (MetaKey::Bpm, Some(value)) if !seen_bpm => {
                        if let Some(bpm) = leading_number(value) {
                            metadata.bpm = bpm;
                            seen_bpm = true;
                        }
                    }
                    (MetaKey::CapoFret, Some(value)) if !seen_capo => {
                        if let Some(capo) = leading_number(value) {
                            metadata.capo_fret = capo;
                            seen_capo = true;
                        }
                    }
                    _ => {}
                }
                // metadata lines never reach the musical parser
            }
            None => remaining.push(line),
        }
    }

    (metadata, remaining)
}

/// Group lines into sections separated by blank lines.
fn split_sections<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut sections = Vec::new();
    let mut current = Vec::new();
    for &line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

/// Map each recognized string line to its tab content (bytes from the third
/// character on). Later lines for the same string replace earlier ones.
fn collect_tab_lines<'a>(lines: &[&'a str]) -> Vec<(usize, &'a [u8])> {
    let mut tab_lines: Vec<(usize, &[u8])> = Vec::new();
    for line in lines {
        let line = line.trim();
        let Some(&label) = line.as_bytes().first() else {
            continue;
        };
        let Some(string_number) = string_number_for_label(label) else {
            continue;
        };
        // content starts after the 2-character label prefix
        let content = line
            .char_indices()
            .nth(2)
            .map(|(i, _)| &line.as_bytes()[i..])
            .unwrap_or(&[]);
        match tab_lines.iter_mut().find(|(n, _)| *n == string_number) {
            Some(slot) => slot.1 = content,
            None => tab_lines.push((string_number, content)),
        }
    }
    tab_lines
}

/// Scan one fret token: the fret byte plus its trailing duration symbols.
/// Returns the fret, its note value, and the index past the token.
fn scan_fret(line: &[u8], start: usize) -> (u32, NoteValue, usize) {
    let fret = fret_for_byte(line[start]).unwrap_or(0);
    let mut end = start + 1;
    while end < line.len() && is_symbol_byte(line[end]) {
        end += 1;
    }
    (fret, note_value_for_symbols(&line[start + 1..end]), end)
}

/// Process one column across all strings. Returns the strokes that begin in
/// this column and the number of columns to advance (minimum 1).
fn process_column(tab_lines: &[(usize, &[u8])], column: usize) -> (Vec<Stroke>, usize) {
    let mut strokes = Vec::new();
    let mut max_span = 1;

    // An 'r' before the next rest marker on any string flags the whole
    // column as let-ring.
    let mut let_ring = false;
    for (_, line) in tab_lines {
        let mut idx = column;
        while idx < line.len() && line[idx] != b'-' {
            if line[idx] == b'r' {
                let_ring = true;
                break;
            }
            idx += 1;
        }
        if let_ring {
            break;
        }
    }

    for &(string_number, line) in tab_lines {
        if column >= line.len() {
            continue;
        }
        let mut frets = Vec::new();
        let mut values = Vec::new();
        let mut idx = column;
        while idx < line.len() && (fret_for_byte(line[idx]).is_some() || is_symbol_byte(line[idx]))
        {
            if fret_for_byte(line[idx]).is_some() {
                let (fret, value, next) = scan_fret(line, idx);
                frets.push(fret);
                values.push(value);
                idx = next;
            } else {
                // stray duration symbol with no preceding fret
                idx += 1;
            }
        }
        if !frets.is_empty() {
            strokes.push(Stroke {
                string_number,
                frets,
                values,
                transition_types: None,
                let_ring,
            });
        }
        max_span = max_span.max(idx - column);
    }

    (strokes, max_span)
}

/// Walk the shared column index across a set of tab lines.
fn parse_tab_lines(tab_lines: &[(usize, &[u8])]) -> Vec<SequenceElement> {
    let num_positions = tab_lines.iter().map(|(_, l)| l.len()).max().unwrap_or(0);
    let mut sequence = Vec::new();
    let mut column = 0;
    while column < num_positions {
        let (strokes, span) = process_column(tab_lines, column);
        if !strokes.is_empty() {
            sequence.push(SequenceElement { strokes });
        }
        column += span;
    }
    sequence
}

/// Parse a block of tab lines (one section, no metadata handling) into an
/// ordered sequence of elements.
///
/// Fails if no line carries a recognized string label.
pub fn parse_tab(tab: &str) -> Result<Vec<SequenceElement>, TabSynthError> {
    let lines: Vec<&str> = tab.lines().collect();
    let tab_lines = collect_tab_lines(&lines);
    if tab_lines.is_empty() {
        return Err(TabSynthError::ParseError {
            section: 1,
            message: "no string lines recognized".to_string(),
        });
    }
    Ok(parse_tab_lines(&tab_lines))
}

/// Parse a complete tab source (metadata, comments, sections) into a
/// [`GuitarSheet`].
///
/// Sections never reset time or state: their sequences are concatenated in
/// order. A section that still has content after comment removal but no
/// recognized string lines is a parse error.
pub fn parse_sheet(source: &str) -> Result<GuitarSheet, TabSynthError> {
    let (metadata, lines) = extract_metadata(source);

    let mut sequence = Vec::new();
    let mut section_index = 0;
    for section in split_sections(&lines) {
        let content: Vec<&str> = section
            .iter()
            .filter(|line| !line.trim_start().starts_with('#'))
            .copied()
            .collect();
        if content.is_empty() {
            continue;
        }
        section_index += 1;

        let tab_lines = collect_tab_lines(&content);
        if tab_lines.is_empty() {
            return Err(TabSynthError::ParseError {
                section: section_index,
                message: "no string lines recognized".to_string(),
            });
        }
        sequence.extend(parse_tab_lines(&tab_lines));
    }

    Ok(GuitarSheet {
        title: metadata.title,
        author: metadata.author,
        sequence,
        bpm: metadata.bpm,
        capo_fret: metadata.capo_fret,
    })
}
