//! Path parsing - turn `d=""` attributes into polyline segments.
//!
//! Only straight-line commands are traced: `M`/`m`, `L`/`l`, `H`/`h`,
//! `V`/`v` and `Z`/`z`. Curves and arcs are skipped and the pen stays where
//! it was.
//!
//! ## Parsing strategies
//!
//! The first attempt uses svgtypes, which handles compact number syntax
//! (`10-5`, `1e3`, `.5.5`) the same way browsers do. svgtypes stops at the
//! first bad token; when it does, the string is re-read with a lenient
//! tokenizer that drops whatever it cannot parse and keeps going.

use log::{debug, trace};
use serde::Serialize;
use svgtypes::{PathParser, PathSegment};

use crate::geometry::{Point, Segment};

/// A straight-line drawing command, normalised from either tokenizer.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DrawCommand {
    MoveTo { abs: bool, x: f64, y: f64 },
    LineTo { abs: bool, x: f64, y: f64 },
    HorizontalTo { abs: bool, x: f64 },
    VerticalTo { abs: bool, y: f64 },
    Close,
    /// Curves, arcs and anything else we don't trace.
    Skip,
}

impl From<PathSegment> for DrawCommand {
    fn from(segment: PathSegment) -> Self {
        match segment {
            PathSegment::MoveTo { abs, x, y } => DrawCommand::MoveTo { abs, x, y },
            PathSegment::LineTo { abs, x, y } => DrawCommand::LineTo { abs, x, y },
            PathSegment::HorizontalLineTo { abs, x } => DrawCommand::HorizontalTo { abs, x },
            PathSegment::VerticalLineTo { abs, y } => DrawCommand::VerticalTo { abs, y },
            PathSegment::ClosePath { .. } => DrawCommand::Close,
            _ => DrawCommand::Skip,
        }
    }
}

/// Parse a path definition into the ordered list of vertices it traces.
///
/// Never fails: malformed input yields whatever points could be recovered,
/// possibly none.
pub fn parse_path_data(d: &str) -> Vec<Point> {
    let commands = match strict_commands(d) {
        Ok(commands) => commands,
        Err(e) => {
            debug!(
                error = e.to_string(), path = d;
                "Strict path parse failed, retrying with lenient tokenizer"
            );
            lenient_commands(d)
        }
    };

    trace_commands(&commands)
}

/// Convert a list of points to line segments (`n` points, `n - 1` segments).
pub fn points_to_segments(points: &[Point]) -> Vec<Segment> {
    points
        .windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect()
}

/// Tokenize with svgtypes. Any error aborts the whole attempt.
fn strict_commands(d: &str) -> Result<Vec<DrawCommand>, svgtypes::Error> {
    PathParser::from(d)
        .map(|segment| segment.map(DrawCommand::from))
        .collect()
}

/// Best-effort tokenizer for definitions svgtypes rejects.
///
/// The string is split at command letters and each argument list is scanned
/// for numbers; anything that is not part of a number is dropped.
fn lenient_commands(d: &str) -> Vec<DrawCommand> {
    let mut commands = Vec::new();

    for (letter, args) in split_at_commands(d) {
        let numbers = scan_numbers(args);

        let abs = letter.is_ascii_uppercase();

        match letter.to_ascii_uppercase() {
            'M' => {
                if numbers.len() < 2 {
                    continue;
                }
                commands.push(DrawCommand::MoveTo {
                    abs,
                    x: numbers[0],
                    y: numbers[1],
                });
                // Extra pairs after a move are implicit line-tos
                for pair in numbers[2..].chunks_exact(2) {
                    commands.push(DrawCommand::LineTo {
                        abs,
                        x: pair[0],
                        y: pair[1],
                    });
                }
            }
            'L' => {
                for pair in numbers.chunks_exact(2) {
                    commands.push(DrawCommand::LineTo {
                        abs,
                        x: pair[0],
                        y: pair[1],
                    });
                }
            }
            'H' => commands.extend(numbers.iter().map(|&x| DrawCommand::HorizontalTo { abs, x })),
            'V' => commands.extend(numbers.iter().map(|&y| DrawCommand::VerticalTo { abs, y })),
            'Z' => commands.push(DrawCommand::Close),
            _ => commands.push(DrawCommand::Skip),
        }
    }

    commands
}

/// Pull the numbers out of one command's argument text.
///
/// Numbers follow SVG path grammar: optional sign, digits with at most one
/// `.`, optional exponent. A sign or a second `.` starts the next number, so
/// `10-5` is `10, -5` and `.5.5` is `0.5, 0.5`. Whitespace and commas
/// separate numbers; any other character is skipped.
fn scan_numbers(args: &str) -> Vec<f64> {
    let bytes = args.as_bytes();
    let mut numbers = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if !(c.is_ascii_digit() || matches!(c, b'.' | b'+' | b'-')) {
            if !(c.is_ascii_whitespace() || c == b',') {
                trace!(offset = i; "Skipping stray character in path arguments");
            }
            i += 1;
            continue;
        }

        let start = i;
        if matches!(c, b'+' | b'-') {
            i += 1;
        }

        let mut has_digits = false;
        let mut has_dot = false;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => has_digits = true,
                b'.' if !has_dot => has_dot = true,
                _ => break,
            }
            i += 1;
        }

        // Exponent only counts when digits follow it
        if has_digits && i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
            let mut j = i + 1;
            if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
                j += 1;
            }
            if j < bytes.len() && bytes[j].is_ascii_digit() {
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                i = j;
            }
        }

        let token = &args[start..i];
        match token.parse::<f64>() {
            Ok(n) if has_digits && n.is_finite() => numbers.push(n),
            _ => trace!(token = token; "Dropping malformed path token"),
        }
    }

    numbers
}

/// Split a definition into `(command letter, argument text)` pairs.
///
/// `e`/`E` belong to number exponents, not commands. Text before the first
/// command letter is ignored.
fn split_at_commands(d: &str) -> Vec<(char, &str)> {
    let is_command = |c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E';

    let mut parts = Vec::new();
    let mut current: Option<(char, usize)> = None;

    for (i, c) in d.char_indices() {
        if is_command(c) {
            if let Some((letter, start)) = current {
                parts.push((letter, &d[start..i]));
            }
            current = Some((c, i + c.len_utf8()));
        }
    }
    if let Some((letter, start)) = current {
        parts.push((letter, &d[start..]));
    }

    parts
}

/// Walk the commands with a pen and record every vertex it visits.
fn trace_commands(commands: &[DrawCommand]) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::new();
    let mut pen = Point::new(0.0, 0.0);

    for command in commands {
        match *command {
            DrawCommand::MoveTo { abs, x, y } | DrawCommand::LineTo { abs, x, y } => {
                pen = if abs {
                    Point::new(x, y)
                } else {
                    Point::new(pen.x + x, pen.y + y)
                };
                points.push(pen);
            }
            DrawCommand::HorizontalTo { abs, x } => {
                pen.x = if abs { x } else { pen.x + x };
                points.push(pen);
            }
            DrawCommand::VerticalTo { abs, y } => {
                pen.y = if abs { y } else { pen.y + y };
                points.push(pen);
            }
            DrawCommand::Close => {
                // Closes back to the first vertex of the whole path; the pen
                // itself is left where it was.
                if let Some(&first) = points.first() {
                    points.push(first);
                }
            }
            DrawCommand::Skip => {}
        }
    }

    points
}

/// A named path from the diagram and the segments it is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDef {
    pub name: String,
    /// The raw `d` attribute.
    #[serde(rename = "raw_definition")]
    pub definition: String,
    pub segments: Vec<Segment>,
}

impl PathDef {
    /// Parse `definition` and build the path from its segments.
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        let definition = definition.into();
        let segments = points_to_segments(&parse_path_data(&definition));
        Self {
            name: name.into(),
            definition,
            segments,
        }
    }

    pub fn start_point(&self) -> Option<Point> {
        self.segments.first().map(|s| s.p1)
    }

    pub fn end_point(&self) -> Option<Point> {
        self.segments.last().map(|s| s.p2)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
