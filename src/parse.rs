//! Text parsers for segment records and point sequences.
//!
//! Three grammars are understood:
//!
//! * `Line: x1, y1 -> x2, y2`, one segment per line; lines without the
//!   `Line:` marker are skipped;
//! * `x1, y1 -> x2, y2`, the same record without the marker, where every
//!   non-blank line must be a record;
//! * `(x, y) (x, y) ...`, one point sequence per line.
//!
//! Every failure is fatal for the whole call and reports the 1-based line
//! number it was found on.

use std::num::ParseFloatError;

use thiserror::Error;

use crate::common::{Point, Segment, PointSequence};

const MARKER: &str = "Line:";
const ARROW: &str = " -> ";
/// Segment coordinates are split on the exact `, ` separator.
const COORD_SEPARATOR: &str = ", ";
const TUPLE_SEPARATOR: &str = ",";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found `{fragment}`")]
    Format {
        line: usize,
        fragment: String,
        expected: &'static str,
    },
    #[error("line {line}: invalid number `{token}`")]
    Numeric {
        line: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
}

/// Extracts every `Line: x1, y1 -> x2, y2` record from `text`.
pub fn parse_segments(text: &str) -> Result<Vec<Segment>, ParseError> {
    let mut segments = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let record = match line.trim_start().strip_prefix(MARKER) {
            Some(record) =>
                record,
            None => {
                if !line.trim().is_empty() {
                    trace!("line {}: no `{}` marker, skipped", index + 1, MARKER);
                }
                continue;
            },
        };
        segments.push(parse_record(index + 1, record.trim())?);
    }
    Ok(segments)
}

/// Parses marker-less `x1, y1 -> x2, y2` records, one per non-blank line.
pub fn parse_segment_records(text: &str) -> Result<Vec<Segment>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|&(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_record(index + 1, line.trim()))
        .collect()
}

/// Parses a single line of `(x, y)` tuples.
pub fn parse_points(line: &str) -> Result<PointSequence, ParseError> {
    let mut points = Vec::new();
    for fragment in line.split(')') {
        let fragment = fragment.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        // the tail after the last `)` ends up here
        if fragment.is_empty() {
            continue;
        }
        points.push(parse_pair(1, fragment, TUPLE_SEPARATOR, "two comma separated coordinates")?);
    }
    Ok(PointSequence::new(points))
}

/// Parses one point sequence per non-blank line of `text`.
pub fn parse_point_lines(text: &str) -> Result<Vec<PointSequence>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|&(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_points(line).map_err(|e| e.on_line(index + 1)))
        .collect()
}

impl ParseError {
    fn on_line(self, line: usize) -> ParseError {
        match self {
            ParseError::Format { fragment, expected, .. } =>
                ParseError::Format { line, fragment, expected, },
            ParseError::Numeric { token, source, .. } =>
                ParseError::Numeric { line, token, source, },
        }
    }
}

fn parse_record(line: usize, record: &str) -> Result<Segment, ParseError> {
    let mut sides = record.split(ARROW);
    match (sides.next(), sides.next(), sides.next()) {
        (Some(src), Some(dst), None) =>
            Ok(Segment {
                src: parse_pair(line, src, COORD_SEPARATOR, "two coordinates separated by `, `")?,
                dst: parse_pair(line, dst, COORD_SEPARATOR, "two coordinates separated by `, `")?,
            }),
        _ =>
            Err(ParseError::Format {
                line,
                fragment: record.to_string(),
                expected: "two points separated by ` -> `",
            }),
    }
}

fn parse_pair(line: usize, text: &str, separator: &str, expected: &'static str) -> Result<Point, ParseError> {
    let mut tokens = text.split(separator);
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(x), Some(y), None) =>
            Ok(Point {
                x: parse_number(line, x)?,
                y: parse_number(line, y)?,
            }),
        _ =>
            Err(ParseError::Format {
                line,
                fragment: text.trim().to_string(),
                expected,
            }),
    }
}

fn parse_number(line: usize, token: &str) -> Result<f64, ParseError> {
    let token = token.trim();
    token.parse().map_err(|source| ParseError::Numeric {
        line,
        token: token.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y, }
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment { src: pt(x1, y1), dst: pt(x2, y2), }
    }

    #[test]
    fn two_segments() {
        let segments = parse_segments("Line: 0, 0 -> 1, 1\nLine: 1, 1 -> 2, 0").unwrap();
        assert_eq!(segments, vec![seg(0., 0., 1., 1.), seg(1., 1., 2., 0.)]);
    }

    #[test]
    fn unmarked_lines_are_skipped() {
        let text = "# slice 3\nLine: 112.2, 142.5 -> 142.5, 142.5\n\n  Line: 1.5, -2 -> 3, 4\nPoint: 1, 2\n";
        let segments = parse_segments(text).unwrap();
        assert_eq!(segments, vec![seg(112.2, 142.5, 142.5, 142.5), seg(1.5, -2., 3., 4.)]);
        assert!(parse_segments("nothing here").unwrap().is_empty());
        assert!(parse_segments("").unwrap().is_empty());
    }

    #[test]
    fn marked_line_with_missing_arrow_fails() {
        match parse_segments("Line: 0, 0 -> 1, 1\nLine: 1, 1, 2, 0") {
            Err(ParseError::Format { line: 2, .. }) =>
                (),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn marked_line_with_three_coordinates_fails() {
        match parse_segments("Line: 0, 0, 0 -> 1, 1") {
            Err(ParseError::Format { line: 1, ref fragment, .. }) =>
                assert_eq!(fragment, "0, 0, 0"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn marked_line_with_bad_number_fails() {
        match parse_segments("\n\nLine: 0, zero -> 1, 1") {
            Err(ParseError::Numeric { line: 3, ref token, .. }) =>
                assert_eq!(token, "zero"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn records_without_marker() {
        let text = "112.2, 142.5 -> 142.5, 142.5\n\n92.5, 112.2 -> 92.5, 92.5\r\n";
        let segments = parse_segment_records(text).unwrap();
        assert_eq!(segments, vec![seg(112.2, 142.5, 142.5, 142.5), seg(92.5, 112.2, 92.5, 92.5)]);
    }

    #[test]
    fn records_do_not_skip_garbage() {
        match parse_segment_records("1, 2 -> 3, 4\nLine: 1, 2 -> 3, 4") {
            Err(ParseError::Numeric { line: 2, ref token, .. }) =>
                assert_eq!(token, "Line: 1"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn segment_coordinates_need_comma_space() {
        match parse_segments("Line: 1,2 -> 3,4") {
            Err(ParseError::Format { line: 1, ref fragment, .. }) =>
                assert_eq!(fragment, "1,2"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
        match parse_segment_records("0, 0 -> 1, 1\n1,2 -> 3,4") {
            Err(ParseError::Format { line: 2, ref fragment, .. }) =>
                assert_eq!(fragment, "1,2"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn tuples_accept_bare_comma() {
        let seq = parse_points("(1,2) (3 ,4)").unwrap();
        assert_eq!(seq.points, vec![pt(1., 2.), pt(3., 4.)]);
    }

    #[test]
    fn three_points() {
        let seq = parse_points("(1, 2) (3, 4) (5, 6)").unwrap();
        assert_eq!(seq.points, vec![pt(1., 2.), pt(3., 4.), pt(5., 6.)]);
    }

    #[test]
    fn empty_fragments_are_discarded() {
        let seq = parse_points("  (1, 2)   (3, 4)(5, 6)   \n").unwrap();
        assert_eq!(seq.points, vec![pt(1., 2.), pt(3., 4.), pt(5., 6.)]);
        assert!(parse_points("").unwrap().is_empty());
        assert!(parse_points("   ").unwrap().is_empty());
    }

    #[test]
    fn tuple_with_one_coordinate_fails() {
        match parse_points("(1, 2) (3) (5, 6)") {
            Err(ParseError::Format { line: 1, ref fragment, .. }) =>
                assert_eq!(fragment, "3"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn tuple_with_bad_number_fails() {
        match parse_points("(1, 2) (3, x)") {
            Err(ParseError::Numeric { ref token, .. }) =>
                assert_eq!(token, "x"),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn trailing_garbage_fails() {
        assert!(parse_points("(1, 2) tail").is_err());
    }

    #[test]
    fn one_sequence_per_line() {
        let text = "(115.281, 98.6484) (118.719, 99.3203)\n\n(110.32, 106.656) (126, 113.898) (1e2, -0.5)\n";
        let seqs = parse_point_lines(text).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].points, vec![pt(115.281, 98.6484), pt(118.719, 99.3203)]);
        assert_eq!(seqs[1].points[2], pt(100., -0.5));
    }

    #[test]
    fn bad_tuple_reports_its_line() {
        match parse_point_lines("(1, 2)\n(3, 4)\n(5; 6)") {
            Err(ParseError::Format { line: 3, .. }) =>
                (),
            other =>
                panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn error_messages_name_the_line() {
        let error = parse_segments("Line: 1, 2 -> 3, oops").unwrap_err();
        assert_eq!(error.to_string(), "line 1: invalid number `oops`");
    }

    #[test]
    fn embedded_samples_parse() {
        let segments = parse_segments(include_str!("../demos/segments.txt")).unwrap();
        assert_eq!(segments.len(), 8);
        let records = parse_segment_records(include_str!("../demos/records.txt")).unwrap();
        assert_eq!(records, segments);
        let contours = parse_point_lines(include_str!("../demos/contours.txt")).unwrap();
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(|seq| seq.len() > 50));
    }

    fn random_point<R: Rng>(rng: &mut R) -> Point {
        pt(rng.gen_range(-1.0e4 .. 1.0e4), rng.gen_range(-1.0e4 .. 1.0e4))
    }

    #[test]
    fn segment_values_survive_display() {
        let mut rng = rand::thread_rng();
        for _ in 0 .. 64 {
            let segments: Vec<_> = (0 .. rng.gen_range(1 .. 20))
                .map(|_| Segment { src: random_point(&mut rng), dst: random_point(&mut rng), })
                .collect();
            let text: String = segments.iter()
                .map(|segment| format!("Line: {}\n", segment))
                .collect();
            assert_eq!(parse_segments(&text).unwrap(), segments);
            let records: String = segments.iter()
                .map(|segment| format!("{}\n", segment))
                .collect();
            assert_eq!(parse_segment_records(&records).unwrap(), segments);
        }
    }

    #[test]
    fn point_count_matches_open_parens() {
        let mut rng = rand::thread_rng();
        for _ in 0 .. 64 {
            let seq = PointSequence::new((0 .. rng.gen_range(0 .. 40)).map(|_| random_point(&mut rng)).collect());
            let text = seq.to_string();
            let parsed = parse_points(&text).unwrap();
            assert_eq!(parsed.len(), text.matches('(').count());
            assert_eq!(parsed, seq);
        }
    }
}
