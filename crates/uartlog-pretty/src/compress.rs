//! Run-length compression of repeated frame sequences.

use std::fmt;

/// Longest repeating period searched for.
pub const MAX_PERIOD: usize = 12;

/// One output row: a frame, or a repeat marker when `channel` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub channel: Option<char>,
    pub wall_time: String,
    pub text: String,
}

impl Row {
    pub fn frame(channel: char, wall_time: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: Some(channel),
            wall_time: wall_time.into(),
            text: text.into(),
        }
    }

    pub fn repeat(wall_time: impl Into<String>, count: usize) -> Self {
        Self {
            channel: None,
            wall_time: wall_time.into(),
            text: format!("x{count}"),
        }
    }

    pub fn is_marker(&self) -> bool {
        self.channel.is_none()
    }

    fn same_signature(&self, other: &Row) -> bool {
        self.channel == other.channel && self.text == other.text
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.channel.unwrap_or('R');
        write!(f, "{tag} {} {}", self.wall_time, self.text)
    }
}

/// Collapse immediately repeated row sequences.
///
/// Greedy left to right: at each row the smallest period `p` (up to
/// [`MAX_PERIOD`]) whose block is repeated right after it wins. The first
/// occurrence is kept, followed by a marker carrying the first row's time and
/// the repeat count; all repeats are consumed.
pub fn compress(rows: &[Row]) -> Vec<Row> {
    let n = rows.len();
    let mut out = Vec::with_capacity(n);
    let mut i = 0;

    while i < n {
        match period_at(rows, i) {
            Some(p) => {
                let mut r = 2;
                while i + (r + 1) * p <= n && block_eq(rows, i, i + r * p, p) {
                    r += 1;
                }
                out.extend_from_slice(&rows[i..i + p]);
                out.push(Row::repeat(rows[i].wall_time.clone(), r));
                i += r * p;
            }
            None => {
                out.push(rows[i].clone());
                i += 1;
            }
        }
    }
    out
}

fn period_at(rows: &[Row], i: usize) -> Option<usize> {
    let remaining = rows.len() - i;
    (1..=MAX_PERIOD.min(remaining)).find(|&p| i + 2 * p <= rows.len() && block_eq(rows, i, i + p, p))
}

fn block_eq(rows: &[Row], a: usize, b: usize, len: usize) -> bool {
    rows[a..a + len]
        .iter()
        .zip(&rows[b..b + len])
        .all(|(x, y)| x.same_signature(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(texts: &[&str]) -> Vec<Row> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Row::frame('A', format!("00:00:{i:02}.000"), *text))
            .collect()
    }

    fn rendered(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|row| row.to_string()).collect()
    }

    #[test]
    fn single_row_repeat() {
        let out = compress(&rows(&["X", "X", "X"]));
        assert_eq!(
            rendered(&out),
            vec!["A 00:00:00.000 X", "R 00:00:00.000 x3"]
        );
    }

    #[test]
    fn pair_repeat() {
        let out = compress(&rows(&["X", "Y", "X", "Y"]));
        assert_eq!(
            rendered(&out),
            vec!["A 00:00:00.000 X", "A 00:00:01.000 Y", "R 00:00:00.000 x2"]
        );
    }

    #[test]
    fn no_repeats_unchanged() {
        let input = rows(&["X", "Y", "Z", "X"]);
        assert_eq!(compress(&input), input);
    }

    #[test]
    fn smallest_period_wins() {
        // XXXX could be read as (XX)x2; the period-1 reading comes first.
        let out = compress(&rows(&["X", "X", "X", "X", "Y"]));
        assert_eq!(
            rendered(&out),
            vec!["A 00:00:00.000 X", "R 00:00:00.000 x4", "A 00:00:04.000 Y"]
        );
    }

    #[test]
    fn channel_is_part_of_signature() {
        let input = vec![
            Row::frame('A', "00:00:00.000", "X"),
            Row::frame('B', "00:00:00.001", "X"),
        ];
        assert_eq!(compress(&input), input);
    }

    #[test]
    fn period_longer_than_max_is_not_found() {
        let block: Vec<String> = (0..13).map(|i| format!("F{i}")).collect();
        let mut texts: Vec<&str> = block.iter().map(String::as_str).collect();
        texts.extend(block.iter().map(String::as_str));
        let input = rows(&texts);
        assert_eq!(compress(&input), input);
    }

    #[test]
    fn repeats_resume_after_literal() {
        let out = compress(&rows(&["A", "X", "Y", "X", "Y", "X", "Z"]));
        assert_eq!(
            rendered(&out),
            vec![
                "A 00:00:00.000 A",
                "A 00:00:01.000 X",
                "A 00:00:02.000 Y",
                "R 00:00:01.000 x2",
                "A 00:00:05.000 X",
                "A 00:00:06.000 Z",
            ]
        );
    }
}
