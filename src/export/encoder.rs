//! CSV line encoding.
//!
//! RFC 4180 quoting with two fixed deviations: lines always end in `\n`, and
//! a row consisting of a single empty cell is written as `""` so it cannot
//! collapse into a blank line.

const DELIMITER: char = ',';
const QUOTE: char = '"';
const LINE_TERMINATOR: char = '\n';

/// Encodes one row of cells as a single CSV line, terminator included.
pub fn encode_row<S: AsRef<str>>(cells: &[S]) -> String {
    let lone_cell = cells.len() == 1;
    let mut line = String::with_capacity(cells.iter().map(|c| c.as_ref().len() + 1).sum::<usize>() + 1);

    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        let cell = cell.as_ref();
        if needs_quotes(cell, lone_cell) {
            line.push(QUOTE);
            line.push_str(&cell.replace(QUOTE, "\"\""));
            line.push(QUOTE);
        } else {
            line.push_str(cell);
        }
    }

    line.push(LINE_TERMINATOR);
    line
}

fn needs_quotes(cell: &str, lone_cell: bool) -> bool {
    cell.contains([LINE_TERMINATOR, DELIMITER, QUOTE]) || (cell.is_empty() && lone_cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_cells_are_joined() {
        assert_eq!(encode_row(&["x", "y"]), "x,y\n");
    }

    #[test]
    fn commas_force_quotes() {
        assert_eq!(encode_row(&["a,b"]), "\"a,b\"\n");
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(encode_row(&["a\"b"]), "\"a\"\"b\"\n");
    }

    #[test]
    fn newlines_force_quotes() {
        assert_eq!(encode_row(&["line1\nline2", "z"]), "\"line1\nline2\",z\n");
    }

    #[test]
    fn lone_empty_cell_is_quoted() {
        assert_eq!(encode_row(&[""]), "\"\"\n");
    }

    #[test]
    fn empty_cell_among_others_is_bare() {
        assert_eq!(encode_row(&["3", ""]), "3,\n");
        assert_eq!(encode_row(&["", "", ""]), ",,\n");
    }

    #[test]
    fn whitespace_and_carriage_returns_pass_through() {
        assert_eq!(encode_row(&[" padded ", "a\rb"]), " padded ,a\rb\n");
    }

    #[test]
    fn zero_cells_is_a_bare_terminator() {
        let none: [&str; 0] = [];
        assert_eq!(encode_row(&none), "\n");
    }
}
