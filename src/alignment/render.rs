use crate::types::AlignmentMatrix;

pub const GAP_MARK: &str = "-";

/// Surface texts of each witness column, in row order; gaps become `-`.
pub fn column_texts(matrix: &AlignmentMatrix) -> Vec<Vec<String>> {
    (0..matrix.column_count())
        .map(|column| {
            matrix
                .rows()
                .iter()
                .map(|row| match &row[column] {
                    Some(token) => token.text.clone(),
                    None => GAP_MARK.to_string(),
                })
                .collect()
        })
        .collect()
}

/// Plain text table with one line per witness and one padded cell per row.
pub fn render_matrix(matrix: &AlignmentMatrix) -> String {
    let columns = column_texts(matrix);
    let widths: Vec<usize> = (0..matrix.row_count())
        .map(|row| {
            columns
                .iter()
                .map(|texts| display_text(&texts[row]).chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (column, texts) in columns.iter().enumerate() {
        out.push_str(&format!("{column:>2} |"));
        for (text, width) in texts.iter().zip(&widths) {
            let shown = display_text(text);
            out.push(' ');
            out.push_str(&shown);
            let pad = width.saturating_sub(shown.chars().count());
            out.extend(std::iter::repeat(' ').take(pad));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out
}

fn display_text(text: &str) -> String {
    text.replace('\n', "\\n").trim_end_matches(' ').to_string()
}
