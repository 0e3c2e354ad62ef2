mod placement;
#[cfg(test)]
mod tests;

use crate::alignment::diff::diff_runs;
use crate::alignment::runs::resolve_runs;
use crate::error::VulgateError;
use crate::types::{AlignmentMatrix, TokenizedText};

use placement::{plan_witness, BaseLayout, WitnessPlan};

/// Builds the alignment matrix of `witnesses`; the first one is the base.
///
/// Every other witness is diffed against the base, its runs resolved and its
/// tokens planned into per-base-token slots. The row count of a slot is the
/// largest need of any witness (at least one row for a base token), so the
/// matrix is allocated once before any token is written.
pub fn build_alignment_matrix(
    witnesses: &[&TokenizedText],
) -> Result<AlignmentMatrix, VulgateError> {
    let Some((base, others)) = witnesses.split_first() else {
        return Err(VulgateError::config("alignment needs at least one witness"));
    };
    base.check_increments()?;
    let layout = BaseLayout::new(base);

    let mut plans = Vec::with_capacity(others.len());
    for (i, other) in others.iter().enumerate() {
        other.check_increments()?;
        let runs = resolve_runs(&diff_runs(&base.encoded, &other.encoded));
        tracing::debug!(
            column = i + 1,
            runs = ?runs,
            "vulgaligner: resolved diff runs"
        );
        plans.push(plan_witness(&layout, other, &runs)?);
    }

    let slot_rows = slot_row_budget(&layout, &plans);
    let mut slot_start = Vec::with_capacity(slot_rows.len() + 1);
    let mut total = 0;
    for rows in &slot_rows {
        slot_start.push(total);
        total += rows;
    }
    slot_start.push(total);
    tracing::debug!(
        base_tokens = layout.token_count(),
        columns = witnesses.len(),
        rows = total,
        "vulgaligner: row budget"
    );

    let mut matrix = AlignmentMatrix::empty(total, witnesses.len());
    let mut cursor = slot_rows[0];
    for (t, token) in base.tokens.iter().enumerate() {
        matrix.set(cursor, 0, token.clone());
        cursor += slot_rows[t + 1];
    }
    if cursor != total {
        return Err(VulgateError::invariant(
            "matrix fill",
            format!("base row cursor ended at {cursor}, matrix has {total} rows"),
        ));
    }

    for (i, (other, plan)) in others.iter().zip(&plans).enumerate() {
        let column = i + 1;
        let leading = plan.usage[0];
        let rows: Vec<usize> = plan
            .placements
            .iter()
            .map(|placement| {
                // slot 0 is filled flush against the first base token
                if placement.slot == 0 {
                    slot_start[1] - leading + placement.offset
                } else {
                    slot_start[placement.slot] + placement.offset
                }
            })
            .collect();
        check_column_rows(column, &rows, other.tokens.len(), total)?;
        for (token, &row) in other.tokens.iter().zip(&rows) {
            if !matrix.is_vacant(row, column) {
                return Err(VulgateError::invariant(
                    "matrix fill",
                    format!("row {row} of column {column} is outside the budget or taken"),
                ));
            }
            matrix.set(row, column, token.clone());
        }
    }
    Ok(matrix)
}

/// Every token of a column gets one row, in text order, inside the matrix.
fn check_column_rows(
    column: usize,
    rows: &[usize],
    tokens: usize,
    total: usize,
) -> Result<(), VulgateError> {
    if rows.len() != tokens {
        return Err(VulgateError::invariant(
            "matrix fill",
            format!("column {column} places {} of its {tokens} tokens", rows.len()),
        ));
    }
    if let Some(pair) = rows.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(VulgateError::invariant(
            "matrix fill",
            format!("column {column} places row {} after row {}", pair[1], pair[0]),
        ));
    }
    match rows.last() {
        Some(&last) if last >= total => Err(VulgateError::invariant(
            "matrix fill",
            format!("column {column} ends at row {last}, matrix has {total} rows"),
        )),
        _ => Ok(()),
    }
}

fn slot_row_budget(layout: &BaseLayout, plans: &[WitnessPlan]) -> Vec<usize> {
    (0..layout.slot_count())
        .map(|slot| {
            let needed = plans.iter().map(|p| p.usage[slot]).max().unwrap_or(0);
            if slot == 0 {
                needed
            } else {
                needed.max(1)
            }
        })
        .collect()
}
