use crate::alignment::diff::push_run;
use crate::types::{DiffOp, DiffRun};

/// Merges every block of delete/insert runs lying between two equal runs.
///
/// Within a block of `minus` deleted and `plus` inserted units, the first
/// `min(minus, plus)` units are aligned (emitted as equal even though the
/// texts differ) and the remainder stays a pure delete or insert, emitted
/// after the aligned part.
pub fn resolve_runs(runs: &[DiffRun]) -> Vec<DiffRun> {
    let mut resolved = Vec::with_capacity(runs.len());
    let (mut minus, mut plus) = (0usize, 0usize);
    for run in runs {
        match run.op {
            DiffOp::Delete => minus += run.len,
            DiffOp::Insert => plus += run.len,
            DiffOp::Equal => {
                flush_block(&mut resolved, minus, plus);
                minus = 0;
                plus = 0;
                push_run(&mut resolved, DiffOp::Equal, run.len);
            }
        }
    }
    flush_block(&mut resolved, minus, plus);
    resolved
}

fn flush_block(resolved: &mut Vec<DiffRun>, minus: usize, plus: usize) {
    let overlap = minus.min(plus);
    push_run(resolved, DiffOp::Equal, overlap);
    push_run(resolved, DiffOp::Delete, minus - overlap);
    push_run(resolved, DiffOp::Insert, plus - overlap);
}
