use crate::error::VulgateError;
use crate::types::{CodeUnit, DiffOp, DiffRun};

/// Shortest edit script between two encoded strings as a sequence of runs.
///
/// Myers' O(ND) search in its linear-space form: common prefix and suffix
/// are stripped, then the point where a forward and a reverse search meet
/// splits the remainder in two halves that are diffed the same way. Memory
/// stays linear in the input length whatever the edit distance. Adjacent
/// runs never share an operation.
pub fn diff_runs(base: &[CodeUnit], other: &[CodeUnit]) -> Vec<DiffRun> {
    let mut runs = Vec::new();
    diff_into(&mut runs, base, other);
    runs
}

fn diff_into(runs: &mut Vec<DiffRun>, a: &[CodeUnit], b: &[CodeUnit]) {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    push_run(runs, DiffOp::Equal, prefix);
    let split = if a.is_empty() || b.is_empty() {
        None
    } else {
        bisect(a, b)
    };
    match split {
        Some((x, y)) => {
            diff_into(runs, &a[..x], &b[..y]);
            diff_into(runs, &a[x..], &b[y..]);
        }
        None => {
            push_run(runs, DiffOp::Delete, a.len());
            push_run(runs, DiffOp::Insert, b.len());
        }
    }
    push_run(runs, DiffOp::Equal, suffix);
}

/// Point of an optimal path where the forward search from the start and the
/// reverse search from the end first overlap.
///
/// Returns `None` when the strings share nothing, in which case deleting
/// `a` and inserting `b` is the shortest script. A returned point is never
/// a corner, so both halves are strictly smaller problems.
fn bisect(a: &[CodeUnit], b: &[CodeUnit]) -> Option<(usize, usize)> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let offset = max_d;
    let len = 2 * max_d + 2;
    // furthest x per diagonal, -1 where a diagonal was never reached
    let mut forward = vec![-1isize; len as usize];
    forward[(offset + 1) as usize] = 0;
    let mut reverse = forward.clone();
    let delta = n - m;
    let odd = delta % 2 != 0;
    let split = |x: isize, y: isize| {
        let inside = (0..=n).contains(&x) && (0..=m).contains(&y);
        (inside && (x, y) != (0, 0) && (x, y) != (n, m)).then_some((x as usize, y as usize))
    };

    // diagonals that left the grid are dropped from both ends of the sweep
    let (mut forward_start, mut forward_end) = (0isize, 0isize);
    let (mut reverse_start, mut reverse_end) = (0isize, 0isize);
    for d in 0..max_d {
        for k in (-d + forward_start..=d - forward_end).step_by(2) {
            let i = (offset + k) as usize;
            let mut x = if k == -d || (k != d && forward[i - 1] < forward[i + 1]) {
                forward[i + 1]
            } else {
                forward[i - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            forward[i] = x;
            if x > n {
                forward_end += 2;
            } else if y > m {
                forward_start += 2;
            } else if odd {
                let j = offset + delta - k;
                let met = (0..len).contains(&j)
                    && reverse[j as usize] != -1
                    && x >= n - reverse[j as usize];
                if let Some(point) = split(x, y).filter(|_| met) {
                    return Some(point);
                }
            }
        }

        for k in (-d + reverse_start..=d - reverse_end).step_by(2) {
            let i = (offset + k) as usize;
            let mut x = if k == -d || (k != d && reverse[i - 1] < reverse[i + 1]) {
                reverse[i + 1]
            } else {
                reverse[i - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[(n - x - 1) as usize] == b[(m - y - 1) as usize] {
                x += 1;
                y += 1;
            }
            reverse[i] = x;
            if x > n {
                reverse_end += 2;
            } else if y > m {
                reverse_start += 2;
            } else if !odd {
                let j = offset + delta - k;
                if (0..len).contains(&j) && forward[j as usize] != -1 {
                    let forward_x = forward[j as usize];
                    if forward_x >= n - x {
                        if let Some(point) = split(forward_x, offset + forward_x - j) {
                            return Some(point);
                        }
                    }
                }
            }
        }
    }
    None
}

pub(crate) fn push_run(runs: &mut Vec<DiffRun>, op: DiffOp, len: usize) {
    if len == 0 {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.op == op => last.len += len,
        _ => runs.push(DiffRun { op, len }),
    }
}

/// Checks that `runs` consume exactly `base_len` and `other_len` units.
pub fn check_conservation(
    runs: &[DiffRun],
    base_len: usize,
    other_len: usize,
) -> Result<(), VulgateError> {
    let (mut base, mut other) = (0usize, 0usize);
    for run in runs {
        match run.op {
            DiffOp::Equal => {
                base += run.len;
                other += run.len;
            }
            DiffOp::Delete => base += run.len,
            DiffOp::Insert => other += run.len,
        }
    }
    if base != base_len || other != other_len {
        return Err(VulgateError::invariant(
            "diff run conservation",
            format!(
                "runs consume {base}/{other} units, encoded strings have {base_len}/{other_len}"
            ),
        ));
    }
    Ok(())
}
