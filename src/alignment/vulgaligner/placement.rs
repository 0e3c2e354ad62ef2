use crate::alignment::diff::check_conservation;
use crate::error::VulgateError;
use crate::types::{DiffOp, DiffRun, TokenizedText};

/// Unit layout of the base witness.
///
/// Slot `s >= 1` is the group of rows hosted by base token `s - 1`; slot 0
/// holds whatever other witnesses place before the first base token.
#[derive(Debug)]
pub(crate) struct BaseLayout {
    /// `prefix[t]` is the number of units before base token `t`.
    prefix: Vec<usize>,
    increments: Vec<u8>,
    /// Base token owning each base unit.
    owner: Vec<usize>,
}

impl BaseLayout {
    pub(crate) fn new(base: &TokenizedText) -> Self {
        let mut prefix = Vec::with_capacity(base.tokens.len() + 1);
        let mut owner = Vec::with_capacity(base.encoded.len());
        let mut units = 0;
        for (t, token) in base.tokens.iter().enumerate() {
            prefix.push(units);
            for _ in 0..token.position_increment {
                owner.push(t);
            }
            units += token.position_increment as usize;
        }
        prefix.push(units);
        Self {
            prefix,
            increments: base.tokens.iter().map(|t| t.position_increment).collect(),
            owner,
        }
    }

    pub(crate) fn token_count(&self) -> usize {
        self.increments.len()
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.token_count() + 1
    }

    pub(crate) fn unit_count(&self) -> usize {
        self.owner.len()
    }

    fn slot_of_unit(&self, unit: usize) -> Option<usize> {
        self.owner.get(unit).map(|&t| t + 1)
    }

    /// Slot of the first ignorable base token, from `first_slot` on, sitting
    /// exactly at the alignment frontier.
    fn ignorable_slot_at(&self, first_slot: usize, frontier: usize) -> Option<usize> {
        (first_slot..self.token_count())
            .take_while(|&t| self.prefix[t] <= frontier)
            .find(|&t| self.increments[t] == 0 && self.prefix[t] == frontier)
            .map(|t| t + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    pub slot: usize,
    /// Row index inside the slot.
    pub offset: usize,
}

/// Where every token of one other witness goes, and how many rows each slot
/// needs for it.
#[derive(Debug)]
pub(crate) struct WitnessPlan {
    pub placements: Vec<Placement>,
    pub usage: Vec<usize>,
}

/// Base unit aligned with each other unit, and base units consumed when
/// reaching it (one extra entry for the end of the other string).
fn map_units(runs: &[DiffRun], other_units: usize) -> (Vec<Option<usize>>, Vec<usize>) {
    let mut aligned = Vec::with_capacity(other_units);
    let mut frontier = Vec::with_capacity(other_units + 1);
    let mut base_unit = 0;
    for run in runs {
        match run.op {
            DiffOp::Equal => {
                for _ in 0..run.len {
                    frontier.push(base_unit);
                    aligned.push(Some(base_unit));
                    base_unit += 1;
                }
            }
            DiffOp::Delete => base_unit += run.len,
            DiffOp::Insert => {
                for _ in 0..run.len {
                    frontier.push(base_unit);
                    aligned.push(None);
                }
            }
        }
    }
    frontier.push(base_unit);
    (aligned, frontier)
}

/// Places the tokens of `other` against the base layout.
///
/// A non-ignorable token goes to the slot of the base token its first unit
/// is aligned with, when that slot lies ahead; an ignorable token goes to the
/// slot of an ignorable base token found exactly at the frontier. Any other
/// token trails the previously placed one in the current slot.
pub(crate) fn plan_witness(
    layout: &BaseLayout,
    other: &TokenizedText,
    runs: &[DiffRun],
) -> Result<WitnessPlan, VulgateError> {
    check_conservation(runs, layout.unit_count(), other.encoded.len())?;
    let (aligned, frontier) = map_units(runs, other.encoded.len());

    let mut placements = Vec::with_capacity(other.tokens.len());
    let mut usage = vec![0usize; layout.slot_count()];
    let mut current_slot = 0;
    let mut next_offset = 0;
    let mut unit = 0;
    for token in &other.tokens {
        let target = if token.position_increment > 0 {
            aligned
                .get(unit)
                .copied()
                .flatten()
                .and_then(|base_unit| layout.slot_of_unit(base_unit))
        } else {
            frontier
                .get(unit)
                .and_then(|&f| layout.ignorable_slot_at(current_slot, f))
        };
        if let Some(slot) = target.filter(|&slot| slot > current_slot) {
            current_slot = slot;
            next_offset = 0;
        }
        placements.push(Placement {
            slot: current_slot,
            offset: next_offset,
        });
        next_offset += 1;
        usage[current_slot] = usage[current_slot].max(next_offset);
        unit += token.position_increment as usize;
    }
    Ok(WitnessPlan { placements, usage })
}
