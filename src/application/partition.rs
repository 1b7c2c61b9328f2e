// Weekly partition constraints over the assignment lattice

use crate::domain::{Constraint, Model};

use super::instance::Instance;
use super::lattice::VariableLattice;

/// Number of constraints added by [`add_partition_constraints`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionCounts {
    pub one_group_per_week: usize,
    pub group_size: usize,
}

/// Adds both partition families to `model`:
///
/// - every golfer is in exactly one group each week,
/// - every group holds exactly `groupSize` golfers each week.
///
/// Degenerate instances (a single group, groups of one) still get both
/// families.
pub fn add_partition_constraints(
    model: &mut Model,
    instance: &Instance,
    lattice: &VariableLattice,
) -> PartitionCounts {
    let mut counts = PartitionCounts {
        one_group_per_week: 0,
        group_size: 0,
    };

    for w in 0..instance.nb_weeks() {
        for gf in 0..instance.nb_golfers() {
            let groups_assigned = model.sum(lattice.golfer_week(w, gf).map(|x| x.expr()));
            model.add_constraint(
                Constraint::equal(groups_assigned, 1)
                    .with_name(format!("week {} golfer {} plays once", w, gf)),
            );
            counts.one_group_per_week += 1;
        }
    }

    let group_size = instance.group_size() as i64;
    for w in 0..instance.nb_weeks() {
        for gr in 0..instance.nb_groups() {
            let golfers_in_group = model.sum(lattice.group(w, gr).iter().map(|x| x.expr()));
            model.add_constraint(
                Constraint::equal(golfers_in_group, group_size)
                    .with_name(format!("week {} group {} has {} golfers", w, gr, group_size)),
            );
            counts.group_size += 1;
        }
    }

    log::debug!(
        "Partition constraints: {} one-group-per-week, {} group-size",
        counts.one_group_per_week,
        counts.group_size
    );
    counts
}
