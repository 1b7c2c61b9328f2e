// Assignment variables x[w][gr][gf]: golfer gf plays in group gr on week w

use crate::domain::{BoolVar, Model, Solution};

use super::instance::Instance;

/// Address of one assignment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub week: usize,
    pub group: usize,
    pub golfer: usize,
}

impl Slot {
    pub fn new(week: usize, group: usize, golfer: usize) -> Self {
        Self {
            week,
            group,
            golfer,
        }
    }
}

/// Dense `nbWeeks × nbGroups × nbGolfers` block of boolean variables
///
/// Stored in one allocation, golfer-major within each (week, group).
#[derive(Debug, Clone)]
pub struct VariableLattice {
    nb_weeks: usize,
    nb_groups: usize,
    nb_golfers: usize,
    vars: Vec<BoolVar>,
}

impl VariableLattice {
    /// Allocates one variable per slot of the instance in `model`
    pub fn new(model: &mut Model, instance: &Instance) -> Self {
        let len = instance.nb_slots();
        let mut vars = Vec::with_capacity(len);
        for _ in 0..len {
            vars.push(model.bool_var());
        }
        Self {
            nb_weeks: instance.nb_weeks(),
            nb_groups: instance.nb_groups(),
            nb_golfers: instance.nb_golfers(),
            vars,
        }
    }

    #[inline]
    fn index(&self, slot: Slot) -> usize {
        assert!(
            slot.week < self.nb_weeks && slot.group < self.nb_groups && slot.golfer < self.nb_golfers,
            "slot {:?} out of range",
            slot
        );
        (slot.week * self.nb_groups + slot.group) * self.nb_golfers + slot.golfer
    }

    pub fn var(&self, week: usize, group: usize, golfer: usize) -> BoolVar {
        self.at(Slot::new(week, group, golfer))
    }

    pub fn at(&self, slot: Slot) -> BoolVar {
        self.vars[self.index(slot)]
    }

    /// Variables of one (week, group), in golfer order
    pub fn group(&self, week: usize, group: usize) -> &[BoolVar] {
        let start = self.index(Slot::new(week, group, 0));
        &self.vars[start..start + self.nb_golfers]
    }

    /// Variables placing `golfer` in each group of `week`, in group order
    pub fn golfer_week(&self, week: usize, golfer: usize) -> impl Iterator<Item = BoolVar> + '_ {
        (0..self.nb_groups).map(move |group| self.var(week, group, golfer))
    }

    /// Post-solve value of a slot, `None` when the solution has no incumbent
    pub fn value(&self, solution: &Solution, slot: Slot) -> Option<bool> {
        solution.bool_value(self.at(slot))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, BoolVar)> + '_ {
        let (groups, golfers) = (self.nb_groups, self.nb_golfers);
        self.vars.iter().enumerate().map(move |(i, var)| {
            let slot = Slot::new(i / (groups * golfers), (i / golfers) % groups, i % golfers);
            (slot, *var)
        })
    }
}
