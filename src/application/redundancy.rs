// Objective: number of redundant meetings. The first meeting of a pair is
// free, each further one costs 1.

use crate::domain::{ExprId, Model};

use super::meeting::MeetingTable;

/// Redundancy terms, one per pair in [`PairIndex`](super::meeting::PairIndex)
/// order, and their sum registered as the minimized objective.
#[derive(Debug, Clone)]
pub struct RedundancyObjective {
    meeting_counts: Vec<ExprId>,
    terms: Vec<ExprId>,
    objective: ExprId,
}

impl RedundancyObjective {
    /// Builds `Σ_pairs max(Σ_{w,gr} meet[w][gr][pair] - 1, 0)` and sets it as
    /// the model's objective to minimize.
    pub fn new(model: &mut Model, meetings: &MeetingTable) -> Self {
        let pairs = meetings.pairs();
        let mut meeting_counts = Vec::with_capacity(pairs.len());
        let mut terms = Vec::with_capacity(pairs.len());

        for pair in pairs.iter() {
            let nb_meetings = model.sum(meetings.meetings_of(pair));
            let beyond_first = model.offset(nb_meetings, -1);
            meeting_counts.push(nb_meetings);
            terms.push(model.max(beyond_first, 0));
        }

        let objective = model.sum(terms.iter().copied());
        model.minimize(objective);

        Self {
            meeting_counts,
            terms,
            objective,
        }
    }

    /// Pair meeting count expressions, in pair index order
    pub fn meeting_counts(&self) -> &[ExprId] {
        &self.meeting_counts
    }

    /// Redundancy term expressions, in pair index order
    pub fn terms(&self) -> &[ExprId] {
        &self.terms
    }

    pub fn objective(&self) -> ExprId {
        self.objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::instance::Instance;
    use crate::application::lattice::VariableLattice;
    use crate::application::meeting::Pair;
    use crate::domain::{Expression, OptimizationType};

    fn build(instance: &Instance) -> (Model, VariableLattice, MeetingTable, RedundancyObjective) {
        let mut model = Model::new("redundancy");
        let lattice = VariableLattice::new(&mut model, instance);
        let meetings = MeetingTable::new(&mut model, instance, &lattice);
        let redundancy = RedundancyObjective::new(&mut model, &meetings);
        (model, lattice, meetings, redundancy)
    }

    #[test]
    fn test_objective_registered() {
        let instance = Instance::new(2, 2, 2).unwrap();
        let (model, _, meetings, redundancy) = build(&instance);

        let objective = model.objective().unwrap();
        assert_eq!(objective.expr, redundancy.objective());
        assert_eq!(objective.optimization_type, OptimizationType::Minimize);
        assert_eq!(redundancy.terms().len(), meetings.pairs().len());
    }

    #[test]
    fn test_term_shape() {
        let instance = Instance::new(2, 2, 3).unwrap();
        let (model, _, meetings, redundancy) = build(&instance);

        let Expression::Max { expr, floor } = model.expression(redundancy.terms()[0]) else {
            panic!("redundancy term is not a max");
        };
        assert_eq!(*floor, 0);
        let Expression::Sum { terms, constant } = model.expression(*expr) else {
            panic!("max operand is not an offset");
        };
        assert_eq!(*constant, -1);
        assert_eq!(terms, &vec![redundancy.meeting_counts()[0]]);

        let pair = Pair::new(0, 1).unwrap();
        let Expression::Sum { terms, .. } = model.expression(redundancy.meeting_counts()[0]) else {
            panic!("meeting count is not a sum");
        };
        let expected: Vec<ExprId> = meetings.meetings_of(pair).collect();
        assert_eq!(terms, &expected);
    }

    #[test]
    fn test_repeated_meetings_are_penalized() {
        let instance = Instance::new(1, 2, 3).unwrap();
        let (model, _, _, redundancy) = build(&instance);

        // One group of two: the only pair meets every week.
        let evaluated = model.evaluate(&vec![true; model.num_variables()]);
        assert_eq!(evaluated[redundancy.meeting_counts()[0].index()], 3);
        assert_eq!(evaluated[redundancy.objective().index()], 2);
    }

    #[test]
    fn test_no_pairs_gives_zero_objective() {
        let instance = Instance::new(1, 1, 4).unwrap();
        let (model, _, _, redundancy) = build(&instance);

        assert!(redundancy.terms().is_empty());
        let evaluated = model.evaluate(&vec![true; model.num_variables()]);
        assert_eq!(evaluated[redundancy.objective().index()], 0);
    }
}
