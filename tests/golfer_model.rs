mod common;

use common::{weeks_from_orders, ScheduleSolver};
use proptest::prelude::*;
use social_golfer::{
    Instance, Schedule, ScheduleError, Solution, SolutionStatus, SocialGolferModel, SolverConfig,
};

fn solve(instance: Instance, weeks: &[Vec<Vec<usize>>]) -> (SocialGolferModel, Solution) {
    let sgm = SocialGolferModel::build(instance);
    let solver = ScheduleSolver::new(instance, weeks);
    let solution = sgm.solve(&solver, &SolverConfig::default()).unwrap();
    (sgm, solution)
}

#[test]
fn test_lattice_matches_instance_size() {
    for (groups, size, weeks) in [(1, 1, 1), (2, 2, 3), (3, 4, 2), (8, 4, 2)] {
        let instance = Instance::new(groups, size, weeks).unwrap();
        let sgm = SocialGolferModel::build(instance);
        assert_eq!(sgm.lattice().len(), weeks * groups * groups * size);
        assert_eq!(sgm.model().num_variables(), sgm.lattice().len());
    }
}

#[test]
fn test_two_groups_one_week() {
    let instance = Instance::new(2, 2, 1).unwrap();
    let (sgm, solution) = solve(instance, &[vec![vec![1, 2], vec![0, 3]]]);

    assert!(solution.is_feasible());
    assert_eq!(solution.objective_value, Some(0));

    let schedule = Schedule::extract(&sgm, &solution).unwrap();
    assert_eq!(schedule.validate(), Ok(()));
    assert_eq!(schedule.to_string(), "0\n1 2 \n0 3 \n\n");
}

#[test]
fn test_perfect_schedule_for_four_golfers_three_weeks() {
    let instance = Instance::new(2, 2, 3).unwrap();
    let weeks = vec![
        vec![vec![0, 1], vec![2, 3]],
        vec![vec![0, 2], vec![1, 3]],
        vec![vec![0, 3], vec![1, 2]],
    ];
    let (sgm, solution) = solve(instance, &weeks);

    assert_eq!(solution.objective_value, Some(0));
    let schedule = Schedule::extract(&sgm, &solution).unwrap();
    assert!(schedule.is_perfect());
    assert_eq!(schedule.pair_meeting_counts(), vec![1; 6]);
}

#[test]
fn test_repeated_pairs_cost_one_per_extra_meeting() {
    let instance = Instance::new(2, 2, 3).unwrap();
    let week = vec![vec![0, 1], vec![2, 3]];
    let (sgm, solution) = solve(instance, &[week.clone(), week.clone(), week]);

    // pairs {0,1} and {2,3} each meet three times
    assert_eq!(solution.objective_value, Some(4));
    let schedule = Schedule::extract(&sgm, &solution).unwrap();
    assert_eq!(schedule.redundant_meetings(), 4);
    assert!(!schedule.is_perfect());
}

#[test]
fn test_single_group_puts_everyone_together() {
    let instance = Instance::new(1, 3, 2).unwrap();
    let everyone = vec![vec![0, 1, 2]];
    let (sgm, solution) = solve(instance, &[everyone.clone(), everyone]);

    // three pairs, each meeting twice
    assert_eq!(solution.objective_value, Some(3));
    let schedule = Schedule::extract(&sgm, &solution).unwrap();
    assert_eq!(schedule.group(1, 0), &[0, 1, 2]);

    let (_, one_week) = solve(Instance::new(1, 3, 1).unwrap(), &[vec![vec![0, 1, 2]]]);
    assert_eq!(one_week.objective_value, Some(0));
}

#[test]
fn test_singleton_groups_never_meet() {
    let instance = Instance::new(3, 1, 4).unwrap();
    let week = vec![vec![2], vec![0], vec![1]];
    let (sgm, solution) = solve(instance, &vec![week; 4]);

    assert_eq!(solution.objective_value, Some(0));
    let schedule = Schedule::extract(&sgm, &solution).unwrap();
    assert_eq!(schedule.validate(), Ok(()));
    assert_eq!(schedule.redundant_meetings(), 0);
}

#[test]
fn test_extraction_is_idempotent() {
    let instance = Instance::new(3, 2, 2).unwrap();
    let weeks = vec![
        vec![vec![0, 1], vec![2, 3], vec![4, 5]],
        vec![vec![0, 2], vec![1, 4], vec![3, 5]],
    ];
    let (sgm, solution) = solve(instance, &weeks);

    let mut first = Vec::new();
    Schedule::extract(&sgm, &solution)
        .unwrap()
        .write_to(&mut first)
        .unwrap();
    let mut second = Vec::new();
    Schedule::extract(&sgm, &solution)
        .unwrap()
        .write_to(&mut second)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_partition_violation_is_not_an_incumbent() {
    let instance = Instance::new(2, 2, 1).unwrap();
    // golfer 3 is left out, golfer 0 plays twice
    let (sgm, solution) = solve(instance, &[vec![vec![0, 1], vec![0, 2]]]);

    assert_eq!(solution.status, SolutionStatus::TimeLimit);
    let err = Schedule::extract(&sgm, &solution).unwrap_err();
    assert!(matches!(err, ScheduleError::NoSolution(SolutionStatus::TimeLimit)));
}

fn instance_and_orders() -> impl Strategy<Value = (Instance, Vec<Vec<usize>>)> {
    (1usize..4, 1usize..4, 1usize..4).prop_flat_map(|(groups, size, weeks)| {
        let golfers: Vec<usize> = (0..groups * size).collect();
        (
            Just(Instance::new(groups, size, weeks).unwrap()),
            proptest::collection::vec(Just(golfers).prop_shuffle(), weeks),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_objective_matches_recomputed_meetings((instance, orders) in instance_and_orders()) {
        let weeks = weeks_from_orders(&instance, &orders);
        let (sgm, solution) = solve(instance, &weeks);

        prop_assert!(solution.is_feasible());
        let schedule = Schedule::extract(&sgm, &solution).unwrap();
        prop_assert_eq!(schedule.validate(), Ok(()));
        prop_assert_eq!(Some(schedule.redundant_meetings()), solution.objective_value);

        for w in 0..instance.nb_weeks() {
            for gr in 0..instance.nb_groups() {
                prop_assert_eq!(schedule.group(w, gr).len(), instance.group_size());
            }
        }

        let parsed = Schedule::parse(&schedule.to_string(), instance).unwrap();
        prop_assert_eq!(parsed, schedule);
    }
}
