// Linearization of a domain Model into a mixed-integer linear program
// Shared by every MILP adapter: the adapters only translate the program into
// their backend's API.

use crate::domain::{
    ConstraintType, Expression, Model, OptimizationType, SolverStatistics, VariableType,
};

/// Column of the linear program
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
}

impl Column {
    fn binary() -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
        }
    }
}

/// `Σ coefficient * column + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffineExpr {
    pub terms: Vec<(usize, f64)>,
    pub constant: f64,
}

impl AffineExpr {
    fn column(column: usize) -> Self {
        Self {
            terms: vec![(column, 1.0)],
            constant: 0.0,
        }
    }

    fn add_scaled(&mut self, other: &AffineExpr, factor: f64) {
        self.terms
            .extend(other.terms.iter().map(|&(c, coeff)| (c, coeff * factor)));
        self.constant += other.constant * factor;
    }

    /// Merges repeated columns and drops zero coefficients
    fn normalized(mut self) -> Self {
        self.terms.sort_by_key(|&(c, _)| c);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(self.terms.len());
        for (c, coeff) in self.terms {
            match merged.last_mut() {
                Some((last, acc)) if *last == c => *acc += coeff,
                _ => merged.push((c, coeff)),
            }
        }
        merged.retain(|&(_, coeff)| coeff != 0.0);
        Self {
            terms: merged,
            constant: self.constant,
        }
    }
}

/// Row `Σ coefficient * column <op> bound`
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub terms: Vec<(usize, f64)>,
    pub constraint_type: ConstraintType,
    pub bound: f64,
    pub name: String,
}

/// Mixed-integer linear program equivalent to a [`Model`]
///
/// Columns `0..model.num_variables()` are the model's boolean variables, by
/// ordinal. Auxiliary columns follow.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub objective: AffineExpr,
    pub optimization_type: OptimizationType,
    num_variables: usize,
}

impl LinearProgram {
    /// Linearizes `model`
    ///
    /// - `AND(a, b)` becomes a binary column `m` with `m <= a`, `m <= b` and
    ///   `m >= a + b - 1`.
    /// - `max(e, c)` becomes an integer column `r >= c` with `r >= e`. This
    ///   is exact as long as the node only pushes a minimized objective up.
    pub fn from_model(model: &Model) -> Self {
        let num_variables = model.num_variables();
        let mut lp = Self {
            columns: vec![Column::binary(); num_variables],
            rows: Vec::new(),
            objective: AffineExpr::default(),
            optimization_type: OptimizationType::Minimize,
            num_variables,
        };

        let mut forms: Vec<AffineExpr> = Vec::with_capacity(model.num_expressions());
        for (id, expression) in model.expressions().iter().enumerate() {
            let form = match expression {
                Expression::Var(ordinal) => AffineExpr::column(*ordinal),
                Expression::Sum { terms, constant } => {
                    let mut sum = AffineExpr {
                        terms: Vec::new(),
                        constant: *constant as f64,
                    };
                    for term in terms {
                        sum.add_scaled(&forms[term.index()], 1.0);
                    }
                    sum
                }
                Expression::And(lhs, rhs) => {
                    let m = lp.add_column(Column::binary());
                    let both = AffineExpr::column(m);
                    let (a, b) = (&forms[lhs.index()], &forms[rhs.index()]);

                    let mut below_a = both.clone();
                    below_a.add_scaled(a, -1.0);
                    lp.push_row(below_a, ConstraintType::LessThanOrEqual, 0.0, format!("and{}_a", id));

                    let mut below_b = both.clone();
                    below_b.add_scaled(b, -1.0);
                    lp.push_row(below_b, ConstraintType::LessThanOrEqual, 0.0, format!("and{}_b", id));

                    let mut above_both = both.clone();
                    above_both.add_scaled(a, -1.0);
                    above_both.add_scaled(b, -1.0);
                    lp.push_row(
                        above_both,
                        ConstraintType::GreaterThanOrEqual,
                        -1.0,
                        format!("and{}_ab", id),
                    );
                    both
                }
                Expression::Max { expr, floor } => {
                    let r = lp.add_column(Column {
                        variable_type: VariableType::Integer,
                        lower_bound: *floor as f64,
                        upper_bound: None,
                    });
                    let upper = AffineExpr::column(r);
                    let mut above = upper.clone();
                    above.add_scaled(&forms[expr.index()], -1.0);
                    lp.push_row(above, ConstraintType::GreaterThanOrEqual, 0.0, format!("max{}", id));
                    upper
                }
            };
            forms.push(form);
        }

        for constraint in model.constraints() {
            lp.push_row(
                forms[constraint.expr.index()].clone(),
                constraint.constraint_type,
                constraint.bound as f64,
                constraint.name.clone(),
            );
        }

        if let Some(objective) = model.objective() {
            lp.objective = forms[objective.expr.index()].clone().normalized();
            lp.optimization_type = objective.optimization_type;
        }

        log::debug!(
            "Linearized '{}': {} columns ({} auxiliary), {} rows",
            model.name,
            lp.columns.len(),
            lp.columns.len() - num_variables,
            lp.rows.len()
        );
        lp
    }

    fn add_column(&mut self, column: Column) -> usize {
        self.columns.push(column);
        self.columns.len() - 1
    }

    /// Adds `expr <op> rhs`, moving the constant of `expr` to the bound
    fn push_row(&mut self, expr: AffineExpr, constraint_type: ConstraintType, rhs: f64, name: String) {
        let expr = expr.normalized();
        self.rows.push(Row {
            terms: expr.terms,
            constraint_type,
            bound: rhs - expr.constant,
            name,
        });
    }

    /// Number of columns standing for model variables
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Objective cost of every column, dense
    pub fn objective_costs(&self) -> Vec<f64> {
        let mut costs = vec![0.0; self.columns.len()];
        for &(c, coeff) in &self.objective.terms {
            costs[c] += coeff;
        }
        costs
    }

    /// Rounds the model-variable columns of a backend's answer to booleans
    pub fn variable_values(&self, column_values: &[f64]) -> Vec<bool> {
        column_values
            .iter()
            .take(self.num_variables)
            .map(|&v| v > 0.5)
            .collect()
    }

    pub fn statistics(&self, model: &Model, solve_time_ms: f64) -> SolverStatistics {
        SolverStatistics {
            solve_time_ms,
            num_variables: model.num_variables() as u32,
            num_constraints: model.num_constraints() as u32,
            num_columns: self.columns.len() as u32,
            num_rows: self.rows.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Instance, SocialGolferModel};
    use crate::domain::Constraint;

    fn row_holds(row: &Row, values: &[f64]) -> bool {
        let lhs: f64 = row.terms.iter().map(|&(c, coeff)| coeff * values[c]).sum();
        match row.constraint_type {
            ConstraintType::LessThanOrEqual => lhs <= row.bound + 1e-9,
            ConstraintType::Equal => (lhs - row.bound).abs() <= 1e-9,
            ConstraintType::GreaterThanOrEqual => lhs >= row.bound - 1e-9,
        }
    }

    fn feasible(lp: &LinearProgram, values: &[f64]) -> bool {
        lp.rows.iter().all(|row| row_holds(row, values))
            && lp.columns.iter().zip(values).all(|(col, &v)| {
                v >= col.lower_bound - 1e-9 && col.upper_bound.map_or(true, |u| v <= u + 1e-9)
            })
    }

    #[test]
    fn test_and_encoding_matches_truth_table() {
        let mut model = Model::new("and");
        let a = model.bool_var();
        let b = model.bool_var();
        let both = model.and(a.expr(), b.expr());
        model.minimize(both);
        let lp = LinearProgram::from_model(&model);

        assert_eq!(lp.columns.len(), 3);
        assert_eq!(lp.rows.len(), 3);
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                let expected = if x == 1.0 && y == 1.0 { 1.0 } else { 0.0 };
                assert!(feasible(&lp, &[x, y, expected]));
                assert!(!feasible(&lp, &[x, y, 1.0 - expected]));
            }
        }
    }

    #[test]
    fn test_max_encoding_lower_envelope() {
        let mut model = Model::new("max");
        let vars: Vec<_> = (0..3).map(|_| model.bool_var()).collect();
        let count = model.sum(vars.iter().map(|v| v.expr()));
        let excess = model.offset(count, -1);
        let term = model.max(excess, 0);
        model.minimize(term);
        let lp = LinearProgram::from_model(&model);

        assert_eq!(lp.columns.len(), 4);
        assert_eq!(lp.columns[3].lower_bound, 0.0);
        assert_eq!(lp.rows.len(), 1);
        let row = &lp.rows[0];
        assert_eq!(row.terms, vec![(0, -1.0), (1, -1.0), (2, -1.0), (3, 1.0)]);
        assert_eq!(row.bound, -1.0);
        assert_eq!(lp.objective.terms, vec![(3, 1.0)]);

        for ones in 0..=3 {
            let mut values = vec![0.0; 4];
            for v in values.iter_mut().take(ones) {
                *v = 1.0;
            }
            let evaluated = model.evaluate(&(0..3).map(|i| i < ones).collect::<Vec<_>>());
            values[3] = evaluated[term.index()] as f64;
            // the graph value is the smallest feasible value of the column
            assert!(feasible(&lp, &values));
            if values[3] > 0.0 {
                values[3] -= 1.0;
                assert!(!feasible(&lp, &values));
            }
        }
    }

    #[test]
    fn test_constraint_rows_and_duplicates() {
        let mut model = Model::new("rows");
        let a = model.bool_var();
        let twice = model.sum([a.expr(), a.expr()]);
        let shifted = model.offset(twice, 3);
        model.add_constraint(Constraint::equal(shifted, 5).with_name("twice a plus three"));
        model.maximize(shifted);
        let lp = LinearProgram::from_model(&model);

        assert_eq!(lp.rows.len(), 1);
        assert_eq!(lp.rows[0].terms, vec![(0, 2.0)]);
        assert_eq!(lp.rows[0].bound, 2.0);
        assert_eq!(lp.rows[0].name, "twice a plus three");
        assert_eq!(lp.optimization_type, OptimizationType::Maximize);
        assert_eq!(lp.objective.constant, 3.0);
        assert_eq!(lp.objective_costs(), vec![2.0]);
    }

    #[test]
    fn test_golfer_program_size() {
        let sgm = SocialGolferModel::build(Instance::new(2, 2, 1).unwrap());
        let lp = LinearProgram::from_model(sgm.model());

        // 8 assignments, 12 meetings, 6 redundancy terms
        assert_eq!(lp.num_variables(), 8);
        assert_eq!(lp.columns.len(), 8 + 12 + 6);
        // 3 rows per meeting, 1 per term, 4 + 2 partition rows
        assert_eq!(lp.rows.len(), 36 + 6 + 6);
    }

    #[test]
    fn test_variable_values_rounding() {
        let sgm = SocialGolferModel::build(Instance::new(1, 2, 1).unwrap());
        let lp = LinearProgram::from_model(sgm.model());
        let mut columns = vec![0.0; lp.columns.len()];
        columns[0] = 0.9999;
        columns[1] = 1e-7;
        assert_eq!(lp.variable_values(&columns), vec![true, false]);
    }
}
