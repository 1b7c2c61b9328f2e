use std::time::Duration;

use super::value_objects::{ConstraintType, OptimizationType, SolutionStatus, SolverBackend};

/// Handle to a node of a [`Model`] expression graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

impl ExprId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Boolean decision variable of a [`Model`]
///
/// `ordinal` is the position of the variable among the model's variables
/// (and in [`Solution::variable_values`]); `expr` is the graph node that
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar {
    ordinal: usize,
    expr: ExprId,
}

impl BoolVar {
    pub fn ordinal(self) -> usize {
        self.ordinal
    }

    pub fn expr(self) -> ExprId {
        self.expr
    }
}

/// Node of the expression graph
///
/// Children always have a smaller id than their parent, so a single forward
/// pass evaluates the whole graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Value of the boolean variable with this ordinal (0 or 1)
    Var(usize),
    /// Sum of the operands plus a constant
    Sum { terms: Vec<ExprId>, constant: i64 },
    /// Logical AND of two boolean-valued operands
    And(ExprId, ExprId),
    /// Maximum of an operand and a constant
    Max { expr: ExprId, floor: i64 },
}

/// Linear requirement `expr <op> bound` enforced by the engine
#[derive(Debug, Clone)]
pub struct Constraint {
    pub expr: ExprId,
    pub constraint_type: ConstraintType,
    pub bound: i64,
    pub name: String,
}

impl Constraint {
    pub fn new(expr: ExprId, constraint_type: ConstraintType, bound: i64) -> Self {
        Self {
            expr,
            constraint_type,
            bound,
            name: String::new(),
        }
    }

    pub fn equal(expr: ExprId, bound: i64) -> Self {
        Self::new(expr, ConstraintType::Equal, bound)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Objective expression and its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Objective {
    pub expr: ExprId,
    pub optimization_type: OptimizationType,
}

/// Engine-agnostic optimization model
///
/// Holds boolean variables, derived expressions built from them, constraints
/// over those expressions and at most one objective. Engines receive the
/// model by reference and never mutate it.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    expressions: Vec<Expression>,
    variables: Vec<ExprId>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn push(&mut self, expression: Expression) -> ExprId {
        let id = ExprId(self.expressions.len());
        self.expressions.push(expression);
        id
    }

    /// Creates a new boolean decision variable
    pub fn bool_var(&mut self) -> BoolVar {
        let ordinal = self.variables.len();
        let expr = self.push(Expression::Var(ordinal));
        self.variables.push(expr);
        BoolVar { ordinal, expr }
    }

    /// Sum of the given expressions. An empty sum is the constant 0.
    pub fn sum<I>(&mut self, terms: I) -> ExprId
    where
        I: IntoIterator<Item = ExprId>,
    {
        self.push(Expression::Sum {
            terms: terms.into_iter().collect(),
            constant: 0,
        })
    }

    /// `expr + constant`
    pub fn offset(&mut self, expr: ExprId, constant: i64) -> ExprId {
        self.push(Expression::Sum {
            terms: vec![expr],
            constant,
        })
    }

    /// Logical AND of two boolean-valued expressions
    pub fn and(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.push(Expression::And(lhs, rhs))
    }

    /// `max(expr, floor)`
    pub fn max(&mut self, expr: ExprId, floor: i64) -> ExprId {
        self.push(Expression::Max { expr, floor })
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn minimize(&mut self, expr: ExprId) {
        self.objective = Some(Objective {
            expr,
            optimization_type: OptimizationType::Minimize,
        });
    }

    pub fn maximize(&mut self, expr: ExprId) {
        self.objective = Some(Objective {
            expr,
            optimization_type: OptimizationType::Maximize,
        });
    }

    pub fn expression(&self, id: ExprId) -> &Expression {
        &self.expressions[id.0]
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<Objective> {
        self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_expressions(&self) -> usize {
        self.expressions.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Checks that every reference in the graph points at an existing,
    /// earlier node. Returns one message per problem found.
    pub fn structural_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (i, expression) in self.expressions.iter().enumerate() {
            let children: Vec<ExprId> = match expression {
                Expression::Var(ordinal) => {
                    if self.variables.get(*ordinal) != Some(&ExprId(i)) {
                        errors.push(format!("Node {} reads unknown variable {}", i, ordinal));
                    }
                    Vec::new()
                }
                Expression::Sum { terms, .. } => terms.clone(),
                Expression::And(lhs, rhs) => vec![*lhs, *rhs],
                Expression::Max { expr, .. } => vec![*expr],
            };
            for child in children {
                if child.0 >= i {
                    errors.push(format!("Node {} references later node {}", i, child.0));
                }
            }
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if constraint.expr.0 >= self.expressions.len() {
                errors.push(format!(
                    "Constraint {} '{}' references unknown node {}",
                    i, constraint.name, constraint.expr.0
                ));
            }
        }
        match self.objective {
            None => errors.push("Model has no objective".to_string()),
            Some(objective) if objective.expr.0 >= self.expressions.len() => errors.push(format!(
                "Objective references unknown node {}",
                objective.expr.0
            )),
            Some(_) => {}
        }
        errors
    }

    /// Evaluates every node of the graph under a boolean assignment
    ///
    /// `values` holds one entry per variable, indexed by ordinal.
    pub fn evaluate(&self, values: &[bool]) -> Vec<i64> {
        debug_assert_eq!(values.len(), self.variables.len());
        let mut evaluated: Vec<i64> = Vec::with_capacity(self.expressions.len());
        for expression in &self.expressions {
            let value = match expression {
                Expression::Var(ordinal) => i64::from(values[*ordinal]),
                Expression::Sum { terms, constant } => {
                    terms.iter().map(|t| evaluated[t.0]).sum::<i64>() + constant
                }
                Expression::And(lhs, rhs) => {
                    i64::from(evaluated[lhs.0] != 0 && evaluated[rhs.0] != 0)
                }
                Expression::Max { expr, floor } => evaluated[expr.0].max(*floor),
            };
            evaluated.push(value);
        }
        evaluated
    }

    /// First constraint that `evaluated` (from [`Model::evaluate`]) breaks
    pub fn first_violation(&self, evaluated: &[i64]) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| !c.constraint_type.holds(evaluated[c.expr.0], c.bound))
    }
}

/// Configuration for a solve call
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Duration,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: Duration::from_secs(10),
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_columns: u32,
    pub num_rows: u32,
}

/// Result of a solve call
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: Option<i64>,
    /// One value per model variable, empty when there is no incumbent
    pub variable_values: Vec<bool>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    /// Builds a solution from an engine's raw assignment
    ///
    /// The objective is recomputed from the graph. An assignment that breaks
    /// a model constraint is not an incumbent: the result is downgraded to
    /// [`SolutionStatus::TimeLimit`] without values.
    pub fn from_assignment(model: &Model, status: SolutionStatus, values: Vec<bool>) -> Self {
        if values.len() != model.num_variables() {
            return Self::new(
                SolutionStatus::TimeLimit,
                format!(
                    "Engine returned {} values for {} variables",
                    values.len(),
                    model.num_variables()
                ),
            );
        }
        let evaluated = model.evaluate(&values);
        if let Some(violated) = model.first_violation(&evaluated) {
            log::warn!(
                "Discarding {} assignment: constraint '{}' is violated",
                status,
                violated.name
            );
            return Self::new(
                SolutionStatus::TimeLimit,
                format!("No feasible assignment found (constraint '{}' violated)", violated.name),
            );
        }
        Self {
            status,
            objective_value: model.objective().map(|o| evaluated[o.expr.0]),
            variable_values: values,
            message: format!("{} solution found for '{}'", status, model.name),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Post-solve value of a variable, `None` without an incumbent
    pub fn bool_value(&self, var: BoolVar) -> Option<bool> {
        self.variable_values.get(var.ordinal).copied()
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn is_feasible(&self) -> bool {
        self.status.has_incumbent() && !self.variable_values.is_empty()
    }
}
