//! Linear model construction.
//!
//! [`LinearModel`] is the model-building half of the solver abstraction:
//! binary and continuous variables, linear constraints, and a minimization
//! objective. Backends read the finished model through the accessors; they
//! never mutate it.

/// Tolerance used when reading a solved binary variable back as 0 or 1.
///
/// Simplex arithmetic leaves solved values a few ulps away from their
/// integral bounds; anything within this distance of 0 or 1 is treated as
/// integral, anything farther away is fractional.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Identifies a variable within one [`LinearModel`].
///
/// Ids index into [`LinearModel::variables`] in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in [`LinearModel::variables`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// The domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    /// Integral, 0 or 1.
    Binary,
    /// Continuous within inclusive bounds.
    Continuous { lower: f64, upper: f64 },
}

/// A decision variable definition.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    kind: VarKind,
    objective: f64,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Coefficient of this variable in the minimization objective.
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

/// Comparison between a linear expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

/// One linear constraint: `sum(coefficient * variable) relation rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    terms: Vec<(VarId, f64)>,
    relation: Relation,
    rhs: f64,
}

impl Constraint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

/// A mixed-integer linear model with a minimization objective.
///
/// # Example
///
/// ```
/// use cohort_solver::model::{LinearModel, Relation};
///
/// let mut model = LinearModel::new("toy");
/// let x = model.add_binary("x");
/// let y = model.add_continuous("y", 0.0, 10.0);
/// model.set_objective(y, 1.0);
/// model.add_constraint("link", vec![(x, 3.0), (y, -1.0)], Relation::LessOrEqual, 0.0);
///
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.integer_count(), 1);
/// assert_eq!(model.constraint_count(), 1);
/// assert_eq!(model.nonzero_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl LinearModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        LinearModel {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a binary decision variable with objective coefficient 0.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push_variable(name.into(), VarKind::Binary)
    }

    /// Adds a continuous decision variable with objective coefficient 0.
    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.push_variable(name.into(), VarKind::Continuous { lower, upper })
    }

    /// Sets the objective coefficient of a variable.
    ///
    /// The objective is always minimized; callers needing maximization
    /// negate their coefficients.
    pub fn set_objective(&mut self, var: VarId, coefficient: f64) {
        self.variables[var.0].objective = coefficient;
    }

    /// Adds a linear constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(VarId, f64)>,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            terms,
            relation,
            rhs,
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables in insertion order; [`VarId::index`] indexes this slice.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.0]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of columns (variables).
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of integral columns.
    pub fn integer_count(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| matches!(v.kind(), VarKind::Binary))
            .count()
    }

    /// Number of rows (constraints).
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of non-zeros in the constraint matrix.
    pub fn nonzero_count(&self) -> usize {
        self.constraints
            .iter()
            .map(|c| c.terms.iter().filter(|(_, coeff)| *coeff != 0.0).count())
            .sum()
    }

    fn push_variable(&mut self, name: String, kind: VarKind) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name,
            kind,
            objective: 0.0,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_ids_index_in_insertion_order() {
        let mut model = LinearModel::new("m");
        let a = model.add_binary("a");
        let b = model.add_continuous("b", 0.0, 1.0);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(model.variable(b).name(), "b");
    }

    #[test]
    fn test_counts() {
        let mut model = LinearModel::new("m");
        let a = model.add_binary("a");
        let b = model.add_binary("b");
        let y = model.add_continuous("y", 0.0, 5.0);
        model.add_constraint(
            "c1",
            vec![(a, 1.0), (b, 1.0)],
            Relation::Equal,
            1.0,
        );
        model.add_constraint(
            "c2",
            vec![(a, 2.0), (y, -1.0), (b, 0.0)],
            Relation::LessOrEqual,
            0.0,
        );

        assert_eq!(model.variable_count(), 3);
        assert_eq!(model.integer_count(), 2);
        assert_eq!(model.constraint_count(), 2);
        // The explicit zero coefficient does not count as a non-zero.
        assert_eq!(model.nonzero_count(), 4);
    }

    #[test]
    fn test_objective_defaults_to_zero() {
        let mut model = LinearModel::new("m");
        let a = model.add_binary("a");
        assert_eq!(model.variable(a).objective(), 0.0);
        model.set_objective(a, 2.5);
        assert_eq!(model.variable(a).objective(), 2.5);
    }
}
