use crate::{
    Id, Variables,
    datatypes::{Datum, DatumLineSegment, DatumPoint},
    solver::Layout,
    vector::V,
};

/// Constructors which build constraints from the geometry a user selected.
mod selection;

pub use selection::ConstraintKind;

/// Each geometric constraint we support.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum Constraint {
    /// These two points should be a given (constant) distance apart.
    /// Only the square of the distance matters, so its sign is ignored.
    FixedDistance(DatumPoint, DatumPoint, f64),
    /// These two points should be as far apart as the given variable.
    /// The distance is solved for along with the points.
    Distance(DatumPoint, DatumPoint, Id),
    /// Some scalar value is fixed.
    Fixed(Id, f64),
    /// These two scalar values are the same.
    /// E.g. two points' X components, making them vertical.
    Equal(Id, Id),
    /// These lines should be the same length.
    CongruentLines(DatumLineSegment, DatumLineSegment),
    /// These lines should be parallel (or anti-parallel).
    Parallel(DatumLineSegment, DatumLineSegment),
    /// These lines should be perpendicular.
    Perpendicular(DatumLineSegment, DatumLineSegment),
}

/// Describes one value in one row of the Jacobian matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct JacobianVar {
    /// Which of this constraint's rows is it in?
    /// 0 for single-row constraints.
    pub row: usize,
    /// Which variable are we talking about?
    /// Corresponds to one column in the row.
    pub id: Id,
    /// What value is its partial derivative?
    pub partial_derivative: f64,
}

impl Constraint {
    /// Every variable this constraint involves, in a fixed order.
    /// A variable can appear twice, e.g. two lines sharing an endpoint.
    pub fn variables(&self) -> Vec<Id> {
        let mut out = Vec::with_capacity(8);
        self.nonzeroes(&mut out);
        out
    }

    /// Which variables are involved in this constraint's Jacobian rows?
    pub(crate) fn nonzeroes(&self, out: &mut Vec<Id>) {
        match self {
            Constraint::FixedDistance(p0, p1, _dist) => {
                out.extend(p0.all_variables());
                out.extend(p1.all_variables());
            }
            Constraint::Distance(p0, p1, dist) => {
                out.extend(p0.all_variables());
                out.extend(p1.all_variables());
                out.push(*dist);
            }
            Constraint::Fixed(id, _value) => out.push(*id),
            Constraint::Equal(a, b) => out.extend([*a, *b]),
            Constraint::CongruentLines(line0, line1)
            | Constraint::Parallel(line0, line1)
            | Constraint::Perpendicular(line0, line1) => {
                out.extend(line0.all_variables());
                out.extend(line1.all_variables());
            }
        }
    }

    /// How many equations does this constraint correspond to?
    /// Each equation is a residual function (a measure of error)
    pub fn residual_dim(&self) -> usize {
        match self {
            Constraint::FixedDistance(..) => 1,
            Constraint::Distance(..) => 1,
            Constraint::Fixed(..) => 1,
            Constraint::Equal(..) => 1,
            Constraint::CongruentLines(..) => 1,
            Constraint::Parallel(..) => 1,
            Constraint::Perpendicular(..) => 1,
        }
    }

    /// How close is this constraint to being satisfied?
    /// Writes `residual_dim()` residuals onto the end of `out`.
    /// All of them are zero when the constraint is satisfied.
    pub(crate) fn residual(
        &self,
        layout: &Layout,
        current_assignments: &[f64],
        out: &mut Vec<f64>,
    ) {
        let scalar = |id: &Id| current_assignments[layout.index_of(*id)];
        let point = |p: &DatumPoint| point_value(layout, current_assignments, *p);
        match self {
            Constraint::FixedDistance(p0, p1, expected_distance) => {
                // R = |p1 - p0|² - d²
                let delta = point(p1) - point(p0);
                out.push(delta.magnitude_squared() - expected_distance * expected_distance);
            }
            Constraint::Distance(p0, p1, dist) => {
                // R = |p1 - p0|² - d², where d is a variable.
                let delta = point(p1) - point(p0);
                let d = scalar(dist);
                out.push(delta.magnitude_squared() - d * d);
            }
            Constraint::Fixed(id, expected) => {
                out.push(scalar(id) - expected);
            }
            Constraint::Equal(a, b) => {
                // R = a - b
                out.push(scalar(a) - scalar(b));
            }
            Constraint::CongruentLines(line0, line1) => {
                // R = |u|² - |w|²
                let u = direction(layout, current_assignments, line0);
                let w = direction(layout, current_assignments, line1);
                out.push(u.magnitude_squared() - w.magnitude_squared());
            }
            Constraint::Parallel(line0, line1) => {
                // R = u × w
                let u = direction(layout, current_assignments, line0);
                let w = direction(layout, current_assignments, line1);
                out.push(u.cross_2d(&w));
            }
            Constraint::Perpendicular(line0, line1) => {
                // R = u · w
                let u = direction(layout, current_assignments, line0);
                let w = direction(layout, current_assignments, line1);
                out.push(u.dot(&w));
            }
        }
    }

    /// Used to construct part of a Jacobian matrix.
    /// Writes out the nonzero partial derivatives of each residual row.
    /// Partials for a variable which appears twice are written twice,
    /// the caller must sum them.
    pub(crate) fn jacobian(
        &self,
        layout: &Layout,
        current_assignments: &[f64],
        out: &mut Vec<JacobianVar>,
    ) {
        match self {
            Constraint::FixedDistance(p0, p1, _expected_distance) => {
                // R = (x1-x0)² + (y1-y0)² - d²
                // ∂R/∂x0 = -2(x1-x0)    ∂R/∂y0 = -2(y1-y0)
                // ∂R/∂x1 =  2(x1-x0)    ∂R/∂y1 =  2(y1-y0)
                let p0v = point_value(layout, current_assignments, *p0);
                let p1v = point_value(layout, current_assignments, *p1);
                let delta = p1v - p0v;
                push_point(out, 0, *p0, -delta * 2.0);
                push_point(out, 0, *p1, delta * 2.0);
            }
            Constraint::Distance(p0, p1, dist) => {
                // Same as FixedDistance, plus
                // ∂R/∂d = -2d
                let p0v = point_value(layout, current_assignments, *p0);
                let p1v = point_value(layout, current_assignments, *p1);
                let delta = p1v - p0v;
                let d = current_assignments[layout.index_of(*dist)];
                push_point(out, 0, *p0, -delta * 2.0);
                push_point(out, 0, *p1, delta * 2.0);
                out.push(JacobianVar {
                    row: 0,
                    id: *dist,
                    partial_derivative: -2.0 * d,
                });
            }
            Constraint::Fixed(id, _expected) => {
                out.push(JacobianVar {
                    row: 0,
                    id: *id,
                    partial_derivative: 1.0,
                });
            }
            Constraint::Equal(a, b) => {
                // R = a - b
                // ∂R/∂a = 1, ∂R/∂b = -1
                out.extend([
                    JacobianVar {
                        row: 0,
                        id: *a,
                        partial_derivative: 1.0,
                    },
                    JacobianVar {
                        row: 0,
                        id: *b,
                        partial_derivative: -1.0,
                    },
                ]);
            }
            Constraint::CongruentLines(line0, line1) => {
                // u = q0 - p0, w = q1 - p1
                // R = |u|² - |w|²
                // ∂R/∂p0 = -2u, ∂R/∂q0 = 2u
                // ∂R/∂p1 = 2w,  ∂R/∂q1 = -2w
                let u = direction(layout, current_assignments, line0);
                let w = direction(layout, current_assignments, line1);
                push_line(out, line0, u * 2.0);
                push_line(out, line1, -w * 2.0);
            }
            Constraint::Parallel(line0, line1) => {
                // R = ux*wy - uy*wx
                // ∂R/∂u = (wy, -wx), ∂R/∂w = (-uy, ux)
                let u = direction(layout, current_assignments, line0);
                let w = direction(layout, current_assignments, line1);
                push_line(out, line0, V::new(w.y, -w.x));
                push_line(out, line1, V::new(-u.y, u.x));
            }
            Constraint::Perpendicular(line0, line1) => {
                // R = ux*wx + uy*wy
                // ∂R/∂u = w, ∂R/∂w = u
                let u = direction(layout, current_assignments, line0);
                let w = direction(layout, current_assignments, line1);
                push_line(out, line0, w);
                push_line(out, line1, u);
            }
        }
    }

    /// Evaluate this constraint's residuals against the variables' current values.
    pub fn residuals_at(&self, variables: &Variables) -> Vec<f64> {
        let layout = Layout::from_constraints([self]);
        let values: Vec<f64> = layout
            .variables()
            .iter()
            .map(|id| variables.value(*id))
            .collect();
        let mut out = Vec::with_capacity(self.residual_dim());
        self.residual(&layout, &values, &mut out);
        out
    }

    /// Is this constraint satisfied by the variables' current values,
    /// to within the given tolerance?
    pub fn is_satisfied_by(&self, variables: &Variables, tolerance: f64) -> bool {
        self.residuals_at(variables)
            .iter()
            .all(|r| r.abs() <= tolerance)
    }

    /// Human-readable constraint name, useful for debugging.
    #[mutants::skip]
    pub fn constraint_kind(&self) -> &'static str {
        match self {
            Constraint::FixedDistance(..) => "FixedDistance",
            Constraint::Distance(..) => "Distance",
            Constraint::Fixed(..) => "Fixed",
            Constraint::Equal(..) => "Equal",
            Constraint::CongruentLines(..) => "CongruentLines",
            Constraint::Parallel(..) => "Parallel",
            Constraint::Perpendicular(..) => "Perpendicular",
        }
    }
}

fn point_value(layout: &Layout, current_assignments: &[f64], p: DatumPoint) -> V {
    V::new(
        current_assignments[layout.index_of(p.id_x())],
        current_assignments[layout.index_of(p.id_y())],
    )
}

/// Direction vector of the line, i.e. `p1 - p0`.
fn direction(layout: &Layout, current_assignments: &[f64], line: &DatumLineSegment) -> V {
    point_value(layout, current_assignments, line.p1)
        - point_value(layout, current_assignments, line.p0)
}

fn push_point(out: &mut Vec<JacobianVar>, row: usize, p: DatumPoint, gradient: V) {
    out.extend([
        JacobianVar {
            row,
            id: p.id_x(),
            partial_derivative: gradient.x,
        },
        JacobianVar {
            row,
            id: p.id_y(),
            partial_derivative: gradient.y,
        },
    ]);
}

/// For a residual which depends on the line only through its direction `p1 - p0`,
/// given ∂R/∂direction, write the partials for both endpoints.
fn push_line(out: &mut Vec<JacobianVar>, line: &DatumLineSegment, d_direction: V) {
    push_point(out, 0, line.p0, -d_direction);
    push_point(out, 0, line.p1, d_direction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_nearly_eq;

    /// Compare each analytic partial derivative against a central finite difference.
    fn check_jacobian(constraint: Constraint, values: &[f64]) {
        const H: f64 = 1e-6;
        let layout = Layout::from_constraints([&constraint]);
        assert_eq!(layout.n_variables(), values.len());

        let mut jvars = Vec::new();
        constraint.jacobian(&layout, values, &mut jvars);
        let mut analytic = vec![0.0; values.len()];
        for jvar in &jvars {
            assert_eq!(jvar.row, 0);
            analytic[layout.index_of(jvar.id)] += jvar.partial_derivative;
        }

        for col in 0..values.len() {
            let mut plus = values.to_vec();
            let mut minus = values.to_vec();
            plus[col] += H;
            minus[col] -= H;
            let (mut r_plus, mut r_minus) = (Vec::new(), Vec::new());
            constraint.residual(&layout, &plus, &mut r_plus);
            constraint.residual(&layout, &minus, &mut r_minus);
            let numeric = (r_plus[0] - r_minus[0]) / (2.0 * H);
            assert!(
                (numeric - analytic[col]).abs() < 1e-5,
                "{}: column {col} analytic {} numeric {numeric}",
                constraint.constraint_kind(),
                analytic[col],
            );
        }
    }

    fn p(x: Id, y: Id) -> DatumPoint {
        DatumPoint::new_xy(x, y)
    }

    fn l(a: Id) -> DatumLineSegment {
        DatumLineSegment::new(p(a, a + 1), p(a + 2, a + 3))
    }

    #[test]
    fn jacobians_match_finite_differences() {
        let eight = [1.0, 2.0, 4.5, -1.0, -3.0, 0.5, 2.0, 7.0];
        check_jacobian(Constraint::FixedDistance(p(0, 1), p(2, 3), 3.0), &eight[..4]);
        check_jacobian(
            Constraint::Distance(p(0, 1), p(2, 3), 4),
            &[1.0, 2.0, 4.5, -1.0, 2.5],
        );
        check_jacobian(Constraint::Fixed(0, 3.0), &[1.5]);
        check_jacobian(Constraint::Equal(0, 1), &[1.5, -2.0]);
        check_jacobian(Constraint::CongruentLines(l(0), l(4)), &eight);
        check_jacobian(Constraint::Parallel(l(0), l(4)), &eight);
        check_jacobian(Constraint::Perpendicular(l(0), l(4)), &eight);
    }

    #[test]
    fn shared_endpoint_partials_accumulate() {
        // Two lines meeting at point (2, 3).
        let line0 = DatumLineSegment::new(p(0, 1), p(2, 3));
        let line1 = DatumLineSegment::new(p(2, 3), p(4, 5));
        let values = [0.0, 0.0, 1.0, 0.0, 1.0, 2.0];
        check_jacobian(Constraint::Perpendicular(line0, line1), &values);
        check_jacobian(Constraint::Parallel(line0, line1), &values);
        check_jacobian(Constraint::CongruentLines(line0, line1), &values);
    }

    #[test]
    fn residuals() {
        let mut vars = Variables::new();
        let a = DatumPoint::new(&mut vars, 0.0, 0.0);
        let b = DatumPoint::new(&mut vars, 3.0, 4.0);
        let c = DatumPoint::new(&mut vars, 0.0, 1.0);
        let d = vars.push(2.0);

        let r = |c: Constraint| c.residuals_at(&vars)[0];
        assert_nearly_eq(r(Constraint::FixedDistance(a, b, 5.0)), 0.0);
        assert_nearly_eq(r(Constraint::FixedDistance(a, b, -5.0)), 0.0);
        assert_nearly_eq(r(Constraint::FixedDistance(a, b, 4.0)), 9.0);
        assert_nearly_eq(r(Constraint::Distance(a, b, d)), 21.0);
        assert_nearly_eq(r(Constraint::Fixed(b.id_x(), 1.0)), 2.0);
        assert_nearly_eq(r(Constraint::Equal(b.id_x(), b.id_y())), -1.0);

        let ab = DatumLineSegment::new(a, b);
        let ac = DatumLineSegment::new(a, c);
        // |ab|² = 25, |ac|² = 1
        assert_nearly_eq(r(Constraint::CongruentLines(ab, ac)), 24.0);
        // (3,4) × (0,1) = 3
        assert_nearly_eq(r(Constraint::Parallel(ab, ac)), 3.0);
        // (3,4) · (0,1) = 4
        assert_nearly_eq(r(Constraint::Perpendicular(ab, ac)), 4.0);
        assert!(Constraint::Parallel(ab, ab).is_satisfied_by(&vars, 1e-12));
    }

    #[test]
    fn variables_in_tuple_order() {
        let c = Constraint::Distance(p(4, 5), p(0, 1), 9);
        assert_eq!(c.variables(), vec![4, 5, 0, 1, 9]);
        assert_eq!(c.residual_dim(), 1);
        let c = Constraint::Parallel(l(0), l(10));
        assert_eq!(c.variables(), vec![0, 1, 2, 3, 10, 11, 12, 13]);
    }
}
