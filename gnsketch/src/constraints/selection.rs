use crate::{
    datatypes::{DatumLineSegment, DatumPoint, Feature},
    error::FeatureError,
};

use super::Constraint;

/// A constraint a user can apply to some selected geometry,
/// before it's been checked against that geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(not(feature = "unstable-exhaustive"), non_exhaustive)]
pub enum ConstraintKind {
    /// Fix one point's X component to this value.
    FixedX(f64),
    /// Fix one point's Y component to this value.
    FixedY(f64),
    /// Two points, or a line's two ends, share an X component.
    Vertical,
    /// Two points, or a line's two ends, share a Y component.
    Horizontal,
    /// Two points, or a line's two ends, are this far apart.
    FixedDistance(f64),
    /// Two lines have the same length.
    CongruentLines,
    /// Two lines are parallel.
    Parallel,
    /// Two lines are perpendicular.
    Perpendicular,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::FixedX(x) => write!(f, "x = {x}"),
            ConstraintKind::FixedY(y) => write!(f, "y = {y}"),
            ConstraintKind::Vertical => write!(f, "vertical"),
            ConstraintKind::Horizontal => write!(f, "horizontal"),
            ConstraintKind::FixedDistance(d) => write!(f, "distance {d}"),
            ConstraintKind::CongruentLines => write!(f, "congruent"),
            ConstraintKind::Parallel => write!(f, "parallel"),
            ConstraintKind::Perpendicular => write!(f, "perpendicular"),
        }
    }
}

/// The shapes of selection a constraint kind can be applied to.
enum Selection {
    OnePoint(DatumPoint),
    TwoPoints(DatumPoint, DatumPoint),
    OneLine(DatumLineSegment),
    TwoLines(DatumLineSegment, DatumLineSegment),
    Other,
}

impl Selection {
    fn of(features: &[Feature]) -> Self {
        match features {
            [Feature::Point(p)] => Self::OnePoint(*p),
            [Feature::Point(a), Feature::Point(b)] => Self::TwoPoints(*a, *b),
            [Feature::Line(l)] => Self::OneLine(*l),
            [Feature::Line(l0), Feature::Line(l1)] => Self::TwoLines(*l0, *l1),
            _ => Self::Other,
        }
    }
}

impl ConstraintKind {
    /// Every kind, with placeholder values for the kinds that carry one.
    pub const ALL: [ConstraintKind; 8] = [
        ConstraintKind::FixedX(0.0),
        ConstraintKind::FixedY(0.0),
        ConstraintKind::Vertical,
        ConstraintKind::Horizontal,
        ConstraintKind::FixedDistance(0.0),
        ConstraintKind::CongruentLines,
        ConstraintKind::Parallel,
        ConstraintKind::Perpendicular,
    ];

    /// Could this kind of constraint be applied to these features?
    pub fn accepts(&self, features: &[Feature]) -> bool {
        self.try_build(features).is_some()
    }

    /// Which kinds of constraint could be applied to these features?
    /// Kinds which carry a value are returned with a placeholder of 0.
    pub fn applicable_to(features: &[Feature]) -> Vec<ConstraintKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| kind.accepts(features))
            .collect()
    }

    /// Build the constraint for these features.
    pub fn build(&self, features: &[Feature]) -> Result<Constraint, FeatureError> {
        self.try_build(features)
            .ok_or_else(|| FeatureError::InvalidFeatures {
                kind: *self,
                got: describe(features),
            })
    }

    fn try_build(&self, features: &[Feature]) -> Option<Constraint> {
        let selection = Selection::of(features);
        let constraint = match (self, selection) {
            (ConstraintKind::FixedX(val), Selection::OnePoint(p)) => {
                Constraint::Fixed(p.id_x(), *val)
            }
            (ConstraintKind::FixedY(val), Selection::OnePoint(p)) => {
                Constraint::Fixed(p.id_y(), *val)
            }
            (ConstraintKind::Vertical, Selection::TwoPoints(a, b)) => {
                Constraint::Equal(a.id_x(), b.id_x())
            }
            (ConstraintKind::Vertical, Selection::OneLine(l)) => {
                Constraint::Equal(l.p0.id_x(), l.p1.id_x())
            }
            (ConstraintKind::Horizontal, Selection::TwoPoints(a, b)) => {
                Constraint::Equal(a.id_y(), b.id_y())
            }
            (ConstraintKind::Horizontal, Selection::OneLine(l)) => {
                Constraint::Equal(l.p0.id_y(), l.p1.id_y())
            }
            (ConstraintKind::FixedDistance(d), Selection::TwoPoints(a, b)) => {
                Constraint::FixedDistance(a, b, *d)
            }
            (ConstraintKind::FixedDistance(d), Selection::OneLine(l)) => {
                Constraint::FixedDistance(l.p0, l.p1, *d)
            }
            (ConstraintKind::CongruentLines, Selection::TwoLines(l0, l1)) => {
                Constraint::CongruentLines(l0, l1)
            }
            (ConstraintKind::Parallel, Selection::TwoLines(l0, l1)) => Constraint::Parallel(l0, l1),
            (ConstraintKind::Perpendicular, Selection::TwoLines(l0, l1)) => {
                Constraint::Perpendicular(l0, l1)
            }
            _ => return None,
        };
        Some(constraint)
    }
}

fn describe(features: &[Feature]) -> String {
    let points = features
        .iter()
        .filter(|f| matches!(f, Feature::Point(_)))
        .count();
    let lines = features.len() - points;
    format!("{points} point(s) and {lines} line(s)")
}

impl Constraint {
    /// Constrain these lines to be parallel.
    pub fn lines_parallel([l0, l1]: [DatumLineSegment; 2]) -> Self {
        Self::Parallel(l0, l1)
    }

    /// Constrain these lines to be perpendicular.
    pub fn lines_perpendicular([l0, l1]: [DatumLineSegment; 2]) -> Self {
        Self::Perpendicular(l0, l1)
    }

    /// Constrain these points to share an X component.
    pub fn vertical([a, b]: [DatumPoint; 2]) -> Self {
        Self::Equal(a.id_x(), b.id_x())
    }

    /// Constrain these points to share a Y component.
    pub fn horizontal([a, b]: [DatumPoint; 2]) -> Self {
        Self::Equal(a.id_y(), b.id_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: u32) -> DatumPoint {
        DatumPoint::new_xy(x, x + 1)
    }

    fn l(x: u32) -> DatumLineSegment {
        DatumLineSegment::new(p(x), p(x + 2))
    }

    #[test]
    fn predicates() {
        let point = [Feature::Point(p(0))];
        let two_points = [Feature::Point(p(0)), Feature::Point(p(2))];
        let line = [Feature::Line(l(0))];
        let two_lines = [Feature::Line(l(0)), Feature::Line(l(4))];
        let mixed = [Feature::Point(p(0)), Feature::Line(l(4))];

        assert_eq!(
            ConstraintKind::applicable_to(&point),
            vec![ConstraintKind::FixedX(0.0), ConstraintKind::FixedY(0.0)]
        );
        assert_eq!(
            ConstraintKind::applicable_to(&two_points),
            vec![
                ConstraintKind::Vertical,
                ConstraintKind::Horizontal,
                ConstraintKind::FixedDistance(0.0)
            ]
        );
        assert_eq!(
            ConstraintKind::applicable_to(&line),
            ConstraintKind::applicable_to(&two_points)
        );
        assert_eq!(
            ConstraintKind::applicable_to(&two_lines),
            vec![
                ConstraintKind::CongruentLines,
                ConstraintKind::Parallel,
                ConstraintKind::Perpendicular
            ]
        );
        assert!(ConstraintKind::applicable_to(&mixed).is_empty());
        assert!(ConstraintKind::applicable_to(&[]).is_empty());
        let three_lines = [
            Feature::Line(l(0)),
            Feature::Line(l(4)),
            Feature::Line(l(8)),
        ];
        assert!(!ConstraintKind::Parallel.accepts(&three_lines));
    }

    #[test]
    fn builds_the_underlying_constraint() {
        let line = l(0);
        assert_eq!(
            ConstraintKind::Vertical.build(&[line.into()]).unwrap(),
            Constraint::Equal(0, 2)
        );
        assert_eq!(
            ConstraintKind::Horizontal
                .build(&[p(0).into(), p(6).into()])
                .unwrap(),
            Constraint::Equal(1, 7)
        );
        assert_eq!(
            ConstraintKind::FixedY(3.5).build(&[p(4).into()]).unwrap(),
            Constraint::Fixed(5, 3.5)
        );
        assert_eq!(
            ConstraintKind::FixedDistance(2.0)
                .build(&[line.into()])
                .unwrap(),
            Constraint::FixedDistance(p(0), p(2), 2.0)
        );
    }

    #[test]
    fn rejects_wrong_features() {
        let err = ConstraintKind::Parallel
            .build(&[p(0).into(), l(2).into()])
            .unwrap_err();
        assert_eq!(
            err,
            FeatureError::InvalidFeatures {
                kind: ConstraintKind::Parallel,
                got: "1 point(s) and 1 line(s)".to_owned(),
            }
        );
        assert!(err.to_string().contains("parallel"));
    }
}
