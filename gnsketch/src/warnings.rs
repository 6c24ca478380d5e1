use indexmap::IndexMap;

use crate::{Constraint, Id};

/// Something that looks wrong with a constraint, even though it can be solved.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Warning {
    /// Index of the constraint this is about, if it's about one.
    pub about_constraint: Option<usize>,
    /// What's wrong.
    pub content: WarningContent,
}

/// What looks wrong.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
#[non_exhaustive]
pub enum WarningContent {
    /// A fixed distance was negative. Only its square matters,
    /// so this is the same as constraining to its absolute value.
    NegativeDistance(f64),
    /// This variable is already fixed to a different value by an earlier constraint,
    /// so the system can't be solved.
    ConflictingFixed {
        /// The doubly-fixed variable.
        variable: Id,
        /// Which constraint fixed it first.
        first_constraint: usize,
        /// Value it was fixed to first.
        first: f64,
        /// Value this constraint fixes it to.
        second: f64,
    },
    /// A line's two ends are the same point, so it has no direction or length.
    DegenerateLine,
}

/// Look for suspicious constraints.
pub fn lint(constraints: &[Constraint]) -> Vec<Warning> {
    let mut warnings = Vec::default();
    let mut fixed: IndexMap<Id, (usize, f64)> = IndexMap::new();
    for (i, constraint) in constraints.iter().enumerate() {
        match constraint {
            Constraint::FixedDistance(_, _, d) if *d < 0.0 => {
                warnings.push(Warning {
                    about_constraint: Some(i),
                    content: WarningContent::NegativeDistance(*d),
                });
            }
            Constraint::Fixed(id, value) => {
                if let Some((first_constraint, first)) = fixed.get(id).copied() {
                    if !nearly_eq(first, *value) {
                        warnings.push(Warning {
                            about_constraint: Some(i),
                            content: WarningContent::ConflictingFixed {
                                variable: *id,
                                first_constraint,
                                first,
                                second: *value,
                            },
                        });
                    }
                } else {
                    fixed.insert(*id, (i, *value));
                }
            }
            Constraint::CongruentLines(l0, l1)
            | Constraint::Parallel(l0, l1)
            | Constraint::Perpendicular(l0, l1)
                if l0.is_degenerate() || l1.is_degenerate() =>
            {
                warnings.push(Warning {
                    about_constraint: Some(i),
                    content: WarningContent::DegenerateLine,
                });
            }
            _ => {}
        }
    }
    warnings
}

fn nearly_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < crate::EPSILON
}

impl std::fmt::Display for WarningContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningContent::NegativeDistance(d) => write!(
                f,
                "Distance {d} is negative, it will be treated as {}",
                d.abs()
            ),
            WarningContent::ConflictingFixed {
                variable,
                first_constraint,
                first,
                second,
            } => write!(
                f,
                "Variable {variable} is fixed to {second} here, but constraint {first_constraint} already fixed it to {first}. This can't be solved."
            ),
            WarningContent::DegenerateLine => write!(
                f,
                "This line starts and ends at the same point, so it has no direction. You probably meant to use two different points."
            ),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.about_constraint {
            Some(i) => write!(f, "constraint {i}: {}", self.content),
            None => write!(f, "{}", self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{DatumLineSegment, DatumPoint};

    #[test]
    fn finds_suspicious_constraints() {
        let a = DatumPoint::new_xy(0, 1);
        let b = DatumPoint::new_xy(2, 3);
        let ab = DatumLineSegment::new(a, b);
        let aa = DatumLineSegment::new(a, a);
        let constraints = [
            Constraint::FixedDistance(a, b, -2.0),
            Constraint::Fixed(0, 1.0),
            Constraint::Fixed(0, 1.0),
            Constraint::Fixed(0, 3.0),
            Constraint::Parallel(ab, aa),
            Constraint::FixedDistance(a, b, 2.0),
        ];

        let warnings = lint(&constraints);

        assert_eq!(
            warnings,
            vec![
                Warning {
                    about_constraint: Some(0),
                    content: WarningContent::NegativeDistance(-2.0),
                },
                Warning {
                    about_constraint: Some(3),
                    content: WarningContent::ConflictingFixed {
                        variable: 0,
                        first_constraint: 1,
                        first: 1.0,
                        second: 3.0,
                    },
                },
                Warning {
                    about_constraint: Some(4),
                    content: WarningContent::DegenerateLine,
                },
            ]
        );
    }

    #[test]
    fn display_formats_are_human_friendly() {
        let negative = WarningContent::NegativeDistance(-2.0).to_string();
        assert!(negative.contains("treated as 2"));
        let degenerate = Warning {
            about_constraint: Some(4),
            content: WarningContent::DegenerateLine,
        }
        .to_string();
        assert!(degenerate.starts_with("constraint 4: "));
    }
}
