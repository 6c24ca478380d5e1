use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    Config, Constraint, ConstraintKind, FailureOutcome, FreedomAnalysis, Id, SolveOutcome,
    TextualError, Variables, Warning,
    datatypes::{Component, DatumLineSegment, DatumPoint, Feature, Point},
    textual::instruction::*,
};

use super::{Instruction, Label, Problem};

/// What a label refers to.
#[derive(Clone, Copy)]
enum Entity {
    Point(DatumPoint),
    Scalar(Id),
}

impl Problem {
    /// Assign a variable to each declared point and scalar (initialised with its guess),
    /// then translate each instruction into a constraint on those variables.
    pub fn to_constraint_system(&self) -> Result<ConstraintSystem, TextualError> {
        // First, check every label has exactly one guess.
        let mut guessmap_points = HashMap::new();
        for pg in &self.point_guesses {
            if guessmap_points.insert(pg.point.0.clone(), pg.guess).is_some() {
                return Err(TextualError::DuplicateGuess {
                    label: pg.point.0.clone(),
                });
            }
        }
        let mut guessmap_scalars = HashMap::new();
        for sg in &self.scalar_guesses {
            if guessmap_scalars.insert(sg.scalar.0.clone(), sg.guess).is_some()
                || guessmap_points.contains_key(&sg.scalar.0)
            {
                return Err(TextualError::DuplicateGuess {
                    label: sg.scalar.0.clone(),
                });
            }
        }

        // Now create the solver variables, in declaration order.
        let mut variables = Variables::new();
        let mut entities: IndexMap<String, Entity> = IndexMap::new();
        for instruction in &self.instructions {
            let (label, is_point) = match instruction {
                Instruction::DeclarePoint(DeclarePoint { label }) => (label, true),
                Instruction::DeclareScalar(DeclareScalar { label }) => (label, false),
                _ => continue,
            };
            if entities.contains_key(&label.0) {
                return Err(TextualError::DuplicateDeclaration {
                    label: label.0.clone(),
                });
            }
            let entity = if is_point {
                let Some(guess) = guessmap_points.remove(&label.0) else {
                    return Err(missing_or_misused(label, &guessmap_scalars, "point"));
                };
                Entity::Point(DatumPoint::named(
                    &mut variables,
                    &label.0,
                    guess.x,
                    guess.y,
                ))
            } else {
                let Some(guess) = guessmap_scalars.remove(&label.0) else {
                    return Err(missing_or_misused(label, &guessmap_points, "scalar"));
                };
                Entity::Scalar(variables.push_named(label.0.clone(), guess))
            };
            entities.insert(label.0.clone(), entity);
        }
        if !guessmap_points.is_empty() || !guessmap_scalars.is_empty() {
            let mut labels: Vec<String> = guessmap_points
                .into_keys()
                .chain(guessmap_scalars.into_keys())
                .collect();
            labels.sort();
            return Err(TextualError::UnusedGuesses { labels });
        }

        // Good. Now we can define all the constraints, referencing the solver variables that
        // were defined in the previous step.
        let lookup = |label: &Label| -> Result<Entity, TextualError> {
            entities
                .get(&label.0)
                .copied()
                .ok_or_else(|| TextualError::Undefined {
                    label: label.0.clone(),
                })
        };
        let datum_point_for_label = |label: &Label| -> Result<DatumPoint, TextualError> {
            match lookup(label)? {
                Entity::Point(p) => Ok(p),
                Entity::Scalar(_) => Err(TextualError::WrongKind {
                    label: label.0.clone(),
                    expected: "point",
                }),
            }
        };
        let scalar_for_label = |label: &Label| -> Result<Id, TextualError> {
            match lookup(label)? {
                Entity::Scalar(id) => Ok(id),
                Entity::Point(_) => Err(TextualError::WrongKind {
                    label: label.0.clone(),
                    expected: "scalar",
                }),
            }
        };
        let points = |(p0, p1): &(Label, Label)| -> Result<[Feature; 2], TextualError> {
            Ok([
                datum_point_for_label(p0)?.into(),
                datum_point_for_label(p1)?.into(),
            ])
        };
        let lines = |pair: &LinePair| -> Result<[Feature; 2], TextualError> {
            let line = |(p0, p1): &(Label, Label)| -> Result<Feature, TextualError> {
                let p0 = datum_point_for_label(p0)?;
                let p1 = datum_point_for_label(p1)?;
                Ok(DatumLineSegment::new(p0, p1).into())
            };
            Ok([line(&pair.line0)?, line(&pair.line1)?])
        };

        let mut constraints = Vec::new();
        for instruction in &self.instructions {
            let constraint = match instruction {
                Instruction::DeclarePoint(_) | Instruction::DeclareScalar(_) => continue,
                Instruction::FixPointComponent(FixPointComponent {
                    point,
                    component,
                    value,
                }) => {
                    let kind = match component {
                        Component::X => ConstraintKind::FixedX(*value),
                        Component::Y => ConstraintKind::FixedY(*value),
                    };
                    kind.build(&[datum_point_for_label(point)?.into()])?
                }
                Instruction::FixScalar(FixScalar { scalar, value }) => {
                    Constraint::Fixed(scalar_for_label(scalar)?, *value)
                }
                Instruction::Vertical(Vertical { label }) => {
                    ConstraintKind::Vertical.build(&points(label)?)?
                }
                Instruction::Horizontal(Horizontal { label }) => {
                    ConstraintKind::Horizontal.build(&points(label)?)?
                }
                Instruction::Distance(Distance {
                    label,
                    distance: DistanceArg::Fixed(d),
                }) => ConstraintKind::FixedDistance(*d).build(&points(label)?)?,
                Instruction::Distance(Distance {
                    label: (p0, p1),
                    distance: DistanceArg::Scalar(d),
                }) => Constraint::Distance(
                    datum_point_for_label(p0)?,
                    datum_point_for_label(p1)?,
                    scalar_for_label(d)?,
                ),
                Instruction::Congruent(pair) => {
                    ConstraintKind::CongruentLines.build(&lines(pair)?)?
                }
                Instruction::Parallel(pair) => ConstraintKind::Parallel.build(&lines(pair)?)?,
                Instruction::Perpendicular(pair) => {
                    ConstraintKind::Perpendicular.build(&lines(pair)?)?
                }
            };
            constraints.push(constraint);
        }

        let mut points_out = IndexMap::new();
        let mut scalars_out = IndexMap::new();
        for (label, entity) in entities {
            match entity {
                Entity::Point(p) => {
                    points_out.insert(label, p);
                }
                Entity::Scalar(id) => {
                    scalars_out.insert(label, id);
                }
            }
        }
        Ok(ConstraintSystem {
            constraints,
            variables,
            points: points_out,
            scalars: scalars_out,
        })
    }
}

/// The label had no guess of the right kind. Was it guessed as the other kind?
fn missing_or_misused<T>(
    label: &Label,
    guesses_of_other_kind: &HashMap<String, T>,
    expected: &'static str,
) -> TextualError {
    if guesses_of_other_kind.contains_key(&label.0) {
        TextualError::WrongKind {
            label: label.0.clone(),
            expected,
        }
    } else {
        TextualError::MissingGuess {
            label: label.0.clone(),
        }
    }
}

/// A problem, translated into variables and constraints.
#[derive(Clone, Debug)]
pub struct ConstraintSystem {
    /// Every constraint, in the order they were written.
    pub constraints: Vec<Constraint>,
    /// One variable per point component and scalar, holding the initial guesses.
    pub variables: Variables,
    points: IndexMap<String, DatumPoint>,
    scalars: IndexMap<String, Id>,
}

impl ConstraintSystem {
    /// Solve, updating this system's variables, without gathering the results by label.
    pub fn solve_no_metadata(&mut self, config: Config) -> Result<SolveOutcome, FailureOutcome> {
        crate::solve(&self.constraints, &mut self.variables, config)
    }

    /// Solve with the default config.
    pub fn solve(&mut self) -> Result<Outcome, FailureOutcome> {
        self.solve_with_config(Default::default())
    }

    /// Solve, then gather each point and scalar's solved value.
    pub fn solve_with_config(&mut self, config: Config) -> Result<Outcome, FailureOutcome> {
        let outcome = self.solve_no_metadata(config)?;
        Ok(self.outcome(outcome, None))
    }

    /// Solve, then work out which variables are still free to move.
    pub fn solve_with_analysis(&mut self, config: Config) -> Result<Outcome, FailureOutcome> {
        let solved = crate::solve_with_analysis(&self.constraints, &mut self.variables, config)?;
        Ok(self.outcome(solved.outcome, Some(solved.analysis)))
    }

    fn outcome(&self, outcome: SolveOutcome, analysis: Option<FreedomAnalysis>) -> Outcome {
        let points = self
            .points
            .iter()
            .map(|(label, p)| (label.clone(), Point::from_datum(p, &self.variables)))
            .collect();
        let scalars = self
            .scalars
            .iter()
            .map(|(label, id)| (label.clone(), self.variables.value(*id)))
            .collect();
        let underconstrained = analysis
            .as_ref()
            .map(|analysis| {
                analysis
                    .underconstrained()
                    .map(|id| match self.variables.name(id) {
                        Some(name) => name.to_owned(),
                        None => format!("#{id}"),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Outcome {
            num_vars: self.variables.len(),
            num_eqs: self.constraints.iter().map(|c| c.residual_dim()).sum(),
            iterations: outcome.iterations(),
            num_components: outcome.components().len(),
            warnings: outcome.warnings().to_vec(),
            points,
            scalars,
            analysis,
            underconstrained,
        }
    }
}

/// A solved problem.
#[derive(Debug)]
pub struct Outcome {
    /// Total Gauss-Newton iterations across all components.
    pub iterations: usize,
    /// How many independent components the problem split into.
    pub num_components: usize,
    /// Suspicious constraints.
    pub warnings: Vec<Warning>,
    /// Each point's solved position, in declaration order.
    pub points: IndexMap<String, Point>,
    /// Each scalar's solved value, in declaration order.
    pub scalars: IndexMap<String, f64>,
    /// Freedom analysis, if it was requested.
    pub analysis: Option<FreedomAnalysis>,
    /// Names of the variables still free to move, if analysis was requested.
    pub underconstrained: Vec<String>,
    /// Size of the system.
    pub num_vars: usize,
    /// Size of the system.
    pub num_eqs: usize,
}

impl Outcome {
    /// Solved position of this point.
    pub fn get_point(&self, label: &str) -> Option<Point> {
        self.points.get(label).copied()
    }

    /// Solved value of this scalar.
    pub fn get_scalar(&self, label: &str) -> Option<f64> {
        self.scalars.get(label).copied()
    }
}
