//! Repeat/step structure derived from a parsed workout.
//!
//! Every exercise line becomes one repeat group whose iteration count is the
//! number of sets. The group holds exactly one work step and one rest step;
//! the rest step runs until the athlete presses the lap button.

use crate::{LineTarget, ParsedExerciseLine, ParsedWorkout};
use serde::{Deserialize, Serialize};

/// How a step ends
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EndCondition {
    /// After this many repetitions
    Reps(f64),
    /// After this many seconds
    Time(f64),
    /// Open-ended; ends when the athlete signals
    LapButton,
}

impl EndCondition {
    /// Numeric value carried on the wire (0 for open-ended steps)
    pub fn value(&self) -> f64 {
        match self {
            EndCondition::Reps(value) | EndCondition::Time(value) => *value,
            EndCondition::LapButton => 0.0,
        }
    }
}

/// Weight unit attached to every work step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightUnit {
    pub unit_id: u32,
    pub unit_key: String,
    pub factor: f64,
}

impl WeightUnit {
    pub fn kilogram() -> Self {
        Self {
            unit_id: 8,
            unit_key: "kilogram".into(),
            factor: 1000.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkStep {
    pub step_order: u32,
    pub end_condition: EndCondition,
    pub category: String,
    pub exercise_name: String,
    pub weight_unit: WeightUnit,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RestStep {
    pub step_order: u32,
    pub end_condition: EndCondition,
}

/// N repetitions of a work + rest pair
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RepeatGroup {
    pub step_order: u32,
    pub iterations: u32,
    pub work: WorkStep,
    pub rest: RestStep,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StepStructure {
    pub groups: Vec<RepeatGroup>,
}

impl StepStructure {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Step orders a group occupies: the group itself, its work and its rest step
const ORDERS_PER_GROUP: u32 = 3;

/// Build the repeat/step structure for a workout.
///
/// Step orders start at 1 and increase strictly: group `n`, work `n + 1`,
/// rest `n + 2`, next group `n + 3`.
pub fn to_step_structure(workout: &ParsedWorkout) -> StepStructure {
    let groups = workout
        .lines
        .iter()
        .zip((1u32..).step_by(ORDERS_PER_GROUP as usize))
        .map(|(line, order)| repeat_group(line, order))
        .collect();

    StepStructure { groups }
}

fn repeat_group(line: &ParsedExerciseLine, order: u32) -> RepeatGroup {
    let end_condition = match line.target {
        LineTarget::Reps { low, .. } => EndCondition::Reps(f64::from(low)),
        LineTarget::Duration { seconds } => EndCondition::Time(f64::from(seconds)),
    };

    RepeatGroup {
        step_order: order,
        iterations: line.sets,
        work: WorkStep {
            step_order: order + 1,
            end_condition,
            category: line.matched.entry.category.clone(),
            exercise_name: line.matched.entry.canonical_name.clone(),
            weight_unit: WeightUnit::kilogram(),
        },
        rest: RestStep {
            step_order: order + 2,
            end_condition: EndCondition::LapButton,
        },
    }
}
