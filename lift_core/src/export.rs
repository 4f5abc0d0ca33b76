//! Strength-workout payload for the remote fitness service.
//!
//! The service expects a single segment of `RepeatGroupDTO`s, each holding an
//! interval step and a rest step, with numeric step/condition type ids.

use crate::steps::{to_step_structure, EndCondition, RepeatGroup, StepStructure, WeightUnit};
use crate::ParsedWorkout;
use serde::{Deserialize, Serialize};

const REPEAT_GROUP_DTO: &str = "RepeatGroupDTO";
const EXECUTABLE_STEP_DTO: &str = "ExecutableStepDTO";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SportType {
    pub sport_type_id: u32,
    pub sport_type_key: String,
}

impl SportType {
    pub fn strength_training() -> Self {
        Self {
            sport_type_id: 5,
            sport_type_key: "strength_training".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepType {
    pub step_type_id: u32,
    pub step_type_key: String,
}

impl StepType {
    fn new(id: u32, key: &str) -> Self {
        Self {
            step_type_id: id,
            step_type_key: key.into(),
        }
    }

    pub fn repeat() -> Self {
        Self::new(6, "repeat")
    }

    pub fn interval() -> Self {
        Self::new(3, "interval")
    }

    pub fn rest() -> Self {
        Self::new(5, "rest")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionType {
    pub condition_type_id: u32,
    pub condition_type_key: String,
}

impl From<&EndCondition> for ConditionType {
    fn from(condition: &EndCondition) -> Self {
        let (id, key) = match condition {
            EndCondition::Reps(_) => (10, "reps"),
            EndCondition::Time(_) => (2, "time"),
            EndCondition::LapButton => (1, "lap.button"),
        };
        Self {
            condition_type_id: id,
            condition_type_key: key.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetType {
    pub workout_target_type_id: u32,
    pub workout_target_type_key: String,
}

impl TargetType {
    pub fn no_target() -> Self {
        Self {
            workout_target_type_id: 1,
            workout_target_type_key: "no.target".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    pub unit_id: u32,
    pub unit_key: String,
    pub factor: f64,
}

impl From<&WeightUnit> for UnitDto {
    fn from(unit: &WeightUnit) -> Self {
        Self {
            unit_id: unit.unit_id,
            unit_key: unit.unit_key.clone(),
            factor: unit.factor,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableStepDto {
    #[serde(rename = "type")]
    pub dto_type: String,
    pub step_order: u32,
    pub step_type: StepType,
    pub end_condition: ConditionType,
    pub end_condition_value: f64,
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<UnitDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGroupDto {
    #[serde(rename = "type")]
    pub dto_type: String,
    pub step_order: u32,
    pub step_type: StepType,
    pub number_of_iterations: u32,
    pub workout_steps: Vec<ExecutableStepDto>,
}

impl From<&RepeatGroup> for RepeatGroupDto {
    fn from(group: &RepeatGroup) -> Self {
        let work = ExecutableStepDto {
            dto_type: EXECUTABLE_STEP_DTO.into(),
            step_order: group.work.step_order,
            step_type: StepType::interval(),
            end_condition: ConditionType::from(&group.work.end_condition),
            end_condition_value: group.work.end_condition.value(),
            target_type: TargetType::no_target(),
            category: Some(group.work.category.clone()),
            exercise_name: Some(group.work.exercise_name.clone()),
            weight_unit: Some(UnitDto::from(&group.work.weight_unit)),
        };
        let rest = ExecutableStepDto {
            dto_type: EXECUTABLE_STEP_DTO.into(),
            step_order: group.rest.step_order,
            step_type: StepType::rest(),
            end_condition: ConditionType::from(&group.rest.end_condition),
            end_condition_value: group.rest.end_condition.value(),
            target_type: TargetType::no_target(),
            category: None,
            exercise_name: None,
            weight_unit: None,
        };

        Self {
            dto_type: REPEAT_GROUP_DTO.into(),
            step_order: group.step_order,
            step_type: StepType::repeat(),
            number_of_iterations: group.iterations,
            workout_steps: vec![work, rest],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSegment {
    pub segment_order: u32,
    pub sport_type: SportType,
    pub workout_steps: Vec<RepeatGroupDto>,
}

/// Complete workout as uploaded to the remote service
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    pub workout_name: String,
    pub description: String,
    pub sport_type: SportType,
    pub workout_segments: Vec<WorkoutSegment>,
}

impl WorkoutPayload {
    /// Payload for a parsed workout, regenerating its step structure
    pub fn from_workout(workout: &ParsedWorkout) -> Self {
        Self::from_steps(&workout.name, &to_step_structure(workout))
    }

    pub fn from_steps(name: &str, steps: &StepStructure) -> Self {
        Self {
            workout_name: name.to_string(),
            description: format!("Created via liftmap. {} exercises.", steps.len()),
            sport_type: SportType::strength_training(),
            workout_segments: vec![WorkoutSegment {
                segment_order: 1,
                sport_type: SportType::strength_training(),
                workout_steps: steps.groups.iter().map(RepeatGroupDto::from).collect(),
            }],
        }
    }
}
