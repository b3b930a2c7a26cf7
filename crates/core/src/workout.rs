//! Workout domain types and the session status state machine.
//!
//! A [`WorkoutSession`] is instantiated from a template's
//! [`PlannedExercise`] list and moves through
//! `planned -> in-progress -> completed`. `completed` is terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Muscle groups
// ---------------------------------------------------------------------------

pub const MUSCLE_GROUP_CHEST: &str = "chest";
pub const MUSCLE_GROUP_BACK: &str = "back";
pub const MUSCLE_GROUP_LEGS: &str = "legs";
pub const MUSCLE_GROUP_SHOULDERS: &str = "shoulders";
pub const MUSCLE_GROUP_ARMS: &str = "arms";
pub const MUSCLE_GROUP_CORE: &str = "core";
pub const MUSCLE_GROUP_CARDIO: &str = "cardio";
pub const MUSCLE_GROUP_FULL_BODY: &str = "full-body";

/// All accepted muscle group values.
pub const VALID_MUSCLE_GROUPS: &[&str] = &[
    MUSCLE_GROUP_CHEST,
    MUSCLE_GROUP_BACK,
    MUSCLE_GROUP_LEGS,
    MUSCLE_GROUP_SHOULDERS,
    MUSCLE_GROUP_ARMS,
    MUSCLE_GROUP_CORE,
    MUSCLE_GROUP_CARDIO,
    MUSCLE_GROUP_FULL_BODY,
];

/// Validate that a muscle group string is one of the accepted values.
pub fn validate_muscle_group(group: &str) -> Result<(), String> {
    if VALID_MUSCLE_GROUPS.contains(&group) {
        Ok(())
    } else {
        Err(format!(
            "Invalid muscle group '{group}'. Must be one of: {}",
            VALID_MUSCLE_GROUPS.join(", ")
        ))
    }
}

/// [`validator`] adapter for [`validate_muscle_group`].
pub fn validate_muscle_group_field(group: &str) -> Result<(), ValidationError> {
    validate_muscle_group(group).map_err(|msg| {
        let mut err = ValidationError::new("muscle_group");
        err.message = Some(msg.into());
        err
    })
}

/// Lowest accepted perceived-effort rating.
pub const MIN_EFFORT: f64 = 1.0;

/// Highest accepted perceived-effort rating.
pub const MAX_EFFORT: f64 = 10.0;

/// Upper bound on recorded sets per exercise. Set indices are `0..MAX`.
pub const MAX_SETS_PER_EXERCISE: usize = 50;

// ---------------------------------------------------------------------------
// Session status
// ---------------------------------------------------------------------------

/// Lifecycle status of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Planned,
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Planned => "planned",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Completed => "completed",
        }
    }

    /// Statuses reachable from `self` in one step.
    ///
    /// `Completed` is terminal and returns an empty slice.
    pub fn valid_transitions(self) -> &'static [SessionStatus] {
        match self {
            SessionStatus::Planned => &[SessionStatus::InProgress],
            SessionStatus::InProgress => &[SessionStatus::Completed],
            SessionStatus::Completed => &[],
        }
    }

    pub fn can_transition(self, to: SessionStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning a human-readable error for invalid ones.
    pub fn validate_transition(self, to: SessionStatus) -> Result<(), String> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(format!("Invalid transition: {self} -> {to}"))
        }
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(SessionStatus::Planned),
            "in-progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!(
                "Invalid session status '{other}'. Must be one of: planned, in-progress, completed"
            )),
        }
    }
}

/// Status filter for listing and calendar queries. `all` matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SessionStatus),
}

impl StatusFilter {
    pub fn matches(self, status: SessionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// The concrete status to filter on, or `None` for `all`.
    pub fn status(self) -> Option<SessionStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

// ---------------------------------------------------------------------------
// Exercises
// ---------------------------------------------------------------------------

/// An exercise as planned inside a workout template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlannedExercise {
    /// Library entry this exercise was picked from, if any.
    pub exercise_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(custom(function = "validate_muscle_group_field"))]
    pub muscle_group: String,
    #[validate(range(min = 1, max = 20))]
    pub target_sets: u32,
    #[validate(range(min = 1, max = 100))]
    pub target_reps: u32,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub target_weight: Option<f64>,
    /// Rest between sets, in seconds.
    #[validate(range(max = 3600))]
    pub rest_secs: u32,
}

/// One recorded set. Values are optional; `completed` is a plain flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualSet {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

/// An exercise inside a workout session, carrying targets and actuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub exercise_id: Option<DbId>,
    /// Copied from the template at instantiation; never re-fetched.
    pub name: String,
    pub order: u32,
    pub target_sets: u32,
    pub target_reps: u32,
    pub target_weight: Option<f64>,
    pub rest_secs: u32,
    pub effort: Option<f64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub actual_sets: Vec<ActualSet>,
}

impl SessionExercise {
    /// Build an untouched session exercise from a planned one.
    pub fn from_planned(planned: &PlannedExercise, order: u32) -> Self {
        Self {
            exercise_id: planned.exercise_id,
            name: planned.name.clone(),
            order,
            target_sets: planned.target_sets,
            target_reps: planned.target_reps,
            target_weight: planned.target_weight,
            rest_secs: planned.rest_secs,
            effort: None,
            notes: String::new(),
            completed: false,
            actual_sets: Vec::new(),
        }
    }

    /// Number of sets flagged completed.
    pub fn completed_set_count(&self) -> usize {
        self.actual_sets.iter().filter(|s| s.completed).count()
    }
}

/// Instantiate the exercise list of a new session from a template plan.
pub fn instantiate_exercises(planned: &[PlannedExercise]) -> Vec<SessionExercise> {
    planned
        .iter()
        .enumerate()
        .map(|(i, p)| SessionExercise::from_planned(p, i as u32))
        .collect()
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A workout session as seen by the domain layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: DbId,
    pub user_id: DbId,
    pub template_id: Option<DbId>,
    pub name: String,
    pub status: SessionStatus,
    pub exercises: Vec<SessionExercise>,
    pub scheduled_for: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
