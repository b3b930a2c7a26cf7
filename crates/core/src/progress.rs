//! In-memory progress of a running workout session.
//!
//! [`ProgressModel`] owns the mutable exercise list while a session is being
//! performed. Persistence never reads it directly: callers take a
//! [`ProgressSnapshot`] via [`ProgressModel::to_persistable`] so that later
//! edits cannot tear a write that is still in flight.

use serde::Serialize;

use crate::error::CoreError;
use crate::workout::{ActualSet, SessionExercise, MAX_EFFORT, MAX_SETS_PER_EXERCISE, MIN_EFFORT};

/// Immutable copy of a session's exercise list at one revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// Revision of the model this snapshot was taken from.
    pub revision: u64,
    pub exercises: Vec<SessionExercise>,
}

impl ProgressSnapshot {
    /// Total number of recorded set entries across all exercises.
    pub fn recorded_set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.actual_sets.len()).sum()
    }
}

/// Mutable exercise/set state of one session.
#[derive(Debug, Clone, Default)]
pub struct ProgressModel {
    exercises: Vec<SessionExercise>,
    revision: u64,
}

impl ProgressModel {
    /// Start tracking `exercises`, usually the stored list of a session.
    pub fn new(exercises: Vec<SessionExercise>) -> Self {
        Self {
            exercises,
            revision: 0,
        }
    }

    /// Current exercise list including unsaved edits.
    pub fn exercises(&self) -> &[SessionExercise] {
        &self.exercises
    }

    /// Number of mutations applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record reps and/or weight for a set.
    ///
    /// Creates the set (and any missing sets before it) when absent. `None`
    /// values leave the existing field untouched. The set index is not
    /// checked against the exercise's target set count, only against
    /// [`MAX_SETS_PER_EXERCISE`].
    pub fn record_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        reps: Option<u32>,
        weight: Option<f64>,
    ) -> Result<&ActualSet, CoreError> {
        let set = self.set_mut(exercise_index, set_index)?;
        if let Some(reps) = reps {
            set.reps = Some(reps);
        }
        if let Some(weight) = weight {
            set.weight = Some(weight);
        }
        self.revision += 1;
        Ok(&self.exercises[exercise_index].actual_sets[set_index])
    }

    /// Flip a set's completion flag. No check that values were recorded.
    pub fn set_set_completed(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        completed: bool,
    ) -> Result<(), CoreError> {
        self.set_mut(exercise_index, set_index)?.completed = completed;
        self.revision += 1;
        Ok(())
    }

    /// Mark an exercise complete. Does not require any recorded sets.
    pub fn mark_exercise_complete(&mut self, exercise_index: usize) -> Result<(), CoreError> {
        self.exercise_mut(exercise_index)?.completed = true;
        self.revision += 1;
        Ok(())
    }

    /// Record perceived effort (1-10) for an exercise, or clear it.
    pub fn set_effort(
        &mut self,
        exercise_index: usize,
        effort: Option<f64>,
    ) -> Result<(), CoreError> {
        if let Some(value) = effort {
            if !(MIN_EFFORT..=MAX_EFFORT).contains(&value) {
                return Err(CoreError::Validation(format!(
                    "Effort must be between {MIN_EFFORT} and {MAX_EFFORT}, got {value}"
                )));
            }
        }
        self.exercise_mut(exercise_index)?.effort = effort;
        self.revision += 1;
        Ok(())
    }

    /// Replace an exercise's free-text notes.
    pub fn set_notes(
        &mut self,
        exercise_index: usize,
        notes: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.exercise_mut(exercise_index)?.notes = notes.into();
        self.revision += 1;
        Ok(())
    }

    /// Deep copy of the current state, safe to hand to an async writer.
    pub fn to_persistable(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            revision: self.revision,
            exercises: self.exercises.clone(),
        }
    }

    fn exercise_mut(&mut self, index: usize) -> Result<&mut SessionExercise, CoreError> {
        let len = self.exercises.len();
        self.exercises.get_mut(index).ok_or_else(|| {
            CoreError::Validation(format!(
                "Exercise index {index} out of range (session has {len} exercises)"
            ))
        })
    }

    fn set_mut(
        &mut self,
        exercise_index: usize,
        set_index: usize,
    ) -> Result<&mut ActualSet, CoreError> {
        if set_index >= MAX_SETS_PER_EXERCISE {
            return Err(CoreError::Validation(format!(
                "Set index {set_index} out of range (at most {MAX_SETS_PER_EXERCISE} sets per exercise)"
            )));
        }
        let exercise = self.exercise_mut(exercise_index)?;
        if exercise.actual_sets.len() <= set_index {
            exercise
                .actual_sets
                .resize_with(set_index + 1, ActualSet::default);
        }
        Ok(&mut exercise.actual_sets[set_index])
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::workout::{instantiate_exercises, PlannedExercise};

    fn model_with(target_sets: &[u32]) -> ProgressModel {
        let planned: Vec<PlannedExercise> = target_sets
            .iter()
            .enumerate()
            .map(|(i, sets)| PlannedExercise {
                exercise_id: None,
                name: format!("Exercise {i}"),
                muscle_group: "back".to_string(),
                target_sets: *sets,
                target_reps: 10,
                target_weight: None,
                rest_secs: 60,
            })
            .collect();
        ProgressModel::new(instantiate_exercises(&planned))
    }

    #[test]
    fn record_set_creates_missing_entry() {
        let mut model = model_with(&[3]);
        model.record_set(0, 0, Some(10), Some(50.0)).unwrap();

        let sets = &model.exercises()[0].actual_sets;
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].reps, Some(10));
        assert_eq!(sets[0].weight, Some(50.0));
        assert!(!sets[0].completed);
    }

    #[test]
    fn record_set_fills_gaps_with_empty_sets() {
        let mut model = model_with(&[3]);
        model.record_set(0, 2, Some(8), None).unwrap();

        let sets = &model.exercises()[0].actual_sets;
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0], ActualSet::default());
        assert_eq!(sets[2].reps, Some(8));
    }

    #[test]
    fn partial_update_keeps_other_field() {
        let mut model = model_with(&[3]);
        model.record_set(0, 0, Some(10), Some(50.0)).unwrap();
        model.record_set(0, 0, None, Some(55.0)).unwrap();

        let set = &model.exercises()[0].actual_sets[0];
        assert_eq!(set.reps, Some(10));
        assert_eq!(set.weight, Some(55.0));
    }

    #[test]
    fn overshooting_target_sets_is_allowed() {
        let mut model = model_with(&[2]);
        for i in 0..4 {
            model.record_set(0, i, Some(5), None).unwrap();
        }
        assert_eq!(model.exercises()[0].actual_sets.len(), 4);
    }

    #[test]
    fn unknown_exercise_is_a_validation_error() {
        let mut model = model_with(&[3]);
        let result = model.record_set(5, 0, Some(1), None);
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(model.revision(), 0);
    }

    #[test]
    fn last_allowed_set_index_is_created_on_empty_exercise() {
        let mut model = model_with(&[3]);
        let last = MAX_SETS_PER_EXERCISE - 1;
        model.record_set(0, last, Some(3), None).unwrap();

        let sets = &model.exercises()[0].actual_sets;
        assert_eq!(sets.len(), MAX_SETS_PER_EXERCISE);
        assert_eq!(sets[last].reps, Some(3));
        assert!(sets[..last].iter().all(|s| *s == ActualSet::default()));
    }

    #[test]
    fn set_index_at_limit_is_rejected_without_touching_sets() {
        let mut model = model_with(&[3]);
        model.record_set(0, 0, Some(5), Some(60.0)).unwrap();

        for index in [MAX_SETS_PER_EXERCISE, 5_000_000, usize::MAX] {
            assert_matches!(
                model.record_set(0, index, Some(1), None),
                Err(CoreError::Validation(_))
            );
            assert_matches!(
                model.set_set_completed(0, index, true),
                Err(CoreError::Validation(_))
            );
        }

        let sets = &model.exercises()[0].actual_sets;
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].reps, Some(5));
        assert_eq!(model.revision(), 1);
    }

    #[test]
    fn mark_complete_without_sets_is_permitted() {
        let mut model = model_with(&[3]);
        model.mark_exercise_complete(0).unwrap();
        assert!(model.exercises()[0].completed);
        assert!(model.exercises()[0].actual_sets.is_empty());
    }

    #[test]
    fn set_completion_does_not_require_values() {
        let mut model = model_with(&[3]);
        model.set_set_completed(0, 1, true).unwrap();
        let sets = &model.exercises()[0].actual_sets;
        assert!(sets[1].completed);
        assert_eq!(sets[1].reps, None);
        assert_eq!(model.exercises()[0].completed_set_count(), 1);
    }

    #[test]
    fn effort_out_of_range_is_rejected() {
        let mut model = model_with(&[1]);
        assert_matches!(model.set_effort(0, Some(11.0)), Err(CoreError::Validation(_)));
        model.set_effort(0, Some(8.5)).unwrap();
        assert_eq!(model.exercises()[0].effort, Some(8.5));
        model.set_effort(0, None).unwrap();
        assert_eq!(model.exercises()[0].effort, None);
    }

    #[test]
    fn snapshot_equals_last_recorded_state() {
        let mut model = model_with(&[3, 2]);
        model.record_set(0, 0, Some(10), Some(40.0)).unwrap();
        model.record_set(1, 0, Some(12), None).unwrap();
        model.record_set(0, 0, Some(9), None).unwrap();
        model.record_set(0, 1, Some(8), Some(42.5)).unwrap();
        model.set_notes(1, "grip felt off").unwrap();

        let snapshot = model.to_persistable();

        assert_eq!(snapshot.exercises, model.exercises());
        assert_eq!(snapshot.revision, 5);
        assert_eq!(snapshot.exercises[0].actual_sets[0].reps, Some(9));
        assert_eq!(snapshot.exercises[0].actual_sets[0].weight, Some(40.0));
        assert_eq!(snapshot.recorded_set_count(), 3);
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut model = model_with(&[3]);
        model.record_set(0, 0, Some(10), None).unwrap();
        let snapshot = model.to_persistable();

        model.record_set(0, 0, Some(1), None).unwrap();
        model.record_set(0, 1, Some(1), None).unwrap();

        assert_eq!(snapshot.exercises[0].actual_sets.len(), 1);
        assert_eq!(snapshot.exercises[0].actual_sets[0].reps, Some(10));
        assert!(snapshot.revision < model.revision());
    }
}
