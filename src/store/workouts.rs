//! In-memory list of the workouts last fetched from the API.
//!
//! The list is a cache of server state, not a source of truth: it is
//! replaced wholesale after a fetch and patched locally after each
//! successful mutation so the caller does not need to refetch.

#[cfg(test)]
#[path = "workouts_test.rs"]
mod tests;

use crate::net::types::Workout;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutList {
    items: Vec<Workout>,
}

impl WorkoutList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the result of a fresh list fetch.
    pub fn replace_all(&mut self, workouts: Vec<Workout>) {
        self.items = workouts;
    }

    /// Append a workout the server just created.
    pub fn push(&mut self, workout: Workout) {
        self.items.push(workout);
    }

    /// Swap the entry sharing `workout.id`. Returns false when no entry matched.
    pub fn replace(&mut self, workout: Workout) -> bool {
        match self.items.iter_mut().find(|w| w.id == workout.id) {
            Some(slot) => {
                *slot = workout;
                true
            }
            None => false,
        }
    }

    /// Drop the entry with `id`, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<Workout> {
        let index = self.items.iter().position(|w| w.id == id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.items.iter().find(|w| w.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Workout] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all durations, in minutes.
    #[must_use]
    pub fn total_minutes(&self) -> u64 {
        self.items.iter().map(|w| u64::from(w.duration)).sum()
    }
}

impl<'a> IntoIterator for &'a WorkoutList {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
