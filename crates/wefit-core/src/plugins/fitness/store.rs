//! Fitness state storage.
//!
//! State lives behind the [`FitnessStore`] trait so the in-memory
//! implementation can later be swapped for a database-backed one without
//! touching the planners. The memory store is keyed by user id and lives
//! for the lifetime of the process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::types::{NutritionPlan, UserProfile, WorkoutPlan};

#[async_trait]
pub trait FitnessStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Option<UserProfile>;
    async fn put_profile(&self, user_id: &str, profile: UserProfile);

    async fn get_workout_plan(&self, user_id: &str) -> Option<WorkoutPlan>;
    async fn put_workout_plan(&self, user_id: &str, plan: WorkoutPlan);

    async fn get_nutrition_plan(&self, user_id: &str) -> Option<NutritionPlan>;
    async fn put_nutrition_plan(&self, user_id: &str, plan: NutritionPlan);
}

/// In-memory store: `RwLock`-guarded maps keyed by user id.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    workout_plans: RwLock<HashMap<String, WorkoutPlan>>,
    nutrition_plans: RwLock<HashMap<String, NutritionPlan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FitnessStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.read().await.get(user_id).cloned()
    }

    async fn put_profile(&self, user_id: &str, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile);
    }

    async fn get_workout_plan(&self, user_id: &str) -> Option<WorkoutPlan> {
        self.workout_plans.read().await.get(user_id).cloned()
    }

    async fn put_workout_plan(&self, user_id: &str, plan: WorkoutPlan) {
        self.workout_plans
            .write()
            .await
            .insert(user_id.to_string(), plan);
    }

    async fn get_nutrition_plan(&self, user_id: &str) -> Option<NutritionPlan> {
        self.nutrition_plans.read().await.get(user_id).cloned()
    }

    async fn put_nutrition_plan(&self, user_id: &str, plan: NutritionPlan) {
        self.nutrition_plans
            .write()
            .await
            .insert(user_id.to_string(), plan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_profile("u1").await.is_none());

        let mut profile = UserProfile::default();
        profile.weight = Some(80.0);
        store.put_profile("u1", profile).await;

        let loaded = store.get_profile("u1").await.unwrap();
        assert_eq!(loaded.weight, Some(80.0));

        // Other users are unaffected
        assert!(store.get_profile("u2").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        let mut profile = UserProfile::default();
        profile.age = Some(25);
        store.put_profile("u1", profile.clone()).await;

        profile.age = Some(26);
        store.put_profile("u1", profile).await;

        assert_eq!(store.get_profile("u1").await.unwrap().age, Some(26));
    }
}
