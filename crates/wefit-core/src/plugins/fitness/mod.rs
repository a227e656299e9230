//! FitCoach fitness plugin: personalized workouts, nutrition, and
//! progress tracking.
//!
//! All state lives in a [`store::FitnessStore`] keyed by the caller's
//! user id. Plans are deterministic table lookups plus light arithmetic;
//! meal selection and motivational messages use random sampling.

pub mod nutrition;
pub mod progress;
pub mod store;
pub mod types;
pub mod workout;

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::bus::events::InboundMessage;
use crate::plugin::{Action, ActionOutcome, Plugin};

use store::{FitnessStore, MemoryStore};
use types::{FitnessGoal, GoalType, ProgressEntry, UserProfile, WorkoutLog};

/// Build the fitness plugin over a shared store.
pub fn fitness_plugin(store: Arc<MemoryStore>) -> Plugin {
    Plugin::new(
        "fitness",
        "FitCoach fitness trainer for personalized workouts and fitness tracking",
    )
    .with_action(Box::new(WorkoutPlanAction {
        store: Arc::clone(&store),
    }))
    .with_action(Box::new(NutritionPlanAction {
        store: Arc::clone(&store),
    }))
    .with_action(Box::new(LogWorkoutAction {
        store: Arc::clone(&store),
    }))
    .with_action(Box::new(ProgressSummaryAction {
        store: Arc::clone(&store),
    }))
    .with_action(Box::new(MotivationAction { store }))
}

async fn profile_or_default(store: &MemoryStore, user_id: &str) -> UserProfile {
    store.get_profile(user_id).await.unwrap_or_default()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

// ── Workout Plan ────────────────────────────────────────────────────

struct WorkoutPlanAction {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl Action for WorkoutPlanAction {
    fn name(&self) -> &str {
        "FITNESS_CREATE_WORKOUT_PLAN"
    }

    fn similes(&self) -> &[&str] {
        &["WORKOUT", "TRAINING PLAN", "EXERCISE PLAN"]
    }

    fn description(&self) -> &str {
        "Create a personalized workout plan for the user's goal"
    }

    fn priority(&self) -> f32 {
        0.6
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        contains_any(
            &msg.content,
            &["workout plan", "training plan", "exercise plan", "workout for"],
        )
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let goal = GoalType::from_text(&msg.content).unwrap_or(GoalType::GeneralFitness);

        let mut profile = profile_or_default(&self.store, &msg.user_id).await;
        if !profile.goals.iter().any(|g| g.goal_type == goal) {
            profile.goals.insert(
                0,
                FitnessGoal {
                    goal_type: goal,
                    target_value: None,
                    time_frame: None,
                },
            );
        }

        let plan = workout::generate_workout_plan(&profile, goal);
        let schedule =
            workout::generate_weekly_schedule(&plan, &profile.workout_preferences.preferred_days);

        let data = match serde_json::to_value(&plan) {
            Ok(v) => v,
            Err(e) => {
                return ActionOutcome::fail(format!(
                    "Sorry, I couldn't build your workout plan. Error: {e}"
                ))
            }
        };

        self.store.put_profile(&msg.user_id, profile).await;
        self.store.put_workout_plan(&msg.user_id, plan.clone()).await;

        let mut text = format!(
            "💪 **{}** ({} sessions/week, {} min each)\n\nExercises:\n",
            plan.name, plan.frequency, plan.duration
        );
        for ex in &plan.exercises {
            text.push_str(&format!("• {} — {}\n", ex.name, ex.duration_or_reps));
        }
        text.push_str("\nWeekly schedule:\n");
        for (day, label) in &schedule {
            text.push_str(&format!("• {day}: {label}\n"));
        }

        ActionOutcome::ok_with_data(text, data)
    }
}

// ── Nutrition Plan ──────────────────────────────────────────────────

struct NutritionPlanAction {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl Action for NutritionPlanAction {
    fn name(&self) -> &str {
        "FITNESS_CREATE_NUTRITION_PLAN"
    }

    fn similes(&self) -> &[&str] {
        &["NUTRITION", "MEAL PLAN", "DIET", "CALORIES"]
    }

    fn description(&self) -> &str {
        "Create a nutrition plan with calorie and macro targets"
    }

    fn priority(&self) -> f32 {
        0.6
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        contains_any(
            &msg.content,
            &["nutrition plan", "meal plan", "diet plan", "how many calories"],
        )
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let profile = profile_or_default(&self.store, &msg.user_id).await;
        let plan = nutrition::generate_nutrition_plan(&profile);

        let data = match serde_json::to_value(&plan) {
            Ok(v) => v,
            Err(e) => {
                return ActionOutcome::fail(format!(
                    "Sorry, I couldn't build your nutrition plan. Error: {e}"
                ))
            }
        };

        let mut text = format!(
            "🥗 **Daily target: {} kcal** (protein {}% / carbs {}% / fat {}%), {} meals a day.\n\nSample meals:\n",
            plan.daily_calories,
            plan.macro_split.protein,
            plan.macro_split.carbs,
            plan.macro_split.fat,
            plan.meal_frequency
        );
        for meal in &plan.meal_plan {
            text.push_str(&format!(
                "• {} ({} kcal): {}\n",
                meal.name, meal.macros.calories, meal.description
            ));
        }
        text.push_str("\nRecommendations:\n");
        for rec in plan.recommendations.iter().take(4) {
            text.push_str(&format!("• {rec}\n"));
        }

        self.store.put_nutrition_plan(&msg.user_id, plan).await;

        ActionOutcome::ok_with_data(text, data)
    }
}

// ── Log Workout ─────────────────────────────────────────────────────

struct LogWorkoutAction {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl Action for LogWorkoutAction {
    fn name(&self) -> &str {
        "FITNESS_LOG_WORKOUT"
    }

    fn similes(&self) -> &[&str] {
        &["LOG WORKOUT", "WORKED OUT", "FINISHED WORKOUT"]
    }

    fn description(&self) -> &str {
        "Record a completed workout for today"
    }

    fn priority(&self) -> f32 {
        0.6
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        contains_any(
            &msg.content,
            &["log workout", "log my workout", "i worked out", "finished my workout"],
        )
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let mut profile = profile_or_default(&self.store, &msg.user_id).await;

        let mut entry = ProgressEntry::on(Utc::now().date_naive());
        entry.workout = Some(WorkoutLog {
            completed: true,
            workout_type: self
                .store
                .get_workout_plan(&msg.user_id)
                .await
                .map(|p| p.target_goal.label().to_string()),
            duration: None,
            notes: None,
        });

        progress::log_progress(&mut profile, entry);
        let total = profile
            .progress
            .iter()
            .filter(|e| e.workout.as_ref().map(|w| w.completed).unwrap_or(false))
            .count();
        self.store.put_profile(&msg.user_id, profile).await;

        ActionOutcome::ok(format!(
            "✅ Workout logged! That's {total} completed so far. Keep it up!"
        ))
    }
}

// ── Progress Summary ────────────────────────────────────────────────

struct ProgressSummaryAction {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl Action for ProgressSummaryAction {
    fn name(&self) -> &str {
        "FITNESS_GET_PROGRESS"
    }

    fn similes(&self) -> &[&str] {
        &["PROGRESS", "HOW AM I DOING", "MY STATS"]
    }

    fn description(&self) -> &str {
        "Summarize progress: weight trend, workouts, and compliance"
    }

    fn priority(&self) -> f32 {
        0.6
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        contains_any(
            &msg.content,
            &["my progress", "progress summary", "how am i doing", "my stats"],
        )
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let profile = profile_or_default(&self.store, &msg.user_id).await;
        let summary = progress::progress_summary(&profile);

        let data = match serde_json::to_value(&summary) {
            Ok(v) => v,
            Err(e) => {
                return ActionOutcome::fail(format!(
                    "Sorry, I couldn't summarize your progress. Error: {e}"
                ))
            }
        };

        let mut text = format!(
            "📊 **Progress** ({})\nWorkouts completed: {} (compliance {}%)\n",
            summary.period, summary.total_workouts, summary.workout_compliance
        );
        if let Some(change) = summary.weight_change {
            text.push_str(&format!("Weight change: {change:+.1} kg\n"));
        }
        text.push_str("\nInsights:\n");
        for insight in &summary.insights {
            text.push_str(&format!("• {insight}\n"));
        }
        text.push_str("\nRecommendations:\n");
        for rec in &summary.recommendations {
            text.push_str(&format!("• {rec}\n"));
        }

        ActionOutcome::ok_with_data(text, data)
    }
}

// ── Motivation ──────────────────────────────────────────────────────

struct MotivationAction {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl Action for MotivationAction {
    fn name(&self) -> &str {
        "FITNESS_MOTIVATE"
    }

    fn similes(&self) -> &[&str] {
        &["MOTIVATE", "MOTIVATION", "ENCOURAGE"]
    }

    fn description(&self) -> &str {
        "Send a motivational message based on recent activity"
    }

    fn priority(&self) -> f32 {
        0.5
    }

    fn validate(&self, msg: &InboundMessage) -> bool {
        contains_any(&msg.content, &["motivate", "motivation", "encourage me"])
    }

    async fn handle(&self, msg: &InboundMessage) -> ActionOutcome {
        let message = match self.store.get_profile(&msg.user_id).await {
            Some(profile) => progress::motivational_message(&profile, Utc::now().date_naive()),
            None => {
                "Every fitness journey begins with a single step. Let's create your profile to get started!"
                    .to_string()
            }
        };
        ActionOutcome::ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(content: &str) -> InboundMessage {
        InboundMessage {
            channel: "cli".into(),
            chat_id: "direct".into(),
            user_id: "u1".into(),
            content: content.into(),
            media: Vec::new(),
        }
    }

    #[test]
    fn test_plugin_bundles_five_actions() {
        let plugin = fitness_plugin(Arc::new(MemoryStore::new()));
        assert_eq!(plugin.actions.len(), 5);
    }

    #[tokio::test]
    async fn test_workout_plan_action_stores_plan() {
        let store = Arc::new(MemoryStore::new());
        let action = WorkoutPlanAction {
            store: Arc::clone(&store),
        };

        let message = msg("Please build me a workout plan to lose weight");
        assert!(action.validate(&message));

        let outcome = action.handle(&message).await;
        assert!(outcome.success);
        assert!(outcome.text.contains("Weight loss Workout Plan"));

        let stored = store.get_workout_plan("u1").await.unwrap();
        assert_eq!(stored.target_goal, GoalType::WeightLoss);

        // The goal was recorded on the profile too
        let profile = store.get_profile("u1").await.unwrap();
        assert_eq!(profile.main_goal(), GoalType::WeightLoss);
    }

    #[tokio::test]
    async fn test_nutrition_plan_action() {
        let store = Arc::new(MemoryStore::new());
        let action = NutritionPlanAction {
            store: Arc::clone(&store),
        };

        let message = msg("can you make a meal plan for me?");
        assert!(action.validate(&message));

        let outcome = action.handle(&message).await;
        assert!(outcome.success);
        assert!(outcome.text.contains("kcal"));
        assert!(store.get_nutrition_plan("u1").await.is_some());
    }

    #[tokio::test]
    async fn test_log_workout_then_progress() {
        let store = Arc::new(MemoryStore::new());
        let log = LogWorkoutAction {
            store: Arc::clone(&store),
        };
        let progress = ProgressSummaryAction {
            store: Arc::clone(&store),
        };

        let outcome = log.handle(&msg("log my workout for today")).await;
        assert!(outcome.success);
        assert!(outcome.text.contains("1 completed"));

        let outcome = progress.handle(&msg("show my progress")).await;
        assert!(outcome.success);
        assert!(outcome.text.contains("Workouts completed: 1"));
    }

    #[tokio::test]
    async fn test_motivation_without_profile() {
        let action = MotivationAction {
            store: Arc::new(MemoryStore::new()),
        };
        let outcome = action.handle(&msg("motivate me")).await;
        assert!(outcome.success);
        assert!(outcome.text.contains("single step"));
    }

    #[test]
    fn test_validators_do_not_overlap_on_plain_chat() {
        let store = Arc::new(MemoryStore::new());
        let plugin = fitness_plugin(store);
        let message = msg("hello, how are you?");
        for action in &plugin.actions {
            assert!(!action.validate(&message), "{} misfired", action.name());
        }
    }
}
