//! Fitness domain types: profiles, plans, and progress records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub fn harder(self) -> Self {
        match self {
            Self::Beginner => Self::Intermediate,
            Self::Intermediate | Self::Advanced => Self::Advanced,
        }
    }

    pub fn easier(self) -> Self {
        match self {
            Self::Advanced => Self::Intermediate,
            Self::Intermediate | Self::Beginner => Self::Beginner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    WeightLoss,
    MuscleGain,
    Endurance,
    Flexibility,
    #[default]
    GeneralFitness,
}

impl GoalType {
    pub fn label(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight loss",
            Self::MuscleGain => "muscle gain",
            Self::Endurance => "endurance",
            Self::Flexibility => "flexibility",
            Self::GeneralFitness => "general fitness",
        }
    }

    /// Parse a goal from free text, matching on keyword membership.
    pub fn from_text(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("lose weight") || lower.contains("weight loss") || lower.contains("fat") {
            Some(Self::WeightLoss)
        } else if lower.contains("muscle") || lower.contains("bulk") || lower.contains("strength") {
            Some(Self::MuscleGain)
        } else if lower.contains("endurance") || lower.contains("stamina") || lower.contains("cardio")
        {
            Some(Self::Endurance)
        } else if lower.contains("flexib") || lower.contains("stretch") || lower.contains("yoga") {
            Some(Self::Flexibility)
        } else if lower.contains("fitness") || lower.contains("fit") || lower.contains("shape") {
            Some(Self::GeneralFitness)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessGoal {
    pub goal_type: GoalType,
    pub target_value: Option<f64>,
    pub time_frame: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Cardio,
    Strength,
    Flexibility,
}

#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub name: &'static str,
    pub exercise_type: ExerciseType,
    pub difficulty: FitnessLevel,
    pub muscle_groups: &'static [&'static str],
    pub description: &'static str,
    pub instructions: &'static [&'static str],
    pub duration_or_reps: &'static str,
    pub rest_time: Option<&'static str>,
    pub equipment: &'static [&'static str],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutPreferences {
    pub preferred_days: Vec<String>,
    pub preferred_time: Option<String>,
    pub preferred_duration: Option<u32>,
    pub preferred_exercise_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u32>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimeters.
    pub height: Option<f64>,
    pub fitness_level: FitnessLevel,
    pub dietary_restrictions: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub goals: Vec<FitnessGoal>,
    pub workout_preferences: WorkoutPreferences,
    pub progress: Vec<ProgressEntry>,
}

impl UserProfile {
    /// The primary goal, defaulting to general fitness.
    pub fn main_goal(&self) -> GoalType {
        self.goals
            .first()
            .map(|g| g.goal_type)
            .unwrap_or(GoalType::GeneralFitness)
    }

    /// Workouts per week: preferred day count or the 3-day default.
    pub fn workout_frequency(&self) -> u32 {
        let days = self.workout_preferences.preferred_days.len() as u32;
        if days > 0 {
            days
        } else {
            3
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutPlan {
    pub name: String,
    pub target_goal: GoalType,
    pub difficulty: FitnessLevel,
    /// Workouts per week.
    pub frequency: u32,
    /// Minutes per session.
    pub duration: u32,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Macros {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMeal {
    pub name: String,
    pub description: String,
    pub meal_type: MealType,
    pub ingredients: Vec<String>,
    pub macros: Macros,
}

/// Percentage split of daily calories across macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub daily_calories: u32,
    pub macro_split: MacroSplit,
    pub meal_frequency: u32,
    pub recommendations: Vec<String>,
    pub meal_plan: Vec<SampleMeal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationPlan {
    /// Liters per day.
    pub daily_water_intake: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub completed: bool,
    pub workout_type: Option<String>,
    pub duration: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub workout: Option<WorkoutLog>,
    pub mood: Option<u8>,
}

impl ProgressEntry {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            weight: None,
            body_fat: None,
            workout: None,
            mood: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub period: String,
    pub weight_change: Option<f64>,
    pub total_workouts: u32,
    /// Percentage in [0, 100].
    pub workout_compliance: u32,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub on_track: bool,
    pub percent_complete: Option<u32>,
    /// Estimated days remaining to the target, when computable.
    pub time_remaining: Option<u32>,
    pub adjustments: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutFeedback {
    pub too_easy: bool,
    pub too_hard: bool,
    pub boring_exercises: bool,
    pub time_too_long: bool,
    pub painful_exercises: Vec<String>,
    pub enjoyed_exercises: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_from_text() {
        assert_eq!(
            GoalType::from_text("I want to lose weight"),
            Some(GoalType::WeightLoss)
        );
        assert_eq!(
            GoalType::from_text("build muscle please"),
            Some(GoalType::MuscleGain)
        );
        assert_eq!(
            GoalType::from_text("improve my stamina"),
            Some(GoalType::Endurance)
        );
        assert_eq!(GoalType::from_text("hello there"), None);
    }

    #[test]
    fn test_level_transitions_saturate() {
        assert_eq!(FitnessLevel::Beginner.harder(), FitnessLevel::Intermediate);
        assert_eq!(FitnessLevel::Advanced.harder(), FitnessLevel::Advanced);
        assert_eq!(FitnessLevel::Beginner.easier(), FitnessLevel::Beginner);
        assert_eq!(FitnessLevel::Advanced.easier(), FitnessLevel::Intermediate);
    }

    #[test]
    fn test_profile_defaults() {
        let profile = UserProfile::default();
        assert_eq!(profile.main_goal(), GoalType::GeneralFitness);
        assert_eq!(profile.workout_frequency(), 3);

        let mut with_days = UserProfile::default();
        with_days.workout_preferences.preferred_days =
            vec!["Monday".into(), "Thursday".into()];
        assert_eq!(with_days.workout_frequency(), 2);
    }
}
