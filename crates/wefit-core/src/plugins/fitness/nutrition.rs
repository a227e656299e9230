//! Nutrition planning: calorie targets, macro splits, sample meals, and
//! hydration.
//!
//! The calorie base is a Mifflin-St Jeor-style estimate over weight,
//! height, and age; everything else is table lookups keyed by the user's
//! primary goal.

use rand::seq::SliceRandom;
use tracing::info;

use super::types::{
    GoalType, HydrationPlan, MacroSplit, Macros, MealType, NutritionPlan, SampleMeal, UserProfile,
};

const DEFAULT_WEIGHT_KG: f64 = 70.0;
const DEFAULT_HEIGHT_CM: f64 = 170.0;
const DEFAULT_AGE: f64 = 30.0;

/// Goal → calorie multiplier over the base estimate.
fn calorie_adjustment(goal: GoalType) -> f64 {
    match goal {
        GoalType::WeightLoss => 0.8,
        GoalType::MuscleGain => 1.15,
        GoalType::Endurance => 1.1,
        GoalType::Flexibility | GoalType::GeneralFitness => 1.0,
    }
}

/// Goal → macronutrient percentage split.
fn macro_split(goal: GoalType) -> MacroSplit {
    match goal {
        GoalType::WeightLoss => MacroSplit { protein: 35, carbs: 30, fat: 35 },
        GoalType::MuscleGain => MacroSplit { protein: 30, carbs: 50, fat: 20 },
        GoalType::Endurance => MacroSplit { protein: 20, carbs: 60, fat: 20 },
        GoalType::Flexibility => MacroSplit { protein: 25, carbs: 45, fat: 30 },
        GoalType::GeneralFitness => MacroSplit { protein: 25, carbs: 50, fat: 25 },
    }
}

/// Goal → meals per day.
fn meal_frequency(goal: GoalType) -> u32 {
    match goal {
        GoalType::MuscleGain => 5,
        GoalType::Endurance => 4,
        GoalType::WeightLoss | GoalType::Flexibility | GoalType::GeneralFitness => 3,
    }
}

fn goal_recommendations(goal: GoalType) -> &'static [&'static str] {
    match goal {
        GoalType::WeightLoss => &[
            "Focus on lean proteins and fibrous vegetables",
            "Limit starchy carbs to earlier in the day",
            "Stay hydrated with at least 3 liters of water daily",
            "Consider intermittent fasting (16/8) if it fits your schedule",
        ],
        GoalType::MuscleGain => &[
            "Consume protein with every meal (25-30g)",
            "Eat carbs before and after workouts",
            "Include a protein-rich meal before bed",
            "Consider a post-workout shake with protein and fast-digesting carbs",
        ],
        GoalType::Endurance => &[
            "Focus on complex carbohydrates like whole grains",
            "Consume easily digestible carbs 1-2 hours before workouts",
            "Hydrate with electrolyte drinks during longer sessions",
            "Include anti-inflammatory foods like berries and fatty fish",
        ],
        GoalType::Flexibility => &[
            "Include anti-inflammatory foods like turmeric and ginger",
            "Stay well-hydrated to support joint and muscle health",
            "Consider collagen supplementation",
            "Include plenty of omega-3 fatty acids from fish or plant sources",
        ],
        GoalType::GeneralFitness => &[
            "Focus on whole foods with minimal processing",
            "Include a variety of colorful fruits and vegetables",
            "Balance your plate with protein, complex carbs, and healthy fats",
            "Stay hydrated throughout the day",
        ],
    }
}

fn restriction_recommendations(restriction: &str) -> Option<&'static [&'static str]> {
    match restriction {
        "vegetarian" => Some(&[
            "Focus on plant-based proteins like legumes, tofu, and tempeh",
            "Consider protein complementation (combining foods to get complete proteins)",
            "Monitor vitamin B12, iron, and zinc intake",
        ]),
        "vegan" => Some(&[
            "Include a variety of plant proteins like legumes, nuts, seeds, and soy products",
            "Consider supplementing with vitamin B12, vitamin D, and omega-3s",
            "Use fortified plant milks and nutritional yeast for additional nutrients",
        ]),
        "gluten-free" => Some(&[
            "Focus on naturally gluten-free grains like rice, quinoa, and buckwheat",
            "Be cautious of cross-contamination in packaged foods",
            "Get fiber from fruits, vegetables, and gluten-free whole grains",
        ]),
        _ => None,
    }
}

/// Calculated base requirements, before meal generation.
pub struct NutritionRequirements {
    pub daily_calories: u32,
    pub macro_split: MacroSplit,
    pub meal_frequency: u32,
    pub recommendations: Vec<String>,
}

/// Compute calorie/macro requirements for a profile.
///
/// Monotone in weight for a fixed goal: heavier never means fewer
/// calories.
pub fn calculate_requirements(profile: &UserProfile) -> NutritionRequirements {
    let weight = profile.weight.unwrap_or(DEFAULT_WEIGHT_KG);
    let height = profile.height.unwrap_or(DEFAULT_HEIGHT_CM);
    let age = profile.age.map(f64::from).unwrap_or(DEFAULT_AGE);

    let base = (10.0 * weight) + (6.25 * height) - (5.0 * age);

    let goal = profile.main_goal();
    let daily_calories = (base * calorie_adjustment(goal)).round().max(0.0) as u32;

    let mut recommendations: Vec<String> = goal_recommendations(goal)
        .iter()
        .map(|s| s.to_string())
        .collect();
    for restriction in &profile.dietary_restrictions {
        if let Some(recs) = restriction_recommendations(restriction) {
            recommendations.extend(recs.iter().map(|s| s.to_string()));
        }
    }

    NutritionRequirements {
        daily_calories,
        macro_split: macro_split(goal),
        meal_frequency: meal_frequency(goal),
        recommendations,
    }
}

/// Generate a full nutrition plan: requirements plus sampled meals.
pub fn generate_nutrition_plan(profile: &UserProfile) -> NutritionPlan {
    let reqs = calculate_requirements(profile);
    let meal_plan = generate_sample_meal_plan(
        reqs.daily_calories,
        reqs.macro_split,
        reqs.meal_frequency,
        &profile.dietary_restrictions,
    );

    info!(calories = reqs.daily_calories, "Generated nutrition plan");

    NutritionPlan {
        daily_calories: reqs.daily_calories,
        macro_split: reqs.macro_split,
        meal_frequency: reqs.meal_frequency,
        recommendations: reqs.recommendations,
        meal_plan,
    }
}

/// Sample one meal per slot, restriction-aware. Ingredients are drawn at
/// random from fixed option lists.
pub fn generate_sample_meal_plan(
    daily_calories: u32,
    split: MacroSplit,
    meal_frequency: u32,
    restrictions: &[String],
) -> Vec<SampleMeal> {
    let calories_per_meal = daily_calories / meal_frequency.max(1);
    let is_vegan = restrictions.iter().any(|r| r == "vegan");
    let is_vegetarian = is_vegan || restrictions.iter().any(|r| r == "vegetarian");
    let is_gluten_free = restrictions.iter().any(|r| r == "gluten-free");

    let protein_options: &[&str] = if is_vegan {
        &["tofu", "tempeh", "lentils", "chickpeas", "black beans"]
    } else if is_vegetarian {
        &["eggs", "Greek yogurt", "cottage cheese", "tofu", "tempeh"]
    } else {
        &["chicken breast", "salmon", "lean beef", "tuna", "turkey"]
    };
    let carb_options: &[&str] = if is_gluten_free {
        &["rice", "quinoa", "sweet potatoes", "gluten-free oats", "buckwheat"]
    } else {
        &["whole grain bread", "oats", "brown rice", "whole wheat pasta", "barley"]
    };
    let fat_options: &[&str] = &["avocado", "olive oil", "almonds", "walnuts", "chia seeds"];

    let mut rng = rand::thread_rng();
    let mut meals = Vec::with_capacity(meal_frequency as usize);

    for i in 1..=meal_frequency {
        let (meal_type, name) = if i == 1 {
            (MealType::Breakfast, "Breakfast".to_string())
        } else if i == meal_frequency {
            (MealType::Dinner, "Dinner".to_string())
        } else if i == 2 && meal_frequency >= 3 {
            (MealType::Lunch, "Lunch".to_string())
        } else {
            let snack_offset = if meal_frequency > 3 { 3 } else { 2 };
            (MealType::Snack, format!("Snack {}", i - snack_offset))
        };

        let protein = protein_options.choose(&mut rng).copied().unwrap_or("tofu");
        let carb = carb_options.choose(&mut rng).copied().unwrap_or("rice");
        let fat = fat_options.choose(&mut rng).copied().unwrap_or("avocado");

        let description = match meal_type {
            MealType::Breakfast => {
                if is_vegan {
                    format!("{protein} scramble with vegetables and {fat}, served with {carb}")
                } else if is_vegetarian {
                    format!("{protein} with {carb} and {fat}")
                } else {
                    format!("{protein} omelette with vegetables and {carb}, topped with {fat}")
                }
            }
            MealType::Lunch | MealType::Dinner => {
                format!("{protein} with {carb} and mixed vegetables, dressed with {fat}")
            }
            MealType::Snack => format!("{carb} with {protein} and {fat}"),
        };

        // 4 cal/g for protein and carbs, 9 cal/g for fat.
        let macros = Macros {
            calories: calories_per_meal,
            protein: (calories_per_meal as f64 * (split.protein as f64 / 100.0) / 4.0).round()
                as u32,
            carbs: (calories_per_meal as f64 * (split.carbs as f64 / 100.0) / 4.0).round() as u32,
            fat: (calories_per_meal as f64 * (split.fat as f64 / 100.0) / 9.0).round() as u32,
        };

        meals.push(SampleMeal {
            name,
            description,
            meal_type,
            ingredients: vec![
                protein.to_string(),
                carb.to_string(),
                fat.to_string(),
                "mixed vegetables".to_string(),
                "seasonings".to_string(),
            ],
            macros,
        });
    }

    meals
}

/// Hydration: 35 ml per kg of bodyweight plus an activity bonus, rounded
/// to a tenth of a liter.
pub fn generate_hydration_plan(weight_kg: f64, activity_level: &str) -> HydrationPlan {
    let mut base_ml = weight_kg * 35.0;

    match activity_level {
        "high" => base_ml += 500.0,
        "moderate" => base_ml += 250.0,
        _ => {}
    }

    let daily_water_intake = (base_ml / 100.0).round() / 10.0;

    HydrationPlan {
        daily_water_intake,
        recommendations: vec![
            format!("Drink approximately {daily_water_intake} liters of water daily"),
            "Start your day with a glass of water before breakfast".to_string(),
            "Carry a water bottle with you throughout the day".to_string(),
            "Drink a glass of water before each meal".to_string(),
            "Set reminders if you frequently forget to drink water".to_string(),
            "Adjust intake based on climate, workout intensity, and individual needs".to_string(),
            "Reduce slightly in the evening to avoid disrupting sleep".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::fitness::types::FitnessGoal;

    fn profile_with(weight: f64, goal: GoalType) -> UserProfile {
        UserProfile {
            weight: Some(weight),
            height: Some(170.0),
            age: Some(30),
            goals: vec![FitnessGoal {
                goal_type: goal,
                target_value: None,
                time_frame: None,
            }],
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_calories_monotone_in_weight() {
        for goal in [
            GoalType::WeightLoss,
            GoalType::MuscleGain,
            GoalType::Endurance,
            GoalType::Flexibility,
            GoalType::GeneralFitness,
        ] {
            let mut last = 0;
            for weight in [50.0, 60.0, 70.0, 85.0, 100.0, 140.0] {
                let reqs = calculate_requirements(&profile_with(weight, goal));
                assert!(
                    reqs.daily_calories >= last,
                    "calories decreased for goal {:?} at weight {}",
                    goal,
                    weight
                );
                last = reqs.daily_calories;
            }
        }
    }

    #[test]
    fn test_defaults_applied_when_fields_missing() {
        let reqs = calculate_requirements(&UserProfile::default());
        // 10*70 + 6.25*170 - 5*30 = 1612.5, maintenance multiplier
        assert_eq!(reqs.daily_calories, 1613);
        assert_eq!(reqs.meal_frequency, 3);
    }

    #[test]
    fn test_weight_loss_is_deficit() {
        let maintenance = calculate_requirements(&profile_with(70.0, GoalType::GeneralFitness));
        let cutting = calculate_requirements(&profile_with(70.0, GoalType::WeightLoss));
        assert!(cutting.daily_calories < maintenance.daily_calories);
    }

    #[test]
    fn test_macro_splits_sum_to_100() {
        for goal in [
            GoalType::WeightLoss,
            GoalType::MuscleGain,
            GoalType::Endurance,
            GoalType::Flexibility,
            GoalType::GeneralFitness,
        ] {
            let split = macro_split(goal);
            assert_eq!(split.protein + split.carbs + split.fat, 100);
        }
    }

    #[test]
    fn test_meal_plan_slot_assignment() {
        let split = macro_split(GoalType::MuscleGain);
        let meals = generate_sample_meal_plan(3000, split, 5, &[]);
        assert_eq!(meals.len(), 5);
        assert_eq!(meals[0].meal_type, MealType::Breakfast);
        assert_eq!(meals[1].meal_type, MealType::Lunch);
        assert_eq!(meals[2].meal_type, MealType::Snack);
        assert_eq!(meals[4].meal_type, MealType::Dinner);
        assert_eq!(meals[0].macros.calories, 600);
    }

    #[test]
    fn test_vegan_meals_avoid_meat() {
        let split = macro_split(GoalType::GeneralFitness);
        let meals = generate_sample_meal_plan(2000, split, 3, &["vegan".to_string()]);
        for meal in &meals {
            for bad in ["chicken breast", "salmon", "lean beef", "tuna", "turkey", "eggs"] {
                assert!(!meal.ingredients.iter().any(|i| i == bad));
            }
        }
    }

    #[test]
    fn test_restriction_recommendations_added() {
        let mut profile = profile_with(70.0, GoalType::GeneralFitness);
        profile.dietary_restrictions = vec!["vegan".to_string()];
        let reqs = calculate_requirements(&profile);
        assert!(reqs
            .recommendations
            .iter()
            .any(|r| r.contains("vitamin B12")));
    }

    #[test]
    fn test_hydration_plan() {
        let plan = generate_hydration_plan(70.0, "moderate");
        // 70*35 + 250 = 2700 ml → 2.7 L
        assert!((plan.daily_water_intake - 2.7).abs() < f64::EPSILON);

        let high = generate_hydration_plan(70.0, "high");
        assert!(high.daily_water_intake > plan.daily_water_intake);
    }
}
