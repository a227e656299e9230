//! Workout planning: static exercise table, goal-driven plan generation,
//! weekly scheduling, and feedback-based adjustment.

use tracing::info;

use super::types::{
    Exercise, ExerciseType, FitnessLevel, GoalType, UserProfile, WorkoutFeedback, WorkoutPlan,
};

/// Built-in exercise table. Selection slices index into the per-type
/// groupings below, so ordering within a type matters.
const EXERCISES: &[Exercise] = &[
    Exercise {
        name: "Brisk Walking",
        exercise_type: ExerciseType::Cardio,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["legs", "cardiovascular"],
        description: "Walking at a pace that increases your heart rate",
        instructions: &[
            "Stand tall with good posture",
            "Look forward, not at the ground",
            "Bend your arms at 90 degrees",
            "Walk at a pace where you can still talk but are breathing heavier than normal",
        ],
        duration_or_reps: "20-30 minutes",
        rest_time: None,
        equipment: &[],
    },
    Exercise {
        name: "Step-Ups",
        exercise_type: ExerciseType::Cardio,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["legs", "glutes", "cardiovascular"],
        description: "Stepping up and down on a raised platform",
        instructions: &[
            "Stand facing a sturdy step or bench",
            "Step up with your right foot, then your left foot",
            "Step down with your right foot, then your left foot",
            "Alternate the leading foot every set",
        ],
        duration_or_reps: "3 sets of 1 minute each",
        rest_time: None,
        equipment: &["step", "bench"],
    },
    Exercise {
        name: "Push-Up",
        exercise_type: ExerciseType::Strength,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["chest", "shoulders", "triceps", "core"],
        description: "A classic bodyweight exercise that targets the upper body and core.",
        instructions: &[
            "Start in a plank position with hands shoulder-width apart",
            "Keep your body in a straight line from head to heels",
            "Lower your body until your chest nearly touches the floor",
            "Push back up to the starting position",
        ],
        duration_or_reps: "3 sets of 10-15 reps",
        rest_time: Some("60 seconds between sets"),
        equipment: &[],
    },
    Exercise {
        name: "Bodyweight Squat",
        exercise_type: ExerciseType::Strength,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["quadriceps", "hamstrings", "glutes", "core"],
        description: "A fundamental lower body exercise that builds strength and stability.",
        instructions: &[
            "Stand with feet shoulder-width apart",
            "Lower your body by bending knees and pushing hips back",
            "Keep chest up and knees tracking over toes",
            "Descend until thighs are parallel to ground (or as low as comfortable)",
            "Push through heels to return to standing",
        ],
        duration_or_reps: "3 sets of 15-20 reps",
        rest_time: Some("60 seconds between sets"),
        equipment: &[],
    },
    Exercise {
        name: "Plank",
        exercise_type: ExerciseType::Strength,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["core", "shoulders", "back"],
        description: "An isometric core strengthening exercise",
        instructions: &[
            "Start in a push-up position, but with forearms on the ground",
            "Keep elbows directly under shoulders",
            "Maintain a straight line from head to heels",
            "Engage your core and hold the position",
        ],
        duration_or_reps: "3 sets of 20-30 seconds",
        rest_time: Some("30 seconds between sets"),
        equipment: &[],
    },
    Exercise {
        name: "Standing Hamstring Stretch",
        exercise_type: ExerciseType::Flexibility,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["hamstrings", "lower back"],
        description: "A gentle stretch for the back of the legs",
        instructions: &[
            "Stand with feet hip-width apart",
            "Bend forward at the hips, keeping your back straight",
            "Reach toward your toes as far as comfortable",
            "Hold the position, feeling the stretch in your hamstrings",
        ],
        duration_or_reps: "Hold for 20-30 seconds, repeat 3 times",
        rest_time: None,
        equipment: &[],
    },
    Exercise {
        name: "Shoulder Stretch",
        exercise_type: ExerciseType::Flexibility,
        difficulty: FitnessLevel::Beginner,
        muscle_groups: &["shoulders", "chest"],
        description: "A stretch for the shoulder and chest muscles",
        instructions: &[
            "Bring one arm across your chest",
            "Use the opposite hand to gently pull the elbow toward your chest",
            "Hold the stretch feeling tension in the shoulder",
            "Switch sides and repeat",
        ],
        duration_or_reps: "Hold for 20-30 seconds each side",
        rest_time: None,
        equipment: &[],
    },
];

const ALL_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn exercises() -> &'static [Exercise] {
    EXERCISES
}

pub fn exercises_by_type(exercise_type: ExerciseType) -> Vec<Exercise> {
    EXERCISES
        .iter()
        .filter(|ex| ex.exercise_type == exercise_type)
        .cloned()
        .collect()
}

pub fn exercises_by_difficulty(difficulty: FitnessLevel) -> Vec<Exercise> {
    EXERCISES
        .iter()
        .filter(|ex| ex.difficulty == difficulty)
        .cloned()
        .collect()
}

pub fn exercises_by_muscle_group(muscle_group: &str) -> Vec<Exercise> {
    EXERCISES
        .iter()
        .filter(|ex| {
            ex.muscle_groups
                .iter()
                .any(|g| g.eq_ignore_ascii_case(muscle_group))
        })
        .cloned()
        .collect()
}

/// Generate a workout plan for the user's fitness level and goal.
///
/// Each goal weights the exercise mix differently: weight loss leans
/// cardio, muscle gain leans strength, flexibility leans stretching.
pub fn generate_workout_plan(profile: &UserProfile, goal: GoalType) -> WorkoutPlan {
    info!(goal = goal.label(), "Generating workout plan");

    let level = profile.fitness_level;
    let pool = exercises_by_difficulty(level);

    let cardio: Vec<Exercise> = pool
        .iter()
        .filter(|ex| ex.exercise_type == ExerciseType::Cardio)
        .cloned()
        .collect();
    let strength: Vec<Exercise> = pool
        .iter()
        .filter(|ex| ex.exercise_type == ExerciseType::Strength)
        .cloned()
        .collect();
    let flexibility: Vec<Exercise> = pool
        .iter()
        .filter(|ex| ex.exercise_type == ExerciseType::Flexibility)
        .cloned()
        .collect();

    let take = |v: &[Exercise], n: usize| v.iter().take(n).cloned().collect::<Vec<_>>();

    let selected: Vec<Exercise> = match goal {
        GoalType::WeightLoss => [cardio.clone(), take(&strength, 2), take(&flexibility, 1)].concat(),
        GoalType::MuscleGain => [take(&cardio, 1), strength.clone(), take(&flexibility, 1)].concat(),
        GoalType::Endurance => [cardio.clone(), take(&strength, 1), take(&flexibility, 1)].concat(),
        GoalType::Flexibility => {
            [flexibility.clone(), take(&strength, 1), take(&cardio, 1)].concat()
        }
        GoalType::GeneralFitness => {
            [take(&cardio, 1), take(&strength, 2), take(&flexibility, 1)].concat()
        }
    };

    let frequency = profile.workout_frequency();
    let duration = profile.workout_preferences.preferred_duration.unwrap_or(45);

    WorkoutPlan {
        name: format!("{} Workout Plan", capitalize(goal.label())),
        target_goal: goal,
        difficulty: level,
        frequency,
        duration,
        exercises: selected,
    }
}

/// Adjust a plan based on user feedback.
pub fn adjust_workout_plan(plan: &WorkoutPlan, feedback: &WorkoutFeedback) -> WorkoutPlan {
    info!("Adjusting workout plan based on user feedback");

    let mut adjusted = plan.clone();

    if feedback.too_easy {
        adjusted.difficulty = plan.difficulty.harder();
    } else if feedback.too_hard {
        adjusted.difficulty = plan.difficulty.easier();
    }

    if feedback.time_too_long {
        adjusted.duration = plan.duration.saturating_sub(10).max(20);
    }

    if !feedback.painful_exercises.is_empty() {
        adjusted
            .exercises
            .retain(|ex| !feedback.painful_exercises.iter().any(|p| p == ex.name));

        // Refill to a three-exercise floor with replacements at the
        // adjusted difficulty.
        if adjusted.exercises.len() < 3 {
            let replacements: Vec<Exercise> = exercises_by_difficulty(adjusted.difficulty)
                .into_iter()
                .filter(|ex| {
                    !adjusted.exercises.iter().any(|kept| kept.name == ex.name)
                        && !feedback.painful_exercises.iter().any(|p| p == ex.name)
                })
                .collect();
            let needed = 3usize.saturating_sub(adjusted.exercises.len());
            adjusted.exercises.extend(replacements.into_iter().take(needed));
        }
    }

    if feedback.boring_exercises {
        let kept: Vec<Exercise> = adjusted
            .exercises
            .iter()
            .filter(|ex| feedback.enjoyed_exercises.iter().any(|e| e == ex.name))
            .cloned()
            .collect();

        let fresh: Vec<Exercise> = exercises_by_difficulty(adjusted.difficulty)
            .into_iter()
            .filter(|ex| !adjusted.exercises.iter().any(|cur| cur.name == ex.name))
            .collect();

        let target = plan.exercises.len().max(3);
        let mut exercises = kept;
        let room = target.saturating_sub(exercises.len());
        exercises.extend(fresh.into_iter().take(room));
        adjusted.exercises = exercises;
    }

    adjusted
}

/// Lay the plan out over a week: preferred days when there are enough of
/// them, otherwise evenly distributed; the rest are rest days.
pub fn generate_weekly_schedule(
    plan: &WorkoutPlan,
    preferred_days: &[String],
) -> Vec<(String, String)> {
    let frequency = plan.frequency as usize;

    let workout_days: Vec<String> = if preferred_days.len() >= frequency {
        preferred_days[..frequency].to_vec()
    } else {
        distribute_workout_days(frequency)
    };

    ALL_DAYS
        .iter()
        .map(|day| {
            let slot = workout_days.iter().position(|d| d.as_str() == *day);
            let label = match slot {
                Some(index) => workout_description(plan.target_goal, index),
                None => "Rest Day".to_string(),
            };
            (day.to_string(), label)
        })
        .collect()
}

fn distribute_workout_days(frequency: usize) -> Vec<String> {
    if frequency >= ALL_DAYS.len() {
        return ALL_DAYS.iter().map(|d| d.to_string()).collect();
    }

    let gap = ALL_DAYS.len() / frequency.max(1);
    (0..frequency).map(|i| ALL_DAYS[i * gap].to_string()).collect()
}

fn workout_description(goal: GoalType, day_index: usize) -> String {
    let options: &[&str] = match goal {
        GoalType::WeightLoss => &["Cardio Focus", "Full Body Circuit", "HIIT Training", "Active Recovery"],
        GoalType::MuscleGain => &["Upper Body", "Lower Body", "Full Body", "Hypertrophy Focus"],
        GoalType::Endurance => &[
            "Long Duration Cardio",
            "Interval Training",
            "Tempo Training",
            "Active Recovery",
        ],
        GoalType::Flexibility => &[
            "Yoga Flow",
            "Mobility Work",
            "Dynamic Stretching",
            "Static Stretching",
        ],
        GoalType::GeneralFitness => &[
            "Full Body",
            "Cardio Focus",
            "Upper Body",
            "Lower Body",
            "Core Focus",
        ],
    };
    options[day_index % options.len()].to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_all_types_at_beginner() {
        let beginner = exercises_by_difficulty(FitnessLevel::Beginner);
        assert!(beginner.iter().any(|e| e.exercise_type == ExerciseType::Cardio));
        assert!(beginner.iter().any(|e| e.exercise_type == ExerciseType::Strength));
        assert!(beginner
            .iter()
            .any(|e| e.exercise_type == ExerciseType::Flexibility));
    }

    #[test]
    fn test_muscle_group_lookup_is_case_insensitive() {
        assert!(!exercises_by_muscle_group("CORE").is_empty());
        assert!(exercises_by_muscle_group("wings").is_empty());
    }

    #[test]
    fn test_weight_loss_plan_leans_cardio() {
        let profile = UserProfile::default();
        let plan = generate_workout_plan(&profile, GoalType::WeightLoss);
        let cardio = plan
            .exercises
            .iter()
            .filter(|e| e.exercise_type == ExerciseType::Cardio)
            .count();
        let strength = plan
            .exercises
            .iter()
            .filter(|e| e.exercise_type == ExerciseType::Strength)
            .count();
        assert_eq!(cardio, 2);
        assert_eq!(strength, 2);
        assert_eq!(plan.frequency, 3);
        assert_eq!(plan.duration, 45);
        assert_eq!(plan.name, "Weight loss Workout Plan");
    }

    #[test]
    fn test_muscle_gain_plan_leans_strength() {
        let profile = UserProfile::default();
        let plan = generate_workout_plan(&profile, GoalType::MuscleGain);
        let strength = plan
            .exercises
            .iter()
            .filter(|e| e.exercise_type == ExerciseType::Strength)
            .count();
        assert_eq!(strength, 3);
    }

    #[test]
    fn test_schedule_uses_preferred_days() {
        let profile = UserProfile::default();
        let plan = generate_workout_plan(&profile, GoalType::GeneralFitness);
        let preferred = vec!["Tuesday".to_string(), "Thursday".to_string(), "Saturday".to_string()];
        let schedule = generate_weekly_schedule(&plan, &preferred);

        let map: std::collections::HashMap<_, _> = schedule.into_iter().collect();
        assert_ne!(map["Tuesday"], "Rest Day");
        assert_ne!(map["Thursday"], "Rest Day");
        assert_ne!(map["Saturday"], "Rest Day");
        assert_eq!(map["Sunday"], "Rest Day");
    }

    #[test]
    fn test_schedule_distributes_when_no_preference() {
        let profile = UserProfile::default();
        let plan = generate_workout_plan(&profile, GoalType::GeneralFitness);
        let schedule = generate_weekly_schedule(&plan, &[]);
        let workout_days = schedule
            .iter()
            .filter(|(_, v)| v.as_str() != "Rest Day")
            .count();
        assert_eq!(workout_days, 3);
    }

    #[test]
    fn test_feedback_drops_painful_and_refills() {
        let profile = UserProfile::default();
        let plan = generate_workout_plan(&profile, GoalType::GeneralFitness);
        let feedback = WorkoutFeedback {
            painful_exercises: vec!["Push-Up".into(), "Bodyweight Squat".into()],
            ..WorkoutFeedback::default()
        };
        let adjusted = adjust_workout_plan(&plan, &feedback);
        assert!(adjusted.exercises.len() >= 3);
        assert!(!adjusted.exercises.iter().any(|e| e.name == "Push-Up"));
    }

    #[test]
    fn test_feedback_duration_floor() {
        let profile = UserProfile::default();
        let mut plan = generate_workout_plan(&profile, GoalType::GeneralFitness);
        plan.duration = 25;
        let feedback = WorkoutFeedback {
            time_too_long: true,
            ..WorkoutFeedback::default()
        };
        let adjusted = adjust_workout_plan(&plan, &feedback);
        assert_eq!(adjusted.duration, 20);
    }

    #[test]
    fn test_feedback_difficulty_shift() {
        let profile = UserProfile::default();
        let plan = generate_workout_plan(&profile, GoalType::GeneralFitness);
        let harder = adjust_workout_plan(
            &plan,
            &WorkoutFeedback {
                too_easy: true,
                ..WorkoutFeedback::default()
            },
        );
        assert_eq!(harder.difficulty, FitnessLevel::Intermediate);
    }
}
