//! Progress tracking: rate-of-change, workout compliance, and
//! threshold-picked insight/recommendation strings.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use tracing::info;

use super::types::{GoalProgress, GoalType, ProgressEntry, ProgressSummary, UserProfile};

/// Append a progress entry and keep the log date-sorted.
pub fn log_progress(profile: &mut UserProfile, entry: ProgressEntry) {
    info!(date = %entry.date, "Logging progress entry");
    profile.progress.push(entry);
    profile.progress.sort_by_key(|e| e.date);
}

fn sorted_progress(profile: &UserProfile) -> Vec<ProgressEntry> {
    let mut entries = profile.progress.clone();
    entries.sort_by_key(|e| e.date);
    entries
}

fn completed_workouts(entries: &[ProgressEntry]) -> u32 {
    entries
        .iter()
        .filter(|e| e.workout.as_ref().map(|w| w.completed).unwrap_or(false))
        .count() as u32
}

/// Compliance percentage: completed / expected, clamped to [0, 100].
/// Expected workouts assume the profile's weekly frequency over the
/// tracked period.
pub fn workout_compliance(total_workouts: u32, duration_days: i64, frequency: u32) -> u32 {
    let expected = ((duration_days as f64 / 7.0) * frequency as f64).ceil().max(1.0);
    let raw = (total_workouts as f64 / expected * 100.0).round() as u32;
    raw.min(100)
}

/// Summarize progress over the whole tracked period.
pub fn progress_summary(profile: &UserProfile) -> ProgressSummary {
    if profile.progress.is_empty() {
        return ProgressSummary {
            period: "No data".to_string(),
            weight_change: None,
            total_workouts: 0,
            workout_compliance: 0,
            insights: vec!["Not enough data to generate insights".to_string()],
            recommendations: vec!["Start logging your workouts and measurements".to_string()],
        };
    }

    let entries = sorted_progress(profile);
    let start_date = entries[0].date;
    let end_date = entries[entries.len() - 1].date;
    let duration_days = (end_date - start_date).num_days();

    let weight_change = match (entries.first().and_then(|e| e.weight), entries.last().and_then(|e| e.weight)) {
        (Some(first), Some(last)) => Some(last - first),
        _ => None,
    };

    let total_workouts = completed_workouts(&entries);
    let compliance = workout_compliance(total_workouts, duration_days, profile.workout_frequency());

    let mut insights = Vec::new();

    if duration_days < 7 {
        insights.push("You're just getting started! Consistency is key in the early days.".to_string());
    } else if duration_days >= 30 {
        insights.push(
            "You've been tracking for a month or more - great job maintaining your program!"
                .to_string(),
        );
    }

    if let Some(change) = weight_change {
        if duration_days > 0 {
            let per_week = (change / duration_days as f64) * 7.0;
            if per_week.abs() > 1.0 {
                insights.push(format!(
                    "Your weight is changing at {:.1} kg per week, which is faster than the recommended 0.25-0.5 kg per week for sustainable results.",
                    per_week.abs()
                ));
            } else if per_week.abs() >= 0.25 {
                insights.push(format!(
                    "Your weight is changing at a steady pace of about {:.1} kg per week, which is sustainable and healthy.",
                    per_week.abs()
                ));
            }
        }
    }

    if compliance >= 90 {
        insights.push(format!(
            "Excellent workout consistency at {compliance}%! Your commitment is outstanding."
        ));
    } else if compliance >= 70 {
        insights.push(format!(
            "Good workout compliance at {compliance}%. You're building a solid routine."
        ));
    } else if compliance < 50 && duration_days > 14 {
        insights.push(format!(
            "Your workout compliance is {compliance}%. Finding ways to improve consistency would help you reach your goals faster."
        ));
    }

    if insights.is_empty() {
        insights.push("Keep tracking your progress to generate more personalized insights.".to_string());
    }

    let mut recommendations = Vec::new();

    if compliance < 70 {
        recommendations.push(
            "Try scheduling workouts at consistent times each week to build a sustainable routine."
                .to_string(),
        );
        recommendations.push(
            "Consider shorter, more frequent workouts if time is a limiting factor.".to_string(),
        );
    }

    if let Some(change) = weight_change {
        match profile.main_goal() {
            GoalType::WeightLoss if change >= 0.0 => {
                recommendations.push(
                    "For weight loss, consider tracking calories more closely and adjusting portion sizes."
                        .to_string(),
                );
                recommendations.push(
                    "Add 1-2 additional cardio sessions per week to increase your calorie deficit."
                        .to_string(),
                );
            }
            GoalType::MuscleGain if change <= 0.0 => {
                recommendations.push(
                    "For muscle gain, try increasing your caloric intake by 200-300 calories per day."
                        .to_string(),
                );
                recommendations.push(
                    "Focus on protein-rich foods and prioritize strength training for muscle growth."
                        .to_string(),
                );
            }
            _ => {}
        }
    }

    recommendations.push(
        "Continue logging your progress consistently to get more accurate insights and recommendations."
            .to_string(),
    );

    ProgressSummary {
        period: format!("{start_date} to {end_date} ({duration_days} days)"),
        weight_change,
        total_workouts,
        workout_compliance: compliance,
        insights,
        recommendations,
    }
}

/// Evaluate whether the user is tracking toward a specific goal.
pub fn evaluate_goal_progress(profile: &UserProfile, target_goal: GoalType) -> GoalProgress {
    if profile.progress.len() < 2 {
        return GoalProgress {
            on_track: false,
            percent_complete: None,
            time_remaining: None,
            adjustments: vec![
                "Not enough data yet to evaluate progress. Continue logging your workouts and measurements."
                    .to_string(),
            ],
        };
    }

    let Some(goal) = profile.goals.iter().find(|g| g.goal_type == target_goal) else {
        return GoalProgress {
            on_track: false,
            percent_complete: None,
            time_remaining: None,
            adjustments: vec![format!(
                "No \"{}\" goal found in your profile. Set specific goals to track progress.",
                target_goal.label()
            )],
        };
    };

    let entries = sorted_progress(profile);
    let elapsed_days = (entries[entries.len() - 1].date - entries[0].date).num_days();

    // Weight-based goals
    if matches!(target_goal, GoalType::WeightLoss | GoalType::MuscleGain) {
        let (Some(start_weight), Some(current_weight)) = (
            entries.first().and_then(|e| e.weight),
            entries.last().and_then(|e| e.weight),
        ) else {
            return GoalProgress {
                on_track: false,
                percent_complete: None,
                time_remaining: None,
                adjustments: vec![
                    "Weight measurements are missing. Regular weigh-ins help track progress."
                        .to_string(),
                ],
            };
        };

        let weight_change = current_weight - start_weight;
        let weekly_change = if elapsed_days > 0 {
            (weight_change / elapsed_days as f64) * 7.0
        } else {
            0.0
        };

        let losing = target_goal == GoalType::WeightLoss;
        let on_track = if losing {
            weekly_change < 0.0
        } else {
            weekly_change > 0.0
        };

        if let Some(target_value) = goal.target_value {
            let target_change = target_value - start_weight;
            let percent = if target_change.abs() > f64::EPSILON {
                ((weight_change / target_change) * 100.0).round()
            } else {
                100.0
            };
            let percent_complete = if on_track {
                Some(percent.clamp(0.0, 100.0) as u32)
            } else {
                Some(0)
            };
            let time_remaining = if on_track && weekly_change.abs() > f64::EPSILON {
                Some((((target_value - current_weight) / weekly_change).abs() * 7.0).ceil() as u32)
            } else {
                None
            };

            let adjustments = if on_track {
                vec![format!(
                    "You're making progress toward your {} goal. Keep up the good work!",
                    target_goal.label()
                )]
            } else if losing {
                vec!["You're not currently losing weight. Consider adjusting your nutrition and exercise plan.".to_string()]
            } else {
                vec!["You're not currently gaining weight. Consider increasing calories and focusing on strength training.".to_string()]
            };

            return GoalProgress {
                on_track,
                percent_complete,
                time_remaining,
                adjustments,
            };
        }

        return GoalProgress {
            on_track,
            percent_complete: None,
            time_remaining: None,
            adjustments: vec![
                format!(
                    "Your weight is changing by approximately {:.1} kg per week.",
                    weekly_change.abs()
                ),
                "Set a specific target weight in your goals for more detailed progress tracking."
                    .to_string(),
            ],
        };
    }

    // Workout-based goals (endurance, flexibility, general fitness)
    let workouts: Vec<&ProgressEntry> = entries
        .iter()
        .filter(|e| e.workout.as_ref().map(|w| w.completed).unwrap_or(false))
        .collect();

    if workouts.len() < 2 {
        return GoalProgress {
            on_track: false,
            percent_complete: None,
            time_remaining: None,
            adjustments: vec!["Not enough workout data to evaluate progress.".to_string()],
        };
    }

    let compliance = workout_compliance(
        workouts.len() as u32,
        elapsed_days,
        profile.workout_frequency(),
    );

    let type_share = |needle: &[&str]| -> f64 {
        let matching = workouts
            .iter()
            .filter(|e| {
                e.workout
                    .as_ref()
                    .and_then(|w| w.workout_type.as_ref())
                    .map(|t| {
                        let lower = t.to_lowercase();
                        needle.iter().any(|n| lower.contains(n))
                    })
                    .unwrap_or(false)
            })
            .count();
        matching as f64 / workouts.len() as f64
    };

    match target_goal {
        GoalType::Endurance => {
            let has_enough_cardio = type_share(&["cardio"]) >= 0.6;
            GoalProgress {
                on_track: compliance >= 70 && has_enough_cardio,
                percent_complete: Some(compliance),
                time_remaining: None,
                adjustments: vec![
                    if compliance < 70 {
                        "Try to increase your workout consistency for better endurance improvements."
                            .to_string()
                    } else {
                        "Your workout consistency is good for endurance improvements.".to_string()
                    },
                    if !has_enough_cardio {
                        "Include more cardio-focused workouts to improve endurance.".to_string()
                    } else {
                        "Good job including cardio workouts in your routine.".to_string()
                    },
                ],
            }
        }
        GoalType::Flexibility => {
            let has_enough_flex = type_share(&["flex", "yoga", "stretch"]) >= 0.5;
            GoalProgress {
                on_track: compliance >= 70 && has_enough_flex,
                percent_complete: Some(compliance),
                time_remaining: None,
                adjustments: vec![
                    if compliance < 70 {
                        "Try to increase your workout consistency for better flexibility improvements."
                            .to_string()
                    } else {
                        "Your workout consistency is good for flexibility improvements.".to_string()
                    },
                    if !has_enough_flex {
                        "Include more flexibility-focused workouts like yoga or stretching sessions."
                            .to_string()
                    } else {
                        "Good job focusing on flexibility in your routine.".to_string()
                    },
                ],
            }
        }
        _ => GoalProgress {
            on_track: compliance >= 70,
            percent_complete: Some(compliance),
            time_remaining: None,
            adjustments: vec![
                if compliance < 70 {
                    "Try to increase your workout consistency for better general fitness improvements."
                        .to_string()
                } else {
                    "Your workout consistency is good for general fitness.".to_string()
                },
                "Include a variety of workout types for balanced fitness development.".to_string(),
            ],
        },
    }
}

/// Pick a motivational message from the user's recent history, relative
/// to `today` so the two-week recency window is testable.
pub fn motivational_message(profile: &UserProfile, today: NaiveDate) -> String {
    if profile.progress.is_empty() {
        return "Every fitness journey begins with a single step. Today is your day to start!"
            .to_string();
    }

    let entries = sorted_progress(profile);
    let workouts = completed_workouts(&entries);
    let two_weeks_ago = today - chrono::Duration::days(14);
    let recent_workouts = entries
        .iter()
        .filter(|e| {
            e.date >= two_weeks_ago && e.workout.as_ref().map(|w| w.completed).unwrap_or(false)
        })
        .count();

    if workouts == 1 {
        return "Congratulations on completing your first workout! The journey of a thousand miles begins with a single step.".to_string();
    } else if workouts >= 10 && recent_workouts == 0 {
        return "It's been a while since your last workout. Remember: it's not about being perfect, it's about being consistent. Let's get back on track!".to_string();
    } else if recent_workouts >= 4 {
        return "Your recent consistency is impressive! Keep this momentum going - you're building habits that will last a lifetime.".to_string();
    } else if workouts >= 20 {
        return "You've completed over 20 workouts! Your dedication is paying off in ways you can see and feel.".to_string();
    }

    let defaults = [
        "Small steps every day lead to big results over time.",
        "Focus on progress, not perfection. Every workout counts!",
        "The only bad workout is the one that didn't happen. Show up for yourself today!",
        "Your future self is thanking you for the effort you're putting in now.",
        "Consistency beats intensity. Keep showing up and results will follow.",
    ];
    defaults
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(defaults[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::fitness::types::{FitnessGoal, WorkoutLog};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(d: &str, weight: Option<f64>, completed: bool) -> ProgressEntry {
        ProgressEntry {
            date: date(d),
            weight,
            body_fat: None,
            workout: Some(WorkoutLog {
                completed,
                workout_type: None,
                duration: None,
                notes: None,
            }),
            mood: None,
        }
    }

    #[test]
    fn test_compliance_clamped_to_100() {
        // 30 completed in one week at 3/week expected → way over 100
        assert_eq!(workout_compliance(30, 7, 3), 100);
        assert_eq!(workout_compliance(0, 7, 3), 0);
        // Partial compliance
        assert_eq!(workout_compliance(2, 7, 4), 50);
    }

    #[test]
    fn test_empty_summary() {
        let summary = progress_summary(&UserProfile::default());
        assert_eq!(summary.period, "No data");
        assert_eq!(summary.total_workouts, 0);
        assert_eq!(summary.workout_compliance, 0);
    }

    #[test]
    fn test_summary_weight_change() {
        let mut profile = UserProfile::default();
        log_progress(&mut profile, entry("2025-01-01", Some(82.0), true));
        log_progress(&mut profile, entry("2025-01-15", Some(80.0), true));

        let summary = progress_summary(&profile);
        assert_eq!(summary.weight_change, Some(-2.0));
        assert_eq!(summary.total_workouts, 2);
        assert!(summary.period.contains("14 days"));
    }

    #[test]
    fn test_log_progress_sorts_by_date() {
        let mut profile = UserProfile::default();
        log_progress(&mut profile, entry("2025-02-01", Some(80.0), false));
        log_progress(&mut profile, entry("2025-01-01", Some(82.0), false));
        assert_eq!(profile.progress[0].date, date("2025-01-01"));
    }

    #[test]
    fn test_goal_progress_needs_data() {
        let progress = evaluate_goal_progress(&UserProfile::default(), GoalType::WeightLoss);
        assert!(!progress.on_track);
        assert!(progress.adjustments[0].contains("Not enough data"));
    }

    #[test]
    fn test_weight_loss_goal_on_track() {
        let mut profile = UserProfile {
            goals: vec![FitnessGoal {
                goal_type: GoalType::WeightLoss,
                target_value: Some(75.0),
                time_frame: None,
            }],
            ..UserProfile::default()
        };
        log_progress(&mut profile, entry("2025-01-01", Some(85.0), true));
        log_progress(&mut profile, entry("2025-02-01", Some(80.0), true));

        let progress = evaluate_goal_progress(&profile, GoalType::WeightLoss);
        assert!(progress.on_track);
        // Halfway from 85 to 75
        assert_eq!(progress.percent_complete, Some(50));
        assert!(progress.time_remaining.is_some());
    }

    #[test]
    fn test_weight_loss_goal_off_track() {
        let mut profile = UserProfile {
            goals: vec![FitnessGoal {
                goal_type: GoalType::WeightLoss,
                target_value: Some(75.0),
                time_frame: None,
            }],
            ..UserProfile::default()
        };
        log_progress(&mut profile, entry("2025-01-01", Some(80.0), true));
        log_progress(&mut profile, entry("2025-02-01", Some(83.0), true));

        let progress = evaluate_goal_progress(&profile, GoalType::WeightLoss);
        assert!(!progress.on_track);
        assert_eq!(progress.percent_complete, Some(0));
    }

    #[test]
    fn test_motivational_first_workout() {
        let mut profile = UserProfile::default();
        log_progress(&mut profile, entry("2025-01-01", None, true));
        let msg = motivational_message(&profile, date("2025-01-02"));
        assert!(msg.contains("first workout"));
    }

    #[test]
    fn test_motivational_lapsed_user() {
        let mut profile = UserProfile::default();
        for day in 1..=12 {
            log_progress(
                &mut profile,
                entry(&format!("2025-01-{:02}", day), None, true),
            );
        }
        // Well past the two-week recency window
        let msg = motivational_message(&profile, date("2025-06-01"));
        assert!(msg.contains("been a while"));
    }
}
