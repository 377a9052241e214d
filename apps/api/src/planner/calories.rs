//! Calorie Estimator — daily energy target used when rendering the plan prompt.
//!
//! BMR uses the revised Harris-Benedict coefficients with a fixed age of 30.
//! The result is scaled by an activity multiplier and shifted by the goal.

/// Age assumed for every profile; the request carries no age.
const ASSUMED_AGE_YEARS: f64 = 30.0;

/// Multiplier used when the fitness level is not in the table.
const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.2;

/// Fitness level → activity multiplier.
///
/// Lookups compare against the trimmed, lower-cased fitness level while the
/// keys keep the form's casing, so only `advanced` ever matches. Every other
/// level falls back to `DEFAULT_ACTIVITY_MULTIPLIER`, and existing estimates
/// depend on that.
const ACTIVITY_MULTIPLIERS: [(&str, f64); 4] = [
    ("Beginner", 1.2),
    ("I do Sport from time to time", 1.43),
    ("I do sport regularly", 1.67),
    ("advanced", 1.9),
];

const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

/// Basal metabolic rate in kcal/day. Unrecognized genders yield 0.
pub fn basal_metabolic_rate(height_cm: f64, weight_kg: f64, gender: &str) -> f64 {
    match gender.trim().to_lowercase().as_str() {
        "male" => 88.362 + (13.397 * weight_kg) + (4.799 * height_cm) - (5.677 * ASSUMED_AGE_YEARS),
        "female" => {
            447.593 + (9.247 * weight_kg) + (3.098 * height_cm) - (4.330 * ASSUMED_AGE_YEARS)
        }
        _ => 0.0,
    }
}

pub fn activity_multiplier(fitness_level: &str) -> f64 {
    let level = fitness_level.trim().to_lowercase();
    ACTIVITY_MULTIPLIERS
        .iter()
        .find(|(key, _)| *key == level)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(DEFAULT_ACTIVITY_MULTIPLIER)
}

/// Estimated daily calorie target for the given body metrics and goal.
pub fn estimate_daily_calories(
    height_cm: f64,
    weight_kg: f64,
    gender: &str,
    purpose: &str,
    fitness_level: &str,
) -> f64 {
    let tdee = basal_metabolic_rate(height_cm, weight_kg, gender) * activity_multiplier(fitness_level);

    match purpose {
        "Gain Muscle" => tdee + GOAL_ADJUSTMENT_KCAL,
        "Lose Weight" => tdee - GOAL_ADJUSTMENT_KCAL,
        _ => tdee,
    }
}
