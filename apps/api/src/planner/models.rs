use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::planner::records::MealRecord;

/// Onboarding profile posted to `/get-meal-data`. Missing fields take their
/// defaults, and the numeric ones also read `null` as zero: the form sends
/// `null` for an empty metric input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(rename = "primaryPurpose")]
    pub purpose: String,
    /// cm
    #[serde(deserialize_with = "null_as_default")]
    pub height: f64,
    /// kg
    #[serde(deserialize_with = "null_as_default")]
    pub weight: f64,
    pub gender: String,
    pub diet_preference: BTreeMap<String, bool>,
    pub fitness_level: String,
    pub allergies: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meals_per_day: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub snacks_per_day: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Names of the selected diet preferences, in name order.
pub fn selected_preferences(preferences: &BTreeMap<String, bool>) -> Vec<&str> {
    preferences
        .iter()
        .filter(|(_, selected)| **selected)
        .map(|(name, _)| name.as_str())
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapMealRequest {
    pub meal: MealRecord,
    pub other_meals: Vec<String>,
    pub diet_preference: BTreeMap<String, bool>,
    pub allergies: String,
}

#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    #[serde(rename = "meal")]
    pub meals: Vec<MealRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapMealResponse {
    pub old_meal_ingredients: String,
    pub new_meal: MealRecord,
}
