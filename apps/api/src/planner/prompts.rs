// Prompt templates and renderers for the meal-plan and swap flows.
// Rendering is pure string substitution over the request data.

use crate::llm_client::prompts::{CORRECTION_TEMPLATE, DELIMITED_ONLY_INSTRUCTION};
use crate::planner::calories::estimate_daily_calories;
use crate::planner::models::{selected_preferences, SwapMealRequest, UserProfile};
use crate::planner::records::{RecordLayout, MEAL_COLUMNS};

/// Full-week plan prompt.
/// Replace: {purpose}, {height}, {weight}, {gender}, {diet_preference}, {allergies},
///          {meals_per_day}, {snacks_per_day}, {calories}, {columns}, {format_instruction}
pub const MEAL_PLAN_PROMPT_TEMPLATE: &str = r#"Generate a meal plan with the user's details as follows:
Purpose: {purpose}
Height: {height} cm
Weight: {weight} kg
Gender: {gender}
Diet Preference: {diet_preference}
Allergies: {allergies}
Meals Per Day: {meals_per_day}
Snacks Per Day: {snacks_per_day}
Approximate Calories intake per Day: {calories}

Provide daily meal plans from Monday to Sunday. Include details like ingredients, instructions, and nutrition information for each meal.

Respond with each row representing a meal entry. The columns should be as follows:
{columns}
Do not include a header row. The first line should be the first meal entry.
Ensure all meals align with the user's diet preference and do not contain any allergens specified.
{format_instruction}"#;

/// Single-meal replacement prompt.
/// Replace: {day}, {meal_type}, {ingredients}, {instructions}, {nutrition},
///          {diet_preference}, {allergies}, {other_meals}, {columns}, {format_instruction}
pub const SWAP_MEAL_PROMPT_TEMPLATE: &str = r#"I need an alternative meal option for the following meal:
{
	Day: {day}
	Meal Type: {meal_type}
	Ingredients: {ingredients}
	Instructions: {instructions}
	Nutrition: {nutrition}
}
Diet Preference: {diet_preference}
Allergies: {allergies}
The new meal should not be any of the following: {other_meals}.
The new meal should be suitable for the user's diet preference and allergies.
Provide exactly one alternative meal with the same format.
Respond with the columns as follows:
{columns}
Do not include a header row. The first line should be the new meal entry.
{format_instruction}"#;

fn column_header(layout: RecordLayout) -> String {
    MEAL_COLUMNS.join(layout.delimiter.to_string().as_str())
}

fn format_instruction(layout: RecordLayout) -> String {
    DELIMITED_ONLY_INSTRUCTION.replace("{delimiter}", &layout.delimiter.to_string())
}

/// Renders the full-week prompt for a profile, including its calorie estimate.
pub fn build_meal_plan_prompt(profile: &UserProfile, layout: RecordLayout) -> String {
    let calories = estimate_daily_calories(
        profile.height,
        profile.weight,
        &profile.gender,
        &profile.purpose,
        &profile.fitness_level,
    );

    MEAL_PLAN_PROMPT_TEMPLATE
        .replace("{purpose}", &profile.purpose)
        .replace("{height}", &profile.height.to_string())
        .replace("{weight}", &profile.weight.to_string())
        .replace("{gender}", &profile.gender)
        .replace(
            "{diet_preference}",
            &selected_preferences(&profile.diet_preference).join(", "),
        )
        .replace("{allergies}", &profile.allergies)
        .replace("{meals_per_day}", &profile.meals_per_day.to_string())
        .replace("{snacks_per_day}", &profile.snacks_per_day.to_string())
        .replace("{calories}", &format!("{calories:.6}"))
        .replace("{columns}", &column_header(layout))
        .replace("{format_instruction}", &format_instruction(layout))
}

/// Renders the replacement prompt for one meal.
pub fn build_swap_meal_prompt(request: &SwapMealRequest, layout: RecordLayout) -> String {
    let meal = &request.meal;

    SWAP_MEAL_PROMPT_TEMPLATE
        .replace("{day}", &meal.day)
        .replace("{meal_type}", &meal.meal_type)
        .replace("{ingredients}", &meal.ingredients)
        .replace("{instructions}", &meal.instructions)
        .replace("{nutrition}", &meal.nutrition)
        .replace(
            "{diet_preference}",
            &selected_preferences(&request.diet_preference).join(", "),
        )
        .replace("{allergies}", &request.allergies)
        .replace("{other_meals}", &request.other_meals.join(", "))
        .replace("{columns}", &column_header(layout))
        .replace("{format_instruction}", &format_instruction(layout))
}

/// Corrective user turn sent back after a reply failed to parse.
pub fn build_correction_prompt(error: &str, layout: RecordLayout) -> String {
    CORRECTION_TEMPLATE
        .replace("{error}", error)
        .replace("{field_count}", &layout.field_count.to_string())
        .replace("{delimiter}", &layout.delimiter.to_string())
}
