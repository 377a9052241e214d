//! Axum route handlers for the meal-plan API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::prompts::ASSISTANT_SYSTEM;
use crate::llm_client::Conversation;
use crate::planner::models::{MealPlanResponse, SwapMealRequest, SwapMealResponse, UserProfile};
use crate::planner::prompts::{build_meal_plan_prompt, build_swap_meal_prompt};
use crate::planner::records::{parse_meal_records, parse_single_meal, MEAL_LAYOUT};
use crate::planner::recovery::complete_with_recovery;
use crate::state::AppState;

/// Swap requests get one completion call and no corrective retries.
const SWAP_MAX_ATTEMPTS: u32 = 1;

/// POST /get-meal-data
///
/// Renders the profile into a full-week prompt and runs the recovery loop until
/// the reply parses into meal records or the attempt ceiling is reached.
pub async fn handle_get_meal_data(
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<MealPlanResponse>, AppError> {
    let llm = state.llm_client()?;
    let Json(profile) = payload.map_err(|e| AppError::Decode(e.body_text()))?;

    let prompt = build_meal_plan_prompt(&profile, MEAL_LAYOUT);
    debug!("Meal plan prompt:\n{prompt}");

    let mut conversation = Conversation::new(ASSISTANT_SYSTEM, prompt);
    let meals = complete_with_recovery(
        &llm,
        &mut conversation,
        MEAL_LAYOUT,
        state.config.meal_plan_max_attempts,
        |reply| parse_meal_records(reply, MEAL_LAYOUT),
    )
    .await?;

    info!(
        "Generated meal plan with {} entries ({} meals + {} snacks per day requested)",
        meals.len(),
        profile.meals_per_day,
        profile.snacks_per_day
    );

    Ok(Json(MealPlanResponse { meals }))
}

/// POST /swap-meal
///
/// Asks for a single replacement meal that avoids the listed meals.
pub async fn handle_swap_meal(
    State(state): State<AppState>,
    payload: Result<Json<SwapMealRequest>, JsonRejection>,
) -> Result<Json<SwapMealResponse>, AppError> {
    let llm = state.llm_client()?;
    let Json(request) = payload.map_err(|e| AppError::Decode(e.body_text()))?;

    let prompt = build_swap_meal_prompt(&request, MEAL_LAYOUT);
    debug!("Swap meal prompt:\n{prompt}");

    let mut conversation = Conversation::new(ASSISTANT_SYSTEM, prompt);
    let new_meal = complete_with_recovery(
        &llm,
        &mut conversation,
        MEAL_LAYOUT,
        SWAP_MAX_ATTEMPTS,
        |reply| parse_single_meal(reply, MEAL_LAYOUT),
    )
    .await?;

    info!(
        "Swapped {} {} for a new meal",
        request.meal.day, request.meal.meal_type
    );

    Ok(Json(SwapMealResponse {
        old_meal_ingredients: request.meal.ingredients,
        new_meal,
    }))
}
