// Meal planning: prompt rendering, completion recovery, and parsing of the
// model's delimited reply into meal records.
// All completion calls go through llm_client — no direct HTTP calls here.

pub mod calories;
pub mod delimiter;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod records;
pub mod recovery;
