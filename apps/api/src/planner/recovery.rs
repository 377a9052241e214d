//! Completion Retry Loop — resubmits the conversation until the reply parses.
//!
//! Attempts run sequentially with no backoff. Transport failures and empty
//! replies are retried with the conversation untouched. A reply that fails to
//! parse is appended as an assistant turn, followed by a corrective user turn
//! naming the parse error, so the next attempt sees its own mistake.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{ChatCompletion, Conversation, LlmError, Role};
use crate::planner::prompts::build_correction_prompt;
use crate::planner::records::{ParseError, RecordLayout};

/// Why a single attempt did not produce a result.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("completion request failed: {0}")]
    Transport(#[from] LlmError),

    #[error("no content found in response")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Error after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: AttemptError },
}

/// Runs up to `max_attempts` completion calls, returning the first reply that
/// `parse` accepts. `max_attempts` below 1 is treated as 1.
///
/// The conversation is only ever appended to, so callers can inspect the
/// corrective turns after the call.
pub async fn complete_with_recovery<T, F>(
    llm: &dyn ChatCompletion,
    conversation: &mut Conversation,
    layout: RecordLayout,
    max_attempts: u32,
    parse: F,
) -> Result<T, RecoveryError>
where
    F: Fn(&str) -> Result<T, ParseError>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = llm.complete(conversation.messages()).await;
        let last = match outcome {
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "Completion call failed, retrying");
                AttemptError::Transport(e)
            }
            Ok(response) => match response.text() {
                None => {
                    warn!(attempt, max_attempts, "No content found in response, retrying");
                    AttemptError::EmptyResponse
                }
                Some(reply) => {
                    debug!(attempt, "Completion reply:\n{reply}");
                    match parse(reply) {
                        Ok(parsed) => {
                            info!(attempt, max_attempts, "Completion reply parsed");
                            return Ok(parsed);
                        }
                        Err(e) => {
                            warn!(attempt, max_attempts, error = %e, "Reply failed to parse, sending correction");
                            conversation.push(Role::Assistant, reply);
                            conversation.push(
                                Role::User,
                                build_correction_prompt(&e.to_string(), layout),
                            );
                            AttemptError::Parse(e)
                        }
                    }
                }
            },
        };

        if attempt >= max_attempts {
            return Err(RecoveryError::RetryExhausted {
                attempts: attempt,
                last,
            });
        }
    }
}
