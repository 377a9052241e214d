// Shared prompt fragments for completion calls.
// Flow-specific templates live next to the flow that renders them.

/// System turn that opens every conversation.
pub const ASSISTANT_SYSTEM: &str = "You are a helpful assistant.";

/// Instruction appended to every prompt that expects delimited rows back.
/// Replace `{delimiter}` before sending.
pub const DELIMITED_ONLY_INSTRUCTION: &str = "\
    Ensure the response is valid delimited text without any extraneous characters or formatting. \
    Separate every column with a single '{delimiter}' character and put one entry per line. \
    Do NOT include a header row. \
    Do NOT use markdown code fences. \
    Include no additional text in your response.";

/// Corrective turn sent after a reply could not be parsed.
/// Replace `{error}`, `{field_count}` and `{delimiter}` before sending.
pub const CORRECTION_TEMPLATE: &str = "There is an error with your data: {error}. \
    Please fix your data so that every line has exactly {field_count} columns separated by '{delimiter}' \
    and resend the complete response.";
