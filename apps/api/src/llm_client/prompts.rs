// Shared prompt fragments.
// Each strategy builds its own prompts in awards::prompts; this file holds the
// cross-cutting instructions they all append.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every research prompt.
pub const VERIFIABILITY_INSTRUCTION: &str = "\
    Focus on verifiable, legitimate awards from recognized organizations. \
    Never fabricate or guess. If you cannot verify an award, omit it.";

/// Instruction that keeps titles and descriptions in their own fields.
pub const TITLE_FIELD_INSTRUCTION: &str = "\
    CRITICAL FIELD REQUIREMENTS: \
    the award name is a SHORT official title (2-8 words), e.g. 'First-Team All-Pac-10', NOT a sentence. \
    The description is a LONG explanation (1-3 sentences) of WHEN and WHY the award was won. \
    Do NOT put the description in the name field and do NOT put the name in the description field.";

/// System prompt for single-award fact checks.
pub const FACT_CHECK_SYSTEM: &str = "You are a fact-checker. \
    Verify if the given award information is accurate and legitimate. \
    Return only 'true' or 'false'.";
