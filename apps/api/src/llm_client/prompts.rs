// Cross-cutting prompt fragments. Each module that makes model calls keeps
// its own prompts.rs alongside its pipeline code; this file holds only the
// fragments shared by all of them.

/// System prompt fragment that enforces JSON-only output. Empirically
/// necessary: completion models otherwise wrap output in markdown fences or
/// add commentary.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with ONLY valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
