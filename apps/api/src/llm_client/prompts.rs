// Prompt fragments shared by every LLM feature. Feature-specific prompts live next to
// the feature (see `cover_letter::prompts`).

/// Keeps generated text inside what the candidate actually wrote.
pub const PROFILE_GROUNDING: &str = "\
    CRITICAL: Use only facts present in the candidate profile below. \
    Do NOT invent employers, titles, dates, degrees, metrics or technologies. \
    If the job asks for something the profile does not show, do not claim it.";
