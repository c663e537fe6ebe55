use crate::llm_client::prompts::PROFILE_GROUNDING;

pub const COVER_LETTER_SYSTEM: &str = "You are an experienced career writer. \
    You MUST respond with valid JSON only, with no text outside the JSON object \
    and no markdown code fences.";

/// Builds the drafting prompt from a plain-text profile digest and the pasted job ad.
pub fn cover_letter_prompt(profile_digest: &str, job_description: &str) -> String {
    format!(
        "Write a cover letter for the candidate below, tailored to the job description.\n\n\
         {PROFILE_GROUNDING}\n\n\
         Keep it under 350 words, in three or four paragraphs, first person, no placeholders.\n\n\
         Return JSON of this exact shape:\n\
         {{\"greeting\": string, \"paragraphs\": [string], \"closing\": string}}\n\n\
         <candidate_profile>\n{profile_digest}\n</candidate_profile>\n\n\
         <job_description>\n{job_description}\n</job_description>"
    )
}
