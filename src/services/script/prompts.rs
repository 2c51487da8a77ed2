// Prompt construction for narration scripts

use crate::models::{GenerationSettings, SlideContent};

const DEFAULT_LEVEL: i32 = 3;

/// Language register for an intelligence level; out-of-range levels read as 3.
pub fn level_descriptor(level: i32) -> &'static str {
    match level {
        1 => "very simple and basic language, suitable for beginners",
        2 => "clear and straightforward language with some explanations",
        3 => "professional language with good detail and examples",
        4 => "sophisticated language with advanced concepts and insights",
        5 => "expert-level language with deep technical detail and nuance",
        _ => level_descriptor(DEFAULT_LEVEL),
    }
}

pub fn build_system_prompt(settings: &GenerationSettings) -> String {
    let tone = &settings.tone;
    let style = level_descriptor(settings.intelligence_level);

    format!(
        r#"You are a skilled presentation coach who creates natural, engaging presentation scripts.

Your task is to write a {tone} presentation script using {style}.

CRITICAL RULES:
- Write as if you're actually giving the presentation to a live audience
- Use natural speech patterns with conversational flow
- NEVER use structural markers like "Introduction:", "Main Point:", "Conclusion:", etc.
- NEVER mention slide numbers or say "this slide shows"
- Make it sound like a human speaker, not a robotic narrator
- Use transitions that feel natural: "Now, let me tell you about...", "What's really interesting is...", "You might be wondering..."
- Include appropriate pauses for emphasis (use "..." sparingly)
- Make it engaging and personable while maintaining the {tone} tone
- Ensure the script flows as one coherent presentation, not separate sections

Remember: The audience should feel like they're listening to a knowledgeable presenter, not a text-to-speech system reading bullet points."#
    )
}

pub fn build_user_prompt(content: &SlideContent, settings: &GenerationSettings) -> String {
    let additional = settings
        .instructions()
        .map(|text| format!("Additional Instructions: {}", text))
        .unwrap_or_default();

    format!(
        r#"Create a natural, engaging presentation script based on this content:

{content}

Script Requirements:
- Target duration: {min}-{max} minutes of speaking time
- Make it sound completely natural and conversational
- Create smooth transitions between topics
- No structural announcements or section headers
- Speak directly to the audience as if you're there with them

{additional}

Write the script as if you're an expert presenter giving this talk to a live audience. Make it engaging, natural, and human-like."#,
        content = content.combined_text(),
        min = settings.min_length,
        max = settings.max_length,
    )
}
