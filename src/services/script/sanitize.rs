/// Structural phrases models tend to emit despite instructions. Matching is case-sensitive.
pub const DENYLIST: [&str; 11] = [
    "Introduction:",
    "Main Point:",
    "Conclusion:",
    "Slide 1:",
    "Slide 2:",
    "Slide 3:",
    "First, let me introduce",
    "In conclusion,",
    "To summarize,",
    "Moving on to the next slide",
    "As you can see on this slide",
];

const NATURAL_OPENINGS: [&str; 5] = ["Hello", "Welcome", "Good", "Thank you", "Today"];

const DEFAULT_OPENING: &str = "Welcome everyone. ";

/// Clean a generated script so it reads as continuous speech.
pub fn sanitize(script: &str) -> String {
    let mut text = script.to_string();
    // a removal can splice two fragments into a fresh occurrence
    while DENYLIST.iter().any(|phrase| text.contains(phrase)) {
        for phrase in DENYLIST {
            text = text.replace(phrase, "");
        }
    }

    let text = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if NATURAL_OPENINGS.iter().any(|opening| text.starts_with(opening)) {
        text
    } else {
        format!("{}{}", DEFAULT_OPENING, text).trim_end().to_string()
    }
}
