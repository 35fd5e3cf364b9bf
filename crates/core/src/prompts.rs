//! Prompt templates sent to the generation backend.
//!
//! Both templates spell out the exact JSON contract that
//! [`crate::normalizer::normalize`] enforces.

use crate::idea::{Category, SCORE_MAX, SCORE_MIN};
use crate::providers::SourcePost;

/// Longest post body embedded in a classification prompt, in characters.
pub const MAX_POST_BODY_CHARS: usize = 4000;

fn output_contract() -> String {
    format!(
        "Respond with a single JSON object wrapped in a ```json code block and nothing else. \
         The object must have exactly these fields:\n\
         - \"name\": a short, catchy title (string, not empty)\n\
         - \"description\": a two to three sentence pitch (string)\n\
         - \"category\": one of {categories}\n\
         - \"genre\": the primary genre (string)\n\
         - \"viability\": overall viability as an integer from {min} to {max}\n\
         - \"viabilityBreakdown\": an object with integer fields \"originality\", \
         \"marketAppeal\" and \"scope\", each from {min} to {max}",
        categories = Category::labels(),
        min = SCORE_MIN,
        max = SCORE_MAX,
    )
}

/// Prompt for a user-requested idea.
pub fn generation_prompt(user_prompt: &str) -> String {
    format!(
        "You are a game design consultant. Invent one original game idea based on this \
         request:\n\"{user_prompt}\"\n\n{}",
        output_contract()
    )
}

/// Prompt asking the backend to classify an externally sourced post.
pub fn classification_prompt(post: &SourcePost) -> String {
    let body: String = post.body.chars().take(MAX_POST_BODY_CHARS).collect();
    format!(
        "You are reviewing a game idea posted by a member of the public. Classify it and \
         score its viability. Keep the author's idea; do not invent a different one. If the \
         post has no usable title, give it one.\n\nTitle: {title}\nBody: {body}\n\n{contract}",
        title = post.title.trim(),
        body = body.trim(),
        contract = output_contract()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_embeds_request_and_contract() {
        let prompt = generation_prompt("a cooking game");
        assert!(prompt.contains("\"a cooking game\""));
        assert!(prompt.contains("\"viabilityBreakdown\""));
        assert!(prompt.contains("\"Card Game\""));
        assert!(prompt.contains("from 1 to 100"));
    }

    #[test]
    fn classification_prompt_embeds_post() {
        let post = SourcePost {
            title: "  Dungeon bakery ".into(),
            body: "Roguelike where you run a bakery".into(),
        };
        let prompt = classification_prompt(&post);
        assert!(prompt.contains("Title: Dungeon bakery\n"));
        assert!(prompt.contains("Body: Roguelike where you run a bakery"));
        assert!(prompt.contains("\"marketAppeal\""));
    }

    #[test]
    fn classification_prompt_truncates_long_bodies() {
        let post = SourcePost {
            title: "Long".into(),
            body: "x".repeat(MAX_POST_BODY_CHARS * 2),
        };
        let prompt = classification_prompt(&post);
        let run = prompt.matches('x').count();
        assert!(run <= MAX_POST_BODY_CHARS + 10, "body should be truncated, got {run} x's");
    }
}
