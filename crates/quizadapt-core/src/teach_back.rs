//! Length/keyword heuristic for free-text "teach it back" explanations.

use serde::{Deserialize, Serialize};

/// Terms that earn a content bonus when mentioned.
pub const KEY_TERMS: [&str; 5] = ["concept", "example", "application", "theory", "practice"];

const BRIEF_CHARS: usize = 50;
const DETAILED_CHARS: usize = 200;
const FULL_CREDIT_CHARS: f64 = 100.0;
const TERM_BONUS: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachBackAssessment {
    /// Heuristic correctness in [0, 1].
    pub correctness: f64,
    pub feedback: String,
    pub suggestions: Vec<String>,
    /// Key terms found in the explanation.
    pub matched_terms: Vec<String>,
}

/// Assess a learner's explanation of `topic`.
pub fn assess_explanation(explanation: &str, topic: &str) -> TeachBackAssessment {
    let chars = explanation.chars().count();
    let lowered = explanation.to_lowercase();
    let matched_terms: Vec<String> = KEY_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .map(|term| term.to_string())
        .collect();

    let length_score = (chars as f64 / FULL_CREDIT_CHARS).min(1.0);
    let correctness = (length_score + TERM_BONUS * matched_terms.len() as f64).min(1.0);

    let feedback = if chars < BRIEF_CHARS {
        format!(
            "Your explanation of {topic} is quite brief. Try to include more details and examples."
        )
    } else if chars > DETAILED_CHARS {
        format!(
            "Good detailed explanation of {topic}! You've covered many aspects comprehensively."
        )
    } else {
        format!(
            "Nice explanation of {topic}! Consider adding specific examples to make it clearer."
        )
    };

    TeachBackAssessment {
        correctness,
        feedback,
        suggestions: suggestions(correctness)
            .iter()
            .map(|s| s.to_string())
            .collect(),
        matched_terms,
    }
}

fn suggestions(correctness: f64) -> [&'static str; 3] {
    if correctness < 0.3 {
        [
            "Review the fundamental concepts",
            "Practice explaining to others",
            "Use more examples in your explanations",
        ]
    } else if correctness < 0.7 {
        [
            "Add more specific details",
            "Include real-world applications",
            "Connect concepts to related topics",
        ]
    } else {
        [
            "Excellent understanding!",
            "Consider teaching others",
            "Explore advanced applications",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_explanation() {
        let a = assess_explanation("It sorts things.", "Sorting");
        assert!(a.feedback.contains("quite brief"));
        assert!(a.feedback.contains("Sorting"));
        assert!(a.correctness < 0.3);
        assert_eq!(a.suggestions[0], "Review the fundamental concepts");
    }

    #[test]
    fn key_terms_add_bonus() {
        let text = "The concept, with an Example.";
        let a = assess_explanation(text, "Graphs");
        assert_eq!(a.matched_terms, vec!["concept", "example"]);
        let expected = text.chars().count() as f64 / 100.0 + 0.2;
        assert!((a.correctness - expected).abs() < 1e-12);
    }

    #[test]
    fn long_explanation_caps_at_one() {
        let text = "theory and practice ".repeat(15);
        let a = assess_explanation(&text, "Recursion");
        assert_eq!(a.correctness, 1.0);
        assert!(a.feedback.starts_with("Good detailed explanation of Recursion"));
        assert_eq!(a.suggestions[0], "Excellent understanding!");
    }

    #[test]
    fn medium_explanation() {
        let text = "a".repeat(60);
        let a = assess_explanation(&text, "Heaps");
        assert!(a.feedback.starts_with("Nice explanation of Heaps"));
        assert!((a.correctness - 0.6).abs() < 1e-12);
        assert_eq!(a.suggestions[0], "Add more specific details");
    }
}
