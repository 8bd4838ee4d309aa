//! Prompt builders for review feedback generation
//!
//! Three prompts per submission, each parameterized by the rating and the
//! sanitized review text. The tonal instruction follows the rating tier:
//! apologetic for 1-2, neutral for 3, appreciative for 4-5.

/// The three prompts generated for one submission
#[derive(Debug, Clone)]
pub struct ReviewPrompts {
    /// Customer-facing response
    pub customer_response: String,
    /// Internal summary for the review dashboard
    pub internal_summary: String,
    /// Recommended follow-up action
    pub recommended_action: String,
}

/// Build the three generation prompts for a submission
pub fn build(rating: i64, review_text: &str) -> ReviewPrompts {
    let tone = tone_instruction(rating);
    let review = if review_text.is_empty() {
        "(no written review provided)"
    } else {
        review_text
    };

    ReviewPrompts {
        customer_response: format!(
            "A customer left a {rating}/5 star review: \"{review}\"\n\n\
             Write a short customer-facing response to this review. {tone} \
             Do not mention that you are an AI. Respond with the message text only."
        ),
        internal_summary: format!(
            "A customer left a {rating}/5 star review: \"{review}\"\n\n\
             Write a one-to-two sentence internal summary of this feedback \
             for the support team. Be factual and concise."
        ),
        recommended_action: format!(
            "A customer left a {rating}/5 star review: \"{review}\"\n\n\
             Recommend one concrete follow-up action for the business, in a \
             single sentence."
        ),
    }
}

/// Tonal instruction for the customer-facing response, by rating tier
fn tone_instruction(rating: i64) -> &'static str {
    match rating {
        1 | 2 => "Be empathetic and apologetic, and acknowledge the customer's frustration.",
        3 => "Use a neutral, professional tone.",
        _ => "Be warm and appreciative, and thank the customer for their support.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_contain_rating_and_review() {
        let prompts = build(4, "Great service!");
        for prompt in [
            &prompts.customer_response,
            &prompts.internal_summary,
            &prompts.recommended_action,
        ] {
            assert!(prompt.contains("4/5"));
            assert!(prompt.contains("Great service!"));
        }
    }

    #[test]
    fn test_prompts_are_distinct() {
        let prompts = build(3, "It was fine.");
        assert_ne!(prompts.customer_response, prompts.internal_summary);
        assert_ne!(prompts.internal_summary, prompts.recommended_action);
        assert_ne!(prompts.customer_response, prompts.recommended_action);
    }

    #[test]
    fn test_low_rating_tone_is_apologetic() {
        for rating in [1, 2] {
            let prompts = build(rating, "Terrible.");
            assert!(prompts.customer_response.contains("apologetic"));
        }
    }

    #[test]
    fn test_mid_rating_tone_is_neutral() {
        let prompts = build(3, "Okay.");
        assert!(prompts.customer_response.contains("neutral"));
    }

    #[test]
    fn test_high_rating_tone_is_appreciative() {
        for rating in [4, 5] {
            let prompts = build(rating, "Loved it!");
            assert!(prompts.customer_response.contains("appreciative"));
        }
    }

    #[test]
    fn test_empty_review_gets_placeholder() {
        let prompts = build(5, "");
        assert!(prompts.customer_response.contains("no written review provided"));
    }
}
