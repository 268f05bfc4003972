use crate::types::RetrievalResult;

const PERSONA: &str = "You are GymRat AI, an expert fitness coach, personal trainer and sports nutritionist.
You provide evidence-based advice grounded in exercise science and sports nutrition research.";

const GUIDELINES: &str = "GUIDELINES:
- Be encouraging, supportive, and motivating
- Provide specific, actionable advice
- Include sets, reps, and weight recommendations when relevant
- Mention safety precautions and proper form tips
- If asked about injuries or medical conditions, recommend consulting a professional
- Format workout plans clearly with days, exercises, sets, and reps
- When suggesting nutrition, give practical meal ideas with approximate macros";

/// Coaching prompt grounded on retrieved passages
pub fn coaching_prompt(question: &str, context: &[RetrievalResult]) -> String {
    let context = context
        .iter()
        .map(|result| result.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{PERSONA}

Use the following retrieved context to answer the user's question. If the context contains
relevant information, use it and cite the source. If the context doesn't fully answer the
question, supplement with your general fitness knowledge but be transparent about it.

CONTEXT:
{context}

USER'S QUESTION:
{question}

{GUIDELINES}

RESPONSE:"
    )
}

/// Persona and question only, used when nothing was retrieved
pub fn direct_prompt(question: &str) -> String {
    format!(
        "You are GymRat AI, an expert fitness coach. \
         Provide helpful, evidence-based fitness advice.\n\n\
         Question: {question}\n\nResponse:"
    )
}

/// Prepend optional user context to the question
pub fn with_user_context(query: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("User context: {context}\n\nQuestion: {query}"),
        None => query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn result(content: &str) -> RetrievalResult {
        RetrievalResult {
            content: content.to_string(),
            metadata: ChunkMetadata {
                source: "a.pdf".to_string(),
                title: "a.pdf".to_string(),
                author: "Unknown".to_string(),
                total_pages: 1,
                page: 1,
                chunk_index: 0,
                category: "workout".to_string(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn test_coaching_prompt_contains_context_and_question() {
        let prompt = coaching_prompt(
            "How often should I deadlift?",
            &[result("Deadlift once a week."), result("Recover fully.")],
        );

        assert!(prompt.starts_with("You are GymRat AI"));
        assert!(prompt.contains("CONTEXT:\nDeadlift once a week.\n\nRecover fully.\n"));
        assert!(prompt.contains("USER'S QUESTION:\nHow often should I deadlift?"));
        assert!(prompt.contains("GUIDELINES:"));
        assert!(prompt.ends_with("RESPONSE:"));
    }

    #[test]
    fn test_direct_prompt() {
        let prompt = direct_prompt("What is progressive overload?");
        assert!(prompt.contains("Question: What is progressive overload?"));
        assert!(prompt.ends_with("Response:"));
    }

    #[test]
    fn test_with_user_context() {
        assert_eq!(
            with_user_context("Best split?", Some("Beginner, 3 days a week")),
            "User context: Beginner, 3 days a week\n\nQuestion: Best split?"
        );
        assert_eq!(with_user_context("Best split?", None), "Best split?");
        assert_eq!(with_user_context("Best split?", Some("  ")), "Best split?");
    }
}
