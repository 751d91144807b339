//! Prompt templates.

/// What the model is told to say when the clauses don't answer the question.
pub const NOT_FOUND_ANSWER: &str = "This information is not present in the policy.";

/// Default degraded answer when the provider fails.
pub const DEFAULT_FALLBACK_ANSWER: &str =
    "Sorry, I couldn't generate a response due to an API error.";

const ROLE_LINE: &str = "You are a health insurance policy assistant. Use the following query \
and relevant policy text to generate a clear, concise answer.";

const INTENT_INSTRUCTIONS: &str = "\
You are an intelligent parser. Convert the user's natural language query about a policy document into a structured JSON.

Return the following:
- intent: e.g., \"coverage_check\", \"definition_request\"
- entity: the main subject (e.g., \"knee surgery\", \"hospital\")
- attributes: a list of things the user is asking about (e.g., \"coverage\", \"conditions\")
- context_type: always \"policy\"
- output_format: always \"text\"

Only return a valid JSON object.";

/// Builds the final answering prompt.
///
/// Clauses appear in the given order separated by a blank line. The intent
/// section is left out when `intent` is `None`.
pub fn answer_prompt<T: AsRef<str>>(query: &str, intent: Option<&str>, clauses: &[T]) -> String {
    let clauses = clauses
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = String::with_capacity(ROLE_LINE.len() + query.len() + clauses.len() + 512);
    prompt.push_str(ROLE_LINE);
    prompt.push_str("\n\nQuery:\n");
    prompt.push_str(query);
    if let Some(intent) = intent {
        prompt.push_str("\n\nParsed Query Analysis:\n");
        prompt.push_str(intent);
    }
    prompt.push_str("\n\nRelevant Policy Clauses:\n");
    prompt.push_str(&clauses);
    prompt.push_str("\n\nInstructions:\n");
    prompt.push_str("- Answer only based on the provided text.\n");
    prompt.push_str("- If coverage is conditional (e.g., waiting period), explain it clearly.\n");
    prompt.push_str(&format!("- If not found, say \"{NOT_FOUND_ANSWER}\"\n"));
    prompt.push_str("- Be specific about any exclusions, waiting periods, or conditions.\n");
    prompt.push_str("- Keep the answer concise but complete.\n\nAnswer:\n");
    prompt
}

/// Builds the query restatement prompt.
pub fn intent_prompt(query: &str) -> String {
    format!("{INTENT_INSTRUCTIONS}\n\nUser Query: {query}")
}
