//! Prompt builder: fixed system message + context block and question.

/// System instructions for grounded answers.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides accurate information based on the context provided.
When answering questions:
1. Only use information from the provided context
2. If the context doesn't contain the answer, say \"I don't have enough information to answer this question\"
3. Cite specific sections, pages, or documents when possible
4. Format your responses clearly with proper punctuation and structure
5. Break down complex information into digestible parts
6. Be concise but thorough";

/// Build the user prompt: the context verbatim between rulers, then the question.
///
/// # Example
/// ```
/// use contextor::prompt::build_user_prompt;
/// let prompt = build_user_prompt("[Source: namespace 'a']\nPump A is 5 bar.", "Pump A pressure?");
/// assert!(prompt.contains("Pump A is 5 bar."));
/// assert!(prompt.contains("Pump A pressure?"));
/// ```
pub fn build_user_prompt(context: &str, query: &str) -> String {
    format!(
        "Context information is below:
---------------------
{context}
---------------------

Given the context information and not prior knowledge, answer the following query:
{query}

If the context doesn't contain the answer, just say \"I don't have enough information to answer this question.\"
Include references to specific documents and page numbers when possible."
    )
}
