//! Prompt templates for pair refinement.

use crate::models::KvPair;

/// Build the cleanup prompt listing every pair as `- key: value`.
///
/// # Example
/// ```
/// use snapkv::models::KvPair;
/// use snapkv::refine::prompts::refinement_prompt;
///
/// let prompt = refinement_prompt(&[KvPair::new("Name", "Jonh")]);
/// assert!(prompt.contains("- Name: Jonh\n"));
/// ```
pub fn refinement_prompt(pairs: &[KvPair]) -> String {
    let mut prompt = String::from(
        "Clean and correct these extracted key-value pairs from OCR. Return them in the same format:\n",
    );

    for pair in pairs {
        prompt.push_str(&format!("- {}: {}\n", pair.key, pair.value));
    }

    prompt.push_str("\nPlease return the cleaned pairs in the exact same format, one per line.");
    prompt
}
