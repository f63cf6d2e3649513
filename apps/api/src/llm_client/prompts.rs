// Shared prompt fragments and the template filler used by every prompt module.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to every prompt: the backend must answer with JSON only.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Do not include any text, explanations, or markdown formatting outside of the JSON object itself.";

/// Substitutes `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are never rescanned, so user text containing a
/// placeholder name is embedded verbatim. Braces that do not form a known
/// placeholder are copied through unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
