//! System prompt for the voice assistant, optionally grounded with retrieved context.

pub const ASSISTANT_PERSONA: &str = include_str!("../data/maya_prompt.txt");

const CONTEXT_BEGIN: &str = "--- RELEVANT KNOWLEDGE BASE CONTEXT ---";
const CONTEXT_END: &str = "--- END CONTEXT ---";
const CONTEXT_INSTRUCTION: &str = "Use the above context to give an accurate and detailed answer. \
If the context doesn't cover the question, use your general knowledge about Prajwal.";

/// Persona prompt, with `context` appended in a delimited block when retrieval found something.
pub fn system_prompt(context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("{ASSISTANT_PERSONA}\n\n{CONTEXT_BEGIN}\n{ctx}\n{CONTEXT_END}\n\n{CONTEXT_INSTRUCTION}"),
        None => ASSISTANT_PERSONA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ungrounded_prompt_is_persona() {
        let p = system_prompt(None);
        assert_eq!(p, ASSISTANT_PERSONA);
        assert!(p.contains("Key facts about Prajwal:"));
        assert!(p.contains("- AI Engineer & Architect at GenXcellence"));
        assert!(p.contains("- Expertise in Voice AI (Pipecat, Cartesia TTS, Azure STT, real-time streaming)"));
        assert!(p.contains("- Experience with RAG systems (ChromaDB, FAISS, LangChain, vector databases)"));
        assert!(p.contains("- Projects: Semantic Chunker, Voice AI Agent, Document Intelligence, RAG Chatbot, Text-to-SQL"));
        assert!(p.contains("- Tech stack: Python, TypeScript, PyTorch, Azure"));
        assert!(p.ends_with("Respond naturally as if in a spoken conversation. Be brief and engaging!"));
    }

    #[test]
    fn grounded_prompt_wraps_context() {
        let p = system_prompt(Some("[Source 1]: hello"));
        assert!(p.starts_with(ASSISTANT_PERSONA));
        assert!(p.contains("--- RELEVANT KNOWLEDGE BASE CONTEXT ---\n[Source 1]: hello\n--- END CONTEXT ---"));
    }
}
