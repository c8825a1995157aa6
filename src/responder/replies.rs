//! Fixed reply texts

pub(crate) const GREETING: &str = "Hello! How can I assist you today?";

pub(crate) const FAREWELL: &str = "Goodbye! Have a great day!";

pub(crate) const THANKS: &str = "You're welcome! If you have any more questions, feel free to ask.";

pub(crate) const HELP: &str = "\
I can help you with:
- Greetings and small talk (try \"hello\" or \"good morning\")
- Short explanations (try \"what is python\" or \"explain regex\")
- Arithmetic (try \"calculate 5 + 10 * 2\")
- Static code analysis: paste a ```python block and I'll list its imports, functions and classes
- Anything else goes to the language model";

pub(crate) const GOOD_DAY: &str = "Good day! How can I assist you today?";

pub(crate) const CODE_ANALYSIS_LABEL: &str = "Code analysis:";

pub(crate) const FOLLOW_UP: &str =
    "Let's continue with that. Could you tell me a bit more about what you'd like to know?";

pub(crate) const CLARIFICATION: &str =
    "I'm not sure I understood that. Could you rephrase or give me a bit more detail?";

pub(crate) fn good_period(period: &str) -> String {
    format!("Good {period}! How can I assist you today?")
}
