//! Terminal UI components for the chat view

pub mod composer;
pub mod history;

pub use composer::ComposerView;
pub use history::HistoryView;

/// Canned questions offered on the welcome screen
pub const EXAMPLE_QUESTIONS: [&str; 6] = [
    "What is quantum computing?",
    "Explain photosynthesis",
    "What's the weather in Pune?",
    "Calculate 234 * 567",
    "Write a haiku about AI",
    "How does blockchain work?",
];
