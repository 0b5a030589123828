//! Built-in knowledge base used when no snapshot can be read

use crate::types::{ConversationContext, Intent};

use super::KnowledgeBase;

/// Deterministic default intents: greeting, goodbye, thanks, about, time
pub fn default_knowledge_base() -> KnowledgeBase {
    let intents = vec![
        Intent::new(
            "greeting",
            ["Hi", "Hello", "Hey", "Good morning", "Good afternoon"],
            [
                "Hello! How can I assist you today?",
                "Hi there! What can I do for you?",
                "Greetings! How may I help you?",
            ],
        ),
        Intent::new(
            "goodbye",
            ["Bye", "Goodbye", "See you later", "Have a nice day"],
            ["Goodbye! Have a great day!", "See you soon!", "Until next time!"],
        ),
        Intent::new(
            "thanks",
            ["Thanks", "Thank you", "That's helpful", "Appreciate it"],
            ["You're welcome!", "My pleasure!", "Glad I could help!"],
        ),
        Intent::new(
            "about",
            [
                "Who are you",
                "What are you",
                "Tell me about yourself",
                "Introduce yourself",
                "Who created you",
            ],
            [
                "I'm {name}, an advanced AI chatbot designed to assist you.",
                "I'm an intelligent virtual assistant here to help with your queries.",
            ],
        ),
        Intent::new(
            "time",
            ["What time is it", "Current time", "Time now"],
            ["The current time is {time}", "It's {time} right now."],
        ),
    ];

    KnowledgeBase {
        intents,
        context: ConversationContext::default(),
    }
}
