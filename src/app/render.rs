//! Plain-text rendering of the three screens

use super::App;
use crate::persona::Persona;
use crate::state_machine::{Message, Sender};
use std::fmt::Write;

fn stars(filled: usize) -> String {
    (0..5).map(|i| if i < filled { '★' } else { '☆' }).collect()
}

pub fn selection(app: &App) -> String {
    let mut out = String::from(
        "🔮 Divine Astrology\nChoose your cosmic guide for personalized astrological insights\n",
    );
    if let Some(notice) = app.notice() {
        let _ = writeln!(out, "! {notice}");
    }
    out.push('\n');
    for (i, persona) in app.personas().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} {} ({}) {:.1} {} · {} consultations",
            i + 1,
            persona.avatar.as_deref().unwrap_or("✨"),
            persona.name,
            persona.role,
            persona.rating,
            stars(persona.filled_stars()),
            persona.consultations,
        );
    }
    out.push_str("\nEnter a number to view a guide, or 'quit'.");
    out
}

pub fn detail(persona: &Persona) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", persona.name, persona.role);
    if !persona.description.is_empty() {
        let _ = writeln!(out, "{}", persona.description);
    }
    let _ = writeln!(
        out,
        "Rating {:.1} {} | {} consultations | {} experience",
        persona.rating,
        stars(persona.filled_stars()),
        persona.consultations,
        if persona.experience.is_empty() { "-" } else { persona.experience.as_str() },
    );
    let _ = writeln!(out, "Specialty: {}", persona.specialty);

    if !persona.expertise.is_empty() {
        out.push_str("\nExpertise:\n");
        for item in &persona.expertise {
            let _ = writeln!(out, "  • {item}");
        }
    }

    if !persona.reviews.is_empty() {
        out.push_str("\nReviews:\n");
        for review in &persona.reviews {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                stars(usize::from(review.rating)),
                review.reviewer,
                review.comment
            );
        }
    }

    out.push_str("\n'chat' to start a consultation, 'back' to return.");
    out
}

pub fn message(persona_name: &str, message: &Message) -> String {
    match message.sender {
        Sender::Bot => format!("{persona_name}: {}", message.text),
        Sender::User => format!("You: {}", message.text),
    }
}

pub fn chat_help(require_details: bool) -> String {
    let mut out = String::from("Type a message and press Enter. Commands: /back, /help, /quit");
    if require_details {
        out.push_str(", /details (share your birth details)");
    }
    out
}
