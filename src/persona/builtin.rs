//! Built-in personas shown when the backend catalog is unavailable

use super::{Persona, Review};

fn review(reviewer: &str, rating: u8, comment: &str) -> Review {
    Review {
        reviewer: reviewer.to_string(),
        rating,
        comment: comment.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Fallback catalog, in display order
pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            id: "acharya-sarvesh".to_string(),
            name: "Acharya Sarvesh".to_string(),
            role: "Jyotish Guru aur Cosmic Guide".to_string(),
            specialty: "Vedic Astrology".to_string(),
            description: "Thoda mystical, encouraging aur friendly. Birth details ke basis \
                          par personal guidance dete hain aur grahon ka asar aasan bhasha \
                          mein samjhate hain."
                .to_string(),
            avatar: Some("🔮".to_string()),
            rating: 4.8,
            consultations: 12_450,
            experience: "15+ years".to_string(),
            expertise: strings(&[
                "Janam Kundli Padhna (Natal Chart Interpretation)",
                "Raashi ka Analysis (Zodiac Sign Analysis)",
                "Planetary Alignments and Transits",
                "Relationship Astrology (Synastry)",
            ]),
            reviews: vec![
                review("Priya S.", 5, "Meri kundli itni clearly kisi ne nahi samjhayi thi."),
                review("Rahul M.", 4, "Career guidance was practical and calm."),
            ],
        },
        Persona {
            id: "tara-devi".to_string(),
            name: "Tara Devi".to_string(),
            role: "Tarot Reader".to_string(),
            specialty: "Tarot and Intuitive Guidance".to_string(),
            description: "Warm and intuitive. Reads the cards for love, career and life \
                          transitions."
                .to_string(),
            avatar: Some("🃏".to_string()),
            rating: 4.6,
            consultations: 8_320,
            experience: "10 years".to_string(),
            expertise: strings(&["Tarot Readings", "Love and Relationships", "Life Transitions"]),
            reviews: vec![
                review("Ananya K.", 5, "The reading felt personal and kind."),
                review("Vikram P.", 4, "Helpful clarity before a big decision."),
            ],
        },
        Persona {
            id: "pandit-ankit".to_string(),
            name: "Pandit Ankit".to_string(),
            role: "Numerologist".to_string(),
            specialty: "Numerology".to_string(),
            description: "Precise and methodical. Works with name and birth-date numbers."
                .to_string(),
            avatar: Some("🔢".to_string()),
            rating: 4.4,
            consultations: 5_210,
            experience: "8 years".to_string(),
            expertise: strings(&["Numerology Basics", "Name Correction", "Lucky Dates"]),
            reviews: vec![review("Meera T.", 4, "Good explanation of my life path number.")],
        },
    ]
}
