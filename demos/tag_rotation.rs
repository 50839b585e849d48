//! Tag rotation example
//!
//! Walks two listeners through a shared "meditation" pool without ever
//! replaying a track to the same user, then shows the exhaustion path:
//! generate externally, publish, and the rotation resumes.
//!
//! Usage:
//!   cargo run --example tag_rotation --features rotation

use gencache_rust::rotation::{RotationOutcome, TagRotation};

/// Prompt presets per tag, the same shape a generation service keys on.
const PRESETS: &[(&str, &str)] = &[
    ("meditation", "calm meditation music with soft ambient tones"),
    ("focus", "instrumental focus music with a steady rhythm"),
    ("sleep", "gentle sleep music with slow fading pads"),
    ("energy", "upbeat energetic music with a driving pulse"),
];

fn main() {
    tracing_subscriber::fmt::init();

    let rotation = TagRotation::new();

    // Seed a small meditation pool, oldest first.
    for n in 1..=3 {
        let track = rotation.publish(
            "meditation",
            format!("Meditation Session {n}"),
            format!("s3://media/meditation/session-{n}.wav"),
        );
        println!("seeded {} ({})", track.title, track.id);
    }

    // Two listeners walk the same pool on independent cursors.
    for user in ["alice", "bob"] {
        println!("\n{user} listens:");
        while let RotationOutcome::Next(track) = rotation.next_for_user(user, "meditation") {
            println!("  -> {} ({})", track.title, track.location_ref);
        }
        println!("  pool exhausted for {user}");
    }

    // Exhaustion hands generation back to the caller.
    let prompt = PRESETS
        .iter()
        .find(|(tag, _)| *tag == "meditation")
        .map(|(_, prompt)| *prompt)
        .unwrap_or_default();
    println!("\ngenerating a fresh track for prompt: {prompt}");
    let fresh = rotation.publish(
        "meditation",
        "Generated Meditation Track",
        "s3://media/meditation/generated-1.wav",
    );

    // Both users pick up the new track on their next request.
    for user in ["alice", "bob"] {
        if let RotationOutcome::Next(track) = rotation.next_for_user(user, "meditation") {
            assert_eq!(track.id, fresh.id);
            println!("{user} resumes with {}", track.title);
        }
    }

    println!(
        "\npool size: {}, alice cursor: {:?}",
        rotation.pool_size("meditation"),
        rotation.cursor("alice", "meditation")
    );
}
