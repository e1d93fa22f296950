//! Canned song recommendations by genre

use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::HashMap;

pub const FALLBACK_GENRE: &str = "random";

static RECOMMENDATIONS: Lazy<HashMap<&'static str, [&'static str; 4]>> = Lazy::new(|| {
    HashMap::from([
        ("sinhala", [
            "සඳ හදවතේ - Amarasiri Peiris",
            "ගිරා නිමාල - Nanda Malini",
            "හතර වරු - Pandith Amaradeva",
            "මල් මිදුලේ - Victor Ratnayake",
        ]),
        ("baila", [
            "කොළඹ කෙල්ලේ - Desmond de Silva",
            "මල්ලී - Corrine Almeida",
            "චික්කන් රෝල් - Gypsies",
            "හොට් චොකලට් - Rookantha Gunathilake",
        ]),
        ("rock", [
            "Bohemian Rhapsody - Queen",
            "Stairway to Heaven - Led Zeppelin",
            "Sweet Child O Mine - Guns N Roses",
            "Hotel California - Eagles",
        ]),
        ("pop", [
            "Shape of You - Ed Sheeran",
            "Blinding Lights - The Weeknd",
            "Billie Jean - Michael Jackson",
            "Yesterday - The Beatles",
        ]),
        (FALLBACK_GENRE, [
            "Imagine - John Lennon",
            "What a Wonderful World - Louis Armstrong",
            "Hallelujah - Leonard Cohen",
            "Fix You - Coldplay",
        ]),
    ])
});

/// The list for `genre`, or the fallback list for unknown genres
pub fn songs_for(genre: &str) -> &'static [&'static str] {
    let key = genre.to_lowercase();
    RECOMMENDATIONS
        .get(key.as_str())
        .or_else(|| RECOMMENDATIONS.get(FALLBACK_GENRE))
        .map(|songs| songs.as_slice())
        .unwrap_or(&[])
}

/// Pick one song uniformly at random
pub fn recommend<R: Rng + ?Sized>(genre: &str, rng: &mut R) -> &'static str {
    let songs = songs_for(genre);
    if songs.is_empty() {
        return "Imagine - John Lennon";
    }
    songs[rng.gen_range(0..songs.len())]
}

/// `rock` -> `Rock`, used to label the reply
pub fn genre_label(genre: &str) -> String {
    let mut chars = genre.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
