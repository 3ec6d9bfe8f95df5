//! Pronounceable pseudo-words for the `random` command.

use rand::Rng;
use rand::seq::SliceRandom;

/// Letters that end every syllable.
pub const VOWELS: &[u8] = b"aeiouy";

/// Every other lowercase ASCII letter; starts every syllable.
pub const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxz";

const MIN_SYLLABLES: usize = 3;
const MAX_SYLLABLES: usize = 5;

/// Generates one word of 3 to 5 consonant-vowel syllables.
///
/// All randomness comes from `rng`, so a seeded generator yields the same
/// words every run.
pub fn random_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    let syllables = rng.gen_range(MIN_SYLLABLES..=MAX_SYLLABLES);
    let mut word = String::with_capacity(syllables * 2);
    for _ in 0..syllables {
        // both sets are non-empty constants
        if let (Some(&consonant), Some(&vowel)) = (CONSONANTS.choose(rng), VOWELS.choose(rng)) {
            word.push(consonant as char);
            word.push(vowel as char);
        }
    }
    word
}
