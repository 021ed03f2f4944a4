//! `/api/roll` — the table-side "roll 1–3" die. Independent of the deck.

use rand::Rng;

/// Roll a three-sided die.
pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=3)
}

pub fn handle_get(_query: &str) -> String {
    let n = roll(&mut rand::thread_rng());
    format!(
        r#"<span id="roll-result" class="text-3xl font-bold text-amber-900" aria-live="polite">{}</span>"#,
        n
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rolls_stay_in_range_and_hit_every_face() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let n = roll(&mut rng);
            assert!((1..=3).contains(&n));
            seen[(n - 1) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn handle_get_renders_a_face() {
        let html = handle_get("");
        assert!(html.contains(r#"id="roll-result""#));
        assert!(["1</span>", "2</span>", "3</span>"].iter().any(|s| html.contains(s)));
    }
}
