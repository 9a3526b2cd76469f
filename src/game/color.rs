use super::constants::{COLOR_JITTER, COLOR_POOL};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Picks a display color for a new player given the colors already on the board.
///
/// Unused palette entries win. Once the palette is exhausted a random entry is
/// jittered per channel so the newcomer still reads as distinct. An empty board
/// gets a uniformly random color.
pub fn assign_color<R: Rng + ?Sized>(used: &HashSet<String>, rng: &mut R) -> String {
    if used.is_empty() {
        return random_color(rng);
    }

    let free: Vec<&str> = COLOR_POOL
        .iter()
        .copied()
        .filter(|color| !used.contains(*color))
        .collect();
    if let Some(color) = free.choose(rng) {
        return (*color).to_string();
    }

    let base = COLOR_POOL.choose(rng).copied().unwrap_or(COLOR_POOL[0]);
    match parse_hex(base) {
        Some(rgb) => format_hex(jitter(rgb, rng)),
        None => random_color(rng),
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    format_hex([rng.gen(), rng.gen(), rng.gen()])
}

fn jitter<R: Rng + ?Sized>(rgb: [u8; 3], rng: &mut R) -> [u8; 3] {
    rgb.map(|channel| {
        let offset = rng.gen_range(-COLOR_JITTER..=COLOR_JITTER);
        (channel as i16 + offset).clamp(0, 255) as u8
    })
}

pub fn parse_hex(value: &str) -> Option<[u8; 3]> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |index: usize| u8::from_str_radix(digits.get(index..index + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn format_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn prefers_unused_palette_colors() {
        let mut rng = StdRng::seed_from_u64(7);
        let used: HashSet<String> = COLOR_POOL[..7].iter().map(|c| c.to_string()).collect();
        for _ in 0..20 {
            assert_eq!(assign_color(&used, &mut rng), COLOR_POOL[7]);
        }
    }

    #[test]
    fn exhausted_palette_yields_nearby_variant() {
        let mut rng = StdRng::seed_from_u64(11);
        let used: HashSet<String> = COLOR_POOL.iter().map(|c| c.to_string()).collect();
        for _ in 0..50 {
            let color = assign_color(&used, &mut rng);
            let rgb = parse_hex(&color).expect("valid hex");
            let near_palette = COLOR_POOL.iter().filter_map(|c| parse_hex(c)).any(|base| {
                base.iter()
                    .zip(rgb.iter())
                    .all(|(a, b)| (*a as i16 - *b as i16).abs() <= COLOR_JITTER)
            });
            assert!(near_palette, "{color} is not a jittered palette color");
        }
    }

    #[test]
    fn empty_board_gets_valid_random_color() {
        let mut rng = StdRng::seed_from_u64(3);
        let color = assign_color(&HashSet::new(), &mut rng);
        assert_eq!(color.len(), 7);
        assert!(parse_hex(&color).is_some());
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert_eq!(parse_hex("#ff6b6b"), Some([0xff, 0x6b, 0x6b]));
        assert_eq!(parse_hex("ff6b6b"), None);
        assert_eq!(parse_hex("#ff6b"), None);
        assert_eq!(parse_hex("#zz6b6b"), None);
    }
}
