//! The four backdrops used across the landing page.

use ambient_engine::{
    BubbleFieldConfig, BubbleSpec, Color, FieldPreset, OrbitFieldConfig, PixelGridConfig, PixelParticlesConfig,
    Token,
};

pub const NAMES: [&str; 4] = ["section_particles", "card_grid", "hero_bubble", "hero_orbit"];

const BRAND_PURPLE: (u8, u8, u8) = (0x77, 0x34, 0xb8);

/// Purple pixel dust behind the content sections.
pub fn section_particles() -> FieldPreset {
    FieldPreset::PixelParticles(PixelParticlesConfig::default())
}

/// Shimmering grid behind pricing cards.
pub fn card_grid() -> FieldPreset {
    let (r, g, b) = BRAND_PURPLE;
    FieldPreset::PixelGrid(PixelGridConfig {
        colors: vec![
            Color::rgb8(0x1a, 0x1a, 0x1a),
            Color::rgb8(0x2d, 0x1f, 0x3d),
            Color::rgb8(r, g, b),
            Color::rgb8(0x5b, 0x26, 0x90),
            Color::rgb8(0x0a, 0x0a, 0x0a),
            Color::rgb8(0x15, 0x15, 0x15),
        ],
        ..PixelGridConfig::default()
    })
}

/// The Axiom logo floating in a glass bubble.
pub fn hero_bubble() -> FieldPreset {
    FieldPreset::Bubbles(BubbleFieldConfig {
        bubbles: vec![BubbleSpec {
            token: Token::new("/logo_axiom_a.png", "Axiom IA").with_size(120.0).with_seed(1),
            start: (0.5, 0.5),
        }],
        ..BubbleFieldConfig::default()
    })
}

/// Partner logos orbiting the hero headline.
pub fn hero_orbit() -> FieldPreset {
    FieldPreset::Orbit(OrbitFieldConfig::default())
}

pub fn by_name(name: &str) -> Option<FieldPreset> {
    match name {
        "section_particles" => Some(section_particles()),
        "card_grid" => Some(card_grid()),
        "hero_bubble" => Some(hero_bubble()),
        "hero_orbit" => Some(hero_orbit()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves_to_a_valid_preset() {
        for name in NAMES {
            let preset = by_name(name).unwrap();
            preset.validate().unwrap();
            let json = preset.to_json().unwrap();
            assert!(FieldPreset::from_json(&json).is_ok(), "{name} does not load back");
        }
        assert!(by_name("confetti").is_none());
    }

    #[test]
    fn orbit_carries_eight_partners() {
        let FieldPreset::Orbit(cfg) = hero_orbit() else {
            panic!("expected orbit");
        };
        assert_eq!(cfg.bodies.len(), 8);
        assert_eq!(cfg.radii, (620.0, 200.0));
    }
}
