use rand::Rng;

/// A hue in degrees, `0.0..360.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hue(f32);

impl Hue {
    pub fn new(degrees: f32) -> Self {
        Self(degrees.rem_euclid(360.0))
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.gen_range(0.0..360.0))
    }

    pub fn to_rgb(self, saturation: f32, value: f32) -> (u8, u8, u8) {
        let chroma = value * saturation;
        let sector = self.0 / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = value - chroma;
        let channel = |c: f32| ((c + m) * 255.0).round() as u8;
        (channel(r), channel(g), channel(b))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(Hue::new(0.0).to_rgb(1.0, 1.0), (255, 0, 0));
        assert_eq!(Hue::new(120.0).to_rgb(1.0, 1.0), (0, 255, 0));
        assert_eq!(Hue::new(240.0).to_rgb(1.0, 1.0), (0, 0, 255));
        assert_eq!(Hue::new(60.0).to_rgb(1.0, 1.0), (255, 255, 0));
        assert_eq!(Hue::new(360.0).to_rgb(1.0, 1.0), (255, 0, 0));
    }

    #[test]
    fn desaturated() {
        assert_eq!(Hue::new(200.0).to_rgb(0.0, 1.0), (255, 255, 255));
        assert_eq!(Hue::new(0.0).to_rgb(0.8, 1.0), (255, 51, 51));
    }

    #[test]
    fn random_hues_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let Hue(hue) = Hue::random(&mut rng);
            assert!((0.0..360.0).contains(&hue));
        }
    }
}
