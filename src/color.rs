use palette::Srgb;

pub type Color = Srgb<u8>;

/// Color given to merged bodies and to bodies launched by slingshot.
pub fn neutral() -> Color {
    Srgb::new(0xff, 0xff, 0xff)
}

/// Where bodies spawned without an explicit color get theirs from.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

impl ColorSource for fastrand::Rng {
    fn next_color(&mut self) -> Color {
        Srgb::new(self.u8(..), self.u8(..), self.u8(..))
    }
}

/// Always hands out the same color.
#[derive(Clone, Copy, Debug)]
pub struct Fixed(pub Color);

impl ColorSource for Fixed {
    fn next_color(&mut self) -> Color {
        self.0
    }
}
