/// Newton's law of universal gravitation, reduced to the acceleration a mass
/// produces at a given distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    pub constant: f64,
}

impl Gravity {
    pub const G: f64 = 6.67384e-11;

    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    /// `G * mass / distance²`. Unguarded: a zero distance yields infinity.
    pub fn acceleration(&self, mass: f64, distance: f64) -> f64 {
        self.constant * mass / (distance * distance)
    }

    /// Same as [`Gravity::acceleration`], but `None` for coincident points
    /// or any non-finite result.
    pub fn pull(&self, mass: f64, distance: f64) -> Option<f64> {
        if !(distance > 0.0) {
            return None;
        }
        let a = self.acceleration(mass, distance);
        a.is_finite().then_some(a)
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(Self::G)
    }
}
