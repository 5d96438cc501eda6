/// A key type usable by [`super::Afli`].
///
/// The model arithmetic needs the key densely representable as a floating
/// point number (§3 of the design: "K supports subtraction and scaling").
/// `f64` and `f32` are provided; the shipped index and the NFL front-end fix
/// `K = f64`, but `Afli` itself stays generic over this trait.
pub trait Key: Copy + std::fmt::Debug + PartialOrd {
    fn to_f64(self) -> f64;
}

impl Key for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl Key for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}
