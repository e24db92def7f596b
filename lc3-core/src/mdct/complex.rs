//! A 32-bit floating point complex number.
//!
//! Grounded verbatim on `symphonia_core::dsp::complex::Complex`'s field
//! layout and operator set; the FFT and IMDCT in this module operate on it
//! exactly as `symphonia_core::dsp::{fft, mdct}` operate on the original.

#[derive(Copy, Clone, Default, Debug, PartialEq)]
#[repr(C)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    #[inline(always)]
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub fn scale(&self, scale: f32) -> Self {
        Self { re: self.re * scale, im: self.im * scale }
    }

    #[inline(always)]
    pub fn conj(&self) -> Self {
        Self { re: self.re, im: -self.im }
    }
}

impl core::ops::Add for Complex {
    type Output = Complex;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self::Output { re: self.re + rhs.re, im: self.im + rhs.im }
    }
}

impl core::ops::AddAssign for Complex {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl core::ops::Sub for Complex {
    type Output = Complex;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output { re: self.re - rhs.re, im: self.im - rhs.im }
    }
}

impl core::ops::Mul for Complex {
    type Output = Complex;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self::Output {
            re: (self.re * rhs.re) - (self.im * rhs.im),
            im: (self.re * rhs.im) + (self.im * rhs.re),
        }
    }
}

impl core::ops::Mul<f32> for Complex {
    type Output = Complex;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::Output { re: self.re * rhs, im: self.im * rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplication_matches_definition() {
        assert_eq!(Complex::new(3.0, 13.0) * Complex::new(7.0, 17.0), Complex::new(-200.0, 142.0));
    }

    #[test]
    fn conjugate_negates_imaginary_part() {
        assert_eq!(Complex::new(1.0, 10.0).conj(), Complex::new(1.0, -10.0));
    }
}
