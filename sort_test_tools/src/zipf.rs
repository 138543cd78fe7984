//! Zipf-distributed random numbers over `[1, num_elements]` by rejection
//! inversion sampling, after W. Hormann and G. Derflinger, "Rejection-
//! inversion to generate variates from monotone discrete distributions".
//! Skewed duplicate distributions are the interesting stress for a sort
//! that tags blocks by distinct keys.

use rand::Rng;

pub struct ZipfDistribution {
    num_elements: f64,
    exponent: f64,
    h_integral_x1: f64,
    h_integral_num_elements: f64,
    s: f64,
}

impl ZipfDistribution {
    pub fn new(num_elements: usize, exponent: f64) -> Result<Self, ()> {
        if num_elements == 0 || exponent <= 0.0 {
            return Err(());
        }

        Ok(ZipfDistribution {
            num_elements: num_elements as f64,
            exponent,
            h_integral_x1: h_integral(1.5, exponent) - 1.0,
            h_integral_num_elements: h_integral(num_elements as f64 + 0.5, exponent),
            s: 2.0 - h_integral_inverse(h_integral(2.5, exponent) - h(2.0, exponent), exponent),
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        loop {
            let u = self.h_integral_num_elements
                + rng.gen::<f64>() * (self.h_integral_x1 - self.h_integral_num_elements);
            let x = h_integral_inverse(u, self.exponent);
            let k = (x + 0.5).floor().clamp(1.0, self.num_elements);

            if k - x <= self.s
                || u >= h_integral(k + 0.5, self.exponent) - h(k, self.exponent)
            {
                return k as usize;
            }
        }
    }
}

/// Integral of the hat function: H(x) = ((x^(1-e)) - 1) / (1 - e), computed
/// through exp/log helpers that stay accurate as e approaches 1 (where the
/// closed form degenerates to ln x).
fn h_integral(x: f64, exponent: f64) -> f64 {
    let log_x = x.ln();
    helper2((1.0 - exponent) * log_x) * log_x
}

/// The hat function itself: h(x) = x^-e.
fn h(x: f64, exponent: f64) -> f64 {
    (-exponent * x.ln()).exp()
}

fn h_integral_inverse(x: f64, exponent: f64) -> f64 {
    let mut t = x * (1.0 - exponent);
    if t < -1.0 {
        // Clamp damage from numerical drift near the left tail.
        t = -1.0;
    }
    (helper1(t) * x).exp()
}

/// ln(1 + x) / x, with a Taylor fallback near zero.
fn helper1(x: f64) -> f64 {
    if x.abs() > 1e-8 {
        x.ln_1p() / x
    } else {
        1.0 - x * (0.5 - x * (1.0 / 3.0 - 0.25 * x))
    }
}

/// (exp(x) - 1) / x, with a Taylor fallback near zero.
fn helper2(x: f64) -> f64 {
    if x.abs() > 1e-8 {
        x.exp_m1() / x
    } else {
        1.0 + x * 0.5 * (1.0 + x * (1.0 / 3.0) * (1.0 + 0.25 * x))
    }
}
