use super::particle::{format_half_integer, twice_half_integer, Parity};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuantumNumberError {
    #[error("{name} must be a non-negative half-integer, got {value}")]
    NotHalfInteger { name: &'static str, value: f64 },
    #[error("J = {j} cannot be formed from l = {l} and s = {s}")]
    Triangle { l: u32, s: f64, j: f64 },
}

/// l, s, J and π of a channel. Spins are stored doubled so that the numbers
/// can be compared and ordered exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelQuantumNumbers {
    l: u32,
    twice_s: u32,
    twice_j: u32,
    parity: Parity,
}

impl ChannelQuantumNumbers {
    pub fn new(l: u32, s: f64, j: f64, parity: Parity) -> Result<Self, QuantumNumberError> {
        let twice_s = twice_half_integer(s)
            .ok_or(QuantumNumberError::NotHalfInteger { name: "channel spin", value: s })?;
        let twice_j = twice_half_integer(j).ok_or(QuantumNumberError::NotHalfInteger {
            name: "total angular momentum",
            value: j,
        })?;

        let twice_l = 2 * l;
        let lower = twice_l.abs_diff(twice_s);
        let upper = twice_l + twice_s;
        if twice_j < lower || twice_j > upper || (twice_j - lower) % 2 != 0 {
            return Err(QuantumNumberError::Triangle { l, s, j });
        }

        Ok(Self {
            l,
            twice_s,
            twice_j,
            parity,
        })
    }

    /// Quantum numbers without the l + s → J coupling check, for photon and
    /// fission channels whose channel spin is only nominal.
    pub fn uncoupled(l: u32, s: f64, j: f64, parity: Parity) -> Result<Self, QuantumNumberError> {
        let twice_s = twice_half_integer(s)
            .ok_or(QuantumNumberError::NotHalfInteger { name: "channel spin", value: s })?;
        let twice_j = twice_half_integer(j).ok_or(QuantumNumberError::NotHalfInteger {
            name: "total angular momentum",
            value: j,
        })?;
        Ok(Self {
            l,
            twice_s,
            twice_j,
            parity,
        })
    }

    pub fn orbital_angular_momentum(&self) -> u32 {
        self.l
    }

    pub fn spin(&self) -> f64 {
        f64::from(self.twice_s) / 2.0
    }

    pub fn total_angular_momentum(&self) -> f64 {
        f64::from(self.twice_j) / 2.0
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// (2J, π), the key identifying a spin group.
    pub fn spin_group_key(&self) -> (u32, Parity) {
        (self.twice_j, self.parity)
    }

    /// `J` followed by the parity symbol, e.g. `3/2-`.
    pub fn spin_parity_label(&self) -> String {
        format!("{}{}", format_half_integer(self.twice_j), self.parity.symbol())
    }
}

impl Display for ChannelQuantumNumbers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{},{},{}}}",
            self.l,
            format_half_integer(self.twice_s),
            self.spin_parity_label()
        )
    }
}

/// Channel spins |i − I|, …, i + I that two particles of spin i and I form.
pub fn possible_channel_spin_values(particle_spin: f64, residual_spin: f64) -> Vec<f64> {
    half_integer_range((particle_spin - residual_spin).abs(), particle_spin + residual_spin)
}

/// Total angular momenta |l − s|, …, l + s.
pub fn possible_total_angular_momentum_values(l: u32, s: f64) -> Vec<f64> {
    let l = f64::from(l);
    half_integer_range((l - s).abs(), l + s)
}

fn half_integer_range(lower: f64, upper: f64) -> Vec<f64> {
    let steps = (upper - lower).round() as usize;
    (0..=steps).map(|step| lower + step as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        possible_channel_spin_values, possible_total_angular_momentum_values,
        ChannelQuantumNumbers, QuantumNumberError,
    };
    use crate::rmatrix::particle::Parity;

    #[test]
    fn quantum_numbers_render_half_integers() {
        let numbers = ChannelQuantumNumbers::new(0, 0.5, 0.5, Parity::Positive).expect("valid");
        assert_eq!(numbers.to_string(), "{0,1/2,1/2+}");

        let numbers = ChannelQuantumNumbers::new(1, 1.0, 2.0, Parity::Negative).expect("valid");
        assert_eq!(numbers.to_string(), "{1,1,2-}");
        assert_eq!(numbers.spin_parity_label(), "2-");
        assert_eq!(numbers.total_angular_momentum(), 2.0);
    }

    #[test]
    fn triangle_rule_is_enforced() {
        let error = ChannelQuantumNumbers::new(0, 0.5, 1.5, Parity::Positive)
            .expect_err("J above l + s");
        assert!(matches!(error, QuantumNumberError::Triangle { l: 0, .. }));

        let error = ChannelQuantumNumbers::new(2, 0.5, 2.0, Parity::Positive)
            .expect_err("J must differ from l + s by an integer");
        assert!(matches!(error, QuantumNumberError::Triangle { .. }));

        let error = ChannelQuantumNumbers::new(1, 0.25, 1.0, Parity::Negative)
            .expect_err("s must be a half-integer");
        assert!(matches!(error, QuantumNumberError::NotHalfInteger { .. }));
    }

    #[test]
    fn uncoupled_numbers_skip_the_triangle_rule() {
        let numbers = ChannelQuantumNumbers::uncoupled(0, 0.0, 1.0, Parity::Positive)
            .expect("nominal photon channel");
        assert_eq!(numbers.to_string(), "{0,0,1+}");
        let error = ChannelQuantumNumbers::uncoupled(0, 0.3, 1.0, Parity::Positive)
            .expect_err("still half-integers");
        assert!(matches!(error, QuantumNumberError::NotHalfInteger { .. }));
    }

    #[test]
    fn spin_values_are_enumerated_in_unit_steps() {
        assert_eq!(possible_channel_spin_values(0.5, 0.0), vec![0.5]);
        assert_eq!(possible_channel_spin_values(0.5, 1.5), vec![1.0, 2.0]);
        assert_eq!(possible_channel_spin_values(1.0, 1.5), vec![0.5, 1.5, 2.5]);
        assert_eq!(possible_total_angular_momentum_values(0, 1.0), vec![1.0]);
        assert_eq!(possible_total_angular_momentum_values(2, 0.5), vec![1.5, 2.5]);
        assert_eq!(
            possible_total_angular_momentum_values(1, 1.5),
            vec![0.5, 1.5, 2.5]
        );
    }

    #[test]
    fn spin_group_keys_compare_j_and_parity() {
        let a = ChannelQuantumNumbers::new(0, 1.0, 1.0, Parity::Positive).expect("valid");
        let b = ChannelQuantumNumbers::new(2, 1.0, 1.0, Parity::Positive).expect("valid");
        let c = ChannelQuantumNumbers::new(1, 1.0, 1.0, Parity::Negative).expect("valid");
        assert_eq!(a.spin_group_key(), b.spin_group_key());
        assert_ne!(a.spin_group_key(), c.spin_group_key());
    }
}
