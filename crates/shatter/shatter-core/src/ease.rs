//! Easing curves for timeline tweens.
//!
//! Names follow the familiar web-animation vocabulary: `power0`..`power8`
//! (aliases `quad`, `cubic`, `quart`, `quint`, `strong`) with `.in`, `.out` or
//! `.inOut`, `linear`/`none`, and `cubic-bezier(x1, y1, x2, y2)`. `powerN` is
//! exponent `N + 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ShatterError;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    /// `t^exp`
    In { exp: u8 },
    /// `1 - (1 - t)^exp`
    Out { exp: u8 },
    InOut { exp: u8 },
    /// CSS-style timing curve with control points (x1, y1, x2, y2).
    Bezier([f32; 4]),
}

impl Ease {
    /// Slow start, accelerating (`cubic.in`).
    pub const CUBIC_IN: Ease = Ease::In { exp: 3 };
    /// Fast start, decelerating (`power2.out`).
    pub const POWER2_OUT: Ease = Ease::Out { exp: 3 };

    /// Map linear progress in [0,1] to eased progress. Input is clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Ease::Linear => t,
            Ease::In { exp } => t.powi(exp as i32),
            Ease::Out { exp } => 1.0 - (1.0 - t).powi(exp as i32),
            Ease::InOut { exp } => {
                if t < 0.5 {
                    0.5 * (2.0 * t).powi(exp as i32)
                } else {
                    1.0 - 0.5 * (2.0 * (1.0 - t)).powi(exp as i32)
                }
            }
            Ease::Bezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }

    /// Largest exponent with a name (`power8`).
    pub const MAX_EXP: u8 = 9;

    /// Reject eases that cannot be written back as a name: exponents outside
    /// `1..=MAX_EXP` and Bezier curves whose x controls leave [0,1].
    pub fn check(&self) -> Result<(), ShatterError> {
        let ok = match *self {
            Ease::Linear => true,
            Ease::In { exp } | Ease::Out { exp } | Ease::InOut { exp } => {
                (1..=Self::MAX_EXP).contains(&exp)
            }
            Ease::Bezier([x1, y1, x2, y2]) => {
                (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
                    && y1.is_finite()
                    && y2.is_finite()
            }
        };
        if ok {
            Ok(())
        } else {
            Err(ShatterError::InvalidEase(format!("{self:?}")))
        }
    }

    /// Parse a named ease.
    pub fn parse(name: &str) -> Result<Self, ShatterError> {
        let s = name.trim();
        let bad = || ShatterError::ConfigParse(format!("unknown ease `{name}`"));
        if s.eq_ignore_ascii_case("linear") || s.eq_ignore_ascii_case("none") {
            return Ok(Ease::Linear);
        }
        if let Some(args) = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let ctrl: Vec<f32> = args
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| bad())?;
            let [x1, y1, x2, y2] = ctrl[..] else {
                return Err(bad());
            };
            let ease = Ease::Bezier([x1, y1, x2, y2]);
            return ease.check().map(|()| ease).map_err(|_| bad());
        }
        let (family, dir) = s.split_once('.').ok_or_else(bad)?;
        let exp = match family {
            "quad" => 2,
            "cubic" => 3,
            "quart" => 4,
            "quint" | "strong" => 5,
            _ => match family.strip_prefix("power").map(str::parse::<u8>) {
                Some(Ok(n)) if n < Self::MAX_EXP => n + 1,
                _ => return Err(bad()),
            },
        };
        match dir {
            "in" => Ok(Ease::In { exp }),
            "out" => Ok(Ease::Out { exp }),
            "inOut" => Ok(Ease::InOut { exp }),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = |exp: u8| exp.saturating_sub(1);
        match self {
            Ease::Linear => f.write_str("linear"),
            Ease::In { exp } => write!(f, "power{}.in", power(*exp)),
            Ease::Out { exp } => write!(f, "power{}.out", power(*exp)),
            Ease::InOut { exp } => write!(f, "power{}.inOut", power(*exp)),
            Ease::Bezier([x1, y1, x2, y2]) => write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = ShatterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ease::parse(&s)
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Invert the x curve by bisection, then evaluate y.
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn endpoints_are_fixed() {
        for e in [
            Ease::Linear,
            Ease::CUBIC_IN,
            Ease::POWER2_OUT,
            Ease::InOut { exp: 2 },
            Ease::Bezier([0.42, 0.0, 0.58, 1.0]),
        ] {
            approx(e.apply(0.0), 0.0);
            approx(e.apply(1.0), 1.0);
        }
    }

    #[test]
    fn cubic_in_starts_slow_power2_out_starts_fast() {
        approx(Ease::CUBIC_IN.apply(0.5), 0.125);
        approx(Ease::POWER2_OUT.apply(0.5), 0.875);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(Ease::parse("cubic.in").unwrap(), Ease::CUBIC_IN);
        assert_eq!(Ease::parse("power2.in").unwrap(), Ease::CUBIC_IN);
        assert_eq!(Ease::parse("power2.out").unwrap(), Ease::POWER2_OUT);
        assert_eq!(Ease::parse("none").unwrap(), Ease::Linear);
        assert_eq!(
            Ease::parse("cubic-bezier(0.42, 0, 0.58, 1)").unwrap(),
            Ease::Bezier([0.42, 0.0, 0.58, 1.0])
        );
        assert!(Ease::parse("elastic.out").is_err());
        assert!(Ease::parse("cubic-bezier(2, 0, 0.5, 1)").is_err());
    }

    #[test]
    fn display_parses_back() {
        for e in [Ease::CUBIC_IN, Ease::POWER2_OUT, Ease::InOut { exp: 4 }, Ease::Linear] {
            assert_eq!(Ease::parse(&e.to_string()).unwrap(), e);
        }
    }

    #[test]
    fn every_checked_power_ease_survives_serde() {
        for exp in 1..=Ease::MAX_EXP {
            for e in [Ease::In { exp }, Ease::Out { exp }, Ease::InOut { exp }] {
                e.check().unwrap();
                let json = serde_json::to_string(&e).unwrap();
                assert_eq!(serde_json::from_str::<Ease>(&json).unwrap(), e, "{json}");
            }
        }
        assert_eq!(Ease::parse("power0.in").unwrap(), Ease::In { exp: 1 });
        assert!(Ease::parse("power9.in").is_err());
        assert!(Ease::parse("power-1.in").is_err());
    }

    #[test]
    fn check_rejects_unnameable_eases() {
        assert!(matches!(Ease::In { exp: 0 }.check(), Err(ShatterError::InvalidEase(_))));
        assert!(Ease::Out { exp: 10 }.check().is_err());
        assert!(Ease::Bezier([1.5, 0.0, 0.5, 1.0]).check().is_err());
        assert!(Ease::Bezier([0.5, f32::NAN, 0.5, 1.0]).check().is_err());
        assert!(Ease::Bezier([0.25, -0.5, 0.75, 1.5]).check().is_ok());
    }

    #[test]
    fn clamps_out_of_range_progress() {
        approx(Ease::CUBIC_IN.apply(-1.0), 0.0);
        approx(Ease::POWER2_OUT.apply(3.0), 1.0);
    }
}
