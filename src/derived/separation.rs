//! Separation of global horizontal radiation into direct normal and diffuse
//! horizontal components.

use crate::config::SeparationMethod;
use crate::derived::perez::{perez_split, PerezContext};
use crate::types::record::{RadiationSplit, SunPosition};

/// Tolerance on reproduced global radiation when solving for transmittance.
const GLOBAL_TOLERANCE: f64 = 1e-5;
/// Bracket width below which the bisection is considered not to converge.
const BRACKET_TOLERANCE: f64 = 1e-10;
const TRANSMITTANCE_MIN: f64 = 0.0;
const TRANSMITTANCE_MAX: f64 = 0.85;
/// Upper end of the initial bracket; low sun can need a transmittance above 1.
const BRACKET_UPPER: f64 = 1.2;

/// Splits `global` (MJ/m²h) with the chosen method.
///
/// Returns `None` for [`SeparationMethod::Disabled`] and when the
/// transmittance bisection does not converge. With the sun below the horizon
/// everything is diffuse. [`SeparationMethod::Perez`] sees the hour in
/// isolation here, at sea level with an unknown dew point; use
/// [`separate_in_context`] to supply its neighbouring hours.
pub fn separate(
    global: f64,
    sun: &SunPosition,
    method: SeparationMethod,
) -> Option<RadiationSplit> {
    separate_in_context(global, sun, method, &PerezContext::default())
}

/// As [`separate`], with the neighbouring hours and site data read by the
/// Perez model. The other methods ignore `context`.
pub fn separate_in_context(
    global: f64,
    sun: &SunPosition,
    method: SeparationMethod,
    context: &PerezContext,
) -> Option<RadiationSplit> {
    if method == SeparationMethod::Disabled {
        return None;
    }
    let global = global.max(0.0);
    if !sun.is_up() {
        return Some(RadiationSplit {
            direct_normal: 0.0,
            diffuse_horizontal: global,
        });
    }
    if global == 0.0 {
        return Some(RadiationSplit {
            direct_normal: 0.0,
            diffuse_horizontal: 0.0,
        });
    }

    let sin_h = sun.sin_altitude();
    let in0 = sun.extraterrestrial;

    match method {
        SeparationMethod::Nagata => {
            let diffuse = solve_diffuse(global, sin_h, in0, nagata_diffuse)?;
            from_diffuse(global, sin_h, diffuse)
        }
        SeparationMethod::Watanabe => {
            let diffuse = solve_diffuse(global, sin_h, in0, watanabe_diffuse)?;
            from_diffuse(global, sin_h, diffuse)
        }
        SeparationMethod::Erbs => from_diffuse(global, sin_h, erbs_diffuse(global, in0, sin_h)),
        SeparationMethod::Udagawa => {
            let direct = udagawa_direct(global, in0, sin_h);
            Some(RadiationSplit {
                direct_normal: direct,
                diffuse_horizontal: (global - direct * sin_h).max(0.0),
            })
        }
        SeparationMethod::Perez => Some(perez_split(global, sun, context)),
        SeparationMethod::Disabled => None,
    }
}

fn from_diffuse(global: f64, sin_h: f64, diffuse: f64) -> Option<RadiationSplit> {
    let diffuse = diffuse.max(0.0);
    Some(RadiationSplit {
        direct_normal: ((global - diffuse) / sin_h).max(0.0),
        diffuse_horizontal: diffuse,
    })
}

/// Clearness index, capped at 1.
pub fn clearness_index(global: f64, extraterrestrial: f64, sin_h: f64) -> f64 {
    (global / (extraterrestrial * sin_h)).min(1.0)
}

/// Nagata diffuse horizontal radiation for transmittance `p`.
fn nagata_diffuse(p: f64, in0: f64, sin_h: f64) -> f64 {
    in0 * sin_h
        * (1.0 - p.powf(1.0 / sin_h))
        * (0.66 - 0.32 * sin_h)
        * (0.5 + (0.4 - 0.3 * p) * sin_h)
}

/// Watanabe diffuse horizontal radiation for transmittance `p`.
fn watanabe_diffuse(p: f64, in0: f64, sin_h: f64) -> f64 {
    let p = p.min(1.0);
    let q = (0.8672 + 0.7505 * sin_h)
        * p.powf(0.421 / sin_h)
        * (1.0 - p.powf(1.0 / sin_h)).powf(2.277);
    in0 * sin_h * (q / (1.0 + q))
}

/// Global horizontal radiation reproduced from transmittance and diffuse part.
fn global_from(p: f64, in0: f64, sin_h: f64, diffuse: f64) -> f64 {
    in0 * p.powf(1.0 / sin_h) * sin_h + diffuse
}

/// Bisection on atmospheric transmittance until the diffuse model reproduces
/// `global`. The result never exceeds `global`.
fn solve_diffuse(
    global: f64,
    sin_h: f64,
    in0: f64,
    diffuse_model: fn(f64, f64, f64) -> f64,
) -> Option<f64> {
    let (mut a, mut b) = (0.0, BRACKET_UPPER);
    loop {
        let p = (a + b) / 2.0;
        let diffuse = diffuse_model(p, in0, sin_h);
        let reproduced = global_from(p, in0, sin_h, diffuse);
        if (reproduced - global).abs() <= GLOBAL_TOLERANCE {
            let diffuse = if p >= TRANSMITTANCE_MAX {
                diffuse_model(TRANSMITTANCE_MAX, in0, sin_h)
            } else {
                diffuse
            };
            return Some(diffuse.min(global));
        } else if a >= TRANSMITTANCE_MAX {
            return Some(diffuse_model(TRANSMITTANCE_MAX, in0, sin_h).min(global));
        } else if b <= TRANSMITTANCE_MIN {
            return Some(diffuse_model(TRANSMITTANCE_MIN, in0, sin_h).min(global));
        } else if p <= BRACKET_TOLERANCE * 10.0 {
            return Some(diffuse_model(0.0, in0, sin_h).min(global));
        } else if (a - b).abs() <= BRACKET_TOLERANCE {
            return None;
        } else if reproduced < global {
            a = p;
        } else {
            b = p;
        }
    }
}

/// Erbs diffuse horizontal radiation.
pub fn erbs_diffuse(global: f64, in0: f64, sin_h: f64) -> f64 {
    if global <= 0.0 {
        return 0.0;
    }
    let kt = clearness_index(global, in0, sin_h);
    if kt <= 0.22 {
        global * (1.0 - 0.09 * kt)
    } else if kt <= 0.80 {
        global * (0.9511 - 0.1604 * kt + 4.388 * kt.powi(2) - 16.638 * kt.powi(3)
            + 12.336 * kt.powi(4))
    } else {
        0.165 * global
    }
}

/// Udagawa direct normal radiation.
fn udagawa_direct(global: f64, in0: f64, sin_h: f64) -> f64 {
    let kc = 0.5163 + 0.333 * sin_h + 0.00803 * sin_h.powi(2);
    let kt = clearness_index(global, in0, sin_h);
    let direct = if kt < kc {
        in0 * (2.277 - 1.258 * sin_h + 0.2396 * sin_h.powi(2)) * kt.powi(3)
    } else {
        in0 * (-0.43 + 1.43 * kt)
    };
    direct.max(0.0)
}
