//! Moist-air relations used by the elevation correction and the derived
//! variables. Temperatures in °C, pressures in hPa, mixing ratios in g/kgDA.

/// Ratio of the molar masses of water vapour and dry air, in g/kg.
const EPSILON_G_PER_KG: f64 = 622.0;

const ZERO_CELSIUS_K: f64 = 273.15;

/// Search range of the dew point, °C.
const DEW_POINT_RANGE: (f64, f64) = (-100.0, 100.0);
const DEW_POINT_ITERATIONS: usize = 60;

/// Saturation vapour pressure in hPa (Wexler-Hyland), over ice below 0 °C.
pub fn saturation_vapor_pressure(temperature: f64) -> f64 {
    let t = temperature + ZERO_CELSIUS_K;
    let ln_pws = if temperature >= 0.0 {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    } else {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t.powi(2)
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    };
    // Pa -> hPa
    ln_pws.exp() / 100.0
}

/// Saturation mixing ratio at `temperature` and `pressure`.
///
/// Returns infinity when the saturation vapour pressure reaches the total
/// pressure, i.e. when no cap applies.
pub fn saturation_mixing_ratio(temperature: f64, pressure: f64) -> f64 {
    let es = saturation_vapor_pressure(temperature);
    if pressure <= es {
        return f64::INFINITY;
    }
    EPSILON_G_PER_KG * es / (pressure - es)
}

/// Partial pressure of water vapour in hPa.
pub fn vapor_pressure(mixing_ratio: f64, pressure: f64) -> f64 {
    pressure * mixing_ratio / (EPSILON_G_PER_KG + mixing_ratio)
}

/// Relative humidity in %, clamped to `[0, 100]`.
pub fn relative_humidity(temperature: f64, pressure: f64, mixing_ratio: f64) -> f64 {
    let es = saturation_vapor_pressure(temperature);
    (100.0 * vapor_pressure(mixing_ratio, pressure) / es).clamp(0.0, 100.0)
}

/// Dew point in °C: the temperature whose saturation vapour pressure equals
/// the vapour pressure of the air. `None` for dry air.
pub fn dew_point(mixing_ratio: f64, pressure: f64) -> Option<f64> {
    let e = vapor_pressure(mixing_ratio, pressure);
    if e.is_nan() || e <= 0.0 {
        return None;
    }
    let (mut low, mut high) = DEW_POINT_RANGE;
    if e <= saturation_vapor_pressure(low) {
        return Some(low);
    }
    if e >= saturation_vapor_pressure(high) {
        return Some(high);
    }
    for _ in 0..DEW_POINT_ITERATIONS {
        let mid = 0.5 * (low + high);
        if saturation_vapor_pressure(mid) < e {
            low = mid;
        } else {
            high = mid;
        }
    }
    Some(0.5 * (low + high))
}
