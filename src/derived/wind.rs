/// Scalar wind speed from the vector components, in m/s.
pub fn wind_speed(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

/// Meteorological wind direction: the bearing the wind blows *from*, in
/// degrees clockwise from north within `[0, 360)`. Calm air reports 0.
pub fn wind_direction(u: f64, v: f64) -> f64 {
    if wind_speed(u, v) == 0.0 {
        return 0.0;
    }
    let bearing = (-u).atan2(-v).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}
