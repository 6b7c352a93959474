//! # Sunrise and Sunset
//!
//! Low-precision solar position after the NOAA Global Monitoring Laboratory
//! spreadsheet method (Cornwall, Horiuchi and Lehman). Everything is a function
//! of Julian centuries since J2000.0; angles are kept in degrees at the edges and
//! converted to radians for the trigonometry.
//!
//! ## Procedure
//! 1. Calendar date → Julian Day → Julian centuries `t`
//! 2. Solar noon for the observer's longitude, refined once with the equation
//!    of time at the first estimate
//! 3. Hour angle for the sun's centre 0.833° below the horizon (refraction plus
//!    solar radius) using the declination at solar noon
//! 4. Sunrise/sunset time from noon, hour angle and longitude, refined once with
//!    the declination and equation of time at the first estimate
//!
//! Results are truncated to the whole minute. Accuracy is about a minute away
//! from the polar circles.

use crate::{Observer, TideError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Zenith of the sun's centre at rise/set, degrees
const ZENITH_RISE_SET: f64 = 90.833;

/// Julian Day of J2000.0
const J2000: f64 = 2451545.0;

/// Days per Julian century
const JULIAN_CENTURY: f64 = 36525.0;

/// Minutes in a day
const DAY_MINUTES: f64 = 1440.0;

/// Sunrise and sunset calculator for one observer.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_calendar::{sun::Sun, Observer};
///
/// let sun = Sun::new(Observer::new(58.0, 0.0).unwrap());
/// let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
/// assert_eq!(sun.rise(date).unwrap().format("%H:%M").to_string(), "07:33");
/// assert_eq!(sun.set(date).unwrap().format("%H:%M").to_string(), "16:55");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Sun {
    observer: Observer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Event {
    Rise,
    Set,
}

impl Sun {
    pub fn new(observer: Observer) -> Self {
        Sun { observer }
    }

    pub fn observer(&self) -> Observer {
        self.observer
    }

    /// Sunrise on `date` (a UTC calendar day)
    ///
    /// # Errors
    /// [`TideError::NoSunEvent`] during polar day or polar night.
    pub fn rise(&self, date: NaiveDate) -> Result<DateTime<Utc>, TideError> {
        self.event(date, Event::Rise)
    }

    /// Sunset on `date` (a UTC calendar day)
    ///
    /// # Errors
    /// [`TideError::NoSunEvent`] during polar day or polar night.
    pub fn set(&self, date: NaiveDate) -> Result<DateTime<Utc>, TideError> {
        self.event(date, Event::Set)
    }

    /// `Sunrise 07:33Z Sunset 16:55Z`
    pub fn at_date(&self, date: NaiveDate) -> Result<String, TideError> {
        let (rise, set) = (self.rise(date)?, self.set(date)?);
        Ok(format!(
            "Sunrise {}Z Sunset {}Z",
            rise.format("%H:%M"),
            set.format("%H:%M")
        ))
    }

    fn event(&self, date: NaiveDate, event: Event) -> Result<DateTime<Utc>, TideError> {
        let jd = julian_day(date);
        let t = julian_century(jd);

        let noon = self.solar_noon(t);
        let t_noon = julian_century(jd + noon / DAY_MINUTES);

        // First pass at solar noon
        let minutes = self.event_minutes(date, t_noon, event)?;

        // Second pass at the first estimate
        let t_event = julian_century(jd + minutes / DAY_MINUTES);
        let minutes = self.event_minutes(date, t_event, event)?;

        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        Ok(midnight + Duration::minutes(minutes.floor() as i64))
    }

    /// Minutes after 00:00 UTC of the rise/set, using solar parameters at `t`
    fn event_minutes(&self, date: NaiveDate, t: f64, event: Event) -> Result<f64, TideError> {
        let mut hour_angle = self.hour_angle_at_sunrise(date, sun_declination(t))?;
        if event == Event::Set {
            hour_angle = -hour_angle;
        }
        let delta = -self.observer.longitude() - hour_angle.to_degrees();
        Ok(720.0 + 4.0 * delta - equation_of_time(t))
    }

    /// Minutes after 00:00 UTC of solar noon on the day starting at `t`
    fn solar_noon(&self, t: f64) -> f64 {
        let longitude = self.observer.longitude();
        let jd = julian_century_to_day(t);

        let t_noon = julian_century(jd - longitude / 360.0);
        let noon = 720.0 - longitude * 4.0 - equation_of_time(t_noon);

        let t_noon = julian_century(jd - 0.5 + noon / DAY_MINUTES);
        720.0 - longitude * 4.0 - equation_of_time(t_noon)
    }

    /// Hour angle of sunrise in radians; negate for sunset.
    fn hour_angle_at_sunrise(&self, date: NaiveDate, declination: f64) -> Result<f64, TideError> {
        let latitude = self.observer.latitude().to_radians();
        let cos_hour_angle = ZENITH_RISE_SET.to_radians().cos()
            / (latitude.cos() * declination.cos())
            - latitude.tan() * declination.tan();

        if !(-1.0..=1.0).contains(&cos_hour_angle) {
            return Err(TideError::NoSunEvent {
                date,
                latitude: self.observer.latitude(),
            });
        }
        Ok(cos_hour_angle.acos())
    }
}

/// Julian Day at 00:00 UTC of a Gregorian date
fn julian_day(date: NaiveDate) -> f64 {
    let (mut year, mut month) = (date.year() as f64, date.month() as f64);
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }
    let a = (year / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + date.day() as f64 + b
        - 1524.5
}

fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / JULIAN_CENTURY
}

fn julian_century_to_day(t: f64) -> f64 {
    t * JULIAN_CENTURY + J2000
}

/// Geometric mean longitude of the sun, radians in [0, 2π)
fn geometric_mean_longitude(t: f64) -> f64 {
    let l0 = (280.46646 + t * (36000.76983 + 0.0003032 * t)).rem_euclid(360.0);
    l0.to_radians()
}

/// Geometric mean anomaly of the sun, radians
fn geometric_mean_anomaly(t: f64) -> f64 {
    (357.52911 + t * (35999.05029 - 0.0001537 * t)).to_radians()
}

/// Eccentricity of Earth's orbit (unitless)
fn orbital_eccentricity(t: f64) -> f64 {
    0.016708634 - t * (0.000042037 + 0.0000001267 * t)
}

/// Equation of centre, degrees
fn equation_of_centre(t: f64) -> f64 {
    let m = geometric_mean_anomaly(t);
    m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * m).sin() * 0.000289
}

/// True longitude, degrees
fn true_longitude(t: f64) -> f64 {
    geometric_mean_longitude(t).to_degrees() + equation_of_centre(t)
}

/// Longitude of the ascending node of the moon's orbit, radians
fn omega(t: f64) -> f64 {
    (125.04 - 1934.136 * t).to_radians()
}

/// Apparent longitude, degrees
fn apparent_longitude(t: f64) -> f64 {
    true_longitude(t) - 0.00569 - 0.00478 * omega(t).sin()
}

/// Mean obliquity of the ecliptic, degrees
fn mean_obliquity(t: f64) -> f64 {
    let seconds = 21.448 - t * (46.8150 + t * (0.00059 - t * 0.001813));
    23.0 + (26.0 + seconds / 60.0) / 60.0
}

/// Obliquity corrected for nutation, radians
fn obliquity_correction(t: f64) -> f64 {
    (mean_obliquity(t) + 0.00256 * omega(t).cos()).to_radians()
}

/// Solar declination, radians
fn sun_declination(t: f64) -> f64 {
    (obliquity_correction(t).sin() * apparent_longitude(t).to_radians().sin()).asin()
}

/// Apparent minus mean solar time, minutes
fn equation_of_time(t: f64) -> f64 {
    let epsilon = obliquity_correction(t);
    let l0 = geometric_mean_longitude(t);
    let e = orbital_eccentricity(t);
    let m = geometric_mean_anomaly(t);
    let y = (epsilon / 2.0).tan().powi(2);

    let e_time = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();

    e_time.to_degrees() * 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sun(latitude: f64, longitude: f64) -> Sun {
        Sun::new(Observer::new(latitude, longitude).unwrap())
    }

    #[test]
    fn julian_day_known_dates() {
        assert_eq!(julian_day(date(2000, 1, 1)), 2451544.5);
        assert_eq!(julian_day(date(2026, 1, 1)), 2461041.5);
        // January/February belong to the previous March-based year
        assert_eq!(julian_day(date(2026, 2, 14)), 2461085.5);
        assert_eq!(julian_day(date(2024, 3, 1)) - julian_day(date(2024, 2, 28)), 2.0);
    }

    #[test]
    fn julian_century_round_trip_at_epoch() {
        assert_eq!(julian_century(J2000), 0.0);
        assert_eq!(julian_century_to_day(1.0), J2000 + JULIAN_CENTURY);
    }

    #[test]
    fn equation_of_time_is_bounded() {
        for day in 0..366 {
            let jd = julian_day(date(2026, 1, 1)) + day as f64;
            let eot = equation_of_time(julian_century(jd));
            assert!((-15.0..=17.0).contains(&eot), "day {day}: {eot}");
        }
    }

    #[test]
    fn declination_at_solstices() {
        let june = sun_declination(julian_century(julian_day(date(2026, 6, 21)))).to_degrees();
        let december =
            sun_declination(julian_century(julian_day(date(2026, 12, 21)))).to_degrees();
        assert!((june - 23.44).abs() < 0.05, "{june}");
        assert!((december + 23.44).abs() < 0.05, "{december}");
    }

    #[test]
    fn rise_and_set_at_58_north() {
        let sun = sun(58.0, 0.0);
        let day = date(2026, 2, 14);
        assert_eq!(
            sun.rise(day).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 14, 7, 33, 0).unwrap()
        );
        assert_eq!(
            sun.set(day).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 14, 16, 55, 0).unwrap()
        );
    }

    #[test]
    fn liverpool_midsummer() {
        let sun = sun(53.4555809, -3.0224621);
        let day = date(2026, 6, 21);
        assert_eq!(sun.rise(day).unwrap().format("%H:%M").to_string(), "03:43");
        assert_eq!(sun.set(day).unwrap().format("%H:%M").to_string(), "20:44");
    }

    #[test]
    fn equator_at_equinox_has_twelve_hour_day() {
        let sun = sun(0.0, 0.0);
        let day = date(2026, 3, 20);
        let length = sun.set(day).unwrap() - sun.rise(day).unwrap();
        assert!(
            (length.num_minutes() - 726).abs() <= 2,
            "{}",
            length.num_minutes()
        );
    }

    #[test]
    fn polar_night_has_no_sun_event() {
        let sun = sun(85.0, 0.0);
        let day = date(2026, 12, 21);
        assert!(matches!(sun.rise(day), Err(TideError::NoSunEvent { .. })));
        assert!(matches!(sun.set(day), Err(TideError::NoSunEvent { .. })));
        assert!(sun.at_date(day).is_err());
    }

    #[test]
    fn polar_day_has_no_sun_event() {
        assert!(matches!(
            sun(85.0, 0.0).rise(date(2026, 6, 21)),
            Err(TideError::NoSunEvent { .. })
        ));
        assert!(matches!(
            sun(-85.0, 0.0).set(date(2026, 6, 21)),
            Err(TideError::NoSunEvent { .. })
        ));
    }

    #[test]
    fn at_date_text() {
        assert_eq!(
            sun(58.0, 0.0).at_date(date(2026, 2, 14)).unwrap(),
            "Sunrise 07:33Z Sunset 16:55Z"
        );
    }
}
