//! Units and conversions
//!
//! Two kinds of conversion live here:
//! - linear mass conversions (µg, mg, g, kg, lb), including compound
//!   "per reference mass" units such as `µg/g` used by proportional CMCs
//! - affine temperature conversions between °C and °F
//!
//! Unknown units are always an error. Nothing here falls back to a zero factor.

use serde::{Deserialize, Serialize};

use crate::core::error::CalcError;

// ============================================================================
// Mass Conversion Constants (to grams)
// ============================================================================

/// Grams per microgram
pub const G_PER_UG: f64 = 1e-6;
/// Grams per milligram
pub const G_PER_MG: f64 = 1e-3;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1e3;
/// Grams per avoirdupois pound
pub const G_PER_LB: f64 = 453.59237;

/// A unit a target measurement can be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "°F")]
    Fahrenheit,
    #[serde(rename = "%RH")]
    RelativeHumidity,
}

/// Physical quantity a unit belongs to; decides which range table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    Mass,
    Thermodynamic,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Pound => "lb",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::RelativeHumidity => "%RH",
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Gram | Unit::Kilogram | Unit::Pound => UnitFamily::Mass,
            Unit::Celsius | Unit::Fahrenheit | Unit::RelativeHumidity => UnitFamily::Thermodynamic,
        }
    }

    /// The unit range tables are keyed in for this unit's family
    ///
    /// Mass resolves in grams, temperatures in °C, humidity stays in %RH.
    pub fn base(&self) -> Unit {
        match self {
            Unit::Gram | Unit::Kilogram | Unit::Pound => Unit::Gram,
            Unit::Celsius | Unit::Fahrenheit => Unit::Celsius,
            Unit::RelativeHumidity => Unit::RelativeHumidity,
        }
    }

    fn grams_factor(&self) -> Option<f64> {
        match self {
            Unit::Gram => Some(1.0),
            Unit::Kilogram => Some(G_PER_KG),
            Unit::Pound => Some(G_PER_LB),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Parses the unit symbols, trimmed
///
/// `ºC` and `ºF` written with the masculine ordinal sign (U+00BA) are accepted
/// for `°C` and `°F`; Spanish keyboard layouts produce it in place of the
/// degree sign.
impl std::str::FromStr for Unit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "g" => Ok(Unit::Gram),
            "kg" => Ok(Unit::Kilogram),
            "lb" => Ok(Unit::Pound),
            "°C" | "ºC" => Ok(Unit::Celsius),
            "°F" | "ºF" => Ok(Unit::Fahrenheit),
            "%RH" => Ok(Unit::RelativeHumidity),
            _ => Err(CalcError::UnsupportedUnit {
                unit: s.to_string(),
            }),
        }
    }
}

/// Convert a point value between two units of the same quantity
///
/// Mass uses `value * factor(from) / factor(to)`; temperature is affine.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, CalcError> {
    if from == to {
        return Ok(value);
    }

    if let (Some(from_g), Some(to_g)) = (from.grams_factor(), to.grams_factor()) {
        return Ok(value * from_g / to_g);
    }

    match (from, to) {
        (Unit::Fahrenheit, Unit::Celsius) => Ok((value - 32.0) * 5.0 / 9.0),
        (Unit::Celsius, Unit::Fahrenheit) => Ok(value * 9.0 / 5.0 + 32.0),
        _ => Err(CalcError::conversion(from.symbol(), to.symbol())),
    }
}

/// Convert an interval (e.g. an uncertainty) between two units
///
/// Same as [`convert`] for mass. Temperature intervals scale without the
/// 32° offset.
pub fn convert_difference(value: f64, from: Unit, to: Unit) -> Result<f64, CalcError> {
    match (from, to) {
        (Unit::Fahrenheit, Unit::Celsius) => Ok(value * 5.0 / 9.0),
        (Unit::Celsius, Unit::Fahrenheit) => Ok(value * 9.0 / 5.0),
        _ => convert(value, from, to),
    }
}

/// Conversion factor to grams for a simple mass unit symbol
///
/// Micrograms are accepted as `µg` (micro sign), `μg` (greek mu) or the
/// ASCII spelling `ug`.
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    match unit.trim() {
        "µg" | "μg" | "ug" => Some(G_PER_UG),
        "mg" => Some(G_PER_MG),
        "g" => Some(1.0),
        "kg" => Some(G_PER_KG),
        "lb" => Some(G_PER_LB),
        _ => None,
    }
}

/// Convert a value expressed in `unit` to grams
///
/// Accepts simple mass units (`µg`, `mg`, `g`, `kg`, `lb`) and compound
/// "per reference mass" units written `<numerator>/<N><reference>`:
/// - `"µg/g"` -> micrograms per gram, a dimensionless ratio in g/g
/// - `"µg/10g"` -> micrograms per ten grams
/// - `"mg/kg"` -> milligrams per kilogram
///
/// A leading number on the numerator (`"10 µg/g"`) scales the numerator.
pub fn to_grams(value: f64, unit: &str) -> Result<f64, CalcError> {
    let unit = unit.trim();

    let Some((numerator, reference)) = unit.split_once('/') else {
        return grams_per_unit(unit)
            .map(|factor| value * factor)
            .ok_or_else(|| CalcError::conversion(unit, "g"));
    };

    let (multiplier, numerator_unit) =
        split_leading_number(numerator).ok_or_else(|| CalcError::conversion(unit, "g"))?;
    let numerator_factor =
        grams_per_unit(numerator_unit).ok_or_else(|| CalcError::conversion(unit, "g"))?;

    let (count, reference_unit) =
        split_leading_number(reference).ok_or_else(|| CalcError::conversion(unit, "g"))?;
    let reference_factor =
        grams_per_unit(reference_unit).ok_or_else(|| CalcError::conversion(unit, "g"))?;

    let reference_grams = count.unwrap_or(1.0) * reference_factor;
    if reference_grams == 0.0 {
        return Err(CalcError::conversion(unit, "g"));
    }

    Ok(value * multiplier.unwrap_or(1.0) * numerator_factor / reference_grams)
}

/// Split `"10 g"` / `"10g"` into `(Some(10.0), "g")` and `"g"` into `(None, "g")`
///
/// Returns `None` when a numeric prefix is present but does not parse.
fn split_leading_number(text: &str) -> Option<(Option<f64>, &str)> {
    let text = text.trim();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());

    if end == 0 {
        return Some((None, text));
    }

    let number = text[..end].parse::<f64>().ok()?;
    Some((Some(number), text[end..].trim()))
}
