use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::QuotationError;

// ─── Closed input vocabularies ───────────────────────────────────────────────

/// Generates the wire name, the list of accepted values and a
/// case-insensitive `FromStr` for a closed enum.
macro_rules! closed_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }

            pub fn accepted() -> Vec<String> {
                Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
            }
        }

        impl FromStr for $ty {
            type Err = QuotationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| QuotationError::invalid(format!(
                        "{} must be one of [{}], got \"{}\"",
                        $field,
                        Self::accepted().join(", "),
                        s
                    )))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Industrial,
}

closed_enum!(PropertyType, "propertyType", {
    Residential => "residential",
    Commercial => "commercial",
    Industrial => "industrial",
});

/// Roof construction. Carried through to the quotation for display only,
/// it does not influence any figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoofType {
    Concrete,
    Tile,
    Metal,
    Asbestos,
}

closed_enum!(RoofType, "roofType", {
    Concrete => "concrete",
    Tile => "tile",
    Metal => "metal",
    Asbestos => "asbestos",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocationTier {
    Western,
    Other,
}

closed_enum!(LocationTier, "locationTier", {
    Western => "western",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UsagePattern {
    Daytime,
    Evening,
    Mixed,
}

closed_enum!(UsagePattern, "usagePattern", {
    Daytime => "daytime",
    Evening => "evening",
    Mixed => "mixed",
});

// ─── Request (raw wire form) ─────────────────────────────────────────────────

/// A numeric form field: a JSON number, or a string holding one
/// (`"12500"` from an HTML form post).
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    fn parse(&self, field: &str, max: f64) -> Result<f64, QuotationError> {
        let value = match self {
            NumericField::Number(n) => *n,
            NumericField::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                QuotationError::invalid(format!("{} must be a number, got \"{}\"", field, s))
            })?,
        };
        in_domain(field, value, max)
    }
}

/// Quotation request as posted by the customer form. Every field is
/// optional here so that a missing field is reported as `InvalidInput`
/// together with the other problems instead of a bare parse failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    #[serde(default)]
    pub monthly_bill: Option<NumericField>,
    #[serde(default)]
    pub roof_area: Option<NumericField>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub roof_type: Option<String>,
    #[serde(default)]
    pub location_tier: Option<String>,
    #[serde(default)]
    pub usage_pattern: Option<String>,
}

/// Largest accepted monthly bill (currency units).
pub const MAX_MONTHLY_BILL: f64 = 1e12;
/// Largest accepted roof area (area units), i.e. a 1,000,000 kW system.
/// Keeps panel and battery counts inside `u32` and costs exact in `i64`.
pub const MAX_ROOF_AREA: f64 = 1e8;

/// `value` must be finite, above 0 and at most `max`.
pub(crate) fn in_domain(field: &str, value: f64, max: f64) -> Result<f64, QuotationError> {
    if !value.is_finite() {
        return Err(QuotationError::invalid(format!("{} must be a finite number", field)));
    }
    if value <= 0.0 {
        return Err(QuotationError::invalid(format!(
            "{} must be greater than 0, got {}",
            field, value
        )));
    }
    if value > max {
        return Err(QuotationError::invalid(format!(
            "{} must be at most {}, got {}",
            field, max, value
        )));
    }
    Ok(value)
}

fn required<T>(
    field: &str,
    value: Option<&T>,
    parse: impl FnOnce(&T) -> Result<f64, QuotationError>,
    problems: &mut Vec<String>,
) -> f64 {
    match value {
        None => {
            problems.push(format!("{} is required", field));
            0.0
        }
        Some(v) => parse(v).unwrap_or_else(|e| {
            problems.push(e.to_string());
            0.0
        }),
    }
}

fn required_enum<E: FromStr<Err = QuotationError>>(
    field: &str,
    value: Option<&String>,
    problems: &mut Vec<String>,
) -> Option<E> {
    match value {
        None => {
            problems.push(format!("{} is required", field));
            None
        }
        Some(s) => s.parse::<E>().map_err(|e| problems.push(e.to_string())).ok(),
    }
}

impl TryFrom<QuotationRequest> for QuotationInput {
    type Error = QuotationError;

    /// Collects every problem with the request into a single
    /// `InvalidInput` so the form can show them all at once.
    fn try_from(req: QuotationRequest) -> Result<Self, Self::Error> {
        let mut problems = Vec::new();

        let monthly_bill = required(
            "monthlyBill",
            req.monthly_bill.as_ref(),
            |f| f.parse("monthlyBill", MAX_MONTHLY_BILL),
            &mut problems,
        );
        let roof_area = required(
            "roofArea",
            req.roof_area.as_ref(),
            |f| f.parse("roofArea", MAX_ROOF_AREA),
            &mut problems,
        );
        let property_type = required_enum::<PropertyType>("propertyType", req.property_type.as_ref(), &mut problems);
        let roof_type = required_enum::<RoofType>("roofType", req.roof_type.as_ref(), &mut problems);
        let location_tier = required_enum::<LocationTier>("locationTier", req.location_tier.as_ref(), &mut problems);
        let usage_pattern = required_enum::<UsagePattern>("usagePattern", req.usage_pattern.as_ref(), &mut problems);

        match (property_type, roof_type, location_tier, usage_pattern) {
            (Some(property_type), Some(roof_type), Some(location_tier), Some(usage_pattern))
                if problems.is_empty() =>
            {
                Ok(QuotationInput {
                    monthly_bill,
                    roof_area,
                    property_type,
                    roof_type,
                    location_tier,
                    usage_pattern,
                })
            }
            _ => Err(QuotationError::invalid(problems.join("; "))),
        }
    }
}

// ─── Validated input ─────────────────────────────────────────────────────────

/// Customer parameters after validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationInput {
    /// Average monthly electricity bill (currency units)
    pub monthly_bill: f64,
    /// Usable roof area (area units, 100 per kW)
    pub roof_area: f64,
    pub property_type: PropertyType,
    pub roof_type: RoofType,
    pub location_tier: LocationTier,
    pub usage_pattern: UsagePattern,
}

impl QuotationInput {
    /// Checks the numeric constraints. Enum fields are valid by construction.
    pub fn validate(&self) -> Result<(), QuotationError> {
        in_domain("monthlyBill", self.monthly_bill, MAX_MONTHLY_BILL)?;
        in_domain("roofArea", self.roof_area, MAX_ROOF_AREA)?;
        Ok(())
    }
}

// ─── Derived equipment ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum InverterClass {
    #[serde(rename = "String Inverter (3kW)")]
    String3Kw,
    #[serde(rename = "String Inverter (5kW)")]
    String5Kw,
    #[serde(rename = "String Inverter (10kW)")]
    String10Kw,
    #[serde(rename = "Three Phase Inverter")]
    ThreePhase,
}

impl InverterClass {
    pub fn label(&self) -> &'static str {
        match self {
            InverterClass::String3Kw => "String Inverter (3kW)",
            InverterClass::String5Kw => "String Inverter (5kW)",
            InverterClass::String10Kw => "String Inverter (10kW)",
            InverterClass::ThreePhase => "Three Phase Inverter",
        }
    }
}

impl fmt::Display for InverterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStorage {
    GridTie,
    Lithium { kwh: u32 },
}

impl BatteryStorage {
    pub const GRID_TIE_LABEL: &'static str = "None (Grid-Tie System)";

    pub fn label(&self) -> String {
        match self {
            BatteryStorage::GridTie => Self::GRID_TIE_LABEL.to_string(),
            BatteryStorage::Lithium { kwh } => format!("{}kWh Lithium Battery Storage", kwh),
        }
    }

    pub fn kwh(&self) -> u32 {
        match self {
            BatteryStorage::GridTie => 0,
            BatteryStorage::Lithium { kwh } => *kwh,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, BatteryStorage::Lithium { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub system_cost: i64,
    pub installation_cost: i64,
    pub total_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub monthly_production_kwh: f64,
    pub monthly_savings: f64,
    pub component_list: Vec<String>,
}

/// Years until savings repay the total cost. A quotation with no savings
/// never pays back, which is a valid outcome rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaybackPeriod {
    Years(f64),
    NotApplicable,
}

impl PaybackPeriod {
    pub const NOT_APPLICABLE: &'static str = "not applicable";
}

impl Serialize for PaybackPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PaybackPeriod::Years(y) => serializer.serialize_f64(*y),
            PaybackPeriod::NotApplicable => serializer.serialize_str(Self::NOT_APPLICABLE),
        }
    }
}

impl fmt::Display for PaybackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaybackPeriod::Years(y) => write!(f, "{:.1} years", y),
            PaybackPeriod::NotApplicable => f.write_str(Self::NOT_APPLICABLE),
        }
    }
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// Recommended system and its cost / savings projection.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationResult {
    /// Recommended capacity (kW, 2 decimals)
    pub system_size_kw: f64,
    pub panel_count: u32,
    pub inverter_class: InverterClass,
    /// Battery description, "None (Grid-Tie System)" without storage
    pub battery_storage: String,
    pub battery_storage_kwh: u32,
    pub monthly_production_kwh: f64,
    pub system_cost: i64,
    pub installation_cost: i64,
    pub total_cost: i64,
    /// Never above the monthly bill
    pub monthly_savings: f64,
    /// Number with one decimal, or the string "not applicable"
    #[schema(value_type = Object)]
    pub payback_years: PaybackPeriod,
    pub component_list: Vec<String>,
}

// ─── REST API response types ─────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationResponse {
    pub quotation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub input: QuotationInput,
    pub quotation: QuotationResult,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingConstants {
    pub rate_per_kwh: f64,
    pub peak_sun_hours: f64,
    pub area_per_kw: f64,
    pub panel_wattage_w: f64,
    pub cost_per_kw: f64,
    pub battery_cost_per_kwh: f64,
    pub installation_share: f64,
    pub western_multiplier: f64,
    pub other_multiplier: f64,
    pub monthly_yield_kwh_per_kw: f64,
}

/// Accepted values for every enum field of the quotation form.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationOptions {
    pub property_types: Vec<String>,
    pub roof_types: Vec<String>,
    pub location_tiers: Vec<String>,
    pub usage_patterns: Vec<String>,
    pub pricing: PricingConstants,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> QuotationRequest {
        serde_json::from_value(serde_json::json!({
            "monthlyBill": 12500,
            "roofArea": "400",
            "propertyType": "Residential",
            "roofType": "tile",
            "locationTier": " western ",
            "usagePattern": "MIXED"
        }))
        .unwrap()
    }

    #[test]
    fn test_request_converts_with_lenient_values() {
        let input = QuotationInput::try_from(full_request()).unwrap();
        assert_eq!(input.monthly_bill, 12500.0);
        assert_eq!(input.roof_area, 400.0);
        assert_eq!(input.property_type, PropertyType::Residential);
        assert_eq!(input.roof_type, RoofType::Tile);
        assert_eq!(input.location_tier, LocationTier::Western);
        assert_eq!(input.usage_pattern, UsagePattern::Mixed);
    }

    #[test]
    fn test_negative_bill_rejected() {
        let mut req = full_request();
        req.monthly_bill = Some(NumericField::Number(-100.0));
        let err = QuotationInput::try_from(req).unwrap_err();
        assert!(err.to_string().contains("monthlyBill must be greater than 0"));
    }

    #[test]
    fn test_oversized_values_rejected() {
        let mut req = full_request();
        req.monthly_bill = Some(NumericField::Number(1e17));
        req.roof_area = Some(NumericField::Text("1e12".into()));
        let msg = QuotationInput::try_from(req).unwrap_err().to_string();
        assert!(msg.contains("monthlyBill must be at most"));
        assert!(msg.contains("roofArea must be at most"));

        let mut req = full_request();
        req.monthly_bill = Some(NumericField::Number(MAX_MONTHLY_BILL));
        req.roof_area = Some(NumericField::Number(MAX_ROOF_AREA));
        assert!(QuotationInput::try_from(req).is_ok());
    }

    #[test]
    fn test_non_numeric_text_rejected() {
        let mut req = full_request();
        req.roof_area = Some(NumericField::Text("large".into()));
        let err = QuotationInput::try_from(req).unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
        assert!(err.to_string().contains("roofArea must be a number"));
    }

    #[test]
    fn test_all_problems_reported_together() {
        let err = QuotationInput::try_from(QuotationRequest {
            usage_pattern: Some("weekends".into()),
            ..Default::default()
        })
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("monthlyBill is required"));
        assert!(msg.contains("roofArea is required"));
        assert!(msg.contains("propertyType is required"));
        assert!(msg.contains("roofType is required"));
        assert!(msg.contains("locationTier is required"));
        assert!(msg.contains("usagePattern must be one of [daytime, evening, mixed]"));
    }

    #[test]
    fn test_unknown_enum_value() {
        let err = "farm".parse::<PropertyType>().unwrap_err();
        assert_eq!(
            err,
            QuotationError::invalid(
                "propertyType must be one of [residential, commercial, industrial], got \"farm\""
            )
        );
    }

    #[test]
    fn test_payback_serialization() {
        assert_eq!(serde_json::to_value(PaybackPeriod::Years(4.4)).unwrap(), serde_json::json!(4.4));
        assert_eq!(
            serde_json::to_value(PaybackPeriod::NotApplicable).unwrap(),
            serde_json::json!("not applicable")
        );
    }

    #[test]
    fn test_inverter_serializes_as_label() {
        let v = serde_json::to_value(InverterClass::ThreePhase).unwrap();
        assert_eq!(v, serde_json::json!("Three Phase Inverter"));
        assert_eq!(InverterClass::String5Kw.to_string(), "String Inverter (5kW)");
    }

    #[test]
    fn test_battery_labels() {
        assert_eq!(BatteryStorage::GridTie.label(), "None (Grid-Tie System)");
        assert_eq!(BatteryStorage::Lithium { kwh: 15 }.label(), "15kWh Lithium Battery Storage");
        assert_eq!(BatteryStorage::GridTie.kwh(), 0);
    }
}
