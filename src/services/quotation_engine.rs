/// ============================================================
///  Solar Quotation Engine
///
///  Pipeline (fixed order, pure, no I/O):
///   1. System size   – demand-derived size capped by roof area
///   2. Equipment     – panel count, inverter class, battery storage
///   3. Costs         – system + installation, location multiplier
///   4. Financials    – monthly production, savings, component list
///   5. Payback       – total cost / yearly savings
/// ============================================================

use crate::errors::QuotationError;
use crate::models::quotation::{
    in_domain, BatteryStorage, CostBreakdown, Financials, InverterClass, LocationTier, PaybackPeriod,
    PricingConstants, PropertyType, QuotationInput, QuotationResult, UsagePattern,
    MAX_MONTHLY_BILL, MAX_ROOF_AREA,
};

// ─── Sizing & pricing constants ──────────────────────────────
/// Currency units per kWh. Shared by sizing and savings so the two cannot drift.
pub const RATE_PER_KWH: f64 = 30.0;
/// kWh produced per installed kW per day.
pub const PEAK_SUN_HOURS: f64 = 4.0;
/// Roof area units needed per installed kW.
pub const AREA_PER_KW: f64 = 100.0;
pub const PANEL_WATTAGE_W: f64 = 400.0;
pub const COST_PER_KW: f64 = 150_000.0;
pub const BATTERY_COST_PER_KWH: f64 = 100_000.0;
pub const INSTALLATION_SHARE: f64 = 0.15;
/// kWh produced per installed kW per month.
pub const MONTHLY_YIELD_KWH_PER_KW: f64 = 120.0;

const EVENING_BATTERY_HOURS: f64 = 5.0;
const MIXED_BATTERY_HOURS: f64 = 3.0;

fn property_factor(property_type: PropertyType) -> f64 {
    match property_type {
        PropertyType::Residential => 1.0,
        PropertyType::Commercial => 1.2,
        PropertyType::Industrial => 1.5,
    }
}

pub fn location_multiplier(tier: LocationTier) -> f64 {
    match tier {
        LocationTier::Western => 1.0,
        LocationTier::Other => 1.1,
    }
}

#[inline]
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Recommended capacity in kW, rounded to 2 decimals and never above
/// `roof_area / AREA_PER_KW`.
pub fn compute_system_size(
    monthly_bill: f64,
    roof_area: f64,
    property_type: PropertyType,
) -> Result<f64, QuotationError> {
    in_domain("monthlyBill", monthly_bill, MAX_MONTHLY_BILL)?;
    in_domain("roofArea", roof_area, MAX_ROOF_AREA)?;

    // bill / rate is the consumption proxy the sizing works from
    let daily_consumption = monthly_bill / RATE_PER_KWH;
    let sized_by_demand = daily_consumption / PEAK_SUN_HOURS * property_factor(property_type);
    let area_limit_kw = roof_area / AREA_PER_KW;
    let size = sized_by_demand.min(area_limit_kw);

    // Rounding half-up may step over the area limit on tiny roofs; round down then.
    let rounded = round_to(size, 2);
    if rounded > area_limit_kw {
        Ok((size * 100.0).floor() / 100.0)
    } else {
        Ok(rounded)
    }
}

pub fn compute_panel_count(system_size_kw: f64) -> u32 {
    if system_size_kw <= 0.0 {
        return 0;
    }
    // Sizes carry 2 decimals; work in whole watts so 0.8 kW is exactly 2 panels.
    let watts = (system_size_kw * 1000.0).round();
    (watts / PANEL_WATTAGE_W).ceil() as u32
}

/// Upper bounds are inclusive: exactly 3.0 kW still takes the 3kW inverter.
pub fn determine_inverter_class(system_size_kw: f64) -> InverterClass {
    if system_size_kw <= 3.0 {
        InverterClass::String3Kw
    } else if system_size_kw <= 5.0 {
        InverterClass::String5Kw
    } else if system_size_kw <= 10.0 {
        InverterClass::String10Kw
    } else {
        InverterClass::ThreePhase
    }
}

pub fn determine_battery_storage(usage_pattern: UsagePattern, system_size_kw: f64) -> BatteryStorage {
    let hours = match usage_pattern {
        UsagePattern::Daytime => return BatteryStorage::GridTie,
        UsagePattern::Evening => EVENING_BATTERY_HOURS,
        UsagePattern::Mixed => MIXED_BATTERY_HOURS,
    };
    let kwh = (system_size_kw.max(0.0) * hours).ceil() as u32;
    if kwh == 0 {
        BatteryStorage::GridTie
    } else {
        BatteryStorage::Lithium { kwh }
    }
}

/// Every field is rounded once, from unrounded values, so
/// `total_cost` can differ from `system_cost + installation_cost` by one unit.
pub fn compute_costs(system_size_kw: f64, battery_kwh: u32, location_tier: LocationTier) -> CostBreakdown {
    let mut system_cost = system_size_kw * COST_PER_KW;
    if battery_kwh > 0 {
        system_cost += battery_kwh as f64 * BATTERY_COST_PER_KWH;
    }
    let installation_cost = system_cost * INSTALLATION_SHARE;
    let multiplier = location_multiplier(location_tier);

    CostBreakdown {
        system_cost: (system_cost * multiplier).round() as i64,
        installation_cost: (installation_cost * multiplier).round() as i64,
        total_cost: ((system_cost + installation_cost) * multiplier).round() as i64,
    }
}

pub fn compute_financials(
    system_size_kw: f64,
    monthly_bill: f64,
    inverter: InverterClass,
    battery: BatteryStorage,
) -> Financials {
    let monthly_production_kwh = system_size_kw * MONTHLY_YIELD_KWH_PER_KW;
    let monthly_savings = (monthly_production_kwh * RATE_PER_KWH).min(monthly_bill);

    let mut component_list = vec![
        format!(
            "{} x {}W Monocrystalline Solar Panels",
            compute_panel_count(system_size_kw),
            PANEL_WATTAGE_W
        ),
        inverter.label().to_string(),
        "Mounting Structure and Hardware".to_string(),
        "DC & AC Protection Devices".to_string(),
        "Cabling and Connection Accessories".to_string(),
    ];
    if battery.is_present() {
        component_list.push(battery.label());
        component_list.push("Hybrid Inverter Upgrade".to_string());
    }

    Financials {
        monthly_production_kwh,
        monthly_savings,
        component_list,
    }
}

pub fn compute_payback(total_cost: i64, monthly_savings: f64) -> PaybackPeriod {
    let yearly_savings = monthly_savings * 12.0;
    if yearly_savings <= 0.0 {
        return PaybackPeriod::NotApplicable;
    }
    PaybackPeriod::Years(round_to(total_cost as f64 / yearly_savings, 1))
}

/// Main entry point. Fails before computing anything when the input is out
/// of domain, so a partial quotation is never produced.
pub fn generate_quotation(input: &QuotationInput) -> Result<QuotationResult, QuotationError> {
    input.validate()?;

    // ── 1. Size ──────────────────────────────────────────────
    let system_size_kw = compute_system_size(input.monthly_bill, input.roof_area, input.property_type)?;

    // ── 2. Equipment ─────────────────────────────────────────
    let panel_count = compute_panel_count(system_size_kw);
    let inverter_class = determine_inverter_class(system_size_kw);
    let battery = determine_battery_storage(input.usage_pattern, system_size_kw);

    // ── 3. Costs ─────────────────────────────────────────────
    let costs = compute_costs(system_size_kw, battery.kwh(), input.location_tier);

    // ── 4. Financials ────────────────────────────────────────
    let financials = compute_financials(system_size_kw, input.monthly_bill, inverter_class, battery);

    // ── 5. Payback ───────────────────────────────────────────
    let payback_years = compute_payback(costs.total_cost, financials.monthly_savings);

    Ok(QuotationResult {
        system_size_kw,
        panel_count,
        inverter_class,
        battery_storage: battery.label(),
        battery_storage_kwh: battery.kwh(),
        monthly_production_kwh: financials.monthly_production_kwh,
        system_cost: costs.system_cost,
        installation_cost: costs.installation_cost,
        total_cost: costs.total_cost,
        monthly_savings: financials.monthly_savings,
        payback_years,
        component_list: financials.component_list,
    })
}

pub fn pricing_constants() -> PricingConstants {
    PricingConstants {
        rate_per_kwh: RATE_PER_KWH,
        peak_sun_hours: PEAK_SUN_HOURS,
        area_per_kw: AREA_PER_KW,
        panel_wattage_w: PANEL_WATTAGE_W,
        cost_per_kw: COST_PER_KW,
        battery_cost_per_kwh: BATTERY_COST_PER_KWH,
        installation_share: INSTALLATION_SHARE,
        western_multiplier: location_multiplier(LocationTier::Western),
        other_multiplier: location_multiplier(LocationTier::Other),
        monthly_yield_kwh_per_kw: MONTHLY_YIELD_KWH_PER_KW,
    }
}
