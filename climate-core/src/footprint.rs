//! Rough yearly personal carbon footprint.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Tonnes CO₂ per return flight.
const PER_FLIGHT: f64 = 0.5;
/// Tonnes CO₂ per km driven.
const PER_CAR_KM: f64 = 0.0002;
/// Tonnes CO₂ per unit of yearly electricity bill.
const PER_BILL_UNIT: f64 = 0.008;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    DailyMeat,
    Vegetarian,
    Vegan,
}

impl Diet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diet::DailyMeat => "Daily meat",
            Diet::Vegetarian => "Vegetarian",
            Diet::Vegan => "Vegan",
        }
    }

    pub const fn all() -> &'static [Diet] {
        &[Diet::DailyMeat, Diet::Vegetarian, Diet::Vegan]
    }

    fn tons(&self) -> f64 {
        match self {
            Diet::DailyMeat => 4.0,
            Diet::Vegetarian => 2.0,
            Diet::Vegan => 1.0,
        }
    }
}

impl std::fmt::Display for Diet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Diet {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase().replace(['-', '_'], " ");

        match lower.as_str() {
            "daily meat" | "meat" => Ok(Diet::DailyMeat),
            "vegetarian" => Ok(Diet::Vegetarian),
            "vegan" => Ok(Diet::Vegan),
            _ => Err(anyhow!(
                "Unknown diet '{value}'. Supported diets: daily-meat, vegetarian, vegan."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintInput {
    pub flights: u32,
    pub car_km: f64,
    pub diet: Diet,
    pub electricity_bill: f64,
}

impl Default for FootprintInput {
    fn default() -> Self {
        Self {
            flights: 2,
            car_km: 10_000.0,
            diet: Diet::DailyMeat,
            electricity_bill: 1_500.0,
        }
    }
}

impl FootprintInput {
    pub fn estimate_tons(&self) -> f64 {
        f64::from(self.flights) * PER_FLIGHT
            + self.car_km * PER_CAR_KM
            + self.diet.tons()
            + self.electricity_bill * PER_BILL_UNIT
    }
}
