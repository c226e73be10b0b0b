//! Editable text projection of a [`Customer`].
//!
//! # Invariants
//! - Every numeric field is held as text so partial input never fails.
//! - Converting back never fails: unparsable or non-finite decimals become
//!   `0.0`, an unparsable phone becomes `0`.
//! - Decimals are rendered with two fractional digits, so a round trip keeps
//!   values exact to two decimals and rounds anything finer.

use crate::model::customer::{Customer, CustomerId, Measurement, Measurements};

/// Text inputs for every body measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementInputs {
    pub shoulder: String,
    pub bust: String,
    pub under_bust: String,
    pub round_under_bust: String,
    pub armhole: String,
    pub half_length: String,
    pub sleeve_length: String,
    pub round_sleeve: String,
    pub hip: String,
    pub hip_line: String,
    pub knee_length: String,
    pub neck_depth: String,
    pub neck_width: String,
    pub nipple_to_nipple: String,
    pub shoulder_to_nipple: String,
    pub slim_waist: String,
    pub top_length: String,
    pub skirt_length: String,
    pub trouser_length: String,
    pub short_length: String,
    pub long_length: String,
    pub flap: String,
}

impl MeasurementInputs {
    pub fn get(&self, measurement: Measurement) -> &str {
        match measurement {
            Measurement::Shoulder => &self.shoulder,
            Measurement::Bust => &self.bust,
            Measurement::UnderBust => &self.under_bust,
            Measurement::RoundUnderBust => &self.round_under_bust,
            Measurement::Armhole => &self.armhole,
            Measurement::HalfLength => &self.half_length,
            Measurement::SleeveLength => &self.sleeve_length,
            Measurement::RoundSleeve => &self.round_sleeve,
            Measurement::Hip => &self.hip,
            Measurement::HipLine => &self.hip_line,
            Measurement::KneeLength => &self.knee_length,
            Measurement::NeckDepth => &self.neck_depth,
            Measurement::NeckWidth => &self.neck_width,
            Measurement::NippleToNipple => &self.nipple_to_nipple,
            Measurement::ShoulderToNipple => &self.shoulder_to_nipple,
            Measurement::SlimWaist => &self.slim_waist,
            Measurement::TopLength => &self.top_length,
            Measurement::SkirtLength => &self.skirt_length,
            Measurement::TrouserLength => &self.trouser_length,
            Measurement::ShortLength => &self.short_length,
            Measurement::LongLength => &self.long_length,
            Measurement::Flap => &self.flap,
        }
    }

    pub fn get_mut(&mut self, measurement: Measurement) -> &mut String {
        match measurement {
            Measurement::Shoulder => &mut self.shoulder,
            Measurement::Bust => &mut self.bust,
            Measurement::UnderBust => &mut self.under_bust,
            Measurement::RoundUnderBust => &mut self.round_under_bust,
            Measurement::Armhole => &mut self.armhole,
            Measurement::HalfLength => &mut self.half_length,
            Measurement::SleeveLength => &mut self.sleeve_length,
            Measurement::RoundSleeve => &mut self.round_sleeve,
            Measurement::Hip => &mut self.hip,
            Measurement::HipLine => &mut self.hip_line,
            Measurement::KneeLength => &mut self.knee_length,
            Measurement::NeckDepth => &mut self.neck_depth,
            Measurement::NeckWidth => &mut self.neck_width,
            Measurement::NippleToNipple => &mut self.nipple_to_nipple,
            Measurement::ShoulderToNipple => &mut self.shoulder_to_nipple,
            Measurement::SlimWaist => &mut self.slim_waist,
            Measurement::TopLength => &mut self.top_length,
            Measurement::SkirtLength => &mut self.skirt_length,
            Measurement::TrouserLength => &mut self.trouser_length,
            Measurement::ShortLength => &mut self.short_length,
            Measurement::LongLength => &mut self.long_length,
            Measurement::Flap => &mut self.flap,
        }
    }

    fn from_measurements(measurements: &Measurements) -> Self {
        let mut inputs = Self::default();
        for measurement in Measurement::ALL {
            *inputs.get_mut(measurement) = format_decimal(measurements.get(measurement));
        }
        inputs
    }

    fn to_measurements(&self) -> Measurements {
        let mut measurements = Measurements::default();
        for measurement in Measurement::ALL {
            measurements.set(measurement, parse_decimal(self.get(measurement)));
        }
        measurements
    }
}

/// Per-field text mirror of a customer plus the "save allowed" flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUiState {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub price: String,
    pub deposit: String,
    pub balance: String,
    pub address: String,
    pub measurements: MeasurementInputs,
    pub action_enabled: bool,
}

impl CustomerUiState {
    /// Projects a stored customer for display or editing.
    pub fn from_customer(customer: &Customer, action_enabled: bool) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            phone: customer.phone_display(),
            price: format_decimal(customer.price),
            deposit: format_decimal(customer.deposit),
            balance: format_decimal(customer.balance),
            address: customer.address.clone(),
            measurements: MeasurementInputs::from_measurements(&customer.measurements),
            action_enabled,
        }
    }

    /// Converts the text fields back into a record, coercing bad numbers to zero.
    pub fn to_customer(&self) -> Customer {
        Customer {
            id: self.id,
            name: self.name.clone(),
            phone: parse_phone(&self.phone),
            price: parse_decimal(&self.price),
            deposit: parse_decimal(&self.deposit),
            balance: parse_decimal(&self.balance),
            address: self.address.clone(),
            measurements: self.measurements.to_measurements(),
        }
    }

    /// The only validation rule: the name must not be blank.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Sets the price and recomputes the balance.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self.recompute_balance();
        self
    }

    /// Sets the deposit and recomputes the balance.
    pub fn with_deposit(mut self, deposit: impl Into<String>) -> Self {
        self.deposit = deposit.into();
        self.recompute_balance();
        self
    }

    pub fn with_measurement(mut self, measurement: Measurement, text: impl Into<String>) -> Self {
        *self.measurements.get_mut(measurement) = text.into();
        self
    }

    /// Copies every field left blank here from `seed`, keeping typed text.
    pub(crate) fn fill_blank_fields(&mut self, seed: &CustomerUiState) {
        let pairs = [
            (&mut self.name, &seed.name),
            (&mut self.phone, &seed.phone),
            (&mut self.price, &seed.price),
            (&mut self.deposit, &seed.deposit),
            (&mut self.balance, &seed.balance),
            (&mut self.address, &seed.address),
        ];
        for (field, seeded) in pairs {
            if field.is_empty() {
                field.clone_from(seeded);
            }
        }
        for measurement in Measurement::ALL {
            let field = self.measurements.get_mut(measurement);
            if field.is_empty() {
                *field = seed.measurements.get(measurement).to_string();
            }
        }
        self.action_enabled = self.is_valid();
    }

    fn recompute_balance(&mut self) {
        self.balance = format_decimal(parse_decimal(&self.price) - parse_decimal(&self.deposit));
    }
}

impl From<&Customer> for CustomerUiState {
    fn from(customer: &Customer) -> Self {
        Self::from_customer(customer, false)
    }
}

pub(crate) fn format_decimal(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn parse_decimal(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub(crate) fn parse_phone(text: &str) -> i64 {
    text.trim().parse::<i64>().unwrap_or(0)
}
