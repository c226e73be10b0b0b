//! Customer record and body measurements.
//!
//! # Invariants
//! - `id` is assigned by the store on first insert and never changes.
//! - Measurements are independent of each other; there is no cross-field
//!   rule except the `balance = price - deposit` convenience, which is
//!   computed by the edit projection and never by the store.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type CustomerId = i64;

/// Id carried by a customer that has not been inserted yet.
pub const UNASSIGNED_ID: CustomerId = 0;

/// Width of the zero-padded phone rendering used by list rows.
pub const PHONE_DISPLAY_WIDTH: usize = 11;

/// One persisted customer row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: i64,
    pub price: f64,
    pub deposit: f64,
    /// Display convenience; not recomputed on read.
    pub balance: f64,
    pub address: String,
    #[serde(flatten)]
    pub measurements: Measurements,
}

impl Customer {
    /// Creates an unsaved customer with zeroed figures and measurements.
    pub fn new(name: impl Into<String>, phone: i64) -> Self {
        Self {
            name: name.into(),
            phone,
            ..Self::default()
        }
    }

    /// Phone number as shown in list rows, e.g. `08032458214`.
    pub fn phone_display(&self) -> String {
        format!("{:0width$}", self.phone, width = PHONE_DISPLAY_WIDTH)
    }
}

/// Names one body measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Shoulder,
    Bust,
    UnderBust,
    RoundUnderBust,
    Armhole,
    HalfLength,
    SleeveLength,
    RoundSleeve,
    Hip,
    HipLine,
    KneeLength,
    NeckDepth,
    NeckWidth,
    NippleToNipple,
    ShoulderToNipple,
    SlimWaist,
    TopLength,
    SkirtLength,
    TrouserLength,
    ShortLength,
    LongLength,
    Flap,
}

impl Measurement {
    /// Every measurement in form order.
    pub const ALL: [Measurement; 22] = [
        Measurement::Shoulder,
        Measurement::Bust,
        Measurement::UnderBust,
        Measurement::RoundUnderBust,
        Measurement::Armhole,
        Measurement::HalfLength,
        Measurement::SleeveLength,
        Measurement::RoundSleeve,
        Measurement::Hip,
        Measurement::HipLine,
        Measurement::KneeLength,
        Measurement::NeckDepth,
        Measurement::NeckWidth,
        Measurement::NippleToNipple,
        Measurement::ShoulderToNipple,
        Measurement::SlimWaist,
        Measurement::TopLength,
        Measurement::SkirtLength,
        Measurement::TrouserLength,
        Measurement::ShortLength,
        Measurement::LongLength,
        Measurement::Flap,
    ];

    /// Column name in the `customers` table (also the serde field name).
    pub fn column(self) -> &'static str {
        match self {
            Self::Shoulder => "shoulder",
            Self::Bust => "bust",
            Self::UnderBust => "under_bust",
            Self::RoundUnderBust => "round_under_bust",
            Self::Armhole => "armhole",
            Self::HalfLength => "half_length",
            Self::SleeveLength => "sleeve_length",
            Self::RoundSleeve => "round_sleeve",
            Self::Hip => "hip",
            Self::HipLine => "hip_line",
            Self::KneeLength => "knee_length",
            Self::NeckDepth => "neck_depth",
            Self::NeckWidth => "neck_width",
            Self::NippleToNipple => "nipple_to_nipple",
            Self::ShoulderToNipple => "shoulder_to_nipple",
            Self::SlimWaist => "slim_waist",
            Self::TopLength => "top_length",
            Self::SkirtLength => "skirt_length",
            Self::TrouserLength => "trouser_length",
            Self::ShortLength => "short_length",
            Self::LongLength => "long_length",
            Self::Flap => "flap",
        }
    }

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shoulder => "Shoulder",
            Self::Bust => "Bust",
            Self::UnderBust => "Under bust",
            Self::RoundUnderBust => "Round under bust",
            Self::Armhole => "Armhole",
            Self::HalfLength => "Half length",
            Self::SleeveLength => "Sleeve length",
            Self::RoundSleeve => "Round sleeve",
            Self::Hip => "Hip",
            Self::HipLine => "Hip line",
            Self::KneeLength => "Knee length",
            Self::NeckDepth => "Neck depth",
            Self::NeckWidth => "Neck width",
            Self::NippleToNipple => "Nipple to nipple",
            Self::ShoulderToNipple => "Shoulder to nipple",
            Self::SlimWaist => "Slim waist",
            Self::TopLength => "Top length",
            Self::SkirtLength => "Skirt length",
            Self::TrouserLength => "Trouser length",
            Self::ShortLength => "Short length",
            Self::LongLength => "Long length",
            Self::Flap => "Flap",
        }
    }
}

/// Body measurements, all defaulting to `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub shoulder: f64,
    pub bust: f64,
    pub under_bust: f64,
    pub round_under_bust: f64,
    pub armhole: f64,
    pub half_length: f64,
    pub sleeve_length: f64,
    pub round_sleeve: f64,
    pub hip: f64,
    pub hip_line: f64,
    pub knee_length: f64,
    pub neck_depth: f64,
    pub neck_width: f64,
    pub nipple_to_nipple: f64,
    pub shoulder_to_nipple: f64,
    pub slim_waist: f64,
    pub top_length: f64,
    pub skirt_length: f64,
    pub trouser_length: f64,
    pub short_length: f64,
    pub long_length: f64,
    pub flap: f64,
}

impl Measurements {
    pub fn get(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::Shoulder => self.shoulder,
            Measurement::Bust => self.bust,
            Measurement::UnderBust => self.under_bust,
            Measurement::RoundUnderBust => self.round_under_bust,
            Measurement::Armhole => self.armhole,
            Measurement::HalfLength => self.half_length,
            Measurement::SleeveLength => self.sleeve_length,
            Measurement::RoundSleeve => self.round_sleeve,
            Measurement::Hip => self.hip,
            Measurement::HipLine => self.hip_line,
            Measurement::KneeLength => self.knee_length,
            Measurement::NeckDepth => self.neck_depth,
            Measurement::NeckWidth => self.neck_width,
            Measurement::NippleToNipple => self.nipple_to_nipple,
            Measurement::ShoulderToNipple => self.shoulder_to_nipple,
            Measurement::SlimWaist => self.slim_waist,
            Measurement::TopLength => self.top_length,
            Measurement::SkirtLength => self.skirt_length,
            Measurement::TrouserLength => self.trouser_length,
            Measurement::ShortLength => self.short_length,
            Measurement::LongLength => self.long_length,
            Measurement::Flap => self.flap,
        }
    }

    pub fn get_mut(&mut self, measurement: Measurement) -> &mut f64 {
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

    pub fn set(&mut self, measurement: Measurement, value: f64) {
        *self.get_mut(measurement) = value;
    }
}

#[cfg(test)]
mod tests {
    use super::{Customer, Measurement, Measurements};
    use std::collections::HashSet;

    #[test]
    fn phone_display_pads_to_eleven_digits() {
        let customer = Customer::new("Apples", 8_032_458_214);
        assert_eq!(customer.phone_display(), "08032458214");
        assert_eq!(Customer::new("Zero", 0).phone_display(), "00000000000");
    }

    #[test]
    fn measurement_columns_are_unique() {
        let columns: HashSet<&str> = Measurement::ALL.iter().map(|m| m.column()).collect();
        assert_eq!(columns.len(), Measurement::ALL.len());
    }

    #[test]
    fn measurements_set_and_get_address_the_same_field() {
        let mut measurements = Measurements::default();
        for (index, measurement) in Measurement::ALL.into_iter().enumerate() {
            measurements.set(measurement, index as f64 + 0.5);
        }
        assert_eq!(measurements.shoulder, 0.5);
        assert_eq!(measurements.flap, 21.5);
        assert_eq!(measurements.get(Measurement::HipLine), 9.5);
        for (index, measurement) in Measurement::ALL.into_iter().enumerate() {
            assert_eq!(measurements.get(measurement), index as f64 + 0.5);
        }
    }

    #[test]
    fn labels_are_present_for_every_measurement() {
        assert!(Measurement::ALL.iter().all(|m| !m.label().is_empty()));
        assert_eq!(Measurement::NippleToNipple.label(), "Nipple to nipple");
    }

    #[test]
    fn serde_uses_flat_snake_case_fields() {
        let mut customer = Customer::new("Apples", 1);
        customer.measurements.under_bust = 31.5;

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["under_bust"], 31.5);
        assert!(json.get("measurements").is_none());

        let parsed: Customer = serde_json::from_str(
            r#"{"id":3,"name":"Guava","phone":0,"price":0.0,"deposit":0.0,
                "balance":0.0,"address":"","flap":2.0}"#,
        )
        .unwrap();
        assert_eq!(parsed.measurements.flap, 2.0);
        assert_eq!(parsed.measurements.hip, 0.0);
    }
}
