use serde::{Deserialize, Serialize};

/// CO2 emitted per kWh of gas burned, in kg.
pub const GAS_CO2_KG_PER_KWH: f64 = 0.184;

/// An energy carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    Electricity,
    Heat,
    Gas,
}

impl Carrier {
    /// Emission factor for primary energy of this carrier, kg CO2 per kWh.
    ///
    /// Only gas emits on site; grid electricity is costed, not carbon
    /// accounted, matching the campus model.
    #[must_use]
    pub const fn co2_kg_per_kwh(self) -> f64 {
        match self {
            Self::Gas => GAS_CO2_KG_PER_KWH,
            Self::Electricity | Self::Heat => 0.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Heat => "heat",
            Self::Gas => "gas",
        }
    }

    /// Parse a canonical carrier name (case-insensitive).
    #[must_use]
    pub fn from_str_opt(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "electricity" | "elec" => Some(Self::Electricity),
            "heat" => Some(Self::Heat),
            "gas" => Some(Self::Gas),
            _ => None,
        }
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
