use serde::{Deserialize, Serialize};

/// Lifestyle dimension scored by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TransportMode,
    VehicleDistance,
    Electricity,
    Diet,
    AirTravel,
    Waste,
    Recycling,
    DeviceUsage,
}

impl Category {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::TransportMode,
            Self::VehicleDistance,
            Self::Electricity,
            Self::Diet,
            Self::AirTravel,
            Self::Waste,
            Self::Recycling,
            Self::DeviceUsage,
        ]
    }

    /// Wire key used in request payloads and stored inputs.
    pub const fn key(self) -> &'static str {
        match self {
            Self::TransportMode => "transport_mode",
            Self::VehicleDistance => "vehicle_distance",
            Self::Electricity => "electricity",
            Self::Diet => "diet",
            Self::AirTravel => "air_travel",
            Self::Waste => "waste",
            Self::Recycling => "recycling",
            Self::DeviceUsage => "device_usage",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TransportMode => "Transport Mode",
            Self::VehicleDistance => "Vehicle Distance",
            Self::Electricity => "Electricity Usage",
            Self::Diet => "Diet Type",
            Self::AirTravel => "Air Travel",
            Self::Waste => "Waste Generation",
            Self::Recycling => "Recycling Habits",
            Self::DeviceUsage => "Device Usage",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.key() == key)
    }

    /// Permitted answers for the category paired with their weight.
    ///
    /// Recycling is the only category carrying a negative weight; it acts as a
    /// discount on the total rather than an emission.
    pub const fn weights(self) -> &'static [(&'static str, i32)] {
        match self {
            Self::TransportMode => &[("Car", 30), ("Public", 10), ("Bike", 2), ("EV", 8)],
            Self::VehicleDistance => &[("Low", 5), ("Medium", 15), ("High", 25)],
            Self::Electricity => &[("Low", 8), ("Medium", 15), ("High", 25)],
            Self::Diet => &[("Veg", 5), ("Mixed", 15), ("Non-Veg", 25)],
            Self::AirTravel => &[("Never", 0), ("Rare", 10), ("Frequent", 30)],
            Self::Waste => &[("Low", 5), ("Medium", 12), ("High", 20)],
            Self::Recycling => &[("Yes", -5), ("No", 0)],
            Self::DeviceUsage => &[("Low", 3), ("Medium", 8), ("High", 15)],
        }
    }

    /// Weight for an answer, `None` when the answer is not one of the category's values.
    pub fn weight(self, value: &str) -> Option<i32> {
        self.weights()
            .iter()
            .find(|(candidate, _)| *candidate == value)
            .map(|(_, weight)| *weight)
    }
}

/// Total lookup over raw request keys: unknown categories or values contribute zero.
pub fn category_score(key: &str, value: &str) -> i32 {
    Category::from_key(key)
        .and_then(|category| category.weight(value))
        .unwrap_or(0)
}

/// Display label for a raw key, falling back to the key itself.
pub fn display_label(key: &str) -> &str {
    match Category::from_key(key) {
        Some(category) => category.label(),
        None => key,
    }
}
