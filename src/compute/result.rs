use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Named amounts in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amounts(Vec<(String, f64)>);

impl Amounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of the finite, non-negative entries.
    pub fn total(&self) -> f64 {
        self.0
            .iter()
            .map(|(_, value)| *value)
            .filter(|value| value.is_finite() && *value >= 0.0)
            .sum()
    }
}

impl From<Vec<(String, f64)>> for Amounts {
    fn from(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }
}

impl Serialize for Amounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Amounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountsVisitor;

        impl<'de> Visitor<'de> for AmountsVisitor {
            type Value = Amounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping names to numbers")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    entries.push((name, value));
                }
                Ok(Amounts(entries))
            }
        }

        deserializer.deserialize_map(AmountsVisitor)
    }
}

/// Computed emissions as returned by the compute endpoint.
///
/// Field aliases accept the original backend's Portuguese keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    /// Total emissions in tonnes of CO₂e per year.
    #[serde(alias = "total_toneladas")]
    pub total_tonnes: f64,
    /// Trees needed to offset the total.
    #[serde(alias = "arvores")]
    pub trees: f64,
    /// Compensation provider name to price.
    #[serde(alias = "compensacoes")]
    pub compensation: Amounts,
    /// Emission category to kilograms of CO₂e.
    #[serde(alias = "categorias")]
    pub categories: Amounts,
}
