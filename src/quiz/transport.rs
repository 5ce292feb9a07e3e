use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use thiserror::Error;

/// Main means of transport selected alongside the distance answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransportMode {
    #[default]
    #[serde(rename = "car")]
    Car,
    #[serde(rename = "motorcycle")]
    Motorcycle,
    #[serde(rename = "bus")]
    Bus,
    #[serde(rename = "train")]
    Train,
    #[serde(rename = "bike")]
    Bicycle,
    #[serde(rename = "walking")]
    Walking,
}

impl TransportMode {
    pub const ALL: [TransportMode; 6] = [
        TransportMode::Car,
        TransportMode::Motorcycle,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Bicycle,
        TransportMode::Walking,
    ];

    /// Value sent to the compute endpoint.
    pub fn wire_value(self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Motorcycle => "motorcycle",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Bicycle => "bike",
            TransportMode::Walking => "walking",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Car => "Car",
            TransportMode::Motorcycle => "Motorcycle",
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Subway/Train",
            TransportMode::Bicycle => "Bicycle",
            TransportMode::Walking => "Walking",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TransportMode::Car => "🚙",
            TransportMode::Motorcycle => "🏍️",
            TransportMode::Bus => "🚌",
            TransportMode::Train => "🚆",
            TransportMode::Bicycle => "🚲",
            TransportMode::Walking => "🚶",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            TransportMode::Car => &["car", "carro"],
            TransportMode::Motorcycle => &["motorcycle", "moto", "motorbike"],
            TransportMode::Bus => &["bus", "onibus", "ônibus"],
            TransportMode::Train => &["train", "subway", "subway/train", "metro", "metrô"],
            TransportMode::Bicycle => &["bike", "bicycle", "bicicleta"],
            TransportMode::Walking => &["walking", "walk", "caminhada"],
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown transport `{input}`{}", suggestion_suffix(.suggestion))]
pub struct UnknownTransport {
    pub input: String,
    pub suggestion: Option<TransportMode>,
}

fn suggestion_suffix(suggestion: &Option<TransportMode>) -> String {
    suggestion
        .map(|mode| format!(" (did you mean `{}`?)", mode.wire_value()))
        .unwrap_or_default()
}

impl FromStr for TransportMode {
    type Err = UnknownTransport;

    /// Accepts a wire value, a label, a 1-based menu index or a known alias.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lowered = input.trim().to_lowercase();
        let normalized = lowered.as_str();

        if let Ok(index) = normalized.parse::<usize>() {
            if let Some(mode) = index.checked_sub(1).and_then(|i| Self::ALL.get(i)) {
                return Ok(*mode);
            }
        }

        for mode in Self::ALL {
            if mode.label().to_lowercase() == normalized || mode.aliases().contains(&normalized)
            {
                return Ok(mode);
            }
        }

        let suggestion = Self::ALL
            .iter()
            .flat_map(|mode| {
                mode.aliases()
                    .iter()
                    .map(move |alias| (levenshtein(alias, normalized), *mode))
            })
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, mode)| mode);

        Err(UnknownTransport {
            input: input.trim().to_string(),
            suggestion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_values_labels_indexes_and_aliases() {
        assert_eq!("bike".parse::<TransportMode>(), Ok(TransportMode::Bicycle));
        assert_eq!("Subway/Train".parse::<TransportMode>(), Ok(TransportMode::Train));
        assert_eq!("3".parse::<TransportMode>(), Ok(TransportMode::Bus));
        assert_eq!(" carro ".parse::<TransportMode>(), Ok(TransportMode::Car));
        assert_eq!("caminhada".parse::<TransportMode>(), Ok(TransportMode::Walking));
    }

    #[test]
    fn unknown_names_suggest_the_closest_mode() {
        let err = "bikke".parse::<TransportMode>().unwrap_err();
        assert_eq!(err.suggestion, Some(TransportMode::Bicycle));
        assert!(err.to_string().contains("did you mean `bike`"));

        let err = "7".parse::<TransportMode>().unwrap_err();
        assert_eq!(err.input, "7");
    }

    #[test]
    fn suggestions_compare_against_every_alias() {
        let err = " Ônibuss ".parse::<TransportMode>().unwrap_err();
        assert_eq!(err.input, "Ônibuss");
        assert_eq!(err.suggestion, Some(TransportMode::Bus));

        let err = "zzzzzzzzzz".parse::<TransportMode>().unwrap_err();
        assert_eq!(err.suggestion, None);
    }

    #[test]
    fn serializes_to_wire_value() {
        let json = serde_json::to_string(&TransportMode::Bicycle).unwrap();
        assert_eq!(json, "\"bike\"");
        assert_eq!(TransportMode::default(), TransportMode::Car);
    }
}
