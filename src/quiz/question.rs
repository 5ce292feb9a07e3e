/// Weeks per year used to project weekly answers onto a yearly figure.
pub const ANNUALIZE_FACTOR: f64 = 52.0;

/// Answer key of the distance question, the one that carries a transport mode.
pub const DISTANCE_KEY: &str = "km";

/// One prompt of the quiz. Defined once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub icon: &'static str,
    pub prompt: &'static str,
    pub key: &'static str,
    pub annualize: bool,
}

impl Question {
    pub const fn new(
        icon: &'static str,
        prompt: &'static str,
        key: &'static str,
        annualize: bool,
    ) -> Self {
        Self {
            icon,
            prompt,
            key,
            annualize,
        }
    }

    pub fn is_distance(&self) -> bool {
        self.key == DISTANCE_KEY
    }

    /// Converts a raw answer into the value stored in the answer map.
    pub fn project(&self, raw: f64) -> f64 {
        if self.annualize {
            raw * ANNUALIZE_FACTOR
        } else {
            raw
        }
    }
}

/// The standard five-question lifestyle catalogue, in presentation order.
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::new(
            "💡",
            "How much electricity do you use per month (kWh)?",
            "energia",
            false,
        ),
        Question::new("🚗", "How many km do you travel per week?", DISTANCE_KEY, true),
        Question::new("🍖", "How many kg of meat do you eat per week?", "carne", true),
        Question::new(
            "✈️",
            "How many flight hours did you take this year?",
            "aviao",
            false,
        ),
        Question::new("🗑️", "How many kg of waste do you produce per week?", "lixo", true),
    ]
}
