//! Recommendation synthesizer.

use crate::domain::{CategoryScore, Priority, Recommendation, RiskLevel};

const URGENT: Recommendation = Recommendation {
    priority: Priority::Urgent,
    text: "Consider consulting a healthcare professional soon",
    icon: "🏥",
};

const NO_CONCERNS: Recommendation = Recommendation {
    priority: Priority::Low,
    text: "No specific concerns detected. Maintain healthy habits.",
    icon: "✅",
};

/// Category-specific entries, in the order they are emitted.
const CATEGORY_ADVICE: [(&str, Recommendation); 6] = [
    (
        "respiratory",
        Recommendation {
            priority: Priority::Moderate,
            text: "Monitor breathing and oxygen levels. Stay hydrated.",
            icon: "🫁",
        },
    ),
    (
        "cardiac",
        Recommendation {
            priority: Priority::High,
            text: "Track heart rate patterns. Avoid strenuous activity.",
            icon: "❤️",
        },
    ),
    (
        "neurological",
        Recommendation {
            priority: Priority::Moderate,
            text: "Get adequate rest. Monitor for recurring symptoms.",
            icon: "🧠",
        },
    ),
    (
        "mental_health",
        Recommendation {
            priority: Priority::Moderate,
            text: "Practice relaxation techniques. Consider talking to someone.",
            icon: "🧘",
        },
    ),
    (
        "infectious",
        Recommendation {
            priority: Priority::Moderate,
            text: "Track your temperature and rest. Limit contact with others.",
            icon: "🌡️",
        },
    ),
    (
        "oncology",
        Recommendation {
            priority: Priority::High,
            text: "Schedule a screening to rule out serious causes.",
            icon: "🔬",
        },
    ),
];

/// Build the ordered recommendation list. Never empty.
///
/// Category entries follow a fixed order, independent of how the categories
/// ranked.
#[must_use]
pub fn synthesize(matched: &[CategoryScore], risk: RiskLevel) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if risk == RiskLevel::High {
        out.push(URGENT);
    }

    out.extend(
        CATEGORY_ADVICE
            .iter()
            .filter(|(name, _)| matched.iter().any(|c| c.category == *name))
            .map(|(_, rec)| rec.clone()),
    );

    if out.is_empty() {
        out.push(NO_CONCERNS);
    }
    out
}
