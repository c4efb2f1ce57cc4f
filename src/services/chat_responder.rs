/// Canned-answer assistant for site visitors.
///
/// Each topic owns a keyword list; the topic with the most hits in the
/// lower-cased message answers, ties go to the topic listed first.
/// Deterministic, no network calls.

use crate::errors::QuotationError;
use crate::models::chat::ChatReply;

struct Topic {
    name: &'static str,
    keywords: &'static [&'static str],
    reply: &'static str,
    suggestions: &'static [&'static str],
}

const TOPICS: &[Topic] = &[
    Topic {
        name: "greeting",
        keywords: &["hello", "hi", "hey", "good morning", "good evening", "ayubowan"],
        reply: "Hello! I can help with solar system sizing, prices, batteries and installation. \
                What would you like to know?",
        suggestions: &["How much does a system cost?", "Do I need a battery?"],
    },
    Topic {
        name: "pricing",
        keywords: &["price", "cost", "how much", "quote", "quotation", "expensive", "budget", "estimate"],
        reply: "Panels and inverter are priced at about 150,000 per installed kW, plus 15% for \
                installation. Outside the Western Province a 10% logistics surcharge applies. \
                Use the quotation form with your monthly bill and roof area for an exact figure.",
        suggestions: &["Get a quotation", "How long is the payback?"],
    },
    Topic {
        name: "battery",
        keywords: &["battery", "batteries", "storage", "backup", "night", "evening", "power cut", "outage"],
        reply: "If you use most of your power in the evening we size lithium storage at about 5 kWh \
                per installed kW, for mixed usage about 3 kWh per kW. Daytime users usually go \
                grid-tie without a battery.",
        suggestions: &["What is a grid-tie system?", "How much does a battery cost?"],
    },
    Topic {
        name: "installation",
        keywords: &["install", "installation", "roof", "mount", "how long", "area", "space", "site visit"],
        reply: "Each kW needs roughly 100 units of free roof area. After a site visit installation \
                usually takes two to five working days depending on system size and roof type.",
        suggestions: &["Book a site visit", "Which roof types do you support?"],
    },
    Topic {
        name: "maintenance",
        keywords: &["maintenance", "clean", "cleaning", "service", "repair", "broken", "fault"],
        reply: "Panels need a cleaning every few months and an annual inspection of the inverter \
                and protection devices. Our maintenance team can schedule both for you.",
        suggestions: &["Request maintenance", "Contact support"],
    },
    Topic {
        name: "financing",
        keywords: &["loan", "finance", "financing", "installment", "installments", "lease", "payback", "savings", "save"],
        reply: "Most customers recover their investment through bill savings; the quotation shows \
                the expected payback period. Installment plans are available through partner banks.",
        suggestions: &["Get a quotation", "Contact sales"],
    },
    Topic {
        name: "warranty",
        keywords: &["warranty", "guarantee", "lifetime", "lifespan", "degrade", "years"],
        reply: "Panels carry a 25-year performance warranty, inverters 5 to 10 years depending on \
                the model, and our workmanship is guaranteed for 2 years.",
        suggestions: &["Request maintenance", "Get a quotation"],
    },
    Topic {
        name: "net_metering",
        keywords: &["net metering", "net plus", "net accounting", "grid", "export", "sell", "meter", "ceb"],
        reply: "Grid-tie systems export surplus energy to the utility. We handle the net metering \
                application and meter change as part of the installation.",
        suggestions: &["Do I need a battery?", "Get a quotation"],
    },
    Topic {
        name: "contact",
        keywords: &["contact", "phone", "call", "email", "address", "office", "visit", "talk"],
        reply: "You can reach our sales team through the inquiry form on this site; an agent will \
                get back to you within one working day.",
        suggestions: &["Send an inquiry"],
    },
];

const FALLBACK_REPLY: &str = "I'm not sure about that one. Try the quotation form for system \
                              sizing and pricing, or send us an inquiry and an agent will help.";
const FALLBACK_SUGGESTIONS: &[&str] = &["Get a quotation", "Send an inquiry"];

/// Whole-word match for single words, substring match for phrases.
fn hits(message: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        message.contains(keyword)
    } else {
        words.iter().any(|w| *w == keyword)
    }
}

pub fn respond(message: &str) -> Result<ChatReply, QuotationError> {
    let normalized = message.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(QuotationError::invalid("message must not be empty"));
    }
    let words: Vec<&str> = normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let best = TOPICS
        .iter()
        .map(|t| {
            let score = t.keywords.iter().filter(|k| hits(&normalized, &words, k)).count();
            (t, score)
        })
        .filter(|(_, score)| *score > 0)
        .fold(None::<(&Topic, usize)>, |best, (t, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((t, score)),
        });

    Ok(match best {
        Some((topic, _)) => ChatReply {
            topic: topic.name.to_string(),
            reply: topic.reply.to_string(),
            suggestions: topic.suggestions.iter().map(|s| s.to_string()).collect(),
        },
        None => ChatReply {
            topic: "fallback".to_string(),
            reply: FALLBACK_REPLY.to_string(),
            suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        },
    })
}
