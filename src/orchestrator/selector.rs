use crate::errors::{AgentError, AgentResult};
use crate::registry::AgentTable;
use a2a_types::AgentCard;
use std::collections::HashSet;

const TAG_WEIGHT: usize = 2;
const EXAMPLE_WEIGHT: usize = 1;

/// Words too common to say anything about the query's domain.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "you", "your", "can", "what", "how", "with", "about", "this",
    "that", "from", "please", "me", "my", "is", "a", "an", "of", "to", "in", "on", "it", "i",
];

/// The delegate picked for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub agent_id: String,
    pub card: AgentCard,
    pub score: usize,
    /// True when nothing matched and the default agent was used.
    pub fallback: bool,
}

/// Keyword matcher over the registry's advertised skills.
///
/// A skill tag that appears among the query's words scores [`TAG_WEIGHT`];
/// every other query word found in a skill example scores [`EXAMPLE_WEIGHT`].
/// The highest score wins, ties going to the lowest agent id. With no hits
/// the default agent is used.
#[derive(Debug, Clone, Default)]
pub struct DelegateSelector {
    default_agent: Option<String>,
    exclude: HashSet<String>,
}

impl DelegateSelector {
    pub fn new(default_agent: Option<String>) -> Self {
        Self {
            default_agent,
            exclude: HashSet::new(),
        }
    }

    pub fn with_default_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.default_agent = Some(agent_id.into());
        self
    }

    /// Never select the agent registered under `agent_id` or named `agent_id`.
    pub fn excluding(mut self, agent_id: impl Into<String>) -> Self {
        self.exclude.insert(agent_id.into());
        self
    }

    pub fn select(&self, table: &AgentTable, query: &str) -> AgentResult<Selection> {
        let candidates: Vec<(&String, &AgentCard)> = table
            .iter()
            .filter(|(id, card)| !self.exclude.contains(*id) && !self.exclude.contains(&card.name))
            .collect();
        if candidates.is_empty() {
            return Err(AgentError::NoAgentsAvailable);
        }

        let words = tokenize(query);
        let mut best: Option<(&String, &AgentCard, usize)> = None;
        for &(id, card) in &candidates {
            let score = score_card(card, &words);
            if score > 0 && best.map_or(true, |(_, _, top)| score > top) {
                best = Some((id, card, score));
            }
        }

        if let Some((id, card, score)) = best {
            tracing::debug!(agent_id = %id, score, "selected delegate by keyword");
            return Ok(Selection {
                agent_id: id.clone(),
                card: card.clone(),
                score,
                fallback: false,
            });
        }

        let default = self
            .default_agent
            .as_deref()
            .ok_or(AgentError::NoMatchingAgent)?;
        let (id, card) = candidates
            .iter()
            .find(|(id, _)| id.as_str() == default)
            .or_else(|| candidates.iter().find(|(_, card)| card.name == default))
            .ok_or_else(|| AgentError::AgentNotFound {
                agent_id: default.to_string(),
            })?;

        tracing::debug!(agent_id = %id, "no keyword match, using default delegate");
        Ok(Selection {
            agent_id: (*id).clone(),
            card: (*card).clone(),
            score: 0,
            fallback: true,
        })
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .map(|word| word.trim_matches('-').to_lowercase())
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

fn score_card(card: &AgentCard, words: &HashSet<String>) -> usize {
    let mut tag_hits = HashSet::new();
    let mut example_words = HashSet::new();

    for skill in &card.skills {
        for tag in &skill.tags {
            let tag = tag.to_lowercase();
            if words.contains(&tag) {
                tag_hits.insert(tag);
            }
        }
        for example in &skill.examples {
            example_words.extend(tokenize(example));
        }
    }

    let example_hits = words
        .iter()
        .filter(|word| !tag_hits.contains(*word) && example_words.contains(*word))
        .count();

    tag_hits.len() * TAG_WEIGHT + example_hits * EXAMPLE_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AgentTable {
        let greeter = AgentCard::new("GreetingAgent", "greets", "1.0.0", "http://g/")
            .add_skill_with("greet", "Greet", |s| {
                s.add_tag("hello")
                    .add_tag("greeting")
                    .add_example("Say hello to my friend")
            });
        let moderator = AgentCard::new("ModeratorAgent", "moderates", "1.0.0", "http://m/")
            .add_skill_with("moderate", "Moderate", |s| {
                s.add_tag("feedback")
                    .add_tag("self-correct")
                    .add_example("Review the last screen transition")
            });
        let host = AgentCard::new("Orchestrator", "routes", "1.0.0", "http://o/")
            .add_skill_with("route", "Route", |s| s.add_tag("hello"));

        AgentTable::from([
            ("greeter".to_string(), greeter),
            ("moderator".to_string(), moderator),
            ("host".to_string(), host),
        ])
    }

    #[test]
    fn test_tag_match_wins() {
        let selector = DelegateSelector::new(Some("moderator".to_string())).excluding("host");
        let selection = selector.select(&table(), "Hello there!").unwrap();

        assert_eq!(selection.agent_id, "greeter");
        assert_eq!(selection.score, TAG_WEIGHT);
        assert!(!selection.fallback);
    }

    #[test]
    fn test_hyphenated_tag_and_example_words() {
        let selector = DelegateSelector::new(None).excluding("host");

        let selection = selector.select(&table(), "please self-correct").unwrap();
        assert_eq!(selection.agent_id, "moderator");

        let selection = selector.select(&table(), "review that transition").unwrap();
        assert_eq!(selection.agent_id, "moderator");
        assert_eq!(selection.score, 2 * EXAMPLE_WEIGHT);
    }

    #[test]
    fn test_falls_back_to_default_agent() {
        let selector = DelegateSelector::new(Some("ModeratorAgent".to_string())).excluding("host");
        let selection = selector.select(&table(), "something unrelated").unwrap();

        assert_eq!(selection.agent_id, "moderator");
        assert!(selection.fallback);
    }

    #[test]
    fn test_no_match_without_default() {
        let selector = DelegateSelector::new(None).excluding("host");
        let err = selector.select(&table(), "something unrelated").unwrap_err();
        assert!(matches!(err, AgentError::NoMatchingAgent));
    }

    #[test]
    fn test_default_missing_from_registry() {
        let selector = DelegateSelector::new(Some("weather".to_string()));
        let err = selector.select(&table(), "zzz").unwrap_err();
        assert!(matches!(err, AgentError::AgentNotFound { agent_id } if agent_id == "weather"));
    }

    #[test]
    fn test_empty_registry_is_routing_failure() {
        let selector = DelegateSelector::new(Some("greeter".to_string()));
        let err = selector.select(&AgentTable::new(), "hello").unwrap_err();
        assert!(matches!(err, AgentError::NoAgentsAvailable));

        // only ourselves registered
        let only_self = AgentTable::from([(
            "host".to_string(),
            AgentCard::new("Orchestrator", "", "1.0.0", "http://o/"),
        )]);
        let err = selector
            .clone()
            .excluding("Orchestrator")
            .select(&only_self, "hello")
            .unwrap_err();
        assert!(matches!(err, AgentError::NoAgentsAvailable));
    }

    #[test]
    fn test_tokenize_drops_stop_words() {
        let words = tokenize("What is the weather in Paris?");
        assert!(words.contains("weather"));
        assert!(words.contains("paris"));
        assert!(!words.contains("the"));
        assert!(!words.contains("is"));
    }
}
