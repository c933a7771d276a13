//! Keyword classifier: stateless scoring of an article's title + description.
//!
//! Every check works on `format!("{title} {description}")` lower-cased and
//! uses plain substring containment. There is no tokenizer and no stemming,
//! so "now" also matches inside "known" and "eth" inside "ethereum". Scores
//! must stay reproducible across runs, so keep it that way.
//!
//! Tiered scorers walk their keyword tiers from the highest score down and
//! return the score of the first tier with any hit.

use serde::{Deserialize, Serialize};

/// Coin names, tickers and domain jargon that make an article crypto-relevant.
pub const CRYPTO_KEYWORDS: &[&str] = &[
    "bitcoin",
    "btc",
    "ethereum",
    "eth",
    "crypto",
    "cryptocurrency",
    "blockchain",
    "defi",
    "nft",
    "altcoin",
    "solana",
    "cardano",
    "polkadot",
    "chainlink",
    "dogecoin",
    "shiba",
    "matic",
    "polygon",
    "binance",
    "coinbase",
    "trading",
    "hodl",
    "mining",
    "staking",
    "web3",
    "metaverse",
    "dao",
    "yield",
    "liquidity",
    "dex",
    "cefi",
];

/// Regulatory, legal and security-breach terms, plus protocol-level events.
const IMPACT_HIGH: &[&str] = &[
    "sec",
    "regulation",
    "ban",
    "approval",
    "etf",
    "lawsuit",
    "hack",
    "exploit",
    "breach",
    "shutdown",
    "halving",
    "merge",
];

/// Institutional adoption.
const IMPACT_MEDIUM_HIGH: &[&str] = &[
    "blackrock",
    "fidelity",
    "institutional",
    "adoption",
    "partnership",
    "integration",
    "upgrade",
    "fork",
];

/// Exchanges and trading activity.
const IMPACT_MEDIUM: &[&str] = &[
    "binance",
    "coinbase",
    "exchange",
    "trading",
    "volume",
    "price",
    "market cap",
    "whale",
];

const MARKET_IMPACT_TIERS: &[(u8, &[&str])] = &[
    (5, IMPACT_HIGH),
    (4, IMPACT_MEDIUM_HIGH),
    (3, IMPACT_MEDIUM),
];

const RELEVANCE_TIERS: &[(u8, &[&str])] = &[
    (
        5,
        &[
            "bitcoin",
            "btc",
            "ethereum",
            "eth",
            "crypto market",
            "cryptocurrency market",
        ],
    ),
    (4, &["solana", "cardano", "polkadot", "xrp", "chainlink"]),
    (3, &["avalanche", "polygon", "matic", "arbitrum", "optimism"]),
];

const URGENCY_TIERS: &[(u8, &[&str])] = &[
    (5, &["breaking", "just in", "alert", "emergency", "now"]),
    (4, &["today", "announced", "hours ago", "this morning"]),
    (3, &["this week", "upcoming", "soon", "scheduled"]),
];

/// Score used when no tier matches.
const TIER_FALLBACK: u8 = 2;

pub const BULLISH_WORDS: &[&str] = &[
    "surge",
    "rally",
    "bull",
    "gain",
    "rise",
    "up",
    "high",
    "moon",
    "breakthrough",
    "adoption",
    "partnership",
    "launch",
    "upgrade",
    "soar",
    "jump",
    "spike",
    "boom",
    "success",
];

pub const BEARISH_WORDS: &[&str] = &[
    "crash",
    "dump",
    "bear",
    "fall",
    "drop",
    "down",
    "low",
    "hack",
    "ban",
    "regulation",
    "concern",
    "warning",
    "risk",
    "decline",
    "plunge",
    "collapse",
    "fail",
    "scam",
    "fraud",
];

const SENTIMENT_BOUND: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl SentimentLabel {
    fn from_score(score: i32) -> Self {
        match score.signum() {
            1 => Self::Bullish,
            -1 => Self::Bearish,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }

    /// Display colour name: green / red / yellow.
    pub fn color(self) -> &'static str {
        match self {
            Self::Bullish => "green",
            Self::Bearish => "red",
            Self::Neutral => "yellow",
        }
    }

    /// Same colour as an RGB integer (Discord embed colour).
    pub fn rgb(self) -> u32 {
        match self {
            Self::Bullish => 0x00ff00,
            Self::Bearish => 0xff0000,
            Self::Neutral => 0xffff00,
        }
    }
}

/// Signed sentiment in [-5, 5] plus its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: i32,
    pub label: SentimentLabel,
}

impl Sentiment {
    pub fn from_score(score: i32) -> Self {
        let score = score.clamp(-SENTIMENT_BOUND, SENTIMENT_BOUND);
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }

    pub fn color(&self) -> &'static str {
        self.label.color()
    }
}

fn haystack(title: &str, description: &str) -> String {
    format!("{title} {description}").to_lowercase()
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn first_matching_tier(text: &str, tiers: &[(u8, &[&str])]) -> u8 {
    tiers
        .iter()
        .find(|(_, words)| contains_any(text, words))
        .map(|(score, _)| *score)
        .unwrap_or(TIER_FALLBACK)
}

/// Number of distinct list words present in `text`.
fn count_present(text: &str, words: &[&str]) -> i32 {
    words.iter().filter(|w| text.contains(*w)).count() as i32
}

pub fn is_crypto_relevant(title: &str, description: &str) -> bool {
    contains_any(&haystack(title, description), CRYPTO_KEYWORDS)
}

/// 5 = regulatory/legal/security, 4 = institutional, 3 = exchange/volume, else 2.
pub fn market_impact(title: &str, description: &str) -> u8 {
    first_matching_tier(&haystack(title, description), MARKET_IMPACT_TIERS)
}

/// 5 = BTC/ETH/market-wide, 4 = major alts, 3 = popular alts, else 2.
pub fn relevance(title: &str, description: &str) -> u8 {
    first_matching_tier(&haystack(title, description), RELEVANCE_TIERS)
}

/// 5 = breaking, 4 = today/announced, 3 = this week/upcoming, else 2.
pub fn time_urgency(title: &str, description: &str) -> u8 {
    first_matching_tier(&haystack(title, description), URGENCY_TIERS)
}

/// Bullish minus bearish word count, clamped to [-5, 5].
///
/// Each list word counts once no matter how often it appears.
pub fn sentiment(title: &str, description: &str) -> Sentiment {
    let text = haystack(title, description);
    let raw = count_present(&text, BULLISH_WORDS) - count_present(&text, BEARISH_WORDS);
    Sentiment::from_score(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_relevance_is_case_insensitive_substring() {
        assert!(is_crypto_relevant("BITCOIN hits record", ""));
        assert!(is_crypto_relevant("Markets", "new DeFi protocol"));
        assert!(!is_crypto_relevant("Stocks close higher", "S&P 500 gains"));
    }

    #[test]
    fn crypto_relevance_checks_description_too() {
        assert!(is_crypto_relevant("Weekly markets", "staking rewards rise"));
    }

    #[test]
    fn market_impact_first_tier_wins() {
        // "etf" (5) and "coinbase" (3) both present: highest tier wins.
        assert_eq!(market_impact("Coinbase lists new ETF", ""), 5);
        assert_eq!(market_impact("BlackRock expands holdings", ""), 4);
        assert_eq!(market_impact("Whale moves coins", ""), 3);
        assert_eq!(market_impact("Community meetup", ""), 2);
    }

    #[test]
    fn relevance_tiers() {
        assert_eq!(relevance("Bitcoin steady", ""), 5);
        assert_eq!(relevance("Solana validators", ""), 4);
        assert_eq!(relevance("Arbitrum grants", ""), 3);
        assert_eq!(relevance("Kaspa miners", ""), 2);
    }

    #[test]
    fn urgency_tiers() {
        assert_eq!(time_urgency("BREAKING: exchange halts", ""), 5);
        assert_eq!(time_urgency("Upgrade announced", ""), 4);
        assert_eq!(time_urgency("Vote scheduled", ""), 3);
        assert_eq!(time_urgency("Analysis of fees", ""), 2);
    }

    #[test]
    fn urgency_keeps_substring_semantics() {
        // "known" contains "now".
        assert_eq!(time_urgency("Little known token", ""), 5);
    }

    #[test]
    fn sentiment_counts_distinct_words() {
        let s = sentiment("Rally rally rally", "surge");
        assert_eq!(s.score, 2);
        assert_eq!(s.label, SentimentLabel::Bullish);
        assert_eq!(s.color(), "green");
    }

    #[test]
    fn sentiment_negative_and_neutral() {
        let s = sentiment("Exchange hack sparks crash", "");
        assert_eq!(s.score, -2);
        assert_eq!(s.label, SentimentLabel::Bearish);

        let n = sentiment("Quiet session", "");
        assert_eq!(n.score, 0);
        assert_eq!(n.label, SentimentLabel::Neutral);
        assert_eq!(n.color(), "yellow");
    }

    #[test]
    fn sentiment_is_clamped() {
        let s = sentiment(
            "crash dump bear fall drop",
            "hack ban regulation concern warning risk",
        );
        assert_eq!(s.score, -5);
    }

    #[test]
    fn scores_stay_in_range_for_arbitrary_text() {
        let samples = [
            "",
            "now today this week",
            "sec etf bitcoin breaking surge rally",
            "ünïcödé ₿ Ξ",
            "crash crash crash dump",
        ];
        for t in samples {
            for s in [market_impact(t, t), relevance(t, t), time_urgency(t, t)] {
                assert!((1..=5).contains(&s), "{t}: {s}");
            }
            assert!((-5..=5).contains(&sentiment(t, t).score));
        }
    }
}
