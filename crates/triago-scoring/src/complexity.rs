// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic + embedding-anchor complexity scoring.
//!
//! The heuristic part combines query length, technical vocabulary density,
//! and question-type classification into a score in [0, 1] with zero cost
//! and zero latency. When anchor centroids are configured, a
//! nearest-centroid signal computed from the query embedding is blended in.

use std::sync::LazyLock;

use regex::Regex;
use triago_core::types::cosine_similarity;

/// Queries longer than this are truncated before analysis; heuristic
/// signals saturate long before this point.
const MAX_ANALYZED_CHARS: usize = 10_000;

/// Single-word technical vocabulary contributing to the technical score.
const TECHNICAL_TERMS: &[&str] = &[
    "api", "authentication", "authorization", "oauth", "jwt", "token", "endpoint",
    "microservices", "database", "sql", "nosql", "mongodb", "postgresql", "mysql",
    "docker", "kubernetes", "container", "deployment", "pipeline", "webhook", "rest",
    "graphql", "json", "xml", "yaml", "configuration", "middleware", "proxy", "gateway",
    "cache", "redis", "encryption", "ssl", "tls", "certificate", "security",
    "vulnerability", "throttling", "scaling", "performance", "optimization",
    "monitoring", "logging", "metrics", "analytics", "debugging", "error", "exception",
    "timeout", "latency", "throughput", "concurrent", "async", "synchronous", "queue",
    "kafka", "rabbitmq", "migration", "schema", "constraint", "index", "query",
    "transaction", "acid", "consistency", "availability", "distributed", "cluster",
    "node", "replica", "backup", "recovery",
];

/// Question-type classes ordered by matching precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    /// FAQ-style lookups: hours, pricing, password resets.
    SimpleFaq,
    /// Configuration, migration, architecture questions.
    Technical,
    /// Multi-stage procedures.
    MultiStep,
    /// Something is broken and needs diagnosing.
    Troubleshooting,
    /// Connecting external systems or APIs.
    Integration,
}

impl QueryClass {
    /// Complexity weight contributed by this question type.
    fn weight(self) -> f64 {
        match self {
            QueryClass::SimpleFaq => 0.0,
            QueryClass::Technical => 0.15,
            QueryClass::Troubleshooting => 0.2,
            QueryClass::MultiStep => 0.25,
            QueryClass::Integration => 0.3,
        }
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static pattern compiles"))
        .collect()
}

static SIMPLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^(what|where|when|who) (is|are|do|does|can|will)",
        r"^(can you|could you|please) (help|tell|show|explain)",
        r"(business hours|office location|contact|phone|email)",
        r"(reset password|forgot password|login|sign in)",
        r"(pricing|cost|price|fee|billing)",
        r"^(what|where|when|who|how).*(hours|location|contact|price|cost)",
    ])
});

static INTEGRATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(integrate|integration|integrating).*(api|system|service)",
        r"(connect|connecting).*(api|system|service)",
        r"(setup|configure).*(integration|api)",
    ])
});

static TROUBLESHOOTING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(trouble|problem|issue|error).*(with|in)",
        r"(troubleshoot|troubleshooting|debug|debugging)",
        r"(not working|doesn't work|broken|failed)",
        r"(fix|solve|resolve).*(problem|issue|error)",
    ])
});

static MULTI_STEP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(multiple|several|various|different).*(step|stage|phase|method)",
        r"(first.*then|step.*step|stage.*stage)",
        r"(configure.*and.*setup|setup.*and.*configure)",
    ])
});

static TECHNICAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(configure|configuration|setup|install)",
        r"(migrate|migration|upgrade|update)",
        r"(architecture|design|implement|implementation)",
        r"(custom|customization|customize)",
        r"(performance|optimization|scale|scaling)",
    ])
});

/// Deterministic complexity scorer with an optional embedding anchor signal.
pub struct ComplexityScorer {
    /// Weight of the anchor signal in the blended score. The heuristic
    /// carries `1 - embedding_weight`.
    embedding_weight: f64,
    simple_centroid: Option<Vec<f32>>,
    complex_centroid: Option<Vec<f32>>,
}

impl ComplexityScorer {
    /// Create a heuristic-only scorer.
    pub fn new() -> Self {
        Self {
            embedding_weight: 0.0,
            simple_centroid: None,
            complex_centroid: None,
        }
    }

    /// Create a scorer that will blend in the anchor signal with the given
    /// weight once anchors are set.
    pub fn with_embedding_weight(embedding_weight: f64) -> Self {
        Self {
            embedding_weight: embedding_weight.clamp(0.0, 1.0),
            simple_centroid: None,
            complex_centroid: None,
        }
    }

    /// Install reference anchor embeddings. Each side is collapsed into a
    /// single mean centroid; empty sides disable the anchor signal.
    pub fn set_anchors(&mut self, simple: &[Vec<f32>], complex: &[Vec<f32>]) {
        self.simple_centroid = centroid(simple);
        self.complex_centroid = centroid(complex);
    }

    /// Score a query's complexity in [0, 1].
    ///
    /// Deterministic for identical input; no side effects. The embedding is
    /// only consulted when anchors are configured.
    pub fn score(&self, query_text: &str, embedding: &[f32]) -> f64 {
        let heuristic = self.heuristic_score(query_text);

        let anchored = match (&self.simple_centroid, &self.complex_centroid) {
            (Some(simple), Some(complex))
                if self.embedding_weight > 0.0 && !embedding.is_empty() =>
            {
                let ratio = anchor_ratio(embedding, simple, complex);
                (1.0 - self.embedding_weight) * heuristic + self.embedding_weight * ratio
            }
            _ => heuristic,
        };

        anchored.clamp(0.0, 1.0)
    }

    /// Heuristic-only complexity score in [0, 1].
    pub fn heuristic_score(&self, query_text: &str) -> f64 {
        let trimmed = query_text.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        let truncated = truncate_chars(trimmed, MAX_ANALYZED_CHARS);
        let lower = truncated.to_lowercase();

        let length_score = length_score(&lower);
        let technical_score = technical_score(&lower);
        let class_score = self.classify_lower(&lower).weight();

        (length_score + technical_score + class_score).min(1.0)
    }

    /// Classify the question type of a query.
    pub fn classify(&self, query_text: &str) -> QueryClass {
        self.classify_lower(&query_text.trim().to_lowercase())
    }

    fn classify_lower(&self, lower: &str) -> QueryClass {
        if SIMPLE_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return QueryClass::SimpleFaq;
        }
        if INTEGRATION_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return QueryClass::Integration;
        }
        if TROUBLESHOOTING_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return QueryClass::Troubleshooting;
        }
        if MULTI_STEP_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return QueryClass::MultiStep;
        }
        if TECHNICAL_PATTERNS.iter().any(|p| p.is_match(lower)) {
            return QueryClass::Technical;
        }

        if lower.split_whitespace().count() > 30 {
            QueryClass::MultiStep
        } else if count_technical_terms(lower) > 0 {
            QueryClass::Technical
        } else {
            QueryClass::SimpleFaq
        }
    }
}

impl Default for ComplexityScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// min(word_count / 40, 0.5)
fn length_score(lower: &str) -> f64 {
    let word_count = lower.split_whitespace().count() as f64;
    (word_count / 40.0).min(0.5)
}

/// min(term_count / 8 * 0.4, 0.4)
fn technical_score(lower: &str) -> f64 {
    let count = count_technical_terms(lower) as f64;
    (count / 8.0 * 0.4).min(0.4)
}

fn count_technical_terms(lower: &str) -> usize {
    lower
        .split(|c: char| !c.is_alphanumeric() && c != '/')
        .filter(|w| !w.is_empty())
        .filter(|w| TECHNICAL_TERMS.contains(w))
        .count()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => &text[..byte_offset],
        None => text,
    }
}

fn centroid(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let mut sum = vec![0.0f32; first.len()];
    for v in vectors {
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }
    let n = vectors.len() as f32;
    for acc in sum.iter_mut() {
        *acc /= n;
    }
    Some(sum)
}

/// Nearest-centroid ratio in [0, 1]: 0 at the simple centroid, 1 at the
/// complex centroid, 0.5 when equidistant or degenerate.
fn anchor_ratio(embedding: &[f32], simple: &[f32], complex: &[f32]) -> f64 {
    let d_simple = 1.0 - f64::from(cosine_similarity(embedding, simple));
    let d_complex = 1.0 - f64::from(cosine_similarity(embedding, complex));
    let denom = d_simple + d_complex;
    if denom <= f64::EPSILON {
        0.5
    } else {
        d_simple / denom
    }
}
