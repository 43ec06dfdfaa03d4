//! Q&A pairs for blog articles
//!
//! Generates the questions readers commonly ask a generative engine about an
//! article (definition, comparison, application, limitation) from the article
//! body and its AI summary, and validates the hand-written Q&A data shipped
//! with each language version of an article.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Limitation sentences kept per article
const MAX_LIMITATIONS: usize = 5;

/// Characters of article text quoted around a comparison
const COMPARISON_CONTEXT: usize = 200;

const LIMITATION_KEYWORDS: [&str; 8] = [
    "局限性", "缺点", "不足", "注意事项", "风险", "挑战", "问题", "限制",
];

lazy_static! {
    static ref DIFFERENCE: Regex = Regex::new(r"([^，。；！？\s]+)和([^，。；！？\s]+)的区别")
        .expect("valid difference pattern");
    static ref VERSUS: Regex = Regex::new(r"(?i)([^，。；！？\s]+)\s*(?:vs|对比)\s*([^，。；！？\s]+)")
        .expect("valid versus pattern");
    static ref LIMITATIONS: Vec<Regex> = LIMITATION_KEYWORDS
        .iter()
        .map(|keyword| {
            Regex::new(&format!("[^。！？]*{}[^。！？]*[。！？]", regex::escape(keyword)))
                .expect("valid limitation pattern")
        })
        .collect();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").expect("valid tag pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaCategory {
    Definition,
    Comparison,
    Application,
    Limitation,
}

impl QaCategory {
    pub const ALL: [QaCategory; 4] = [
        QaCategory::Definition,
        QaCategory::Comparison,
        QaCategory::Application,
        QaCategory::Limitation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QaCategory::Definition => "definition",
            QaCategory::Comparison => "comparison",
            QaCategory::Application => "application",
            QaCategory::Limitation => "limitation",
        }
    }
}

impl fmt::Display for QaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    pub category: QaCategory,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

/// Structured summary written for each article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub what_is: String,
    #[serde(default)]
    pub why_important: String,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
}

/// Article as read by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub id: String,
    pub title: String,
    /// Article body, usually HTML
    pub content: String,
    #[serde(default)]
    pub ai_summary: Option<AiSummary>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ArticleInput {
    // The title first, then the keywords
    fn concepts(&self) -> Vec<String> {
        std::iter::once(self.title.clone())
            .chain(self.keywords.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaGeneratorConfig {
    pub max_pairs: usize,
    pub include_definition: bool,
    pub include_comparison: bool,
    pub include_application: bool,
    pub include_limitation: bool,
}

impl Default for QaGeneratorConfig {
    fn default() -> Self {
        QaGeneratorConfig {
            max_pairs: 10,
            include_definition: true,
            include_comparison: true,
            include_application: true,
            include_limitation: true,
        }
    }
}

impl QaGeneratorConfig {
    pub fn with_max_pairs(mut self, max_pairs: usize) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// Restrict generation to `categories`
    pub fn with_categories(mut self, categories: &[QaCategory]) -> Self {
        self.include_definition = categories.contains(&QaCategory::Definition);
        self.include_comparison = categories.contains(&QaCategory::Comparison);
        self.include_application = categories.contains(&QaCategory::Application);
        self.include_limitation = categories.contains(&QaCategory::Limitation);
        self
    }
}

/// Which question categories a set of pairs covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaCoverage {
    pub has_definition: bool,
    pub has_comparison: bool,
    pub has_application: bool,
    pub has_limitation: bool,
}

impl QaCoverage {
    pub fn of(pairs: &[QaPair]) -> Self {
        let has = |category| pairs.iter().any(|qa| qa.category == category);
        QaCoverage {
            has_definition: has(QaCategory::Definition),
            has_comparison: has(QaCategory::Comparison),
            has_application: has(QaCategory::Application),
            has_limitation: has(QaCategory::Limitation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCoverageMatrix {
    pub article: String,
    pub qa_pairs: Vec<QaPair>,
    pub coverage: QaCoverage,
}

// Text within `radius` characters of a byte offset, whitespace collapsed
fn surrounding_text(text: &str, position: usize, radius: usize) -> String {
    let (before, after) = text.split_at(position);
    let skip = before.chars().count().saturating_sub(radius);
    let window: String = before
        .chars()
        .skip(skip)
        .chain(after.chars().take(radius))
        .collect();
    window.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn definition_questions(article: &ArticleInput, summary: &AiSummary) -> Vec<QaPair> {
    let mut pairs = vec![QaPair {
        question: format!("什么是{}？", article.title),
        answer: summary.what_is.clone(),
        category: QaCategory::Definition,
        related_concepts: article.concepts(),
    }];
    if !summary.why_important.is_empty() {
        pairs.push(QaPair {
            question: format!("为什么{}很重要？", article.title),
            answer: summary.why_important.clone(),
            category: QaCategory::Definition,
            related_concepts: article.concepts(),
        });
    }
    pairs
}

// Tags become spaces so compared terms never absorb markup
fn comparison_questions(article: &ArticleInput) -> Vec<QaPair> {
    let text = HTML_TAG.replace_all(&article.content, " ");
    [&*DIFFERENCE, &*VERSUS]
        .into_iter()
        .flat_map(|re| re.captures_iter(&text))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (a, b) = (&caps[1], &caps[2]);
            Some(QaPair {
                question: format!("{}和{}有什么区别？", a, b),
                answer: surrounding_text(&text, whole.start(), COMPARISON_CONTEXT / 2),
                category: QaCategory::Comparison,
                related_concepts: vec![a.to_string(), b.to_string()],
            })
        })
        .collect()
}

fn application_questions(article: &ArticleInput, summary: &AiSummary) -> Vec<QaPair> {
    if summary.use_cases.is_empty() {
        return Vec::new();
    }
    vec![
        QaPair {
            question: format!("{}适用于哪些场景？", article.title),
            answer: summary.use_cases.join("；"),
            category: QaCategory::Application,
            related_concepts: article.concepts(),
        },
        QaPair {
            question: format!("什么时候应该使用{}？", article.title),
            answer: format!(
                "{}主要适用于以下场景：{}。",
                article.title,
                summary.use_cases.join("、")
            ),
            category: QaCategory::Application,
            related_concepts: article.concepts(),
        },
    ]
}

/// Sentences mentioning a limitation keyword, deduplicated, at most five
pub fn extract_limitations(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LIMITATIONS
        .iter()
        .flat_map(|re| re.find_iter(content))
        .map(|m| m.as_str().trim().to_string())
        .filter(|sentence| seen.insert(sentence.clone()))
        .take(MAX_LIMITATIONS)
        .collect()
}

fn limitation_questions(article: &ArticleInput) -> Vec<QaPair> {
    let limitations = extract_limitations(&article.content);
    if limitations.is_empty() {
        return Vec::new();
    }
    let joined = limitations.join("；");
    vec![
        QaPair {
            question: format!("{}有哪些局限性？", article.title),
            answer: joined.clone(),
            category: QaCategory::Limitation,
            related_concepts: article.concepts(),
        },
        QaPair {
            question: format!("使用{}时需要注意什么？", article.title),
            answer: format!("使用{}时需要注意以下几点：{}。", article.title, joined),
            category: QaCategory::Limitation,
            related_concepts: article.concepts(),
        },
    ]
}

/// Generate Q&A pairs for `article`
///
/// Categories come in a fixed order (definition, comparison, application,
/// limitation) and the list is cut at `config.max_pairs`. Definition and
/// application questions need an AI summary.
pub fn generate_qa(article: &ArticleInput, config: &QaGeneratorConfig) -> QuestionCoverageMatrix {
    let mut pairs = Vec::new();
    let summary = article.ai_summary.as_ref();

    if let Some(summary) = summary.filter(|_| config.include_definition) {
        pairs.extend(definition_questions(article, summary));
    }
    if config.include_comparison {
        pairs.extend(comparison_questions(article));
    }
    if let Some(summary) = summary.filter(|_| config.include_application) {
        pairs.extend(application_questions(article, summary));
    }
    if config.include_limitation {
        pairs.extend(limitation_questions(article));
    }
    pairs.truncate(config.max_pairs);

    QuestionCoverageMatrix {
        article: article.id.clone(),
        coverage: QaCoverage::of(&pairs),
        qa_pairs: pairs,
    }
}

/// Hand-written Q&A data of one article in both languages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualQa {
    #[serde(default)]
    pub zh: Vec<QaPair>,
    #[serde(default)]
    pub en: Vec<QaPair>,
}

/// Coverage check of one article's Q&A data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaCoverageReport {
    pub article: String,
    pub zh_total: usize,
    pub en_total: usize,
    /// Chinese pairs per category, in category order
    pub zh_by_category: Vec<(QaCategory, usize)>,
    /// Problems that fail the article
    pub errors: Vec<String>,
    /// Gaps worth fixing that do not fail the article
    pub warnings: Vec<String>,
}

impl QaCoverageReport {
    pub fn build(article: &str, qa: &BilingualQa) -> Self {
        let zh_by_category: Vec<(QaCategory, usize)> = QaCategory::ALL
            .into_iter()
            .map(|category| {
                let count = qa.zh.iter().filter(|p| p.category == category).count();
                (category, count)
            })
            .collect();

        let mut errors = Vec::new();
        if qa.zh.is_empty() {
            errors.push("Chinese version: Missing Q&A pairs".to_string());
        }
        if qa.en.is_empty() {
            errors.push("English version: Missing Q&A pairs".to_string());
        }

        let mut warnings = Vec::new();
        if !qa.zh.is_empty() {
            for category in [QaCategory::Definition, QaCategory::Application] {
                if zh_by_category.contains(&(category, 0)) {
                    warnings.push(format!("Missing {} questions", category));
                }
            }
        }
        if !qa.zh.is_empty() && !qa.en.is_empty() && qa.zh.len() != qa.en.len() {
            warnings.push(format!(
                "Q&A count mismatch: zh={}, en={}",
                qa.zh.len(),
                qa.en.len()
            ));
        }

        QaCoverageReport {
            article: article.to_string(),
            zh_total: qa.zh.len(),
            en_total: qa.en.len(),
            zh_by_category,
            errors,
            warnings,
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Coverage reports for every article, in slug order
pub fn validate_qa_coverage(articles: &BTreeMap<String, BilingualQa>) -> Vec<QaCoverageReport> {
    articles
        .iter()
        .map(|(slug, qa)| QaCoverageReport::build(slug, qa))
        .collect()
}
