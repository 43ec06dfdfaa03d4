//! Content quality checks for blog articles
//!
//! Flags what makes an article harder for a generative engine to quote:
//! over-long paragraphs, rhetorical questions, vague wording, marketing
//! hyperbole and missing citations. The input is the article HTML; tags are
//! stripped before text checks. Every check is a deterministic pattern scan.

use crate::terminology::content::term_pattern;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Longest paragraph, in characters, that passes
pub const MAX_PARAGRAPH_LENGTH: usize = 300;

/// Characters of context kept on each side of a finding
const CONTEXT_SIZE: usize = 50;

pub const VAGUE_TERMS_ZH: [&str; 10] = [
    "可能", "也许", "大概", "或许", "似乎", "好像", "大约", "左右", "差不多", "基本上",
];

pub const VAGUE_TERMS_EN: [&str; 10] = [
    "maybe",
    "perhaps",
    "possibly",
    "probably",
    "might",
    "could be",
    "seems like",
    "appears to",
    "roughly",
    "approximately",
];

pub const HYPERBOLE_TERMS_ZH: [&str; 15] = [
    "颠覆", "史无前例", "革命性", "划时代", "空前", "绝无仅有", "前所未有", "最强", "最好",
    "完美", "终极", "极致", "无敌", "碾压", "秒杀",
];

pub const HYPERBOLE_TERMS_EN: [&str; 13] = [
    "revolutionary",
    "groundbreaking",
    "unprecedented",
    "game-changing",
    "disruptive",
    "paradigm shift",
    "best ever",
    "perfect",
    "ultimate",
    "unbelievable",
    "amazing",
    "incredible",
    "mind-blowing",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid built-in pattern"))
        .collect()
}

fn compile_terms(lists: &[&[&'static str]]) -> Vec<(&'static str, Regex)> {
    lists
        .iter()
        .flat_map(|list| list.iter())
        .filter_map(|&term| term_pattern(term, true).map(|re| (term, re)))
        .collect()
}

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").expect("valid tag pattern");
    static ref PARAGRAPH: Regex = Regex::new(r"(?i)<p[^>]*>(.*?)</p>").expect("valid paragraph pattern");
    static ref RHETORICAL_QUESTIONS: Vec<Regex> = compile(&[
        r"[^。！？]*吗？",
        r"[^。！？]*呢？",
        r"难道[^？]*？",
        r"怎么[^？]*？",
        r"为什么[^？]*？",
        r"(?i)(?-u:\b)(why|how|what|when|where|who)\s+[^.!?]*\?",
        r"(?i)(?-u:\b)(isn't|aren't|wasn't|weren't|don't|doesn't|didn't)\s+[^.!?]*\?",
        r"(?i)(?-u:\b)(can|could|would|should|will)\s+[^.!?]*\?",
    ]);
    static ref QA_MARKERS: Vec<Regex> = compile(&[
        r#"(?i)<section[^>]*class="[^"]*qa[^"]*"[^>]*>"#,
        r#"(?i)<div[^>]*class="[^"]*qa[^"]*"[^>]*>"#,
        r"(?i)<h[1-6][^>]*>.*?(Q&A|问答|常见问题|FAQ).*?</h[1-6]>",
    ]);
    static ref CITATIONS: Vec<Regex> = compile(&[
        r#"(?i)<a[^>]*href="https?://[^"]*"[^>]*(?:target="_blank"|rel="noopener")[^>]*>"#,
        r#"(?i)<(?:section|div)[^>]*class="[^"]*(?:references|citations|bibliography)[^"]*"[^>]*>"#,
        r"(?i)<h[1-6][^>]*>.*?(?:References|Citations|Bibliography|参考文献|引用|来源).*?</h[1-6]>",
        r"\[\d+\]",
        r"\(\d{4}\)",
        r"<sup[^>]*>\d+</sup>",
    ]);
    static ref DEFINITIONS: Vec<Regex> = compile(&[
        r"是指",
        r"指的是",
        r"定义为",
        r"(?i)is\s+defined\s+as",
        r"(?i)refers\s+to",
    ]);
    static ref CONCLUSIONS: Vec<Regex> = compile(&[
        r"因此",
        r"结论是",
        r"综上所述",
        r"总结来说",
        r"(?i)therefore",
        r"(?i)in\s+conclusion",
        r"(?i)to\s+summarize",
    ]);
    static ref LISTS: Regex = Regex::new(r"<(?:ul|ol)[^>]*>").expect("valid list pattern");
    static ref VAGUE_TERMS: Vec<(&'static str, Regex)> =
        compile_terms(&[&VAGUE_TERMS_ZH[..], &VAGUE_TERMS_EN[..]]);
    static ref HYPERBOLE_TERMS: Vec<(&'static str, Regex)> =
        compile_terms(&[&HYPERBOLE_TERMS_ZH[..], &HYPERBOLE_TERMS_EN[..]]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ParagraphLength,
    RhetoricalQuestion,
    VagueTerm,
    Hyperbole,
    MissingCitations,
}

/// One quality problem found in an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityIssue {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    pub location: String,
}

impl QualityIssue {
    fn warning(kind: IssueKind, message: String, location: String) -> Self {
        QualityIssue {
            severity: Severity::Warning,
            kind,
            message,
            location,
        }
    }
}

/// Facts about an article that are not visible in its body HTML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleSignals {
    pub has_ai_summary: bool,
    pub has_qa_coverage: bool,
    /// Skips the citation scan when set
    pub has_citations: bool,
}

impl ArticleSignals {
    pub fn with_ai_summary(mut self, has_ai_summary: bool) -> Self {
        self.has_ai_summary = has_ai_summary;
        self
    }

    pub fn with_qa_coverage(mut self, has_qa_coverage: bool) -> Self {
        self.has_qa_coverage = has_qa_coverage;
        self
    }

    pub fn with_citations(mut self, has_citations: bool) -> Self {
        self.has_citations = has_citations;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub has_definitions: bool,
    pub has_conclusions: bool,
    pub has_proper_lists: bool,
    pub paragraph_length_ok: bool,
    pub avoids_vague_terms: bool,
    pub avoids_hyperbole: bool,
    pub has_ai_summary: bool,
    pub has_qa_coverage: bool,
    pub has_citations: bool,
}

impl QualityMetrics {
    /// Score from 0 to 100: missing features and every issue cost points
    fn score(&self, issues: &[QualityIssue]) -> u8 {
        let mut score: i64 = 100;
        let penalties = [
            (self.has_definitions, 10),
            (self.has_conclusions, 5),
            (self.has_proper_lists, 5),
            (self.has_ai_summary, 15),
            (self.has_qa_coverage, 10),
        ];
        for (present, cost) in penalties {
            if !present {
                score -= cost;
            }
        }
        for issue in issues {
            score -= match issue.severity {
                Severity::Error => 5,
                Severity::Warning => 2,
                Severity::Info => 0,
            };
        }
        score.clamp(0, 100) as u8
    }

    fn recommendations(&self, issues: &[QualityIssue]) -> Vec<String> {
        let advice = [
            (
                self.has_definitions,
                "Add clear definition sentences using patterns like \"X 是指...\" or \"X is defined as...\"",
            ),
            (
                self.has_conclusions,
                "Add explicit conclusion markers like \"因此\" or \"therefore\" to make conclusions clear",
            ),
            (
                self.has_proper_lists,
                "Use <ul> or <ol> tags for lists instead of plain text enumeration",
            ),
            (
                self.paragraph_length_ok,
                "Break long paragraphs (>300 characters) into smaller, more digestible chunks",
            ),
            (
                self.avoids_vague_terms,
                "Replace vague terms (可能, 也许, maybe, perhaps) with more definitive language",
            ),
            (
                self.avoids_hyperbole,
                "Replace hyperbolic terms (颠覆, 革命性, revolutionary) with measured, factual language",
            ),
            (
                self.has_citations,
                "Add citations and references to external sources to improve verifiability and credibility",
            ),
            (
                self.has_ai_summary,
                "Add an AI Summary section with whatIs, whyImportant, useCases, and keyTakeaways",
            ),
            (
                self.has_qa_coverage,
                "Add Q&A coverage addressing common questions (definition, comparison, application, limitation)",
            ),
        ];
        let mut recommendations: Vec<String> = advice
            .into_iter()
            .filter(|(ok, _)| !ok)
            .map(|(_, text)| text.to_string())
            .collect();

        let kinds: BTreeSet<IssueKind> = issues.iter().map(|i| i.kind).collect();
        if kinds.contains(&IssueKind::RhetoricalQuestion) {
            recommendations.push(
                "Convert rhetorical questions to declarative statements for better semantic certainty"
                    .to_string(),
            );
        }
        if kinds.contains(&IssueKind::MissingCitations) {
            recommendations.push(
                "Include external links, references section, or citation markers to support technical claims"
                    .to_string(),
            );
        }
        recommendations
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub article_id: String,
    pub overall_score: u8,
    pub metrics: QualityMetrics,
    pub issues: Vec<QualityIssue>,
    pub recommendations: Vec<String>,
}

/// Remove HTML tags and surrounding whitespace
pub fn strip_html_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}

// `...{50 chars before}{50 chars after}...` around a byte offset of `text`
fn location_context(text: &str, position: usize) -> String {
    let (before, after) = text.split_at(position);
    let skip = before.chars().count().saturating_sub(CONTEXT_SIZE);
    let before: String = before.chars().skip(skip).collect();
    let after: String = after.chars().take(CONTEXT_SIZE).collect();
    format!("...{}{}...", before, after)
}

fn any_match(patterns: &[Regex], content: &str) -> bool {
    patterns.iter().any(|re| re.is_match(content))
}

/// True when the article carries a Q&A section or heading
pub fn is_qa_content(content: &str) -> bool {
    any_match(&QA_MARKERS, content)
}

/// True when the article links sources, has a references section or uses citation markers
pub fn has_citations(content: &str) -> bool {
    any_match(&CITATIONS, content)
}

/// Paragraphs whose text is longer than [`MAX_PARAGRAPH_LENGTH`] characters
pub fn check_paragraph_length(content: &str) -> Vec<QualityIssue> {
    PARAGRAPH
        .captures_iter(content)
        .enumerate()
        .filter_map(|(index, caps)| {
            let number = index + 1;
            let length = strip_html_tags(&caps[1]).chars().count();
            (length > MAX_PARAGRAPH_LENGTH).then(|| {
                QualityIssue::warning(
                    IssueKind::ParagraphLength,
                    format!(
                        "Paragraph {} exceeds {} characters ({} characters). Consider breaking it into smaller, more digestible chunks.",
                        number, MAX_PARAGRAPH_LENGTH, length
                    ),
                    format!("Paragraph {}", number),
                )
            })
        })
        .collect()
}

/// Questions used as rhetoric; articles with a Q&A section are exempt
pub fn check_rhetorical_questions(content: &str) -> Vec<QualityIssue> {
    if is_qa_content(content) {
        return Vec::new();
    }
    let text = strip_html_tags(content);
    RHETORICAL_QUESTIONS
        .iter()
        .flat_map(|re| re.find_iter(&text))
        .map(|m| {
            QualityIssue::warning(
                IssueKind::RhetoricalQuestion,
                format!(
                    "Rhetorical question detected: \"{}\". Consider using a declarative statement instead for better semantic certainty.",
                    m.as_str().trim()
                ),
                location_context(&text, m.start()),
            )
        })
        .collect()
}

fn check_terms(
    content: &str,
    terms: &[(&'static str, Regex)],
    kind: IssueKind,
    message: impl Fn(&str) -> String,
) -> Vec<QualityIssue> {
    let text = strip_html_tags(content);
    terms
        .iter()
        .flat_map(|(term, re)| re.find_iter(&text).map(move |m| (*term, m.start())))
        .map(|(term, position)| {
            QualityIssue::warning(kind, message(term), location_context(&text, position))
        })
        .collect()
}

/// Every occurrence of a vague term
pub fn check_vague_terms(content: &str) -> Vec<QualityIssue> {
    check_terms(content, &VAGUE_TERMS, IssueKind::VagueTerm, |term| {
        format!(
            "Vague term detected: \"{}\". Use more definitive language to improve semantic certainty.",
            term
        )
    })
}

/// Every occurrence of a hyperbolic or marketing term
pub fn check_hyperbole(content: &str) -> Vec<QualityIssue> {
    check_terms(content, &HYPERBOLE_TERMS, IssueKind::Hyperbole, |term| {
        format!(
            "Hyperbolic term detected: \"{}\". Use more measured, factual language to improve verifiability.",
            term
        )
    })
}

pub fn check_citations(content: &str) -> Vec<QualityIssue> {
    if has_citations(content) {
        return Vec::new();
    }
    vec![QualityIssue::warning(
        IssueKind::MissingCitations,
        "No citations or references found. Technical articles should include citations to improve verifiability and credibility.".to_string(),
        "Article content".to_string(),
    )]
}

/// Run every check on `content` and score the article
pub fn validate_content(article_id: &str, content: &str, signals: ArticleSignals) -> QualityReport {
    let paragraph_issues = check_paragraph_length(content);
    let vague_issues = check_vague_terms(content);
    let hyperbole_issues = check_hyperbole(content);

    let metrics = QualityMetrics {
        has_definitions: any_match(&DEFINITIONS, content),
        has_conclusions: any_match(&CONCLUSIONS, content),
        has_proper_lists: LISTS.is_match(content),
        paragraph_length_ok: paragraph_issues.is_empty(),
        avoids_vague_terms: vague_issues.is_empty(),
        avoids_hyperbole: hyperbole_issues.is_empty(),
        has_ai_summary: signals.has_ai_summary,
        has_qa_coverage: signals.has_qa_coverage,
        has_citations: signals.has_citations || has_citations(content),
    };

    let mut issues = paragraph_issues;
    issues.extend(check_rhetorical_questions(content));
    issues.extend(vague_issues);
    issues.extend(hyperbole_issues);
    if !signals.has_citations {
        issues.extend(check_citations(content));
    }

    QualityReport {
        article_id: article_id.to_string(),
        overall_score: metrics.score(&issues),
        recommendations: metrics.recommendations(&issues),
        metrics,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_kind(issues: &[QualityIssue], kind: IssueKind) -> usize {
        issues.iter().filter(|i| i.kind == kind).count()
    }

    #[test]
    fn test_paragraph_length() {
        let content = format!(
            "<p>Short paragraph.</p>\n<p>{}</p>\n<p>Another short one.</p>",
            "a".repeat(350)
        );
        let issues = check_paragraph_length(&content);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location, "Paragraph 2");
        assert!(issues[0].message.contains("(350 characters)"));

        // Characters, not bytes
        assert!(check_paragraph_length(&format!("<p>{}</p>", "链".repeat(300))).is_empty());
        assert!(check_paragraph_length("<p>This is a <b>short</b> one.</p>").is_empty());
    }

    #[test]
    fn test_rhetorical_questions() {
        assert!(!check_rhetorical_questions("<p>这是一个好主意吗？</p>").is_empty());
        assert!(!check_rhetorical_questions("<p>Why would anyone do this?</p>").is_empty());
        assert!(check_rhetorical_questions("<p>This is a statement.</p>").is_empty());

        let qa = r#"<section class="qa-section"><h2>Q&A</h2><p>What is blockchain?</p></section>"#;
        assert!(is_qa_content(qa));
        assert!(check_rhetorical_questions(qa).is_empty());
    }

    #[test]
    fn test_vague_terms() {
        assert_eq!(check_vague_terms("<p>这也许可能大概是个好主意。</p>").len(), 3);
        let english = check_vague_terms("<p>This might be a good solution.</p>");
        assert_eq!(english.len(), 1);
        assert!(english[0].message.contains("\"might\""));
        assert!(check_vague_terms("<p>This is a definitive statement.</p>").is_empty());
        // No match inside a longer word
        assert!(check_vague_terms("<p>The mighty ledger</p>").is_empty());
    }

    #[test]
    fn test_vague_english_term_inside_chinese_text() {
        let issues = check_vague_terms("<p>这个方案maybe有效</p>");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location, "...这个方案maybe有效...");
    }

    #[test]
    fn test_hyperbole() {
        let zh = check_hyperbole("<p>这是一个颠覆性的革命性技术。</p>");
        assert_eq!(zh.len(), 2);
        assert_eq!(check_hyperbole("<p>A revolutionary and Groundbreaking solution.</p>").len(), 2);
        assert!(check_hyperbole("<p>An effective and well-tested solution.</p>").is_empty());
    }

    #[test]
    fn test_citations() {
        assert!(has_citations(r#"<a href="https://eips.ethereum.org" target="_blank">EIP</a>"#));
        assert!(has_citations("<h2>参考文献</h2>"));
        assert!(has_citations("<p>As shown in [1].</p>"));
        assert!(has_citations("<p>Nakamoto (2008)</p>"));
        assert!(!has_citations("<p>No sources here.</p>"));
        assert_eq!(check_citations("<p>No sources here.</p>").len(), 1);
    }

    #[test]
    fn test_location_context_is_bounded() {
        let text = format!("{}X{}", "前".repeat(80), "后".repeat(80));
        let position = text.find('X').unwrap();
        let context = location_context(&text, position);
        assert_eq!(context.chars().count(), 3 + CONTEXT_SIZE * 2 + 3);
        assert!(context.contains("前X后"));
    }

    #[test]
    fn test_good_content_scores_high() {
        let content = "
            <p>智能合约是指运行在区块链上的自动执行程序。</p>
            <ul><li>自动执行</li><li>不可篡改</li></ul>
            <p>因此，智能合约提供了可信的执行环境[1]。</p>
        ";
        let signals = ArticleSignals::default()
            .with_ai_summary(true)
            .with_qa_coverage(true);
        let report = validate_content("good", content, signals);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.overall_score, 100);
        assert!(report.recommendations.is_empty());
        assert!(report.metrics.has_definitions && report.metrics.has_conclusions);
    }

    #[test]
    fn test_poor_content_scores_low() {
        let content = format!(
            "<p>{}</p><p>这可能也许大概是个颠覆性的革命性方案吗？</p>",
            "a".repeat(350)
        );
        let report = validate_content("poor", &content, ArticleSignals::default());
        assert!(report.overall_score < 70);
        assert!(!report.metrics.paragraph_length_ok);
        assert!(!report.metrics.avoids_vague_terms);
        assert!(!report.metrics.avoids_hyperbole);
        assert_eq!(count_kind(&report.issues, IssueKind::MissingCitations), 1);
        assert!(count_kind(&report.issues, IssueKind::RhetoricalQuestion) > 0);
        assert!(report.recommendations.iter().any(|r| r.contains("AI Summary")));
        assert!(report.recommendations.iter().any(|r| r.contains("Q&A")));
        assert!(report.recommendations.iter().any(|r| r.contains("rhetorical questions")));
    }

    #[test]
    fn test_citation_signal_skips_scan() {
        let signals = ArticleSignals::default().with_citations(true);
        let report = validate_content("cited", "<p>Plain text.</p>", signals);
        assert_eq!(count_kind(&report.issues, IssueKind::MissingCitations), 0);
        assert!(report.metrics.has_citations);
    }

    #[test]
    fn test_score_is_clamped() {
        let content = "<p>maybe </p>".repeat(80);
        let report = validate_content("spam", &content, ArticleSignals::default());
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.article_id, "spam");
    }
}
