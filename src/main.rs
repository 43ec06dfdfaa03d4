use clap::{Arg, ArgAction, ArgMatches, Command};
use geo_i18n::loader::{
    dictionary_or_builtin, load_article_from_file, load_qa_from_file, manifest_or_builtin,
};
use geo_i18n::qa::{QaGeneratorConfig, validate_qa_coverage};
use geo_i18n::quality::ArticleSignals;
use geo_i18n::terminology::ContentChecker;
use geo_i18n::validation::{DictionaryReport, SAMPLE_TERMS};
use geo_i18n::{
    HreflangConfig, Lang, QaCategory, SiteConfig, TermCategory, generate_canonical_url,
    generate_hreflang_links, generate_qa, generate_sitemap, render_sitemap_xml, validate_content,
    validate_site,
};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

type CliResult = Result<bool, Box<dyn Error>>;

fn cli() -> Command {
    Command::new("geo-i18n")
        .version("0.1.0")
        .about("Hreflang, sitemap and terminology checks for the MatrixLab site")
        .subcommand_required(true)
        .arg(
            Arg::new("dictionary")
                .long("dictionary")
                .short('d')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Terminology dictionary JSON (default: built-in)"),
        )
        .arg(
            Arg::new("site")
                .long("site")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Site manifest JSON (default: built-in)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Show debug logs")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("validate-hreflang").about("Validate hreflang tags of every page"))
        .subcommand(
            Command::new("validate-terminology")
                .about("Validate the terminology dictionary and show statistics"),
        )
        .subcommand(
            Command::new("lookup")
                .about("Resolve a term to its canonical dictionary entry")
                .arg(Arg::new("term").help("Term, alias or canonical name").required(true))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("canonical")
                .about("Print the canonical URL of a page")
                .arg(Arg::new("locale").help("Locale code (e.g. zh, en)").required(true))
                .arg(Arg::new("path").help("Page path (default: home page)")),
        )
        .subcommand(
            Command::new("alternates")
                .about("Print hreflang alternates of a page")
                .arg(Arg::new("path").help("Page path (default: home page)"))
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .action(ArgAction::Append)
                        .help("Locale to include, in order (repeatable; default: all)"),
                )
                .arg(
                    Arg::new("no-default")
                        .long("no-default")
                        .help("Omit the x-default entry")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_flag()),
        )
        .subcommand(Command::new("sitemap").about("Print the sitemap XML"))
        .subcommand(
            Command::new("check-content")
                .about("Report aliases used instead of canonical names in a file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .help("Content language: zh or en (default: detected)"),
                )
                .arg(Arg::new("article-id").long("article-id").help("Article id for reports"))
                .arg(
                    Arg::new("ai-summary")
                        .long("ai-summary")
                        .help("The article has an AI summary")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("qa-coverage")
                        .long("qa-coverage")
                        .help("The article has Q&A coverage")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("min-score")
                        .long("min-score")
                        .value_parser(clap::value_parser!(u8).range(0..=100))
                        .help("Fail when the quality score is below this value"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("generate-qa")
                .about("Generate Q&A pairs for an article JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .value_parser(clap::value_parser!(usize))
                        .help("Maximum number of pairs (default: 10)"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .action(ArgAction::Append)
                        .value_parser(["definition", "comparison", "application", "limitation"])
                        .help("Question category to generate (repeatable; default: all)"),
                ),
        )
        .subcommand(
            Command::new("validate-qa")
                .about("Check Q&A coverage of every article in a Q&A JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("check-translation")
                .about("Report terms present in only one language version of an article")
                .arg(
                    Arg::new("zh-file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("en-file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON instead of text")
        .action(ArgAction::SetTrue)
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> CliResult {
    let dictionary_path = matches.get_one::<PathBuf>("dictionary").map(PathBuf::as_path);
    let site_path = matches.get_one::<PathBuf>("site").map(PathBuf::as_path);
    let site = SiteConfig::from_env()?;

    match matches.subcommand() {
        Some(("validate-hreflang", _)) => validate_hreflang(&site, site_path),
        Some(("validate-terminology", _)) => validate_terminology(dictionary_path),
        Some(("lookup", sub)) => lookup(sub, dictionary_path),
        Some(("canonical", sub)) => canonical(sub, &site),
        Some(("alternates", sub)) => alternates(sub, &site),
        Some(("sitemap", _)) => sitemap(&site, site_path),
        Some(("check-content", sub)) => check_content(sub, dictionary_path),
        Some(("check-translation", sub)) => check_translation(sub, dictionary_path),
        Some(("generate-qa", sub)) => generate_qa_pairs(sub),
        Some(("validate-qa", sub)) => validate_qa(sub),
        _ => Err("No command given, see --help".into()),
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String, Box<dyn Error>> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| format!("Missing argument: {}", name).into())
}

fn optional_path(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("")
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a Path, Box<dyn Error>> {
    matches
        .get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .ok_or_else(|| format!("Missing argument: {}", name).into())
}

fn validate_hreflang(site: &SiteConfig, site_path: Option<&Path>) -> CliResult {
    println!("🔍 Validating hreflang implementation...\n");
    let manifest = manifest_or_builtin(site_path)?;
    let report = validate_site(site, &manifest);

    for page in &report.pages {
        if page.passed {
            println!("✅ {}", page.page);
        } else {
            println!("❌ {}", page.page);
            for issue in &page.issues {
                println!("   - {}", issue);
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("\n📊 Summary:");
    println!("   Total pages: {}", report.total());
    println!("   Passed: {}", report.passed());
    println!("   Failed: {}", report.failed());
    println!("   Success rate: {:.1}%", report.success_rate());

    if report.is_success() {
        println!("\n✨ All pages have proper hreflang implementation!");
    } else {
        println!("\n⚠️  Some pages have hreflang issues. Please review and fix.");
    }
    Ok(report.is_success())
}

fn validate_terminology(dictionary_path: Option<&Path>) -> CliResult {
    println!("🔍 Validating Terminology Dictionary...\n");
    let dictionary = dictionary_or_builtin(dictionary_path)?;
    let report = DictionaryReport::build(&dictionary, &SAMPLE_TERMS);

    println!("📊 Dictionary Metadata:");
    println!("   Version: {}", report.metadata.version);
    println!("   Last Updated: {}", report.metadata.last_updated);
    println!();

    println!("📈 Statistics:");
    println!("   Total Terms: {}", report.total);
    for (category, count) in &report.by_category {
        println!("   {}: {} terms", category, count);
    }
    println!();

    println!("📚 All Terms:");
    for entry in dictionary.entries() {
        println!("   • {} ({})", entry.canonical_name, entry.category);
        if !entry.aliases.is_empty() {
            println!("     Aliases: {}", entry.aliases.join(", "));
        }
    }
    println!();

    println!("🔎 Testing Lookups:");
    for sample in &report.samples {
        println!("   \"{}\":", sample.input);
        println!("     Found: {}", if sample.canonical.is_some() { "✓" } else { "✗" });
        println!("     Canonical: {}", sample.canonical.as_deref().unwrap_or("N/A"));
        println!("     Is Alias: {}", if sample.is_alias { "Yes" } else { "No" });
    }
    println!();

    if let Some(entry) = dictionary.lookup(SAMPLE_TERMS[0]) {
        println!("🔗 Related Terms Example:");
        println!("   {} is related to:", entry.canonical_name);
        for related in dictionary.related_entries(entry) {
            println!("     • {}", related.canonical_name);
        }
        println!();
    }

    if !report.unresolved_related.is_empty() {
        println!("⚠️  Unresolved related terms (ignored by lookups):");
        for (entry, related) in &report.unresolved_related {
            println!("   • {} → {}", entry, related);
        }
        println!();
    }

    println!("✅ Validation Complete - Dictionary is valid!");
    println!("\n📝 Summary: {} terms validated successfully", report.total);
    Ok(true)
}

fn lookup(matches: &ArgMatches, dictionary_path: Option<&Path>) -> CliResult {
    let term = arg(matches, "term")?;
    let dictionary = dictionary_or_builtin(dictionary_path)?;

    let Some(entry) = dictionary.lookup(term) else {
        eprintln!("❌ Term not found: {}", term);
        return Ok(false);
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(entry)?);
        return Ok(true);
    }

    println!("{}", dictionary.format_with_english(&entry.canonical_name));
    println!("   Category: {}", entry.category);
    println!("   Definition: {}", entry.definition);
    println!(
        "   Matched via alias: {}",
        if dictionary.is_alias(term, entry) { "Yes" } else { "No" }
    );
    if let Some(en) = dictionary.translation(term, Lang::En) {
        println!("   English: {} - {}", en.term, en.definition);
    }
    let related = dictionary.related_entries(entry);
    if !related.is_empty() {
        let names: Vec<&str> = related.iter().map(|e| e.canonical_name.as_str()).collect();
        println!("   Related: {}", names.join(", "));
    }
    Ok(true)
}

fn canonical(matches: &ArgMatches, site: &SiteConfig) -> CliResult {
    let locale = arg(matches, "locale")?;
    let path = optional_path(matches);
    // Reject locales the site does not serve
    site.locales().tag_for(locale)?;
    println!("{}", generate_canonical_url(site, locale, path));
    Ok(true)
}

fn alternates(matches: &ArgMatches, site: &SiteConfig) -> CliResult {
    let path = optional_path(matches);
    let mut config = HreflangConfig::new(path).with_default(!matches.get_flag("no-default"));
    if let Some(locales) = matches.get_many::<String>("locale") {
        config.locales = Some(locales.cloned().collect());
    }

    let links = generate_hreflang_links(site, &config)?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&links)?);
    } else {
        for link in &links {
            println!("{}\t{}", link.hreflang, link.href);
        }
    }
    Ok(true)
}

fn sitemap(site: &SiteConfig, site_path: Option<&Path>) -> CliResult {
    let manifest = manifest_or_builtin(site_path)?;
    let entries = generate_sitemap(site, &manifest)?;
    print!("{}", render_sitemap_xml(&entries));
    Ok(true)
}

fn check_content(matches: &ArgMatches, dictionary_path: Option<&Path>) -> CliResult {
    let file = path_arg(matches, "file")?;
    let locale = matches
        .get_one::<String>("locale")
        .map(|l| l.parse::<Lang>())
        .transpose()?;
    let article_id = matches
        .get_one::<String>("article-id")
        .cloned()
        .unwrap_or_else(|| file.display().to_string());

    let dictionary = dictionary_or_builtin(dictionary_path)?;
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read file '{}': {}", file.display(), e))?;

    let checker = ContentChecker::new(&dictionary);
    let conflicts: Vec<_> = checker
        .validate_consistency(&content, locale)
        .into_iter()
        .map(|c| c.with_article(&article_id))
        .collect();

    let signals = ArticleSignals::default()
        .with_ai_summary(matches.get_flag("ai-summary"))
        .with_qa_coverage(matches.get_flag("qa-coverage"));
    let quality = validate_content(&article_id, &content, signals);
    let score_ok = matches
        .get_one::<u8>("min-score")
        .is_none_or(|&min| quality.overall_score >= min);
    let passed = conflicts.is_empty() && score_ok;

    if matches.get_flag("json") {
        let report = serde_json::json!({ "conflicts": conflicts, "quality": quality });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(passed);
    }

    let found = checker.extract_terms(&content);
    println!("📄 {}", article_id);
    println!("   Terms used: {}", found.len());
    for category in TermCategory::ALL {
        let names: Vec<&str> = found
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.canonical_name.as_str())
            .collect();
        if !names.is_empty() {
            println!("   {}: {}", category, names.join(", "));
        }
    }

    if conflicts.is_empty() {
        println!("✅ Terminology is consistent");
    } else {
        println!("❌ {} terminology issue(s):", conflicts.len());
        for conflict in &conflicts {
            println!("   - {}", conflict.article_definition);
        }
    }

    println!("\n📊 Quality score: {}/100", quality.overall_score);
    for issue in &quality.issues {
        println!("   ⚠️  {}", issue.message);
    }
    for recommendation in &quality.recommendations {
        println!("   💡 {}", recommendation);
    }
    if !score_ok {
        println!("❌ Quality score is below the required minimum");
    }
    Ok(passed)
}

fn check_translation(matches: &ArgMatches, dictionary_path: Option<&Path>) -> CliResult {
    let zh_file = path_arg(matches, "zh-file")?;
    let en_file = path_arg(matches, "en-file")?;
    let dictionary = dictionary_or_builtin(dictionary_path)?;
    let zh = fs::read_to_string(zh_file)
        .map_err(|e| format!("Failed to read file '{}': {}", zh_file.display(), e))?;
    let en = fs::read_to_string(en_file)
        .map_err(|e| format!("Failed to read file '{}': {}", en_file.display(), e))?;

    let issues = ContentChecker::new(&dictionary).validate_translation_consistency(&zh, &en);
    if issues.is_empty() {
        println!("✅ Both language versions use the same terms");
    } else {
        println!("❌ {} translation issue(s):", issues.len());
        for issue in &issues {
            println!("   - {}: {}", issue.canonical_definition, issue.article_definition);
        }
    }
    Ok(issues.is_empty())
}

fn generate_qa_pairs(matches: &ArgMatches) -> CliResult {
    let article = load_article_from_file(path_arg(matches, "file")?)?;
    let mut config = QaGeneratorConfig::default();
    if let Some(&max) = matches.get_one::<usize>("max") {
        config = config.with_max_pairs(max);
    }
    if let Some(names) = matches.get_many::<String>("category") {
        let categories: Vec<QaCategory> = QaCategory::ALL
            .into_iter()
            .filter(|category| names.clone().any(|name| name == category.as_str()))
            .collect();
        config = config.with_categories(&categories);
    }

    let matrix = generate_qa(&article, &config);
    println!("{}", serde_json::to_string_pretty(&matrix)?);
    Ok(true)
}

fn validate_qa(matches: &ArgMatches) -> CliResult {
    println!("=== Q&A Coverage Validation ===");
    let articles = load_qa_from_file(path_arg(matches, "file")?)?;
    let reports = validate_qa_coverage(&articles);

    for report in &reports {
        println!("\n📄 {}", report.article);
        println!("{}", "─".repeat(60));
        if report.zh_total > 0 {
            println!("✓ Chinese version: {} Q&A pairs", report.zh_total);
            for (category, count) in &report.zh_by_category {
                println!("  - {}: {}", category, count);
            }
        }
        if report.en_total > 0 {
            println!("✓ English version: {} Q&A pairs", report.en_total);
        }
        for error in &report.errors {
            println!("❌ {}", error);
        }
        for warning in &report.warnings {
            println!("⚠️  {}", warning);
        }
    }

    let passed = reports.iter().all(|r| r.passed());
    println!("\n{}", "=".repeat(60));
    if passed {
        println!("✅ All articles have Q&A coverage!");
    } else {
        println!("❌ Some articles are missing Q&A pairs");
    }
    Ok(passed)
}
