//! Builds the article collection from Markdown sources.
//!
//! Source layout:
//! ```text
//! ---
//! title: Box model basics
//! date: 2024-03-01
//! category: CSS
//! tags: layout, css
//! ---
//! Markdown body...
//! ```
//!
//! Each source becomes one [`Article`] with its rendered body in
//! `contentHtml`. Results are merged by slug into the existing collection,
//! which is then sorted newest first.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use pulldown_cmark::{Event, Options, Parser, html};
use pulldown_cmark_escape::{escape_href, escape_html};
use serde_yaml::{Mapping, Value};

use crate::article::Article;
use crate::config::BuildConfig;
use crate::error::{BlogError, Result};

/// Longest slug derived from a title and date.
pub const MAX_SLUG_LEN: usize = 80;

/// Parsed front matter. Missing keys are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: String,
    pub date: String,
    pub slug: String,
    pub category: String,
    pub class_name: String,
    pub student: String,
    pub cover: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

impl Frontmatter {
    fn from_mapping(map: &Mapping) -> Self {
        let get = |key: &str| map.get(key).map(scalar).unwrap_or_default();
        let tags: Vec<String> = match map.get("tags") {
            Some(Value::Sequence(items)) => items.iter().map(scalar).collect(),
            Some(other) => scalar(other).split(',').map(str::to_string).collect(),
            None => Vec::new(),
        };
        Self {
            title: get("title"),
            date: get("date"),
            slug: get("slug"),
            category: get("category"),
            class_name: get("class"),
            student: get("student"),
            cover: get("cover"),
            excerpt: get("excerpt"),
            tags: tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Split a `---` fenced front matter block from the body.
///
/// Returns `None` when the text does not open with a fence or the block is
/// never closed.
pub fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&text[yaml_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a source file into front matter and Markdown body.
///
/// Text without front matter is all body.
pub fn parse_source<'a>(path: &Path, text: &'a str) -> Result<(Frontmatter, &'a str)> {
    let Some((yaml, body)) = split_frontmatter(text) else {
        return Ok((Frontmatter::default(), text));
    };
    if yaml.trim().is_empty() {
        return Ok((Frontmatter::default(), body));
    }

    let invalid = |reason: String| BlogError::Frontmatter {
        path: path.display().to_string(),
        reason,
    };
    match serde_yaml::from_str::<Value>(yaml).map_err(|e| invalid(e.to_string()))? {
        Value::Mapping(map) => Ok((Frontmatter::from_mapping(&map), body)),
        _ => Err(invalid("front matter is not a key/value mapping".into())),
    }
}

/// Render Markdown to HTML. Raw HTML in the source is escaped.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Slug from front matter, else from `title-date`, else `post-<seconds>`.
pub fn derive_slug(front: &Frontmatter) -> String {
    if !front.slug.is_empty() {
        return front.slug.clone();
    }
    let mut slug = slug::slugify(format!("{}-{}", front.title, front.date));
    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("post-{}", Utc::now().timestamp())
    } else {
        slug.to_string()
    }
}

/// Turn one source into an article. Sources need a title and a date.
pub fn build_article(path: &Path, text: &str, default_category: &str) -> Result<Article> {
    let (front, body) = parse_source(path, text)?;
    if front.title.is_empty() || front.date.is_empty() {
        return Err(BlogError::Frontmatter {
            path: path.display().to_string(),
            reason: "title and date are required".into(),
        });
    }

    let slug = derive_slug(&front);
    if slug.contains(['/', '\\']) || slug == "." || slug == ".." {
        return Err(BlogError::Frontmatter {
            path: path.display().to_string(),
            reason: format!("slug `{slug}` cannot be used as a file name"),
        });
    }
    let category = if front.category.is_empty() {
        default_category.to_string()
    } else {
        front.category
    };
    Ok(Article {
        slug,
        title: front.title,
        category,
        date: front.date,
        excerpt: front.excerpt,
        cover: front.cover,
        content_html: Some(markdown_to_html(body)),
        content_url: None,
        class_name: front.class_name,
        student: front.student,
        tags: front.tags,
    })
}

/// Replace or add `updates` by slug, then sort by date, newest first.
/// Articles with equal dates keep their relative order.
pub fn merge_articles(existing: Vec<Article>, updates: Vec<Article>) -> Vec<Article> {
    let mut merged = existing;
    for article in updates {
        match merged.iter_mut().find(|a| a.slug == article.slug) {
            Some(slot) => *slot = article,
            None => merged.push(article),
        }
    }
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}

/// Read the current collection. A missing or unreadable file is empty.
pub fn load_existing(path: &Path) -> Vec<Article> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&text) {
        Ok(articles) => articles,
        Err(e) => {
            log::warn!("{} is not an article array ({e}); regenerating", path.display());
            Vec::new()
        }
    }
}

fn escaped_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    out
}

fn escaped_href(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_href(&mut out, s);
    out
}

/// A self-contained preview page for one article.
pub fn standalone_page(article: &Article) -> String {
    let title = escaped_text(&article.title);
    let meta = [&article.date, &article.class_name, &article.student]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| escaped_text(s))
        .collect::<Vec<_>>()
        .join(" | ");
    let cover = if article.cover.is_empty() {
        String::new()
    } else {
        format!(
            "<p><img src=\"{}\" alt=\"cover\" loading=\"lazy\"></p>\n    ",
            escaped_href(&article.cover)
        )
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <meta name="description" content="{excerpt}" />
</head>
<body>
  <article>
    <h1>{title}</h1>
    <p><small>{meta}</small></p>
    {cover}{body}
  </article>
</body>
</html>
"#,
        excerpt = escaped_text(&article.excerpt),
        body = article.content_html.as_deref().unwrap_or_default(),
    )
}

/// Outcome of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Articles added or replaced.
    pub updated: usize,
    /// Sources that were skipped, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Articles in the written collection.
    pub total: usize,
}

fn markdown_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        log::warn!("content directory {} not found", dir.display());
        return Ok(Vec::new());
    }
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Build the collection described by `config`.
pub fn build_collection(config: &BuildConfig) -> Result<BuildReport> {
    let mut report = BuildReport::default();
    let mut built = Vec::new();

    for path in markdown_sources(&config.content_dir)? {
        let text = fs::read_to_string(&path)?;
        let article = match build_article(&path, &text, &config.default_category) {
            Ok(article) => article,
            Err(e) => {
                log::debug!("skipping {}: {e}", path.display());
                report.skipped.push((path, e.to_string()));
                continue;
            }
        };

        if config.generate_html {
            let page = config.articles_dir.join(format!("{}.html", article.slug));
            write_file(&page, &standalone_page(&article))?;
        }
        log::info!("built `{}` from {}", article.slug, path.display());
        built.push(article);
    }

    report.updated = built.len();
    let merged = merge_articles(load_existing(&config.output), built);
    report.total = merged.len();

    let json = serde_json::to_string_pretty(&merged)
        .map_err(|e| BlogError::Io(format!("encoding article JSON: {e}")))?;
    write_file(&config.output, &json)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SOURCE: &str = "---\ntitle: Box model\ndate: 2024-03-01\ncategory: CSS\ntags: layout, css\n---\n# Heading\n\nSome **bold** text.\n";

    #[test]
    fn test_split_frontmatter() {
        let (yaml, body) = split_frontmatter(SOURCE).unwrap();
        assert!(yaml.starts_with("title: Box model\n"));
        assert!(yaml.ends_with("tags: layout, css\n"));
        assert!(body.starts_with("# Heading"));
    }

    #[test]
    fn test_split_frontmatter_crlf_and_missing_fence() {
        let (yaml, body) = split_frontmatter("---\r\ntitle: A\r\n---\r\nbody").unwrap();
        assert_eq!(yaml, "title: A\r\n");
        assert_eq!(body, "body");

        assert!(split_frontmatter("# no front matter").is_none());
        assert!(split_frontmatter("---\ntitle: A\nno closing fence").is_none());
    }

    #[test]
    fn test_parse_source_scalars_and_tags() {
        let text = "---\ntitle: 2024\ndate: 2024-01-02\ntags: [a, \" b \", \"\"]\nclass: 3-2\n---\nbody";
        let (front, body) = parse_source(Path::new("x.md"), text).unwrap();
        assert_eq!(front.title, "2024");
        assert_eq!(front.date, "2024-01-02");
        assert_eq!(front.tags, vec!["a", "b"]);
        assert_eq!(front.class_name, "3-2");
        assert_eq!(body, "body");
    }

    #[test]
    fn test_parse_source_rejects_non_mapping() {
        let err = parse_source(Path::new("bad.md"), "---\n- a\n- b\n---\nbody").unwrap_err();
        assert!(matches!(err, BlogError::Frontmatter { .. }));
    }

    #[test]
    fn test_markdown_escapes_raw_html() {
        let out = markdown_to_html("Hello <script>alert(1)</script> **world**");
        assert!(out.contains("<strong>world</strong>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_derive_slug() {
        let mut front = Frontmatter {
            title: "Hello World".into(),
            date: "2024-03-01".into(),
            ..Default::default()
        };
        assert_eq!(derive_slug(&front), "hello-world-2024-03-01");

        front.slug = "custom".into();
        assert_eq!(derive_slug(&front), "custom");

        let long = Frontmatter {
            title: "word ".repeat(40),
            date: "2024".into(),
            ..Default::default()
        };
        let slug = derive_slug(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));

        let blank = Frontmatter {
            title: "!!!".into(),
            date: "???".into(),
            ..Default::default()
        };
        assert!(derive_slug(&blank).starts_with("post-"));
    }

    #[test]
    fn test_build_article() {
        let article = build_article(Path::new("a.md"), SOURCE, "Showcase").unwrap();
        assert_eq!(article.slug, "box-model-2024-03-01");
        assert_eq!(article.category, "CSS");
        assert_eq!(article.tags, vec!["layout", "css"]);
        let html = article.content_html.unwrap();
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_build_article_defaults_and_requirements() {
        let article =
            build_article(Path::new("a.md"), "---\ntitle: T\ndate: D\n---\nx", "Showcase").unwrap();
        assert_eq!(article.category, "Showcase");

        let err = build_article(Path::new("b.md"), "---\ntitle: T\n---\nx", "Showcase").unwrap_err();
        assert!(matches!(err, BlogError::Frontmatter { .. }));

        assert!(build_article(Path::new("c.md"), "just text", "Showcase").is_err());
    }

    fn article(slug: &str, date: &str, title: &str) -> Article {
        Article {
            slug: slug.into(),
            title: title.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_replaces_and_sorts() {
        let existing = vec![article("a", "2024-01-01", "old a"), article("b", "2024-02-01", "b")];
        let updates = vec![article("a", "2024-03-01", "new a"), article("c", "2023-12-01", "c")];

        let merged = merge_articles(existing, updates);
        let slugs: Vec<&str> = merged.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert_eq!(merged[0].title, "new a");
    }

    #[test]
    fn test_standalone_page_escapes_meta() {
        let mut a = article("s", "2024", "<Title>");
        a.excerpt = "say \"hi\"".into();
        a.content_html = Some("<p>body</p>".into());
        let page = standalone_page(&a);
        assert!(page.contains("<title>&lt;Title&gt;</title>"));
        assert!(page.contains("content=\"say &quot;hi&quot;\""));
        assert!(page.contains("<p>body</p>"));
    }

    #[test]
    fn test_standalone_page_escapes_cover_href() {
        let mut a = article("s", "2024", "T");
        a.cover = "a.png\" onerror=\"alert(1)".into();
        let page = standalone_page(&a);
        assert!(page.contains("src=\"a.png%22"));
        assert!(!page.contains("onerror=\""));
    }

    #[test]
    fn test_path_like_slug_is_rejected() {
        for slug in ["../../x", "a/b", "a\\b", ".."] {
            let text = format!("---\ntitle: T\ndate: D\nslug: '{slug}'\n---\nx");
            let err = build_article(Path::new("a.md"), &text, "Showcase").unwrap_err();
            assert!(matches!(err, BlogError::Frontmatter { .. }), "{slug}: {err:?}");
        }
    }

    #[test]
    fn test_build_collection_skips_escaping_slug() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("evil.md"),
            "---\ntitle: T\ndate: D\nslug: ../../escaped\n---\nx\n",
        )
        .unwrap();

        let config = BuildConfig {
            content_dir: content,
            output: dir.path().join("site/articles.json"),
            articles_dir: dir.path().join("site/pages"),
            generate_html: true,
            default_category: "Showcase".into(),
        };
        let report = build_collection(&config).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.total, 0);
        assert!(!dir.path().join("escaped.html").exists());
    }

    #[test]
    fn test_build_collection() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("01-box.md"), SOURCE).unwrap();
        fs::write(
            content.join("02-events.md"),
            "---\ntitle: Events\ndate: 2024-04-01\nslug: events\n---\nClick.\n",
        )
        .unwrap();
        fs::write(content.join("03-draft.md"), "---\ntitle: Draft\n---\nwip\n").unwrap();
        fs::write(content.join("notes.txt"), "ignored").unwrap();

        let output = dir.path().join("assets/articles.json");
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        let existing = vec![article("events", "2024-04-01", "Stale"), article("keep", "2020-01-01", "Keep")];
        fs::write(&output, serde_json::to_string(&existing).unwrap()).unwrap();

        let config = BuildConfig {
            content_dir: content,
            output: output.clone(),
            articles_dir: dir.path().join("assets/articles"),
            generate_html: true,
            default_category: "Showcase".into(),
        };
        let report = build_collection(&config).unwrap();

        assert_eq!(report.updated, 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].0.ends_with("03-draft.md"));
        assert_eq!(report.total, 3);

        let written: Vec<Article> =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let slugs: Vec<&str> = written.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["events", "box-model-2024-03-01", "keep"]);
        assert_eq!(written[0].title, "Events");

        assert!(dir.path().join("assets/articles/events.html").exists());
        assert!(dir.path().join("assets/articles/box-model-2024-03-01.html").exists());
    }

    #[test]
    fn test_build_collection_without_html_and_bad_existing() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("a.md"), SOURCE).unwrap();
        let output = dir.path().join("articles.json");
        fs::write(&output, "{\"not\": \"an array\"}").unwrap();

        let config = BuildConfig {
            content_dir: content,
            output: output.clone(),
            articles_dir: dir.path().join("pages"),
            generate_html: false,
            default_category: "Showcase".into(),
        };
        let report = build_collection(&config).unwrap();
        assert_eq!(report.total, 1);
        assert!(!dir.path().join("pages").exists());
    }

    #[test]
    fn test_missing_content_dir_writes_existing() {
        let dir = TempDir::new().unwrap();
        let config = BuildConfig {
            content_dir: dir.path().join("nope"),
            output: dir.path().join("out/articles.json"),
            articles_dir: dir.path().join("pages"),
            generate_html: true,
            default_category: "Showcase".into(),
        };
        let report = build_collection(&config).unwrap();
        assert_eq!(report, BuildReport::default());
        assert_eq!(fs::read_to_string(dir.path().join("out/articles.json")).unwrap(), "[]");
    }
}
