use pulldown_cmark::{html, Event, Parser, Tag};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::Result;
use crate::app::filter::{FilterMode, IssueItem, Page, VisibilityFilter};
use crate::config::RepoRef;
use crate::data::{Activity, Commit, Issue};

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
#toggleButton { display: inline-block; padding: 0.4rem 0.8rem; border: 1px solid #888; border-radius: 4px; text-decoration: none; color: inherit; }
#issuesList { list-style: none; padding: 0; }
.issue-item { display: block; padding: 0.5rem 0; border-bottom: 1px solid #ddd; }
.linked-prs { margin: 0.25rem 0 0 1.5rem; font-size: 0.9em; color: #555; }
.linked-prs .merged { color: #8250df; }
code { background: #f3f3f3; padding: 0 0.2em; }
#commitList, #activityList { padding-left: 1.5rem; }
.commit, .activity { padding: 0.5rem 0; border-bottom: 1px solid #ddd; }
.commit .meta, .activity time { color: #555; font-size: 0.9em; }
.commit .pull-request, .commit .issue { margin-left: 1rem; font-size: 0.9em; }
.pull-request.merged { color: #8250df; }";

/// File a page for `mode` is written to.
pub fn page_file(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::AllShown => "index.html",
        FilterMode::OnlyMergedShown => "merged.html",
    }
}

/// Build the page for `issues`, filter it to `mode`, and serialize it.
pub fn render_page(repo: &RepoRef, issues: &[Issue], mode: FilterMode) -> String {
    let mut page = Page::new(issues.iter().cloned());
    if let Some(mut filter) = VisibilityFilter::attach(&mut page) {
        filter.set_mode(mode);
    }
    render_document(repo, &page)
}

/// Serialize a page. The toggle control links to the page for the mode it
/// switches to, so the static site toggles without scripting.
pub fn render_document(repo: &RepoRef, page: &Page) -> String {
    let mut out = open_document(repo, "Issues", "Issues for");

    if let Some(control) = &page.toggle_control {
        let target = page_file(control.mode().toggled());
        out.push_str(&format!(
            "<a id=\"toggleButton\" href=\"{target}\">{}</a>\n",
            control.label()
        ));
    }

    if let Some(list) = &page.issue_list {
        out.push_str("<ul id=\"issuesList\">\n");
        for item in &list.items {
            render_item(&mut out, item);
        }
        out.push_str("</ul>\n");
    }

    close_document(out)
}

fn open_document(repo: &RepoRef, title: &str, heading: &str) -> String {
    let repo_text = escape_html(&repo.to_string());
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title} · {repo_text}</title>\n"));
    out.push_str(&format!("<style>\n{STYLE}\n</style>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{heading} {repo_text}</h1>\n"));
    out
}

fn close_document(mut out: String) -> String {
    out.push_str("</body>\n</html>\n");
    out
}

fn render_item(out: &mut String, item: &IssueItem) {
    let style = if item.is_visible() {
        ""
    } else {
        " style=\"display: none\""
    };
    out.push_str(&format!(
        "  <li class=\"issue-item\" data-has-merged-pr=\"{}\"{style}>\n",
        escape_html(&item.has_merged_pr)
    ));

    let issue = &item.issue;
    let title = render_inline_markdown(&issue.title);
    match (&issue.url, issue.number) {
        (Some(url), Some(number)) => out.push_str(&format!(
            "    <a href=\"{}\">#{number}</a> <span class=\"title\">{title}</span>\n",
            escape_html(url)
        )),
        (None, Some(number)) => out.push_str(&format!(
            "    #{number} <span class=\"title\">{title}</span>\n"
        )),
        _ => out.push_str(&format!("    <span class=\"title\">{title}</span>\n")),
    }

    if !issue.linked_pull_requests.is_empty() {
        out.push_str("    <ul class=\"linked-prs\">\n");
        for pr in &issue.linked_pull_requests {
            let class = if pr.merged { "merged" } else { "open" };
            out.push_str(&format!(
                "      <li class=\"{class}\">#{} {}</li>\n",
                pr.number,
                render_inline_markdown(&pr.title)
            ));
        }
        out.push_str("    </ul>\n");
    }

    out.push_str("  </li>\n");
}

/// Serialize the commit history, one entry per commit with the pull request
/// it landed through and the issue that closed.
pub fn render_commits_page(repo: &RepoRef, commits: &[Commit]) -> String {
    let mut out = open_document(repo, "Commits", "Commits to");

    out.push_str("<ol id=\"commitList\">\n");
    for commit in commits {
        out.push_str("  <li class=\"commit\">\n");
        out.push_str(&format!(
            "    <code title=\"{}\">{}</code> <span class=\"message\">{}</span>\n",
            escape_html(&commit.oid),
            escape_html(commit.short_oid()),
            render_inline_markdown(&commit.headline)
        ));

        let meta: Vec<String> = [&commit.author, &commit.committed_date]
            .into_iter()
            .flatten()
            .map(|s| escape_html(s))
            .collect();
        if !meta.is_empty() {
            out.push_str(&format!(
                "    <div class=\"meta\">{}</div>\n",
                meta.join(" · ")
            ));
        }

        if let Some(pr) = &commit.pull_request {
            let (class, state) = if pr.merged {
                ("merged", "merged")
            } else {
                ("open", "not merged")
            };
            let by = pr
                .author
                .as_deref()
                .map(|login| format!(" by {}", escape_html(login)))
                .unwrap_or_default();
            out.push_str(&format!(
                "    <div class=\"pull-request {class}\"><a href=\"{}\">#{}</a> {}{by} ({state})</div>\n",
                escape_html(&pr.url),
                pr.number,
                render_inline_markdown(&pr.title)
            ));

            if let Some(issue) = &pr.closes {
                out.push_str(&format!(
                    "    <div class=\"issue\">Closes <a href=\"{}\">#{}</a> {}</div>\n",
                    escape_html(&issue.url),
                    issue.number,
                    render_inline_markdown(&issue.title)
                ));
            }
        }
        out.push_str("  </li>\n");
    }
    out.push_str("</ol>\n");

    close_document(out)
}

/// Serialize the activity summary in the order given.
pub fn render_summary_page(repo: &RepoRef, entries: &[Activity]) -> String {
    let mut out = open_document(repo, "Activity", "Activity in");

    out.push_str("<ol id=\"activityList\">\n");
    for entry in entries {
        let time = entry.created_at.as_deref().map(escape_html).unwrap_or_default();
        let title = render_inline_markdown(&entry.title);
        let title = match &entry.url {
            Some(url) => format!("<a href=\"{}\">{title}</a>", escape_html(url)),
            None => title,
        };
        out.push_str(&format!(
            "  <li class=\"activity\"><time>{time}</time> <span class=\"kind\">{}</span> {title}</li>\n",
            entry.kind.label()
        ));
    }
    out.push_str("</ol>\n");

    close_document(out)
}

/// Write `contents` to `path`, creating its directory if needed.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, contents)?;
    info!(path = %path.display(), "Wrote file");
    Ok(())
}

/// Write `index.html` and `merged.html` into `dir`.
pub fn write_site(dir: &Path, repo: &RepoRef, issues: &[Issue]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for mode in [FilterMode::AllShown, FilterMode::OnlyMergedShown] {
        let path = dir.join(page_file(mode));
        fs::write(&path, render_page(repo, issues, mode))?;
        info!(path = %path.display(), ?mode, "Wrote page");
        written.push(path);
    }
    Ok(written)
}

/// Render a title as inline Markdown. Block structure is flattened, raw
/// HTML is shown as text, links keep only their text and images only their
/// alt text.
pub fn render_inline_markdown(text: &str) -> String {
    // Tracks, per open tag, whether it was dropped.
    let mut open_dropped: Vec<bool> = Vec::new();
    let events = Parser::new(text).filter_map(|event| match event {
        Event::Start(tag) => {
            let dropped = is_dropped(&tag);
            open_dropped.push(dropped);
            (!dropped).then_some(Event::Start(tag))
        }
        Event::End(tag) => {
            let dropped = open_dropped.pop().unwrap_or(false);
            (!dropped).then_some(Event::End(tag))
        }
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::SoftBreak | Event::HardBreak => Some(Event::Text(" ".into())),
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out.trim().to_string()
}

fn is_dropped(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Link { .. }
            | Tag::Image { .. }
            | Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::BlockQuote(_)
            | Tag::CodeBlock(_)
            | Tag::List(_)
            | Tag::Item
            | Tag::HtmlBlock
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
