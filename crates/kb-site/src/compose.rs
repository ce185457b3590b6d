//! Page composition.
//!
//! Builds the markup of the main region for each route, the sidebar, and
//! the error screens. Authored text (names, titles, descriptions) is trusted
//! and emitted verbatim; identifiers placed in attributes are escaped.
//!
//! Interactive elements carry a `data-action` attribute naming the
//! navigator event they trigger (`select-subject` is `select_subject`), plus
//! `data-subject`, `data-chapter` or `data-ref` for its payload.

use std::fmt::Write;

use kb_renderer::{escape_html, render_into};

use crate::book::{ProgressBook, chapter_ref, subject_ref};
use crate::fragment::{section_anchor, subject_fragment};
use crate::model::{Metadata, Subject, SubjectEntry};
use crate::navigator::{LoadFailure, Route, Session};

/// Subjects listed per category card on the home page.
pub const HOME_PREVIEW: usize = 4;

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn subject_href(id: &str) -> String {
    escape_html(&format!("#{}", subject_fragment(id)))
}

/// Main region for the session's current route.
#[must_use]
pub fn compose_main(session: &Session) -> String {
    let subject = session.current_subject();
    match (session.route(), subject) {
        (Route::Home, _) => compose_home(session.metadata()),
        (Route::SubjectIndex { subject: id }, Some(doc)) => compose_subject(id, doc, session.book()),
        (Route::ChapterView { subject: id, chapter }, Some(doc)) => {
            compose_chapter(id, doc, *chapter, session.book())
        }
        (route, None) => {
            tracing::warn!(?route, "Subject route without a loaded subject");
            compose_home(session.metadata())
        }
    }
}

/// Sidebar: subject tree grouped by category, bookmarks and totals.
#[must_use]
pub fn compose_sidebar(session: &Session) -> String {
    let meta = session.metadata();
    let active = session.route().subject_id();
    let book = session.book();
    let mut out = String::new();

    write!(
        out,
        r#"<div class="sidebar-header"><div class="sidebar-logo"><span class="logo-icon">∑</span><div><div class="logo-title">KB</div><div class="logo-sub">v{}</div></div></div><button class="sidebar-toggle" data-action="toggle-sidebar" title="Toggle sidebar" aria-expanded="{}">☰</button></div>"#,
        escape_html(&meta.version),
        session.sidebar_open()
    )
    .unwrap();
    out.push_str(r#"<div class="sidebar-search-wrap"><input type="text" id="sidebar-search" class="sidebar-search" placeholder="🔍  Filter subjects…" autocomplete="off"></div>"#);

    out.push_str(r#"<nav class="sidebar-nav" id="sidebar-nav"><div class="sidebar-section home-item">"#);
    write!(
        out,
        r##"<a class="sidebar-item home-link{}" href="#" data-action="home"><span class="item-icon">🏠</span><span class="item-label">Home</span></a></div>"##,
        if active.is_none() { " active" } else { "" }
    )
    .unwrap();

    for category in &meta.categories {
        let mut subjects = meta.subjects_in(&category.id).peekable();
        if subjects.peek().is_none() {
            continue;
        }
        let cat_id = escape_html(&category.id);
        write!(
            out,
            r#"<div class="sidebar-section"><div class="sidebar-category" data-cat="{cat_id}"><span class="cat-icon">{}</span><span class="cat-name">{}</span><span class="cat-arrow">▾</span></div><ul class="sidebar-subjects" id="cat-{cat_id}">"#,
            category.icon, category.name
        )
        .unwrap();
        for entry in subjects {
            sidebar_subject(entry, active == Some(entry.id.as_str()), book, &mut out);
        }
        out.push_str("</ul></div>");
    }
    out.push_str("</nav>");

    if !book.bookmarks().is_empty() {
        out.push_str(r#"<div class="sidebar-bookmarks"><div class="sidebar-category"><span class="cat-icon">🔖</span><span class="cat-name">Bookmarks</span></div><ul class="bookmark-list">"#);
        for reference in book.bookmarks() {
            bookmark_item(meta, reference, &mut out);
        }
        out.push_str("</ul></div>");
    }

    write!(
        out,
        r#"<div class="sidebar-footer"><div class="stats-row"><span>📚 {}</span><span>📖 {}</span></div></div>"#,
        plural(meta.total_subjects as usize, "subject"),
        plural(meta.total_chapters as usize, "chapter")
    )
    .unwrap();
    out
}

fn sidebar_subject(entry: &SubjectEntry, active: bool, book: &ProgressBook, out: &mut String) {
    write!(
        out,
        r#"<li><a class="sidebar-item subject-link{}" href="{}" data-action="select-subject" data-subject="{}"><span class="item-label">{}</span><span class="item-badge">{}ch</span></a>"#,
        if active { " active" } else { "" },
        subject_href(&entry.id),
        escape_html(&entry.id),
        entry.name,
        entry.chapters
    )
    .unwrap();
    if let Some(pct) = book.percent(&entry.id).filter(|&p| p > 0) {
        write!(
            out,
            r#"<div class="progress-mini" title="{pct}% read"><div style="width:{pct}%"></div></div>"#
        )
        .unwrap();
    }
    out.push_str("</li>");
}

fn bookmark_item(meta: &Metadata, reference: &str, out: &mut String) {
    let mut parts = reference.split('/');
    let (subject, chapter) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("subject"), Some(id), None, None) => (meta.subject(id), None),
        (Some("subject"), Some(id), Some("chapter"), Some(n)) => {
            (meta.subject(id), n.parse::<usize>().ok())
        }
        _ => (None, None),
    };

    let Some(entry) = subject else {
        write!(
            out,
            r#"<li><span class="sidebar-item bookmark-stale">{}</span></li>"#,
            escape_html(reference)
        )
        .unwrap();
        return;
    };

    write!(
        out,
        r#"<li><a class="sidebar-item bookmark-link" href="{}" data-action="select-subject" data-subject="{}""#,
        subject_href(&entry.id),
        escape_html(&entry.id)
    )
    .unwrap();
    match chapter {
        Some(index) => write!(
            out,
            r#" data-chapter="{index}"><span class="item-label">{} · Chapter {}</span></a></li>"#,
            entry.name,
            index + 1
        )
        .unwrap(),
        None => write!(out, r#"><span class="item-label">{}</span></a></li>"#, entry.name).unwrap(),
    }
}

/// Home page: hero with totals and one card per category.
#[must_use]
pub fn compose_home(meta: &Metadata) -> String {
    let mut out = String::new();

    write!(
        out,
        r#"<div class="home-wrap"><div class="home-hero"><div class="home-hero-badge">Knowledge Base</div><h1 class="home-title">KB</h1><p class="home-desc">{}</p><div class="home-stats"><div class="stat-item"><span class="stat-num">{}</span><span class="stat-label">Subjects</span></div><div class="stat-item"><span class="stat-num">{}</span><span class="stat-label">Chapters</span></div></div></div>"#,
        meta.description, meta.total_subjects, meta.total_chapters
    )
    .unwrap();
    out.push_str(r#"<div class="home-search-wrap"><input type="text" class="home-search-input" id="home-search" placeholder="🔍  Search subjects…" autocomplete="off"><div class="home-search-results" id="home-search-results"></div></div>"#);
    out.push_str(r#"<h2 class="home-section-title">All subjects</h2><div class="home-cat-grid">"#);

    for category in &meta.categories {
        let subjects: Vec<_> = meta.subjects_in(&category.id).collect();
        write!(
            out,
            r#"<div class="home-cat-card" style="border-top-color:{}"><div class="home-cat-icon">{}</div><div class="home-cat-name">{}</div><div class="home-cat-count">{}</div><ul class="home-cat-subjects">"#,
            escape_html(&category.color),
            category.icon,
            category.name,
            plural(subjects.len(), "subject")
        )
        .unwrap();
        for entry in subjects.iter().take(HOME_PREVIEW) {
            write!(
                out,
                r#"<li><a href="{}" class="home-subj-link" data-action="select-subject" data-subject="{}">{}</a></li>"#,
                subject_href(&entry.id),
                escape_html(&entry.id),
                entry.name
            )
            .unwrap();
        }
        if subjects.len() > HOME_PREVIEW {
            write!(
                out,
                r#"<li class="more-link">+{} more</li>"#,
                subjects.len() - HOME_PREVIEW
            )
            .unwrap();
        }
        out.push_str("</ul></div>");
    }

    out.push_str("</div></div>");
    out
}

/// Result list for the home search box.
#[must_use]
pub fn compose_search_results(results: &[&SubjectEntry]) -> String {
    if results.is_empty() {
        return r#"<div class="search-empty">No matching subjects</div>"#.to_owned();
    }
    let mut out = String::from(r#"<ul class="search-results">"#);
    for entry in results {
        write!(
            out,
            r#"<li><a href="{}" class="search-result" data-action="select-subject" data-subject="{}">{}</a></li>"#,
            subject_href(&entry.id),
            escape_html(&entry.id),
            entry.name
        )
        .unwrap();
    }
    out.push_str("</ul>");
    out
}

fn bookmark_button(reference: &str, book: &ProgressBook, out: &mut String) {
    let (class, action, icon, title) = if book.has_bookmark(reference) {
        ("btn-bookmark active", "remove-bookmark", "🔖", "Remove bookmark")
    } else {
        ("btn-bookmark", "add-bookmark", "☆", "Bookmark")
    };
    write!(
        out,
        r#"<button class="{class}" data-action="{action}" data-ref="{}" title="{title}">{icon}</button>"#,
        escape_html(reference)
    )
    .unwrap();
}

/// Subject index: chapter cards with section counts.
#[must_use]
pub fn compose_subject(id: &str, subject: &Subject, book: &ProgressBook) -> String {
    let mut out = String::new();

    write!(
        out,
        r##"<div class="subject-wrap"><div class="subject-header"><a class="back-btn" href="#" data-action="home">← Home</a><div class="subject-title-wrap"><h1 class="subject-title">{}</h1><p class="subject-subtitle">{}</p></div>"##,
        subject.title,
        subject.subtitle.as_deref().unwrap_or_default()
    )
    .unwrap();
    bookmark_button(&subject_ref(id), book, &mut out);
    out.push_str(r#"</div><div class="chapter-list" id="chapter-list">"#);

    for (i, chapter) in subject.chapters.iter().enumerate() {
        write!(
            out,
            r#"<div class="chapter-card{}" data-chapter="{i}"><div class="chapter-num">Ch.{}</div><div class="chapter-info"><div class="chapter-title">{}</div><div class="chapter-meta">{}</div></div><button class="btn-open-chapter" data-action="open-chapter" data-chapter="{i}">Open →</button></div>"#,
            if book.is_done(id, i) { " done" } else { "" },
            chapter.number,
            chapter.title,
            plural(chapter.sections.len(), "section")
        )
        .unwrap();
    }

    out.push_str("</div></div>");
    out
}

/// Chapter page: breadcrumb, header, rendered sections, prev/next and TOC.
///
/// An out-of-range `index` yields the subject index instead.
#[must_use]
pub fn compose_chapter(id: &str, subject: &Subject, index: usize, book: &ProgressBook) -> String {
    let Some(chapter) = subject.chapter(index) else {
        return compose_subject(id, subject, book);
    };
    let prev = index.checked_sub(1).and_then(|i| subject.chapter(i));
    let next = subject.chapter(index + 1);
    let mut out = String::new();

    write!(
        out,
        r#"<div class="chapter-wrap"><div class="chapter-content"><div class="chapter-breadcrumb"><a href="{}" class="back-btn" data-action="back-to-subject">← {}</a><span class="breadcrumb-sep">›</span><span>Ch.{} {}</span></div>"#,
        subject_href(id),
        subject.title,
        chapter.number,
        chapter.title
    )
    .unwrap();

    write!(
        out,
        r#"<div class="chapter-header"><div class="chapter-header-num">Chapter {}</div><h1 class="chapter-header-title">{}</h1>"#,
        chapter.number, chapter.title
    )
    .unwrap();
    if let Some(subtitle) = chapter.subtitle.as_deref().filter(|s| !s.is_empty()) {
        write!(out, r#"<p class="chapter-header-sub">{subtitle}</p>"#).unwrap();
    }
    bookmark_button(&chapter_ref(id, index), book, &mut out);
    out.push_str(r#"</div><div class="chapter-body">"#);

    for (si, section) in chapter.sections.iter().enumerate() {
        write!(
            out,
            r#"<section class="section-block" id="{}"><h3 class="section-title">{} {}</h3>"#,
            section_anchor(index, si),
            section.id,
            section.title
        )
        .unwrap();
        for block in &section.content {
            render_into(block, &mut out);
        }
        out.push_str("</section>");
    }

    out.push_str(r#"</div><div class="chapter-nav">"#);
    match prev {
        Some(ch) => write!(
            out,
            r#"<button class="btn-chapter-nav prev" data-action="prev-chapter">← Ch.{} {}</button>"#,
            ch.number, ch.title
        )
        .unwrap(),
        None => out.push_str(
            r#"<button class="btn-chapter-nav prev" data-action="prev-chapter" disabled>← First chapter</button>"#,
        ),
    }
    match next {
        Some(ch) => write!(
            out,
            r#"<button class="btn-chapter-nav next" data-action="next-chapter">Ch.{} {} →</button>"#,
            ch.number, ch.title
        )
        .unwrap(),
        None => out.push_str(
            r#"<button class="btn-chapter-nav next" data-action="next-chapter" disabled>Last chapter →</button>"#,
        ),
    }
    out.push_str("</div></div>");

    out.push_str(r#"<aside class="chapter-toc"><div class="toc-title">Contents</div><ul class="toc-list">"#);
    for (si, section) in chapter.sections.iter().enumerate() {
        write!(
            out,
            r##"<li><a class="toc-link" href="#{}">{} {}</a></li>"##,
            section_anchor(index, si),
            section.id,
            section.title
        )
        .unwrap();
    }
    out.push_str("</ul></aside></div>");
    out
}

/// Inline error shown in place of content when a subject fails to load.
#[must_use]
pub fn compose_load_error(failure: &LoadFailure) -> String {
    format!(
        r#"<div class="error-wrap"><div class="error-icon">⚠️</div><div class="error-msg">Could not load subject data.<br><small>File path: {}</small><br><small>{}</small></div><button class="btn-primary" data-action="home">Back to home</button></div>"#,
        escape_html(&failure.path),
        escape_html(&failure.message)
    )
}

/// Full-page error for a session that could not start.
#[must_use]
pub fn compose_fatal(message: &str) -> String {
    format!(
        r#"<div class="error-wrap fatal"><div class="error-icon">⚠️</div><div class="error-msg">{}</div></div>"#,
        escape_html(message)
    )
}
