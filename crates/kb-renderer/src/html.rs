//! HTML rendering of content blocks.
//!
//! One function per variant, all appending to a shared output buffer. The
//! dispatcher in [`render_into`] is an exhaustive match, so adding a variant
//! to [`ContentBlock`] without a renderer is a compile error.

use std::fmt::Write;

use crate::block::{
    Admonition, Analogy, Callout, Compare, CompareSide, ContentBlock, Definition, Example,
    Formula, FormulaGrid, NoteCard, Proof, ProofStep, Steps, Table, Theorem,
};
use crate::util::{escape_html, math_display};

/// Column count used by `formula-grid` when none is given.
pub const DEFAULT_GRID_COLUMNS: u32 = 2;

/// Render a single block to an HTML fragment.
#[must_use]
pub fn render(block: &ContentBlock) -> String {
    let mut out = String::new();
    render_into(block, &mut out);
    out
}

/// Render a sequence of blocks, concatenated in order.
#[must_use]
pub fn render_all(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        render_into(block, &mut out);
    }
    out
}

/// Render a single block, appending to `out`.
pub fn render_into(block: &ContentBlock, out: &mut String) {
    match block {
        ContentBlock::NoteCard(b) => note_card(b, out),
        ContentBlock::Formula(b) => formula(b, out),
        ContentBlock::FormulaGrid(b) => formula_grid(b, out),
        ContentBlock::Proof(b) => proof(b, out),
        ContentBlock::Table(b) => table(b, out),
        ContentBlock::Analogy(b) => analogy(b, out),
        ContentBlock::Example(b) => example(b, out),
        ContentBlock::Definition(b) => definition(b, out),
        ContentBlock::Theorem(b) => theorem(b, out),
        ContentBlock::Warning(b) => admonition("warning", "⚠️", b, out),
        ContentBlock::Tip(b) => admonition("tip", "💡", b, out),
        ContentBlock::Compare(b) => compare(b, out),
        ContentBlock::Steps(b) => steps(b, out),
        ContentBlock::Callout(b) => callout(b, out),
        ContentBlock::RawHtml(b) => out.push_str(b.body.as_deref().unwrap_or_default()),
        ContentBlock::Unknown { tag } => unknown(tag, out),
        ContentBlock::Malformed { tag, message } => malformed(tag, message, out),
    }
}

/// Icon shown by a `callout` for its `variant`. Unrecognized or absent
/// variants fall back to the `info` icon.
#[must_use]
pub fn callout_icon(variant: Option<&str>) -> &'static str {
    match variant {
        Some("success") => "✅",
        Some("danger") => "🚨",
        Some("formula") => "📐",
        _ => "📌",
    }
}

/// Treat empty strings like absent fields.
fn present(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.is_empty())
}

/// Append `<div class="{class}">{text}</div>` when `text` is present.
fn optional_div(class: &str, text: Option<&String>, out: &mut String) {
    if let Some(text) = present(text) {
        write!(out, r#"<div class="{class}">{text}</div>"#).unwrap();
    }
}

/// Append a display-math div when `latex` is present.
fn optional_math(class: &str, latex: Option<&String>, out: &mut String) {
    if let Some(latex) = present(latex) {
        write!(out, r#"<div class="{class}">{}</div>"#, math_display(latex)).unwrap();
    }
}

fn note_card(b: &NoteCard, out: &mut String) {
    match present(b.class.as_ref()) {
        Some(class) => write!(out, r#"<div class="note-card {class}">"#).unwrap(),
        None => out.push_str(r#"<div class="note-card">"#),
    }
    optional_div("note-label", b.label.as_ref(), out);
    optional_div("note-title", b.title.as_ref(), out);
    write!(
        out,
        r#"<div class="note-body">{}</div></div>"#,
        b.body.as_deref().unwrap_or_default()
    )
    .unwrap();
}

fn formula(b: &Formula, out: &mut String) {
    out.push_str(r#"<div class="formula-box">"#);
    optional_div("formula-name", b.name.as_ref(), out);
    write!(
        out,
        r#"<div class="formula-display">{}</div>"#,
        math_display(b.latex.as_deref().unwrap_or_default())
    )
    .unwrap();
    optional_div("formula-desc", b.description.as_ref(), out);
    if let Some(note) = present(b.note.as_ref()) {
        write!(out, r#"<div class="formula-note">💡 {note}</div>"#).unwrap();
    }
    out.push_str("</div>");
}

fn formula_grid(b: &FormulaGrid, out: &mut String) {
    let cols = b.cols.filter(|&c| c > 0).unwrap_or(DEFAULT_GRID_COLUMNS);

    out.push_str(r#"<div class="formula-grid-wrap">"#);
    optional_div("formula-grid-title", b.title.as_ref(), out);
    write!(
        out,
        r#"<div class="formula-grid cols-{cols}" style="grid-template-columns: repeat({cols}, minmax(0, 1fr))">"#
    )
    .unwrap();
    for item in &b.items {
        out.push_str(r#"<div class="formula-grid-item">"#);
        optional_div("fg-name", item.name.as_ref(), out);
        write!(
            out,
            r#"<div class="fg-latex">{}</div>"#,
            math_display(item.latex.as_deref().unwrap_or_default())
        )
        .unwrap();
        optional_div("fg-desc", item.desc.as_ref(), out);
        out.push_str("</div>");
    }
    out.push_str("</div></div>");
}

fn proof(b: &Proof, out: &mut String) {
    out.push_str(r#"<div class="proof-block"><div class="proof-header"><span class="proof-icon">∴</span>"#);
    match present(b.title.as_ref()) {
        Some(title) => write!(out, r#"<span class="proof-title">{title}</span>"#).unwrap(),
        None => out.push_str("Proof"),
    }
    out.push_str(r#"</div><div class="proof-body">"#);

    for (i, step) in b.steps.iter().enumerate() {
        match step {
            ProofStep::Text(text) => {
                write!(out, r#"<div class="proof-step">{text}</div>"#).unwrap();
            }
            ProofStep::Detailed { step, latex } => {
                out.push_str(r#"<div class="proof-step">"#);
                if let Some(label) = present(step.as_ref()) {
                    write!(
                        out,
                        r#"<span class="proof-label">Step {}.</span> {label}"#,
                        i + 1
                    )
                    .unwrap();
                }
                optional_math("proof-latex", latex.as_ref(), out);
                out.push_str("</div>");
            }
        }
    }

    out.push_str(r#"</div><div class="proof-qed">□</div></div>"#);
}

fn table(b: &Table, out: &mut String) {
    out.push_str(r#"<div class="table-wrap">"#);
    optional_div("table-title", b.title.as_ref(), out);
    out.push_str(r#"<div class="table-scroll"><table class="wiki-table">"#);

    if !b.headers.is_empty() {
        out.push_str("<thead><tr>");
        for header in &b.headers {
            write!(out, "<th>{header}</th>").unwrap();
        }
        out.push_str("</tr></thead>");
    }

    out.push_str("<tbody>");
    for row in &b.rows {
        out.push_str("<tr>");
        for cell in row {
            write!(out, "<td>{cell}</td>").unwrap();
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table></div></div>");
}

fn analogy(b: &Analogy, out: &mut String) {
    write!(
        out,
        r#"<div class="analogy-block"><div class="analogy-icon">{}</div><div class="analogy-content">"#,
        present(b.emoji.as_ref()).unwrap_or("💡")
    )
    .unwrap();
    optional_div("analogy-title", b.title.as_ref(), out);
    write!(
        out,
        r#"<div class="analogy-body">{}</div></div></div>"#,
        b.body.as_deref().unwrap_or_default()
    )
    .unwrap();
}

fn example(b: &Example, out: &mut String) {
    out.push_str(r#"<div class="example-block"><div class="example-header">Example"#);
    if let Some(title) = present(b.title.as_ref()) {
        write!(out, ": {title}").unwrap();
    }
    out.push_str("</div>");

    if let Some(problem) = present(b.problem.as_ref()) {
        write!(
            out,
            r#"<div class="example-problem"><strong>Problem.</strong> {problem}</div>"#
        )
        .unwrap();
    }
    if let Some(solution) = present(b.solution.as_ref()) {
        write!(
            out,
            r#"<details class="example-solution"><summary>Show solution</summary><div class="solution-body">{solution}</div></details>"#
        )
        .unwrap();
    }
    if let Some(answer) = present(b.answer.as_ref()) {
        write!(
            out,
            r#"<div class="example-answer">∴ <strong>{answer}</strong></div>"#
        )
        .unwrap();
    }
    out.push_str("</div>");
}

fn definition(b: &Definition, out: &mut String) {
    out.push_str(r#"<div class="definition-block"><div class="def-label">Definition</div>"#);
    optional_div("def-term", b.term.as_ref(), out);
    optional_math("def-latex", b.latex.as_ref(), out);
    optional_div("def-body", b.body.as_ref(), out);
    out.push_str("</div>");
}

fn theorem(b: &Theorem, out: &mut String) {
    out.push_str(r#"<div class="theorem-block"><div class="theorem-label">Theorem"#);
    if let Some(name) = present(b.name.as_ref()) {
        write!(out, ": {name}").unwrap();
    }
    out.push_str("</div>");
    optional_div("theorem-statement", b.statement.as_ref(), out);
    optional_math("theorem-latex", b.latex.as_ref(), out);
    if let Some(proof) = present(b.proof.as_ref()) {
        write!(
            out,
            r#"<details class="theorem-proof"><summary>Show proof</summary><div class="proof-content">{proof}</div></details>"#
        )
        .unwrap();
    }
    out.push_str("</div>");
}

/// Shared layout of `warning` and `tip`.
fn admonition(kind: &str, icon: &str, b: &Admonition, out: &mut String) {
    write!(
        out,
        r#"<div class="{kind}-block"><span class="{kind}-icon">{icon}</span><div class="{kind}-content">"#
    )
    .unwrap();
    if let Some(title) = present(b.title.as_ref()) {
        write!(out, r#"<div class="{kind}-title">{title}</div>"#).unwrap();
    }
    write!(
        out,
        r#"<div class="{kind}-body">{}</div></div></div>"#,
        b.body.as_deref().unwrap_or_default()
    )
    .unwrap();
}

fn compare(b: &Compare, out: &mut String) {
    out.push_str(r#"<div class="compare-block">"#);
    optional_div("compare-title", b.title.as_ref(), out);
    out.push_str(r#"<div class="compare-grid">"#);
    compare_column(b.left.as_ref(), "A", out);
    out.push_str(r#"<div class="compare-divider">vs</div>"#);
    compare_column(b.right.as_ref(), "B", out);
    out.push_str("</div></div>");
}

fn compare_column(side: Option<&CompareSide>, default_label: &str, out: &mut String) {
    let label = side
        .and_then(|s| present(s.label.as_ref()))
        .unwrap_or(default_label);
    write!(
        out,
        r#"<div class="compare-col"><div class="compare-label">{label}</div><ul class="compare-list">"#
    )
    .unwrap();
    for item in side.map(|s| s.items.as_slice()).unwrap_or_default() {
        write!(out, "<li>{item}</li>").unwrap();
    }
    out.push_str("</ul></div>");
}

fn steps(b: &Steps, out: &mut String) {
    out.push_str(r#"<div class="steps-block">"#);
    optional_div("steps-title", b.title.as_ref(), out);
    out.push_str(r#"<div class="steps-list">"#);

    for (i, item) in b.steps.iter().enumerate() {
        out.push_str(r#"<div class="step-item"><div class="step-num">"#);
        match item.num.as_ref().filter(|n| !n.is_blank()) {
            Some(num) => write!(out, "{num}").unwrap(),
            None => write!(out, "{}", i + 1).unwrap(),
        }
        out.push_str(r#"</div><div class="step-content">"#);
        optional_div("step-label", item.label.as_ref(), out);
        write!(
            out,
            r#"<div class="step-body">{}</div>"#,
            item.body.as_deref().unwrap_or_default()
        )
        .unwrap();
        optional_math("step-latex", item.latex.as_ref(), out);
        out.push_str("</div></div>");
    }

    out.push_str("</div></div>");
}

fn callout(b: &Callout, out: &mut String) {
    let variant = present(b.variant.as_ref());
    write!(
        out,
        r#"<div class="callout-block callout-{}"><span class="callout-icon">{}</span><div class="callout-content">"#,
        variant.unwrap_or("info"),
        callout_icon(variant)
    )
    .unwrap();
    optional_div("callout-title", b.title.as_ref(), out);
    write!(
        out,
        r#"<div class="callout-body">{}</div></div></div>"#,
        b.body.as_deref().unwrap_or_default()
    )
    .unwrap();
}

fn unknown(tag: &str, out: &mut String) {
    tracing::warn!(tag = %tag, "Unknown content block type");
    let shown = if tag.is_empty() {
        "(missing type)".to_owned()
    } else {
        escape_html(tag)
    };
    write!(out, r#"<div class="unknown-block">[Unknown: {shown}]</div>"#).unwrap();
}

fn malformed(tag: &str, message: &str, out: &mut String) {
    tracing::warn!(tag = %tag, error = %message, "Malformed content block");
    write!(
        out,
        r#"<div class="unknown-block malformed-block">[Malformed {}: {}]</div>"#,
        escape_html(tag),
        escape_html(message)
    )
    .unwrap();
}
