//! Shell page.
//!
//! `GET /` returns the full page: sidebar and main region as currently
//! composed by the viewer, plus the stylesheet and client script. When the
//! viewer could not start, the page carries the fatal error instead and no
//! script.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use kb_site::{MAIN_REGION, View, compose_fatal};

use crate::middleware::security::MATHJAX_ORIGIN;
use crate::state::{AppState, Session};

const TITLE: &str = "Knowledge Base";

/// Handle GET /.
pub(crate) async fn get_shell(State(state): State<Arc<AppState>>) -> Response {
    match &state.session {
        Session::Ready(viewer) => {
            let view = viewer.lock().unwrap().view().clone();
            Html(render_shell(&view)).into_response()
        }
        Session::Failed(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_fatal(message)),
        )
            .into_response(),
    }
}

fn head(out: &mut String, with_scripts: bool) {
    write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{TITLE}</title><link rel="stylesheet" href="/assets/{}">"#,
        kb_assets::STYLESHEET
    )
    .unwrap();
    if with_scripts {
        write!(
            out,
            r#"<script defer src="/assets/{}"></script><script defer src="{MATHJAX_ORIGIN}/npm/mathjax@3/es5/tex-chtml.js"></script>"#,
            kb_assets::SCRIPT
        )
        .unwrap();
    }
    out.push_str("</head>");
}

fn render_shell(view: &View) -> String {
    let mut out = String::new();
    head(&mut out, true);
    write!(
        out,
        r#"<body class="{}"><aside id="sidebar">{}</aside><main id="{MAIN_REGION}">{}</main></body></html>"#,
        if view.sidebar_open { "" } else { "sidebar-collapsed" },
        view.sidebar,
        view.main
    )
    .unwrap();
    out
}

fn render_fatal(message: &str) -> String {
    let mut out = String::new();
    head(&mut out, false);
    write!(
        out,
        r#"<body><main id="{MAIN_REGION}">{}</main></body></html>"#,
        compose_fatal(message)
    )
    .unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_page_has_no_script() {
        let html = render_fatal("Cannot load metadata: gone");

        assert!(html.contains("Cannot load metadata: gone"));
        assert!(html.contains("/assets/style.css"));
        assert!(!html.contains("app.js"));
    }
}
