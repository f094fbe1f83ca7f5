//! # HTML Templating and Response Helpers
//!
//! A single page layout rendered with the `handlebars` crate, plus helpers to
//! wrap content in it and turn results into `actix_web::HttpResponse`s.

use actix_web::{HttpResponse, Responder};
use anyhow::Result;
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde_json::json;

/// A lazily-initialized, global instance of the Handlebars templating engine.
static ENGINE: Lazy<Handlebars> = Lazy::new(new_engine);

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1.0,user-scalable=yes">
<title>{{title}}</title>
<link rel="stylesheet" type="text/css" href="/static/style.css">
</head>
<body>
<nav>
<ul>
<li><a href="/leaderboard">Leaderboard</a></li>
<li><a href="/leaderboard.json">JSON</a></li>
</ul>
</nav>
<main>
<article>
{{{contents}}}
</article>
</main>
</body>
</html>"#;

/// Creates and configures a new `Handlebars` engine with the "main" layout.
///
/// `{{title}}` is escaped by handlebars; `{{{contents}}}` is inserted verbatim.
pub fn new_engine() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("main", LAYOUT)
        .expect("layout template must parse");
    handlebars
}

/// Escapes HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            '/' => "&#x2F;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Renders the given content string into the main HTML layout.
pub fn render(title: &str, contents: &str) -> Result<String> {
    Ok(ENGINE.render(
        "main",
        &json!({
            "title": title,
            "contents": contents,
        }),
    )?)
}

/// Creates an HTML response for displaying an `anyhow::Error`.
///
/// The error chain is formatted within a `<pre>` block inside the main page layout.
pub fn to_error_response(result: &anyhow::Error) -> HttpResponse {
    let contents = format!(
        "<h1>Error</h1><pre><code>{}</code></pre>",
        escape_html(&format!("{:?}", result))
    );
    let body = render("Error", &contents).unwrap_or(contents);
    HttpResponse::InternalServerError()
        .content_type("text/html")
        .body(body)
}

/// Creates a standard HTML `Ok` response from a title and page contents.
pub fn to_html_response(title: &str, contents: &str) -> HttpResponse {
    match render(title, contents) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => to_error_response(&e),
    }
}

/// Converts a `Result` of `(title, contents)` into an appropriate HTML response.
pub fn to_response(result: Result<(String, String)>) -> impl Responder {
    match result {
        Ok((title, contents)) => to_html_response(&title, &contents),
        Err(e) => {
            tracing::error!("request failed: {:#}", e);
            to_error_response(&e)
        }
    }
}
