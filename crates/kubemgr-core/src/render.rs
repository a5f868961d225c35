//! HTML rendering of the namespaces index page.
//!
//! The markup carries the hooks the browser-side filter (`/static/js/app.js`)
//! looks for: `#ns-search`, `#ns-grid`, `.tile` and `.tile__title`. Tiles hidden
//! by a server-side filter pass are emitted with `style="display:none"` so the
//! first paint already matches the query.
//!
//! Each tile links to `/namespaces/<name>`, which lists the namespace's files;
//! files themselves are served under `/out/<name>/<path>`.

use std::fmt::Write;

use crate::page::Page;
use crate::tile::Tile;

/// Data for the index page.
pub struct IndexPage<'a> {
    pub title: &'a str,
    pub route: &'a str,
    pub heading: &'a str,
    pub subheading: &'a str,
    pub page: &'a Page,
}

impl IndexPage<'_> {
    pub fn render(&self) -> String {
        let mut body = String::new();
        self.write_body(&mut body)
            .expect("writing to a String cannot fail");
        layout(self.title, self.route, &body)
    }

    fn write_body(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, r#"<header class="page-header">"#)?;
        writeln!(out, "  <h1>{}</h1>", escape(self.heading))?;
        writeln!(out, "  <p class=\"subheading\">{}</p>", escape(self.subheading))?;
        writeln!(out, "</header>")?;

        if let Some(input) = self.page.search_input() {
            writeln!(out, r#"<form class="search" method="get" action="/">"#)?;
            writeln!(
                out,
                r#"  <input id="ns-search" name="q" type="search" placeholder="Filter namespaces" autocomplete="off" value="{}">"#,
                escape(input.value())
            )?;
            writeln!(out, "</form>")?;
        }

        if !self.page.has_grid() {
            return Ok(());
        }
        let tiles = self.page.tiles();
        if tiles.is_empty() {
            writeln!(
                out,
                r#"<p class="empty">No namespaces yet. Generated configs appear under out/.</p>"#
            )?;
        }
        writeln!(out, r#"<section id="ns-grid" class="grid">"#)?;
        for tile in tiles {
            write_tile(out, tile)?;
        }
        writeln!(out, "</section>")
    }
}

fn write_tile(out: &mut String, tile: &Tile) -> std::fmt::Result {
    let style = if tile.is_visible() {
        ""
    } else {
        r#" style="display:none""#
    };
    writeln!(out, r#"  <article class="tile"{style}>"#)?;
    match tile.title() {
        Some(title) => {
            writeln!(
                out,
                r#"    <a class="tile__title" href="/namespaces/{}">{}</a>"#,
                encode_path_segment(title),
                escape(title)
            )?;
        }
        None => writeln!(out, r#"    <span class="tile__title"></span>"#)?,
    }
    if let Some(subtitle) = tile.subtitle() {
        writeln!(out, r#"    <p class="tile__meta">{}</p>"#, escape(subtitle))?;
    }
    writeln!(out, "  </article>")
}

/// Data for the per-namespace file listing.
pub struct NamespacePage<'a> {
    pub title: &'a str,
    pub namespace: &'a str,
    /// `/`-separated paths relative to the namespace directory.
    pub files: &'a [String],
}

impl NamespacePage<'_> {
    pub fn render(&self) -> String {
        let mut body = String::new();
        self.write_body(&mut body)
            .expect("writing to a String cannot fail");
        layout(self.title, "namespace", &body)
    }

    fn write_body(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, r#"<header class="page-header">"#)?;
        writeln!(out, r#"  <p><a href="/">&larr; Namespaces</a></p>"#)?;
        writeln!(out, "  <h1>{}</h1>", escape(self.namespace))?;
        writeln!(out, "</header>")?;

        if self.files.is_empty() {
            return writeln!(out, r#"<p class="empty">No files in this namespace.</p>"#);
        }
        let ns = encode_path_segment(self.namespace);
        writeln!(out, r#"<ul class="files">"#)?;
        for file in self.files {
            writeln!(
                out,
                r#"  <li><a href="/out/{ns}/{}">{}</a></li>"#,
                encode_path(file),
                escape(file)
            )?;
        }
        writeln!(out, "</ul>")
    }
}

fn layout(title: &str, route: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/css/app.css">
</head>
<body data-route="{route}">
<main class="container">
{body}</main>
<script src="/static/js/app.js" defer></script>
</body>
</html>
"#,
        title = escape(title),
        route = escape(route),
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes every byte outside the URL unreserved set.
pub fn encode_path_segment(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len() + 8);
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b));
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0F) as usize]));
            }
        }
    }
    out
}

/// Like [`encode_path_segment`], but keeps `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_path_segment)
        .collect::<Vec<_>>()
        .join("/")
}
