//! Server-rendered HTML pages.

use std::fmt::Write;

use axum::http::StatusCode;
use diskview_services::{FileEntry, TypeFilter, disk::ResourceType};

use crate::session::AuthState;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}th,td{padding:.4rem;border-bottom:1px solid #ddd;text-align:left}\
.error{color:#b00020}.filters a{margin-right:1rem}.filters a.active{font-weight:bold}";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

pub fn format_size(size: Option<u64>) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let Some(size) = size else {
        return String::new();
    };
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Link-entry form. `error` is rendered inline above the input.
pub fn index_page(error: Option<&str>, public_key: &str, auth: AuthState) -> String {
    let mut body = String::from("<h1>Yandex.Disk public link viewer</h1>\n");

    let auth_line = match auth {
        AuthState::Authenticated => "<p>Signed in to Yandex.</p>".to_string(),
        AuthState::AwaitingCallback => {
            "<p>Waiting for Yandex authorization. <a href=\"/oauth/start/\">Retry</a></p>".to_string()
        }
        AuthState::Unauthenticated => {
            "<p><a href=\"/oauth/start/\">Sign in with Yandex</a></p>".to_string()
        }
    };
    body.push_str(&auth_line);

    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/files/\">\n\
         <label for=\"public_key\">Public link</label>\n\
         <input id=\"public_key\" name=\"public_key\" maxlength=\"255\" size=\"60\" \
         placeholder=\"https://disk.yandex.ru/d/...\" value=\"{}\" required>\n\
         <button type=\"submit\">Show files</button>\n</form>",
        escape(public_key)
    );

    layout("Yandex.Disk viewer", &body)
}

fn files_url(public_key: &str, filter: &str) -> String {
    format!(
        "/files/?public_key={}&amp;file_type={}",
        urlencoding::encode(public_key),
        urlencoding::encode(filter)
    )
}

fn download_url(public_key: &str, path: &str) -> String {
    format!(
        "/download/?public_key={}&amp;path={}",
        urlencoding::encode(public_key),
        urlencoding::encode(path)
    )
}

fn type_label(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::File => "file",
        ResourceType::Dir => "folder",
    }
}

pub fn file_list_page(public_key: &str, filter: &TypeFilter, entries: &[FileEntry]) -> String {
    let mut body = String::from("<p><a href=\"/\">&larr; Another link</a></p>\n");
    let _ = writeln!(body, "<h1>Files at {}</h1>", escape(public_key));

    body.push_str("<p class=\"filters\">");
    for (param, label) in [("all", "All"), ("file", "Files"), ("dir", "Folders")] {
        let class = if filter.as_param() == param {
            " class=\"active\""
        } else {
            ""
        };
        let _ = write!(
            body,
            "<a href=\"{}\"{}>{}</a>",
            files_url(public_key, param),
            class,
            label
        );
    }
    body.push_str("</p>\n");

    if entries.is_empty() {
        body.push_str("<p>No items to show.</p>\n");
        return layout("Files", &body);
    }

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/download_multiple/\">\n\
         <input type=\"hidden\" name=\"public_key\" value=\"{}\">\n\
         <table>\n<tr><th></th><th>Name</th><th>Type</th><th>Size</th><th>Modified</th><th></th></tr>\n",
        escape(public_key)
    );

    for entry in entries {
        let (checkbox, link) = if entry.is_file() {
            (
                format!(
                    "<input type=\"checkbox\" name=\"selected_files\" value=\"{}\">",
                    escape(&entry.path)
                ),
                format!(
                    "<a href=\"{}\">Download</a>",
                    download_url(public_key, &entry.path)
                ),
            )
        } else {
            (String::new(), String::new())
        };
        let modified = entry
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            checkbox,
            escape(&entry.name),
            type_label(entry.resource_type),
            format_size(entry.size),
            modified,
            link
        );
    }

    body.push_str(
        "</table>\n<button type=\"submit\">Download selected as zip</button>\n</form>",
    );
    layout("Files", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<h1>{} {}</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
        status.as_u16(),
        escape(status.canonical_reason().unwrap_or("Error")),
        escape(message)
    );
    layout("Error", &body)
}
