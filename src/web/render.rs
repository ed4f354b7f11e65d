//! HTML rendering
//!
//! Pages are built as strings. Everything that came from AWS or from
//! configuration passes through [`esc`] first.

use super::DashboardSettings;
use crate::resource::{ConnectionStatus, SectionView};
use quick_xml::escape::escape;
use std::fmt::Write;

const PAGE_TITLE: &str = "🚀 AWS Resources Dashboard";

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
.container { background-color: #fff; border-radius: 8px; padding: 20px; margin: 20px auto; max-width: 1100px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
h1 { color: #333; border-bottom: 3px solid #007cba; padding-bottom: 10px; }
h2 { color: #555; border-bottom: 2px solid #28a745; padding-bottom: 5px; margin-top: 30px; }
table { width: 100%; border-collapse: collapse; margin: 15px 0; }
th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
th { background-color: #007cba; color: #fff; font-weight: bold; }
tr:nth-child(even) { background-color: #f8f9fa; }
tr.error-row td { background-color: #fee; color: #c33; }
.status { background-color: #d4edda; border: 1px solid #c3e6cb; border-radius: 4px; padding: 10px; margin: 10px 0; color: #155724; }
.error { background-color: #fee; border: 1px solid #fcc; border-radius: 4px; padding: 20px; margin: 20px 0; color: #c33; }
.info { background-color: #e7f3ff; border: 1px solid #b3d9ff; border-radius: 4px; padding: 15px; margin: 20px 0; color: #0056b3; }
.empty-state { text-align: center; color: #666; font-style: italic; padding: 20px; }
.footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; text-align: center; }
"#;

fn esc(text: &str) -> String {
    escape(text).into_owned()
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n<h1>{}</h1>\n{}</div>\n</body>\n</html>\n",
        esc(title),
        STYLE,
        PAGE_TITLE,
        body
    )
}

fn footer(settings: &DashboardSettings) -> String {
    format!(
        "<div class=\"footer\"><p>🌍 Region: {} | 🏷️ Environment: {} | ⚡ Powered by awsdash {}</p></div>\n",
        esc(&settings.region),
        esc(&settings.environment),
        env!("CARGO_PKG_VERSION")
    )
}

fn render_section(out: &mut String, section: &SectionView) {
    let _ = writeln!(
        out,
        "<h2>{} {} ({})</h2>",
        section.icon,
        section.title,
        section.count_label()
    );

    if section.is_empty() {
        let _ = writeln!(out, "<div class=\"empty-state\">{}</div>", section.empty_message);
        return;
    }

    out.push_str("<table>\n<tr>");
    for header in &section.headers {
        let _ = write!(out, "<th>{}</th>", header);
    }
    out.push_str("</tr>\n");

    let row_class = if section.failed { " class=\"error-row\"" } else { "" };
    for row in &section.rows {
        let _ = write!(out, "<tr{}>", row_class);
        for value in row.values() {
            let _ = write!(out, "<td>{}</td>", esc(value));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

/// The dashboard with one section per resource kind
pub fn render_dashboard(settings: &DashboardSettings, sections: &[SectionView]) -> String {
    let mut body = format!(
        "<div class=\"status\"><strong>✅ AWS Connection:</strong> Successfully connected to AWS in region {}</div>\n",
        esc(&settings.region)
    );

    for section in sections {
        render_section(&mut body, section);
    }
    body.push_str(&footer(settings));

    page("AWS Resources Dashboard", &body)
}

const MISSING_STEPS: &[&str] = &[
    "Set the <code>AWS_ACCESS_KEY_ID</code> environment variable",
    "Set the <code>AWS_SECRET_ACCESS_KEY</code> environment variable",
    "Or add a profile to <code>~/.aws/credentials</code> and set <code>AWS_PROFILE</code>",
];

const CLIENT_ERROR_STEPS: &[&str] = &[
    "Check that the access key is active and the secret matches",
    "Ensure the credentials have <code>ec2:Describe*</code> and <code>elasticloadbalancing:Describe*</code> permissions",
    "Check that <code>AWS_REGION</code> names a region enabled for the account",
];

const UNEXPECTED_STEPS: &[&str] = &[
    "Check network connectivity to the AWS endpoints",
    "If <code>AWS_ENDPOINT_URL</code> is set, check that it is reachable",
    "Retry shortly; the service may be temporarily unavailable",
];

// Intro and fix-up steps per status; both are trusted markup
fn guidance(status: &ConnectionStatus) -> (&'static str, &'static [&'static str]) {
    match status {
        ConnectionStatus::CredentialsMissing | ConnectionStatus::Connected => (
            "This error is <strong>expected</strong> when AWS credentials are not configured.",
            MISSING_STEPS,
        ),
        ConnectionStatus::ClientError(_) => (
            "AWS rejected the request made with the configured credentials.",
            CLIENT_ERROR_STEPS,
        ),
        ConnectionStatus::UnexpectedError(_) => (
            "The dashboard could not get a usable answer from AWS.",
            UNEXPECTED_STEPS,
        ),
    }
}

fn configured(flag: bool) -> &'static str {
    if flag {
        "Configured"
    } else {
        "Not provided"
    }
}

/// Guidance page shown when the credential probe failed
pub fn render_connection_error(settings: &DashboardSettings, status: &ConnectionStatus) -> String {
    let message = status.error_message().unwrap_or_default();
    let (intro, steps) = guidance(status);

    let mut body = format!(
        "<div class=\"error\">\n<h3>❌ AWS Connection Error</h3>\n<p><strong>Error:</strong> {}</p>\n</div>\n",
        esc(&message)
    );

    let _ = writeln!(
        body,
        "<div class=\"info\">\n<h3>📋 Expected Behavior</h3>\n<p>{}</p>\n<p>To fix this issue:</p>\n<ul>",
        intro
    );
    for step in steps {
        let _ = writeln!(body, "<li>{}</li>", step);
    }
    body.push_str("</ul>\n</div>\n");

    let _ = writeln!(
        body,
        "<div class=\"info\">\n<h3>🔧 Configuration Status</h3>\n<p><strong>AWS_ACCESS_KEY_ID:</strong> {}</p>\n<p><strong>AWS_SECRET_ACCESS_KEY:</strong> {}</p>\n<p><strong>AWS_REGION:</strong> {}</p>\n<p><strong>Environment:</strong> {}</p>\n</div>",
        configured(settings.access_key_configured),
        configured(settings.secret_key_configured),
        esc(&settings.region),
        esc(&settings.environment)
    );

    page("AWS Resources - Error", &body)
}

/// Generic page for failures nothing anticipated
pub fn render_internal_error() -> String {
    page(
        "AWS Resources - Error",
        "<div class=\"error\">\n<h3>❌ Internal Server Error</h3>\n<p>Something went wrong while building the dashboard. Check the server logs for details.</p>\n</div>\n",
    )
}
