use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::money::to_major_units;

// Class names shared between views and STYLESHEET.
pub const TABLE_HEADER_STYLE: &str = "table-header";
pub const TABLE_CELL_STYLE: &str = "table-cell";
pub const CATEGORY_BADGE_STYLE: &str = "category-badge";
pub const BUTTON_PRIMARY_STYLE: &str = "button-primary";

/// The application stylesheet, embedded in every page head so the server
/// has no static files to serve.
const STYLESHEET: &str = "\
    * { box-sizing: border-box; }\n\
    body { margin: 0; font-family: system-ui, -apple-system, sans-serif; \
        background: #f5f3ef; color: #1f2933; }\n\
    .layout { display: flex; min-height: 100vh; }\n\
    .sidebar { width: 290px; flex-shrink: 0; padding: 1.75rem 1.5rem; \
        background: #1c2a39; color: #eef2f6; }\n\
    .brand h2 { margin: 0; font-size: 1.5rem; }\n\
    .brand p { margin: 0.25rem 0 1.5rem; color: #9fb3c8; font-size: 0.85rem; }\n\
    .total-card { padding: 1rem; border-radius: 0.5rem; background: #24384c; \
        margin-bottom: 1.5rem; }\n\
    .total-label { margin: 0; font-size: 0.75rem; text-transform: uppercase; \
        letter-spacing: 0.05em; color: #9fb3c8; }\n\
    .total-amount { margin: 0.25rem 0; font-size: 1.75rem; font-weight: 700; }\n\
    .total-count { margin: 0; font-size: 0.8rem; color: #9fb3c8; }\n\
    .summary h3 { font-size: 0.9rem; text-transform: uppercase; \
        letter-spacing: 0.05em; color: #9fb3c8; }\n\
    .summary-row { margin-bottom: 0.9rem; }\n\
    .summary-labels { display: flex; justify-content: space-between; \
        font-size: 0.85rem; margin-bottom: 0.3rem; }\n\
    .bar-track { height: 6px; border-radius: 3px; background: #33475c; }\n\
    .bar-fill { height: 100%; border-radius: 3px; background: #5ba97b; }\n\
    .content { flex: 1; padding: 2rem; max-width: 960px; }\n\
    .page-header h1 { margin: 0; }\n\
    .subtitle { margin: 0.25rem 0 1.5rem; color: #627d98; }\n\
    .card { background: #ffffff; border: 1px solid #e4e0d8; \
        border-radius: 0.5rem; padding: 1.5rem; margin-bottom: 1.5rem; }\n\
    .card h2 { margin-top: 0; font-size: 1.1rem; }\n\
    .form-grid { display: grid; grid-template-columns: 1fr 1fr 1fr; \
        gap: 1rem; margin-bottom: 1rem; }\n\
    .form-field { display: flex; flex-direction: column; }\n\
    .form-field-wide { grid-column: 1 / -1; }\n\
    .form-field label { font-size: 0.8rem; font-weight: 600; \
        margin-bottom: 0.3rem; color: #486581; }\n\
    .form-field input, .form-field select { padding: 0.5rem 0.65rem; \
        border: 1px solid #d4cfc4; border-radius: 0.375rem; font-size: 0.9rem; }\n\
    .form-error { padding: 0.6rem 0.8rem; border-radius: 0.375rem; \
        background: #fbe9e7; color: #ad1f1f; font-size: 0.85rem; }\n\
    .hidden { display: none; }\n\
    .button-primary { padding: 0.55rem 1.2rem; border: none; \
        border-radius: 0.375rem; background: #2f6f4f; color: #ffffff; \
        font-size: 0.9rem; font-weight: 600; cursor: pointer; }\n\
    .button-primary:hover { background: #265a40; }\n\
    .filter-bar { display: flex; gap: 1.5rem; align-items: center; \
        margin-bottom: 1rem; font-size: 0.85rem; color: #486581; }\n\
    .filter-bar label { display: flex; gap: 0.5rem; align-items: center; }\n\
    .filter-bar select { padding: 0.35rem 0.5rem; border-radius: 0.375rem; \
        border: 1px solid #d4cfc4; }\n\
    .table-header-row { display: flex; justify-content: space-between; \
        align-items: baseline; }\n\
    .entry-count { font-size: 0.85rem; font-weight: 400; color: #627d98; }\n\
    .table-total { font-size: 0.9rem; font-weight: 600; color: #2f6f4f; }\n\
    table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }\n\
    .table-header { text-align: left; font-size: 0.75rem; \
        text-transform: uppercase; letter-spacing: 0.04em; color: #627d98; }\n\
    .table-cell { padding: 0.6rem 0.75rem; border-bottom: 1px solid #efece5; }\n\
    .category-badge { display: inline-flex; padding: 0.15rem 0.6rem; \
        border-radius: 999px; background: #e3efe8; color: #2f6f4f; \
        font-size: 0.78rem; font-weight: 600; }\n\
    .empty-state { color: #627d98; font-size: 0.9rem; }\n\
    .error-page { max-width: 28rem; margin: 4rem auto; text-align: center; }\n\
    .error-page h1 { font-size: 4rem; margin: 0; color: #2f6f4f; }\n\
    .error-description { font-size: 1.25rem; font-weight: 600; }";

pub enum HeadElement {
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    #[allow(dead_code)]
    /// CSS source code.
    Style(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Paisa" }
                style { (PreEscaped(STYLESHEET)) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        main class="error-page"
        {
            h1 { (header) }

            p class="error-description" { (description) }

            p { (fix) }

            a href="/" class=(BUTTON_PRIMARY_STYLE) { "Back to expenses" }
        }
    );

    base(title, &[], &content)
}

/// Format paise as a rupee amount with two decimal places, e.g. `"₹1,234.50"`.
pub fn format_rupees(amount_cents: i64) -> String {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("₹")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let amount = to_major_units(amount_cents);

    if amount == 0.0 {
        // Zero is rendered as "0", so the formatted string is hardcoded.
        return "₹0.00".to_owned();
    }

    let mut formatted_string = formatter.fmt_string(amount);

    // numfmt omits the last trailing zero, e.g. "12.30" is rendered as
    // "12.3", so we append the "0" ourselves.
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Format paise as a whole rupee amount, e.g. `"₹1,235"`.
pub fn format_rupees_rounded(amount_cents: i64) -> String {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("₹")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    let amount = to_major_units(amount_cents).round();

    if amount == 0.0 {
        return "₹0".to_owned();
    }

    formatter.fmt_string(amount)
}

// ==============
// TESTS
// ==============
