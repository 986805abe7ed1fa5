//! Print markup for the assembled resume.
//!
//! Produces one self-contained HTML document: page margin and font come from
//! `Customization`, sections appear in the order given, and sections with
//! nothing to show are left out entirely.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use tracing::debug;

use crate::models::custom::{CustomSection, FieldType, SectionLayout};
use crate::models::resume::{Customization, ResumeData, ResumeSection, SectionType};
use crate::sections::render::{absolute_url, format_date, render_rows, DisplayValue, RenderedField};

/// The finished document and how many sections made it into it.
pub struct PrintMarkup {
    pub html: String,
    pub section_count: usize,
}

pub fn render_document(sections: &[&ResumeSection], data: &ResumeData) -> PrintMarkup {
    let title = match data.personal_info.name.trim() {
        "" => "Resume".to_string(),
        name => format!("{name} - Resume"),
    };

    let rendered: Vec<String> = sections
        .iter()
        .filter_map(|section| render_section(section, data))
        .collect();
    let section_count = rendered.len();
    let body = rendered.concat();

    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n<main class=\"resume\">\n{}</main>\n</body>\n</html>\n",
        text(&title),
        stylesheet(&data.customization),
        body
    );
    PrintMarkup { html, section_count }
}

fn stylesheet(c: &Customization) -> String {
    let font: String = c
        .font_family
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == ' ' || *ch == '-')
        .collect();
    let font = if font.trim().is_empty() { "Inter".to_string() } else { font };
    let font_size = if c.font_size > 0.0 { c.font_size } else { 11.0 };
    let margin = c.margin.max(0.0);
    let line_height = if c.line_height > 0.0 { c.line_height } else { 1.4 };

    format!(
        r#"@page {{ size: letter; margin: {margin}in; }}
body {{ font-family: '{font}', sans-serif; font-size: {font_size}pt; line-height: {line_height}; margin: 0; color: #111; }}
h1 {{ font-size: 1.8em; margin: 0; }}
h2 {{ font-size: 1.15em; border-bottom: 1px solid #999; margin: 0.8em 0 0.3em; text-transform: uppercase; }}
.contact {{ display: flex; flex-wrap: wrap; gap: 0.8em; }}
.entry {{ margin-bottom: 0.5em; break-inside: avoid; }}
.entry-head {{ display: flex; justify-content: space-between; }}
.dates {{ color: #555; white-space: nowrap; }}
.tag {{ border: 1px solid #bbb; border-radius: 3px; padding: 0 0.3em; margin-right: 0.3em; }}
.label {{ font-weight: 600; margin-right: 0.3em; }}
.layout-two-column .row {{ display: grid; grid-template-columns: 1fr 1fr; gap: 0.2em 1em; }}
.layout-grid {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 0.6em; }}
.layout-timeline .row {{ display: grid; grid-template-columns: 8em 1fr; border-left: 2px solid #999; padding-left: 0.6em; }}
"#
    )
}

fn render_section(section: &ResumeSection, data: &ResumeData) -> Option<String> {
    let body = match section.section_type {
        SectionType::PersonalInfo => return render_header(data),
        SectionType::Summary => paragraph(&data.summary),
        SectionType::Skills => render_skills(data),
        SectionType::Experience => render_experience(data),
        SectionType::Projects => render_projects(data),
        SectionType::Education => render_education(data),
        SectionType::Certifications => render_certifications(data),
        SectionType::Achievements => bullet_list(data.achievements.iter().map(|a| a.description.as_str())),
        SectionType::Interests => paragraph(&data.interests),
        SectionType::Custom => section
            .custom_section_id
            .as_deref()
            .and_then(|id| data.custom_section(id))
            .and_then(render_custom),
        SectionType::Unknown => {
            debug!("Skipping section {} of unknown type", section.id);
            None
        }
    }?;

    Some(format!(
        "<section id=\"{}\">\n<h2>{}</h2>\n{}</section>\n",
        attr(&section.id),
        text(&section.name),
        body
    ))
}

fn render_header(data: &ResumeData) -> Option<String> {
    let info = &data.personal_info;
    if info.name.trim().is_empty() {
        return None;
    }

    let mut contact = Vec::new();
    if !info.email.trim().is_empty() {
        contact.push(link(&format!("mailto:{}", info.email.trim()), info.email.trim()));
    }
    if !info.phone.trim().is_empty() {
        contact.push(link(&format!("tel:{}", info.phone.trim()), info.phone.trim()));
    }
    if !info.location.trim().is_empty() {
        contact.push(format!("<span>{}</span>", text(info.location.trim())));
    }
    for url in [&info.linkedin, &info.github, &info.website] {
        if !url.trim().is_empty() {
            contact.push(link(&absolute_url(url.trim()), url.trim()));
        }
    }

    Some(format!(
        "<header>\n<h1>{}</h1>\n<div class=\"contact\">{}</div>\n</header>\n",
        text(info.name.trim()),
        contact.join("")
    ))
}

fn render_skills(data: &ResumeData) -> Option<String> {
    let rows: String = data
        .skills
        .labelled()
        .into_iter()
        .map(|(label, items)| {
            format!(
                "<div><span class=\"label\">{}:</span>{}</div>\n",
                text(label),
                text(&items.join(", "))
            )
        })
        .collect();
    non_empty(rows)
}

fn render_experience(data: &ResumeData) -> Option<String> {
    let entries: String = data
        .experience
        .iter()
        .map(|e| {
            let end = if e.current { "Present" } else { e.end_date.as_str() };
            let mut title = format!("<strong>{}</strong>", text(&e.position));
            if !e.company.trim().is_empty() {
                title.push_str(&format!(", {}", text(&e.company)));
            }
            if !e.location.trim().is_empty() {
                title.push_str(&format!(" <span class=\"location\">{}</span>", text(&e.location)));
            }
            entry(&title, &date_range(&e.start_date, end), bullet_list(e.bullets.iter().map(String::as_str)))
        })
        .collect();
    non_empty(entries)
}

fn render_projects(data: &ResumeData) -> Option<String> {
    let entries: String = data
        .projects
        .iter()
        .map(|p| {
            let mut title = format!("<strong>{}</strong>", text(&p.name));
            if !p.tech_stack.trim().is_empty() {
                title.push_str(&format!(" | <em>{}</em>", text(&p.tech_stack)));
            }
            if !p.link.trim().is_empty() {
                title.push_str(&format!(" {}", link(&absolute_url(p.link.trim()), p.link.trim())));
            }
            let details = bullet_list(p.description.lines());
            entry(&title, &date_range(&p.start_date, &p.end_date), details)
        })
        .collect();
    non_empty(entries)
}

fn render_education(data: &ResumeData) -> Option<String> {
    let entries: String = data
        .education
        .iter()
        .map(|e| {
            let mut title = format!("<strong>{}</strong>", text(&e.institution));
            let degree = [e.degree.trim(), e.field.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" in ");
            if !degree.is_empty() {
                title.push_str(&format!(", {}", text(&degree)));
            }
            let details = (!e.gpa.trim().is_empty())
                .then(|| format!("<div>GPA: {}</div>\n", text(e.gpa.trim())));
            entry(&title, &date_range(&e.start_date, &e.end_date), details)
        })
        .collect();
    non_empty(entries)
}

fn render_certifications(data: &ResumeData) -> Option<String> {
    let entries: String = data
        .certifications
        .iter()
        .map(|c| {
            let mut title = format!("<strong>{}</strong>", text(&c.title));
            if !c.organization.trim().is_empty() {
                title.push_str(&format!(", {}", text(&c.organization)));
            }
            if !c.credential_url.trim().is_empty() {
                title.push_str(&format!(
                    " {}",
                    link(&absolute_url(c.credential_url.trim()), "Credential")
                ));
            }
            entry(&title, &date_range(&c.date, ""), None)
        })
        .collect();
    non_empty(entries)
}

fn render_custom(custom: &CustomSection) -> Option<String> {
    let rows: String = render_rows(custom)
        .into_iter()
        .filter(|row| !row.fields.is_empty())
        .map(|row| {
            let fields = match custom.layout {
                SectionLayout::Timeline => {
                    let (dates, rest): (Vec<_>, Vec<_>) = row
                        .fields
                        .iter()
                        .partition(|f| f.field_type == FieldType::Date);
                    format!(
                        "<div class=\"timeline-marker\">{}</div>\n<div class=\"timeline-body\">{}</div>\n",
                        dates.iter().map(|f| display(&f.value)).collect::<Vec<_>>().join(" - "),
                        rest.into_iter().map(render_field).collect::<String>()
                    )
                }
                _ => row.fields.iter().map(render_field).collect(),
            };
            format!("<div class=\"row\">\n{fields}</div>\n")
        })
        .collect();

    non_empty(rows).map(|rows| format!("<div class=\"{}\">\n{}</div>\n", custom.layout.css_class(), rows))
}

fn render_field(field: &RenderedField) -> String {
    format!(
        "<div class=\"field field-{}\"><span class=\"label\">{}</span>{}</div>\n",
        field.field_type,
        text(&field.label),
        display(&field.value)
    )
}

fn display(value: &DisplayValue) -> String {
    match value {
        DisplayValue::Text { text: t } => text(t).to_string(),
        DisplayValue::Date { text: t } => format!("<span class=\"date\">{}</span>", text(t)),
        DisplayValue::Link { href, text: t } => link(href, t),
        DisplayValue::Paragraphs { lines } => lines.iter().map(|l| format!("<p>{}</p>", text(l))).collect(),
        DisplayValue::Rating { value, max } => {
            let filled = *value as usize;
            let empty = max.saturating_sub(*value) as usize;
            format!(
                "<span class=\"rating\" title=\"{value}/{max}\">{}{}</span>",
                "\u{2605}".repeat(filled),
                "\u{2606}".repeat(empty)
            )
        }
        DisplayValue::Tags { items } => items
            .iter()
            .map(|i| format!("<span class=\"tag\">{}</span>", text(i)))
            .collect(),
        DisplayValue::Bullets { items } => {
            bullet_list(items.iter().map(String::as_str)).unwrap_or_default()
        }
    }
}

fn entry(title: &str, dates: &str, details: Option<String>) -> String {
    format!(
        "<div class=\"entry\">\n<div class=\"entry-head\"><span>{}</span><span class=\"dates\">{}</span></div>\n{}</div>\n",
        title,
        text(dates),
        details.unwrap_or_default()
    )
}

fn date_range(start: &str, end: &str) -> String {
    let fmt = |d: &str| {
        let d = d.trim();
        format_date(d).unwrap_or_else(|| d.to_string())
    };
    match (fmt(start), fmt(end)) {
        (s, e) if s.is_empty() => e,
        (s, e) if e.is_empty() => s,
        (s, e) => format!("{s} \u{2013} {e}"),
    }
}

fn paragraph(value: &str) -> Option<String> {
    let lines: String = value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("<p>{}</p>\n", text(l)))
        .collect();
    non_empty(lines)
}

fn bullet_list<'a>(items: impl Iterator<Item = &'a str>) -> Option<String> {
    let lis: String = items
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(|i| format!("<li>{}</li>\n", text(i)))
        .collect();
    non_empty(lis).map(|lis| format!("<ul>\n{lis}</ul>\n"))
}

fn link(href: &str, label: &str) -> String {
    format!("<a href=\"{}\">{}</a>", attr(href), text(label))
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
