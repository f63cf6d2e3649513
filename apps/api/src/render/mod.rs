//! Render — turns a `GeneratedResume` into a downloadable DOCX.
//!
//! Two stages: `layout()` decides which blocks appear and in what order (pure,
//! fully testable), `docx::render_docx()` serializes the blocks. Absent keys
//! at any level skip their block; nothing in layout can fail.

pub mod docx;

use serde::Serialize;

use crate::models::resume::{Entry, GeneratedResume, SectionContent, SectionItem};

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOCX_FILE_NAME: &str = "Enhanced_Resume.docx";

const FIELD_SEPARATOR: &str = " | ";

/// One document element, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Block {
    /// Document title (the candidate's name).
    Title(String),
    /// Centered contact line under the title.
    Centered(String),
    /// Section heading.
    Heading(String),
    Paragraph(String),
    /// Emphasized primary line of an entry.
    Bold(String),
    /// Emphasized secondary line of an entry (location, dates).
    Italic(String),
    Bullet(String),
}

/// Assembles the resume into DOCX bytes, ready to send.
pub fn assemble(resume: &GeneratedResume) -> Result<Vec<u8>, docx::RenderError> {
    docx::render_docx(&layout(resume))
}

pub fn layout(resume: &GeneratedResume) -> Vec<Block> {
    let mut blocks = Vec::new();

    if let Some(contact) = &resume.contact {
        if let Some(name) = non_empty(&contact.name) {
            blocks.push(Block::Title(name.to_string()));
        }
        let line = join_present(&[&contact.email, &contact.phone, &contact.linkedin]);
        if !line.is_empty() {
            blocks.push(Block::Centered(line));
        }
    }

    let sections = [
        ("Professional Summary", &resume.summary),
        ("Work Experience", &resume.experience),
        ("Education", &resume.education),
        ("Skills", &resume.skills),
        ("Projects", &resume.projects),
    ];

    for (title, content) in sections {
        let Some(content) = content.as_ref().filter(|c| !c.is_empty()) else {
            continue;
        };
        blocks.push(Block::Heading(title.to_string()));
        match content {
            SectionContent::Text(text) => blocks.push(Block::Paragraph(text.clone())),
            SectionContent::Items(items) => {
                for item in items {
                    match item {
                        SectionItem::Entry(entry) => layout_entry(entry, &mut blocks),
                        SectionItem::Text(text) => blocks.push(Block::Bullet(text.clone())),
                    }
                }
            }
        }
    }

    blocks
}

fn layout_entry(entry: &Entry, blocks: &mut Vec<Block>) {
    let primary = primary_line(entry);
    if !primary.is_empty() {
        blocks.push(Block::Bold(primary));
    }

    let secondary = join_present(&[&entry.location, &entry.dates]);
    if !secondary.is_empty() {
        blocks.push(Block::Italic(secondary));
    }

    if let Some(description) = &entry.description {
        for point in description.points() {
            blocks.push(Block::Bullet(point.to_string()));
        }
    }
}

/// "<title> at <company>", falling back to degree for the title and
/// institution for the organization. Either half may be missing.
fn primary_line(entry: &Entry) -> String {
    let heading = non_empty(&entry.title).or(non_empty(&entry.degree));
    let organization = entry.company.as_deref().or(entry.institution.as_deref());

    match (heading, organization) {
        (Some(h), Some(o)) => format!("{h} at {o}"),
        (Some(h), None) => h.to_string(),
        (None, Some(o)) => o.to_string(),
        (None, None) => String::new(),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn join_present(fields: &[&Option<String>]) -> String {
    fields
        .iter()
        .filter_map(|f| non_empty(f))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}
