use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Run, SpecialIndentType, Start, Style, StyleType,
};
use thiserror::Error;
use tracing::debug;

use crate::render::Block;

const TITLE_STYLE: &str = "Title";
const HEADING_STYLE: &str = "Heading1";
const BULLET_NUMBERING: usize = 1;

#[derive(Debug, Error)]
#[error("Failed to serialize DOCX: {0}")]
pub struct RenderError(#[source] Box<dyn std::error::Error + Send + Sync>);

/// Serializes blocks into a complete DOCX file held in memory.
pub fn render_docx(blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let docx = blocks.iter().fold(base_document(), |docx, block| {
        docx.add_paragraph(paragraph(block))
    });

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| RenderError(Box::new(e)))?;

    let bytes = buf.into_inner();
    debug!("Rendered {} blocks into {} DOCX bytes", blocks.len(), bytes.len());
    Ok(bytes)
}

/// Empty document carrying the title and heading styles and the bullet list
/// definition used by `Block::Bullet`.
fn base_document() -> Docx {
    let bullet_level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None);

    Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Title")
                .size(56),
        )
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(bullet_level))
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

fn paragraph(block: &Block) -> Paragraph {
    match block {
        Block::Title(text) => Paragraph::new().add_run(Run::new().add_text(text)).style(TITLE_STYLE),
        Block::Centered(text) => Paragraph::new()
            .add_run(Run::new().add_text(text))
            .align(AlignmentType::Center),
        Block::Heading(text) => Paragraph::new()
            .add_run(Run::new().add_text(text))
            .style(HEADING_STYLE),
        Block::Paragraph(text) => Paragraph::new().add_run(Run::new().add_text(text)),
        Block::Bold(text) => Paragraph::new().add_run(Run::new().add_text(text).bold()),
        Block::Italic(text) => Paragraph::new().add_run(Run::new().add_text(text).italic()),
        Block::Bullet(text) => Paragraph::new()
            .add_run(Run::new().add_text(text))
            .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
    }
}
