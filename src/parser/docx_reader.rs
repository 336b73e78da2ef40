use std::fs;
use std::path::Path;

use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};

use crate::core::Result;

/// Body paragraph texts of a DOCX file, in document order, blanks included.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes)?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect())
}

/// Non-blank paragraphs joined by newlines, or `None` when there are none.
pub fn join_paragraphs<I, S>(paragraphs: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kept: Vec<S> = paragraphs
        .into_iter()
        .filter(|p| !p.as_ref().trim().is_empty())
        .collect();

    if kept.is_empty() {
        return None;
    }
    Some(
        kept.iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n"),
    )
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buf = String::new();
    push_children(&mut buf, &paragraph.children);
    buf
}

/// Visible text of runs, including those nested in hyperlinks and tracked
/// insertions. Deleted text is skipped.
fn push_children(buf: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(buf, run),
            ParagraphChild::Hyperlink(link) => push_children(buf, &link.children),
            ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let InsertChild::Run(run) = child {
                        push_run(buf, run);
                    }
                }
            }
            _ => (),
        }
    }
}

fn push_run(buf: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => buf.push_str(&text.text),
            RunChild::Tab(_) => buf.push('\t'),
            RunChild::Break(_) => buf.push('\n'),
            _ => (),
        }
    }
}
