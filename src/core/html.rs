// src/core/html.rs
use scraper::{ElementRef, Node, Selector};

use crate::error::{Error, Result};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| Error::Selector(css.to_string()))
}

/// Concatenated text of every descendant text node, untrimmed.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// What the sibling walk does with one node after a section header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Element belongs to the section.
    Collect,
    /// Not an entry, but the section continues (whitespace text, etc.).
    Skip,
    /// Section ends here.
    Stop,
}

/// Decides where a header's section ends. Swap this when the page markup drifts.
pub trait SectionBoundary {
    fn step(&self, node: &Node) -> Step;
}

/// Paragraphs and text nodes belong to the section; anything else ends it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParagraphRun;

impl SectionBoundary for ParagraphRun {
    fn step(&self, node: &Node) -> Step {
        match node {
            Node::Text(_) => Step::Skip,
            Node::Element(el) if el.name().eq_ignore_ascii_case("p") => Step::Collect,
            _ => Step::Stop,
        }
    }
}

/// Elements following `header` that the boundary collects, in document order.
pub fn section_siblings<'a>(
    header: ElementRef<'a>,
    boundary: &dyn SectionBoundary,
) -> Vec<ElementRef<'a>> {
    let mut out = Vec::new();
    for node in header.next_siblings() {
        match boundary.step(node.value()) {
            Step::Collect => {
                if let Some(el) = ElementRef::wrap(node) {
                    out.push(el);
                }
            }
            Step::Skip => {}
            Step::Stop => break,
        }
    }
    out
}
