//! Static scan of user source for module-level Gradio interfaces.
//!
//! The generated file still does the authoritative runtime lookup; this
//! scan only lets the CLI warn before a deploy that would fail or pick
//! the wrong object.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::template::DEFAULT_ENTRY_POINTS;

/// `demo = gr.Blocks(...)` and friends at column 0.
static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"(?m)^([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*[^=\n]+)?=\s*(?:gr|gradio)\.(Blocks|Interface|ChatInterface|TabbedInterface)\s*\(",
    )
    .expect("valid regex")
});

/// `with gr.Blocks(...) as demo:` at column 0.
static WITH_BLOCKS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?m)^with\s+(?:gr|gradio)\.(Blocks)\s*\(.*\)\s*as\s+([A-Za-z_][A-Za-z0-9_]*)\s*:")
        .expect("valid regex")
});

/// A module-level variable that looks like it holds a Gradio interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCandidate {
    pub name: String,
    /// Gradio class, e.g. `Blocks` or `Interface`.
    pub kind: String,
    /// 1-based line number of the first binding.
    pub line: usize,
}

/// Outcome of the static scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// No candidate; the runtime scan may still find one.
    None,
    /// Exactly one candidate.
    Unique(InterfaceCandidate),
    /// Several candidates; the runtime lookup order decides.
    Ambiguous(Vec<InterfaceCandidate>),
}

/// List candidates in source order, one per variable name.
#[must_use]
pub fn find_interfaces(source: &str) -> Vec<InterfaceCandidate> {
    let mut hits: Vec<(usize, InterfaceCandidate)> = Vec::new();

    for caps in ASSIGNMENT_RE.captures_iter(source) {
        let (Some(all), Some(name), Some(kind)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        hits.push((all.start(), candidate(source, all.start(), name.as_str(), kind.as_str())));
    }
    for caps in WITH_BLOCKS_RE.captures_iter(source) {
        let (Some(all), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        hits.push((all.start(), candidate(source, all.start(), name.as_str(), kind.as_str())));
    }

    hits.sort_by_key(|(offset, _)| *offset);
    let mut out: Vec<InterfaceCandidate> = Vec::new();
    for (_, c) in hits {
        if !out.iter().any(|seen| seen.name == c.name) {
            out.push(c);
        }
    }
    out
}

/// Classify the scan the way the runtime lookup resolves it.
///
/// An explicit entry point narrows the candidates to that name. Without one,
/// the first of `DEFAULT_ENTRY_POINTS` that is bound wins outright.
#[must_use]
pub fn detect(source: &str, entry_point: Option<&str>) -> Detection {
    let mut found = find_interfaces(source);
    match entry_point {
        Some(entry) => found.retain(|c| c.name == entry),
        None => {
            for name in DEFAULT_ENTRY_POINTS {
                if let Some(pos) = found.iter().position(|c| c.name == *name) {
                    return Detection::Unique(found.swap_remove(pos));
                }
            }
        }
    }
    match found.len() {
        0 => Detection::None,
        1 => Detection::Unique(found.remove(0)),
        _ => Detection::Ambiguous(found),
    }
}

fn candidate(source: &str, offset: usize, name: &str, kind: &str) -> InterfaceCandidate {
    InterfaceCandidate {
        name: name.to_string(),
        kind: kind.to_string(),
        line: source[..offset].matches('\n').count() + 1,
    }
}
