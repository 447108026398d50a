//! Display rules of the multi-select dropdown: the collapsed title and the
//! width the control reserves so it never truncates or jumps.

use serde::{Deserialize, Serialize};

use crate::filter::Selection;

/// Horizontal space added on top of the widest measured text, covering the
/// inner padding and the chevron.
pub const WIDTH_PADDING: f64 = 48.0;

/// A selectable `(identifier, label)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub id: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

fn label_of<'a>(options: &'a [DropdownOption], id: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.id == id)
        .map(|option| option.label.as_str())
}

/// Text shown on the collapsed control.
///
/// Nothing selected shows the bare title, a single selection shows
/// `title: label`, anything more shows `title: N selected`. A selected
/// identifier without a matching option drops the label part.
#[must_use]
pub fn display_title(title: &str, options: &[DropdownOption], selected: &Selection) -> String {
    match selected.len() {
        0 => title.to_owned(),
        1 => selected
            .iter()
            .next()
            .and_then(|id| label_of(options, id))
            .map_or_else(|| title.to_owned(), |label| format!("{title}: {label}")),
        n => format!("{title}: {n} selected"),
    }
}

/// Every string the control may have to fit: each option label, the title
/// with each single label, and the multi-selection summary at its widest.
#[must_use]
pub fn texts_to_measure(title: &str, options: &[DropdownOption], selected: &Selection) -> Vec<String> {
    let mut texts = Vec::with_capacity(options.len() * 2 + 3);
    texts.push(title.to_owned());
    for option in options {
        texts.push(option.label.clone());
        texts.push(format!("{title}: {}", option.label));
    }
    texts.push(format!("{title}: {} selected", options.len().max(2)));
    texts.push(display_title(title, options, selected));
    texts
}

/// Width for the control given the measured pixel widths of its texts.
#[must_use]
pub fn fitted_width(min_width: f64, measured: impl IntoIterator<Item = f64>) -> f64 {
    let widest = measured
        .into_iter()
        .filter(|width| width.is_finite())
        .fold(0.0_f64, f64::max);
    min_width.max(widest + WIDTH_PADDING)
}
