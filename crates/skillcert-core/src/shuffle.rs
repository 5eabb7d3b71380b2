//! Answer-order obfuscation.
//!
//! Every presentation of a question draws a fresh random permutation of
//! its four options, so the same question never looks identical twice.
//! Scoring resolves the user's chosen display label back to the canonical
//! label through the permutation's map before comparing to the correct
//! answer.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{OptionLabel, Question};

/// One display slot: the label shown to the user and the option text
/// occupying it for this presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedOption {
    pub label: OptionLabel,
    pub text: String,
}

/// A question's display order for one presentation, with the map from
/// displayed label back to the canonical label.
///
/// There is no persisted seed: re-shuffling the same question on a retry
/// draws a new independent permutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffledQuestion {
    /// Options in display order, labelled A–D.
    pub display: Vec<DisplayedOption>,
    /// Displayed label → canonical label.
    label_map: BTreeMap<OptionLabel, OptionLabel>,
}

impl ShuffledQuestion {
    /// Resolve a chosen display label to the canonical label it stands for.
    pub fn resolve(&self, chosen: OptionLabel) -> OptionLabel {
        // The map always holds all four labels by construction.
        self.label_map[&chosen]
    }
}

/// Draw a random permutation of the question's four options and label the
/// result A–D in display order.
pub fn shuffle_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> ShuffledQuestion {
    let mut canonical = OptionLabel::ALL;
    canonical.shuffle(rng);

    let mut display = Vec::with_capacity(4);
    let mut label_map = BTreeMap::new();
    for (slot, &original) in OptionLabel::ALL.iter().zip(canonical.iter()) {
        display.push(DisplayedOption {
            label: *slot,
            text: question.option(original).to_string(),
        });
        label_map.insert(*slot, original);
    }

    ShuffledQuestion { display, label_map }
}
