//! Error taxonomy: the four super-categories and their thirteen sub-categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A top-level error category with a fixed aggregation weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Meaning is not preserved between source and translation.
    Accuracy,
    /// The translation does not read naturally.
    Fluency,
    /// Domain terms are wrong or used inconsistently.
    Terminology,
    /// Stylistic problems.
    Style,
}

impl Category {
    /// All categories in pipeline declaration order.
    pub const ALL: [Self; 4] = [Self::Accuracy, Self::Fluency, Self::Terminology, Self::Style];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Fluency => "fluency",
            Self::Terminology => "terminology",
            Self::Style => "style",
        }
    }

    /// Weight of the category in the overall error probability.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Accuracy => 0.4,
            Self::Fluency => 0.3,
            Self::Terminology => 0.2,
            Self::Style => 0.1,
        }
    }

    /// Sub-categories belonging to this category, in declaration order.
    #[must_use]
    pub const fn sub_categories(self) -> &'static [SubCategory] {
        match self {
            Self::Accuracy => &[
                SubCategory::Addition,
                SubCategory::Omission,
                SubCategory::Mistranslation,
                SubCategory::UntranslatedText,
            ],
            Self::Fluency => &[
                SubCategory::Punctuation,
                SubCategory::Spelling,
                SubCategory::Grammar,
                SubCategory::Register,
                SubCategory::Inconsistency,
                SubCategory::CharacterEncoding,
            ],
            Self::Terminology => &[
                SubCategory::InappropriateForContext,
                SubCategory::InconsistentUse,
            ],
            Self::Style => &[SubCategory::Awkward],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fine-grained error type, owned by exactly one [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubCategory {
    /// Content present in the translation but not the source.
    Addition,
    /// Source content missing from the translation.
    Omission,
    /// Source content rendered with the wrong meaning.
    Mistranslation,
    /// Source text left untranslated.
    UntranslatedText,
    /// Punctuation errors.
    Punctuation,
    /// Spelling errors.
    Spelling,
    /// Grammar errors.
    Grammar,
    /// Wrong level of formality.
    Register,
    /// Internally inconsistent wording.
    Inconsistency,
    /// Garbled or wrongly encoded characters.
    #[serde(rename = "characterEncoding")]
    CharacterEncoding,
    /// Terms unsuitable for the subject field.
    InappropriateForContext,
    /// A term translated in more than one way.
    InconsistentUse,
    /// Stilted or unidiomatic phrasing.
    Awkward,
}

impl SubCategory {
    /// All sub-categories in pipeline declaration order.
    pub const ALL: [Self; 13] = [
        Self::Addition,
        Self::Omission,
        Self::Mistranslation,
        Self::UntranslatedText,
        Self::Punctuation,
        Self::Spelling,
        Self::Grammar,
        Self::Register,
        Self::Inconsistency,
        Self::CharacterEncoding,
        Self::InappropriateForContext,
        Self::InconsistentUse,
        Self::Awkward,
    ];

    /// Wire name of the sub-category; also its state slot name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Omission => "omission",
            Self::Mistranslation => "mistranslation",
            Self::UntranslatedText => "untranslated_text",
            Self::Punctuation => "punctuation",
            Self::Spelling => "spelling",
            Self::Grammar => "grammar",
            Self::Register => "register",
            Self::Inconsistency => "inconsistency",
            Self::CharacterEncoding => "characterEncoding",
            Self::InappropriateForContext => "inappropriate_for_context",
            Self::InconsistentUse => "inconsistent_use",
            Self::Awkward => "awkward",
        }
    }

    /// The category this sub-category belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Addition | Self::Omission | Self::Mistranslation | Self::UntranslatedText => {
                Category::Accuracy
            }
            Self::Punctuation
            | Self::Spelling
            | Self::Grammar
            | Self::Register
            | Self::Inconsistency
            | Self::CharacterEncoding => Category::Fluency,
            Self::InappropriateForContext | Self::InconsistentUse => Category::Terminology,
            Self::Awkward => Category::Style,
        }
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
