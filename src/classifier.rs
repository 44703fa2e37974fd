// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::sync::Arc;

use crate::channel::Channel;
use crate::taxonomy::{TOP_NEWS, Taxonomy};

/// Lowercases a requested category id and turns its first `-` into a space,
/// so `top-news` becomes `top news`.
pub fn normalize_category(id: &str) -> String {
    id.to_lowercase().replacen('-', " ", 1)
}

/// Decides whether a channel belongs to a category by substring matching on
/// its name and category tag.
#[derive(Debug, Clone)]
pub struct Classifier {
    taxonomy: Arc<Taxonomy>,
}

impl Classifier {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn classify(&self, channel: &Channel, category: &str) -> bool {
        let requested = normalize_category(category);
        let name = channel.name.to_lowercase();
        let tag = channel
            .category
            .as_deref()
            .map(str::to_lowercase)
            .filter(|t| !t.is_empty());

        if tag.as_deref() == Some(requested.as_str()) {
            return true;
        }

        let lookup = if requested == TOP_NEWS {
            "news"
        } else {
            requested.as_str()
        };

        match self.taxonomy.keywords(lookup) {
            Some(keywords) if !keywords.is_empty() => {
                if keywords.iter().any(|k| name.contains(k.as_str())) {
                    return true;
                }
                tag.is_some_and(|t| keywords.iter().any(|k| t.contains(k.as_str())))
            }
            // Unknown ids fall back to a plain name search.
            _ => name.contains(requested.as_str()),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(Taxonomy::builtin()))
    }
}
