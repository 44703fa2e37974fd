// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::catalog::Catalog;
use crate::channel::{Channel, ChannelFilter, ListedChannel};
use crate::classifier::Classifier;
use crate::taxonomy::ALL_CHANNELS;

/// A catalog channel selected by a query, borrowed until it is paged out.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub channel: &'a Channel,
    pub country: Option<&'a str>,
}

impl Candidate<'_> {
    pub fn to_listed(self) -> ListedChannel {
        ListedChannel::new(self.channel.clone(), self.country.map(str::to_string))
    }
}

/// Turns a filter into the ordered list of candidates to paginate.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    classifier: Classifier,
}

impl QueryEngine {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// With a country, that country's channels (optionally narrowed by
    /// category). Without one, every country's channels tagged with their
    /// country and narrowed by category. A filter that selects nothing
    /// yields nothing.
    pub fn candidates<'a>(&self, catalog: &'a Catalog, filter: &ChannelFilter) -> Vec<Candidate<'a>> {
        if !filter.is_browsable() {
            return Vec::new();
        }

        let category = filter.category.as_deref().filter(|c| *c != ALL_CHANNELS);

        if let Some(country) = filter.country.as_deref() {
            return catalog
                .channels(country)
                .iter()
                .filter(|channel| category.is_none_or(|c| self.classifier.classify(channel, c)))
                .map(|channel| Candidate {
                    channel,
                    country: None,
                })
                .collect();
        }

        let Some(category) = category else {
            return Vec::new();
        };

        catalog
            .countries()
            .flat_map(|(country, channels)| {
                channels.iter().map(move |channel| Candidate {
                    channel,
                    country: Some(country),
                })
            })
            .filter(|candidate| self.classifier.classify(candidate.channel, category))
            .collect()
    }

    /// Owned form of [`QueryEngine::candidates`].
    pub fn query(&self, catalog: &Catalog, filter: &ChannelFilter) -> Vec<ListedChannel> {
        self.candidates(catalog, filter)
            .into_iter()
            .map(Candidate::to_listed)
            .collect()
    }
}
