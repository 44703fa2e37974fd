// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs as async_fs;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::channel::{Channel, ListedChannel};
use crate::error::CatalogError;

/// Every channel the directory knows about, grouped by country.
///
/// Countries keep the order they appear in the source document; that order
/// is also the order channels are listed in when gathered across countries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    countries: Vec<(String, Vec<Channel>)>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub name: String,
    pub channels: usize,
}

impl Catalog {
    pub fn from_countries<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Channel>)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (name, channels) in countries {
            catalog.insert(name.into(), channels);
        }
        catalog
    }

    // A repeated key replaces the earlier list, as a JSON parser would.
    fn insert(&mut self, name: String, channels: Vec<Channel>) {
        match self.index.get(&name) {
            Some(&i) => self.countries[i].1 = channels,
            None => {
                self.index.insert(name.clone(), self.countries.len());
                self.countries.push((name, channels));
            }
        }
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Channels authored for `country`, empty when the country is unknown.
    pub fn channels(&self, country: &str) -> &[Channel] {
        self.index
            .get(country)
            .map(|&i| self.countries[i].1.as_slice())
            .unwrap_or_default()
    }

    pub fn countries(&self) -> impl Iterator<Item = (&str, &[Channel])> {
        self.countries
            .iter()
            .map(|(name, channels)| (name.as_str(), channels.as_slice()))
    }

    pub fn summaries(&self) -> Vec<CountrySummary> {
        self.countries()
            .map(|(name, channels)| CountrySummary {
                name: name.to_string(),
                channels: channels.len(),
            })
            .collect()
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn channel_count(&self) -> usize {
        self.countries.iter().map(|(_, list)| list.len()).sum()
    }

    /// Picks one channel uniformly, either from one country or from the
    /// whole catalog. Channels drawn from the whole catalog carry their
    /// country.
    pub fn random_channel<R: Rng + ?Sized>(
        &self,
        country: Option<&str>,
        rng: &mut R,
    ) -> Option<ListedChannel> {
        if let Some(country) = country {
            return self
                .channels(country)
                .choose(rng)
                .map(|channel| ListedChannel::new(channel.clone(), None));
        }

        let total = self.channel_count();
        if total == 0 {
            return None;
        }

        let mut pick = rng.random_range(0..total);
        for (name, channels) in self.countries() {
            if pick < channels.len() {
                return Some(ListedChannel::new(
                    channels[pick].clone(),
                    Some(name.to_string()),
                ));
            }
            pick -= channels.len();
        }
        None
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping country names to channel lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Catalog, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut catalog = Catalog::default();
                while let Some((name, channels)) = map.next_entry::<String, Vec<Channel>>()? {
                    catalog.insert(name, channels);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Read-only, lazily loaded catalog shared by every request.
///
/// The document is read on first use and kept for the life of the process.
/// A failed load is not cached, so the next request tries again.
#[derive(Debug)]
pub struct CatalogStore {
    path: Option<PathBuf>,
    catalog: OnceCell<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            catalog: OnceCell::new(),
        }
    }

    /// A store that is already loaded, used when the catalog comes from
    /// somewhere other than a file.
    pub fn preloaded(catalog: Catalog) -> Self {
        Self {
            path: None,
            catalog: OnceCell::new_with(Some(Arc::new(catalog))),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn get(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.catalog
            .get_or_try_init(|| async {
                let path = self.path.as_deref().ok_or(CatalogError::Missing)?;
                load_catalog(path).await.map(Arc::new)
            })
            .await
            .cloned()
    }
}

async fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let catalog = Catalog::from_json(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded catalog {}: {} countries, {} channels",
        path.display(),
        catalog.country_count(),
        catalog.channel_count()
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Write;

    const DOC: &str = r#"{
        "Zambia": [{"name": "ZNBC", "url": "z1"}],
        "Egypt": [
            {"name": "Al Jazeera News", "url": "u1", "category": "news"},
            {"name": "MBC Drama", "url": "u2"}
        ],
        "Albania": []
    }"#;

    #[test]
    fn preserves_document_order() {
        let catalog = Catalog::from_json(DOC).unwrap();
        let names: Vec<_> = catalog.countries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zambia", "Egypt", "Albania"]);
        assert_eq!(catalog.channels("Egypt")[1].name, "MBC Drama");
        assert!(catalog.channels("Atlantis").is_empty());
        assert_eq!(catalog.channel_count(), 3);
    }

    #[test]
    fn summaries_follow_catalog_order() {
        let catalog = Catalog::from_json(DOC).unwrap();
        assert_eq!(
            catalog.summaries(),
            vec![
                CountrySummary { name: "Zambia".into(), channels: 1 },
                CountrySummary { name: "Egypt".into(), channels: 2 },
                CountrySummary { name: "Albania".into(), channels: 0 },
            ]
        );
    }

    #[test]
    fn random_channel_respects_country() {
        let catalog = Catalog::from_json(DOC).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let pick = catalog.random_channel(Some("Egypt"), &mut rng).unwrap();
            assert!(pick.country_name.is_none());
            assert!(pick.channel.url == "u1" || pick.channel.url == "u2");

            let any = catalog.random_channel(None, &mut rng).unwrap();
            assert!(any.country_name.is_some());
        }

        assert!(catalog.random_channel(Some("Albania"), &mut rng).is_none());
        assert!(Catalog::default().random_channel(None, &mut rng).is_none());
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(Catalog::from_json("[1, 2]").is_err());
        assert!(Catalog::from_json(r#"{"Egypt": [{"url": "u"}]}"#).is_err());
    }

    #[tokio::test]
    async fn store_loads_once_and_reports_failures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();

        let store = CatalogStore::from_path(file.path());
        let first = store.get().await.unwrap();
        std::fs::write(file.path(), "not json").unwrap();
        let second = store.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let broken = CatalogStore::from_path(file.path());
        assert!(matches!(broken.get().await, Err(CatalogError::Parse { .. })));

        let missing = CatalogStore::from_path("/nonexistent/channels.json");
        assert!(matches!(missing.get().await, Err(CatalogError::Read { .. })));
    }
}
