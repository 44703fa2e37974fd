// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::collections::HashMap;

/// Pseudo-category meaning "no category filter".
pub const ALL_CHANNELS: &str = "all-channels";
/// Requested as `top-news`; matches with the `news` keywords.
pub const TOP_NEWS: &str = "top news";
/// Client-local collections, never answered by the catalog.
pub const HISTORY: &str = "history";
pub const FAVORITES: &str = "favorites";

const BUILTIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "music",
        &[
            "music", "mtv", "radio", "fm", "hits", "rap", "pop", "rock", "schlager", "vevo",
            "musica", "música", "musique", "aghani", "tarab", "songtv", "melody", "rotana",
            "stereo", "anghami", "mazzika",
        ],
    ),
    (
        "news",
        &[
            "news", "nachrichten", "noticias", "info", "akhbar", "إخبارية", "خبر", "jazeera",
            "cnn", "bbc", "fox", "dw", "rt", "sky news", "cbs", "abc", "nbc", "notizie",
            "nouvelles", "24/7", "24h", "alarabiya", "al hadath", "alghad", "al mayadeen",
            "france 24", "العربية", "الحدث", "أخبار",
        ],
    ),
    (
        "movies",
        &[
            "movie", "film", "cinema", "cine", "kino", "aflam", "أفلام", "hollywood", "action",
            "drama", "fox movies",
        ],
    ),
    (
        "sports",
        &[
            "sport", "sports", "nfl", "nba", "mlb", "football", "futbol", "tennis", "golf",
            "racing", "carreras", "f1", "رياضة", "bein", "espn", "tnt sports", "ad sports", "ssc",
            "alkass", "الكاس", "trophy",
        ],
    ),
    (
        "kids",
        &[
            "kids", "animation", "cartoon", "niños", "enfants", "kinder", "أطفال", "junior",
            "disney", "nick", "cn", "cartoonito", "peppa", "gumball", "smurfs", "سنافر", "كرتون",
            "اطفال", "baby",
        ],
    ),
    (
        "documentary",
        &[
            "documentary", "doc", "discovery", "geo", "history", "animal", "planet", "nat geo",
            "national geographic", "وثائقي", "wathaiqi", "bookopen",
        ],
    ),
    (
        "shop",
        &["shop", "qvc", "hse", "tjc", "ideal world", "citruss", "shoppingbag"],
    ),
    (
        "religious",
        &[
            "religious", "quran", "قرآن", "sunnah", "bible", "ewtn", "mta", "islam", "makkah",
            "mecca", "saudi quran", "al majid", "iqraa", "heartHandshake",
        ],
    ),
    (
        "cooking",
        &["cooking", "kitchen", "food", "chef", "مطبخ", "طبخ", "chefhat"],
    ),
    (
        "auto",
        &["auto", "car", "motor", "racing", "f1", "vehicle", "automotive", "سيارات"],
    ),
    ("animation", &["animation", "anime", "أنمي", "sparkles"]),
    (
        "business",
        &[
            "business", "finance", "money", "invest", "stock", "market", "bloomberg", "cnbc",
            "مال", "أعمال", "briefcase",
        ],
    ),
    (
        "classic",
        &["classic", "retro", "vintage", "oldies", "golden age", "كلاسيك", "scroll"],
    ),
    (
        "comedy",
        &["comedy", "funny", "laugh", "standup", "humor", "كوميديا", "ضحك"],
    ),
    (
        "culture",
        &["culture", "arts", "cultural", "heritage", "thakafia", "ثقافة", "palette"],
    ),
    (
        "education",
        &["education", "school", "learn", "teach", "university", "تعليم", "graduationcap"],
    ),
    (
        "entertainment",
        &["entertainment", "celeb", "gossip", "hollywood", "e!", "فن", "ترفيه", "ticket"],
    ),
    ("family", &["family", "familia", "famille", "عائلة", "users"]),
    (
        "general",
        &["general", "generalista", "général", "عام", "منوعات", "globe"],
    ),
    (
        "legislative",
        &[
            "legislative", "government", "parliament", "c-span", "senate", "parlamento", "مجلس",
            "scale",
        ],
    ),
    (
        "lifestyle",
        &[
            "lifestyle", "life", "style", "home", "garden", "fashion", "health", "wellbeing",
            "heart",
        ],
    ),
    ("series", &["series", "tv show", "drama", "sitcom", "مسلسلات", "tv"]),
    (
        "outdoor",
        &["outdoor", "nature", "adventure", "hunting", "fishing", "طبيعة", "mountain"],
    ),
    (
        "relax",
        &["relax", "chill", "ambience", "fireplace", "calm", "ambiant", "استرخاء", "wind"],
    ),
    (
        "science",
        &["science", "tech", "technology", "sci", "space", "nasa", "علوم", "flaskconical"],
    ),
    (
        "travel",
        &["travel", "tourism", "voyage", "safar", "trip", "vacation", "سفر", "plane"],
    ),
    (
        "weather",
        &["weather", "meteo", "forecast", "طقس", "wetter", "tiempo", "cloudsun"],
    ),
];

/// Browseable categories in menu order, as `(id, display name)`.
pub const CATEGORY_MENU: &[(&str, &str)] = &[
    (HISTORY, "History"),
    (FAVORITES, "Favorites"),
    (ALL_CHANNELS, "All Channels"),
    ("top-news", "Top News"),
    ("news", "News"),
    ("music", "Music"),
    ("sports", "Sports"),
    ("auto", "Auto"),
    ("animation", "Animation"),
    ("business", "Business"),
    ("classic", "Classic"),
    ("comedy", "Comedy"),
    ("cooking", "Cooking"),
    ("culture", "Culture"),
    ("documentary", "Documentary"),
    ("education", "Education"),
    ("entertainment", "Entertainment"),
    ("family", "Family"),
    ("general", "General"),
    ("kids", "Kids"),
    ("legislative", "Legislative"),
    ("lifestyle", "Lifestyle"),
    ("movies", "Movies"),
    ("series", "Series"),
    ("outdoor", "Outdoor"),
    ("relax", "Relax"),
    ("religious", "Religious"),
    ("science", "Science"),
    ("shop", "Shop"),
    ("travel", "Travel"),
    ("weather", "Weather"),
];

/// Heading for a category id: the menu name when known, otherwise the id
/// split on `-` with each word capitalised.
pub fn category_title(id: &str) -> String {
    if let Some((_, name)) = CATEGORY_MENU.iter().find(|(menu_id, _)| *menu_id == id) {
        return name.to_string();
    }

    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable mapping from category id to its lowercase keywords.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    keywords: HashMap<String, Vec<String>>,
}

impl Taxonomy {
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_KEYWORDS
                .iter()
                .map(|(id, words)| (id.to_string(), words.iter().map(|w| w.to_string()).collect())),
        )
    }

    /// Builds a taxonomy from arbitrary entries. Ids and keywords are
    /// lowercased so lookups against lowercased text stay consistent.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let keywords = entries
            .into_iter()
            .map(|(id, words)| {
                let words = words.into_iter().map(|w| w.to_lowercase()).collect();
                (id.to_lowercase(), words)
            })
            .collect();
        Self { keywords }
    }

    /// The built-in table with `overrides` replacing or adding entries.
    pub fn with_overrides(mut self, overrides: &HashMap<String, Vec<String>>) -> Self {
        let extra = Self::from_entries(overrides.clone());
        self.keywords.extend(extra.keywords);
        self
    }

    pub fn keywords(&self, id: &str) -> Option<&[String]> {
        self.keywords.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
