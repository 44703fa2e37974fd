// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

/// Zero-based page number and page size, already clamped to legal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Clamps caller-supplied values: a missing page is 0, negative pages
    /// become 0, and the size is forced into `[1, 200]` with 50 when absent.
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(0).max(0);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64);

        Self {
            page: usize::try_from(page).unwrap_or(usize::MAX),
            page_size: page_size as usize,
        }
    }

    /// Parses raw query-string values by their leading integer, so `2.5`
    /// reads as 2 and oversized numbers saturate. A value with no leading
    /// digits is treated as absent.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self::clamped(page.and_then(leading_int), page_size.and_then(leading_int))
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }
}

fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits: Vec<i64> = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .into_iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(if negative { -magnitude } else { magnitude })
}

/// One slice of a candidate list with continuation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub channels: Vec<T>,
    pub has_more: bool,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
            has_more: false,
            total: 0,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            channels: self.channels.into_iter().map(f).collect(),
            has_more: self.has_more,
            total: self.total,
        }
    }
}

/// Cuts page `request.page` out of `items`. A start past the end yields an
/// empty slice; `total` always reports the full length.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total = items.len();
    let start = request.page.saturating_mul(request.page_size);
    let end = start.saturating_add(request.page_size);

    let channels = if start < total {
        items[start..end.min(total)].to_vec()
    } else {
        Vec::new()
    };

    Page {
        channels,
        has_more: end < total,
        total,
    }
}
