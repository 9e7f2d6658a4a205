// SPDX-License-Identifier: Apache-2.0

//! Word cloud of dataset titles, written once into the static directory.

use crate::ServerError;
use mdverse_query::dataset_titles;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use svg::node::element::{Rectangle, Text};
use svg::Document;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

pub const WORDCLOUD_FILE: &str = "wordcloud.svg";

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

const CANVAS_WIDTH: f32 = 1600.0;
const CANVAS_HEIGHT: f32 = 800.0;
const MAX_WORDS: usize = 200;
const MAX_FONT: f32 = 140.0;
const MIN_FONT: f32 = 12.0;
const PADDING: f32 = 3.0;
const GLYPH_WIDTH: f32 = 0.6;
const SPIRAL_STEP: f32 = 0.05;
const PALETTE: [&str; 6] = [
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02",
];

const EXTRA_STOPWORDS: [&str; 16] = [
    "none", "and", "of", "with", "which", "incl", "from", "the", "a", "an", "for", "on", "in",
    "to", "by", "as",
];

const ENGLISH_STOPWORDS: [&str; 127] = [
    "about", "above", "after", "again", "against", "all", "am", "any", "are", "at", "be",
    "because", "been", "before", "being", "below", "between", "both", "but", "can", "could",
    "did", "do", "does", "doing", "down", "during", "each", "else", "ever", "few", "further",
    "get", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "if", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "off", "once", "only", "or",
    "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
    "shall", "she", "should", "since", "so", "some", "such", "than", "that", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "while", "who",
    "whom", "why", "will", "would", "you", "your", "yours", "yourself", "yourselves", "also",
    "com", "http", "https", "www", "like", "via", "using",
];

fn is_stopword(word: &str) -> bool {
    EXTRA_STOPWORDS.contains(&word) || ENGLISH_STOPWORDS.contains(&word)
}

/// Normalizes (NFKC, lowercase), splits on non-alphanumerics and drops
/// stopwords, single letters and bare numbers. Most frequent first.
#[must_use]
pub fn title_word_frequencies(titles: &[String]) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for title in titles {
        let normalized = title.nfkc().collect::<String>().to_lowercase();
        for word in normalized.split(|c: char| !c.is_alphanumeric()) {
            if word.chars().count() < 2
                || word.chars().all(|c| c.is_ascii_digit())
                || is_stopword(word)
            {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    let mut ranked = counts.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(MAX_WORDS);
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    pub word: String,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.x + other.width + PADDING
            && other.x < self.x + self.width + PADDING
            && self.y < other.y + other.height + PADDING
            && other.y < self.y + self.height + PADDING
    }
}

fn box_size(word: &str, font_size: f32) -> (f32, f32) {
    (word.chars().count() as f32 * font_size * GLYPH_WIDTH, font_size)
}

/// Walks an Archimedean spiral out from the canvas centre and returns the
/// first position where the box fits without touching earlier words.
fn find_spot(placed: &[Placement], word: &str, font_size: f32) -> Option<Placement> {
    let (width, height) = box_size(word, font_size);
    if width > CANVAS_WIDTH || height > CANVAS_HEIGHT {
        return None;
    }
    let cx = CANVAS_WIDTH / 2.0;
    let cy = CANVAS_HEIGHT / 2.0;
    let max_radius = (cx * cx + cy * cy).sqrt();
    let mut t = 0.0_f32;
    loop {
        let radius = 2.0 * t;
        if radius > max_radius {
            return None;
        }
        let candidate = Placement {
            word: word.to_string(),
            font_size,
            x: cx + radius * t.cos() - width / 2.0,
            y: cy + radius * t.sin() * (CANVAS_HEIGHT / CANVAS_WIDTH) - height / 2.0,
            width,
            height,
        };
        let inside = candidate.x >= 0.0
            && candidate.y >= 0.0
            && candidate.x + width <= CANVAS_WIDTH
            && candidate.y + height <= CANVAS_HEIGHT;
        if inside && !placed.iter().any(|p| p.overlaps(&candidate)) {
            return Some(candidate);
        }
        t += SPIRAL_STEP;
    }
}

pub(crate) fn layout_words(frequencies: &[(String, u64)]) -> Vec<Placement> {
    let Some(top) = frequencies.first().map(|(_, n)| *n as f32) else {
        return Vec::new();
    };
    let mut placed: Vec<Placement> = Vec::new();
    for (word, count) in frequencies {
        let mut font_size = (MAX_FONT * (0.5 * *count as f32 / top + 0.5)).max(MIN_FONT);
        while font_size >= MIN_FONT {
            if let Some(spot) = find_spot(&placed, word, font_size) {
                placed.push(spot);
                break;
            }
            font_size *= 0.85;
        }
    }
    placed
}

pub(crate) fn render_wordcloud(frequencies: &[(String, u64)]) -> String {
    let mut doc = Document::new()
        .set("viewBox", (0, 0, CANVAS_WIDTH, CANVAS_HEIGHT))
        .set("width", CANVAS_WIDTH)
        .set("height", CANVAS_HEIGHT)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", CANVAS_WIDTH)
                .set("height", CANVAS_HEIGHT)
                .set("fill", "#ffffff"),
        );
    for (idx, spot) in layout_words(frequencies).into_iter().enumerate() {
        doc = doc.add(
            Text::new(spot.word)
                .set("x", spot.x)
                .set("y", spot.y + spot.height * 0.8)
                .set("font-family", "monospace")
                .set("font-size", spot.font_size)
                .set("fill", PALETTE[idx % PALETTE.len()]),
        );
    }
    doc.to_string()
}

/// Writes `wordcloud.svg` under `static_dir` unless it already exists.
/// Returns whether a new file was written.
pub fn ensure_wordcloud(conn: &Connection, static_dir: &Path) -> Result<bool, ServerError> {
    let target = static_dir.join(WORDCLOUD_FILE);
    if target.exists() {
        return Ok(false);
    }
    let titles = dataset_titles(conn)?;
    let frequencies = title_word_frequencies(&titles);
    let distinct = frequencies
        .iter()
        .map(|(w, _)| w.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    std::fs::create_dir_all(static_dir)?;
    // Concurrent writers each stage under their own name; the rename is atomic.
    let staging = static_dir.join(format!(
        "{WORDCLOUD_FILE}.{}.{}.tmp",
        std::process::id(),
        STAGING_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&staging, render_wordcloud(&frequencies))?;
    std::fs::rename(&staging, &target)?;
    info!(
        titles = titles.len(),
        words = distinct,
        path = %target.display(),
        "word cloud written"
    );
    Ok(true)
}
