//! Line format of the prompt file.
//!
//! One record per line:
//!
//! ```text
//! INDEX. TITLE | cat1,cat2 | ★ | image.png | PROMPT TEXT
//! ```
//!
//! The favourite column holds `★` or nothing, the image column may be empty,
//! and older files omit the image column entirely. The body is everything
//! after the last column separator, so it may itself contain `|`.

use prompt_primitives::{PromptIndex, PromptRecord};

const FAVORITE_MARK: &str = "★";

/// Parses one line, returning `None` for blank or malformed lines.
#[must_use]
pub fn parse_line(line: &str) -> Option<PromptRecord> {
    let line = line.trim();
    if line.is_empty() || !line.contains('|') {
        return None;
    }

    let parts: Vec<&str> = line.splitn(5, '|').map(str::trim).collect();
    let (head, cats, fav, image, prompt) = match parts.as_slice() {
        [head, cats, fav, image, prompt] => (*head, *cats, *fav, *image, *prompt),
        [head, cats, fav, prompt] => (*head, *cats, *fav, "", *prompt),
        _ => return None,
    };

    let (index, title) = head.split_once(". ")?;
    let index = index.parse::<PromptIndex>().ok()?;

    let categories = cats
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect();

    Some(PromptRecord {
        index,
        title: title.to_owned(),
        prompt: prompt.to_owned(),
        categories,
        favorite: fav == FAVORITE_MARK,
        image: (!image.is_empty()).then(|| image.to_owned()),
    })
}

/// Formats one record as a line, flattening characters the format cannot hold.
#[must_use]
pub fn format_line(record: &PromptRecord) -> String {
    let title = single_line(&record.title).replace('|', "/");
    let prompt = single_line(&record.prompt);
    let flag = if record.favorite { FAVORITE_MARK } else { "" };
    let image = record.image().unwrap_or_default();
    format!(
        "{}. {} | {} | {} | {} | {}",
        record.index,
        title,
        record.categories.join(","),
        flag,
        image,
        prompt
    )
}

/// Parses a whole file, skipping malformed lines.
#[must_use]
pub fn parse_document(text: &str) -> Vec<PromptRecord> {
    text.lines().filter_map(parse_line).collect()
}

/// Formats records as a whole file.
#[must_use]
pub fn format_document(records: &[PromptRecord]) -> String {
    records
        .iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn single_line(text: &str) -> String {
    text.lines().map(str::trim_end).collect::<Vec<_>>().join(" ")
}
