//! List helpers for the public pages.

use crate::models::detailed_note::DetailedNote;
use crate::models::note::Note;
use crate::models::tool::Tool;

pub const ALL_CATEGORIES: &str = "all";

/// Notes whose title, subject or code contains `query`, ignoring case.
pub fn search_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return notes.iter().collect();
    }
    notes
        .iter()
        .filter(|note| {
            [&note.title, &note.subject, &note.notes_code]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Tools in the given category; `"all"` or an empty tag keeps everything.
pub fn filter_tools_by_tag<'a>(tools: &'a [Tool], tag: &str) -> Vec<&'a Tool> {
    let tag = tag.trim();
    if tag.is_empty() || tag.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return tools.iter().collect();
    }
    tools
        .iter()
        .filter(|tool| tool.tag.trim().eq_ignore_ascii_case(tag))
        .collect()
}

/// Distinct non-empty tags, sorted, for the category chips.
pub fn tool_tags(tools: &[Tool]) -> Vec<String> {
    let mut tags: Vec<String> = tools
        .iter()
        .map(|t| t.tag.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort_by_key(|t| t.to_lowercase());
    tags.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    tags
}

pub fn has_detailed_note(note: &Note, detailed: &[DetailedNote]) -> bool {
    detailed.iter().any(|d| d.matches_code(&note.notes_code))
}

/// Split items into carousel pages of `per_page` (at least one per page).
pub fn chunk_pages<T>(items: &[T], per_page: usize) -> Vec<&[T]> {
    items.chunks(per_page.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn note(title: &str, subject: &str, code: &str) -> Note {
        serde_json::from_value(json!({ "title": title, "subject": subject, "notesCode": code }))
            .unwrap()
    }

    fn tool(title: &str, tag: &str) -> Tool {
        let mut tool = Tool::new(
            title.into(),
            "d".into(),
            "https://example.com".into(),
            None,
            Some(tag.into()),
            1,
            None,
        );
        tool.tag = tag.into();
        tool
    }

    fn detailed(code: &str) -> DetailedNote {
        serde_json::from_value(json!({ "title": "Units", "notesCode": code })).unwrap()
    }

    #[test]
    fn search_matches_any_field() {
        let notes = vec![
            note("Operating Systems", "OS", "KCS401"),
            note("Compiler Design", "CD", "KCS502"),
        ];
        assert_eq!(search_notes(&notes, "kcs5").len(), 1);
        assert_eq!(search_notes(&notes, "operating")[0].notes_code, "KCS401");
        assert_eq!(search_notes(&notes, "  ").len(), 2);
        assert!(search_notes(&notes, "physics").is_empty());
    }

    #[test]
    fn tag_filter_and_all() {
        let tools = vec![tool("A", "AI"), tool("B", "ai"), tool("C", "Notes")];
        assert_eq!(filter_tools_by_tag(&tools, "AI").len(), 2);
        assert_eq!(filter_tools_by_tag(&tools, "All").len(), 3);
        assert_eq!(tool_tags(&tools), vec!["AI", "Notes"]);
    }

    #[test]
    fn detailed_note_match_ignores_case() {
        let n = note("DBMS", "DB", "kcs501");
        assert!(has_detailed_note(&n, &[detailed("KCS501")]));
        assert!(!has_detailed_note(&n, &[detailed("KCS502")]));
    }

    #[test]
    fn pages_keep_remainder() {
        let offers = [1, 2, 3, 4, 5];
        let pages = chunk_pages(&offers, 2);
        assert_eq!(pages, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
        assert_eq!(chunk_pages(&offers, 0).len(), 5);
        assert!(chunk_pages::<i32>(&[], 3).is_empty());
    }
}
