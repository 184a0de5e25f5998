use super::{PageMetrics, RawEvent, Tally};

/// Strips the query string, if any.
pub fn normalize_path(path: &str) -> &str {
    match path.find('?') {
        Some(position) => &path[..position],
        None => path,
    }
}

/// Most viewed paths, highest first. Equal counts keep first-seen order.
pub fn top_pages(events: &[RawEvent], limit: usize) -> Vec<PageMetrics> {
    let mut tally = Tally::default();
    for event in events {
        tally.add(normalize_path(&event.path));
    }

    let mut pages = tally.into_entries();
    pages.sort_by(|a, b| b.1.cmp(&a.1));
    pages.truncate(limit);

    pages
        .into_iter()
        .map(|(path, views)| PageMetrics { path, views })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::test_support::event;
    use crate::aggregators::TOP_PAGES_LIMIT;

    fn paths(pages: &[PageMetrics]) -> Vec<&str> {
        pages.iter().map(|p| p.path.as_str()).collect()
    }

    #[test]
    fn normalize_path_cuts_at_first_question_mark() {
        assert_eq!(normalize_path("/blog/a?ref=x?y"), "/blog/a");
        assert_eq!(normalize_path("/blog/a"), "/blog/a");
        assert_eq!(normalize_path("?only=query"), "");
    }

    #[test]
    fn ranking_is_capped_and_sorted() {
        let mut events = Vec::new();
        for (index, path) in ["/a", "/b", "/c", "/d", "/e", "/f", "/g"].iter().enumerate() {
            for _ in 0..=index {
                events.push(event(path, "s"));
            }
        }

        let pages = top_pages(&events, TOP_PAGES_LIMIT);

        assert_eq!(paths(&pages), vec!["/g", "/f", "/e", "/d", "/c"]);
        assert_eq!(pages[0].views, 7);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let events = vec![
            event("/second?x=1", "s"),
            event("/first", "s"),
            event("/second", "s"),
            event("/first", "s"),
            event("/third", "s"),
        ];

        let pages = top_pages(&events, TOP_PAGES_LIMIT);

        assert_eq!(paths(&pages), vec!["/second", "/first", "/third"]);
    }

    #[test]
    fn no_events_no_pages() {
        assert!(top_pages(&[], TOP_PAGES_LIMIT).is_empty());
    }
}
