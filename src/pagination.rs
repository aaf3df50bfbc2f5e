use serde::Serialize;

/// Number of page buttons rendered under a table.
pub const WINDOW: usize = 5;

/// Page numbers shown for `current_page` out of `total_pages`.
///
/// The window is centred on the current page and shifted at either end so
/// that it always holds [`WINDOW`] pages when that many exist.
pub fn page_window(total_pages: usize, current_page: usize) -> Vec<usize> {
    if total_pages == 0 {
        return vec![];
    }
    if total_pages <= WINDOW {
        return (1..=total_pages).collect();
    }

    let half = WINDOW / 2;
    let current = current_page.clamp(1, total_pages);
    let start = if current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages + 1 - WINDOW
    } else {
        current - half
    };

    (start..start + WINDOW).collect()
}

/// One rendered page of a list with its pager metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<usize>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total: usize, total_pages: usize) -> Self {
        let current_page = current_page.max(1);

        Self {
            items,
            pages: page_window(total_pages, current_page),
            page: current_page,
            total,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_centred_in_the_middle() {
        assert_eq!(page_window(17, 10), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn window_clamps_at_the_edges() {
        assert_eq!(page_window(17, 1), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(17, 3), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(17, 17), vec![13, 14, 15, 16, 17]);
        assert_eq!(page_window(17, 15), vec![13, 14, 15, 16, 17]);
    }

    #[test]
    fn short_lists_show_every_page() {
        assert_eq!(page_window(3, 2), vec![1, 2, 3]);
        assert_eq!(page_window(0, 1), Vec::<usize>::new());
    }

    #[test]
    fn paginated_flags_neighbours() {
        let page = Paginated::new(vec![1, 2], 1, 12, 2);
        assert!(!page.has_previous);
        assert!(page.has_next);
        assert_eq!(page.pages, vec![1, 2]);
    }
}
