//! Candidate list with paging and highlight navigation.
//!
//! Candidates are single characters taken in order from a lookup result
//! string and split into fixed-size pages. At most one candidate on the
//! current page is highlighted; picking returns the highlighted one.

use std::ops::Range;

/// Candidates shown per page by default.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// A paginated list of candidate characters with an optional highlight.
#[derive(Debug, Clone)]
pub struct CandidateList {
    /// All available candidates
    candidates: Vec<char>,

    /// Number of candidates per page
    page_size: usize,

    /// Current page index (0-based)
    current_page: usize,

    /// Highlight position within the current page
    cursor: Option<usize>,

    /// Whether the next page shown gets its first candidate highlighted
    highlight_default: bool,
}

impl CandidateList {
    /// Create a new empty candidate list.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a candidate list with specified page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            candidates: Vec::new(),
            page_size: page_size.max(1),
            current_page: 0,
            cursor: None,
            highlight_default: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the candidates with the characters of `words` and show the
    /// first page.
    ///
    /// With `highlight_default` the first candidate is highlighted right away.
    /// Without it nothing is highlighted until the user moves the highlight
    /// or turns the page.
    pub fn set_candidates(&mut self, words: &str, highlight_default: bool) {
        self.candidates = words.chars().collect();
        self.highlight_default = highlight_default;
        self.show_page(0);
    }

    /// Remove every candidate.
    pub fn clear(&mut self) {
        self.set_candidates("", false);
    }

    pub fn candidates(&self) -> &[char] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Get the total number of pages.
    pub fn num_pages(&self) -> usize {
        self.candidates.len().div_ceil(self.page_size)
    }

    /// Get the current page index (0-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Highlight position within the current page.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    fn current_page_range(&self) -> Range<usize> {
        let start = (self.current_page * self.page_size).min(self.candidates.len());
        let end = (start + self.page_size).min(self.candidates.len());
        start..end
    }

    /// Get the candidates for the current page.
    pub fn current_page_candidates(&self) -> &[char] {
        &self.candidates[self.current_page_range()]
    }

    /// The highlighted candidate, if any.
    pub fn selected_candidate(&self) -> Option<char> {
        self.cursor
            .and_then(|i| self.current_page_candidates().get(i).copied())
    }

    fn show_page(&mut self, page: usize) {
        self.current_page = page;
        self.cursor = None;
        if page < self.num_pages() {
            if self.highlight_default {
                self.cursor = Some(0);
            }
            // After the first page, paging means the user is choosing.
            self.highlight_default = true;
        }
    }

    /// Move to the previous page. Returns true if the page changed.
    pub fn page_up(&mut self) -> bool {
        if self.current_page == 0 {
            return false;
        }
        self.show_page(self.current_page - 1);
        true
    }

    /// Move to the next page. Returns true if the page changed.
    pub fn page_down(&mut self) -> bool {
        if self.current_page + 1 >= self.num_pages() {
            return false;
        }
        self.show_page(self.current_page + 1);
        true
    }

    /// Move the highlight left, wrapping to the last candidate of the
    /// previous page from the first position.
    pub fn highlight_left(&mut self) {
        match self.cursor {
            Some(0) => {
                if self.page_up() {
                    self.cursor = Some(self.page_size - 1);
                }
            }
            Some(i) => self.cursor = Some(i - 1),
            None => {}
        }
    }

    /// Move the highlight right, turning to the next page from the last
    /// position. Starts highlighting at the first candidate if nothing is
    /// highlighted yet.
    pub fn highlight_right(&mut self) {
        let page_len = self.current_page_candidates().len();
        if page_len == 0 {
            return;
        }
        match self.cursor {
            None => self.cursor = Some(0),
            Some(i) if i + 1 < page_len => self.cursor = Some(i + 1),
            Some(_) => {
                self.page_down();
            }
        }
    }

    /// Select a candidate by index within the current page.
    pub fn select_by_index(&mut self, page_index: usize) -> Option<char> {
        let candidate = self.current_page_candidates().get(page_index).copied()?;
        self.cursor = Some(page_index);
        Some(candidate)
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new()
    }
}
