//! Visible page-number window for pagination controls.

/// Maximum number of page buttons shown at once.
pub const WINDOW: u32 = 5;

/// Page numbers to render for `current` out of `total_pages`.
///
/// All pages when there are at most five; `1..=5` near the start; the last
/// five near the end; otherwise `current` centred with two on each side.
#[must_use]
pub fn page_window(total_pages: u32, current: u32) -> Vec<u32> {
    if total_pages <= WINDOW {
        return (1..=total_pages).collect();
    }
    let start = if current <= 3 {
        1
    } else if current >= total_pages - 2 {
        total_pages - (WINDOW - 1)
    } else {
        current - 2
    };
    (start..=start + (WINDOW - 1)).collect()
}

/// Whether "previous" / "next" controls are enabled.
#[must_use]
pub fn can_step(total_pages: u32, current: u32) -> (bool, bool) {
    (current > 1, current < total_pages)
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
