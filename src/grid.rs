//! Cluster map: chunk labels laid out as a text grid.
//!
//! Reading the labels in document order shows how topics are distributed:
//!
//! ```text
//! 0 0 0 2 2 1 1 1 1 1 1 3 3 3 0 0 ...
//! ```
//!
//! Long runs of one label are sections; alternating labels are a topic
//! woven through the text.

/// Labels per row for documents of up to 500 chunks.
pub const ROW_LENGTH: usize = 30;

/// Labels per row for documents of more than 500 chunks.
pub const LONG_ROW_LENGTH: usize = 50;

/// Render `labels` as rows of space-separated integers.
///
/// ```rust
/// let grid = precis::label_grid(&[0, 0, 1, 2]);
/// assert_eq!(grid, "0 0 1 2");
/// ```
#[must_use]
pub fn label_grid(labels: &[usize]) -> String {
    let row_length = if labels.len() > 500 {
        LONG_ROW_LENGTH
    } else {
        ROW_LENGTH
    };

    labels
        .chunks(row_length)
        .map(|row| {
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
