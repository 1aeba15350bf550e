//! Helpers for backend-native resource identifiers.
//!
//! ARNs and Kubernetes provider IDs are `/`-separated paths whose last
//! segment is the short identity we expose (container instance id, EC2
//! instance id). These helpers centralise that parsing so every adapter
//! behaves identically.

/// Return the segment after the last `/`, or the whole string when there
/// is no `/`.
///
/// ```
/// # use dockyard_core::ident::trailing_segment;
/// assert_eq!(
///     trailing_segment("arn:aws:ecs:us-east-1:123456789012:container-instance/prod/0f3a"),
///     "0f3a"
/// );
/// assert_eq!(trailing_segment("aws:///us-east-1a/i-0abc123"), "i-0abc123");
/// assert_eq!(trailing_segment("i-0abc123"), "i-0abc123");
/// ```
pub fn trailing_segment(id: &str) -> &str {
    match id.rfind('/') {
        Some(idx) => &id[idx + 1..],
        None => id,
    }
}

/// Split `ids` into batches of at most `size` entries.
///
/// Describe APIs cap how many identifiers one call may carry; adapters use
/// this to stay below the cap while still fetching the complete set.
///
/// ```
/// # use dockyard_core::ident::batches;
/// let ids: Vec<String> = (0..5).map(|i| i.to_string()).collect();
/// let sizes: Vec<usize> = batches(&ids, 2).map(|b| b.len()).collect();
/// assert_eq!(sizes, vec![2, 2, 1]);
/// ```
pub fn batches(ids: &[String], size: usize) -> std::slice::Chunks<'_, String> {
    ids.chunks(size.max(1))
}
