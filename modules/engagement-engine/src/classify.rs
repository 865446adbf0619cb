use engagement_common::Category;

/// Yellow, with and without the diacritic.
const YELLOW: &[&str] = &["vàng", "vang"];

/// Red, with and without the diacritic.
const RED: &[&str] = &["đỏ", "do"];

/// Map a post's moderation flag to a category. Unknown or missing flags are `Low`.
pub fn classify(flag: Option<&str>) -> Category {
    let Some(flag) = flag else {
        return Category::Low;
    };
    let normalized = flag.trim().to_lowercase();

    match normalized.as_str() {
        s if RED.contains(&s) => Category::High,
        s if YELLOW.contains(&s) => Category::Medium,
        // "xanh" (green) lands here too
        _ => Category::Low,
    }
}
