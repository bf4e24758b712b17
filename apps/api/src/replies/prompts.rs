//! Prompt composition for review replies.

use crate::models::profile::ProfileRow;
use crate::models::review::ReviewRow;

/// System instruction: the profile's base text and addon joined by a newline.
pub fn build_system_instruction(profile: &ProfileRow) -> String {
    format!(
        "{}\n{}",
        profile.profile_text_base, profile.profile_text_addon
    )
}

/// User content: the review text followed by who sent it and the rating.
/// Only the first space-separated token of the author name is used.
pub fn build_user_content(review: &ReviewRow) -> String {
    let text = review.review_text.as_deref().unwrap_or_default();
    let first_name = review.author_name.split(' ').next().unwrap_or_default();
    format!(
        "{text} - sent by {first_name} who gave a rating of {} stars",
        review.rating
    )
}
