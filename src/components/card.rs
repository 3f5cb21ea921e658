//! Default card markup for catalog datasets.

use ammonia::clean_text;

use crate::config::{classes, labels};
use crate::core::host::{CardTemplate, Membership};
use crate::models::Dataset;
use crate::utils::format::{format_episode_stats, format_more};

/// Builds the inner markup of a dataset card. All catalog text is escaped.
#[derive(Clone, Copy, Debug, Default)]
pub struct DatasetCard;

fn tag(label: &str, more: &str) -> String {
    if more.is_empty() {
        format!(r#"<span class="video-tag">{}</span>"#, clean_text(label))
    } else {
        format!(
            r#"<span class="video-tag">{}<span class="tag-more">{}</span></span>"#,
            clean_text(label),
            more
        )
    }
}

impl CardTemplate<Dataset> for DatasetCard {
    fn build_card(
        &self,
        dataset: &Dataset,
        format_tags: &dyn Fn(&Dataset) -> String,
        cart: &dyn Membership,
    ) -> String {
        let title = clean_text(dataset.title());
        let video_url = dataset.video_url.as_deref().map(clean_text).unwrap_or_default();
        let placeholder = match dataset.thumbnail_url.as_deref() {
            Some(src) => format!(
                r#"<img class="{}" src="{}" alt="" loading="lazy">"#,
                classes::THUMBNAIL_IMAGE,
                clean_text(src)
            ),
            None => format!(r#"<div class="{}"></div>"#, classes::THUMBNAIL_IMAGE),
        };
        let in_cart = cart.contains(&dataset.path);
        let cart_label = labels::cart_toggle(in_cart);

        format!(
            r#"<div class="{thumb_class}" data-video-url="{video_url}">{placeholder}</div><div class="video-info"><div class="video-title" title="{title}">{title}</div><div class="video-meta">{tags}</div></div><button class="{toggle_class}" type="button" aria-pressed="{in_cart}">{cart_label}</button>"#,
            thumb_class = classes::THUMBNAIL,
            toggle_class = classes::CART_TOGGLE,
            tags = format_tags(dataset),
        )
    }

    fn format_tags(&self, dataset: &Dataset) -> String {
        let mut tags = String::new();

        if let Some(size) = dataset.dataset_size.as_deref() {
            tags.push_str(&tag(size, ""));
        }

        if let Some(stats) = &dataset.statistics
            && let (Some(episodes), Some(frames)) = (stats.total_episodes, stats.total_frames)
        {
            tags.push_str(&tag(&format_episode_stats(episodes, frames), ""));
        }

        if let Some(scene) = dataset.scenes.first() {
            tags.push_str(&tag(scene, &format_more(dataset.scenes.len())));
        }

        let effectors = dataset.end_effectors();
        if let Some(effector) = effectors.first() {
            tags.push_str(&tag(effector, &format_more(effectors.len())));
        }

        tags
    }
}
