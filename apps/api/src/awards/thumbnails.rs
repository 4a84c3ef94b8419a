use tracing::{info, warn};

use crate::awards::models::AwardRecord;
use crate::awards::prompts::award_thumbnail_prompt;
use crate::awards::strategies::free_text::AWARD_IMAGE_SIZE;
use crate::llm_client::capabilities::ImageGenerator;

/// Generates a thumbnail for every award that has no `image_url`.
/// A failed generation leaves that award without an image; the rest still get theirs.
pub async fn attach_missing_thumbnails(images: &dyn ImageGenerator, awards: &mut [AwardRecord]) {
    let missing = awards.iter().filter(|a| a.image_url.is_none()).count();
    if missing == 0 {
        return;
    }
    info!("Generating thumbnails for {} awards without images", missing);

    for award in awards.iter_mut().filter(|a| a.image_url.is_none()) {
        let prompt = award_thumbnail_prompt(award);
        match images.generate_image(&prompt, AWARD_IMAGE_SIZE).await {
            Some(url) => award.image_url = Some(url),
            None => warn!("No thumbnail generated for award '{}'", award.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::awards::models::{Category, Significance};
    use crate::llm_client::fakes::ScriptedImages;
    use uuid::Uuid;

    fn award(name: &str, image_url: Option<&str>) -> AwardRecord {
        AwardRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "Voted by teammates".to_string(),
            category: Category::Sports,
            year: 2010,
            organization: "Cal Football".to_string(),
            image_url: image_url.map(str::to_string),
            source_url: None,
            significance: Significance::Local,
            verified: true,
        }
    }

    #[tokio::test]
    async fn test_only_awards_without_images_get_thumbnails() {
        let images = ScriptedImages::new(vec![]);
        let mut awards = vec![
            award("Team MVP", Some("https://calbears.com/mvp.png")),
            award("Team Captain", None),
        ];

        attach_missing_thumbnails(&images, &mut awards).await;

        assert_eq!(images.call_count(), 1);
        assert_eq!(awards[0].image_url.as_deref(), Some("https://calbears.com/mvp.png"));
        assert_eq!(
            awards[1].image_url.as_deref(),
            Some("https://images.example.com/0.png")
        );
    }

    #[tokio::test]
    async fn test_failed_thumbnail_does_not_block_the_rest() {
        let images = ScriptedImages::new(vec![0]);
        let mut awards = vec![award("Team MVP", None), award("Team Captain", None)];

        attach_missing_thumbnails(&images, &mut awards).await;

        assert_eq!(images.call_count(), 2);
        assert_eq!(awards[0].image_url, None);
        assert_eq!(
            awards[1].image_url.as_deref(),
            Some("https://images.example.com/1.png")
        );
    }

    #[test]
    fn test_thumbnail_prompt_names_the_award() {
        let prompt = award_thumbnail_prompt(&award("Team MVP", None));
        assert!(prompt.starts_with(
            "A professional award trophy or medal representing: Team MVP - Voted by teammates."
        ));
    }
}
