// src/services/enricher.rs
use super::image_lookup::ImageFinder;
use crate::recipe::RecipeCollection;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/600x400?text=No+Image+Found";

/// Attach an image to every recipe, in place of whatever the model sent.
///
/// Lookups run one after another in recipe order. A miss, or a recipe without a title,
/// gets [`PLACEHOLDER_IMAGE_URL`].
pub async fn enrich(mut collection: RecipeCollection, finder: &dyn ImageFinder) -> RecipeCollection {
    for recipe in &mut collection.recipes {
        let found = match recipe.search_title() {
            Some(title) => finder.find_image(title).await,
            None => None,
        };
        recipe.image = Some(found.unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()));
    }
    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Recipe;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Finds an image only for titles containing "pasta"; records every query.
    #[derive(Default)]
    struct PastaOnly {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageFinder for PastaOnly {
        async fn find_image(&self, query: &str) -> Option<String> {
            self.queries.lock().unwrap().push(query.to_string());
            query
                .to_lowercase()
                .contains("pasta")
                .then(|| format!("http://img/{}.jpg", query.to_lowercase().replace(' ', "-")))
        }
    }

    #[tokio::test]
    async fn every_recipe_gets_an_image_in_order() {
        let finder = PastaOnly::default();
        let collection = RecipeCollection {
            recipes: vec![
                Recipe::titled("Pasta"),
                Recipe::titled("Soup"),
                Recipe::default(),
                Recipe::titled("Pasta Bake"),
            ],
        };

        let enriched = enrich(collection, &finder).await;

        let titles: Vec<_> = enriched.recipes.iter().map(|r| r.search_title()).collect();
        assert_eq!(titles, vec![Some("Pasta"), Some("Soup"), None, Some("Pasta Bake")]);

        let images: Vec<_> = enriched.recipes.iter().map(|r| r.image.as_deref().unwrap()).collect();
        assert_eq!(
            images,
            vec![
                "http://img/pasta.jpg",
                PLACEHOLDER_IMAGE_URL,
                PLACEHOLDER_IMAGE_URL,
                "http://img/pasta-bake.jpg",
            ]
        );

        // untitled recipes never hit the finder
        assert_eq!(*finder.queries.lock().unwrap(), vec!["Pasta", "Soup", "Pasta Bake"]);
    }

    #[tokio::test]
    async fn model_supplied_image_is_replaced() {
        let mut recipe = Recipe::titled("Soup");
        recipe.image = Some("http://made-up.example/soup.png".into());

        let enriched = enrich(RecipeCollection { recipes: vec![recipe] }, &PastaOnly::default()).await;
        assert_eq!(enriched.recipes[0].image.as_deref(), Some(PLACEHOLDER_IMAGE_URL));
    }

    #[tokio::test]
    async fn empty_collection_stays_empty() {
        let enriched = enrich(RecipeCollection::default(), &PastaOnly::default()).await;
        assert!(enriched.recipes.is_empty());
    }
}
